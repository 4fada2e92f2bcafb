//! Rate-limit detection for GitHub responses.
//!
//! GitHub refuses over-quota requests with `429`, or with `403` plus either
//! `X-RateLimit-Remaining: 0` (primary limit) or `Retry-After` (secondary
//! limit). A refused request is a soft stop for the caller, never retried.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;

const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Returns `true` when the response is a rate-limit refusal.
#[must_use]
pub fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    status == StatusCode::FORBIDDEN && (quota_exhausted(headers) || headers.contains_key(RETRY_AFTER))
}

/// Returns `true` when the response reports a spent quota, meaning the next
/// request would be refused.
#[must_use]
pub fn quota_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        == Some(0)
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn too_many_requests_is_rate_limited() {
        assert!(is_rate_limited(StatusCode::TOO_MANY_REQUESTS, &HeaderMap::new()));
    }

    #[test]
    fn forbidden_with_spent_quota_is_rate_limited() {
        let h = headers(&[("x-ratelimit-remaining", "0")]);
        assert!(is_rate_limited(StatusCode::FORBIDDEN, &h));
    }

    #[test]
    fn forbidden_with_retry_after_is_rate_limited() {
        let h = headers(&[("retry-after", "60")]);
        assert!(is_rate_limited(StatusCode::FORBIDDEN, &h));
    }

    #[test]
    fn plain_forbidden_is_not_rate_limited() {
        let h = headers(&[("x-ratelimit-remaining", "42")]);
        assert!(!is_rate_limited(StatusCode::FORBIDDEN, &h));
    }

    #[test]
    fn success_is_never_rate_limited() {
        let h = headers(&[("x-ratelimit-remaining", "0")]);
        assert!(!is_rate_limited(StatusCode::OK, &h));
        assert!(quota_exhausted(&h));
    }

    #[test]
    fn missing_or_garbled_header_is_not_exhausted() {
        assert!(!quota_exhausted(&HeaderMap::new()));
        assert!(!quota_exhausted(&headers(&[("x-ratelimit-remaining", "lots")])));
    }
}
