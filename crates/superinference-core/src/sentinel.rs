//! Stop-condition policy consulted after every page fetch.
//!
//! Pagination halts when the upstream signals a rate limit, when there are no
//! more pages, or when an API-specific hard page cap is reached. A rate limit
//! is a soft stop, never an error: the caller keeps what it has folded so far
//! and flags the section as incomplete when more data logically exists.

/// Why a page stream stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The upstream reported no further pages.
    Exhausted,
    /// The upstream refused a request or reported a spent quota.
    RateLimited,
    /// The hard page cap for the endpoint was reached.
    PageCap,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "exhausted"),
            StopReason::RateLimited => write!(f, "rate_limited"),
            StopReason::PageCap => write!(f, "page_cap"),
        }
    }
}

/// Terminal state of a page stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop {
    pub reason: StopReason,
    /// `true` when more data existed upstream at the time of stopping.
    pub truncated: bool,
}

/// Returns `true` when pagination must halt after the page just fetched.
#[must_use]
pub fn should_stop(
    rate_limited: bool,
    has_more: bool,
    pages_fetched: usize,
    hard_cap: Option<usize>,
) -> bool {
    rate_limited || !has_more || hard_cap.is_some_and(|cap| pages_fetched >= cap)
}

/// Stateful wrapper around [`should_stop`] that counts fetched pages.
#[derive(Debug, Clone, Copy)]
pub struct Sentinel {
    hard_cap: Option<usize>,
    pages_fetched: usize,
}

impl Sentinel {
    #[must_use]
    pub fn new(hard_cap: Option<usize>) -> Self {
        Self {
            hard_cap,
            pages_fetched: 0,
        }
    }

    #[must_use]
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Records one fetched page and returns the stop decision, if any.
    ///
    /// Rate limiting takes precedence over exhaustion, which takes precedence
    /// over the page cap.
    pub fn observe(&mut self, rate_limited: bool, has_more: bool) -> Option<Stop> {
        self.pages_fetched += 1;
        if !should_stop(rate_limited, has_more, self.pages_fetched, self.hard_cap) {
            return None;
        }

        let reason = if rate_limited {
            StopReason::RateLimited
        } else if !has_more {
            StopReason::Exhausted
        } else {
            StopReason::PageCap
        };

        Some(Stop {
            reason,
            truncated: has_more,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_stop_on_rate_limit() {
        assert!(should_stop(true, true, 1, None));
    }

    #[test]
    fn should_stop_when_no_more_pages() {
        assert!(should_stop(false, false, 1, None));
    }

    #[test]
    fn should_stop_at_hard_cap() {
        assert!(!should_stop(false, true, 9, Some(10)));
        assert!(should_stop(false, true, 10, Some(10)));
    }

    #[test]
    fn should_continue_without_cap() {
        assert!(!should_stop(false, true, 10_000, None));
    }

    #[test]
    fn exhaustion_is_not_truncated() {
        let mut sentinel = Sentinel::new(Some(10));
        assert_eq!(sentinel.observe(false, true), None);
        let stop = sentinel.observe(false, false).unwrap();
        assert_eq!(stop.reason, StopReason::Exhausted);
        assert!(!stop.truncated);
        assert_eq!(sentinel.pages_fetched(), 2);
    }

    #[test]
    fn rate_limit_with_more_pages_is_truncated() {
        let mut sentinel = Sentinel::new(None);
        let stop = sentinel.observe(true, true).unwrap();
        assert_eq!(stop.reason, StopReason::RateLimited);
        assert!(stop.truncated);
    }

    #[test]
    fn spent_quota_on_last_page_is_not_truncated() {
        let mut sentinel = Sentinel::new(None);
        let stop = sentinel.observe(true, false).unwrap();
        assert_eq!(stop.reason, StopReason::RateLimited);
        assert!(!stop.truncated);
    }

    #[test]
    fn page_cap_with_more_pages_is_truncated() {
        let mut sentinel = Sentinel::new(Some(2));
        assert_eq!(sentinel.observe(false, true), None);
        let stop = sentinel.observe(false, true).unwrap();
        assert_eq!(stop.reason, StopReason::PageCap);
        assert!(stop.truncated);
    }

    #[test]
    fn page_cap_on_final_page_reports_exhaustion() {
        let mut sentinel = Sentinel::new(Some(1));
        let stop = sentinel.observe(false, false).unwrap();
        assert_eq!(stop.reason, StopReason::Exhausted);
        assert!(!stop.truncated);
    }
}
