use serde_json::json;
use superinference_core::StopReason;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn test_client(base_url: &str, token: Option<&str>) -> GithubClient {
    GithubClient::with_base_url(base_url, token, 30, "superinference-test")
        .expect("client construction should not fail")
}

#[test]
fn endpoint_strips_trailing_slash() {
    let client = test_client("https://api.github.com/", None);
    assert_eq!(
        client.endpoint("/users/octocat"),
        "https://api.github.com/users/octocat"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = GithubClient::with_base_url("not a url", None, 30, "ua");
    assert!(matches!(result, Err(GithubError::InvalidBaseUrl { .. })));
}

#[test]
fn access_level_follows_token() {
    assert_eq!(
        test_client("https://api.github.com", None).access_level(),
        AccessLevel::Public
    );
    assert_eq!(
        test_client("https://api.github.com", Some("  ")).access_level(),
        AccessLevel::Public
    );
    assert_eq!(
        test_client("https://api.github.com", Some("ghp_abc")).access_level(),
        AccessLevel::Authenticated
    );
}

#[test]
fn search_listings_use_search_cap() {
    let client = test_client("https://api.github.com", None).with_max_pages(50);
    assert_eq!(
        client.listing_cap("https://api.github.com/search/repositories?q=x"),
        SEARCH_PAGE_CAP
    );
    assert_eq!(client.listing_cap("https://api.github.com/users/x/repos"), 50);
}

#[test]
fn zero_max_pages_is_clamped() {
    let client = test_client("https://api.github.com", None).with_max_pages(0);
    assert_eq!(client.max_pages(), 1);
}

#[test]
fn from_config_prefers_explicit_token() {
    let config = AppConfig {
        github_api_url: "https://ghe.example.com/api/v3".to_owned(),
        devto_api_url: "https://dev.to/api".to_owned(),
        keywords_url: superinference_core::DEFAULT_KEYWORDS_URL.to_owned(),
        github_access_token: None,
        request_timeout_secs: 5,
        user_agent: "ua".to_owned(),
        max_pages: 7,
        log_level: "info".to_owned(),
    };
    let public = GithubClient::from_config(&config, None).unwrap();
    assert_eq!(public.access_level(), AccessLevel::Public);
    assert_eq!(public.max_pages(), 7);
    assert_eq!(
        public.endpoint("/user"),
        "https://ghe.example.com/api/v3/user"
    );

    let authed = GithubClient::from_config(&config, Some("ghp_x")).unwrap();
    assert_eq!(authed.access_level(), AccessLevel::Authenticated);
}

#[tokio::test]
async fn fold_each_stops_after_empty_page_with_spent_quota() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/a/contributors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .insert_header("x-ratelimit-remaining", "0"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/b/contributors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "login": "bob", "contributions": 2 }
        ])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), None);
    let urls = vec![
        client.endpoint("/repos/octocat/a/contributors"),
        client.endpoint("/repos/octocat/b/contributors"),
    ];
    let mut folded = Vec::new();
    let outcome = client
        .fold_each("contributors", &urls, |idx, raw| folded.push((idx, raw)))
        .await;

    assert!(folded.is_empty());
    assert_eq!(outcome.stop.map(|s| s.reason), Some(StopReason::RateLimited));
    assert!(outcome.rate_limited());
    let completion = outcome.completion();
    assert!(completion.incomplete);
    assert_eq!(completion.count, 0);
}

#[tokio::test]
async fn fold_each_spent_quota_on_last_url_is_complete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/a/languages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "Rust": 10 }))
                .insert_header("x-ratelimit-remaining", "0"),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), None);
    let urls = vec![client.endpoint("/repos/octocat/a/languages")];
    let outcome = client.fold_each("languages", &urls, |_, _| {}).await;

    assert_eq!(outcome.folded, 1);
    assert!(!outcome.completion().incomplete);
}
