//! Integration tests for `GithubRepo` using wiremock HTTP mocks.

use serde_json::{json, Value};
use superinference_github::{GithubClient, GithubError, GithubRepo};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GithubClient {
    GithubClient::with_base_url(base_url, Some("test-token"), 30, "superinference-test")
        .expect("client construction should not fail")
}

fn detail_json(base: &str) -> Value {
    json!({
        "name": "hello",
        "html_url": "https://github.com/octocat/hello",
        "description": "My first repository",
        "owner": { "login": "octocat", "html_url": "https://github.com/octocat" },
        "topics": ["demo", "rust"],
        "visibility": "public",
        "created_at": "2020-01-26T19:01:12Z",
        "pushed_at": "2024-05-01T10:00:00Z",
        "language": "Rust",
        "stargazers_count": 80,
        "forks_count": 9,
        "watchers_count": 80,
        "subscribers_count": 12,
        "open_issues_count": 4,
        "languages_url": format!("{base}/repos/octocat/hello/languages"),
        "events_url": format!("{base}/repos/octocat/hello/events"),
        "contributors_url": format!("{base}/repos/octocat/hello/contributors")
    })
}

fn events(kind: &str, n: usize) -> Value {
    Value::Array((0..n).map(|_| json!({ "type": kind })).collect())
}

async fn mount_detail(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_json(&server.uri())))
        .mount(server)
        .await;
}

#[tokio::test]
async fn repository_inference_folds_every_pass() {
    let server = MockServer::start().await;
    mount_detail(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Rust": 900, "Shell": 100 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/contributors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "login": "octocat", "type": "User", "contributions": 2 },
            { "login": "bob", "type": "User", "contributions": 1 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "type": "PushEvent" },
            { "type": "WatchEvent" },
            { "type": "PushEvent" },
            { "no_type": true }
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let repo = GithubRepo::new(&client, "octocat", "hello")
        .perform_inference()
        .await
        .expect("inference should succeed");

    assert_eq!(repo.name, "hello");
    assert_eq!(repo.owner_username, "octocat");
    assert_eq!(repo.topic, vec!["demo", "rust"]);
    assert_eq!(repo.top_language.as_deref(), Some("Rust"));
    let pct = repo.languages_percentage.as_ref().unwrap();
    assert_eq!(pct.get("Rust"), Some(&0.9));

    assert!(!repo.incomplete_contribution_results);
    assert_eq!(repo.contributors_count, 2);
    assert_eq!(repo.contributions_count, 3);
    assert_eq!(repo.contributions[0].contributor_username, "octocat");
    assert_eq!(repo.contributions[0].contributions_percentage, Some(0.667));
    assert_eq!(repo.contributions[1].contributions_percentage, Some(0.333));

    assert!(!repo.incomplete_event_results);
    assert_eq!(repo.inference_from_event_count, 3);
    assert_eq!(repo.events_count.get("PushEvent"), Some(&2));
    assert_eq!(repo.events_count.keys().next(), Some("PushEvent"));

    let text = serde_json::to_string(&repo).unwrap();
    assert!(text.starts_with(r#"{"name":"hello""#));
    let events_at = text.find(r#""events_count""#).unwrap();
    assert!(text.find(r#""incomplete_event_results""#).unwrap() < events_at);
}

#[tokio::test]
async fn events_stop_at_three_pages() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_detail(&server).await;
    let events_link =
        |page: u32| format!(r#"<{base}/repos/octocat/hello/events?per_page=100&page={page}>; rel="next""#);

    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(events("PushEvent", 100))
                .insert_header("link", events_link(2).as_str()),
        )
        .with_priority(10)
        .mount(&server)
        .await;
    for page in 2..=3u32 {
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/events"))
            .and(query_param("page", page.to_string().as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(events("IssuesEvent", 100))
                    .insert_header("link", events_link(page + 1).as_str()),
            )
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/events"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(events("PushEvent", 100)))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&base);
    let repo = GithubRepo::new(&client, "octocat", "hello")
        .perform_inference()
        .await
        .expect("inference should succeed");

    assert!(repo.incomplete_event_results);
    assert_eq!(repo.inference_from_event_count, 300);
    assert_eq!(repo.events_count.get("IssuesEvent"), Some(&200));
    assert_eq!(repo.events_count.keys().next(), Some("IssuesEvent"));
}

#[tokio::test]
async fn throttled_contributors_skip_events() {
    let server = MockServer::start().await;
    mount_detail(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Rust": 1 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/contributors"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let repo = GithubRepo::new(&client, "octocat", "hello")
        .perform_inference()
        .await
        .expect("a rate limit degrades instead of failing");

    assert!(repo.incomplete_contribution_results);
    assert!(repo.contributions.is_empty());
    assert!(repo.incomplete_event_results);
    assert_eq!(repo.inference_from_event_count, 0);
}

#[tokio::test]
async fn failing_languages_fetch_leaves_other_passes_intact() {
    let server = MockServer::start().await;
    mount_detail(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/languages"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/contributors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "login": "octocat", "type": "User", "contributions": 4 }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(events("PushEvent", 2)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let repo = GithubRepo::new(&client, "octocat", "hello")
        .perform_inference()
        .await
        .expect("a failing languages fetch does not fail the call");

    assert!(repo.languages_percentage.is_none());
    assert!(!repo.incomplete_contribution_results);
    assert_eq!(repo.contributors_count, 1);
    assert!(!repo.incomplete_event_results);
    assert_eq!(repo.events_count.get("PushEvent"), Some(&2));
}

#[tokio::test]
async fn missing_repository_is_not_found() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());
    let result = GithubRepo::new(&client, "octocat", "nope").perform_inference().await;
    assert!(matches!(result, Err(GithubError::NotFound { .. })));
}
