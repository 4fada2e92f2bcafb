use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.github_api_url, "https://api.github.com");
    assert_eq!(cfg.devto_api_url, "https://dev.to/api");
    assert_eq!(cfg.keywords_url, DEFAULT_KEYWORDS_URL);
    assert!(cfg.github_access_token.is_none());
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "superinference/0.1");
    assert_eq!(cfg.max_pages, 30);
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn build_app_config_reads_token() {
    let mut map = HashMap::new();
    map.insert("GITHUB_ACCESS_TOKEN", "ghp_test");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.github_access_token.as_deref(), Some("ghp_test"));
}

#[test]
fn build_app_config_treats_blank_token_as_absent() {
    let mut map = HashMap::new();
    map.insert("GITHUB_ACCESS_TOKEN", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.github_access_token.is_none());
}

#[test]
fn build_app_config_overrides_api_urls() {
    let mut map = HashMap::new();
    map.insert("SUPERINFERENCE_GITHUB_API_URL", "http://localhost:9000");
    map.insert("SUPERINFERENCE_DEVTO_API_URL", "http://localhost:9001/api");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.github_api_url, "http://localhost:9000");
    assert_eq!(cfg.devto_api_url, "http://localhost:9001/api");
}

#[test]
fn build_app_config_fails_with_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("SUPERINFERENCE_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SUPERINFERENCE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(SUPERINFERENCE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_max_pages_override() {
    let mut map = HashMap::new();
    map.insert("SUPERINFERENCE_MAX_PAGES", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_pages, 5);
}

#[test]
fn build_app_config_rejects_zero_max_pages() {
    let mut map = HashMap::new();
    map.insert("SUPERINFERENCE_MAX_PAGES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SUPERINFERENCE_MAX_PAGES"),
        "expected InvalidEnvVar(SUPERINFERENCE_MAX_PAGES), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_token() {
    let mut map = HashMap::new();
    map.insert("GITHUB_ACCESS_TOKEN", "ghp_secret_value");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("ghp_secret_value"));
    assert!(rendered.contains("[redacted]"));
}
