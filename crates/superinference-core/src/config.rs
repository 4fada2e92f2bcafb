use crate::app_config::{AppConfig, DEFAULT_KEYWORDS_URL};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let github_api_url = or_default("SUPERINFERENCE_GITHUB_API_URL", "https://api.github.com");
    let devto_api_url = or_default("SUPERINFERENCE_DEVTO_API_URL", "https://dev.to/api");
    let keywords_url = or_default("SUPERINFERENCE_KEYWORDS_URL", DEFAULT_KEYWORDS_URL);
    let github_access_token = lookup("GITHUB_ACCESS_TOKEN")
        .ok()
        .filter(|token| !token.trim().is_empty());

    let request_timeout_secs = parse_u64("SUPERINFERENCE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SUPERINFERENCE_USER_AGENT", "superinference/0.1");
    let max_pages = parse_usize("SUPERINFERENCE_MAX_PAGES", "30")?;
    if max_pages == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SUPERINFERENCE_MAX_PAGES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let log_level = or_default("SUPERINFERENCE_LOG_LEVEL", "info");

    Ok(AppConfig {
        github_api_url,
        devto_api_url,
        keywords_url,
        github_access_token,
        request_timeout_secs,
        user_agent,
        max_pages,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
