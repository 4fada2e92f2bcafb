/// Tag catalogue used to extract key qualifications from bios and READMEs.
pub const DEFAULT_KEYWORDS_URL: &str =
    "https://raw.githubusercontent.com/supertypeai/collective/main/src/data/profileTagsChoices.json";

#[derive(Clone)]
pub struct AppConfig {
    pub github_api_url: String,
    pub devto_api_url: String,
    pub keywords_url: String,
    pub github_access_token: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_pages: usize,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("github_api_url", &self.github_api_url)
            .field("devto_api_url", &self.devto_api_url)
            .field("keywords_url", &self.keywords_url)
            .field(
                "github_access_token",
                &self.github_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_pages", &self.max_pages)
            .field("log_level", &self.log_level)
            .finish()
    }
}
