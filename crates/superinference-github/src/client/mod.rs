//! HTTP client for the GitHub REST and GraphQL APIs.

mod graphql;
mod listing;

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use superinference_core::{AccessLevel, AppConfig, Page};

use crate::error::GithubError;
use crate::pagination::extract_next_link;
use crate::rate_limit::{is_rate_limited, quota_exhausted};
use crate::types::AuthenticatedUser;

pub use graphql::{CALENDAR_QUERY, REPO_CONTRIBUTIONS_QUERY};
pub use listing::ListingOutcome;

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const DEFAULT_USER_AGENT: &str = "superinference/0.1";
const DEFAULT_MAX_PAGES: usize = 30;

const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Records requested per listing page.
pub const PER_PAGE: u32 = 100;

/// Repository events are capped upstream at 300 (3 pages of 100).
pub const EVENTS_PAGE_CAP: usize = 3;

/// Search endpoints serve at most 1000 results (10 pages of 100).
pub const SEARCH_PAGE_CAP: usize = 10;

/// Outcome of a single request before its body is read.
enum Reply {
    Body(reqwest::Response),
    RateLimited,
}

/// Client for the GitHub API.
///
/// Holds the HTTP connection pool, the optional access token, and the base
/// URL. Use [`GithubClient::new`] for production or
/// [`GithubClient::with_base_url`] to point at a mock server in tests.
pub struct GithubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    max_pages: usize,
}

impl GithubClient {
    /// Creates a client pointed at the production GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: Option<&str>, timeout_secs: u64) -> Result<Self, GithubError> {
        Self::with_base_url(DEFAULT_BASE_URL, token, timeout_secs, DEFAULT_USER_AGENT)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// Blank tokens are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GithubError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GithubError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| GithubError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: trimmed.to_owned(),
            token: token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Creates a client from the loaded application config.
    ///
    /// `token` overrides the configured access token when given.
    ///
    /// # Errors
    ///
    /// See [`GithubClient::with_base_url`].
    pub fn from_config(config: &AppConfig, token: Option<&str>) -> Result<Self, GithubError> {
        let token = token.or(config.github_access_token.as_deref());
        Ok(Self::with_base_url(
            &config.github_api_url,
            token,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_max_pages(config.max_pages))
    }

    /// Sets the page cap for general listing endpoints.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    #[must_use]
    pub fn access_level(&self) -> AccessLevel {
        AccessLevel::from_token(self.token.as_deref())
    }

    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Hard page cap for a listing URL.
    #[must_use]
    pub fn listing_cap(&self, url: &str) -> usize {
        if url.contains("/search/") {
            SEARCH_PAGE_CAP.min(self.max_pages)
        } else {
            self.max_pages
        }
    }

    /// Absolute URL for an API path such as `/users/octocat`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetches one page of records.
    ///
    /// A JSON array body yields one record per element; any other JSON body
    /// is a single-record page. An empty body (e.g. `204 No Content`) is an
    /// empty page. A rate-limit refusal is returned as [`Page::refused`]
    /// rather than an error, and a successful response reporting a spent
    /// quota keeps its records with `rate_limited` set.
    ///
    /// # Errors
    ///
    /// - [`GithubError::NotFound`] on 404.
    /// - [`GithubError::Unauthorized`] on 401.
    /// - [`GithubError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`GithubError::Http`] on network failure.
    /// - [`GithubError::Deserialize`] if the body is not valid JSON.
    pub async fn fetch_page(&self, url: &str) -> Result<Page<Value>, GithubError> {
        let request = self.authorized(self.client.get(url)).header(ACCEPT, JSON_MEDIA_TYPE);
        let response = match self.send(request, url).await? {
            Reply::Body(response) => response,
            Reply::RateLimited => return Ok(Page::refused(url)),
        };

        let next = extract_next_link(
            response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok()),
        );
        let spent = quota_exhausted(response.headers());

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Page::new(Vec::new(), next, spent));
        }
        let parsed: Value =
            serde_json::from_str(&body).map_err(|e| GithubError::Deserialize {
                context: url.to_owned(),
                source: e,
            })?;
        let records = match parsed {
            Value::Array(items) => items,
            other => vec![other],
        };

        Ok(Page::new(records, next, spent))
    }

    /// Fetches a single required resource and decodes it.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::RateLimited`] if the request is refused, plus
    /// every error of [`GithubClient::fetch_page`].
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GithubError> {
        let page = self.fetch_page(url).await?;
        if page.is_refused() {
            return Err(GithubError::RateLimited {
                url: url.to_owned(),
            });
        }
        let raw = page.records.into_iter().next().unwrap_or(Value::Null);
        serde_json::from_value(raw).map_err(|e| GithubError::Deserialize {
            context: url.to_owned(),
            source: e,
        })
    }

    /// Fetches the raw profile README of `username`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::RateLimited`] if refused, or any transport error.
    pub async fn readme(&self, username: &str) -> Result<Option<String>, GithubError> {
        let url = self.endpoint(&format!("/repos/{username}/{username}/readme"));
        let request = self.authorized(self.client.get(&url)).header(ACCEPT, RAW_MEDIA_TYPE);
        match self.send(request, &url).await {
            Ok(Reply::Body(response)) => Ok(Some(response.text().await?)),
            Ok(Reply::RateLimited) => Err(GithubError::RateLimited { url }),
            Err(GithubError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetches JSON from a host outside the API without sending the token.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::Http`] on network failure or a non-2xx status,
    /// or [`GithubError::Deserialize`] if the body does not decode.
    pub async fn get_external_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GithubError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GithubError::Deserialize {
            context: url.to_owned(),
            source: e,
        })
    }

    /// Login of the user the access token belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`GithubError::TokenRequired`] without a token, plus every
    /// error of [`GithubClient::get_json`].
    pub async fn authenticated_login(&self) -> Result<String, GithubError> {
        if self.token.is_none() {
            return Err(GithubError::TokenRequired);
        }
        let user: AuthenticatedUser = self.get_json(&self.endpoint("/user")).await?;
        Ok(user.login)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("token {token}")),
            None => request,
        }
    }

    /// Sends `request` and classifies the response status.
    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Reply, GithubError> {
        let response = request.send().await?;
        let status = response.status();

        if is_rate_limited(status, response.headers()) {
            tracing::warn!(url, status = status.as_u16(), "GitHub rate limit reached");
            return Ok(Reply::RateLimited);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(GithubError::Unauthorized {
                url: url.to_owned(),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(GithubError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            return Err(GithubError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(Reply::Body(response))
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
