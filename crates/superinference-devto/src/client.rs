//! HTTP client for the public Dev.to API.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use superinference_core::{AppConfig, Page};

use crate::error::DevtoError;
use crate::types::DevtoUser;

const DEFAULT_BASE_URL: &str = "https://dev.to/api";
const DEFAULT_USER_AGENT: &str = "superinference/0.1";
const DEFAULT_MAX_PAGES: usize = 30;

/// Articles requested per page.
pub const ARTICLES_PER_PAGE: usize = 100;

/// Client for the Dev.to API. All calls are unauthenticated.
pub struct DevtoClient {
    client: Client,
    base_url: String,
    max_pages: usize,
    page_size: usize,
}

impl DevtoClient {
    /// Creates a client pointed at the production Dev.to API.
    ///
    /// # Errors
    ///
    /// Returns [`DevtoError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, DevtoError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, DEFAULT_USER_AGENT)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DevtoError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DevtoError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, DevtoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| DevtoError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: trimmed.to_owned(),
            max_pages: DEFAULT_MAX_PAGES,
            page_size: ARTICLES_PER_PAGE,
        })
    }

    /// # Errors
    ///
    /// See [`DevtoClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, DevtoError> {
        Ok(Self::with_base_url(
            &config.devto_api_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_max_pages(config.max_pages))
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Overrides the article page size; a page shorter than this ends the
    /// listing.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Fetches a user's public profile.
    ///
    /// # Errors
    ///
    /// - [`DevtoError::InvalidUsername`] on 404.
    /// - [`DevtoError::RateLimited`] on 429.
    /// - [`DevtoError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`DevtoError::Http`] / [`DevtoError::Deserialize`] on transport or
    ///   decoding failures.
    pub async fn get_user(&self, username: &str) -> Result<DevtoUser, DevtoError> {
        let url = format!("{}/users/by_username", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("url", username)])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(DevtoError::InvalidUsername {
                    username: username.to_owned(),
                })
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(DevtoError::RateLimited { url }),
            status if !status.is_success() => {
                return Err(DevtoError::UnexpectedStatus {
                    status: status.as_u16(),
                    url,
                })
            }
            _ => {}
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DevtoError::Deserialize {
            context: format!("Dev.to user {username}"),
            source: e,
        })
    }

    /// Fetches one page (1-based) of a user's published articles.
    ///
    /// Dev.to sends no continuation links: a full page implies another one.
    /// A 429 is returned as [`Page::refused`] with this page as the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`DevtoError::UnexpectedStatus`] on non-2xx statuses other
    /// than 429, or [`DevtoError::Http`] / [`DevtoError::Deserialize`] on
    /// transport or decoding failures.
    pub async fn fetch_articles_page(
        &self,
        username: &str,
        page: usize,
    ) -> Result<Page<Value>, DevtoError> {
        let url = format!("{}/articles", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("username", username.to_owned()),
                ("per_page", self.page_size.to_string()),
                ("page", page.to_string()),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(url, page, "Dev.to rate limit reached");
            return Ok(Page::refused(page.to_string()));
        }
        if !status.is_success() {
            return Err(DevtoError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let records: Vec<Value> =
            serde_json::from_str(&body).map_err(|e| DevtoError::Deserialize {
                context: format!("{url} page {page}"),
                source: e,
            })?;
        let next = (records.len() >= self.page_size).then(|| (page + 1).to_string());
        Ok(Page::new(records, next, false))
    }
}
