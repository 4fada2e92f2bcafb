//! Single-repository inference: metadata, languages, contributors and events.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use superinference_core::{round3, Ranked, Tally};

use crate::client::{GithubClient, ListingOutcome, EVENTS_PAGE_CAP, PER_PAGE};
use crate::error::GithubError;
use crate::types::{Contributor, RepoDetail, RepoEvent};

#[derive(Debug, Clone, Serialize)]
pub struct ContributorShare {
    pub contributor_username: String,
    pub contributor_html_url: Option<String>,
    pub contributor_repos_url: Option<String>,
    pub contributor_type: Option<String>,
    pub contributions: u64,
    /// `null` when the repository has no contributions at all.
    pub contributions_percentage: Option<f64>,
}

/// Inference result for one repository; keys serialize in this order.
#[derive(Debug, Clone, Serialize)]
pub struct RepoInference {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub owner_username: String,
    pub owner_html_url: Option<String>,
    pub topic: Vec<String>,
    pub visibility: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_pushed_at: Option<DateTime<Utc>>,
    pub top_language: Option<String>,
    /// Byte share per language; `null` when unavailable.
    pub languages_percentage: Option<Ranked<f64>>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub watchers_count: u64,
    pub subscribers_count: u64,
    pub open_issues_count: u64,
    pub incomplete_contribution_results: bool,
    pub inference_from_contribution_count: usize,
    pub contributors_count: usize,
    pub contributions_count: u64,
    pub contributions: Vec<ContributorShare>,
    pub incomplete_event_results: bool,
    pub inference_from_event_count: usize,
    pub events_count: Ranked<u64>,
}

/// Inference for `owner/name`.
pub struct GithubRepo<'a> {
    client: &'a GithubClient,
    owner: String,
    name: String,
}

impl<'a> GithubRepo<'a> {
    #[must_use]
    pub fn new(client: &'a GithubClient, owner: &str, name: &str) -> Self {
        Self {
            client,
            owner: owner.to_owned(),
            name: name.to_owned(),
        }
    }

    /// Fetches the repository and folds its languages, contributors and
    /// recent events (at most 300, the upstream limit).
    ///
    /// # Errors
    ///
    /// Only the repository fetch can fail the call; see
    /// [`GithubClient::get_json`]. Later passes degrade to incomplete results.
    pub async fn perform_inference(&self) -> Result<RepoInference, GithubError> {
        let url = self.client.endpoint(&format!("/repos/{}/{}", self.owner, self.name));
        tracing::debug!(repo = %url, "fetching repository");
        let detail: RepoDetail = self.client.get_json(&url).await?;

        let (languages_percentage, mut throttled) = self.languages(&detail.languages_url).await;

        let mut contributors = Vec::new();
        let contributors_outcome = if throttled {
            ListingOutcome::skipped()
        } else {
            let first = format!("{}?per_page={PER_PAGE}", detail.contributors_url);
            self.client
                .fold_listing(&first, self.client.listing_cap(&first), |c: Contributor| {
                    contributors.push(c);
                })
                .await
        };
        if contributors_outcome.failed() {
            contributors.clear();
        }
        throttled |= contributors_outcome.rate_limited();

        let mut events = Tally::new();
        let events_outcome = if throttled {
            ListingOutcome::skipped()
        } else {
            let first = format!("{}?per_page={PER_PAGE}", detail.events_url);
            self.client
                .fold_listing(&first, EVENTS_PAGE_CAP, |e: RepoEvent| events.add(&e.kind, 1))
                .await
        };
        if events_outcome.failed() {
            events = Tally::new();
        }

        let contributions_count: u64 = contributors.iter().map(|c| c.contributions).sum();
        let contributions = contributors
            .into_iter()
            .map(|c| ContributorShare {
                contributions_percentage: share(c.contributions, contributions_count),
                contributor_username: c.login,
                contributor_html_url: c.html_url,
                contributor_repos_url: c.repos_url,
                contributor_type: c.kind,
                contributions: c.contributions,
            })
            .collect::<Vec<_>>();

        Ok(RepoInference {
            name: detail.name,
            html_url: detail.html_url,
            description: detail.description,
            owner_username: detail.owner.login,
            owner_html_url: detail.owner.html_url,
            topic: detail.topics,
            visibility: detail.visibility,
            created_at: detail.created_at,
            last_pushed_at: detail.pushed_at,
            top_language: detail.language,
            languages_percentage,
            stargazers_count: detail.stargazers_count,
            forks_count: detail.forks_count,
            watchers_count: detail.watchers_count,
            subscribers_count: detail.subscribers_count,
            open_issues_count: detail.open_issues_count,
            incomplete_contribution_results: contributors_outcome.completion().incomplete,
            inference_from_contribution_count: contributions.len(),
            contributors_count: contributions.len(),
            contributions_count,
            contributions,
            incomplete_event_results: events_outcome.completion().incomplete,
            inference_from_event_count: events.folded(),
            events_count: events.ranked(),
        })
    }

    /// Language byte shares, and whether the request was refused.
    async fn languages(&self, url: &str) -> (Option<Ranked<f64>>, bool) {
        let page = match self.client.fetch_page(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(url, error = %e, "repository languages unavailable; languages_percentage left null");
                return (None, false);
            }
        };
        let throttled = page.rate_limited;
        if page.is_refused() {
            tracing::warn!(url, "repository languages refused; languages_percentage left null");
        }

        let mut bytes = Tally::new();
        for raw in page.records {
            let Value::Object(languages) = raw else {
                tracing::warn!(url, "skipping malformed languages record");
                continue;
            };
            for (language, count) in languages {
                match count.as_u64() {
                    Some(count) => bytes.add(&language, count),
                    None => tracing::warn!(url, language = %language, "skipping malformed language byte count"),
                }
            }
        }
        (bytes.percentages(), throttled)
    }
}

fn share(part: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = part as f64 / total as f64;
    Some(round3(ratio))
}
