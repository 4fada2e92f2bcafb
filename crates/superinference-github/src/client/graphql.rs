//! GitHub GraphQL queries and transport.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::json;
use superinference_core::Page;

use crate::error::GithubError;
use crate::rate_limit::{is_rate_limited, quota_exhausted};
use crate::types::GraphqlEnvelope;

use super::GithubClient;

/// Daily contribution calendar of `$login` between `$from` and `$to`.
pub const CALENDAR_QUERY: &str = r"
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
  }
}";

/// Commit, issue, pull-request and review contributions of `$login`
/// between `$from` and `$to`, grouped by repository.
pub const REPO_CONTRIBUTIONS_QUERY: &str = r"
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      commitContributionsByRepository(maxRepositories: 100) {
        repository { ...ContributedRepo }
        contributions { totalCount }
      }
      issueContributionsByRepository(maxRepositories: 100) {
        repository { ...ContributedRepo }
        contributions { totalCount }
      }
      pullRequestContributionsByRepository(maxRepositories: 100) {
        repository { ...ContributedRepo }
        contributions { totalCount }
      }
      pullRequestReviewContributionsByRepository(maxRepositories: 100) {
        repository { ...ContributedRepo }
        contributions { totalCount }
      }
    }
  }
}

fragment ContributedRepo on Repository {
  name
  description
  url
  isPrivate
  languages(first: 1, orderBy: {field: SIZE, direction: DESC}) {
    nodes { name }
  }
  owner {
    __typename
    login
  }
}";

impl GithubClient {
    /// Runs a GraphQL query and decodes its `data` member.
    ///
    /// The result is a one-record page; a refusal (HTTP or a `RATE_LIMITED`
    /// GraphQL error) is an empty refused page with `cursor` as its `next`.
    ///
    /// # Errors
    ///
    /// - [`GithubError::TokenRequired`] when the client has no token.
    /// - [`GithubError::Graphql`] when the response carries query errors or
    ///   no data.
    /// - [`GithubError::Unauthorized`] / [`GithubError::UnexpectedStatus`] on
    ///   non-2xx statuses.
    /// - [`GithubError::Http`] / [`GithubError::Deserialize`] on transport or
    ///   decoding failures.
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        cursor: &str,
    ) -> Result<Page<T>, GithubError> {
        if self.token.is_none() {
            return Err(GithubError::TokenRequired);
        }
        let url = self.endpoint("/graphql");
        let response = self
            .authorized(self.client.post(&url))
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        let status = response.status();

        if is_rate_limited(status, response.headers()) {
            tracing::warn!(url, status = status.as_u16(), "GitHub GraphQL rate limit reached");
            return Ok(Page::refused(cursor));
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(GithubError::Unauthorized { url });
        }
        if !status.is_success() {
            return Err(GithubError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let spent = quota_exhausted(response.headers());
        let body = response.text().await?;
        let envelope: GraphqlEnvelope<T> =
            serde_json::from_str(&body).map_err(|e| GithubError::Deserialize {
                context: format!("GraphQL response from {url}"),
                source: e,
            })?;

        if envelope.errors.iter().any(|e| e.is_rate_limit()) {
            tracing::warn!(url, "GitHub GraphQL rate limit reached");
            return Ok(Page::refused(cursor));
        }
        if let Some(first) = envelope.errors.first() {
            return Err(GithubError::Graphql(first.message.clone()));
        }
        let data = envelope
            .data
            .ok_or_else(|| GithubError::Graphql("response carried no data".to_owned()))?;

        Ok(Page::new(vec![data], None, spent))
    }
}
