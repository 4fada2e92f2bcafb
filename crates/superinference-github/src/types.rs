//! GitHub REST and GraphQL response types.
//!
//! Listing endpoints are fetched as raw JSON and each record is decoded into
//! one of these types individually, so a malformed record can be skipped
//! without losing the rest of its page.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// REST
// ---------------------------------------------------------------------------

/// `GET /users/{username}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub blog: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub hireable: Option<bool>,
    #[serde(default)]
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    pub created_at: DateTime<Utc>,
}

/// `GET /user`, used to confirm which login an access token belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoOwner {
    pub login: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// One entry of a repository listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub fork: bool,
    pub owner: RepoOwner,
    /// Primary language as detected by GitHub.
    #[serde(default)]
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub languages_url: String,
    pub contributors_url: String,
    #[serde(default)]
    pub private: bool,
}

impl RepoSummary {
    /// Ranking key for popularity.
    #[must_use]
    pub fn stars_and_forks(&self) -> u64 {
        self.stargazers_count + self.forks_count
    }

    #[must_use]
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.owner.login.eq_ignore_ascii_case(username)
    }
}

/// `GET /repos/{owner}/{name}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoDetail {
    pub name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner: RepoOwner,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub subscribers_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    pub languages_url: String,
    pub events_url: String,
    pub contributors_url: String,
}

/// One entry of `GET /repos/{owner}/{name}/contributors`.
#[derive(Debug, Clone, Deserialize)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub repos_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub contributions: u64,
}

/// One entry of `GET /repos/{owner}/{name}/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoEvent {
    #[serde(rename = "type")]
    pub kind: String,
}

/// One entry of the tag catalogue used for key qualifications.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordChoice {
    pub label: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// GraphQL
// ---------------------------------------------------------------------------

/// Standard GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphqlEnvelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorItem>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlErrorItem {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl GraphqlErrorItem {
    #[must_use]
    pub fn is_rate_limit(&self) -> bool {
        self.kind.as_deref() == Some("RATE_LIMITED")
    }
}

/// `user.contributionsCollection.contributionCalendar` for one window.
#[derive(Debug, Deserialize)]
pub struct CalendarData {
    pub user: Option<CalendarUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarUser {
    pub contributions_collection: CalendarCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCollection {
    pub contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    #[serde(default)]
    pub weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWeek {
    /// Raw day records, decoded one at a time into [`ContributionDay`].
    #[serde(default)]
    pub contribution_days: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub contribution_count: u64,
}

/// Per-repository contributions of one user for one window.
#[derive(Debug, Deserialize)]
pub struct RepoContributionData {
    pub user: Option<RepoContributionUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoContributionUser {
    pub contributions_collection: RepoContributionCollection,
}

/// Raw records, decoded one at a time into [`RepositoryContribution`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoContributionCollection {
    #[serde(default)]
    pub commit_contributions_by_repository: Vec<serde_json::Value>,
    #[serde(default)]
    pub issue_contributions_by_repository: Vec<serde_json::Value>,
    #[serde(default)]
    pub pull_request_contributions_by_repository: Vec<serde_json::Value>,
    #[serde(default)]
    pub pull_request_review_contributions_by_repository: Vec<serde_json::Value>,
}

impl RepoContributionCollection {
    /// Commit, issue, pull-request and review records, in that order.
    pub fn into_records(self) -> impl Iterator<Item = serde_json::Value> {
        self.commit_contributions_by_repository
            .into_iter()
            .chain(self.issue_contributions_by_repository)
            .chain(self.pull_request_contributions_by_repository)
            .chain(self.pull_request_review_contributions_by_repository)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryContribution {
    pub repository: ContributedRepository,
    pub contributions: TotalCount,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributedRepository {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub languages: LanguageConnection,
    pub owner: ContributedOwner,
    #[serde(default)]
    pub is_private: bool,
}

impl ContributedRepository {
    #[must_use]
    pub fn top_language(&self) -> Option<&str> {
        self.languages.nodes.first().map(|n| n.name.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageConnection {
    #[serde(default)]
    pub nodes: Vec<LanguageNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageNode {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributedOwner {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u64,
}
