//! GitHub profile inference.
//!
//! One call runs a fixed sequence of passes: profile, repositories, languages
//! and, for authenticated calls, contributions. Each pass walks its listing
//! under the page sentinel; once a pass stops on a rate limit, every later
//! pass is skipped and its section is flagged incomplete.

mod contribution;
mod keywords;
mod repos;
mod sections;
mod skill;

use chrono::{DateTime, Utc};
use superinference_core::{AccessLevel, DEFAULT_KEYWORDS_URL};

use crate::client::{GithubClient, PER_PAGE};
use crate::error::GithubError;
use crate::types::GithubUser;

pub use sections::{
    ContributionSection, InferredProfile, OtherRepoContribution, ProfileSection, RepoHighlight,
    SkillSection, StarsForks, StatsSection,
};

use contribution::{contribution_pass, ContributionInputs};
use repos::repository_pass;
use skill::{language_pass, skill_section};

/// Tunable parameters of a profile inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceParams {
    pub top_repo_n: usize,
    pub top_language_n: usize,
    pub closest_user_n: usize,
    /// Include private repositories; honored only when the access token
    /// belongs to the inferred user.
    pub include_private: bool,
}

impl Default for InferenceParams {
    fn default() -> Self {
        Self {
            top_repo_n: 3,
            top_language_n: 3,
            closest_user_n: 5,
            include_private: false,
        }
    }
}

/// Profile inference for one GitHub user.
pub struct GithubProfile<'a> {
    client: &'a GithubClient,
    username: String,
    keywords_url: String,
}

impl<'a> GithubProfile<'a> {
    #[must_use]
    pub fn new(client: &'a GithubClient, username: &str) -> Self {
        Self {
            client,
            username: username.to_owned(),
            keywords_url: DEFAULT_KEYWORDS_URL.to_owned(),
        }
    }

    /// Overrides the tag catalogue used for key qualifications.
    #[must_use]
    pub fn with_keywords_url(mut self, keywords_url: &str) -> Self {
        keywords_url.clone_into(&mut self.keywords_url);
        self
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Runs every pass and assembles the profile.
    ///
    /// # Errors
    ///
    /// Only the initial profile fetch can fail the call:
    /// - [`GithubError::NotFound`] for an unknown user.
    /// - [`GithubError::Unauthorized`] for a rejected token.
    /// - [`GithubError::RateLimited`] when the profile request is refused.
    /// - [`GithubError::Http`] / [`GithubError::Deserialize`] on transport failures.
    pub async fn perform_inference(
        &self,
        params: &InferenceParams,
    ) -> Result<InferredProfile, GithubError> {
        self.perform_inference_at(params, Utc::now()).await
    }

    /// [`GithubProfile::perform_inference`] with an explicit "now", which
    /// anchors the last-12-months window and the weekly average.
    ///
    /// # Errors
    ///
    /// See [`GithubProfile::perform_inference`].
    pub async fn perform_inference_at(
        &self,
        params: &InferenceParams,
        now: DateTime<Utc>,
    ) -> Result<InferredProfile, GithubError> {
        let access = self.client.access_level();
        let username = self.username.as_str();
        tracing::debug!(username, %access, "fetching profile");

        let user: GithubUser = self
            .client
            .get_json(&self.client.endpoint(&format!("/users/{username}")))
            .await?;

        let include_private = params.include_private && self.private_access_confirmed().await;
        let repos_url = if include_private {
            self.client
                .endpoint(&format!("/user/repos?per_page={PER_PAGE}"))
        } else {
            self.client
                .endpoint(&format!("/users/{username}/repos?per_page={PER_PAGE}"))
        };

        tracing::debug!(username, include_private, "fetching repositories");
        let repos = repository_pass(self.client, &repos_url, username, params.top_repo_n).await;
        let mut throttled = repos.outcome.rate_limited();

        tracing::debug!(username, originals = repos.originals.len(), "fetching languages");
        let languages = language_pass(self.client, &repos.originals, throttled).await;
        throttled |= languages.outcome.as_ref().is_some_and(|o| o.rate_limited());

        let key_qualifications = keywords::key_qualifications(
            self.client,
            &self.keywords_url,
            username,
            user.bio.as_deref(),
            !throttled,
        )
        .await;
        let skill = skill_section(
            access,
            &languages,
            repos.originals.len(),
            key_qualifications,
            params.top_language_n,
        );

        let contribution = if access.is_authenticated() {
            tracing::debug!(username, "fetching contributions");
            let inputs = ContributionInputs {
                username,
                created_at: user.created_at,
                now,
                include_private,
                closest_user_n: params.closest_user_n,
                popular: &repos.popular,
            };
            Some(contribution_pass(self.client, &inputs, throttled).await)
        } else {
            None
        };

        tracing::debug!(username, "assembling profile");
        Ok(InferredProfile {
            profile: ProfileSection::from(&user),
            skill,
            stats: repos.stats,
            contribution,
        })
    }

    /// Whether private repositories may be included: the client must carry a
    /// token that belongs to this user. Otherwise degrades with a warning.
    async fn private_access_confirmed(&self) -> bool {
        if self.client.access_level() == AccessLevel::Public {
            tracing::warn!(
                username = %self.username,
                "include_private requires an access token; using public repositories"
            );
            return false;
        }
        match self.client.authenticated_login().await {
            Ok(login) if login.eq_ignore_ascii_case(&self.username) => true,
            Ok(login) => {
                tracing::warn!(
                    username = %self.username,
                    token_owner = %login,
                    "access token belongs to another user; using public repositories"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    username = %self.username,
                    error = %e,
                    "could not confirm access token owner; using public repositories"
                );
                false
            }
        }
    }
}
