//! Output sections of a GitHub profile inference.

use serde::Serialize;
use superinference_core::{Completion, CompletionFlagged, Ranked};

use crate::types::{GithubUser, RepoSummary};

/// Complete inference result; keys serialize in this order.
#[derive(Debug, Clone, Serialize)]
pub struct InferredProfile {
    pub profile: ProfileSection,
    pub skill: SkillSection,
    pub stats: StatsSection,
    /// `null` for public calls.
    pub contribution: Option<ContributionSection>,
}

impl InferredProfile {
    /// Completion flags of every section that has one.
    #[must_use]
    pub fn completions(&self) -> Vec<(&'static str, Completion)> {
        let sections: [(&'static str, &dyn CompletionFlagged); 4] = [
            ("profile", &self.profile),
            ("skill", &self.skill),
            ("stats", &self.stats),
            ("contribution", &self.contribution),
        ];
        sections
            .into_iter()
            .filter_map(|(name, section)| section.completion().map(|c| (name, c)))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSection {
    pub login: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub hireable: Option<bool>,
    pub twitter_username: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub followers: u64,
    pub following: u64,
}

impl From<&GithubUser> for ProfileSection {
    fn from(user: &GithubUser) -> Self {
        Self {
            login: user.login.clone(),
            name: user.name.clone(),
            company: user.company.clone(),
            blog: user.blog.clone(),
            location: user.location.clone(),
            email: user.email.clone(),
            hireable: user.hireable,
            twitter_username: user.twitter_username.clone(),
            avatar_url: user.avatar_url.clone(),
            bio: user.bio.clone(),
            followers: user.followers,
            following: user.following,
        }
    }
}

impl CompletionFlagged for ProfileSection {
    fn completion(&self) -> Option<Completion> {
        None
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillSection {
    pub inference_from_originalrepo_count: usize,
    /// `null` for public calls, which never fetch per-repo languages.
    pub incomplete_language_results: Option<bool>,
    /// Repositories whose language bytes were folded; `null` for public calls.
    pub inference_from_language_count: Option<usize>,
    pub key_qualifications: Vec<String>,
    pub top_n_languages: Vec<String>,
    /// Byte share per language; `null` for public calls.
    pub languages_percentage: Option<Ranked<f64>>,
}

impl CompletionFlagged for SkillSection {
    fn completion(&self) -> Option<Completion> {
        let incomplete = self.incomplete_language_results?;
        Some(Completion {
            incomplete,
            count: self.inference_from_language_count.unwrap_or_default(),
        })
    }
}

/// Summed popularity over original repositories.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StarsForks {
    pub stargazers_count: u64,
    pub forks_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoHighlight {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub top_language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
}

impl From<&RepoSummary> for RepoHighlight {
    fn from(repo: &RepoSummary) -> Self {
        Self {
            name: repo.name.clone(),
            html_url: repo.html_url.clone(),
            description: repo.description.clone(),
            top_language: repo.language.clone(),
            stargazers_count: repo.stargazers_count,
            forks_count: repo.forks_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSection {
    pub incomplete_repo_results: bool,
    pub inference_from_repo_count: usize,
    pub original_repo_count: usize,
    pub forked_repo_count: usize,
    pub counts: StarsForks,
    pub top_repo_stars_forks: Vec<RepoHighlight>,
}

impl StatsSection {
    /// Empty section for a pass that produced nothing usable.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            incomplete_repo_results: true,
            inference_from_repo_count: 0,
            original_repo_count: 0,
            forked_repo_count: 0,
            counts: StarsForks::default(),
            top_repo_stars_forks: Vec::new(),
        }
    }
}

impl CompletionFlagged for StatsSection {
    fn completion(&self) -> Option<Completion> {
        Some(Completion {
            incomplete: self.incomplete_repo_results,
            count: self.inference_from_repo_count,
        })
    }
}

/// A repository owned by someone else that the user contributed to.
#[derive(Debug, Clone, Serialize)]
pub struct OtherRepoContribution {
    pub name: String,
    pub owner: String,
    pub html_url: String,
    pub description: Option<String>,
    pub top_language: Option<String>,
    pub contributions_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContributionSection {
    pub incomplete_contribution_results: bool,
    /// Calendar days folded into the histograms.
    pub inference_from_contribution_count: usize,
    pub contribution_count: u64,
    pub weekly_average_contribution: f64,
    /// Weekday → `[last_12_months, all_time]`.
    pub contribution_count_per_day: Ranked<[u64; 2]>,
    /// Month → `[last_12_months, all_time]`.
    pub contribution_count_per_month: Ranked<[u64; 2]>,
    pub contribution_count_per_owned_repo: Ranked<u64>,
    pub contribution_count_per_other_repo: Vec<OtherRepoContribution>,
    pub contribution_count_per_repo_org_owner: Ranked<u64>,
    pub contribution_count_per_repo_user_owner: Ranked<u64>,
    pub external_contribution_to_top_10_repo: Ranked<u64>,
    pub closest_users: Vec<String>,
}

impl ContributionSection {
    /// Empty section for a pass that produced nothing usable.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            incomplete_contribution_results: true,
            inference_from_contribution_count: 0,
            contribution_count: 0,
            weekly_average_contribution: 0.0,
            contribution_count_per_day: Ranked::default(),
            contribution_count_per_month: Ranked::default(),
            contribution_count_per_owned_repo: Ranked::default(),
            contribution_count_per_other_repo: Vec::new(),
            contribution_count_per_repo_org_owner: Ranked::default(),
            contribution_count_per_repo_user_owner: Ranked::default(),
            external_contribution_to_top_10_repo: Ranked::default(),
            closest_users: Vec::new(),
        }
    }
}

impl CompletionFlagged for ContributionSection {
    fn completion(&self) -> Option<Completion> {
        Some(Completion {
            incomplete: self.incomplete_contribution_results,
            count: self.inference_from_contribution_count,
        })
    }
}
