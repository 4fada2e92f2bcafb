//! Repository pass: classifies the user's repositories and ranks the popular ones.

use superinference_core::TopN;

use crate::client::{GithubClient, ListingOutcome};
use crate::types::RepoSummary;

use super::sections::{RepoHighlight, StarsForks, StatsSection};

/// Number of most popular original repositories whose contributors are
/// folded into `external_contribution_to_top_10_repo`.
pub(crate) const EXTERNAL_CONTRIBUTION_REPOS: usize = 10;

pub(crate) struct RepoPass {
    pub stats: StatsSection,
    /// Original repositories in listing order.
    pub originals: Vec<RepoSummary>,
    /// Most popular original repositories, best first.
    pub popular: Vec<RepoSummary>,
    pub outcome: ListingOutcome,
}

impl RepoPass {
    fn degraded(outcome: ListingOutcome) -> Self {
        Self {
            stats: StatsSection::degraded(),
            originals: Vec::new(),
            popular: Vec::new(),
            outcome,
        }
    }
}

pub(crate) async fn repository_pass(
    client: &GithubClient,
    url: &str,
    username: &str,
    top_repo_n: usize,
) -> RepoPass {
    let mut fold = RepoFold::new(username, top_repo_n);
    let outcome = client
        .fold_listing(url, client.listing_cap(url), |repo: RepoSummary| fold.add(repo))
        .await;

    if outcome.failed() {
        return RepoPass::degraded(outcome);
    }
    fold.finish(outcome)
}

/// Running state of the repository pass.
struct RepoFold<'a> {
    username: &'a str,
    top_repo_n: usize,
    folded: usize,
    forked: usize,
    counts: StarsForks,
    originals: Vec<RepoSummary>,
    /// Indices into `originals`, ranked by stars + forks.
    popular: TopN<usize>,
}

impl<'a> RepoFold<'a> {
    fn new(username: &'a str, top_repo_n: usize) -> Self {
        Self {
            username,
            top_repo_n,
            folded: 0,
            forked: 0,
            counts: StarsForks::default(),
            originals: Vec::new(),
            popular: TopN::new(top_repo_n.max(EXTERNAL_CONTRIBUTION_REPOS)),
        }
    }

    fn add(&mut self, repo: RepoSummary) {
        self.folded += 1;
        if !repo.is_owned_by(self.username) {
            return;
        }
        if repo.fork {
            self.forked += 1;
            return;
        }
        self.counts.stargazers_count += repo.stargazers_count;
        self.counts.forks_count += repo.forks_count;
        self.popular.push(repo.stars_and_forks(), self.originals.len());
        self.originals.push(repo);
    }

    fn finish(self, outcome: ListingOutcome) -> RepoPass {
        let popular: Vec<RepoSummary> = self
            .popular
            .into_vec()
            .into_iter()
            .map(|idx| self.originals[idx].clone())
            .collect();

        let stats = StatsSection {
            incomplete_repo_results: outcome.completion().incomplete,
            inference_from_repo_count: self.folded,
            original_repo_count: self.originals.len(),
            forked_repo_count: self.forked,
            counts: self.counts,
            top_repo_stars_forks: popular
                .iter()
                .take(self.top_repo_n)
                .map(RepoHighlight::from)
                .collect(),
        };

        tracing::debug!(
            repos = self.folded,
            originals = self.originals.len(),
            forked = self.forked,
            "repository pass folded"
        );

        RepoPass {
            stats,
            originals: self.originals,
            popular: popular
                .into_iter()
                .take(EXTERNAL_CONTRIBUTION_REPOS)
                .collect(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use superinference_core::{Stop, StopReason};

    use super::*;

    fn repo(name: &str, owner: &str, fork: bool, stars: u64, forks: u64) -> RepoSummary {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "html_url": format!("https://github.com/{owner}/{name}"),
            "description": null,
            "fork": fork,
            "owner": { "login": owner },
            "language": "Rust",
            "stargazers_count": stars,
            "forks_count": forks,
            "languages_url": format!("https://api.github.com/repos/{owner}/{name}/languages"),
            "contributors_url": format!("https://api.github.com/repos/{owner}/{name}/contributors"),
        }))
        .unwrap()
    }

    fn exhausted() -> ListingOutcome {
        ListingOutcome {
            stop: Some(Stop {
                reason: StopReason::Exhausted,
                truncated: false,
            }),
            folded: 0,
            error: None,
        }
    }

    #[test]
    fn classifies_original_and_forked_repos() {
        let mut fold = RepoFold::new("octocat", 3);
        fold.add(repo("a", "octocat", false, 1, 1));
        fold.add(repo("b", "octocat", true, 50, 0));
        fold.add(repo("c", "someorg", false, 100, 100));
        fold.add(repo("d", "Octocat", false, 2, 0));
        let pass = fold.finish(exhausted());

        assert_eq!(pass.stats.inference_from_repo_count, 4);
        assert_eq!(pass.stats.original_repo_count, 2);
        assert_eq!(pass.stats.forked_repo_count, 1);
        assert_eq!(pass.stats.counts.stargazers_count, 3);
        assert_eq!(pass.stats.counts.forks_count, 1);
        assert!(!pass.stats.incomplete_repo_results);
    }

    #[test]
    fn top_repos_rank_by_stars_plus_forks() {
        let mut fold = RepoFold::new("octocat", 3);
        for i in 0..17u64 {
            fold.add(repo(&format!("r{i}"), "octocat", false, i * 3 % 17, i % 5));
        }
        let pass = fold.finish(exhausted());

        let top = &pass.stats.top_repo_stars_forks;
        assert_eq!(top.len(), 3);
        let keys: Vec<u64> = top.iter().map(|r| r.stargazers_count + r.forks_count).collect();
        assert!(keys.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(pass.popular.len(), EXTERNAL_CONTRIBUTION_REPOS);
        assert_eq!(pass.popular[0].name, top[0].name);
    }

    #[test]
    fn fewer_originals_than_requested() {
        let mut fold = RepoFold::new("octocat", 5);
        fold.add(repo("only", "octocat", false, 1, 0));
        let pass = fold.finish(exhausted());
        assert_eq!(pass.stats.top_repo_stars_forks.len(), 1);
        assert_eq!(pass.originals.len(), 1);
    }
}
