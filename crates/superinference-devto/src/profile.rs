//! Dev.to profile inference: the user profile plus one articles pass.

use serde::Serialize;
use serde_json::Value;
use superinference_core::{Completion, CompletionFlagged, Pages, Ranked, Stop, Tally, TopN};

use crate::client::DevtoClient;
use crate::error::DevtoError;
use crate::types::{Article, DevtoUser};

/// Tunable parameters of a Dev.to inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevtoParams {
    pub top_article_n: usize,
    pub top_tag_n: usize,
}

impl Default for DevtoParams {
    fn default() -> Self {
        Self {
            top_article_n: 3,
            top_tag_n: 3,
        }
    }
}

/// Complete Dev.to inference result; keys serialize in this order.
#[derive(Debug, Clone, Serialize)]
pub struct DevtoInferredProfile {
    pub profile: DevtoProfileSection,
    pub skill: DevtoSkillSection,
    pub stats: DevtoStatsSection,
    /// Dev.to has no contribution data; always `null`.
    pub contribution: (),
}

impl DevtoInferredProfile {
    #[must_use]
    pub fn completions(&self) -> Vec<(&'static str, Completion)> {
        self.stats
            .completion()
            .map(|c| vec![("stats", c)])
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DevtoProfileSection {
    pub login: String,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub website_url: Option<String>,
    pub twitter_username: Option<String>,
    pub github_username: Option<String>,
    pub joined_at: Option<String>,
    pub profile_image: Option<String>,
}

impl From<DevtoUser> for DevtoProfileSection {
    fn from(user: DevtoUser) -> Self {
        Self {
            login: user.username,
            name: user.name,
            summary: user.summary,
            location: user.location,
            website_url: user.website_url,
            twitter_username: user.twitter_username,
            github_username: user.github_username,
            joined_at: user.joined_at,
            profile_image: user.profile_image,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DevtoSkillSection {
    pub top_n_tags: Vec<String>,
    /// Share of tag occurrences; `null` when no article carries a tag.
    pub tags_percentage: Option<Ranked<f64>>,
}

/// Summed engagement over the folded articles.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Engagement {
    pub public_reactions_count: u64,
    pub comments_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleHighlight {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub tags: Vec<String>,
    pub public_reactions_count: u64,
    pub comments_count: u64,
}

impl From<Article> for ArticleHighlight {
    fn from(article: Article) -> Self {
        Self {
            title: article.title,
            url: article.url,
            description: article.description,
            published_at: article.published_at,
            tags: article.tag_list,
            public_reactions_count: article.public_reactions_count,
            comments_count: article.comments_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DevtoStatsSection {
    pub incomplete_article_results: bool,
    pub inference_from_article_count: usize,
    pub counts: Engagement,
    pub top_articles: Vec<ArticleHighlight>,
}

impl CompletionFlagged for DevtoStatsSection {
    fn completion(&self) -> Option<Completion> {
        Some(Completion {
            incomplete: self.incomplete_article_results,
            count: self.inference_from_article_count,
        })
    }
}

/// Profile inference for one Dev.to user.
pub struct DevtoProfile<'a> {
    client: &'a DevtoClient,
    username: String,
}

impl<'a> DevtoProfile<'a> {
    #[must_use]
    pub fn new(client: &'a DevtoClient, username: &str) -> Self {
        Self {
            client,
            username: username.to_owned(),
        }
    }

    /// Fetches the profile and folds the user's articles.
    ///
    /// # Errors
    ///
    /// Only the profile fetch can fail the call; see
    /// [`DevtoClient::get_user`]. A failing articles pass degrades `stats`
    /// and `skill` to empty, incomplete sections.
    pub async fn perform_inference(
        &self,
        params: &DevtoParams,
    ) -> Result<DevtoInferredProfile, DevtoError> {
        let username = self.username.as_str();
        tracing::debug!(username, "fetching Dev.to profile");
        let user = self.client.get_user(username).await?;

        tracing::debug!(username, "fetching Dev.to articles");
        let mut fold = ArticleFold::new(params.top_article_n);
        let (stop, error) = self.articles_pass(&mut fold).await;

        let incomplete = if let Some(e) = error {
            tracing::warn!(username, error = %e, "articles pass aborted; section degraded");
            fold = ArticleFold::new(params.top_article_n);
            true
        } else {
            stop.is_some_and(|s| s.truncated)
        };
        if incomplete {
            tracing::warn!(username, folded = fold.folded, "article results incomplete");
        } else {
            tracing::debug!(username, folded = fold.folded, "articles pass complete");
        }

        Ok(DevtoInferredProfile {
            profile: DevtoProfileSection::from(user),
            skill: fold.skill(params.top_tag_n),
            stats: fold.stats(incomplete),
            contribution: (),
        })
    }

    async fn articles_pass(&self, fold: &mut ArticleFold) -> (Option<Stop>, Option<DevtoError>) {
        let client = self.client;
        let username = self.username.as_str();
        let mut pages = Pages::new(
            |cursor: Option<String>| {
                let page = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(1);
                async move { client.fetch_articles_page(username, page).await }
            },
            Some(client.max_pages()),
        );

        let mut error = None;
        while let Some(batch) = pages.next_page().await {
            match batch {
                Ok(records) => records.into_iter().for_each(|raw| fold.add(raw)),
                Err(e) => error = Some(e),
            }
        }
        (pages.stop(), error)
    }
}

/// Running state of the articles pass.
struct ArticleFold {
    folded: usize,
    counts: Engagement,
    tags: Tally,
    top: TopN<Article>,
}

impl ArticleFold {
    fn new(top_article_n: usize) -> Self {
        Self {
            folded: 0,
            counts: Engagement::default(),
            tags: Tally::new(),
            top: TopN::new(top_article_n),
        }
    }

    fn add(&mut self, raw: Value) {
        let article: Article = match serde_json::from_value(raw) {
            Ok(article) => article,
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed article record");
                return;
            }
        };
        self.folded += 1;
        self.counts.public_reactions_count += article.public_reactions_count;
        self.counts.comments_count += article.comments_count;
        for tag in &article.tag_list {
            self.tags.add(&tag.to_lowercase(), 1);
        }
        self.top.push(article.engagement(), article);
    }

    fn skill(&self, top_tag_n: usize) -> DevtoSkillSection {
        DevtoSkillSection {
            top_n_tags: self.tags.top_keys(top_tag_n),
            tags_percentage: self.tags.percentages(),
        }
    }

    fn stats(self, incomplete: bool) -> DevtoStatsSection {
        DevtoStatsSection {
            incomplete_article_results: incomplete,
            inference_from_article_count: self.folded,
            counts: self.counts,
            top_articles: self
                .top
                .into_vec()
                .into_iter()
                .map(ArticleHighlight::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn article(title: &str, reactions: u64, comments: u64, tags: &[&str]) -> Value {
        json!({
            "title": title,
            "url": format!("https://dev.to/jane/{title}"),
            "description": null,
            "published_at": "2024-01-01T00:00:00Z",
            "tag_list": tags,
            "public_reactions_count": reactions,
            "comments_count": comments
        })
    }

    #[test]
    fn fold_ranks_articles_by_engagement() {
        let mut fold = ArticleFold::new(2);
        fold.add(article("a", 1, 0, &["rust"]));
        fold.add(article("b", 5, 5, &["Rust", "webdev"]));
        fold.add(article("c", 3, 0, &[]));
        fold.add(json!({"title": 7}));

        let skill = fold.skill(1);
        assert_eq!(skill.top_n_tags, vec!["rust"]);
        let pct = skill.tags_percentage.unwrap();
        assert_eq!(pct.get("rust"), Some(&0.667));

        let stats = fold.stats(false);
        assert_eq!(stats.inference_from_article_count, 3);
        assert_eq!(stats.counts.public_reactions_count, 9);
        assert_eq!(stats.counts.comments_count, 5);
        let titles: Vec<&str> = stats.top_articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);
    }

    #[test]
    fn untagged_articles_leave_percentages_null() {
        let mut fold = ArticleFold::new(3);
        fold.add(article("a", 1, 1, &[]));
        let skill = fold.skill(3);
        assert!(skill.top_n_tags.is_empty());
        assert!(skill.tags_percentage.is_none());
    }

    #[test]
    fn zero_top_articles_keeps_counts() {
        let mut fold = ArticleFold::new(0);
        fold.add(article("a", 2, 1, &["go"]));
        let stats = fold.stats(false);
        assert!(stats.top_articles.is_empty());
        assert_eq!(stats.counts.public_reactions_count, 2);
    }
}
