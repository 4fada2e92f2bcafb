//! Wire types for the Dev.to API.

use serde::Deserialize;

/// `GET /users/by_username?url=<username>`.
#[derive(Debug, Clone, Deserialize)]
pub struct DevtoUser {
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub github_username: Option<String>,
    /// Human-formatted upstream, e.g. `"Apr 14, 2017"`.
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// One entry of `GET /articles?username=<username>`.
#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub tag_list: Vec<String>,
    #[serde(default)]
    pub public_reactions_count: u64,
    #[serde(default)]
    pub comments_count: u64,
}

impl Article {
    /// Popularity key used to rank articles.
    #[must_use]
    pub fn engagement(&self) -> u64 {
        self.public_reactions_count + self.comments_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_tolerates_missing_optional_fields() {
        let article: Article = serde_json::from_value(serde_json::json!({
            "title": "Hello",
            "url": "https://dev.to/jane/hello",
            "public_reactions_count": 4
        }))
        .unwrap();
        assert!(article.tag_list.is_empty());
        assert_eq!(article.engagement(), 4);
    }
}
