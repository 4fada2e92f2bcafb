//! Key qualifications matched from the bio and profile README.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;
use serde_json::Value;

use crate::client::GithubClient;
use crate::types::KeywordChoice;

/// Collects catalogue keywords mentioned in `bio` or the profile README.
///
/// Catalogue and README failures are logged and degrade to fewer keywords.
pub(crate) async fn key_qualifications(
    client: &GithubClient,
    keywords_url: &str,
    username: &str,
    bio: Option<&str>,
    fetch_readme: bool,
) -> Vec<String> {
    let readme = if fetch_readme {
        match client.readme(username).await {
            Ok(readme) => readme,
            Err(e) => {
                tracing::warn!(username, error = %e, "profile README unavailable");
                None
            }
        }
    } else {
        None
    };

    let texts: Vec<String> = bio
        .into_iter()
        .chain(readme.as_deref())
        .map(clean_text)
        .filter(|t| !t.trim().is_empty())
        .collect();
    if texts.is_empty() {
        return Vec::new();
    }

    let raw: Vec<Value> = match client.get_external_json(keywords_url).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(url = keywords_url, error = %e, "keyword catalogue unavailable");
            return Vec::new();
        }
    };
    let catalogue: Vec<KeywordChoice> = raw
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(choice) => Some(choice),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed keyword entry");
                None
            }
        })
        .collect();

    match_keywords(&catalogue, &texts)
}

/// Lowercases `text` and blanks out URLs, bracketed asides, HTML tags and
/// entities so they cannot produce spurious matches.
pub(crate) fn clean_text(text: &str) -> String {
    let noise = Regex::new(
        r"\n|###|'|https?://\S+|[(\[].*?[)\]]|<.*?>|&([a-z0-9]+|#[0-9]{1,6}|#x[0-9a-f]{1,6});",
    )
    .expect("valid noise regex");
    noise.replace_all(text, " ").to_lowercase()
}

/// Returns the catalogue values whose label or value appears as a whole word
/// in any of `texts`, sorted.
///
/// A matched value is reported in its hyphenated form; a matched label is
/// reported as its catalogue value.
pub(crate) fn match_keywords(catalogue: &[KeywordChoice], texts: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, bool> = HashMap::new();
    let mut mentioned = |word: &str| -> bool {
        if word.trim().is_empty() {
            return false;
        }
        *seen.entry(word.to_owned()).or_insert_with(|| {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))
                .is_ok_and(|re| texts.iter().any(|t| re.is_match(t)))
        })
    };

    let mut found = BTreeSet::new();
    for choice in catalogue {
        let value_words = choice.value.replace('-', " ").to_lowercase();
        if mentioned(&value_words) {
            found.insert(value_words.replace([' ', '/'], "-"));
        }
        if mentioned(&choice.label.to_lowercase()) {
            found.insert(choice.value.clone());
        }
    }
    found.into_iter().collect()
}
