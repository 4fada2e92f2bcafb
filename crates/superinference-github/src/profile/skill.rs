//! Languages pass and skill section assembly.

use serde_json::Value;
use superinference_core::{AccessLevel, Tally};

use crate::client::{GithubClient, ListingOutcome};
use crate::types::RepoSummary;

use super::sections::SkillSection;

/// Language totals plus, for authenticated calls, how the per-repo pass ended.
pub(crate) struct LanguagePass {
    pub tally: Tally,
    pub outcome: Option<ListingOutcome>,
}

/// Lowercases a language name and replaces spaces with `-`.
pub(crate) fn normalize_language(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Folds language usage across the original repositories.
///
/// Authenticated calls sum the bytes reported by each repository's
/// `languages_url`; public calls count each repository's primary language.
pub(crate) async fn language_pass(
    client: &GithubClient,
    originals: &[RepoSummary],
    skip: bool,
) -> LanguagePass {
    let mut tally = Tally::new();

    if !client.access_level().is_authenticated() {
        for repo in originals {
            if let Some(language) = repo.language.as_deref() {
                tally.add(&normalize_language(language), 1);
            }
        }
        return LanguagePass {
            tally,
            outcome: None,
        };
    }

    if skip {
        return LanguagePass {
            tally,
            outcome: Some(ListingOutcome::skipped()),
        };
    }

    let urls: Vec<String> = originals.iter().map(|r| r.languages_url.clone()).collect();
    let mut outcome = client
        .fold_each("languages", &urls, |idx, raw| {
            fold_language_bytes(&mut tally, &originals[idx].name, raw);
        })
        .await;

    if outcome.failed() {
        tally = Tally::new();
        outcome.folded = 0;
    }
    LanguagePass {
        tally,
        outcome: Some(outcome),
    }
}

fn fold_language_bytes(tally: &mut Tally, repo: &str, raw: Value) {
    let Value::Object(languages) = raw else {
        tracing::warn!(repo, "skipping malformed languages record");
        return;
    };
    for (language, bytes) in languages {
        match bytes.as_u64() {
            Some(bytes) => tally.add(&normalize_language(&language), bytes),
            None => tracing::warn!(repo, language = %language, "skipping malformed language byte count"),
        }
    }
}

pub(crate) fn skill_section(
    access: AccessLevel,
    pass: &LanguagePass,
    originalrepo_count: usize,
    key_qualifications: Vec<String>,
    top_language_n: usize,
) -> SkillSection {
    SkillSection {
        inference_from_originalrepo_count: originalrepo_count,
        incomplete_language_results: access
            .gate(|| pass.outcome.as_ref().map(|o| o.completion().incomplete))
            .flatten(),
        inference_from_language_count: access
            .gate(|| pass.outcome.as_ref().map(|o| o.folded))
            .flatten(),
        key_qualifications,
        top_n_languages: pass.tally.top_keys(top_language_n),
        languages_percentage: access.gate(|| pass.tally.percentages()).flatten(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use superinference_core::{Completion, CompletionFlagged};

    use super::*;

    #[test]
    fn language_names_are_normalized() {
        assert_eq!(normalize_language("Jupyter Notebook"), "jupyter-notebook");
        assert_eq!(normalize_language("C++"), "c++");
    }

    #[test]
    fn byte_counts_fold_and_skip_garbage() {
        let mut tally = Tally::new();
        fold_language_bytes(&mut tally, "a", json!({"Rust": 300, "Shell": 100}));
        fold_language_bytes(&mut tally, "b", json!({"Rust": 100, "Go": "lots"}));
        fold_language_bytes(&mut tally, "c", json!(["not", "an", "object"]));
        assert_eq!(tally.get("rust"), 400);
        assert_eq!(tally.get("shell"), 100);
        assert_eq!(tally.get("go"), 0);
        assert_eq!(tally.total(), 500);
    }

    #[test]
    fn public_skill_section_nulls_gated_fields() {
        let mut tally = Tally::new();
        tally.add("rust", 2);
        tally.add("go", 1);
        let pass = LanguagePass {
            tally,
            outcome: None,
        };
        let skill = skill_section(AccessLevel::Public, &pass, 3, Vec::new(), 1);
        assert_eq!(skill.top_n_languages, vec!["rust"]);
        assert!(skill.languages_percentage.is_none());
        assert!(skill.incomplete_language_results.is_none());
        assert!(skill.inference_from_language_count.is_none());
        assert!(skill.completion().is_none());
    }

    #[test]
    fn authenticated_skill_section_reports_byte_shares() {
        let mut tally = Tally::new();
        tally.add("rust", 750);
        tally.add("shell", 250);
        let pass = LanguagePass {
            tally,
            outcome: Some(ListingOutcome::skipped()),
        };
        let skill = skill_section(AccessLevel::Authenticated, &pass, 2, Vec::new(), 3);
        let pct = skill.languages_percentage.as_ref().unwrap();
        assert_eq!(pct.get("rust"), Some(&0.75));
        assert_eq!(skill.incomplete_language_results, Some(true));
        assert_eq!(skill.inference_from_language_count, Some(0));
        assert_eq!(skill.completion(), Some(Completion::truncated(0)));
    }
}
