//! Command handlers: build a client from config, run one inference, print JSON.

use anyhow::Context;
use serde::Serialize;
use superinference_core::{AppConfig, Completion};
use superinference_devto::{DevtoClient, DevtoParams, DevtoProfile};
use superinference_github::{GithubClient, GithubProfile, GithubRepo, InferenceParams};

pub(crate) async fn run_github(
    config: &AppConfig,
    username: &str,
    params: &InferenceParams,
    token: Option<&str>,
    compact: bool,
) -> anyhow::Result<()> {
    let client = GithubClient::from_config(config, token)?;
    tracing::info!(username, access = %client.access_level(), "inferring GitHub profile");
    let profile = GithubProfile::new(&client, username)
        .with_keywords_url(&config.keywords_url)
        .perform_inference(params)
        .await
        .with_context(|| format!("GitHub inference failed for {username}"))?;

    report_incomplete(&profile.completions());
    emit(&profile, compact)
}

pub(crate) async fn run_github_repo(
    config: &AppConfig,
    owner: &str,
    name: &str,
    token: Option<&str>,
    compact: bool,
) -> anyhow::Result<()> {
    let client = GithubClient::from_config(config, token)?;
    tracing::info!(owner, name, access = %client.access_level(), "inferring GitHub repository");
    let repo = GithubRepo::new(&client, owner, name)
        .perform_inference()
        .await
        .with_context(|| format!("repository inference failed for {owner}/{name}"))?;

    if repo.incomplete_contribution_results || repo.incomplete_event_results {
        tracing::warn!(
            contributors = repo.inference_from_contribution_count,
            events = repo.inference_from_event_count,
            "repository results incomplete"
        );
    }
    emit(&repo, compact)
}

pub(crate) async fn run_devto(
    config: &AppConfig,
    username: &str,
    params: &DevtoParams,
    compact: bool,
) -> anyhow::Result<()> {
    let client = DevtoClient::from_config(config)?;
    tracing::info!(username, "inferring Dev.to profile");
    let profile = DevtoProfile::new(&client, username)
        .perform_inference(params)
        .await
        .with_context(|| format!("Dev.to inference failed for {username}"))?;

    report_incomplete(&profile.completions());
    emit(&profile, compact)
}

fn report_incomplete(completions: &[(&'static str, Completion)]) {
    for (section, completion) in completions {
        if completion.incomplete {
            tracing::warn!(
                section,
                folded = completion.count,
                "results incomplete; upstream data was truncated"
            );
        }
    }
}

/// Serializes `value` to stdout.
fn emit<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    println!("{}", render(value, compact)?);
    Ok(())
}

pub(crate) fn render<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<String> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(text)
}
