mod run;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "superinference")]
#[command(about = "Infer developer profiles from GitHub and Dev.to")]
struct Cli {
    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Infer a GitHub user's profile, skills, stats and contributions
    Github {
        username: String,
        /// Number of most popular repositories to report
        #[arg(long, default_value_t = 3)]
        top_repo_n: usize,
        /// Number of top languages to report
        #[arg(long, default_value_t = 3)]
        top_language_n: usize,
        /// Number of closest collaborators to report
        #[arg(long, default_value_t = 5)]
        closest_user_n: usize,
        /// Include private repositories (the token must belong to the user)
        #[arg(long)]
        include_private: bool,
        /// GitHub access token; unauthenticated when absent
        #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Infer metadata, languages, contributors and events of one repository
    GithubRepo {
        owner: String,
        name: String,
        /// GitHub access token; unauthenticated when absent
        #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Infer a Dev.to user's profile and article stats
    Devto {
        username: String,
        /// Number of most engaging articles to report
        #[arg(long, default_value_t = 3)]
        top_article_n: usize,
        /// Number of top tags to report
        #[arg(long, default_value_t = 3)]
        top_tag_n: usize,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let compact = cli.compact;
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Loads `.env` before reading the environment; `--token` falls back to
    // the configured token when absent.
    let config = superinference_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Github {
            username,
            top_repo_n,
            top_language_n,
            closest_user_n,
            include_private,
            token,
        } => {
            let params = superinference_github::InferenceParams {
                top_repo_n,
                top_language_n,
                closest_user_n,
                include_private,
            };
            run::run_github(&config, &username, &params, token.as_deref(), compact).await?;
        }
        Commands::GithubRepo { owner, name, token } => {
            run::run_github_repo(&config, &owner, &name, token.as_deref(), compact).await?;
        }
        Commands::Devto {
            username,
            top_article_n,
            top_tag_n,
        } => {
            let params = superinference_devto::DevtoParams {
                top_article_n,
                top_tag_n,
            };
            run::run_devto(&config, &username, &params, compact).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
