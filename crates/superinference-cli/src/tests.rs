use super::*;

#[test]
fn parses_github_command_with_defaults() {
    let cli = Cli::try_parse_from(["superinference", "github", "octocat"])
        .expect("expected valid cli args");

    assert!(!cli.compact);
    let Some(Commands::Github {
        username,
        top_repo_n,
        top_language_n,
        closest_user_n,
        include_private,
        ..
    }) = cli.command
    else {
        panic!("expected github command");
    };
    assert_eq!(username, "octocat");
    assert_eq!((top_repo_n, top_language_n, closest_user_n), (3, 3, 5));
    assert!(!include_private);
}

#[test]
fn parses_github_flags() {
    let cli = Cli::try_parse_from([
        "superinference",
        "github",
        "octocat",
        "--top-repo-n",
        "10",
        "--include-private",
        "--token",
        "abc",
        "--compact",
    ])
    .expect("expected valid cli args");

    assert!(cli.compact);
    assert!(matches!(
        cli.command,
        Some(Commands::Github {
            top_repo_n: 10,
            include_private: true,
            token: Some(ref t),
            ..
        }) if t == "abc"
    ));
}

#[test]
fn parses_github_repo_command() {
    let cli = Cli::try_parse_from(["superinference", "--compact", "github-repo", "octocat", "hello"])
        .expect("expected valid cli args");

    assert!(cli.compact);
    assert!(matches!(
        cli.command,
        Some(Commands::GithubRepo { ref owner, ref name, .. }) if owner == "octocat" && name == "hello"
    ));
}

#[test]
fn parses_devto_command() {
    let cli = Cli::try_parse_from(["superinference", "devto", "jane", "--top-tag-n", "5"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Devto {
            ref username,
            top_article_n: 3,
            top_tag_n: 5,
        }) if username == "jane"
    ));
}

#[test]
fn github_requires_username() {
    assert!(Cli::try_parse_from(["superinference", "github"]).is_err());
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["superinference"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn render_switches_between_pretty_and_compact() {
    let value = serde_json::json!({ "a": [1, 2] });
    assert_eq!(run::render(&value, true).unwrap(), r#"{"a":[1,2]}"#);
    assert!(run::render(&value, false).unwrap().contains('\n'));
}

#[test]
fn help_is_answered_by_the_parser() {
    let err = Cli::try_parse_from(["superinference", "--help"]).expect_err("help short-circuits");
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}
