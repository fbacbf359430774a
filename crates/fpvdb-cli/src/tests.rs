use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["fpvdb-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn ingest_defaults() {
    let cli = Cli::try_parse_from(["fpvdb-cli", "ingest"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Ingest(IngestArgs {
            limit: None,
            categories_only: false,
            searches_only: false,
            dry_run: false,
        }))
    ));
}

#[test]
fn ingest_with_limit_and_dry_run() {
    let cli = Cli::try_parse_from(["fpvdb-cli", "ingest", "--limit", "5", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Ingest(IngestArgs {
            limit: Some(5),
            dry_run: true,
            ..
        }))
    ));
}

#[test]
fn ingest_seed_group_flags_conflict() {
    let result = Cli::try_parse_from([
        "fpvdb-cli",
        "ingest",
        "--categories-only",
        "--searches-only",
    ]);
    assert!(result.is_err());
}

#[test]
fn ingest_rejects_non_numeric_limit() {
    let result = Cli::try_parse_from(["fpvdb-cli", "ingest", "--limit", "many"]);
    assert!(result.is_err());
}

#[test]
fn scrape_requires_url() {
    assert!(Cli::try_parse_from(["fpvdb-cli", "scrape"]).is_err());

    let cli =
        Cli::try_parse_from(["fpvdb-cli", "scrape", "https://www.getfpv.com/a.html"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Scrape { ref url }) if url == "https://www.getfpv.com/a.html"
    ));
}

#[test]
fn verify_images_defaults() {
    let cli = Cli::try_parse_from(["fpvdb-cli", "verify-images"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Images(ImagesCommands::VerifyImages {
            concurrency: 8,
            check_remote: false
        }))
    ));
}

#[test]
fn verify_images_with_remote_check() {
    let cli = Cli::try_parse_from([
        "fpvdb-cli",
        "verify-images",
        "--check-remote",
        "--concurrency",
        "3",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Images(ImagesCommands::VerifyImages {
            concurrency: 3,
            check_remote: true
        }))
    ));
}

#[test]
fn localize_images_parses() {
    let cli = Cli::try_parse_from(["fpvdb-cli", "localize-images"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Images(ImagesCommands::LocalizeImages))
    ));
}

#[test]
fn hydrate_images_parses() {
    let cli = Cli::try_parse_from(["fpvdb-cli", "hydrate-images"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Images(ImagesCommands::HydrateImages))
    ));
}

#[test]
fn enrich_parses_dry_run() {
    let cli = Cli::try_parse_from(["fpvdb-cli", "enrich", "--dry-run"]).unwrap();
    match cli.command {
        Some(Commands::Enrich(args)) => assert!(args.dry_run),
        other => panic!("expected enrich, got {other:?}"),
    }
}
