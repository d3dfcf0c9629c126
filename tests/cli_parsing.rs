use clap::Parser;
use crafter::cli::{Cli, Commands};
use crafter::services::ExportFormat;
use std::path::PathBuf;

#[test]
fn test_parse_craft_with_all_options() {
    let cli = Cli::try_parse_from([
        "crafter",
        "craft",
        "--mode",
        "specific-pair",
        "--first",
        "Steam",
        "--second",
        "Earth",
        "--max-rounds",
        "3",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Commands::Craft(args) => {
            assert_eq!(args.mode, "specific-pair");
            assert_eq!(args.first.as_deref(), Some("Steam"));
            assert_eq!(args.second.as_deref(), Some("Earth"));
            assert_eq!(args.max_rounds, Some(3));
            assert!(args.dry_run);
            assert_eq!(args.count, None);
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_craft_requires_mode() {
    assert!(Cli::try_parse_from(["crafter", "craft", "--count", "3"]).is_err());
}

#[test]
fn test_parse_export_defaults_to_chrome() {
    let cli = Cli::try_parse_from(["crafter", "export"]).unwrap();
    match cli.command {
        Commands::Export(args) => {
            assert_eq!(args.format, ExportFormat::Chrome);
            assert!(args.output.is_none());
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_parse_export_json_to_file() {
    let cli = Cli::try_parse_from(["crafter", "--json", "export", "--format", "json", "-o", "out.json"]).unwrap();
    assert!(cli.json);
    match cli.command {
        Commands::Export(args) => {
            assert_eq!(args.format, ExportFormat::Json);
            assert_eq!(args.output, Some(PathBuf::from("out.json")));
        }
        other => panic!("Wrong command: {other:?}"),
    }
}

#[test]
fn test_parse_export_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["crafter", "export", "--format", "csv"]).is_err());
}

#[test]
fn test_parse_list_and_init() {
    let cli = Cli::try_parse_from(["crafter", "list", "--limit", "10"]).unwrap();
    assert!(matches!(cli.command, Commands::List(args) if args.limit == Some(10)));

    let cli = Cli::try_parse_from(["crafter", "init", "--force"]).unwrap();
    assert!(matches!(cli.command, Commands::Init(args) if args.force));
}
