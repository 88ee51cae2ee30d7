use super::*;
use clap::CommandFactory;

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_setup_reset() {
    let cli = Cli::try_parse_from(["buildsmith", "setup", "--reset"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Setup { reset: true })));
}

#[test]
fn test_parse_version_bump() {
    let cli = Cli::try_parse_from(["buildsmith", "version", "bump", "minor"]).unwrap();
    match cli.command {
        Some(Commands::Version {
            action: Some(VersionAction::Bump { part }),
        }) => assert_eq!(part, VersionPart::Minor),
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_version_without_action() {
    let cli = Cli::try_parse_from(["buildsmith", "version"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Version { action: None })
    ));
}

#[test]
fn test_parse_profile_add_with_target() {
    let cli = Cli::try_parse_from([
        "buildsmith",
        "profile",
        "add",
        "QA",
        "--variant",
        "alpha",
        "--development",
        "--target",
        "android",
        "--suffix",
        "qa",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Profile {
            action:
                ProfileAction::Add {
                    name,
                    variant,
                    development,
                    target,
                    suffix,
                },
        }) => {
            assert_eq!(name, "QA");
            assert_eq!(variant.as_deref(), Some("alpha"));
            assert!(development);
            assert_eq!(target, Some(BuildTarget::Android));
            assert_eq!(suffix.as_deref(), Some("qa"));
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_build_profile_conflicts_with_all() {
    let result = Cli::try_parse_from(["buildsmith", "build", "--profile", "Production", "--all"]);
    assert!(result.is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "buildsmith",
        "status",
        "--color",
        "never",
        "--target-group",
        "android",
    ])
    .unwrap();
    assert_eq!(cli.config.color, crate::primitives::ColorIntent::Never);
    assert_eq!(cli.config.target_group, "android");
}
