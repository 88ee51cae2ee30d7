//! Integration tests for `buildsmith setup`
//!
//! Drives the wizard with scripted answers against a real project root:
//! - Single-mode setup creating the build folder
//! - Wildcard setup with several variants
//! - Re-running setup on a configured project
//! - Reset keeping the version

use anyhow::Result;
use buildsmith_lib::application::cli::Commands;
use buildsmith_lib::application::commands::execute_command_with_session;
use buildsmith_lib::application::session_mocks::MockInteractiveProvider;
use buildsmith_lib::primitives::BuildMode;
use buildsmith_tests::{HermeticSessionBuilder, single_project};

#[test]
fn test_single_setup_writes_config_and_build_folder() -> Result<()> {
    let interactive = MockInteractiveProvider::new()
        .with_select(0)
        .with_text_inputs(&["Orbit", "orbit-game", "Builds", "Assets/Scenes/Main.unity", ""])
        .with_confirm(true);
    let (session, env, display) = HermeticSessionBuilder::new()?
        .with_interactive(interactive)
        .build()?;

    execute_command_with_session(Commands::Setup { reset: false }, &session)?;

    assert!(env.work_path.join("Builds").is_dir());
    assert!(env.work_path.join(".buildsmith/project.json").is_file());

    let config = env.read_project()?;
    assert!(config.setup_complete);
    assert_eq!(config.mode, BuildMode::Single);
    assert_eq!(config.effective_project_name(), "orbit-game");
    assert_eq!(config.profiles.len(), 2);
    assert_eq!(config.profiles[0].product_name, "orbit-game");
    assert!(display.mentions("Setup complete"));
    Ok(())
}

#[test]
fn test_wildcard_setup_records_every_variant() -> Result<()> {
    let interactive = MockInteractiveProvider::new().with_select(1).with_text_inputs(&[
        "Space Suite",
        "SpaceSuite",
        "Orbit",
        "",
        "deepSpace",
        "",
        "",
        "Builds",
        "Assets/Orbit.unity",
        "",
        "Assets/Deep.unity",
        "Assets/DeepBoss.unity",
        "",
    ]);
    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_interactive(interactive)
        .build()?;

    execute_command_with_session(Commands::Setup { reset: false }, &session)?;

    let config = env.read_project()?;
    assert_eq!(config.mode, BuildMode::Wildcard);
    assert_eq!(config.effective_project_name(), "SpaceSuite");

    let deep = config.variant("deepspace").expect("variant stored");
    assert_eq!(deep.define_symbol, "DEEP_SPACE");
    assert_eq!(deep.scene_refs.len(), 2);
    assert_eq!(deep.build_profiles[0].product_name, "SpaceSuite");
    assert!(config.code_names().contains("orbit"));
    Ok(())
}

#[test]
fn test_setup_leaves_configured_project_alone() -> Result<()> {
    let interactive = MockInteractiveProvider::new();
    let (session, env, display) = HermeticSessionBuilder::new()?
        .with_project(&single_project("Orbit"))?
        .with_interactive(interactive.clone())
        .build()?;

    execute_command_with_session(Commands::Setup { reset: false }, &session)?;

    assert!(interactive.get_prompts().is_empty());
    assert!(display.mentions("already set up"));
    assert_eq!(env.read_project()?, single_project("Orbit"));
    Ok(())
}

#[test]
fn test_reset_reruns_wizard_with_existing_version() -> Result<()> {
    let mut existing = single_project("Orbit");
    existing.current_version = "3.1.4".to_string();
    let interactive = MockInteractiveProvider::new()
        .with_select(0)
        .with_text_inputs(&["Comet", "", "Out", "Assets/Scenes/Main.unity", ""])
        .with_confirm(true);
    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_project(&existing)?
        .with_interactive(interactive)
        .build()?;

    execute_command_with_session(Commands::Setup { reset: true }, &session)?;

    let config = env.read_project()?;
    assert_eq!(config.project_name, "Comet");
    assert_eq!(config.current_version, "3.1.4");
    assert!(env.work_path.join("Out").is_dir());
    Ok(())
}

#[test]
fn test_cancelled_reset_leaves_setup_incomplete() -> Result<()> {
    let interactive = MockInteractiveProvider::new()
        .with_select(0)
        .with_select(2)
        .with_text_inputs(&["", ""]);
    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_project(&single_project("Orbit"))?
        .with_interactive(interactive)
        .build()?;

    let result = execute_command_with_session(Commands::Setup { reset: true }, &session);

    assert!(result.is_err());
    let config = env.read_project()?;
    assert!(!config.setup_complete);
    assert!(execute_command_with_session(Commands::Status, &session).is_err());
    Ok(())
}
