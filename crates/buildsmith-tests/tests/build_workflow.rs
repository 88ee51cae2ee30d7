//! Integration tests for `buildsmith build` and `buildsmith path`
//!
//! Runs a mock build executable through the live process provider:
//! - Artifact names and revision bumps on repeated builds
//! - Build variables handed to the executable
//! - Failure reporting without retries
//! - Size reporting for directory and package targets

#![cfg(unix)]

use anyhow::Result;
use buildsmith_lib::application::cli::Commands;
use buildsmith_lib::application::commands::execute_command_with_session;
use buildsmith_lib::display::DisplayCall;
use buildsmith_lib::primitives::BuildTarget;
use buildsmith_tests::{HermeticSessionBuilder, MockBehavior, single_project};

fn build(profile: Option<&str>, all: bool) -> Commands {
    Commands::Build {
        variant: None,
        profile: profile.map(str::to_string),
        all,
    }
}

#[test]
fn test_repeated_builds_get_new_revisions() -> Result<()> {
    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_project(&single_project("Orbit"))?
        .with_build_command(
            "engine",
            MockBehavior::WriteOutput {
                content: "player".to_string(),
            },
        )?
        .build()?;

    execute_command_with_session(build(Some("Production"), false), &session)?;
    execute_command_with_session(build(Some("Production"), false), &session)?;
    execute_command_with_session(build(Some("Production"), false), &session)?;

    assert_eq!(
        env.list_dir("Builds")?,
        vec![
            "orbit-prd-v1-0-0-250714-rev1",
            "orbit-prd-v1-0-0-250714-rev2",
            "orbit-prd-v1-0-0-250714-rev3",
        ]
    );
    assert!(
        env.work_path
            .join("Builds/orbit-prd-v1-0-0-250714-rev2/Orbit")
            .is_file()
    );
    Ok(())
}

#[test]
fn test_build_variables_reach_executable() -> Result<()> {
    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_project(&single_project("Orbit"))?
        .with_build_command("engine", MockBehavior::AlwaysSucceed)?
        .build()?;

    execute_command_with_session(build(Some("Development"), false), &session)?;

    let calls = env.get_mock_calls("engine")?;
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call["BUILDSMITH_TARGET"], "standalone-linux64");
    assert_eq!(call["BUILDSMITH_PRODUCT"], "Orbit");
    assert_eq!(call["BUILDSMITH_DEVELOPMENT"], "1");
    assert_eq!(call["BUILDSMITH_DEFINE"], "");
    assert_eq!(
        call["BUILDSMITH_SCENES"],
        env.work_path
            .join("Assets/Scenes/Main.unity")
            .display()
            .to_string()
    );
    assert!(call["BUILDSMITH_OUTPUT"].ends_with("orbit-dev-v1-0-0-250714-rev1/Orbit"));
    Ok(())
}

#[test]
fn test_build_all_stops_on_failure() -> Result<()> {
    let (session, env, display) = HermeticSessionBuilder::new()?
        .with_project(&single_project("Orbit"))?
        .with_build_command(
            "engine",
            MockBehavior::AlwaysFail {
                error: "license expired".to_string(),
            },
        )?
        .build()?;

    let err = execute_command_with_session(build(None, true), &session).unwrap_err();

    assert!(err.to_string().contains("Production"));
    assert_eq!(env.get_mock_calls("engine")?.len(), 1);
    assert!(display.has_call(&DisplayCall::StatusError {
        item: "Build failed".to_string(),
        details: "license expired".to_string(),
    }));
    Ok(())
}

#[test]
fn test_build_all_runs_every_profile() -> Result<()> {
    let (session, env, display) = HermeticSessionBuilder::new()?
        .with_project(&single_project("Orbit"))?
        .with_build_command(
            "engine",
            MockBehavior::WriteOutput {
                content: "0123456789".to_string(),
            },
        )?
        .build()?;

    execute_command_with_session(build(None, true), &session)?;

    assert_eq!(env.get_mock_calls("engine")?.len(), 2);
    assert_eq!(
        env.list_dir("Builds")?,
        vec!["orbit-dev-v1-0-0-250714-rev1", "orbit-prd-v1-0-0-250714-rev1"]
    );
    assert!(display.mentions("10 B"));
    Ok(())
}

#[test]
fn test_package_target_writes_single_file() -> Result<()> {
    let mut config = single_project("Orbit");
    for profile in &mut config.profiles {
        profile.build_target = BuildTarget::Android;
    }
    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_project(&config)?
        .with_build_command(
            "engine",
            MockBehavior::WriteOutput {
                content: "apk".to_string(),
            },
        )?
        .build()?;

    execute_command_with_session(build(None, false), &session)?;
    execute_command_with_session(build(None, false), &session)?;

    assert_eq!(
        env.list_dir("Builds")?,
        vec![
            "orbit-prd-v1-0-0-250714-rev1.apk",
            "orbit-prd-v1-0-0-250714-rev2.apk",
        ]
    );
    Ok(())
}

#[test]
fn test_path_matches_next_build() -> Result<()> {
    let (session, env, display) = HermeticSessionBuilder::new()?
        .with_project(&single_project("Orbit"))?
        .with_build_command("engine", MockBehavior::AlwaysSucceed)?
        .build()?;

    execute_command_with_session(build(None, false), &session)?;
    execute_command_with_session(
        Commands::Path {
            variant: None,
            profile: None,
        },
        &session,
    )?;

    let expected = env
        .work_path
        .join("Builds/orbit-prd-v1-0-0-250714-rev2/Orbit");
    assert!(display.has_call(&DisplayCall::StatusMessage {
        text: expected.display().to_string()
    }));
    Ok(())
}

#[test]
fn test_missing_scene_file_aborts_build() -> Result<()> {
    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_project(&single_project("Orbit"))?
        .with_build_command("engine", MockBehavior::AlwaysSucceed)?
        .build()?;
    std::fs::remove_file(env.work_path.join("Assets/Scenes/Main.unity"))?;

    let err = execute_command_with_session(build(None, false), &session).unwrap_err();

    assert!(format!("{err:#}").contains("Scene not found"));
    assert!(env.get_mock_calls("engine")?.is_empty());
    Ok(())
}
