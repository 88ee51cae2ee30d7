//! Integration tests for wildcard variants
//!
//! Variant switching goes through the file-backed define registry, so these
//! tests check both the persisted symbols and what later commands read back.

use anyhow::Result;
use buildsmith_lib::application::cli::{Commands, VariantAction};
use buildsmith_lib::application::commands::execute_command_with_session;
use buildsmith_lib::display::DisplayCall;
use buildsmith_tests::{HermeticSessionBuilder, wildcard_project};
use serde_json::Value;
use std::fs;

fn switch(code_name: &str) -> Commands {
    Commands::Variant {
        action: VariantAction::Switch {
            code_name: code_name.to_string(),
        },
    }
}

fn read_defines(work: &std::path::Path) -> Result<Value> {
    let content = fs::read_to_string(work.join(".buildsmith/defines.json"))?;
    Ok(serde_json::from_str(&content)?)
}

#[test]
fn test_switch_persists_define_symbols() -> Result<()> {
    let (session, env, display) = HermeticSessionBuilder::new()?
        .with_project(&wildcard_project("Suite", &["Orbit", "Nebula"])?)?
        .build()?;

    execute_command_with_session(switch("nebula"), &session)?;
    assert_eq!(read_defines(&env.work_path)?["standalone"], serde_json::json!(["NEBULA"]));

    execute_command_with_session(switch("Orbit"), &session)?;
    assert_eq!(read_defines(&env.work_path)?["standalone"], serde_json::json!(["ORBIT"]));

    execute_command_with_session(Commands::Status, &session)?;
    assert!(display.has_call(&DisplayCall::StatusMessage {
        text: "Active variant: Orbit".to_string()
    }));
    Ok(())
}

#[test]
fn test_switch_keeps_unrelated_symbols() -> Result<()> {
    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_project(&wildcard_project("Suite", &["Orbit", "Nebula"])?)?
        .build()?;
    fs::write(
        env.work_path.join(".buildsmith/defines.json"),
        r#"{ "standalone": ["ENABLE_CHEATS", "ORBIT"], "android": ["ORBIT"] }"#,
    )?;

    execute_command_with_session(switch("Nebula"), &session)?;

    let defines = read_defines(&env.work_path)?;
    assert_eq!(defines["standalone"], serde_json::json!(["ENABLE_CHEATS", "NEBULA"]));
    assert_eq!(defines["android"], serde_json::json!(["ORBIT"]));
    Ok(())
}

#[test]
fn test_target_group_selects_registry_entry() -> Result<()> {
    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_project(&wildcard_project("Suite", &["Orbit", "Nebula"])?)?
        .with_target_group("android")
        .build()?;

    execute_command_with_session(switch("Nebula"), &session)?;

    let defines = read_defines(&env.work_path)?;
    assert_eq!(defines["android"], serde_json::json!(["NEBULA"]));
    assert!(defines.get("standalone").is_none());
    Ok(())
}

#[test]
fn test_variant_add_and_remove_round_trip() -> Result<()> {
    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_project(&wildcard_project("Suite", &["Orbit"])?)?
        .build()?;

    execute_command_with_session(
        Commands::Variant {
            action: VariantAction::Add {
                code_name: "Comet Tail".to_string(),
                define: None,
            },
        },
        &session,
    )?;
    let config = env.read_project()?;
    assert_eq!(
        config.variant("comet tail").expect("added").define_symbol,
        "COMET_TAIL"
    );

    execute_command_with_session(
        Commands::Variant {
            action: VariantAction::Remove {
                code_name: "COMET TAIL".to_string(),
            },
        },
        &session,
    )?;
    let config = env.read_project()?;
    assert!(config.variant("Comet Tail").is_none());
    assert_eq!(config.variants.len(), 1);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_build_uses_active_variant() -> Result<()> {
    use buildsmith_tests::MockBehavior;

    let (session, env, _display) = HermeticSessionBuilder::new()?
        .with_project(&wildcard_project("Suite", &["Orbit", "Nebula"])?)?
        .with_build_command("engine", MockBehavior::AlwaysSucceed)?
        .build()?;

    execute_command_with_session(switch("Nebula"), &session)?;
    execute_command_with_session(
        Commands::Build {
            variant: None,
            profile: Some("Development".to_string()),
            all: false,
        },
        &session,
    )?;

    let calls = env.get_mock_calls("engine")?;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["BUILDSMITH_DEFINE"], "NEBULA");
    assert_eq!(calls[0]["BUILDSMITH_TARGET"], "android");
    assert!(calls[0]["BUILDSMITH_OUTPUT"].ends_with("Builds/Nebula/nebula-dev-v1-0-0-250714-rev1.apk"));
    Ok(())
}
