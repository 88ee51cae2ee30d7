use super::*;
use crate::application::session_mocks::*;
use crate::display::DisplayCall;
use crate::primitives::VersionPart;
use crate::project::builds::BuildReport;
use crate::project::profile::default_profiles;
use crate::project::store::config_path;

fn root() -> PathBuf {
    PathBuf::from("/test/workdir")
}

fn single_project() -> ProjectConfig {
    let mut config = ProjectConfig::new("Orbit", BuildMode::Single, "Builds");
    config.current_version = "1.0.0".to_string();
    config.scenes = vec![Some("Assets/Scenes/Main.unity".to_string()), None];
    config.profiles = default_profiles("Orbit")
        .into_iter()
        .map(|p| p.with_target(BuildTarget::Android))
        .collect();
    config.setup_complete = true;
    config
}

fn wildcard_project() -> ProjectConfig {
    let mut config = ProjectConfig::new("Suite", BuildMode::Wildcard, "Builds");
    config.current_version = "1.0.0".to_string();
    config.add_variant("Orbit", "").expect("add orbit");
    config.add_variant("Nebula", "").expect("add nebula");
    for variant in &mut config.variants {
        variant.scene_refs = vec![Some(format!("{}.unity", variant.code_name))];
        for profile in &mut variant.build_profiles {
            profile.build_target = BuildTarget::Android;
        }
    }
    config.setup_complete = true;
    config
}

fn seeded_fs(config: &ProjectConfig) -> MockFileSystemProvider {
    MockFileSystemProvider::new().with_file(
        config_path(&root()),
        serde_json::to_string_pretty(config).expect("serialize config"),
    )
}

fn stored(fs: &MockFileSystemProvider) -> ProjectConfig {
    ConfigStore::new(root(), fs)
        .load()
        .expect("load config")
        .expect("config present")
}

// ===== SETUP =====

#[test]
fn test_setup_single_mode_writes_config() -> Result<()> {
    let fs = MockFileSystemProvider::new();
    let interactive = MockInteractiveProvider::new()
        .with_select(0)
        .with_text_inputs(&["Orbit", "", "Builds", "Assets/Scenes/Main.unity", ""]);
    let session = MockCommandSession::new()
        .with_filesystem(fs.clone())
        .with_interactive(interactive.clone());

    execute_command_with_session(Commands::Setup { reset: false }, &session)?;

    let config = stored(&fs);
    assert!(config.setup_complete);
    assert_eq!(config.mode, BuildMode::Single);
    assert_eq!(config.project_name, "Orbit");
    assert_eq!(config.scenes, vec![Some("Assets/Scenes/Main.unity".to_string())]);
    assert_eq!(config.profiles.len(), 2);
    assert!(fs.has_directory(&root().join("Builds")));
    assert!(interactive.get_prompts().iter().any(|p| p.starts_with("Create ")));
    assert!(session.display_provider.mentions("Setup complete"));
    Ok(())
}

#[test]
fn test_setup_wildcard_mode_collects_variants() -> Result<()> {
    let fs = MockFileSystemProvider::new().with_directory(root().join("Builds"));
    let interactive = MockInteractiveProvider::new().with_select(1).with_text_inputs(&[
        "Suite",
        "",
        "Orbit",
        "ORBIT_GAME",
        "Nebula",
        "",
        "",
        "Builds",
        "Orbit.unity",
        "",
        "Nebula.unity",
        "",
    ]);
    let session = MockCommandSession::new()
        .with_filesystem(fs.clone())
        .with_interactive(interactive);

    execute_command_with_session(Commands::Setup { reset: false }, &session)?;

    let config = stored(&fs);
    assert_eq!(config.mode, BuildMode::Wildcard);
    let orbit = config.variant("Orbit").expect("orbit");
    assert_eq!(orbit.define_symbol, "ORBIT_GAME");
    assert_eq!(orbit.scene_refs, vec![Some("Orbit.unity".to_string())]);
    let nebula = config.variant("Nebula").expect("nebula");
    assert_eq!(nebula.define_symbol, "NEBULA");
    assert_eq!(nebula.build_profiles.len(), 2);
    Ok(())
}

#[test]
fn test_setup_retries_failed_step() -> Result<()> {
    let fs = MockFileSystemProvider::new().with_directory(root().join("Builds"));
    let interactive = MockInteractiveProvider::new()
        .with_select(0)
        .with_select(0)
        .with_text_inputs(&["", "", "Orbit", "", "Builds", "Main.unity", ""]);
    let session = MockCommandSession::new()
        .with_filesystem(fs.clone())
        .with_interactive(interactive);

    execute_command_with_session(Commands::Setup { reset: false }, &session)?;

    assert!(session.display_provider.has_call(&DisplayCall::StatusWarning {
        message: "Project name is empty".to_string()
    }));
    assert_eq!(stored(&fs).project_name, "Orbit");
    Ok(())
}

#[test]
fn test_setup_cancel_writes_nothing() {
    let fs = MockFileSystemProvider::new();
    let interactive = MockInteractiveProvider::new()
        .with_select(0)
        .with_select(2)
        .with_text_inputs(&["", ""]);
    let session = MockCommandSession::new()
        .with_filesystem(fs.clone())
        .with_interactive(interactive);

    let err = execute_command_with_session(Commands::Setup { reset: false }, &session).unwrap_err();

    assert!(err.to_string().contains("Setup cancelled"));
    assert!(fs.file(&config_path(&root())).is_none());
}

#[test]
fn test_setup_gives_up_after_repeated_failures() {
    let interactive = MockInteractiveProvider::new()
        .with_select(0)
        .with_select(0)
        .with_select(0)
        .with_text_inputs(&["", "", "", "", "", ""]);
    let session = MockCommandSession::new().with_interactive(interactive);

    let err = execute_command_with_session(Commands::Setup { reset: false }, &session).unwrap_err();
    assert!(err.to_string().contains("after 3 failed attempts"));
}

#[test]
fn test_setup_skips_configured_project() -> Result<()> {
    let fs = seeded_fs(&single_project());
    let interactive = MockInteractiveProvider::new();
    let session = MockCommandSession::new()
        .with_filesystem(fs.clone())
        .with_interactive(interactive.clone());

    execute_command_with_session(Commands::Setup { reset: false }, &session)?;

    assert!(interactive.get_prompts().is_empty());
    assert!(session.display_provider.mentions("already set up"));
    assert_eq!(stored(&fs), single_project());
    Ok(())
}

#[test]
fn test_setup_reset_keeps_version() -> Result<()> {
    let mut existing = single_project();
    existing.current_version = "2.3.4".to_string();
    let fs = seeded_fs(&existing).with_directory(root().join("Out"));
    let interactive = MockInteractiveProvider::new()
        .with_select(0)
        .with_text_inputs(&["Comet", "", "Out", "Comet.unity", ""]);
    let session = MockCommandSession::new()
        .with_filesystem(fs.clone())
        .with_interactive(interactive);

    execute_command_with_session(Commands::Setup { reset: true }, &session)?;

    let config = stored(&fs);
    assert_eq!(config.project_name, "Comet");
    assert_eq!(config.current_version, "2.3.4");
    assert_eq!(config.build_folder_path, PathBuf::from("Out"));
    assert!(config.setup_complete);
    Ok(())
}

// ===== STATUS & VERSION =====

#[test]
fn test_commands_require_setup() {
    let session = MockCommandSession::new();

    let err = execute_command_with_session(Commands::Status, &session).unwrap_err();

    assert!(err.to_string().contains("setup is not complete"));
    assert!(session.display_provider.mentions("buildsmith setup"));
}

#[test]
fn test_incomplete_setup_is_rejected() {
    let mut config = single_project();
    config.setup_complete = false;
    let session = MockCommandSession::new().with_filesystem(seeded_fs(&config));

    assert!(execute_command_with_session(Commands::Status, &session).is_err());
}

#[test]
fn test_status_single_project() -> Result<()> {
    let session = MockCommandSession::new().with_filesystem(seeded_fs(&single_project()));

    execute_command_with_session(Commands::Status, &session)?;

    let display = &session.display_provider;
    assert!(display.has_call(&DisplayCall::StatusSection {
        title: "Orbit".to_string()
    }));
    assert!(display.has_call(&DisplayCall::StatusMessage {
        text: "Version: 1.0.0".to_string()
    }));
    assert!(display.mentions("1 scene slot(s) unassigned"));
    assert!(display.has_call(&DisplayCall::StatusList {
        items: vec!["Production".to_string(), "Development".to_string()]
    }));
    Ok(())
}

#[test]
fn test_status_wildcard_shows_active_variant() -> Result<()> {
    let session = MockCommandSession::new()
        .with_filesystem(seeded_fs(&wildcard_project()))
        .with_defines(MockDefineRegistry::new().with_symbols("standalone", &["NEBULA"]));

    execute_command_with_session(Commands::Status, &session)?;

    let display = &session.display_provider;
    assert!(display.has_call(&DisplayCall::StatusMessage {
        text: "Active variant: Nebula".to_string()
    }));
    assert!(display.mentions("Nebula [NEBULA] 1 scene(s), 2 profile(s) (active)"));
    Ok(())
}

#[test]
fn test_version_show() -> Result<()> {
    let session = MockCommandSession::new().with_filesystem(seeded_fs(&single_project()));

    execute_command_with_session(Commands::Version { action: None }, &session)?;

    assert!(session.display_provider.has_call(&DisplayCall::StatusMessage {
        text: "1.0.0".to_string()
    }));
    Ok(())
}

#[test]
fn test_version_bump_is_persisted() -> Result<()> {
    let fs = seeded_fs(&single_project());
    let session = MockCommandSession::new().with_filesystem(fs.clone());

    execute_command_with_session(
        Commands::Version {
            action: Some(VersionAction::Bump {
                part: VersionPart::Minor,
            }),
        },
        &session,
    )?;

    assert_eq!(stored(&fs).current_version, "1.1.0");
    assert!(session.display_provider.mentions("1.0.0 -> 1.1.0"));
    Ok(())
}

// ===== VARIANTS =====

#[test]
fn test_variant_add_persists_with_default_profiles() -> Result<()> {
    let fs = seeded_fs(&wildcard_project());
    let session = MockCommandSession::new().with_filesystem(fs.clone());

    execute_command_with_session(
        Commands::Variant {
            action: VariantAction::Add {
                code_name: "Comet".to_string(),
                define: None,
            },
        },
        &session,
    )?;

    let config = stored(&fs);
    let comet = config.variant("Comet").expect("comet");
    assert_eq!(comet.define_symbol, "COMET");
    assert_eq!(comet.build_profiles.len(), 2);
    Ok(())
}

#[test]
fn test_variant_add_duplicate_is_noop() -> Result<()> {
    let fs = seeded_fs(&wildcard_project());
    let session = MockCommandSession::new().with_filesystem(fs.clone());

    execute_command_with_session(
        Commands::Variant {
            action: VariantAction::Add {
                code_name: "ORBIT".to_string(),
                define: Some("OTHER".to_string()),
            },
        },
        &session,
    )?;

    assert!(session.display_provider.mentions("already used"));
    assert_eq!(stored(&fs).variants.len(), 2);
    Ok(())
}

#[test]
fn test_variant_add_with_taken_define_is_noop() -> Result<()> {
    let fs = seeded_fs(&wildcard_project());
    let session = MockCommandSession::new().with_filesystem(fs.clone());

    execute_command_with_session(
        Commands::Variant {
            action: VariantAction::Add {
                code_name: "orbit_two".to_string(),
                define: Some("ORBIT".to_string()),
            },
        },
        &session,
    )?;

    assert!(session.display_provider.mentions("'ORBIT' is already used"));
    assert_eq!(stored(&fs).variants.len(), 2);
    Ok(())
}

#[test]
fn test_variant_add_rejects_path_like_code_name() {
    let fs = seeded_fs(&wildcard_project());
    let session = MockCommandSession::new().with_filesystem(fs.clone());

    let result = execute_command_with_session(
        Commands::Variant {
            action: VariantAction::Add {
                code_name: "../escape".to_string(),
                define: None,
            },
        },
        &session,
    );

    assert!(result.unwrap_err().to_string().contains("path separators"));
    assert_eq!(stored(&fs).variants.len(), 2);
}

#[test]
fn test_variant_commands_need_wildcard_mode() {
    let session = MockCommandSession::new().with_filesystem(seeded_fs(&single_project()));

    let err = execute_command_with_session(
        Commands::Variant {
            action: VariantAction::List,
        },
        &session,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ProjectError>(),
        Some(ProjectError::WrongMode { .. })
    ));
}

#[test]
fn test_variant_switch_updates_defines() -> Result<()> {
    let defines = MockDefineRegistry::new().with_symbols("standalone", &["ORBIT", "CHEATS"]);
    let session = MockCommandSession::new()
        .with_filesystem(seeded_fs(&wildcard_project()))
        .with_defines(defines.clone());

    execute_command_with_session(
        Commands::Variant {
            action: VariantAction::Switch {
                code_name: "nebula".to_string(),
            },
        },
        &session,
    )?;

    let symbols: Vec<String> = defines.symbols("standalone").into_iter().collect();
    assert_eq!(symbols, vec!["CHEATS".to_string(), "NEBULA".to_string()]);
    assert!(session.display_provider.mentions("Switched to Nebula"));
    Ok(())
}

#[test]
fn test_variant_remove() -> Result<()> {
    let fs = seeded_fs(&wildcard_project());
    let session = MockCommandSession::new().with_filesystem(fs.clone());

    execute_command_with_session(
        Commands::Variant {
            action: VariantAction::Remove {
                code_name: "Orbit".to_string(),
            },
        },
        &session,
    )?;

    let config = stored(&fs);
    assert!(config.variant("Orbit").is_none());
    assert!(!config.code_names().contains("orbit"));
    Ok(())
}

// ===== PROFILES =====

#[test]
fn test_profile_add_single_mode() -> Result<()> {
    let fs = seeded_fs(&single_project());
    let session = MockCommandSession::new().with_filesystem(fs.clone());

    execute_command_with_session(
        Commands::Profile {
            action: ProfileAction::Add {
                name: "QA".to_string(),
                variant: None,
                development: true,
                target: Some(BuildTarget::WebGl),
                suffix: None,
            },
        },
        &session,
    )?;

    let config = stored(&fs);
    let qa = config.profiles.iter().find(|p| p.is_named("qa")).expect("qa");
    assert_eq!(qa.build_suffix, "dev");
    assert_eq!(qa.build_target, BuildTarget::WebGl);
    assert_eq!(qa.product_name, "Orbit");
    assert!(qa.script_debugging);
    Ok(())
}

#[test]
fn test_profile_add_wildcard_uses_active_variant() -> Result<()> {
    let fs = seeded_fs(&wildcard_project());
    let session = MockCommandSession::new()
        .with_filesystem(fs.clone())
        .with_defines(MockDefineRegistry::new().with_symbols("standalone", &["NEBULA"]));

    execute_command_with_session(
        Commands::Profile {
            action: ProfileAction::Add {
                name: "Demo".to_string(),
                variant: None,
                development: false,
                target: None,
                suffix: Some("demo".to_string()),
            },
        },
        &session,
    )?;

    let config = stored(&fs);
    assert_eq!(config.variant("Nebula").expect("nebula").build_profiles.len(), 3);
    assert_eq!(config.variant("Orbit").expect("orbit").build_profiles.len(), 2);
    Ok(())
}

#[test]
fn test_profile_remove_and_list() -> Result<()> {
    let fs = seeded_fs(&single_project());
    let session = MockCommandSession::new().with_filesystem(fs.clone());

    execute_command_with_session(
        Commands::Profile {
            action: ProfileAction::Remove {
                name: "development".to_string(),
                variant: None,
            },
        },
        &session,
    )?;
    execute_command_with_session(
        Commands::Profile {
            action: ProfileAction::List { variant: None },
        },
        &session,
    )?;

    assert_eq!(stored(&fs).profiles.len(), 1);
    assert!(session.display_provider.has_call(&DisplayCall::StatusList {
        items: vec!["Production [prd] android".to_string()]
    }));
    Ok(())
}

// ===== PATH & BUILD =====

#[test]
fn test_path_prints_next_artifact() -> Result<()> {
    let session = MockCommandSession::new().with_filesystem(seeded_fs(&single_project()));

    execute_command_with_session(
        Commands::Path {
            variant: None,
            profile: Some("Development".to_string()),
        },
        &session,
    )?;

    let expected = root().join("Builds/orbit-dev-v1-0-0-250714-rev1.apk");
    assert!(session.display_provider.has_call(&DisplayCall::StatusMessage {
        text: expected.display().to_string()
    }));
    Ok(())
}

#[test]
fn test_path_skips_existing_revisions() -> Result<()> {
    let fs = seeded_fs(&single_project()).with_file(
        root().join("Builds/orbit-prd-v1-0-0-250714-rev1.apk"),
        String::new(),
    );
    let session = MockCommandSession::new().with_filesystem(fs);

    execute_command_with_session(
        Commands::Path {
            variant: None,
            profile: None,
        },
        &session,
    )?;

    assert!(session.display_provider.mentions("orbit-prd-v1-0-0-250714-rev2.apk"));
    Ok(())
}

#[test]
fn test_build_default_profile() -> Result<()> {
    let executor = MockBuildExecutor::new();
    let session = MockCommandSession::new()
        .with_filesystem(seeded_fs(&single_project()))
        .with_build_executor(executor.clone());

    execute_command_with_session(
        Commands::Build {
            variant: None,
            profile: None,
            all: false,
        },
        &session,
    )?;

    let requests = executor.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1.product_name, "Orbit");
    let display = &session.display_provider;
    assert!(display.mentions("Skipped 1 unassigned scene slot(s)"));
    assert!(display.has_call(&DisplayCall::ProgressFinish {
        message: "orbit-prd-v1-0-0-250714-rev1".to_string()
    }));
    assert!(display.mentions("KiB"));
    Ok(())
}

#[test]
fn test_build_all_wildcard_active_variant() -> Result<()> {
    let executor = MockBuildExecutor::new();
    let session = MockCommandSession::new()
        .with_filesystem(seeded_fs(&wildcard_project()))
        .with_defines(MockDefineRegistry::new().with_symbols("standalone", &["NEBULA"]))
        .with_build_executor(executor.clone());

    execute_command_with_session(
        Commands::Build {
            variant: None,
            profile: None,
            all: true,
        },
        &session,
    )?;

    let requests = executor.get_requests();
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|(_, r)| r.define_symbol.as_deref() == Some("NEBULA")));
    let display = &session.display_provider;
    assert!(display.has_call(&DisplayCall::StatusStep {
        current: 2,
        total: 2,
        description: "Building Development".to_string()
    }));
    let finished = display
        .get_calls()
        .iter()
        .filter(|c| matches!(c, DisplayCall::ProgressFinish { .. }))
        .count();
    assert_eq!(finished, 2);
    Ok(())
}

#[test]
fn test_build_failure_is_reported_and_stops() {
    let executor = MockBuildExecutor::new()
        .with_outcome(Err("license check failed".to_string()))
        .with_outcome(Ok(BuildReport {
            succeeded: true,
            total_size: 1,
        }));
    let session = MockCommandSession::new()
        .with_filesystem(seeded_fs(&single_project()))
        .with_build_executor(executor.clone());

    let err = execute_command_with_session(
        Commands::Build {
            variant: None,
            profile: None,
            all: true,
        },
        &session,
    )
    .unwrap_err();

    assert!(err.to_string().contains("Production"));
    assert_eq!(executor.get_requests().len(), 1);
    let display = &session.display_provider;
    assert!(display.has_call(&DisplayCall::StatusError {
        item: "Build failed".to_string(),
        details: "license check failed".to_string()
    }));
    assert!(display
        .get_calls()
        .iter()
        .any(|c| matches!(c, DisplayCall::ProgressAbandon { .. })));
}

#[test]
fn test_build_unknown_variant() {
    let session = MockCommandSession::new().with_filesystem(seeded_fs(&wildcard_project()));

    let err = execute_command_with_session(
        Commands::Build {
            variant: Some("Comet".to_string()),
            profile: None,
            all: false,
        },
        &session,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown variant"));
}
