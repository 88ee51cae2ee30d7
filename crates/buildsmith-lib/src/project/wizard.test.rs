use crate::application::session_mocks::MockFileSystemProvider;
use crate::project::profile::{DEVELOPMENT_PROFILE, PRODUCTION_PROFILE};

fn fs_with_builds() -> MockFileSystemProvider {
    MockFileSystemProvider::new().with_directory(PathBuf::from("/test/workdir/Builds"))
}

fn wizard() -> Wizard {
    Wizard::new("/test/workdir")
}

/// Drive a single-mode wizard up to (not through) the Scenes step
fn single_at_scenes(fs: &MockFileSystemProvider) -> Wizard {
    let mut wizard = wizard();
    wizard.advance(fs).expect("mode");
    wizard.set_project_name("Orbit");
    wizard.advance(fs).expect("names");
    wizard.set_build_folder("Builds");
    wizard.advance(fs).expect("folder");
    wizard
}

#[test]
fn test_single_mode_full_flow() -> Result<(), WizardError> {
    let fs = fs_with_builds();
    let mut wizard = single_at_scenes(&fs);
    assert_eq!(wizard.current_step(), WizardStep::Scenes);

    wizard.add_scene(Some("Assets/Scenes/Main.unity".to_string()))?;
    assert_eq!(wizard.advance(&fs)?, WizardStep::Profiles);
    assert_eq!(wizard.advance(&fs)?, WizardStep::Complete);

    let config = wizard.complete()?;
    assert!(config.setup_complete);
    assert_eq!(config.mode, BuildMode::Single);
    assert_eq!(config.project_name, "Orbit");
    assert_eq!(config.current_version, "0.1.0");
    assert_eq!(config.build_folder_path, PathBuf::from("Builds"));
    assert_eq!(config.scenes, vec![Some("Assets/Scenes/Main.unity".to_string())]);

    let names: Vec<&str> = config.profiles.iter().map(|p| p.profile_name.as_str()).collect();
    assert_eq!(names, vec![PRODUCTION_PROFILE, DEVELOPMENT_PROFILE]);
    assert_eq!(config.profiles[0].product_name, "Orbit");
    Ok(())
}

#[test]
fn test_names_step_requires_project_name() {
    let fs = fs_with_builds();
    let mut wizard = wizard();
    wizard.advance(&fs).expect("mode");

    assert!(!wizard.can_advance(&fs));
    let err = wizard.advance(&fs).unwrap_err();
    assert!(matches!(
        err,
        WizardError::Validation(ValidationError::EmptyProjectName)
    ));
    assert_eq!(wizard.current_step(), WizardStep::Names);
}

#[test]
fn test_single_code_name_overrides_effective_name() -> Result<(), WizardError> {
    let fs = fs_with_builds();
    let mut wizard = wizard();
    wizard.advance(&fs)?;
    wizard.set_project_name("Orbit Project");
    wizard.set_project_code_name("Orbit");
    wizard.advance(&fs)?;
    wizard.set_build_folder("Builds");
    wizard.advance(&fs)?;
    wizard.add_scene(Some("Main.unity".to_string()))?;
    wizard.advance(&fs)?;
    wizard.advance(&fs)?;

    let config = wizard.complete()?;
    assert_eq!(config.effective_project_name(), "Orbit");
    assert_eq!(config.profiles[1].product_name, "Orbit");
    Ok(())
}

#[test]
fn test_wildcard_names_are_validated() {
    let fs = fs_with_builds();
    let mut wizard = wizard();
    wizard.set_mode(BuildMode::Wildcard);
    wizard.advance(&fs).expect("mode");
    wizard.set_project_name("Suite");

    assert_eq!(
        wizard.validate(&fs),
        Err(ValidationError::NoVariants)
    );

    wizard.add_variant("Orbit", "");
    wizard.add_variant("orbit", "");
    assert_eq!(
        wizard.validate(&fs),
        Err(ValidationError::DuplicateCodeName {
            name: "orbit".to_string()
        })
    );

    wizard.remove_variant(1);
    wizard.add_variant("  ", "");
    assert_eq!(
        wizard.validate(&fs),
        Err(ValidationError::EmptyCodeName { index: 1 })
    );

    wizard.remove_variant(1);
    assert!(wizard.validate(&fs).is_ok());
}

#[test]
fn test_names_step_rejects_clashing_define_symbols() {
    let fs = MockFileSystemProvider::new();
    let mut wizard = wizard();
    wizard.set_mode(BuildMode::Wildcard);
    wizard.advance(&fs).expect("mode");
    wizard.set_project_name("Arcade");

    wizard.add_variant("SpaceShooter", "");
    wizard.add_variant("space_shooter", "");
    assert_eq!(
        wizard.validate(&fs),
        Err(ValidationError::DuplicateDefineSymbol {
            symbol: "SPACE_SHOOTER".to_string()
        })
    );
    assert!(!wizard.can_advance(&fs));

    wizard.remove_variant(1);
    wizard.add_variant("Racer", "SPACE_SHOOTER");
    assert!(matches!(
        wizard.validate(&fs),
        Err(ValidationError::DuplicateDefineSymbol { .. })
    ));

    wizard.remove_variant(1);
    wizard.add_variant("---", "");
    assert_eq!(
        wizard.validate(&fs),
        Err(ValidationError::EmptyDefineSymbol {
            code_name: "---".to_string()
        })
    );

    wizard.remove_variant(1);
    wizard.add_variant("Racer", "");
    assert!(wizard.advance(&fs).is_ok());
}

#[test]
fn test_names_step_rejects_path_like_code_names() {
    let fs = MockFileSystemProvider::new();
    let mut wizard = wizard();
    wizard.set_mode(BuildMode::Wildcard);
    wizard.advance(&fs).expect("mode");
    wizard.set_project_name("Arcade");

    for name in ["../escape", "/tmp/x", ".."] {
        wizard.add_variant(name, "SYMBOL");
        assert!(
            matches!(
                wizard.validate(&fs),
                Err(ValidationError::InvalidCodeName { .. })
            ),
            "{name} should be rejected"
        );
        wizard.remove_variant(0);
    }
    assert_eq!(wizard.validate(&fs), Err(ValidationError::NoVariants));
}

#[test]
fn test_folder_step_requires_existing_directory() {
    let fs = MockFileSystemProvider::new();
    let mut wizard = wizard();
    wizard.advance(&fs).expect("mode");
    wizard.set_project_name("Orbit");
    wizard.advance(&fs).expect("names");

    assert_eq!(wizard.validate(&fs), Err(ValidationError::EmptyBuildFolder));

    wizard.set_build_folder("Builds");
    assert_eq!(
        wizard.validate(&fs),
        Err(ValidationError::MissingBuildFolder {
            path: PathBuf::from("/test/workdir/Builds")
        })
    );

    let created = wizard.create_build_folder(&fs).expect("create folder");
    assert_eq!(created, PathBuf::from("/test/workdir/Builds"));
    assert_eq!(wizard.advance(&fs).expect("folder"), WizardStep::Scenes);
}

#[test]
fn test_absolute_build_folder_is_used_as_is() {
    let fs = MockFileSystemProvider::new().with_directory(PathBuf::from("/srv/builds"));
    let mut wizard = wizard();
    wizard.set_build_folder("/srv/builds");
    assert_eq!(wizard.resolved_build_folder(), PathBuf::from("/srv/builds"));
    assert!(fs.is_directory(&wizard.resolved_build_folder()));
}

#[test]
fn test_create_build_folder_failure_leaves_state() {
    let fs = MockFileSystemProvider::new().with_read_only();
    let mut wizard = wizard();
    wizard.advance(&fs).expect("mode");
    wizard.set_project_name("Orbit");
    wizard.advance(&fs).expect("names");
    wizard.set_build_folder("Builds");

    let err = wizard.create_build_folder(&fs).unwrap_err();
    assert!(matches!(err, WizardError::Filesystem { .. }));
    assert_eq!(wizard.current_step(), WizardStep::Folder);
    assert_eq!(wizard.build_folder(), "Builds");
    assert!(!wizard.can_advance(&fs));
}

#[test]
fn test_single_scenes_need_one_assigned_slot() -> Result<(), WizardError> {
    let fs = fs_with_builds();
    let mut wizard = single_at_scenes(&fs);

    assert_eq!(wizard.validate(&fs), Err(ValidationError::NoScenes));

    // Empty strings are stored as unassigned slots
    wizard.add_scene(Some(String::new()))?;
    wizard.add_scene(None)?;
    assert_eq!(wizard.validate(&fs), Err(ValidationError::NoScenes));
    assert_eq!(
        wizard.scene_warnings(),
        vec![
            "Scene slot 1 is unassigned".to_string(),
            "Scene slot 2 is unassigned".to_string()
        ]
    );

    wizard.add_scene(Some("Main.unity".to_string()))?;
    assert!(wizard.can_advance(&fs));
    Ok(())
}

#[test]
fn test_wildcard_scenes_blocked_until_every_variant_complete() -> Result<(), WizardError> {
    let fs = fs_with_builds();
    let mut wizard = wizard();
    wizard.set_mode(BuildMode::Wildcard);
    wizard.advance(&fs)?;
    wizard.set_project_name("Suite");
    wizard.add_variant("Orbit", "");
    wizard.add_variant("Nebula", "NEBULA_BUILD");
    wizard.advance(&fs)?;
    wizard.set_build_folder("Builds");
    wizard.advance(&fs)?;

    wizard.select_variant(0)?;
    wizard.add_scene(Some("Orbit.unity".to_string()))?;
    assert_eq!(
        wizard.validate(&fs),
        Err(ValidationError::VariantScenesIncomplete {
            code_name: "Nebula".to_string()
        })
    );

    wizard.select_variant(1)?;
    wizard.add_scene(Some("Nebula.unity".to_string()))?;
    wizard.add_scene(None)?;
    assert!(!wizard.can_advance(&fs));

    wizard.scenes_mut()?.pop();
    assert_eq!(wizard.advance(&fs)?, WizardStep::Profiles);
    assert_eq!(wizard.advance(&fs)?, WizardStep::Complete);

    let config = wizard.complete()?;
    assert_eq!(config.mode, BuildMode::Wildcard);
    assert_eq!(config.variants.len(), 2);
    let nebula = config.variant("Nebula").expect("nebula");
    assert_eq!(nebula.define_symbol, "NEBULA_BUILD");
    assert_eq!(nebula.scene_refs, vec![Some("Nebula.unity".to_string())]);
    assert_eq!(nebula.build_profiles.len(), 2);
    assert_eq!(config.variant("Orbit").expect("orbit").define_symbol, "ORBIT");
    assert!(config.code_names().contains("nebula"));
    Ok(())
}

#[test]
fn test_select_variant_out_of_range() {
    let mut wizard = wizard();
    wizard.set_mode(BuildMode::Wildcard);
    assert!(matches!(
        wizard.select_variant(0),
        Err(WizardError::NoSuchVariant { index: 0 })
    ));
    assert!(matches!(
        wizard.add_scene(Some("Main.unity".to_string())),
        Err(WizardError::NoSuchVariant { .. })
    ));
}

#[test]
fn test_back_never_validates() {
    let fs = fs_with_builds();
    let mut wizard = single_at_scenes(&fs);

    wizard.set_project_name("");
    assert_eq!(wizard.back(), WizardStep::Folder);
    assert_eq!(wizard.back(), WizardStep::Names);
    assert_eq!(wizard.back(), WizardStep::Mode);
    assert_eq!(wizard.back(), WizardStep::Mode);
}

#[test]
fn test_advance_past_complete_fails() -> Result<(), WizardError> {
    let fs = fs_with_builds();
    let mut wizard = single_at_scenes(&fs);
    wizard.add_scene(Some("Main.unity".to_string()))?;
    wizard.advance(&fs)?;
    wizard.advance(&fs)?;

    assert!(!wizard.can_advance(&fs));
    assert!(matches!(
        wizard.advance(&fs),
        Err(WizardError::AlreadyComplete)
    ));
    Ok(())
}

#[test]
fn test_complete_requires_final_step() {
    let fs = fs_with_builds();
    let wizard = single_at_scenes(&fs);
    assert!(matches!(
        wizard.complete(),
        Err(WizardError::NotComplete {
            step: WizardStep::Scenes
        })
    ));
}

#[test]
fn test_seeding_keeps_existing_profiles() -> Result<(), WizardError> {
    let fs = fs_with_builds();
    let mut wizard = single_at_scenes(&fs);
    wizard.add_scene(Some("Main.unity".to_string()))?;
    wizard.advance(&fs)?;
    wizard
        .profiles_mut()?
        .push(BuildProfile::new("QA", "qa", "Orbit").with_development(true));
    wizard.advance(&fs)?;

    let config = wizard.complete()?;
    assert_eq!(config.profiles.len(), 1);
    assert_eq!(config.profiles[0].build_suffix, "qa");
    Ok(())
}

#[test]
fn test_set_version_validates() {
    let mut wizard = wizard();
    assert_eq!(wizard.version(), "0.1.0");

    assert!(wizard.set_version("2.4.1").is_ok());
    assert_eq!(wizard.version(), "2.4.1");

    assert!(matches!(
        wizard.set_version("two"),
        Err(WizardError::Version(_))
    ));
    assert_eq!(wizard.version(), "2.4.1");
}

#[test]
fn test_reset_to_wizard_restarts_setup() -> Result<(), WizardError> {
    let fs = fs_with_builds();
    let mut wizard = single_at_scenes(&fs);
    wizard.add_scene(Some("Main.unity".to_string()))?;
    wizard.advance(&fs)?;
    wizard.advance(&fs)?;
    let mut config = wizard.complete()?;

    wizard.reset_to_wizard(&mut config);

    assert!(!config.setup_complete);
    assert_eq!(config.project_name, "Orbit");
    assert_eq!(wizard.current_step(), WizardStep::Mode);
    assert_eq!(wizard.project_name(), "");
    assert!(wizard.scenes().is_empty());
    assert_eq!(wizard.resolved_build_folder(), PathBuf::from("/test/workdir"));
    Ok(())
}
