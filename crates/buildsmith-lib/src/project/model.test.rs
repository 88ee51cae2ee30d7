use crate::project::profile::default_production_profile;

fn wildcard_project() -> ProjectConfig {
    let mut config = ProjectConfig::new("Skyline", BuildMode::Wildcard, "/builds");
    config.add_variant("Alpha", "").unwrap();
    config.add_variant("Beta", "BETA_BUILD").unwrap();
    config
}

fn defines(symbols: &[&str]) -> HashSet<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_add_variant_seeds_default_profiles() {
    let config = wildcard_project();
    let alpha = config.variant("alpha").unwrap();
    assert_eq!(alpha.define_symbol, "ALPHA");
    assert_eq!(alpha.build_profiles.len(), 2);
    assert_eq!(alpha.build_profiles[0].build_suffix, "prd");
    assert_eq!(alpha.build_profiles[1].build_suffix, "dev");
    assert!(config.code_names().contains("alpha"));
}

#[test]
fn test_add_variant_keeps_explicit_define() {
    let config = wildcard_project();
    assert_eq!(config.variant("Beta").unwrap().define_symbol, "BETA_BUILD");
}

#[test]
fn test_duplicate_variant_differing_in_case_is_rejected() {
    let mut config = wildcard_project();
    let before = config.variants.clone();

    let err = config.add_variant("ALPHA", "OTHER").unwrap_err();
    assert_eq!(
        err,
        ProjectError::DuplicateName {
            name: "ALPHA".to_string()
        }
    );
    assert_eq!(config.variants, before);
}

#[test]
fn test_empty_code_name_is_rejected() {
    let mut config = wildcard_project();
    assert!(matches!(
        config.add_variant("  ", ""),
        Err(ProjectError::InvalidName { .. })
    ));
}

#[test]
fn test_variant_with_taken_define_symbol_is_rejected() {
    let mut config = ProjectConfig::new("Arcade", BuildMode::Wildcard, "/builds");
    config.add_variant("SpaceShooter", "").unwrap();

    let err = config.add_variant("space_shooter", "").unwrap_err();
    assert_eq!(
        err,
        ProjectError::DuplicateName {
            name: "SPACE_SHOOTER".to_string()
        }
    );
    assert!(config.add_variant("Racer", "SPACE_SHOOTER").is_err());
    assert_eq!(config.variants.len(), 1);
    assert!(!config.code_names().contains("space_shooter"));

    // Symbols compare case-sensitively
    assert!(config.add_variant("Racer", "space_shooter").is_ok());
}

#[test]
fn test_code_name_without_derivable_symbol_is_rejected() {
    let mut config = wildcard_project();
    assert!(matches!(
        config.add_variant("---", ""),
        Err(ProjectError::InvalidName { .. })
    ));
    assert!(config.add_variant("---", "DASHES").is_ok());
}

#[test]
fn test_path_like_code_names_are_rejected() {
    let mut config = wildcard_project();
    for name in ["/tmp/x", "../up", "a\\b", "..", "."] {
        assert!(
            matches!(
                config.add_variant(name, "SYMBOL"),
                Err(ProjectError::InvalidName { .. })
            ),
            "{name} should be rejected"
        );
    }
    assert_eq!(config.variants.len(), 2);
    assert_eq!(code_name_problem("Orbit"), None);
}

#[test]
fn test_remove_variant_clears_registry() {
    let mut config = wildcard_project();
    let removed = config.remove_variant("ALPHA").unwrap();
    assert_eq!(removed.code_name, "Alpha");
    assert!(!config.code_names().contains("alpha"));

    // Name is free again
    assert!(config.add_variant("alpha", "").is_ok());
}

#[test]
fn test_remove_missing_variant_is_noop() {
    let mut config = wildcard_project();
    assert!(config.remove_variant("Gamma").is_none());
    assert_eq!(config.variants.len(), 2);
}

#[test]
fn test_active_variant_matches_define() {
    let config = wildcard_project();
    let active = config
        .active_variant(&defines(&["UNRELATED", "BETA_BUILD"]))
        .unwrap();
    assert_eq!(active.code_name, "Beta");
}

#[test]
fn test_active_variant_falls_back_to_first() {
    let config = wildcard_project();
    let active = config.active_variant(&defines(&["NOPE"])).unwrap();
    assert_eq!(active.code_name, "Alpha");
    assert_eq!(
        config.active_variant(&HashSet::new()).unwrap().code_name,
        "Alpha"
    );
}

#[test]
fn test_active_variant_none_for_empty_project() {
    let config = ProjectConfig::new("Skyline", BuildMode::Wildcard, "/builds");
    assert!(config.active_variant(&defines(&["ALPHA"])).is_none());
}

#[test]
fn test_effective_project_name() {
    let mut config = ProjectConfig::new("Skyline", BuildMode::Wildcard, "/builds");
    assert_eq!(config.effective_project_name(), "Skyline");
    config.wildcard_project_name = "SkylineWC".to_string();
    assert_eq!(config.effective_project_name(), "SkylineWC");

    config.mode = BuildMode::Single;
    assert_eq!(config.effective_project_name(), "Skyline");
    config.project_code_name = "sky".to_string();
    assert_eq!(config.effective_project_name(), "sky");
}

#[test]
fn test_round_trip_preserves_effective_name() {
    let mut config = wildcard_project();
    config.wildcard_project_name = "SkylineWC".to_string();
    let before = config.effective_project_name().to_string();

    let json = serde_json::to_string(&config).unwrap();
    let reloaded: ProjectConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded.effective_project_name(), before);
    assert_eq!(reloaded, config);
}

#[test]
fn test_null_scene_slots_round_trip() {
    let mut config = ProjectConfig::new("Skyline", BuildMode::Single, "/builds");
    config.scenes = vec![Some("Scenes/Main.unity".to_string()), None];
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("null"));
    let reloaded: ProjectConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded.scenes, config.scenes);
}

#[test]
fn test_derive_define_symbol() {
    assert_eq!(derive_define_symbol("spaceShooter"), "SPACE_SHOOTER");
    assert_eq!(derive_define_symbol("Space Shooter"), "SPACE_SHOOTER");
    assert_eq!(derive_define_symbol("level2Boss"), "LEVEL2_BOSS");
    assert_eq!(derive_define_symbol("  my--game  "), "MY_GAME");
    assert_eq!(derive_define_symbol("ALPHA"), "ALPHA");
}

#[test]
fn test_scope_wildcard_uses_variant_folder() {
    let config = wildcard_project();
    let scope = config.scope(Some("beta")).unwrap();
    assert_eq!(scope.code_name, "Beta");
    assert_eq!(scope.output_dir, PathBuf::from("/builds/Beta"));
    assert_eq!(scope.define_symbol, Some("BETA_BUILD"));
    assert!(scope.profile("production").is_ok());
    assert!(matches!(
        scope.profile("qa"),
        Err(ProjectError::UnknownProfile { .. })
    ));
}

#[test]
fn test_scope_single_uses_build_root() {
    let mut config = ProjectConfig::new("Skyline", BuildMode::Single, "/builds");
    config.project_code_name = "sky".to_string();
    let scope = config.scope(None).unwrap();
    assert_eq!(scope.code_name, "sky");
    assert_eq!(scope.output_dir, PathBuf::from("/builds"));
    assert!(matches!(
        config.scope(Some("alpha")),
        Err(ProjectError::WrongMode { .. })
    ));
}

#[test]
fn test_scope_errors_in_wildcard_mode() {
    let config = wildcard_project();
    assert_eq!(config.scope(None).unwrap_err(), ProjectError::VariantRequired);
    assert!(matches!(
        config.scope(Some("gamma")),
        Err(ProjectError::UnknownVariant { .. })
    ));
}

#[test]
fn test_add_and_remove_profiles() {
    let mut config = wildcard_project();
    let qa = default_production_profile("Skyline");
    let mut qa = qa;
    qa.profile_name = "QA".to_string();
    qa.build_suffix = "qa".to_string();

    config.add_profile(Some("Alpha"), qa.clone()).unwrap();
    assert_eq!(config.variant("Alpha").unwrap().build_profiles.len(), 3);

    let err = config.add_profile(Some("Alpha"), qa).unwrap_err();
    assert!(matches!(err, ProjectError::DuplicateName { .. }));

    let removed = config.remove_profile(Some("alpha"), "qa").unwrap();
    assert_eq!(removed.unwrap().profile_name, "QA");
    assert!(config.remove_profile(Some("alpha"), "qa").unwrap().is_none());
}

#[test]
fn test_bump_version_updates_config() {
    let mut config = wildcard_project();
    config.current_version = "1.2".to_string();
    assert_eq!(config.bump_version(VersionPart::Patch).unwrap(), "1.2.1");
    assert_eq!(config.current_version, "1.2.1");

    config.current_version = "bad".to_string();
    assert!(matches!(
        config.bump_version(VersionPart::Major),
        Err(ProjectError::Version(_))
    ));
    assert_eq!(config.current_version, "bad");
}

#[test]
fn test_profiles_and_scenes_for_context() {
    let config = wildcard_project();
    assert_eq!(config.profiles_for(Some("alpha")).unwrap().len(), 2);
    assert!(config.scenes_for(Some("Beta")).unwrap().is_empty());
    assert_eq!(
        config.profiles_for(None).unwrap_err(),
        ProjectError::VariantRequired
    );

    let single = ProjectConfig::new("Skyline", BuildMode::Single, "/builds");
    assert_eq!(
        single.profiles_for(None).unwrap().len(),
        single.profiles.len()
    );
    assert!(matches!(
        single.scenes_for(Some("alpha")),
        Err(ProjectError::WrongMode { .. })
    ));
}
