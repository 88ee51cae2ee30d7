use super::*;
use crate::application::session_mocks::MockFileSystemProvider;
use crate::primitives::BuildMode;

fn root() -> PathBuf {
    PathBuf::from("/test/workdir")
}

fn wildcard_config() -> ProjectConfig {
    let mut config = ProjectConfig::new("Orbit Project", BuildMode::Wildcard, "Builds");
    config.wildcard_project_name = "OrbitSuite".to_string();
    config.add_variant("Orbit", "").expect("add orbit");
    config.add_variant("Nebula", "NEBULA_BUILD").expect("add nebula");
    config.variant_mut("Orbit").expect("orbit").scene_refs =
        vec![Some("Assets/Scenes/Main.unity".to_string()), None];
    config.setup_complete = true;
    config
}

#[test]
fn test_load_returns_none_without_config() -> anyhow::Result<()> {
    let fs = MockFileSystemProvider::new();
    let store = ConfigStore::new(root(), &fs);

    assert!(!store.exists());
    assert!(store.load()?.is_none());
    Ok(())
}

#[test]
fn test_config_path_lives_under_buildsmith_dir() {
    assert_eq!(
        config_path(&root()),
        PathBuf::from("/test/workdir/.buildsmith/project.json")
    );
}

#[test]
fn test_save_then_load_preserves_config() -> anyhow::Result<()> {
    let fs = MockFileSystemProvider::new();
    let store = ConfigStore::new(root(), &fs);
    let config = wildcard_config();

    store.save(&config)?;
    assert!(store.exists());

    let loaded = store.load()?.expect("config saved");
    assert_eq!(loaded, config);
    assert_eq!(loaded.effective_project_name(), "OrbitSuite");
    assert_eq!(
        loaded.variant("orbit").expect("orbit").scene_refs,
        vec![Some("Assets/Scenes/Main.unity".to_string()), None]
    );
    Ok(())
}

#[test]
fn test_load_rebuilds_name_registry() -> anyhow::Result<()> {
    // Written by hand without the registry field
    let json = r#"{
        "projectName": "Orbit",
        "mode": "wildcard",
        "currentVersion": "1.0.0",
        "buildFolderPath": "Builds",
        "variants": [
            { "codeName": "Orbit", "defineSymbol": "ORBIT" }
        ],
        "setupComplete": true
    }"#;
    let fs = MockFileSystemProvider::new().with_file(config_path(&root()), json.to_string());
    let store = ConfigStore::new(root(), &fs);

    let mut loaded = store.load()?.expect("config present");
    assert!(loaded.code_names().contains("orbit"));
    assert!(loaded.add_variant("ORBIT", "").is_err());
    Ok(())
}

#[test]
fn test_malformed_config_is_reported() {
    let fs = MockFileSystemProvider::new().with_file(config_path(&root()), "{ nope".to_string());
    let store = ConfigStore::new(root(), &fs);

    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::Malformed { .. }));
}

#[test]
fn test_save_on_read_only_filesystem_fails() {
    let fs = MockFileSystemProvider::new().with_read_only();
    let store = ConfigStore::new(root(), &fs);

    let err = store.save(&wildcard_config()).unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }));
    assert!(!store.exists());
}
