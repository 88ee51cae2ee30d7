use super::*;
use crate::application::session_mocks::{MockCommandSession, MockConfigProvider, MockFileSystemProvider};

fn root() -> PathBuf {
    PathBuf::from("/test/workdir")
}

#[test]
fn test_define_registry_empty_when_file_missing() -> Result<()> {
    let registry = FileDefineRegistry::new(&root(), MockFileSystemProvider::new());
    assert!(registry.get("standalone")?.is_empty());
    Ok(())
}

#[test]
fn test_define_registry_persists_per_group() -> Result<()> {
    let fs = MockFileSystemProvider::new();
    let registry = FileDefineRegistry::new(&root(), fs.clone());

    let standalone: BTreeSet<String> = ["ORBIT", "LOGGING"].iter().map(|s| s.to_string()).collect();
    let android: BTreeSet<String> = ["NEBULA"].iter().map(|s| s.to_string()).collect();
    registry.set("standalone", &standalone)?;
    registry.set("android", &android)?;

    assert_eq!(registry.get("standalone")?, standalone);
    assert_eq!(registry.get("android")?, android);
    assert!(fs.is_file(&root().join(".buildsmith/defines.json")));

    // A second registry over the same files sees the same state
    let reopened = FileDefineRegistry::new(&root(), fs);
    assert_eq!(reopened.get("android")?, android);
    Ok(())
}

#[test]
fn test_define_registry_rejects_malformed_file() {
    let fs = MockFileSystemProvider::new().with_file(
        root().join(".buildsmith/defines.json"),
        "not json".to_string(),
    );
    let registry = FileDefineRegistry::new(&root(), fs);
    assert!(registry.get("standalone").is_err());
}

#[test]
fn test_define_registry_write_failure_propagates() {
    let registry = FileDefineRegistry::new(&root(), MockFileSystemProvider::new().with_read_only());
    let symbols: BTreeSet<String> = ["ORBIT".to_string()].into_iter().collect();
    assert!(registry.set("standalone", &symbols).is_err());
}

#[test]
fn test_scene_resolver_finds_project_relative_scene() -> Result<()> {
    let fs = MockFileSystemProvider::new()
        .with_file(root().join("Assets/Scenes/Main.unity"), String::new());
    let resolver = ProjectSceneResolver::new(&root(), fs);

    let path = resolver.resolve(&"Assets/Scenes/Main.unity".to_string())?;
    assert_eq!(path, root().join("Assets/Scenes/Main.unity"));
    Ok(())
}

#[test]
fn test_scene_resolver_reports_missing_scene() {
    let resolver = ProjectSceneResolver::new(&root(), MockFileSystemProvider::new());
    let err = resolver
        .resolve(&"Assets/Scenes/Gone.unity".to_string())
        .unwrap_err();
    assert!(err.to_string().contains("Scene not found"));
}

#[test]
fn test_project_root_prefers_workdir() -> Result<()> {
    let session = MockCommandSession::new();
    assert_eq!(session.project_root()?, root());

    let config = AppConfig {
        workdir: Some(PathBuf::from("/elsewhere")),
        ..AppConfig::default()
    };
    let session = MockCommandSession::new().with_config(MockConfigProvider::new(config));
    assert_eq!(session.project_root()?, PathBuf::from("/elsewhere"));
    Ok(())
}

#[test]
fn test_command_session_wires_registry_to_workdir() -> Result<()> {
    use crate::application::session_mocks::{MockInteractiveProvider, MockProcessProvider, mock_today};
    use crate::display::MockDisplayProvider;

    let fs = MockFileSystemProvider::new();
    let session = CommandSession::new_with_providers(
        Box::new(MockDisplayProvider::new()),
        fs.clone(),
        MockProcessProvider::new(),
        MockConfigProvider::new(AppConfig::default()),
        MockInteractiveProvider::new(),
        mock_today(),
    )?;

    let symbols: BTreeSet<String> = ["ORBIT".to_string()].into_iter().collect();
    session.defines().set("standalone", &symbols)?;

    assert!(fs.is_file(&root().join(".buildsmith/defines.json")));
    assert_eq!(session.today(), mock_today());
    Ok(())
}

#[test]
fn test_command_session_executor_runs_through_session_process() -> Result<()> {
    use crate::application::session_mocks::{MockInteractiveProvider, MockProcessProvider, mock_today};
    use crate::display::MockDisplayProvider;
    use crate::primitives::BuildTarget;
    use crate::project::builds::{BuildOptions, BuildRequest};

    let process = MockProcessProvider::new();
    let config = AppConfig {
        build_command: Some("make player".to_string()),
        ..AppConfig::default()
    };
    let session = CommandSession::new_with_providers(
        Box::new(MockDisplayProvider::new()),
        MockFileSystemProvider::new(),
        process.clone(),
        MockConfigProvider::new(config),
        MockInteractiveProvider::new(),
        mock_today(),
    )?;

    let request = BuildRequest {
        scenes: vec![root().join("Assets/Main.unity")],
        output_path: root().join("Builds/orbit.apk"),
        artifact_root: root().join("Builds"),
        target: BuildTarget::Android,
        product_name: "Orbit".to_string(),
        define_symbol: None,
        options: BuildOptions::default(),
        working_dir: root(),
    };
    let report = session
        .build_executor(TargetFamily::MobileAndroid)
        .build(&request)?;

    assert!(report.succeeded);
    let calls = process.get_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].args.iter().any(|a| a == "make player"));
    assert_eq!(calls[0].env_var("BUILDSMITH_PRODUCT"), Some("Orbit"));
    Ok(())
}

#[test]
fn test_live_filesystem_lists_direct_entries() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("rev1/Data"))?;
    std::fs::write(dir.path().join("rev2.apk"), "apk")?;

    let fs = LiveFileSystemProvider;
    let entries = fs.get_file_list(dir.path())?;
    assert_eq!(entries.len(), 2);
    assert!(entries.contains(&dir.path().join("rev1")));
    assert!(entries.contains(&dir.path().join("rev2.apk")));

    assert!(fs.get_file_list(&dir.path().join("absent"))?.is_empty());
    Ok(())
}

#[test]
fn test_live_filesystem_measures_directory_tree() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::create_dir_all(dir.path().join("Data"))?;
    std::fs::write(dir.path().join("Game.exe"), "12345")?;
    std::fs::write(dir.path().join("Data/level0"), "abc")?;

    let fs = LiveFileSystemProvider;
    assert_eq!(fs.size_of(dir.path())?, 8);
    assert_eq!(fs.size_of(&dir.path().join("Game.exe"))?, 5);
    assert!(fs.size_of(&dir.path().join("missing")).is_err());
    Ok(())
}
