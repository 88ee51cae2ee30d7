use crate::application::session_mocks::{MockFileSystemProvider, mock_today};
use crate::primitives::{BuildMode, BuildTarget};
use crate::project::model::ProjectConfig;
use crate::project::profile::{default_development_profile, default_production_profile};
use std::path::Path;

fn single_project() -> ProjectConfig {
    let mut config = ProjectConfig::new("MyProj", BuildMode::Single, "/test/workdir/Builds");
    config.scenes = vec![Some("Assets/Scenes/Main.unity".to_string())];
    config
}

#[test]
fn test_artifact_base_format() {
    let base = artifact_base("MyProj", "dev", "1.0.0", mock_today()).expect("base");
    assert_eq!(base, "myproj-dev-v1-0-0-250714");
}

#[test]
fn test_artifact_base_keeps_version_as_written() {
    let base = artifact_base("Orbit", "prd", "1.2", mock_today()).expect("base");
    assert_eq!(base, "orbit-prd-v1-2-250714");
}

#[test]
fn test_artifact_base_rejects_bad_version() {
    let err = artifact_base("Orbit", "prd", "1.x.0", mock_today()).unwrap_err();
    assert!(matches!(err, ArtifactError::Version { .. }));
}

#[test]
fn test_artifact_base_requires_code_name() {
    let err = artifact_base("  ", "prd", "1.0.0", mock_today()).unwrap_err();
    assert_eq!(err, ArtifactError::EmptyCodeName);
}

#[test]
fn test_first_build_gets_revision_one() {
    let fs = MockFileSystemProvider::new();
    let config = single_project();
    let scope = config.scope(None).expect("scope");
    let profile =
        default_development_profile("MyProj").with_target(BuildTarget::StandaloneWindows64);

    let artifact = resolve_artifact_path(&fs, &scope, &profile, "1.0.0", mock_today())
        .expect("artifact path");

    assert_eq!(artifact.revision, 1);
    assert_eq!(artifact.candidate, "myproj-dev-v1-0-0-250714-rev1");
    assert_eq!(
        artifact.artifact_root,
        Path::new("/test/workdir/Builds/myproj-dev-v1-0-0-250714-rev1")
    );
    assert_eq!(
        artifact.output_path,
        Path::new("/test/workdir/Builds/myproj-dev-v1-0-0-250714-rev1/MyProj.exe")
    );
}

#[test]
fn test_existing_directories_push_revision_up() {
    let builds = Path::new("/test/workdir/Builds");
    let fs = MockFileSystemProvider::new()
        .with_directory(builds.join("myproj-dev-v1-0-0-250714-rev1"))
        .with_directory(builds.join("myproj-dev-v1-0-0-250714-rev2"))
        .with_directory(builds.join("myproj-dev-v1-0-0-250714-rev3"));
    let config = single_project();
    let scope = config.scope(None).expect("scope");
    let profile =
        default_development_profile("MyProj").with_target(BuildTarget::StandaloneLinux64);

    let artifact = resolve_artifact_path(&fs, &scope, &profile, "1.0.0", mock_today())
        .expect("artifact path");

    assert_eq!(artifact.revision, 4);
    assert_eq!(artifact.candidate, "myproj-dev-v1-0-0-250714-rev4");
    assert_eq!(
        artifact.output_path,
        builds.join("myproj-dev-v1-0-0-250714-rev4/MyProj")
    );
}

#[test]
fn test_revision_gap_is_reused() {
    let builds = Path::new("/test/workdir/Builds");
    let fs = MockFileSystemProvider::new()
        .with_directory(builds.join("myproj-dev-v1-0-0-250714-rev1"))
        .with_directory(builds.join("myproj-dev-v1-0-0-250714-rev3"));
    let config = single_project();
    let scope = config.scope(None).expect("scope");
    let profile = default_development_profile("MyProj").with_target(BuildTarget::StandaloneOsx);

    let artifact = resolve_artifact_path(&fs, &scope, &profile, "1.0.0", mock_today())
        .expect("artifact path");
    assert_eq!(artifact.revision, 2);
}

#[test]
fn test_file_targets_probe_files_with_extension() {
    let builds = Path::new("/test/workdir/Builds");
    let fs = MockFileSystemProvider::new()
        .with_file(builds.join("myproj-prd-v2-0-1-250714-rev1.apk"), String::new())
        // A directory with the bare candidate name does not block a file target
        .with_directory(builds.join("myproj-prd-v2-0-1-250714-rev2"));
    let config = single_project();
    let scope = config.scope(None).expect("scope");
    let profile = default_production_profile("MyProj").with_target(BuildTarget::Android);

    let artifact = resolve_artifact_path(&fs, &scope, &profile, "2.0.1", mock_today())
        .expect("artifact path");

    assert_eq!(artifact.revision, 2);
    assert_eq!(artifact.artifact_root, builds);
    assert_eq!(
        artifact.output_path,
        builds.join("myproj-prd-v2-0-1-250714-rev2.apk")
    );
}

#[test]
fn test_wildcard_artifacts_land_in_variant_folder() {
    let fs = MockFileSystemProvider::new();
    let mut config = ProjectConfig::new("Suite", BuildMode::Wildcard, "/test/workdir/Builds");
    config.add_variant("Orbit", "").expect("add variant");
    let scope = config.scope(Some("Orbit")).expect("scope");
    let profile = scope.profile("Production").expect("seeded profile").clone();

    let artifact = resolve_artifact_path(&fs, &scope, &profile, "0.1.0", mock_today())
        .expect("artifact path");

    assert!(artifact.candidate.starts_with("orbit-prd-v0-1-0-250714"));
    assert_eq!(artifact.output_dir, Path::new("/test/workdir/Builds/Orbit"));
}

#[test]
fn test_empty_suffix_is_rejected() {
    let fs = MockFileSystemProvider::new();
    let config = single_project();
    let scope = config.scope(None).expect("scope");
    let mut profile = default_production_profile("MyProj");
    profile.build_suffix = " ".to_string();

    let err = resolve_artifact_path(&fs, &scope, &profile, "1.0.0", mock_today()).unwrap_err();
    assert_eq!(
        err,
        ArtifactError::EmptySuffix {
            profile: "Production".to_string()
        }
    );
}

#[test]
fn test_revision_probing_on_real_directory_listing() -> anyhow::Result<()> {
    use crate::application::session::LiveFileSystemProvider;

    let dir = tempfile::tempdir()?;
    let builds = dir.path().join("Builds");
    std::fs::create_dir_all(builds.join("myproj-dev-v1-0-0-250714-rev1"))?;
    std::fs::create_dir_all(builds.join("myproj-dev-v1-0-0-250714-rev2"))?;
    // Same name as the next candidate, but a file cannot hold a player directory
    std::fs::write(builds.join("myproj-dev-v1-0-0-250714-rev3"), "stale")?;

    let mut config = single_project();
    config.build_folder_path = builds.clone();
    let scope = config.scope(None)?;
    let profile =
        default_development_profile("MyProj").with_target(BuildTarget::StandaloneLinux64);

    let artifact = resolve_artifact_path(
        &LiveFileSystemProvider,
        &scope,
        &profile,
        "1.0.0",
        mock_today(),
    )?;
    assert_eq!(artifact.revision, 3);

    // Output folder not created yet
    config.build_folder_path = dir.path().join("Missing");
    let scope = config.scope(None)?;
    let artifact = resolve_artifact_path(
        &LiveFileSystemProvider,
        &scope,
        &profile,
        "1.0.0",
        mock_today(),
    )?;
    assert_eq!(artifact.revision, 1);
    Ok(())
}
