//! End-to-end tests of the `buildsmith` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PROJECT_JSON: &str = r#"{
  "projectName": "Orbit",
  "mode": "single",
  "currentVersion": "1.2.3",
  "buildFolderPath": "Builds",
  "scenes": ["Assets/Scenes/Main.unity", null],
  "profiles": [
    {
      "profileName": "Production",
      "displayName": "Production",
      "buildSuffix": "prd",
      "productName": "Orbit",
      "buildTargetId": "android",
      "development": false,
      "scriptDebugging": false,
      "defaultDevelopment": false
    }
  ],
  "setupComplete": true
}"#;

fn project() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), ".buildsmith/project.json", PROJECT_JSON);
    write(dir.path(), "Assets/Scenes/Main.unity", "");
    dir
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    fs::write(path, content).expect("write file");
}

fn buildsmith(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("buildsmith").expect("binary built");
    cmd.current_dir(dir)
        .env_remove("BUILDSMITH_BUILD_COMMAND")
        .env_remove("BUILDSMITH_WORKDIR")
        .env_remove("BUILDSMITH_TARGET_GROUP")
        .args(["--color", "never"]);
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = tempfile::tempdir().expect("temp dir");
    buildsmith(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("variant"))
        .stdout(predicate::str::contains("build"));
}

#[test]
fn test_status_requires_setup() {
    let dir = tempfile::tempdir().expect("temp dir");
    buildsmith(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("setup is not complete"));
}

#[test]
fn test_missing_workdir_is_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    buildsmith(dir.path())
        .args(["status", "--workdir"])
        .arg(dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid working directory"));
}

#[test]
fn test_version_show_and_bump() {
    let dir = project();

    buildsmith(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.2.3"));

    buildsmith(dir.path())
        .args(["version", "bump", "patch"])
        .assert()
        .success();

    let saved = fs::read_to_string(dir.path().join(".buildsmith/project.json")).expect("config");
    assert!(saved.contains("\"currentVersion\": \"1.2.4\""));
}

#[test]
fn test_path_uses_workdir_flag() {
    let dir = project();
    let elsewhere = tempfile::tempdir().expect("temp dir");

    buildsmith(elsewhere.path())
        .arg("-w")
        .arg(dir.path())
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("orbit-prd-v1-2-3-"))
        .stdout(predicate::str::contains("-rev1.apk"));
}

#[test]
fn test_variant_commands_rejected_in_single_mode() {
    let dir = project();
    buildsmith(dir.path())
        .args(["variant", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("single mode"));
}

#[test]
fn test_build_without_command_fails() {
    let dir = project();
    buildsmith(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No build command configured"));
}

#[cfg(unix)]
#[test]
fn test_build_runs_configured_command() {
    let dir = project();
    buildsmith(dir.path())
        .args(["build", "--build-command", "printf apk > \"$BUILDSMITH_OUTPUT\""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped 1 unassigned scene slot(s)"));

    let builds: Vec<_> = fs::read_dir(dir.path().join("Builds"))
        .expect("build folder")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(builds.len(), 1);
    assert!(builds[0].ends_with("-rev1.apk"));
}

#[test]
fn test_unattended_setup_needs_scenes() {
    let dir = tempfile::tempdir().expect("temp dir");
    buildsmith(dir.path())
        .args(["setup", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least one scene must be assigned"));

    assert!(!dir.path().join(".buildsmith/project.json").exists());
}
