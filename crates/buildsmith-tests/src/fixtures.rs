//! Project fixtures for E2E tests
//!
//! Ready-made configurations written into a test project root. Scene files
//! referenced by a fixture are created alongside it so the live scene
//! resolver finds them.

use anyhow::Result;
use buildsmith_lib::application::session::LiveFileSystemProvider;
use buildsmith_lib::primitives::{BuildMode, BuildTarget};
use buildsmith_lib::project::{ConfigStore, ProjectConfig, default_profiles};
use std::fs;
use std::path::Path;

/// Single-mode project with one assigned and one unassigned scene slot,
/// building desktop players for Linux
pub fn single_project(name: &str) -> ProjectConfig {
    let mut config = ProjectConfig::new(name, BuildMode::Single, "Builds");
    config.current_version = "1.0.0".to_string();
    config.scenes = vec![Some("Assets/Scenes/Main.unity".to_string()), None];
    config.profiles = default_profiles(name)
        .into_iter()
        .map(|p| p.with_target(BuildTarget::StandaloneLinux64))
        .collect();
    config.setup_complete = true;
    config
}

/// Wildcard project with one Android-targeting variant per code name
pub fn wildcard_project(name: &str, code_names: &[&str]) -> Result<ProjectConfig> {
    let mut config = ProjectConfig::new(name, BuildMode::Wildcard, "Builds");
    config.current_version = "1.0.0".to_string();
    for code_name in code_names {
        config.add_variant(code_name, "")?;
    }
    for variant in &mut config.variants {
        variant.scene_refs = vec![Some(format!("Assets/Scenes/{}.unity", variant.code_name))];
        for profile in &mut variant.build_profiles {
            profile.build_target = BuildTarget::Android;
        }
    }
    config.setup_complete = true;
    Ok(config)
}

/// Persist `config` under `root` and create every scene file it references
pub fn write_project(root: &Path, config: &ProjectConfig) -> Result<()> {
    ConfigStore::new(root, &LiveFileSystemProvider).save(config)?;

    let scenes = config
        .scenes
        .iter()
        .chain(config.variants.iter().flat_map(|v| v.scene_refs.iter()))
        .flatten();
    for scene in scenes {
        let path = root.join(scene);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "")?;
    }
    Ok(())
}

/// Load the project config persisted under `root`
pub fn read_project(root: &Path) -> Result<ProjectConfig> {
    ConfigStore::new(root, &LiveFileSystemProvider)
        .load()?
        .ok_or_else(|| anyhow::anyhow!("No project config under {}", root.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_project_creates_scene_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = wildcard_project("Suite", &["Orbit", "Nebula"])?;

        write_project(dir.path(), &config)?;

        assert!(dir.path().join("Assets/Scenes/Orbit.unity").is_file());
        assert!(dir.path().join("Assets/Scenes/Nebula.unity").is_file());
        assert_eq!(read_project(dir.path())?, config);
        Ok(())
    }
}
