//! Filesystem-based integration testing utilities
//!
//! A temporary project root that is removed on drop, with helpers for the
//! files buildsmith reads: the project config, scenes and prior artifacts.

use crate::Result;
use crate::application::session::LiveFileSystemProvider;
use crate::project::model::ProjectConfig;
use crate::project::store::ConfigStore;
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary project directory with automatic cleanup
pub struct TempDirFixture {
    /// The temporary directory (automatically cleaned up on drop)
    pub temp_dir: TempDir,
}

impl TempDirFixture {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a directory (and parents) below the root
    pub fn create_dir(&self, subdir: &str) -> Result<PathBuf> {
        let dir_path = self.path().join(subdir);
        fs::create_dir_all(&dir_path)
            .with_context(|| format!("Failed to create {}", dir_path.display()))?;
        Ok(dir_path)
    }

    /// Write a file below the root, creating parent directories
    pub fn write_file(&self, file_path: &str, content: &str) -> Result<PathBuf> {
        let full_path = self.path().join(file_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)
            .with_context(|| format!("Failed to write {}", full_path.display()))?;
        Ok(full_path)
    }

    pub fn read_file(&self, file_path: &str) -> Result<String> {
        let full_path = self.path().join(file_path);
        fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read {}", full_path.display()))
    }

    pub fn file_exists(&self, file_path: &str) -> bool {
        self.path().join(file_path).exists()
    }

    /// Persist `config` where buildsmith looks for it
    pub fn write_project(&self, config: &ProjectConfig) -> Result<()> {
        ConfigStore::new(self.path(), &LiveFileSystemProvider).save(config)?;
        Ok(())
    }

    /// Load the persisted project config, if any
    pub fn load_project(&self) -> Result<Option<ProjectConfig>> {
        Ok(ConfigStore::new(self.path(), &LiveFileSystemProvider).load()?)
    }

    /// Create empty scene files so the live scene resolver finds them
    pub fn touch_scenes(&self, scenes: &[&str]) -> Result<()> {
        for scene in scenes {
            self.write_file(scene, "")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("filesystem.test.rs");
}
