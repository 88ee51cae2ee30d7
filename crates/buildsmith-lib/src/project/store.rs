//! Config store: `ProjectConfig` persisted as JSON under the project root

use crate::application::session::FileSystemProvider;
use crate::project::model::ProjectConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Directory holding buildsmith state, relative to the project root
pub const CONFIG_DIR: &str = ".buildsmith";
pub const CONFIG_FILE: &str = "project.json";
pub const DEFINES_FILE: &str = "defines.json";

/// Config store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("Malformed project config {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize project config: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}

/// Loads and saves the project config through a filesystem provider
pub struct ConfigStore<'a> {
    root: PathBuf,
    fs: &'a dyn FileSystemProvider,
}

impl<'a> ConfigStore<'a> {
    pub fn new(root: impl Into<PathBuf>, fs: &'a dyn FileSystemProvider) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    /// Location of the persisted config
    pub fn config_path(&self) -> PathBuf {
        config_path(&self.root)
    }

    pub fn exists(&self) -> bool {
        self.fs.is_file(&self.config_path())
    }

    /// `None` when the project was never set up
    pub fn load(&self) -> Result<Option<ProjectConfig>, StoreError> {
        let path = self.config_path();
        if !self.fs.is_file(&path) {
            debug!(path = %path.display(), "No project config");
            return Ok(None);
        }

        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|source| StoreError::Read {
                path: path.clone(),
                source,
            })?;
        let mut config: ProjectConfig =
            serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
                path: path.clone(),
                source,
            })?;
        config.rebuild_name_registry();

        debug!(path = %path.display(), variants = config.variants.len(), "Loaded project config");
        Ok(Some(config))
    }

    pub fn save(&self, config: &ProjectConfig) -> Result<(), StoreError> {
        let path = self.config_path();
        let content = serde_json::to_string_pretty(config)?;

        let dir = self.root.join(CONFIG_DIR);
        self.fs
            .create_dir_all(&dir)
            .map_err(|source| StoreError::Write {
                path: dir.clone(),
                source,
            })?;
        self.fs
            .write_file(&path, &content)
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), "Saved project config");
        Ok(())
    }
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    include!("store.test.rs");
}
