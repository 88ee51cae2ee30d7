//! Project configuration model
//!
//! `ProjectConfig` is the single value the rest of buildsmith reads and
//! mutates. It is owned by the command session and persisted explicitly
//! through the config store.

use crate::primitives::{BuildMode, VersionPart};
use crate::project::profile::{BuildProfile, default_profiles};
use crate::project::versions::{self, VersionError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Opaque scene handle, resolved to a path by the scene resolver
pub type SceneRef = String;

pub const DEFAULT_VERSION: &str = "0.1.0";

/// Configuration model errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("Name already in use: {name}")]
    DuplicateName { name: String },

    #[error("Unknown variant: {name}")]
    UnknownVariant { name: String },

    #[error("Unknown profile: {name}")]
    UnknownProfile { name: String },

    #[error("No variant selected and the project has no variants")]
    VariantRequired,

    #[error("'{operation}' is not available in {mode} mode")]
    WrongMode { mode: BuildMode, operation: String },

    #[error("Invalid name: {reason}")]
    InvalidName { reason: String },

    #[error(transparent)]
    Version(#[from] VersionError),
}

/// A named build flavor in wildcard mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeNameVariant {
    pub code_name: String,
    pub define_symbol: String,
    #[serde(default)]
    pub scene_refs: Vec<Option<SceneRef>>,
    #[serde(default)]
    pub build_profiles: Vec<BuildProfile>,
}

impl CodeNameVariant {
    /// Variant with an empty scene list and no profiles
    pub fn new(code_name: &str, define_symbol: &str) -> Self {
        Self {
            code_name: code_name.trim().to_string(),
            define_symbol: resolve_define_symbol(code_name, define_symbol),
            scene_refs: Vec::new(),
            build_profiles: Vec::new(),
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.code_name.eq_ignore_ascii_case(name.trim())
    }

    /// Non-empty and no unassigned slots
    pub fn scenes_complete(&self) -> bool {
        !self.scene_refs.is_empty() && self.scene_refs.iter().all(Option::is_some)
    }
}

/// Why `code_name` cannot name a variant, if it cannot.
///
/// Code names become directories under the build root, so they must be a
/// single plain path component.
pub fn code_name_problem(code_name: &str) -> Option<&'static str> {
    let name = code_name.trim();
    if name.is_empty() {
        Some("code name is empty")
    } else if name.contains(['/', '\\']) || Path::new(name).is_absolute() {
        Some("code name must not contain path separators")
    } else if name == "." || name == ".." {
        Some("code name must not be '.' or '..'")
    } else {
        None
    }
}

/// Explicit symbol if given, else the one derived from the code name
pub fn resolve_define_symbol(code_name: &str, define_symbol: &str) -> String {
    if define_symbol.trim().is_empty() {
        derive_define_symbol(code_name)
    } else {
        define_symbol.trim().to_string()
    }
}

/// Uppercase-snake define symbol for a code name (`spaceShooter` -> `SPACE_SHOOTER`)
pub fn derive_define_symbol(code_name: &str) -> String {
    let mut symbol = String::with_capacity(code_name.len() + 4);
    let mut prev: Option<char> = None;

    for ch in code_name.trim().chars() {
        if ch.is_alphanumeric() {
            let boundary = matches!(prev, Some(p) if (p.is_lowercase() || p.is_ascii_digit()) && ch.is_uppercase());
            if boundary && !symbol.ends_with('_') {
                symbol.push('_');
            }
            symbol.extend(ch.to_uppercase());
        } else if !symbol.is_empty() && !symbol.ends_with('_') {
            symbol.push('_');
        }
        prev = Some(ch);
    }

    symbol.trim_matches('_').to_string()
}

/// The part of a project one build reads: naming, output root, scenes, profiles
#[derive(Debug, Clone)]
pub struct BuildScope<'a> {
    /// Name embedded (lowercased) in artifact names
    pub code_name: String,
    /// Directory artifacts are probed and written in
    pub output_dir: PathBuf,
    pub scenes: &'a [Option<SceneRef>],
    pub profiles: &'a [BuildProfile],
    /// Define symbol of the variant, absent in single mode
    pub define_symbol: Option<&'a str>,
}

impl BuildScope<'_> {
    pub fn profile(&self, name: &str) -> Result<&BuildProfile, ProjectError> {
        self.profiles
            .iter()
            .find(|p| p.is_named(name))
            .ok_or_else(|| ProjectError::UnknownProfile {
                name: name.to_string(),
            })
    }
}

/// Persisted project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub project_name: String,
    /// Single-mode override for the effective name
    #[serde(default)]
    pub project_code_name: String,
    /// Wildcard-mode override for the effective name
    #[serde(default)]
    pub wildcard_project_name: String,
    pub mode: BuildMode,
    pub current_version: String,
    pub build_folder_path: PathBuf,
    #[serde(default)]
    pub variants: Vec<CodeNameVariant>,
    #[serde(default)]
    pub profiles: Vec<BuildProfile>,
    #[serde(default)]
    pub scenes: Vec<Option<SceneRef>>,
    #[serde(default)]
    pub setup_complete: bool,
    /// Lowercased code names in use
    #[serde(default)]
    code_names: BTreeSet<String>,
}

impl ProjectConfig {
    pub fn new(project_name: &str, mode: BuildMode, build_folder_path: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.to_string(),
            project_code_name: String::new(),
            wildcard_project_name: String::new(),
            mode,
            current_version: DEFAULT_VERSION.to_string(),
            build_folder_path: build_folder_path.into(),
            variants: Vec::new(),
            profiles: Vec::new(),
            scenes: Vec::new(),
            setup_complete: false,
            code_names: BTreeSet::new(),
        }
    }

    /// Name shown to users and used for single-mode artifacts
    pub fn effective_project_name(&self) -> &str {
        let preferred = match self.mode {
            BuildMode::Wildcard => &self.wildcard_project_name,
            BuildMode::Single => &self.project_code_name,
        };
        if preferred.trim().is_empty() {
            &self.project_name
        } else {
            preferred
        }
    }

    /// Registered code names, lowercased
    pub fn code_names(&self) -> &BTreeSet<String> {
        &self.code_names
    }

    /// Re-derive the name registry from the variant list
    pub fn rebuild_name_registry(&mut self) {
        self.code_names = self
            .variants
            .iter()
            .map(|v| v.code_name.to_lowercase())
            .collect();
    }

    fn name_taken(&self, code_name: &str) -> bool {
        let key = code_name.trim().to_lowercase();
        self.code_names.contains(&key) || self.variants.iter().any(|v| v.is_named(code_name))
    }

    /// Append a variant seeded with the default profile pair
    pub fn add_variant(
        &mut self,
        code_name: &str,
        define_symbol: &str,
    ) -> Result<&CodeNameVariant, ProjectError> {
        if let Some(reason) = code_name_problem(code_name) {
            return Err(ProjectError::InvalidName {
                reason: reason.to_string(),
            });
        }
        if self.name_taken(code_name) {
            warn!(code_name, "Variant not added: name already in use");
            return Err(ProjectError::DuplicateName {
                name: code_name.to_string(),
            });
        }

        let mut variant = CodeNameVariant::new(code_name, define_symbol);
        if variant.define_symbol.is_empty() {
            return Err(ProjectError::InvalidName {
                reason: format!("no define symbol can be derived from '{}'", variant.code_name),
            });
        }
        // Switching relies on each symbol selecting exactly one variant
        if self
            .variants
            .iter()
            .any(|v| v.define_symbol == variant.define_symbol)
        {
            warn!(code_name, define = %variant.define_symbol, "Variant not added: define symbol already in use");
            return Err(ProjectError::DuplicateName {
                name: variant.define_symbol,
            });
        }

        variant.build_profiles = default_profiles(self.effective_project_name());
        self.code_names.insert(variant.code_name.to_lowercase());
        info!(code_name = %variant.code_name, define = %variant.define_symbol, "Added variant");
        self.variants.push(variant);

        let index = self.variants.len() - 1;
        Ok(&self.variants[index])
    }

    /// Remove a variant and its registry entry; absent names are ignored
    pub fn remove_variant(&mut self, code_name: &str) -> Option<CodeNameVariant> {
        self.code_names.remove(&code_name.trim().to_lowercase());
        let index = self.variants.iter().position(|v| v.is_named(code_name))?;
        let removed = self.variants.remove(index);
        info!(code_name = %removed.code_name, "Removed variant");
        Some(removed)
    }

    pub fn variant(&self, code_name: &str) -> Option<&CodeNameVariant> {
        self.variants.iter().find(|v| v.is_named(code_name))
    }

    pub fn variant_mut(&mut self, code_name: &str) -> Option<&mut CodeNameVariant> {
        self.variants.iter_mut().find(|v| v.is_named(code_name))
    }

    /// First variant whose symbol is defined, else the first variant
    pub fn active_variant(&self, current_defines: &HashSet<String>) -> Option<&CodeNameVariant> {
        let matched = self
            .variants
            .iter()
            .find(|v| current_defines.contains(&v.define_symbol));
        if matched.is_none() {
            debug!("No variant symbol defined, falling back to list order");
        }
        matched.or_else(|| self.variants.first())
    }

    /// Scope for a build of `variant` (wildcard) or of the whole project (single)
    pub fn scope(&self, variant: Option<&str>) -> Result<BuildScope<'_>, ProjectError> {
        match (self.mode, variant) {
            (BuildMode::Wildcard, Some(name)) => {
                let v = self
                    .variant(name)
                    .ok_or_else(|| ProjectError::UnknownVariant {
                        name: name.to_string(),
                    })?;
                Ok(BuildScope {
                    code_name: v.code_name.clone(),
                    output_dir: self.build_folder_path.join(&v.code_name),
                    scenes: &v.scene_refs,
                    profiles: &v.build_profiles,
                    define_symbol: Some(v.define_symbol.as_str()),
                })
            }
            (BuildMode::Wildcard, None) => Err(ProjectError::VariantRequired),
            (BuildMode::Single, None) => Ok(BuildScope {
                code_name: self.effective_project_name().to_string(),
                output_dir: self.build_folder_path.clone(),
                scenes: &self.scenes,
                profiles: &self.profiles,
                define_symbol: None,
            }),
            (BuildMode::Single, Some(_)) => Err(ProjectError::WrongMode {
                mode: self.mode,
                operation: "variant selection".to_string(),
            }),
        }
    }

    /// Profiles of `variant` (wildcard) or of the project (single)
    pub fn profiles_for(&self, variant: Option<&str>) -> Result<&[BuildProfile], ProjectError> {
        Ok(self.scope(variant)?.profiles)
    }

    /// Scene slots of `variant` (wildcard) or of the project (single)
    pub fn scenes_for(&self, variant: Option<&str>) -> Result<&[Option<SceneRef>], ProjectError> {
        Ok(self.scope(variant)?.scenes)
    }

    /// Profile list owned by `variant` (wildcard) or by the project (single)
    pub fn profiles_mut(
        &mut self,
        variant: Option<&str>,
    ) -> Result<&mut Vec<BuildProfile>, ProjectError> {
        match (self.mode, variant) {
            (BuildMode::Wildcard, Some(name)) => self
                .variant_mut(name)
                .map(|v| &mut v.build_profiles)
                .ok_or_else(|| ProjectError::UnknownVariant {
                    name: name.to_string(),
                }),
            (BuildMode::Wildcard, None) => Err(ProjectError::VariantRequired),
            (BuildMode::Single, None) => Ok(&mut self.profiles),
            (BuildMode::Single, Some(_)) => Err(ProjectError::WrongMode {
                mode: self.mode,
                operation: "variant selection".to_string(),
            }),
        }
    }

    pub fn add_profile(
        &mut self,
        variant: Option<&str>,
        profile: BuildProfile,
    ) -> Result<(), ProjectError> {
        if profile.profile_name.trim().is_empty() {
            return Err(ProjectError::InvalidName {
                reason: "profile name is empty".to_string(),
            });
        }
        let profiles = self.profiles_mut(variant)?;
        if profiles.iter().any(|p| p.is_named(&profile.profile_name)) {
            warn!(profile = %profile.profile_name, "Profile not added: name already in use");
            return Err(ProjectError::DuplicateName {
                name: profile.profile_name,
            });
        }
        info!(profile = %profile.profile_name, "Added profile");
        profiles.push(profile);
        Ok(())
    }

    /// Remove a profile by name; absent names are ignored
    pub fn remove_profile(
        &mut self,
        variant: Option<&str>,
        name: &str,
    ) -> Result<Option<BuildProfile>, ProjectError> {
        let profiles = self.profiles_mut(variant)?;
        let index = profiles.iter().position(|p| p.is_named(name));
        Ok(index.map(|index| profiles.remove(index)))
    }

    /// Bump the stored version, returning the new value
    pub fn bump_version(&mut self, part: VersionPart) -> Result<String, ProjectError> {
        let next = versions::increment(&self.current_version, part)?;
        info!(from = %self.current_version, to = %next, "Version bumped");
        self.current_version = next.clone();
        Ok(next)
    }

    pub fn build_root(&self) -> &Path {
        &self.build_folder_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("model.test.rs");
}
