//! Setup wizard state machine
//!
//! `Mode -> Names -> Folder -> Scenes -> Profiles -> Complete`. Forward
//! navigation is gated by the guard of the current step; going back never
//! validates. The wizard owns draft state only and produces a fresh
//! `ProjectConfig` once it reaches `Complete`.

use crate::application::session::FileSystemProvider;
use crate::primitives::{BuildMode, WizardStep};
use crate::project::model::{
    DEFAULT_VERSION, ProjectConfig, ProjectError, SceneRef, code_name_problem,
    resolve_define_symbol,
};
use crate::project::profile::{BuildProfile, default_profiles};
use crate::project::versions::{self, VersionError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why the current step cannot be left forwards
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Project name is empty")]
    EmptyProjectName,

    #[error("Variant #{index} has an empty code name")]
    EmptyCodeName { index: usize },

    #[error("Code name '{name}' is used more than once")]
    DuplicateCodeName { name: String },

    #[error("Invalid code name '{name}': {reason}")]
    InvalidCodeName { name: String, reason: String },

    #[error("Variant '{code_name}' has no define symbol")]
    EmptyDefineSymbol { code_name: String },

    #[error("Define symbol '{symbol}' is used by more than one variant")]
    DuplicateDefineSymbol { symbol: String },

    #[error("Wildcard mode needs at least one variant")]
    NoVariants,

    #[error("Build folder is empty")]
    EmptyBuildFolder,

    #[error("Build folder does not exist: {path}")]
    MissingBuildFolder { path: PathBuf },

    #[error("At least one scene must be assigned")]
    NoScenes,

    #[error("Variant '{code_name}' needs at least one scene and no unassigned slots")]
    VariantScenesIncomplete { code_name: String },
}

/// Wizard errors
#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to create build folder {path}: {source}")]
    Filesystem {
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("Setup is already complete")]
    AlreadyComplete,

    #[error("Setup is not complete (current step: {step})")]
    NotComplete { step: WizardStep },

    #[error("No variant at index {index}")]
    NoSuchVariant { index: usize },

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Project(#[from] ProjectError),
}

/// A wildcard variant being configured in the wizard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantDraft {
    pub code_name: String,
    /// Empty means derive from the code name
    pub define_symbol: String,
    pub scenes: Vec<Option<SceneRef>>,
    pub profiles: Vec<BuildProfile>,
}

impl VariantDraft {
    pub fn new(code_name: &str, define_symbol: &str) -> Self {
        Self {
            code_name: code_name.to_string(),
            define_symbol: define_symbol.to_string(),
            ..Self::default()
        }
    }
}

/// Linear setup wizard
#[derive(Debug, Clone)]
pub struct Wizard {
    step: WizardStep,
    root: PathBuf,
    mode: BuildMode,
    project_name: String,
    project_code_name: String,
    wildcard_project_name: String,
    version: String,
    build_folder: String,
    scenes: Vec<Option<SceneRef>>,
    profiles: Vec<BuildProfile>,
    variants: Vec<VariantDraft>,
    /// Variant edited by the Scenes and Profiles steps in wildcard mode
    selected: usize,
}

impl Wizard {
    /// Fresh wizard; relative build folders resolve against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            step: WizardStep::Mode,
            root: root.into(),
            mode: BuildMode::Single,
            project_name: String::new(),
            project_code_name: String::new(),
            wildcard_project_name: String::new(),
            version: DEFAULT_VERSION.to_string(),
            build_folder: String::new(),
            scenes: Vec::new(),
            profiles: Vec::new(),
            variants: Vec::new(),
            selected: 0,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: BuildMode) {
        self.mode = mode;
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn set_project_name(&mut self, name: &str) {
        self.project_name = name.trim().to_string();
    }

    pub fn set_project_code_name(&mut self, name: &str) {
        self.project_code_name = name.trim().to_string();
    }

    pub fn set_wildcard_project_name(&mut self, name: &str) {
        self.wildcard_project_name = name.trim().to_string();
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Starting version; must parse as a version triple
    pub fn set_version(&mut self, version: &str) -> Result<(), WizardError> {
        versions::parse(version)?;
        self.version = version.trim().to_string();
        Ok(())
    }

    pub fn build_folder(&self) -> &str {
        &self.build_folder
    }

    pub fn set_build_folder(&mut self, folder: &str) {
        self.build_folder = folder.trim().to_string();
    }

    /// Build folder resolved against the project root
    pub fn resolved_build_folder(&self) -> PathBuf {
        self.root.join(Path::new(&self.build_folder))
    }

    pub fn variants(&self) -> &[VariantDraft] {
        &self.variants
    }

    /// Append a variant draft; names are checked when leaving the Names step
    pub fn add_variant(&mut self, code_name: &str, define_symbol: &str) -> &mut VariantDraft {
        self.variants.push(VariantDraft::new(code_name.trim(), define_symbol.trim()));
        let index = self.variants.len() - 1;
        &mut self.variants[index]
    }

    pub fn clear_variants(&mut self) {
        self.variants.clear();
        self.selected = 0;
    }

    pub fn remove_variant(&mut self, index: usize) -> Option<VariantDraft> {
        if index >= self.variants.len() {
            return None;
        }
        let removed = self.variants.remove(index);
        if self.selected >= self.variants.len() {
            self.selected = self.variants.len().saturating_sub(1);
        }
        Some(removed)
    }

    pub fn selected_variant(&self) -> usize {
        self.selected
    }

    pub fn select_variant(&mut self, index: usize) -> Result<(), WizardError> {
        if index >= self.variants.len() {
            return Err(WizardError::NoSuchVariant { index });
        }
        self.selected = index;
        Ok(())
    }

    /// Scene list edited by the current context: the project in single
    /// mode, the selected variant in wildcard mode
    pub fn scenes(&self) -> &[Option<SceneRef>] {
        match self.mode {
            BuildMode::Single => &self.scenes,
            BuildMode::Wildcard => self
                .variants
                .get(self.selected)
                .map(|v| v.scenes.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub fn scenes_mut(&mut self) -> Result<&mut Vec<Option<SceneRef>>, WizardError> {
        match self.mode {
            BuildMode::Single => Ok(&mut self.scenes),
            BuildMode::Wildcard => self
                .variants
                .get_mut(self.selected)
                .map(|v| &mut v.scenes)
                .ok_or(WizardError::NoSuchVariant {
                    index: self.selected,
                }),
        }
    }

    /// Append a scene slot (or an unassigned one) to the current context
    pub fn add_scene(&mut self, scene: Option<SceneRef>) -> Result<(), WizardError> {
        let scene = scene.filter(|s| !s.trim().is_empty());
        self.scenes_mut()?.push(scene);
        Ok(())
    }

    pub fn profiles(&self) -> &[BuildProfile] {
        match self.mode {
            BuildMode::Single => &self.profiles,
            BuildMode::Wildcard => self
                .variants
                .get(self.selected)
                .map(|v| v.profiles.as_slice())
                .unwrap_or(&[]),
        }
    }

    pub fn profiles_mut(&mut self) -> Result<&mut Vec<BuildProfile>, WizardError> {
        match self.mode {
            BuildMode::Single => Ok(&mut self.profiles),
            BuildMode::Wildcard => self
                .variants
                .get_mut(self.selected)
                .map(|v| &mut v.profiles)
                .ok_or(WizardError::NoSuchVariant {
                    index: self.selected,
                }),
        }
    }

    fn effective_name(&self) -> &str {
        let preferred = match self.mode {
            BuildMode::Single => &self.project_code_name,
            BuildMode::Wildcard => &self.wildcard_project_name,
        };
        if preferred.is_empty() {
            &self.project_name
        } else {
            preferred
        }
    }

    /// Guard of the current step
    pub fn validate(&self, fs: &dyn FileSystemProvider) -> Result<(), ValidationError> {
        match self.step {
            WizardStep::Mode | WizardStep::Profiles | WizardStep::Complete => Ok(()),
            WizardStep::Names => self.validate_names(),
            WizardStep::Folder => self.validate_folder(fs),
            WizardStep::Scenes => self.validate_scenes(),
        }
    }

    fn validate_names(&self) -> Result<(), ValidationError> {
        if self.project_name.is_empty() {
            return Err(ValidationError::EmptyProjectName);
        }
        if self.mode == BuildMode::Single {
            return Ok(());
        }

        if self.variants.is_empty() {
            return Err(ValidationError::NoVariants);
        }
        let mut seen = HashSet::new();
        let mut symbols = HashSet::new();
        for (index, variant) in self.variants.iter().enumerate() {
            if variant.code_name.is_empty() {
                return Err(ValidationError::EmptyCodeName { index });
            }
            if let Some(reason) = code_name_problem(&variant.code_name) {
                return Err(ValidationError::InvalidCodeName {
                    name: variant.code_name.clone(),
                    reason: reason.to_string(),
                });
            }
            if !seen.insert(variant.code_name.to_lowercase()) {
                return Err(ValidationError::DuplicateCodeName {
                    name: variant.code_name.clone(),
                });
            }
            let symbol = resolve_define_symbol(&variant.code_name, &variant.define_symbol);
            if symbol.is_empty() {
                return Err(ValidationError::EmptyDefineSymbol {
                    code_name: variant.code_name.clone(),
                });
            }
            if !symbols.insert(symbol.clone()) {
                return Err(ValidationError::DuplicateDefineSymbol { symbol });
            }
        }
        Ok(())
    }

    fn validate_folder(&self, fs: &dyn FileSystemProvider) -> Result<(), ValidationError> {
        if self.build_folder.is_empty() {
            return Err(ValidationError::EmptyBuildFolder);
        }
        let path = self.resolved_build_folder();
        if !fs.is_directory(&path) {
            return Err(ValidationError::MissingBuildFolder { path });
        }
        Ok(())
    }

    fn validate_scenes(&self) -> Result<(), ValidationError> {
        match self.mode {
            BuildMode::Single => {
                if self.scenes.iter().any(Option::is_some) {
                    Ok(())
                } else {
                    Err(ValidationError::NoScenes)
                }
            }
            BuildMode::Wildcard => {
                let incomplete = self
                    .variants
                    .iter()
                    .find(|v| v.scenes.is_empty() || v.scenes.iter().any(Option::is_none));
                match incomplete {
                    Some(v) => Err(ValidationError::VariantScenesIncomplete {
                        code_name: v.code_name.clone(),
                    }),
                    None => Ok(()),
                }
            }
        }
    }

    pub fn can_advance(&self, fs: &dyn FileSystemProvider) -> bool {
        self.step != WizardStep::Complete && self.validate(fs).is_ok()
    }

    /// Move forward if the current step's guard passes
    pub fn advance(&mut self, fs: &dyn FileSystemProvider) -> Result<WizardStep, WizardError> {
        let next = self.step.next().ok_or(WizardError::AlreadyComplete)?;
        self.validate(fs)?;

        if next == WizardStep::Complete {
            self.seed_profiles();
        }

        debug!(from = %self.step, to = %next, "Wizard advanced");
        self.step = next;
        Ok(next)
    }

    /// Move back one step without validation
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            debug!(from = %self.step, to = %previous, "Wizard stepped back");
            self.step = previous;
        }
        self.step
    }

    fn seed_profiles(&mut self) {
        let name = self.effective_name().to_string();
        match self.mode {
            BuildMode::Single => {
                if self.profiles.is_empty() {
                    self.profiles = default_profiles(&name);
                }
            }
            BuildMode::Wildcard => {
                for variant in self.variants.iter_mut().filter(|v| v.profiles.is_empty()) {
                    variant.profiles = default_profiles(&name);
                }
            }
        }
    }

    /// Unassigned scene slots in the current context, as user-facing warnings
    pub fn scene_warnings(&self) -> Vec<String> {
        self.scenes()
            .iter()
            .enumerate()
            .filter(|(_, scene)| scene.is_none())
            .map(|(slot, _)| format!("Scene slot {} is unassigned", slot + 1))
            .collect()
    }

    /// Create the build folder; wizard state is unchanged on failure
    pub fn create_build_folder(&self, fs: &dyn FileSystemProvider) -> Result<PathBuf, WizardError> {
        if self.build_folder.is_empty() {
            return Err(ValidationError::EmptyBuildFolder.into());
        }
        let path = self.resolved_build_folder();
        fs.create_dir_all(&path)
            .map_err(|source| WizardError::Filesystem {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "Created build folder");
        Ok(path)
    }

    /// Config produced by a completed wizard, marked as set up
    pub fn complete(&self) -> Result<ProjectConfig, WizardError> {
        if self.step != WizardStep::Complete {
            return Err(WizardError::NotComplete { step: self.step });
        }

        let mut config =
            ProjectConfig::new(&self.project_name, self.mode, PathBuf::from(&self.build_folder));
        config.project_code_name = self.project_code_name.clone();
        config.wildcard_project_name = self.wildcard_project_name.clone();
        config.current_version = self.version.clone();

        match self.mode {
            BuildMode::Single => {
                config.scenes = self.scenes.clone();
                config.profiles = self.profiles.clone();
            }
            BuildMode::Wildcard => {
                for draft in &self.variants {
                    config.add_variant(&draft.code_name, &draft.define_symbol)?;
                    if let Some(variant) = config.variant_mut(&draft.code_name) {
                        variant.scene_refs = draft.scenes.clone();
                        if !draft.profiles.is_empty() {
                            variant.build_profiles = draft.profiles.clone();
                        }
                    }
                }
            }
        }
        config.setup_complete = true;

        info!(
            project = %config.project_name,
            mode = %config.mode,
            variants = config.variants.len(),
            "Setup complete"
        );
        Ok(config)
    }

    /// Discard wizard state and mark `config` as needing setup again
    pub fn reset_to_wizard(&mut self, config: &mut ProjectConfig) {
        *self = Wizard::new(std::mem::take(&mut self.root));
        if config.setup_complete {
            warn!(project = %config.project_name, "Setup reset; existing config kept until setup completes");
        }
        config.setup_complete = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("wizard.test.rs");
}
