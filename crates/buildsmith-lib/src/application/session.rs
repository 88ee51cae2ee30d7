//! Command session architecture
//!
//! Implements the Session-Scoped Dependency Injection Pattern.
//! Each command execution creates a session that owns all ephemeral state
//! and every external collaborator: filesystem, define-symbol registry,
//! scene resolver, process runner, prompts and the build executors.

use crate::Result;
use crate::application::config::AppConfig;
use crate::display::{DisplayProvider, LiveDisplayProvider};
use crate::primitives::TargetFamily;
use crate::project::builds::{BuildExecutor, executor_for};
use crate::project::model::SceneRef;
use crate::project::store::{CONFIG_DIR, DEFINES_FILE};
use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::env;
use std::path::{Path, PathBuf};

/// Provider trait for filesystem operations
pub trait FileSystemProvider {
    /// Get current working directory
    fn current_dir(&self) -> Result<PathBuf>;

    /// Read entire file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write string content to file
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_directory(&self, path: &Path) -> bool;

    /// Create directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Entries directly inside `path`; a missing directory lists as empty
    fn get_file_list(&self, path: &Path) -> std::result::Result<HashSet<PathBuf>, std::io::Error>;

    /// Size in bytes of a file, or of everything below a directory
    fn size_of(&self, path: &Path) -> std::result::Result<u64, std::io::Error>;
}

/// Compile-time define symbols, per target group
pub trait DefineRegistry {
    /// Symbols currently defined for `group`
    fn get(&self, group: &str) -> Result<BTreeSet<String>>;

    /// Replace the symbols defined for `group`
    fn set(&self, group: &str, symbols: &BTreeSet<String>) -> Result<()>;
}

/// Maps opaque scene handles to paths handed to the build step
pub trait SceneResolver {
    fn resolve(&self, scene: &SceneRef) -> Result<PathBuf>;
}

/// Process execution output
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Provider trait for process execution
pub trait ProcessProvider {
    /// Execute a command with arguments and extra environment in a working directory
    fn execute(
        &self,
        command: &str,
        args: &[&str],
        env: &[(String, String)],
        working_dir: &Path,
    ) -> Result<ProcessOutput>;
}

/// Provider trait for configuration access
pub trait ConfigProvider {
    /// Get the application configuration
    fn app_config(&self) -> &AppConfig;
}

/// Provider trait for interactive user input operations
pub trait InteractiveProvider {
    /// Prompt for text input with optional default value
    fn text_input(&self, prompt: &str, default: String) -> Result<String>;

    /// Prompt for confirmation (yes/no)
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Prompt for selection from a list of options
    fn select(&self, prompt: &str, options: &[&str]) -> Result<usize>;
}

/// Session trait that both CommandSession and MockCommandSession implement
pub trait Session {
    /// Get the display provider for this session
    fn display(&self) -> &dyn DisplayProvider;

    /// Get the filesystem provider for this session
    fn filesystem(&self) -> &dyn FileSystemProvider;

    /// Get the process provider for this session
    fn process(&self) -> &dyn ProcessProvider;

    /// Get the config provider for this session
    fn config(&self) -> &dyn ConfigProvider;

    /// Get the interactive provider for this session
    fn interactive(&self) -> &dyn InteractiveProvider;

    /// Get the define-symbol registry for this session
    fn defines(&self) -> &dyn DefineRegistry;

    /// Get the scene resolver for this session
    fn scenes(&self) -> &dyn SceneResolver;

    /// Build executor for one target family
    fn build_executor(&self, family: TargetFamily) -> Box<dyn BuildExecutor + '_>;

    /// Date stamped into artifact names
    fn today(&self) -> NaiveDate;

    /// Project root: the configured workdir, else the current directory
    fn project_root(&self) -> Result<PathBuf> {
        match &self.config().app_config().workdir {
            Some(dir) => Ok(dir.clone()),
            None => self.filesystem().current_dir(),
        }
    }
}

/// Live implementation of FileSystemProvider
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveFileSystemProvider;

impl FileSystemProvider for LiveFileSystemProvider {
    fn current_dir(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to get current directory")
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))
    }

    fn get_file_list(&self, path: &Path) -> std::result::Result<HashSet<PathBuf>, std::io::Error> {
        let mut files = HashSet::new();

        if !path.exists() {
            return Ok(files);
        }

        for entry in std::fs::read_dir(path)? {
            files.insert(entry?.path());
        }

        Ok(files)
    }

    fn size_of(&self, path: &Path) -> std::result::Result<u64, std::io::Error> {
        let metadata = std::fs::metadata(path)?;
        if metadata.is_file() {
            return Ok(metadata.len());
        }

        let mut total = 0;
        for entry in std::fs::read_dir(path)? {
            total += self.size_of(&entry?.path())?;
        }
        Ok(total)
    }
}

/// Define registry persisted as JSON under the project config directory
pub struct FileDefineRegistry<F: FileSystemProvider> {
    path: PathBuf,
    fs: F,
}

impl<F: FileSystemProvider> FileDefineRegistry<F> {
    pub fn new(project_root: &Path, fs: F) -> Self {
        Self {
            path: project_root.join(CONFIG_DIR).join(DEFINES_FILE),
            fs,
        }
    }

    fn load_all(&self) -> Result<BTreeMap<String, BTreeSet<String>>> {
        if !self.fs.exists(&self.path) {
            return Ok(BTreeMap::new());
        }
        let content = self.fs.read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse define registry: {}", self.path.display()))
    }
}

impl<F: FileSystemProvider> DefineRegistry for FileDefineRegistry<F> {
    fn get(&self, group: &str) -> Result<BTreeSet<String>> {
        Ok(self.load_all()?.remove(group).unwrap_or_default())
    }

    fn set(&self, group: &str, symbols: &BTreeSet<String>) -> Result<()> {
        let mut all = self.load_all()?;
        all.insert(group.to_string(), symbols.clone());

        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&all)?;
        self.fs.write_file(&self.path, &content)
    }
}

/// Scene resolver for project-relative scene paths
pub struct ProjectSceneResolver<F: FileSystemProvider> {
    root: PathBuf,
    fs: F,
}

impl<F: FileSystemProvider> ProjectSceneResolver<F> {
    pub fn new(project_root: &Path, fs: F) -> Self {
        Self {
            root: project_root.to_path_buf(),
            fs,
        }
    }
}

impl<F: FileSystemProvider> SceneResolver for ProjectSceneResolver<F> {
    fn resolve(&self, scene: &SceneRef) -> Result<PathBuf> {
        let path = self.root.join(scene.trim());
        if !self.fs.is_file(&path) {
            return Err(anyhow!("Scene not found: {}", path.display()));
        }
        Ok(path)
    }
}

/// Live implementation of ProcessProvider
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveProcessProvider;

impl ProcessProvider for LiveProcessProvider {
    fn execute(
        &self,
        command: &str,
        args: &[&str],
        env: &[(String, String)],
        working_dir: &Path,
    ) -> Result<ProcessOutput> {
        use std::process::Command;

        let output = Command::new(command)
            .args(args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(working_dir)
            .output()
            .with_context(|| format!("Failed to execute command: {}", command))?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }
}

/// Live implementation of ConfigProvider
pub struct LiveConfigProvider {
    app_config: AppConfig,
}

impl LiveConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for LiveConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// Live implementation of InteractiveProvider
pub struct LiveInteractiveProvider {
    yes_mode: bool,
}

impl LiveInteractiveProvider {
    pub fn new(yes_mode: bool) -> Self {
        Self { yes_mode }
    }

    /// Check if we're in a TTY environment suitable for interactive prompts
    fn is_tty() -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
    }
}

impl InteractiveProvider for LiveInteractiveProvider {
    fn text_input(&self, prompt: &str, default: String) -> Result<String> {
        if self.yes_mode || !Self::is_tty() {
            return Ok(default);
        }

        use dialoguer::Input;

        Input::new()
            .with_prompt(prompt)
            .default(default)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read text input")
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.yes_mode || !Self::is_tty() {
            return Ok(default);
        }

        use dialoguer::Confirm;

        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("Failed to read confirmation")
    }

    fn select(&self, prompt: &str, options: &[&str]) -> Result<usize> {
        if self.yes_mode || !Self::is_tty() {
            return Ok(0);
        }

        use dialoguer::Select;

        Select::new()
            .with_prompt(prompt)
            .items(options)
            .default(0)
            .interact()
            .context("Failed to read selection")
    }
}

/// CommandSession owns all ephemeral state for a single command execution
pub struct CommandSession<F, P, C, I>
where
    F: FileSystemProvider + Clone,
    P: ProcessProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    display_provider: Box<dyn DisplayProvider>,
    filesystem_provider: F,
    process_provider: P,
    config_provider: C,
    interactive_provider: I,
    define_registry: FileDefineRegistry<F>,
    scene_resolver: ProjectSceneResolver<F>,
    today: NaiveDate,
}

impl CommandSession<LiveFileSystemProvider, LiveProcessProvider, LiveConfigProvider, LiveInteractiveProvider> {
    /// Create a new command session with owned state (production composition)
    pub fn new(app_config: AppConfig) -> Result<Self> {
        let color = app_config.color.enabled();
        let _ = crate::logger::Logger::init(app_config.to_logger_config());

        let yes = app_config.yes;
        Self::new_with_providers(
            Box::new(LiveDisplayProvider::new(color)),
            LiveFileSystemProvider,
            LiveProcessProvider,
            LiveConfigProvider::new(app_config),
            LiveInteractiveProvider::new(yes),
            chrono::Local::now().date_naive(),
        )
    }
}

impl<F, P, C, I> CommandSession<F, P, C, I>
where
    F: FileSystemProvider + Clone,
    P: ProcessProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    /// Create a command session with custom providers
    pub fn new_with_providers(
        display_provider: Box<dyn DisplayProvider>,
        filesystem_provider: F,
        process_provider: P,
        config_provider: C,
        interactive_provider: I,
        today: NaiveDate,
    ) -> Result<Self> {
        let root = match &config_provider.app_config().workdir {
            Some(dir) => dir.clone(),
            None => filesystem_provider.current_dir()?,
        };

        Ok(Self {
            display_provider,
            define_registry: FileDefineRegistry::new(&root, filesystem_provider.clone()),
            scene_resolver: ProjectSceneResolver::new(&root, filesystem_provider.clone()),
            filesystem_provider,
            process_provider,
            config_provider,
            interactive_provider,
            today,
        })
    }
}

impl<F, P, C, I> Session for CommandSession<F, P, C, I>
where
    F: FileSystemProvider + Clone,
    P: ProcessProvider,
    C: ConfigProvider,
    I: InteractiveProvider,
{
    fn display(&self) -> &dyn DisplayProvider {
        self.display_provider.as_ref()
    }

    fn filesystem(&self) -> &dyn FileSystemProvider {
        &self.filesystem_provider
    }

    fn process(&self) -> &dyn ProcessProvider {
        &self.process_provider
    }

    fn config(&self) -> &dyn ConfigProvider {
        &self.config_provider
    }

    fn interactive(&self) -> &dyn InteractiveProvider {
        &self.interactive_provider
    }

    fn defines(&self) -> &dyn DefineRegistry {
        &self.define_registry
    }

    fn scenes(&self) -> &dyn SceneResolver {
        &self.scene_resolver
    }

    fn build_executor(&self, family: TargetFamily) -> Box<dyn BuildExecutor + '_> {
        executor_for(
            family,
            self.config().app_config().build_command.clone(),
            self.process(),
            self.filesystem(),
        )
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}

#[cfg(test)]
mod tests {
    include!("session.test.rs");
}
