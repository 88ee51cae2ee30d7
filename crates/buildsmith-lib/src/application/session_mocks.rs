//! Mock implementations of session providers for testing
//!
//! These mocks enable testing of command handlers and domain operations
//! without touching the real filesystem, spawning processes or prompting.

use crate::Result;
use crate::application::config::AppConfig;
use crate::application::session::*;
use crate::display::{DisplayProvider, MockDisplayProvider};
use crate::primitives::TargetFamily;
use crate::project::builds::{BuildError, BuildExecutor, BuildReport, BuildRequest};
use crate::project::model::SceneRef;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Date every mock session reports as today (artifact stamp `250714`)
pub fn mock_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 14).expect("valid date")
}

/// Mock filesystem provider for testing
#[derive(Clone)]
pub struct MockFileSystemProvider {
    pub current_dir: PathBuf,
    /// In-memory filesystem: path -> content
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
    /// Track directories that exist
    pub directories: Arc<Mutex<HashSet<PathBuf>>>,
    /// Writes and directory creation fail when set
    pub read_only: bool,
}

impl Default for MockFileSystemProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystemProvider {
    pub fn new() -> Self {
        let current_dir = PathBuf::from("/test/workdir");
        let mut directories = HashSet::new();
        directories.insert(current_dir.clone());
        Self {
            current_dir,
            files: Arc::new(Mutex::new(HashMap::new())),
            directories: Arc::new(Mutex::new(directories)),
            read_only: false,
        }
    }

    pub fn with_current_dir(mut self, dir: PathBuf) -> Self {
        self.current_dir = dir.clone();
        self.directories.lock().unwrap().insert(dir);
        self
    }

    pub fn with_file(self, path: PathBuf, content: String) -> Self {
        if let Some(parent) = path.parent() {
            self.track_dir(parent);
        }
        self.files.lock().unwrap().insert(path, content);
        self
    }

    pub fn with_directory(self, path: PathBuf) -> Self {
        self.track_dir(&path);
        self
    }

    pub fn with_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Content of a file written through the provider
    pub fn file(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn has_directory(&self, path: &Path) -> bool {
        self.directories.lock().unwrap().contains(path)
    }

    fn track_dir(&self, path: &Path) {
        let mut directories = self.directories.lock().unwrap();
        let mut current = Some(path);
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            directories.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }
}

impl FileSystemProvider for MockFileSystemProvider {
    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.current_dir.clone())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.file(path)
            .ok_or_else(|| anyhow::anyhow!("File not found: {}", path.display()))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if self.read_only {
            return Err(anyhow::anyhow!("Read-only filesystem: {}", path.display()));
        }
        if let Some(parent) = path.parent() {
            self.track_dir(parent);
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_directory(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_directory(&self, path: &Path) -> bool {
        self.has_directory(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        if self.read_only {
            return Err(anyhow::anyhow!("Read-only filesystem: {}", path.display()));
        }
        self.track_dir(path);
        Ok(())
    }

    fn get_file_list(&self, path: &Path) -> std::result::Result<HashSet<PathBuf>, std::io::Error> {
        let files = self.files.lock().unwrap();
        let directories = self.directories.lock().unwrap();
        Ok(files
            .keys()
            .chain(directories.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect())
    }

    fn size_of(&self, path: &Path) -> std::result::Result<u64, std::io::Error> {
        let files = self.files.lock().unwrap();
        if let Some(content) = files.get(path) {
            return Ok(content.len() as u64);
        }
        if !self.has_directory(path) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ));
        }
        Ok(files
            .iter()
            .filter(|(p, _)| p.starts_with(path))
            .map(|(_, content)| content.len() as u64)
            .sum())
    }
}

/// Process call record for spy pattern
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessCall {
    pub command: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
    pub working_dir: PathBuf,
}

impl ProcessCall {
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Mock process provider for testing with spy pattern
#[derive(Clone, Default)]
pub struct MockProcessProvider {
    pub calls: Arc<Mutex<Vec<ProcessCall>>>,
    pub result: Option<std::result::Result<ProcessOutput, String>>,
}

impl MockProcessProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call returns `result` instead of a silent success
    pub fn with_result(mut self, result: std::result::Result<ProcessOutput, String>) -> Self {
        self.result = Some(result);
        self
    }

    pub fn with_failure(self, stderr: &str) -> Self {
        self.with_result(Ok(ProcessOutput {
            stdout: String::new(),
            stderr: stderr.to_string(),
            success: false,
        }))
    }

    /// Get all recorded process calls for verification
    pub fn get_calls(&self) -> Vec<ProcessCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProcessProvider for MockProcessProvider {
    fn execute(
        &self,
        command: &str,
        args: &[&str],
        env: &[(String, String)],
        working_dir: &Path,
    ) -> Result<ProcessOutput> {
        self.calls.lock().unwrap().push(ProcessCall {
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            env: env.to_vec(),
            working_dir: working_dir.to_path_buf(),
        });

        match &self.result {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(e)) => Err(anyhow::anyhow!("{}", e)),
            None => Ok(ProcessOutput {
                stdout: String::new(),
                stderr: String::new(),
                success: true,
            }),
        }
    }
}

/// Mock config provider for testing
pub struct MockConfigProvider {
    pub app_config: AppConfig,
}

impl MockConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// Mock interactive provider answering from scripted queues.
///
/// An exhausted queue answers with the prompt's default (first option for
/// selections).
#[derive(Clone, Default)]
pub struct MockInteractiveProvider {
    pub text_inputs: Arc<Mutex<VecDeque<String>>>,
    pub confirms: Arc<Mutex<VecDeque<bool>>>,
    pub selects: Arc<Mutex<VecDeque<usize>>>,
    /// Prompts in the order they were shown
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockInteractiveProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text_input(self, response: &str) -> Self {
        self.text_inputs
            .lock()
            .unwrap()
            .push_back(response.to_string());
        self
    }

    pub fn with_text_inputs(self, responses: &[&str]) -> Self {
        responses
            .iter()
            .fold(self, |provider, response| provider.with_text_input(response))
    }

    pub fn with_confirm(self, response: bool) -> Self {
        self.confirms.lock().unwrap().push_back(response);
        self
    }

    pub fn with_select(self, response: usize) -> Self {
        self.selects.lock().unwrap().push_back(response);
        self
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl InteractiveProvider for MockInteractiveProvider {
    fn text_input(&self, prompt: &str, default: String) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self
            .text_inputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(default))
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(default))
    }

    fn select(&self, prompt: &str, options: &[&str]) -> Result<usize> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let choice = self.selects.lock().unwrap().pop_front().unwrap_or(0);
        if choice >= options.len() {
            return Err(anyhow::anyhow!(
                "Scripted selection {} out of range for '{}'",
                choice,
                prompt
            ));
        }
        Ok(choice)
    }
}

/// In-memory define registry
#[derive(Clone, Default)]
pub struct MockDefineRegistry {
    pub groups: Arc<Mutex<BTreeMap<String, BTreeSet<String>>>>,
}

impl MockDefineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols(self, group: &str, symbols: &[&str]) -> Self {
        self.groups.lock().unwrap().insert(
            group.to_string(),
            symbols.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn symbols(&self, group: &str) -> BTreeSet<String> {
        self.groups
            .lock()
            .unwrap()
            .get(group)
            .cloned()
            .unwrap_or_default()
    }
}

impl DefineRegistry for MockDefineRegistry {
    fn get(&self, group: &str) -> Result<BTreeSet<String>> {
        Ok(self.symbols(group))
    }

    fn set(&self, group: &str, symbols: &BTreeSet<String>) -> Result<()> {
        self.groups
            .lock()
            .unwrap()
            .insert(group.to_string(), symbols.clone());
        Ok(())
    }
}

/// Scene resolver mapping handles under a fixed project root
#[derive(Clone)]
pub struct MockSceneResolver {
    pub root: PathBuf,
    pub missing: Arc<Mutex<HashSet<SceneRef>>>,
}

impl Default for MockSceneResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSceneResolver {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("/test/workdir"),
            missing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// `scene` fails to resolve
    pub fn with_missing(self, scene: &str) -> Self {
        self.missing.lock().unwrap().insert(scene.to_string());
        self
    }
}

impl SceneResolver for MockSceneResolver {
    fn resolve(&self, scene: &SceneRef) -> Result<PathBuf> {
        if self.missing.lock().unwrap().contains(scene) {
            return Err(anyhow::anyhow!("Scene not found: {}", scene));
        }
        Ok(self.root.join(scene))
    }
}

/// Build executor recording every request and answering from a script
#[derive(Clone, Default)]
pub struct MockBuildExecutor {
    pub requests: Arc<Mutex<Vec<(TargetFamily, BuildRequest)>>>,
    /// Outcomes handed out in order; once exhausted every build succeeds
    pub outcomes: Arc<Mutex<VecDeque<std::result::Result<BuildReport, String>>>>,
    family: Option<TargetFamily>,
}

impl MockBuildExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(self, outcome: std::result::Result<BuildReport, String>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn get_requests(&self) -> Vec<(TargetFamily, BuildRequest)> {
        self.requests.lock().unwrap().clone()
    }

    fn for_family(&self, family: TargetFamily) -> Self {
        Self {
            family: Some(family),
            ..self.clone()
        }
    }
}

impl BuildExecutor for MockBuildExecutor {
    fn build(&self, request: &BuildRequest) -> std::result::Result<BuildReport, BuildError> {
        let family = self.family.unwrap_or_else(|| request.target.family());
        self.requests
            .lock()
            .unwrap()
            .push((family, request.clone()));

        match self.outcomes.lock().unwrap().pop_front() {
            Some(Ok(report)) => Ok(report),
            Some(Err(message)) => Err(BuildError::ExecutionFailure {
                target: request.target.clone(),
                message,
            }),
            None => Ok(BuildReport {
                succeeded: true,
                total_size: 1024,
            }),
        }
    }
}

/// Mock command session for testing
pub struct MockCommandSession {
    pub display_provider: MockDisplayProvider,
    pub filesystem_provider: MockFileSystemProvider,
    pub process_provider: MockProcessProvider,
    pub config_provider: MockConfigProvider,
    pub interactive_provider: MockInteractiveProvider,
    pub define_registry: MockDefineRegistry,
    pub scene_resolver: MockSceneResolver,
    pub build_executor: MockBuildExecutor,
    pub today: NaiveDate,
}

impl Default for MockCommandSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommandSession {
    pub fn new() -> Self {
        Self {
            display_provider: MockDisplayProvider::new(),
            filesystem_provider: MockFileSystemProvider::new(),
            process_provider: MockProcessProvider::new(),
            config_provider: MockConfigProvider::new(AppConfig::default()),
            interactive_provider: MockInteractiveProvider::new(),
            define_registry: MockDefineRegistry::new(),
            scene_resolver: MockSceneResolver::new(),
            build_executor: MockBuildExecutor::new(),
            today: mock_today(),
        }
    }

    pub fn with_filesystem(mut self, filesystem: MockFileSystemProvider) -> Self {
        self.filesystem_provider = filesystem;
        self
    }

    pub fn with_process(mut self, process: MockProcessProvider) -> Self {
        self.process_provider = process;
        self
    }

    pub fn with_config(mut self, config: MockConfigProvider) -> Self {
        self.config_provider = config;
        self
    }

    pub fn with_interactive(mut self, interactive: MockInteractiveProvider) -> Self {
        self.interactive_provider = interactive;
        self
    }

    pub fn with_defines(mut self, defines: MockDefineRegistry) -> Self {
        self.define_registry = defines;
        self
    }

    pub fn with_scenes(mut self, scenes: MockSceneResolver) -> Self {
        self.scene_resolver = scenes;
        self
    }

    pub fn with_build_executor(mut self, executor: MockBuildExecutor) -> Self {
        self.build_executor = executor;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

impl Session for MockCommandSession {
    fn display(&self) -> &dyn DisplayProvider {
        &self.display_provider
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
        Box::new(self.build_executor.for_family(family))
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
