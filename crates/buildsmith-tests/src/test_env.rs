//! Hermetic test environment for E2E testing
//!
//! Creates an isolated project root with mock build executables, so the
//! real filesystem, process and define-registry providers can be exercised
//! without an engine installed.

use anyhow::{Context, Result};
use buildsmith_lib::application::config::AppConfig;
use buildsmith_lib::application::session::{
    CommandSession, LiveConfigProvider, LiveFileSystemProvider, LiveProcessProvider,
};
use buildsmith_lib::application::session_mocks::{MockInteractiveProvider, mock_today};
use buildsmith_lib::display::MockDisplayProvider;
use buildsmith_lib::project::ProjectConfig;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Session type produced by [`HermeticSessionBuilder`]
pub type HermeticSession = CommandSession<
    LiveFileSystemProvider,
    LiveProcessProvider,
    LiveConfigProvider,
    MockInteractiveProvider,
>;

/// Hermetic test environment with mock executables
pub struct TestEnvironment {
    /// Temporary directory for the test environment
    pub temp_dir: TempDir,
    /// Path to the test environment root
    pub root_path: PathBuf,
    /// Path to the bin directory containing mock executables
    pub bin_path: PathBuf,
    /// Project root the session works in
    pub work_path: PathBuf,
    mock_executables: HashMap<String, MockExecutable>,
}

/// Configuration for a mock executable
#[derive(Debug, Clone)]
pub struct MockExecutable {
    pub name: String,
    pub behavior: MockBehavior,
    /// Log file recording one line per call
    pub log_path: PathBuf,
}

/// Mock executable behavior configuration
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Exit 0 without writing anything
    AlwaysSucceed,
    /// Print `error` to stderr and exit 1
    AlwaysFail { error: String },
    /// Write `content` to `$BUILDSMITH_OUTPUT` and exit 0
    WriteOutput { content: String },
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root_path = temp_dir.path().to_path_buf();
        let bin_path = root_path.join("bin");
        let work_path = root_path.join("work");

        fs::create_dir_all(&bin_path)?;
        fs::create_dir_all(&work_path)?;

        Ok(Self {
            temp_dir,
            root_path,
            bin_path,
            work_path,
            mock_executables: HashMap::new(),
        })
    }

    /// Add a mock executable; returns the path to invoke it with
    pub fn add_mock_executable(&mut self, name: &str, behavior: MockBehavior) -> Result<PathBuf> {
        let log_path = self.root_path.join(format!("{}.log", name));
        let executable_path = self.bin_path.join(name);

        let script = generate_mock_script(name, &behavior, &log_path);
        fs::write(&executable_path, script)
            .with_context(|| format!("Failed to write mock {}", executable_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&executable_path)?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&executable_path, perms)?;
        }

        self.mock_executables.insert(
            name.to_string(),
            MockExecutable {
                name: name.to_string(),
                behavior,
                log_path,
            },
        );
        Ok(executable_path)
    }

    /// Raw log of a mock executable; empty if it never ran
    pub fn get_mock_log(&self, executable_name: &str) -> Result<String> {
        let log_path = self.root_path.join(format!("{}.log", executable_name));
        if log_path.exists() {
            Ok(fs::read_to_string(log_path)?)
        } else {
            Ok(String::new())
        }
    }

    /// One entry per call, each holding the `KEY=value` pairs the build saw
    pub fn get_mock_calls(&self, executable_name: &str) -> Result<Vec<HashMap<String, String>>> {
        let log = self.get_mock_log(executable_name)?;
        Ok(log
            .lines()
            .map(|line| {
                line.split('\t')
                    .skip(1)
                    .filter_map(|pair| pair.split_once('='))
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .collect())
    }

    /// Write `config` and its scene files into the work directory
    pub fn write_project(&self, config: &ProjectConfig) -> Result<()> {
        crate::fixtures::write_project(&self.work_path, config)
    }

    pub fn read_project(&self) -> Result<ProjectConfig> {
        crate::fixtures::read_project(&self.work_path)
    }

    /// Entries directly below `rel` in the work directory, sorted
    pub fn list_dir(&self, rel: &str) -> Result<Vec<String>> {
        let mut names: Vec<String> = fs::read_dir(self.work_path.join(rel))?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        Ok(names)
    }
}

const LOGGED_VARS: [&str; 6] = [
    "BUILDSMITH_TARGET",
    "BUILDSMITH_OUTPUT",
    "BUILDSMITH_PRODUCT",
    "BUILDSMITH_DEFINE",
    "BUILDSMITH_DEVELOPMENT",
    "BUILDSMITH_SCENES",
];

fn generate_mock_script(name: &str, behavior: &MockBehavior, log_path: &Path) -> String {
    let log = log_path.display();
    let fields: Vec<String> = LOGGED_VARS
        .iter()
        .map(|var| format!("\"{var}=${{{var}}}\""))
        .collect();

    let behavior_code = match behavior {
        MockBehavior::AlwaysSucceed => "exit 0".to_string(),
        MockBehavior::AlwaysFail { error } => format!("echo '{}' >&2\nexit 1", error),
        MockBehavior::WriteOutput { content } => {
            format!("printf '%s' '{}' > \"$BUILDSMITH_OUTPUT\"\nexit 0", content)
        }
    };

    format!(
        r#"#!/bin/sh
# Mock build executable: {name}
{{
  printf '%s' '{name}'
  printf '\t%s' {fields}
  printf '\n'
}} >> "{log}"
{behavior_code}
"#,
        fields = fields.join(" "),
    )
}

/// Builder for hermetic sessions over a real temp directory
pub struct HermeticSessionBuilder {
    test_env: TestEnvironment,
    app_config: AppConfig,
    interactive: MockInteractiveProvider,
    today: NaiveDate,
}

impl HermeticSessionBuilder {
    pub fn new() -> Result<Self> {
        let test_env = TestEnvironment::new()?;
        let app_config = AppConfig {
            workdir: Some(test_env.work_path.clone()),
            ..AppConfig::default()
        };

        Ok(Self {
            test_env,
            app_config,
            interactive: MockInteractiveProvider::new(),
            today: mock_today(),
        })
    }

    /// Install a mock executable and use it as the build command
    pub fn with_build_command(mut self, name: &str, behavior: MockBehavior) -> Result<Self> {
        let path = self.test_env.add_mock_executable(name, behavior)?;
        self.app_config.build_command = Some(format!("\"{}\"", path.display()));
        Ok(self)
    }

    /// Seed the work directory with a project
    pub fn with_project(self, config: &ProjectConfig) -> Result<Self> {
        self.test_env.write_project(config)?;
        Ok(self)
    }

    /// Scripted answers for setup prompts
    pub fn with_interactive(mut self, interactive: MockInteractiveProvider) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_target_group(mut self, group: &str) -> Self {
        self.app_config.target_group = group.to_string();
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn test_env(&self) -> &TestEnvironment {
        &self.test_env
    }

    /// Session, its environment and a handle on everything it displayed
    pub fn build(self) -> Result<(HermeticSession, TestEnvironment, MockDisplayProvider)> {
        let display = MockDisplayProvider::new();
        let session = CommandSession::new_with_providers(
            Box::new(display.clone()),
            LiveFileSystemProvider,
            LiveProcessProvider,
            LiveConfigProvider::new(self.app_config),
            self.interactive,
            self.today,
        )?;

        Ok((session, self.test_env, display))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_creation() -> Result<()> {
        let env = TestEnvironment::new()?;
        assert!(env.root_path.exists());
        assert!(env.bin_path.exists());
        assert!(env.work_path.exists());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_mock_executable_is_executable() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mut env = TestEnvironment::new()?;
        let path = env.add_mock_executable("engine", MockBehavior::AlwaysSucceed)?;

        assert!(path.exists());
        assert!(fs::metadata(&path)?.permissions().mode() & 0o111 != 0);
        // Nothing logged until the mock runs
        assert!(env.get_mock_calls("engine")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_mock_script_logs_build_variables() {
        let script = generate_mock_script(
            "engine",
            &MockBehavior::WriteOutput {
                content: "bytes".to_string(),
            },
            Path::new("/tmp/engine.log"),
        );

        assert!(script.starts_with("#!/bin/sh"));
        assert!(script.contains("BUILDSMITH_OUTPUT=${BUILDSMITH_OUTPUT}"));
        assert!(script.contains("> \"$BUILDSMITH_OUTPUT\""));
    }

    #[test]
    fn test_builder_points_session_at_work_dir() -> Result<()> {
        use buildsmith_lib::application::session::Session;

        let (session, env, _display) = HermeticSessionBuilder::new()?.build()?;
        assert_eq!(session.project_root()?, env.work_path);
        assert_eq!(session.today(), mock_today());
        Ok(())
    }
}
