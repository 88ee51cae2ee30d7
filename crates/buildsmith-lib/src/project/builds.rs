//! Build orchestration
//!
//! A build resolves the scope's scenes, picks a collision-free artifact path
//! and hands a `BuildRequest` to the executor for the profile's target
//! family. The executor drives the external build step and reports the
//! outcome; a failed step is surfaced as-is and never retried.

use crate::application::session::{FileSystemProvider, ProcessProvider, Session};
use crate::primitives::{BuildTarget, TargetFamily};
use crate::project::artifacts::{ArtifactError, ArtifactPath, resolve_artifact_path};
use crate::project::model::{ProjectConfig, ProjectError};
use crate::project::profile::BuildProfile;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Build errors
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("Scene '{scene}' could not be resolved: {source}")]
    Scene {
        scene: String,
        source: anyhow::Error,
    },

    #[error("'{scope}' has no assigned scenes")]
    NoScenes { scope: String },

    #[error("Failed to prepare {path}: {source}")]
    Filesystem {
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("No build command configured (set BUILDSMITH_BUILD_COMMAND or --build-command)")]
    NoBuildCommand,

    #[error("Failed to launch build command: {source}")]
    Launch { source: anyhow::Error },

    #[error("Build failed for {target}: {message}")]
    ExecutionFailure { target: BuildTarget, message: String },
}

/// Flags forwarded to the build step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub development: bool,
    pub script_debugging: bool,
}

impl From<&BuildProfile> for BuildOptions {
    fn from(profile: &BuildProfile) -> Self {
        Self {
            development: profile.development,
            script_debugging: profile.script_debugging,
        }
    }
}

/// Everything the external build step needs for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub scenes: Vec<PathBuf>,
    pub output_path: PathBuf,
    pub artifact_root: PathBuf,
    pub target: BuildTarget,
    pub product_name: String,
    pub define_symbol: Option<String>,
    pub options: BuildOptions,
    /// Directory the build step runs in
    pub working_dir: PathBuf,
}

/// Outcome of one build step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub succeeded: bool,
    /// Bytes written under the artifact
    pub total_size: u64,
}

/// Strategy for one target family shape
pub trait BuildExecutor {
    fn build(&self, request: &BuildRequest) -> Result<BuildReport, BuildError>;
}

/// Runs the configured build command with the request in `BUILDSMITH_*`
/// environment variables
struct CommandRunner<'a> {
    command: Option<String>,
    process: &'a dyn ProcessProvider,
}

impl CommandRunner<'_> {
    fn run(&self, request: &BuildRequest) -> Result<bool, BuildError> {
        let command = self
            .command
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or(BuildError::NoBuildCommand)?;

        let (shell, flag) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        let env = build_environment(request);
        debug!(command, target = %request.target, "Running build command");
        let output = self
            .process
            .execute(shell, &[flag, command], &env, &request.working_dir)
            .map_err(|source| BuildError::Launch { source })?;

        if !output.success {
            let message = if output.stderr.trim().is_empty() {
                output.stdout.trim().to_string()
            } else {
                output.stderr.trim().to_string()
            };
            return Err(BuildError::ExecutionFailure {
                target: request.target.clone(),
                message,
            });
        }
        Ok(true)
    }
}

/// Environment handed to the build command
pub fn build_environment(request: &BuildRequest) -> Vec<(String, String)> {
    let flag = |on: bool| if on { "1" } else { "0" }.to_string();
    let scenes = request
        .scenes
        .iter()
        .map(|s| s.display().to_string())
        .collect::<Vec<_>>()
        .join(";");

    vec![
        (
            "BUILDSMITH_OUTPUT".to_string(),
            request.output_path.display().to_string(),
        ),
        (
            "BUILDSMITH_ARTIFACT_ROOT".to_string(),
            request.artifact_root.display().to_string(),
        ),
        ("BUILDSMITH_TARGET".to_string(), request.target.to_string()),
        (
            "BUILDSMITH_PRODUCT".to_string(),
            request.product_name.clone(),
        ),
        ("BUILDSMITH_SCENES".to_string(), scenes),
        (
            "BUILDSMITH_DEFINE".to_string(),
            request.define_symbol.clone().unwrap_or_default(),
        ),
        (
            "BUILDSMITH_DEVELOPMENT".to_string(),
            flag(request.options.development),
        ),
        (
            "BUILDSMITH_SCRIPT_DEBUGGING".to_string(),
            flag(request.options.script_debugging),
        ),
    ]
}

fn measure(fs: &dyn FileSystemProvider, path: &Path) -> u64 {
    match fs.size_of(path) {
        Ok(size) => size,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not measure build output");
            0
        }
    }
}

/// Desktop standalone targets: the build fills a directory
pub struct StandaloneExecutor<'a> {
    runner: CommandRunner<'a>,
    fs: &'a dyn FileSystemProvider,
}

impl BuildExecutor for StandaloneExecutor<'_> {
    fn build(&self, request: &BuildRequest) -> Result<BuildReport, BuildError> {
        let succeeded = self.runner.run(request)?;
        Ok(BuildReport {
            succeeded,
            total_size: measure(self.fs, &request.artifact_root),
        })
    }
}

/// Single-file targets: the build writes one package
pub struct PackageExecutor<'a> {
    runner: CommandRunner<'a>,
    fs: &'a dyn FileSystemProvider,
}

impl BuildExecutor for PackageExecutor<'_> {
    fn build(&self, request: &BuildRequest) -> Result<BuildReport, BuildError> {
        let succeeded = self.runner.run(request)?;
        Ok(BuildReport {
            succeeded,
            total_size: measure(self.fs, &request.output_path),
        })
    }
}

/// Executor matching the output shape of `family`
pub fn executor_for<'a>(
    family: TargetFamily,
    command: Option<String>,
    process: &'a dyn ProcessProvider,
    fs: &'a dyn FileSystemProvider,
) -> Box<dyn BuildExecutor + 'a> {
    let runner = CommandRunner { command, process };
    if family.produces_directory() {
        Box::new(StandaloneExecutor { runner, fs })
    } else {
        Box::new(PackageExecutor { runner, fs })
    }
}

/// A resolved, not yet executed build
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub profile_name: String,
    pub artifact: ArtifactPath,
    pub request: BuildRequest,
    /// Unassigned scene slots left out of the request
    pub skipped_scenes: usize,
}

/// Plans and runs builds against one session
pub struct BuildOrchestrator<'a> {
    session: &'a dyn Session,
    root: PathBuf,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(session: &'a dyn Session, root: impl Into<PathBuf>) -> Self {
        Self {
            session,
            root: root.into(),
        }
    }

    /// Resolve scenes and the artifact path for `profile`
    pub fn plan(
        &self,
        config: &ProjectConfig,
        variant: Option<&str>,
        profile: &str,
    ) -> Result<BuildPlan, BuildError> {
        let mut scope = config.scope(variant)?;
        scope.output_dir = self.root.join(&scope.output_dir);
        let profile = scope.profile(profile)?;

        let mut scenes = Vec::with_capacity(scope.scenes.len());
        let mut skipped_scenes = 0;
        for (slot, scene) in scope.scenes.iter().enumerate() {
            match scene {
                Some(scene) => {
                    let path = self.session.scenes().resolve(scene).map_err(|source| {
                        BuildError::Scene {
                            scene: scene.clone(),
                            source,
                        }
                    })?;
                    scenes.push(path);
                }
                None => {
                    warn!(slot, scope = %scope.code_name, "Skipping unassigned scene slot");
                    skipped_scenes += 1;
                }
            }
        }
        if scenes.is_empty() {
            return Err(BuildError::NoScenes {
                scope: scope.code_name.clone(),
            });
        }

        let artifact = resolve_artifact_path(
            self.session.filesystem(),
            &scope,
            profile,
            &config.current_version,
            self.session.today(),
        )?;

        let request = BuildRequest {
            scenes,
            output_path: artifact.output_path.clone(),
            artifact_root: artifact.artifact_root.clone(),
            target: profile.build_target.clone(),
            product_name: profile.product_name.clone(),
            define_symbol: scope.define_symbol.map(str::to_string),
            options: BuildOptions::from(profile),
            working_dir: self.root.clone(),
        };

        Ok(BuildPlan {
            profile_name: profile.profile_name.clone(),
            artifact,
            request,
            skipped_scenes,
        })
    }

    /// Prepare the artifact directory and run the executor for the plan
    pub fn execute(&self, plan: &BuildPlan) -> Result<BuildReport, BuildError> {
        let fs = self.session.filesystem();
        fs.create_dir_all(&plan.request.artifact_root)
            .map_err(|source| BuildError::Filesystem {
                path: plan.request.artifact_root.clone(),
                source,
            })?;

        let executor = self.session.build_executor(plan.request.target.family());
        let report = executor.build(&plan.request)?;
        if !report.succeeded {
            return Err(BuildError::ExecutionFailure {
                target: plan.request.target.clone(),
                message: "build step reported failure".to_string(),
            });
        }

        info!(
            artifact = %plan.artifact.candidate,
            size = report.total_size,
            "Build succeeded"
        );
        Ok(report)
    }

    pub fn build(
        &self,
        config: &ProjectConfig,
        variant: Option<&str>,
        profile: &str,
        observer: &mut dyn BuildObserver,
    ) -> Result<(BuildPlan, BuildReport), BuildError> {
        let mut results = self.run(config, variant, &[profile.to_string()], observer)?;
        results.pop().ok_or_else(|| {
            BuildError::Project(ProjectError::UnknownProfile {
                name: profile.to_string(),
            })
        })
    }

    /// Build every profile of the scope in order, stopping at the first failure
    pub fn build_all(
        &self,
        config: &ProjectConfig,
        variant: Option<&str>,
        observer: &mut dyn BuildObserver,
    ) -> Result<Vec<(BuildPlan, BuildReport)>, BuildError> {
        let names: Vec<String> = config
            .profiles_for(variant)?
            .iter()
            .map(|p| p.profile_name.clone())
            .collect();
        self.run(config, variant, &names, observer)
    }

    fn run(
        &self,
        config: &ProjectConfig,
        variant: Option<&str>,
        profiles: &[String],
        observer: &mut dyn BuildObserver,
    ) -> Result<Vec<(BuildPlan, BuildReport)>, BuildError> {
        let mut results = Vec::with_capacity(profiles.len());
        for (index, name) in profiles.iter().enumerate() {
            let plan = self.plan(config, variant, name).inspect_err(|e| {
                observer.failed(name, e);
            })?;
            observer.started(index + 1, profiles.len(), &plan);
            match self.execute(&plan) {
                Ok(report) => {
                    observer.succeeded(&plan, &report);
                    results.push((plan, report));
                }
                Err(e) => {
                    observer.failed(name, &e);
                    return Err(e);
                }
            }
        }
        Ok(results)
    }
}

/// Progress hooks around each build of a run
pub trait BuildObserver {
    fn started(&mut self, _index: usize, _total: usize, _plan: &BuildPlan) {}
    fn succeeded(&mut self, _plan: &BuildPlan, _report: &BuildReport) {}
    fn failed(&mut self, _profile: &str, _error: &BuildError) {}
}

/// No progress reporting
impl BuildObserver for () {}

#[cfg(test)]
mod tests {
    use super::*;
    include!("builds.test.rs");
}
