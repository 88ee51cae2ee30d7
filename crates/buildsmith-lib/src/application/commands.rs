//! Command execution handlers
//!
//! Every handler receives the session, loads the project config it needs,
//! mutates it and saves it explicitly before returning.

use crate::application::cli::{ProfileAction, VariantAction, VersionAction};
use crate::application::session::{CommandSession, Session};
use crate::application::{CliConfig, Commands};
use crate::display::{DisplayProvider, ProgressTracker, StatusProvider};
use crate::primitives::{BuildMode, BuildTarget, WizardStep};
use crate::project::builds::{
    BuildError, BuildObserver, BuildOrchestrator, BuildPlan, BuildReport,
};
use crate::project::model::{ProjectConfig, ProjectError, derive_define_symbol};
use crate::project::profile::{BuildProfile, DEVELOPMENT_SUFFIX, PRODUCTION_SUFFIX};
use crate::project::store::ConfigStore;
use crate::project::switching;
use crate::project::wizard::{Wizard, WizardError};
use anyhow::{Context, Result, anyhow, bail};
use indicatif::HumanBytes;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Consecutive failed attempts at one wizard step before setup gives up
const MAX_STEP_ATTEMPTS: usize = 3;

/// Execute CLI commands using the session-based architecture
pub fn execute_command(config: CliConfig) -> Result<()> {
    let session = CommandSession::new(config.app_config)?;

    let command = match config.command {
        Some(cmd) => cmd,
        None => {
            session
                .display()
                .status()
                .message("buildsmith - build variants and revisioned artifacts");
            session
                .display()
                .status()
                .subtle("Run 'buildsmith --help' for usage information");
            return Ok(());
        }
    };

    execute_command_with_session(command, &session)
}

/// Execute a specific command with a provided session (for testing)
pub fn execute_command_with_session(command: Commands, session: &dyn Session) -> Result<()> {
    debug!(?command, "Executing command");
    match command {
        Commands::Setup { reset } => handle_setup(session, reset),
        Commands::Status => handle_status(session),
        Commands::Version { action } => handle_version(session, action),
        Commands::Variant { action } => handle_variant(session, action),
        Commands::Profile { action } => handle_profile(session, action),
        Commands::Path { variant, profile } => handle_path(session, variant, profile),
        Commands::Build {
            variant,
            profile,
            all,
        } => handle_build(session, variant, profile, all),
    }
}

/// Project root and its completed configuration
fn load_project(session: &dyn Session) -> Result<(PathBuf, ProjectConfig)> {
    let root = session.project_root()?;
    let store = ConfigStore::new(&root, session.filesystem());

    match store.load()? {
        Some(config) if config.setup_complete => Ok((root, config)),
        _ => {
            session
                .display()
                .status()
                .subtle("Run 'buildsmith setup' to configure this project");
            Err(anyhow!(
                "Project setup is not complete in {}",
                root.display()
            ))
        }
    }
}

fn save_project(session: &dyn Session, root: &Path, config: &ProjectConfig) -> Result<()> {
    ConfigStore::new(root, session.filesystem())
        .save(config)
        .context("Failed to save project config")
}

/// Requested variant, else the active one in wildcard mode
fn resolve_variant(
    session: &dyn Session,
    config: &ProjectConfig,
    requested: Option<String>,
) -> Result<Option<String>> {
    if config.mode == BuildMode::Single || requested.is_some() {
        return Ok(requested);
    }

    let group = &session.config().app_config().target_group;
    let active = switching::active_variant(config, session.defines(), group)?
        .map(|v| v.code_name.clone());
    match active {
        Some(code_name) => Ok(Some(code_name)),
        None => Err(ProjectError::VariantRequired.into()),
    }
}

/// Requested profile, else the first profile of the scope
fn resolve_profile(
    config: &ProjectConfig,
    variant: Option<&str>,
    requested: Option<String>,
) -> Result<String> {
    if let Some(name) = requested {
        return Ok(name);
    }
    config
        .profiles_for(variant)?
        .first()
        .map(|p| p.profile_name.clone())
        .ok_or_else(|| anyhow!("No build profiles configured"))
}

fn handle_setup(session: &dyn Session, reset: bool) -> Result<()> {
    let root = session.project_root()?;
    let store = ConfigStore::new(&root, session.filesystem());
    let existing = store.load()?;

    let mut wizard = Wizard::new(&root);
    if let Some(mut existing) = existing {
        if existing.setup_complete && !reset {
            session
                .display()
                .status()
                .info(&format!("'{}' is already set up", existing.effective_project_name()));
            session
                .display()
                .status()
                .subtle("Run 'buildsmith setup --reset' to start over");
            return Ok(());
        }

        if reset {
            wizard.reset_to_wizard(&mut existing);
            store.save(&existing)?;
        }
        if wizard.set_version(&existing.current_version).is_err() {
            session.display().status().warning(&format!(
                "Ignoring unparsable version '{}'",
                existing.current_version
            ));
        }
    }

    session.display().status().section("buildsmith setup");
    run_wizard(session, &mut wizard, &root)?;

    let config = wizard.complete()?;
    store.save(&config)?;

    session.display().status().success(
        "Setup complete",
        &format!("{} ({} mode)", config.effective_project_name(), config.mode),
    );
    Ok(())
}

fn run_wizard(session: &dyn Session, wizard: &mut Wizard, root: &Path) -> Result<()> {
    let fs = session.filesystem();
    let mut attempts = 0;

    while wizard.current_step() != WizardStep::Complete {
        let step = wizard.current_step();
        session
            .display()
            .status()
            .step(step.ordinal(), WizardStep::Profiles.ordinal(), &describe_step(step));

        prompt_step(session, wizard, root)?;

        match wizard.advance(fs) {
            Ok(_) => attempts = 0,
            Err(WizardError::Validation(reason)) => {
                attempts += 1;
                session.display().status().warning(&reason.to_string());
                if attempts >= MAX_STEP_ATTEMPTS {
                    bail!("Setup cancelled after {} failed attempts: {}", attempts, reason);
                }

                let choice = session
                    .interactive()
                    .select("What next?", &["Retry this step", "Go back", "Cancel"])?;
                match choice {
                    0 => {}
                    1 => {
                        wizard.back();
                        attempts = 0;
                    }
                    _ => bail!("Setup cancelled"),
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn describe_step(step: WizardStep) -> String {
    match step {
        WizardStep::Mode => "Choose the build mode".to_string(),
        WizardStep::Names => "Name the project".to_string(),
        WizardStep::Folder => "Pick the build folder".to_string(),
        WizardStep::Scenes => "Assign scenes".to_string(),
        WizardStep::Profiles => "Review build profiles".to_string(),
        WizardStep::Complete => "Done".to_string(),
    }
}

fn prompt_step(session: &dyn Session, wizard: &mut Wizard, root: &Path) -> Result<()> {
    let input = session.interactive();
    let status = session.display().status();

    match wizard.current_step() {
        WizardStep::Mode => {
            let modes = [BuildMode::Single, BuildMode::Wildcard];
            let labels = [
                "single - one scene list and profile list",
                "wildcard - one variant per code name",
            ];
            let choice = input.select("Build mode", &labels)?;
            wizard.set_mode(modes.get(choice).copied().unwrap_or(BuildMode::Single));
        }
        WizardStep::Names => {
            let default_name = root
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("project")
                .to_string();
            let name = input.text_input("Project name", default_name)?;
            wizard.set_project_name(&name);

            match wizard.mode() {
                BuildMode::Single => {
                    let code = input.text_input("Code name (optional)", String::new())?;
                    wizard.set_project_code_name(&code);
                }
                BuildMode::Wildcard => {
                    let display = input.text_input("Wildcard project name (optional)", String::new())?;
                    wizard.set_wildcard_project_name(&display);
                    wizard.clear_variants();
                    prompt_variants(session, wizard)?;
                }
            }
        }
        WizardStep::Folder => {
            let current = if wizard.build_folder().is_empty() {
                "Builds".to_string()
            } else {
                wizard.build_folder().to_string()
            };
            let folder = input.text_input("Build folder", current)?;
            wizard.set_build_folder(&folder);

            let path = wizard.resolved_build_folder();
            if !folder.trim().is_empty()
                && !session.filesystem().is_directory(&path)
                && input.confirm(&format!("Create {}?", path.display()), true)?
            {
                match wizard.create_build_folder(session.filesystem()) {
                    Ok(created) => status.success("Created", &created.display().to_string()),
                    Err(e) => status.error("Build folder", &e.to_string()),
                }
            }
        }
        WizardStep::Scenes => match wizard.mode() {
            BuildMode::Single => {
                prompt_scenes(session, wizard, "Scene path (empty to finish)")?;
            }
            BuildMode::Wildcard => {
                for index in 0..wizard.variants().len() {
                    wizard.select_variant(index)?;
                    let code_name = wizard.variants()[index].code_name.clone();
                    let prompt = format!("Scene for {} (empty to finish)", code_name);
                    prompt_scenes(session, wizard, &prompt)?;
                }
            }
        },
        WizardStep::Profiles => {
            status.info("Empty profile lists get the default Production and Development profiles");
        }
        WizardStep::Complete => {}
    }
    Ok(())
}

fn prompt_variants(session: &dyn Session, wizard: &mut Wizard) -> Result<()> {
    let input = session.interactive();
    loop {
        let code_name = input.text_input("Variant code name (empty to finish)", String::new())?;
        if code_name.trim().is_empty() {
            return Ok(());
        }
        let define = input.text_input("Define symbol", derive_define_symbol(&code_name))?;
        wizard.add_variant(&code_name, &define);
    }
}

fn prompt_scenes(session: &dyn Session, wizard: &mut Wizard, prompt: &str) -> Result<()> {
    let input = session.interactive();
    wizard.scenes_mut()?.clear();
    loop {
        let scene = input.text_input(prompt, String::new())?;
        if scene.trim().is_empty() {
            break;
        }
        wizard.add_scene(Some(scene.trim().to_string()))?;
    }
    for warning in wizard.scene_warnings() {
        session.display().status().warning(&warning);
    }
    Ok(())
}

fn handle_status(session: &dyn Session) -> Result<()> {
    let (_, config) = load_project(session)?;
    let status = session.display().status();

    status.section(config.effective_project_name());
    status.message(&format!("Mode: {}", config.mode));
    status.message(&format!("Version: {}", config.current_version));
    status.message(&format!("Build folder: {}", config.build_root().display()));

    match config.mode {
        BuildMode::Single => {
            let assigned = config.scenes.iter().filter(|s| s.is_some()).count();
            status.message(&format!("Scenes: {} assigned", assigned));
            if assigned < config.scenes.len() {
                status.warning(&format!(
                    "{} scene slot(s) unassigned",
                    config.scenes.len() - assigned
                ));
            }
            let names: Vec<&str> = config.profiles.iter().map(|p| p.profile_name.as_str()).collect();
            status.message("Profiles:");
            status.list(&names);
        }
        BuildMode::Wildcard => {
            let group = &session.config().app_config().target_group;
            let active = switching::active_variant(&config, session.defines(), group)?
                .map(|v| v.code_name.clone());
            match &active {
                Some(code_name) => status.message(&format!("Active variant: {}", code_name)),
                None => status.warning("No variants configured"),
            }
            let lines = variant_lines(&config, active.as_deref());
            let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
            status.message("Variants:");
            status.list(&lines);
        }
    }
    Ok(())
}

fn variant_lines(config: &ProjectConfig, active: Option<&str>) -> Vec<String> {
    config
        .variants
        .iter()
        .map(|v| {
            let marker = if Some(v.code_name.as_str()) == active {
                " (active)"
            } else {
                ""
            };
            format!(
                "{} [{}] {} scene(s), {} profile(s){}",
                v.code_name,
                v.define_symbol,
                v.scene_refs.len(),
                v.build_profiles.len(),
                marker
            )
        })
        .collect()
}

fn handle_version(session: &dyn Session, action: Option<VersionAction>) -> Result<()> {
    let (root, mut config) = load_project(session)?;

    match action.unwrap_or(VersionAction::Show) {
        VersionAction::Show => {
            session.display().status().message(&config.current_version);
        }
        VersionAction::Bump { part } => {
            let previous = config.current_version.clone();
            let next = config.bump_version(part)?;
            save_project(session, &root, &config)?;
            session
                .display()
                .status()
                .success("Version", &format!("{} -> {}", previous, next));
        }
    }
    Ok(())
}

fn require_wildcard(config: &ProjectConfig, operation: &str) -> Result<()> {
    if config.mode != BuildMode::Wildcard {
        return Err(ProjectError::WrongMode {
            mode: config.mode,
            operation: operation.to_string(),
        }
        .into());
    }
    Ok(())
}

fn handle_variant(session: &dyn Session, action: VariantAction) -> Result<()> {
    let (root, mut config) = load_project(session)?;
    let status = session.display().status();

    match action {
        VariantAction::Add { code_name, define } => {
            require_wildcard(&config, "variant add")?;
            match config.add_variant(&code_name, define.as_deref().unwrap_or_default()) {
                Ok(variant) => {
                    let details = format!("define {}", variant.define_symbol);
                    status.success(&format!("Added variant {}", variant.code_name), &details);
                }
                Err(ProjectError::DuplicateName { name }) => {
                    status.warning(&format!("'{}' is already used by another variant; nothing changed", name));
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
            save_project(session, &root, &config)?;
        }
        VariantAction::Remove { code_name } => {
            require_wildcard(&config, "variant remove")?;
            match config.remove_variant(&code_name) {
                Some(removed) => {
                    save_project(session, &root, &config)?;
                    status.success("Removed variant", &removed.code_name);
                }
                None => status.info(&format!("No variant named '{}'", code_name)),
            }
        }
        VariantAction::List => {
            require_wildcard(&config, "variant list")?;
            let group = &session.config().app_config().target_group;
            let active = switching::active_variant(&config, session.defines(), group)?
                .map(|v| v.code_name.clone());
            let lines = variant_lines(&config, active.as_deref());
            let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
            status.list(&lines);
        }
        VariantAction::Switch { code_name } => {
            require_wildcard(&config, "variant switch")?;
            let group = session.config().app_config().target_group.clone();
            let variant = switching::switch_variant(&config, session.defines(), &group, &code_name)?;
            status.success(
                &format!("Switched to {}", variant.code_name),
                &format!("{} defined for {}", variant.define_symbol, group),
            );
        }
    }
    Ok(())
}

fn handle_profile(session: &dyn Session, action: ProfileAction) -> Result<()> {
    let (root, mut config) = load_project(session)?;
    let status = session.display().status();

    match action {
        ProfileAction::Add {
            name,
            variant,
            development,
            target,
            suffix,
        } => {
            let variant = resolve_variant(session, &config, variant)?;
            let suffix = suffix.unwrap_or_else(|| {
                if development {
                    DEVELOPMENT_SUFFIX
                } else {
                    PRODUCTION_SUFFIX
                }
                .to_string()
            });
            let profile = BuildProfile::new(&name, &suffix, config.effective_project_name())
                .with_development(development)
                .with_target(target.unwrap_or_else(BuildTarget::host));

            match config.add_profile(variant.as_deref(), profile) {
                Ok(()) => {}
                Err(ProjectError::DuplicateName { name }) => {
                    status.warning(&format!("Profile '{}' already exists; nothing changed", name));
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
            save_project(session, &root, &config)?;
            status.success("Added profile", &name);
        }
        ProfileAction::Remove { name, variant } => {
            let variant = resolve_variant(session, &config, variant)?;
            match config.remove_profile(variant.as_deref(), &name)? {
                Some(removed) => {
                    save_project(session, &root, &config)?;
                    status.success("Removed profile", &removed.profile_name);
                }
                None => status.info(&format!("No profile named '{}'", name)),
            }
        }
        ProfileAction::List { variant } => {
            let variant = resolve_variant(session, &config, variant)?;
            let lines: Vec<String> = config
                .profiles_for(variant.as_deref())?
                .iter()
                .map(|p| {
                    format!(
                        "{} [{}] {}{}",
                        p.profile_name,
                        p.build_suffix,
                        p.build_target,
                        if p.development { " development" } else { "" }
                    )
                })
                .collect();
            let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
            status.list(&lines);
        }
    }
    Ok(())
}

fn handle_path(
    session: &dyn Session,
    variant: Option<String>,
    profile: Option<String>,
) -> Result<()> {
    let (root, config) = load_project(session)?;
    let variant = resolve_variant(session, &config, variant)?;
    let profile = resolve_profile(&config, variant.as_deref(), profile)?;

    let orchestrator = BuildOrchestrator::new(session, &root);
    let plan = orchestrator.plan(&config, variant.as_deref(), &profile)?;
    session
        .display()
        .status()
        .message(&plan.artifact.output_path.display().to_string());
    Ok(())
}

fn handle_build(
    session: &dyn Session,
    variant: Option<String>,
    profile: Option<String>,
    all: bool,
) -> Result<()> {
    let (root, config) = load_project(session)?;
    let variant = resolve_variant(session, &config, variant)?;

    let orchestrator = BuildOrchestrator::new(session, &root);
    let mut progress = BuildProgress::new(session.display());
    let result = if all {
        orchestrator
            .build_all(&config, variant.as_deref(), &mut progress)
            .map(drop)
    } else {
        let profile = resolve_profile(&config, variant.as_deref(), profile)?;
        orchestrator
            .build(&config, variant.as_deref(), &profile, &mut progress)
            .map(drop)
    };

    match (result, progress.failed_profile) {
        (Ok(()), _) => Ok(()),
        (Err(e), Some(name)) => Err(e).with_context(|| format!("Build of profile '{}' failed", name)),
        (Err(e), None) => Err(e.into()),
    }
}

/// Step, spinner and result lines for a build run
struct BuildProgress<'a> {
    display: &'a dyn DisplayProvider,
    status: Box<dyn StatusProvider + 'a>,
    /// Running spinner and the artifact it is building
    spinner: Option<(Box<dyn ProgressTracker + 'a>, String)>,
    failed_profile: Option<String>,
}

impl<'a> BuildProgress<'a> {
    fn new(display: &'a dyn DisplayProvider) -> Self {
        Self {
            display,
            status: display.status(),
            spinner: None,
            failed_profile: None,
        }
    }
}

impl BuildObserver for BuildProgress<'_> {
    fn started(&mut self, index: usize, total: usize, plan: &BuildPlan) {
        self.status
            .step(index, total, &format!("Building {}", plan.profile_name));
        if plan.skipped_scenes > 0 {
            self.status.warning(&format!(
                "Skipped {} unassigned scene slot(s)",
                plan.skipped_scenes
            ));
        }
        let candidate = plan.artifact.candidate.clone();
        let spinner = self.display.spinner(&format!("Building {}", candidate));
        self.spinner = Some((spinner, candidate));
    }

    fn succeeded(&mut self, plan: &BuildPlan, report: &BuildReport) {
        if let Some((spinner, candidate)) = self.spinner.take() {
            spinner.finish(&candidate);
        }
        self.status.success(
            &plan.artifact.output_path.display().to_string(),
            &HumanBytes(report.total_size).to_string(),
        );
    }

    fn failed(&mut self, profile: &str, error: &BuildError) {
        // Planning failures happen before a spinner exists
        if let Some((spinner, candidate)) = self.spinner.take() {
            spinner.abandon(&candidate);
            self.failed_profile = Some(profile.to_string());
        }
        if let BuildError::ExecutionFailure { message, .. } = error {
            self.status.error("Build failed", message);
        }
    }
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
