//! # buildsmith Library
//!
//! Build variant and artifact management.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Foundation types, errors, and shared coordination
//! - [`project`] - Configuration model, setup wizard, artifact naming and builds
//! - [`display`] - Terminal status output and progress spinners
//! - [`logger`] - Structured logging with progress tracking
//! - [`application`] - CLI interface, configuration and command sessions
//! - [`testing`] - Filesystem fixtures for tests
//!
//! ## Quick Start
//!
//! ```no_run
//! // Parse the command line and run buildsmith
//! buildsmith_lib::main().unwrap();
//! ```

pub mod application;
pub mod display;
pub mod logger;
pub mod primitives;
pub mod project;
pub mod testing;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use logger::Logger;
pub use primitives::{ColorIntent, ConfigError, LogFormat, LogLevel, LogOutput, LoggerError};
pub use project::{ProjectConfig, Wizard};

pub use anyhow::Result;

use application::{CliConfig, load_env_files};

pub fn main() -> Result<()> {
    // .env files must be in the environment before clap reads BUILDSMITH_* variables
    load_env_files()?;

    let mut cli = CliConfig::load()?;
    cli.app_config = AppConfig::load(cli.app_config)?;

    execute_command(cli)
}
