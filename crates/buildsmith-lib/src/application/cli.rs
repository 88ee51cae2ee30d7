use crate::primitives::{BuildTarget, ConfigError, VersionPart};
use clap::{Parser, Subcommand};

use super::config::AppConfig;

/// buildsmith CLI - build variants and revisioned artifacts
#[derive(Debug, Clone, Parser)]
#[command(name = "buildsmith")]
#[command(about = "Manage build variants, profiles and collision-free build artifacts")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// buildsmith commands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl CliConfig {
    /// Load configuration from command line arguments
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::from_cli(Cli::parse()))
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self {
            app_config: cli.config,
            command: cli.command,
        }
    }
}

/// Available buildsmith commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the setup wizard
    Setup {
        /// Discard the existing setup and start over
        #[arg(long)]
        reset: bool,
    },

    /// Show the project configuration and the active variant
    Status,

    /// Show or bump the project version
    Version {
        #[command(subcommand)]
        action: Option<VersionAction>,
    },

    /// Manage code-name variants (wildcard mode)
    Variant {
        #[command(subcommand)]
        action: VariantAction,
    },

    /// Manage build profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Print the artifact path the next build would use
    Path {
        /// Variant code name (defaults to the active variant)
        #[arg(long)]
        variant: Option<String>,

        /// Profile name (defaults to the first profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Build one profile, or every profile with --all
    Build {
        /// Variant code name (defaults to the active variant)
        #[arg(long)]
        variant: Option<String>,

        /// Profile name (defaults to the first profile)
        #[arg(long, conflicts_with = "all")]
        profile: Option<String>,

        /// Build every profile in order, stopping at the first failure
        #[arg(long)]
        all: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum VersionAction {
    /// Print the current version
    Show,

    /// Increment one component and save
    Bump {
        #[arg(value_enum)]
        part: VersionPart,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum VariantAction {
    /// Add a variant seeded with Production and Development profiles
    Add {
        code_name: String,

        /// Define symbol (derived from the code name when omitted)
        #[arg(long)]
        define: Option<String>,
    },

    /// Remove a variant
    Remove { code_name: String },

    /// List variants, marking the active one
    List,

    /// Make a variant active by rewriting the define symbols
    Switch { code_name: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ProfileAction {
    /// Add a profile
    Add {
        name: String,

        /// Owning variant (wildcard mode)
        #[arg(long)]
        variant: Option<String>,

        /// Development build with script debugging
        #[arg(long)]
        development: bool,

        /// Build target id (e.g. standalone-windows64, android)
        #[arg(long)]
        target: Option<BuildTarget>,

        /// Artifact suffix (defaults to dev/prd)
        #[arg(long)]
        suffix: Option<String>,
    },

    /// Remove a profile
    Remove {
        name: String,

        /// Owning variant (wildcard mode)
        #[arg(long)]
        variant: Option<String>,
    },

    /// List profiles
    List {
        /// Owning variant (wildcard mode)
        #[arg(long)]
        variant: Option<String>,
    },
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            command: None,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
