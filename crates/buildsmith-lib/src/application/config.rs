//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use crate::primitives::*;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

/// Default configuration values
pub mod defaults {
    pub const LOG_LEVEL: &str = "0"; // Error-only logging by default
    pub const LOG_FORMAT: &str = "text";
    pub const LOG_OUTPUT: &str = "stderr";
    pub const COLOR: &str = "auto";
    pub const TARGET_GROUP: &str = "standalone";
}

/// Default value functions for configuration fields
mod default_fns {
    use crate::primitives::{ColorIntent, LogFormat, LogOutput};

    pub fn log_level() -> u8 {
        0
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Stderr
    }

    pub fn color() -> ColorIntent {
        ColorIntent::Auto
    }

    pub fn target_group() -> String {
        super::defaults::TARGET_GROUP.to_string()
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Parser, Deserialize)]
pub struct AppConfig {
    /// Project root (defaults to the current directory)
    #[arg(short, long, env = "BUILDSMITH_WORKDIR", global = true)]
    #[serde(default)]
    pub workdir: Option<PathBuf>,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, env = "BUILDSMITH_LOG_LEVEL", default_value = defaults::LOG_LEVEL, global = true)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Log format (text, json, pretty)
    #[arg(long, env = "BUILDSMITH_LOG_FORMAT", default_value = defaults::LOG_FORMAT, global = true)]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(long, env = "BUILDSMITH_LOG_OUTPUT", default_value = defaults::LOG_OUTPUT, global = true)]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,

    /// Color output control (auto, always, never)
    #[arg(short, long, env = "BUILDSMITH_COLOR", default_value = defaults::COLOR, global = true)]
    #[serde(default = "default_fns::color")]
    pub color: ColorIntent,

    /// External build step; receives the request in BUILDSMITH_* variables
    #[arg(long, env = "BUILDSMITH_BUILD_COMMAND", global = true)]
    #[serde(default)]
    pub build_command: Option<String>,

    /// Target group whose define symbols select the active variant
    #[arg(long, env = "BUILDSMITH_TARGET_GROUP", default_value = defaults::TARGET_GROUP, global = true)]
    #[serde(default = "default_fns::target_group")]
    pub target_group: String,

    /// Accept every prompt's default
    #[arg(short, long, env = "BUILDSMITH_YES", global = true)]
    #[serde(default)]
    pub yes: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workdir: None,
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color(),
            build_command: None,
            target_group: default_fns::target_group(),
            yes: false,
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig from AppConfig
    pub fn to_logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            color: self.color.enabled(),
        }
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        // For Option fields, take other if it's Some
        if other.workdir.is_some() {
            self.workdir = other.workdir;
        }
        if other.build_command.is_some() {
            self.build_command = other.build_command;
        }

        // For primitive fields, take other if it's not the default
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }
        if other.target_group != default_fns::target_group() {
            self.target_group = other.target_group;
        }
        if other.yes {
            self.yes = true;
        }

        // For enums, detect if it's non-default
        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if !matches!(other.color, ColorIntent::Auto) {
            self.color = other.color;
        }

        self
    }

    /// Validate the final configuration
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        match &self.workdir {
            Some(dir) if !dir.is_dir() => {
                return Err(ConfigError::InvalidWorkDir {
                    path: dir.display().to_string(),
                });
            }
            Some(_) => {}
            None => {
                self.workdir = Some(
                    std::env::current_dir()
                        .map_err(|e| ConfigError::CurrentDirError { source: e })?,
                );
            }
        }

        if self.target_group.trim().is_empty() {
            return Err(ConfigError::ParseError {
                value: self.target_group.clone(),
                reason: "target group must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
