//! Configuration loading
//!
//! Layers configuration sources in precedence order and validates the
//! result once, before a session is created.

use crate::primitives::ConfigError;

use super::{config::AppConfig, env::EnvironmentConfig};

/// Env files read before the process environment, first match wins per key
pub const ENV_FILES: [&str; 2] = [".env.local", ".env"];

impl AppConfig {
    /// Load config: defaults -> .env -> env vars -> CLI
    ///
    /// `cli` is the parsed command-line layer. Clap applies `BUILDSMITH_*`
    /// variables while parsing, so `load_env_files` must run before it.
    pub fn load(cli: AppConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let env_config = EnvironmentConfig::load()?;
        config.color = env_config.apply_color_config(config.color);

        config = config.merge_with(cli);
        config.validate()?;

        Ok(config)
    }
}

/// Read `.env.local` and `.env` into the process environment; a missing
/// file is not an error, an unreadable one is
pub fn load_env_files() -> Result<(), ConfigError> {
    for env_file in ENV_FILES {
        match dotenvy::from_filename(env_file) {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(source) => {
                return Err(ConfigError::EnvFileError {
                    file: env_file.to_string(),
                    source,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
