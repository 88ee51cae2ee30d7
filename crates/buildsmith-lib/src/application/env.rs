//! Conventional color environment variables
//!
//! `NO_COLOR`, `FORCE_COLOR`, `CLICOLOR` and `CI` adjust the configured
//! color intent before CLI flags are applied.

use crate::primitives::{ColorIntent, ConfigError};
use serde::Deserialize;

/// Color-related environment, read through envy
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    /// Any non-empty value disables color
    pub no_color: Option<String>,
    /// `0`/`false` disables, `1`/`2`/`3`/`true` forces color
    pub force_color: Option<String>,
    /// `0` disables color
    pub clicolor: Option<String>,
    /// Set on CI runners; disables color outright
    pub ci: Option<String>,
}

impl EnvironmentConfig {
    pub fn load() -> Result<Self, ConfigError> {
        envy::from_env().map_err(|source| ConfigError::EnvironmentParsingFailed { source })
    }

    /// Resolve `color` against the environment.
    ///
    /// CI disables color unconditionally; otherwise FORCE_COLOR beats
    /// NO_COLOR, which beats CLICOLOR.
    pub fn apply_color_config(&self, color: ColorIntent) -> ColorIntent {
        if self.ci.is_some() {
            return ColorIntent::Never;
        }

        let forced = match self.force_color.as_deref() {
            Some("0" | "false") => Some(ColorIntent::Never),
            Some("1" | "2" | "3" | "true") => Some(ColorIntent::Always),
            _ => None,
        };
        if let Some(forced) = forced {
            return forced;
        }

        let no_color = self.no_color.as_deref().is_some_and(|v| !v.is_empty());
        let clicolor_off = self.clicolor.as_deref() == Some("0");
        if no_color || clicolor_off {
            return ColorIntent::Never;
        }

        color
    }
}

#[cfg(test)]
mod tests {
    include!("env.test.rs");
}
