//! Version triples for project releases
//!
//! Parsing is lenient about missing components (they read as 0) and strict
//! about anything that is not a number.

use crate::primitives::VersionPart;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Version parsing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version '{value}': {reason}")]
    ParseError { value: String, reason: String },
}

/// `major.minor.patch`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VersionTriple {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionTriple {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Bump one component, leaving the others untouched.
    ///
    /// Lower components are NOT reset on a major or minor bump.
    pub fn bumped(&self, part: VersionPart) -> Result<Self, VersionError> {
        let mut next = *self;
        let slot = match part {
            VersionPart::Major => &mut next.major,
            VersionPart::Minor => &mut next.minor,
            VersionPart::Patch => &mut next.patch,
        };
        *slot = slot.checked_add(1).ok_or_else(|| VersionError::ParseError {
            value: self.to_string(),
            reason: format!("{:?} component overflows", part).to_lowercase(),
        })?;
        Ok(next)
    }

    /// Dash-separated form used inside artifact names (`1-2-3`)
    pub fn artifact_segment(&self) -> String {
        format!("{}-{}-{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for VersionTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl std::str::FromStr for VersionTriple {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse a dot-separated version, filling absent components with 0
pub fn parse(version: &str) -> Result<VersionTriple, VersionError> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return Err(VersionError::ParseError {
            value: version.to_string(),
            reason: "version is empty".to_string(),
        });
    }

    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() > 3 {
        return Err(VersionError::ParseError {
            value: version.to_string(),
            reason: format!("expected at most 3 components, found {}", parts.len()),
        });
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| VersionError::ParseError {
            value: version.to_string(),
            reason: format!("component '{}' is not a number", part),
        })?;
    }

    Ok(VersionTriple::new(numbers[0], numbers[1], numbers[2]))
}

/// Increment one component of a version string
pub fn increment(version: &str, part: VersionPart) -> Result<String, VersionError> {
    let next = parse(version)?.bumped(part)?;
    debug!(from = version, to = %next, ?part, "Incremented version");
    Ok(next.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("versions.test.rs");
}
