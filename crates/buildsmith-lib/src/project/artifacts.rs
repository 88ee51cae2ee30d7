//! Artifact path resolution
//!
//! Artifact names look like `{code}-{suffix}-v{version}-{YYMMDD}-rev{n}`.
//! The revision is the first one with nothing on disk at the candidate
//! location, so an existing artifact is never overwritten.

use crate::application::session::FileSystemProvider;
use crate::project::model::BuildScope;
use crate::project::profile::BuildProfile;
use crate::project::versions::{self, VersionError};
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Date stamp format embedded in artifact names
pub const DATE_FORMAT: &str = "%y%m%d";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    #[error("Artifact name needs a code name")]
    EmptyCodeName,

    #[error("Profile '{profile}' has no build suffix")]
    EmptySuffix { profile: String },

    #[error("Version is not usable in an artifact name: {source}")]
    Version {
        #[from]
        source: VersionError,
    },

    #[error("No free revision left for {base}")]
    RevisionsExhausted { base: String },

    #[error("Failed to list {path}: {message}")]
    Listing { path: PathBuf, message: String },
}

/// Where one build lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPath {
    /// Name without the revision
    pub base: String,
    /// `{base}-rev{revision}`
    pub candidate: String,
    pub revision: u32,
    /// Directory the candidate was probed in
    pub output_dir: PathBuf,
    /// Directory the build writes into: the candidate directory for
    /// directory-producing targets, `output_dir` otherwise
    pub artifact_root: PathBuf,
    /// Executable or package the build step produces
    pub output_path: PathBuf,
}

/// `{code}-{suffix}-v{a-b-c}-{YYMMDD}`, code name lowercased
pub fn artifact_base(
    code_name: &str,
    suffix: &str,
    version: &str,
    date: NaiveDate,
) -> Result<String, ArtifactError> {
    let code_name = code_name.trim();
    if code_name.is_empty() {
        return Err(ArtifactError::EmptyCodeName);
    }

    // Rejects malformed versions; the segment keeps the version as written
    versions::parse(version)?;
    let version_segment = version.trim().replace('.', "-");

    Ok(format!(
        "{}-{}-v{}-{}",
        code_name.to_lowercase(),
        suffix.trim(),
        version_segment,
        date.format(DATE_FORMAT)
    ))
}

/// Probe revisions from 1 upwards and return the first free artifact path
pub fn resolve_artifact_path(
    fs: &dyn FileSystemProvider,
    scope: &BuildScope<'_>,
    profile: &BuildProfile,
    version: &str,
    date: NaiveDate,
) -> Result<ArtifactPath, ArtifactError> {
    if profile.build_suffix.trim().is_empty() {
        return Err(ArtifactError::EmptySuffix {
            profile: profile.profile_name.clone(),
        });
    }

    let base = artifact_base(&scope.code_name, &profile.build_suffix, version, date)?;
    let family = profile.build_target.family();
    let extension = family.extension();
    let output_dir = scope.output_dir.clone();
    let existing = fs
        .get_file_list(&output_dir)
        .map_err(|e| ArtifactError::Listing {
            path: output_dir.clone(),
            message: e.to_string(),
        })?;

    for revision in 1..=u32::MAX {
        let candidate = format!("{}-rev{}", base, revision);

        let taken = if family.produces_directory() {
            let path = output_dir.join(&candidate);
            existing.contains(&path) && fs.is_directory(&path)
        } else {
            let path = output_dir.join(format!("{}{}", candidate, extension));
            existing.contains(&path) && fs.is_file(&path)
        };
        if taken {
            debug!(candidate = %candidate, "Artifact revision in use");
            continue;
        }

        let (artifact_root, output_path) = if family.produces_directory() {
            let root = output_dir.join(&candidate);
            let path = root.join(format!("{}{}", profile.product_name, extension));
            (root, path)
        } else {
            let path = output_dir.join(format!("{}{}", candidate, extension));
            (output_dir.clone(), path)
        };

        debug!(candidate = %candidate, output = %output_path.display(), "Resolved artifact path");
        return Ok(ArtifactPath {
            base,
            candidate,
            revision,
            output_dir,
            artifact_root,
            output_path,
        });
    }

    Err(ArtifactError::RevisionsExhausted { base })
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("artifacts.test.rs");
}
