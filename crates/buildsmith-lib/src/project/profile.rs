//! Build profiles: named build configurations applied to a variant or a
//! single-mode project

use crate::primitives::BuildTarget;
use serde::{Deserialize, Serialize};

pub const PRODUCTION_PROFILE: &str = "Production";
pub const DEVELOPMENT_PROFILE: &str = "Development";
pub const PRODUCTION_SUFFIX: &str = "prd";
pub const DEVELOPMENT_SUFFIX: &str = "dev";

/// A named build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildProfile {
    /// Identity within the owning variant or project
    pub profile_name: String,
    pub display_name: String,
    /// Short tag embedded in artifact names (`prd`, `dev`, ...)
    pub build_suffix: String,
    /// Player/product name written into the build
    pub product_name: String,
    #[serde(rename = "buildTargetId")]
    pub build_target: BuildTarget,
    pub development: bool,
    pub script_debugging: bool,
    /// Development flag the profile was created with
    pub default_development: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_ref: Option<String>,
}

impl BuildProfile {
    /// Start a profile targeting the host platform, release flags off
    pub fn new(profile_name: &str, build_suffix: &str, product_name: &str) -> Self {
        Self {
            profile_name: profile_name.to_string(),
            display_name: profile_name.to_string(),
            build_suffix: build_suffix.to_string(),
            product_name: product_name.to_string(),
            build_target: BuildTarget::host(),
            development: false,
            script_debugging: false,
            default_development: false,
            icon_ref: None,
        }
    }

    /// Set the development flag; script debugging follows it
    pub fn with_development(mut self, development: bool) -> Self {
        self.development = development;
        self.script_debugging = development;
        self.default_development = development;
        self
    }

    pub fn with_target(mut self, target: BuildTarget) -> Self {
        self.build_target = target;
        self
    }

    /// Case-insensitive identity comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.profile_name.eq_ignore_ascii_case(name)
    }
}

/// Canonical release profile for `name`
pub fn default_production_profile(name: &str) -> BuildProfile {
    BuildProfile::new(PRODUCTION_PROFILE, PRODUCTION_SUFFIX, name).with_development(false)
}

/// Canonical development profile for `name`
pub fn default_development_profile(name: &str) -> BuildProfile {
    BuildProfile::new(DEVELOPMENT_PROFILE, DEVELOPMENT_SUFFIX, name).with_development(true)
}

/// The Production + Development pair every new profile list is seeded with
pub fn default_profiles(name: &str) -> Vec<BuildProfile> {
    vec![
        default_production_profile(name),
        default_development_profile(name),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_defaults() {
        let profile = default_production_profile("Skyline");
        assert_eq!(profile.profile_name, "Production");
        assert_eq!(profile.build_suffix, "prd");
        assert_eq!(profile.product_name, "Skyline");
        assert!(!profile.development);
        assert!(!profile.script_debugging);
        assert!(!profile.default_development);
    }

    #[test]
    fn test_development_defaults_mirror_flag() {
        let profile = default_development_profile("Skyline");
        assert_eq!(profile.build_suffix, "dev");
        assert!(profile.development);
        assert!(profile.script_debugging);
        assert!(profile.default_development);
    }

    #[test]
    fn test_profile_identity_ignores_case() {
        let profile = default_development_profile("Skyline");
        assert!(profile.is_named("development"));
        assert!(!profile.is_named("production"));
    }

    #[test]
    fn test_profile_serializes_target_id() {
        let profile = default_production_profile("Skyline").with_target(BuildTarget::Android);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["buildTargetId"], "android");
        assert_eq!(json["buildSuffix"], "prd");
        assert!(json.get("iconRef").is_none());
    }
}
