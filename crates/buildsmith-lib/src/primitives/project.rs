use super::shared::impl_fromstr_for_value_enum;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a project organizes its build configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// One scene list and one profile list for the whole project
    Single,
    /// One code-name variant per build flavor, each with its own scenes and profiles
    Wildcard,
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Single => write!(f, "single"),
            BuildMode::Wildcard => write!(f, "wildcard"),
        }
    }
}

/// Component of a version triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum VersionPart {
    Major,
    Minor,
    Patch,
}

impl_fromstr_for_value_enum!(BuildMode, "invalid build mode");
impl_fromstr_for_value_enum!(VersionPart, "invalid version part");

/// Platform family a build target belongs to.
///
/// The family decides the artifact shape: desktop standalone players are
/// written as a directory, everything else as a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFamily {
    DesktopWindows,
    DesktopMac,
    DesktopLinux,
    MobileAndroid,
    Other,
}

impl TargetFamily {
    /// File extension appended to the artifact name (empty when none)
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFamily::DesktopWindows => ".exe",
            TargetFamily::DesktopMac => ".app",
            TargetFamily::MobileAndroid => ".apk",
            TargetFamily::DesktopLinux => "",
            TargetFamily::Other => "",
        }
    }

    /// Whether the build step writes a directory rather than a single file
    pub fn produces_directory(&self) -> bool {
        matches!(
            self,
            TargetFamily::DesktopWindows | TargetFamily::DesktopMac | TargetFamily::DesktopLinux
        )
    }
}

/// Build target identifier carried by a profile.
///
/// Unknown identifiers are kept verbatim so a config written by a newer
/// tool still round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildTarget {
    StandaloneWindows,
    StandaloneWindows64,
    StandaloneOsx,
    StandaloneLinux64,
    Android,
    Ios,
    WebGl,
    Other(String),
}

impl BuildTarget {
    /// Standalone target for the machine running buildsmith
    pub fn host() -> Self {
        if cfg!(target_os = "windows") {
            BuildTarget::StandaloneWindows64
        } else if cfg!(target_os = "macos") {
            BuildTarget::StandaloneOsx
        } else {
            BuildTarget::StandaloneLinux64
        }
    }

    pub fn family(&self) -> TargetFamily {
        match self {
            BuildTarget::StandaloneWindows | BuildTarget::StandaloneWindows64 => {
                TargetFamily::DesktopWindows
            }
            BuildTarget::StandaloneOsx => TargetFamily::DesktopMac,
            BuildTarget::StandaloneLinux64 => TargetFamily::DesktopLinux,
            BuildTarget::Android => TargetFamily::MobileAndroid,
            BuildTarget::Ios | BuildTarget::WebGl | BuildTarget::Other(_) => TargetFamily::Other,
        }
    }

    /// Define-symbol group the target compiles under
    pub fn group(&self) -> &str {
        match self {
            BuildTarget::StandaloneWindows
            | BuildTarget::StandaloneWindows64
            | BuildTarget::StandaloneOsx
            | BuildTarget::StandaloneLinux64 => "standalone",
            BuildTarget::Android => "android",
            BuildTarget::Ios => "ios",
            BuildTarget::WebGl => "webgl",
            BuildTarget::Other(id) => id,
        }
    }

    pub fn extension(&self) -> &'static str {
        self.family().extension()
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildTarget::StandaloneWindows => write!(f, "standalone-windows"),
            BuildTarget::StandaloneWindows64 => write!(f, "standalone-windows64"),
            BuildTarget::StandaloneOsx => write!(f, "standalone-osx"),
            BuildTarget::StandaloneLinux64 => write!(f, "standalone-linux64"),
            BuildTarget::Android => write!(f, "android"),
            BuildTarget::Ios => write!(f, "ios"),
            BuildTarget::WebGl => write!(f, "webgl"),
            BuildTarget::Other(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for BuildTarget {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "standalone-windows" | "windows" | "win32" => BuildTarget::StandaloneWindows,
            "standalone-windows64" | "windows64" | "win64" => BuildTarget::StandaloneWindows64,
            "standalone-osx" | "osx" | "macos" | "mac" => BuildTarget::StandaloneOsx,
            "standalone-linux64" | "linux64" | "linux" => BuildTarget::StandaloneLinux64,
            "android" => BuildTarget::Android,
            "ios" => BuildTarget::Ios,
            "webgl" => BuildTarget::WebGl,
            _ => BuildTarget::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for BuildTarget {
    fn from(s: String) -> Self {
        BuildTarget::from(s.as_str())
    }
}

impl From<BuildTarget> for String {
    fn from(target: BuildTarget) -> Self {
        target.to_string()
    }
}

impl FromStr for BuildTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BuildTarget::from(s))
    }
}

/// Setup wizard steps, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    /// Choose single or wildcard mode
    Mode,
    /// Name the project and its code names
    Names,
    /// Pick the build output root
    Folder,
    /// Assign scenes
    Scenes,
    /// Review or seed build profiles
    Profiles,
    /// Configuration written
    Complete,
}

impl WizardStep {
    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Mode => Some(WizardStep::Names),
            WizardStep::Names => Some(WizardStep::Folder),
            WizardStep::Folder => Some(WizardStep::Scenes),
            WizardStep::Scenes => Some(WizardStep::Profiles),
            WizardStep::Profiles => Some(WizardStep::Complete),
            WizardStep::Complete => None,
        }
    }

    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Mode => None,
            WizardStep::Names => Some(WizardStep::Mode),
            WizardStep::Folder => Some(WizardStep::Names),
            WizardStep::Scenes => Some(WizardStep::Folder),
            WizardStep::Profiles => Some(WizardStep::Scenes),
            WizardStep::Complete => Some(WizardStep::Profiles),
        }
    }

    /// 1-based position for "[n/5]" style progress output
    pub fn ordinal(&self) -> usize {
        match self {
            WizardStep::Mode => 1,
            WizardStep::Names => 2,
            WizardStep::Folder => 3,
            WizardStep::Scenes => 4,
            WizardStep::Profiles => 5,
            WizardStep::Complete => 6,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardStep::Mode => write!(f, "mode"),
            WizardStep::Names => write!(f, "names"),
            WizardStep::Folder => write!(f, "folder"),
            WizardStep::Scenes => write!(f, "scenes"),
            WizardStep::Profiles => write!(f, "profiles"),
            WizardStep::Complete => write!(f, "complete"),
        }
    }
}
