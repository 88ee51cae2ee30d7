//! Build variant domain: configuration model, setup wizard, artifact naming
//! and build orchestration

pub mod artifacts;
pub mod builds;
pub mod model;
pub mod profile;
pub mod store;
pub mod switching;
pub mod versions;
pub mod wizard;

pub use artifacts::{ArtifactError, ArtifactPath, artifact_base, resolve_artifact_path};
pub use builds::{
    BuildError, BuildExecutor, BuildObserver, BuildOptions, BuildOrchestrator, BuildPlan,
    BuildReport, BuildRequest,
};
pub use model::{
    BuildScope, CodeNameVariant, ProjectConfig, ProjectError, SceneRef, code_name_problem,
    derive_define_symbol, resolve_define_symbol,
};
pub use profile::{
    BuildProfile, default_development_profile, default_production_profile, default_profiles,
};
pub use store::{ConfigStore, StoreError};
pub use versions::{VersionError, VersionTriple, increment};
pub use wizard::{ValidationError, VariantDraft, Wizard, WizardError};
