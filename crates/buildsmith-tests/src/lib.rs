pub mod fixtures;
pub mod test_env;

// Re-export key testing utilities
pub use fixtures::{single_project, wildcard_project};
pub use test_env::{HermeticSession, HermeticSessionBuilder, MockBehavior, TestEnvironment};
