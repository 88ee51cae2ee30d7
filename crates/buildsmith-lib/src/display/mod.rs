//! Terminal display system
//!
//! Separates user-facing communication (status lines, spinners) from
//! logging (tracing). Command handlers only see the provider traits.

pub mod live;
pub mod mock;
pub mod providers;
pub mod styling;

pub use live::LiveDisplayProvider;
pub use mock::{DisplayCall, MockDisplayProvider};
pub use providers::{DisplayProvider, ProgressTracker, StatusProvider};
