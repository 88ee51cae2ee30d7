//! Display provider traits for dependency injection
//!
//! All user-facing output goes through these traits so command handlers can
//! be exercised without a terminal.

/// Provider trait for all user-facing communication
pub trait DisplayProvider {
    /// Display status messages with semantic meaning
    fn status(&self) -> Box<dyn StatusProvider + '_>;

    /// Create a spinner for operations with unknown duration
    fn spinner(&self, message: &str) -> Box<dyn ProgressTracker + '_>;
}

/// Provider trait for status updates and user feedback
pub trait StatusProvider {
    /// Display a success status with optional details
    fn success(&self, item: &str, details: &str);

    /// Display an error status with details
    fn error(&self, item: &str, details: &str);

    /// Display a warning status
    fn warning(&self, message: &str);

    /// Display an info status
    fn info(&self, message: &str);

    /// Display a simple message without status symbols
    fn message(&self, text: &str);

    /// Display a subtle/secondary message
    fn subtle(&self, text: &str);

    /// Display a list of items with bullets
    fn list(&self, items: &[&str]);

    /// Display a header for a section of work
    fn section(&self, title: &str);

    /// Display a step in a multi-step process
    fn step(&self, current: usize, total: usize, description: &str);
}

/// Individual progress tracker interface
pub trait ProgressTracker {
    /// Finish with success message
    fn finish(&self, message: &str);

    /// Abandon with error message
    fn abandon(&self, message: &str);
}
