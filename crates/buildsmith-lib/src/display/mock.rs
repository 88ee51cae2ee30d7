//! Mock display provider implementation for testing
//!
//! Records every display call for assertion in unit tests.

use super::providers::*;
use std::sync::{Arc, Mutex};

/// Mock implementation of DisplayProvider that records all calls
#[derive(Clone, Default)]
pub struct MockDisplayProvider {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl MockDisplayProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded display calls for testing assertions
    pub fn get_calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a specific call was made
    pub fn has_call(&self, expected: &DisplayCall) -> bool {
        self.get_calls().contains(expected)
    }

    /// True when any recorded call's text contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.get_calls().iter().any(|call| call.text().contains(needle))
    }

    fn record(&self, call: DisplayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl DisplayProvider for MockDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider + '_> {
        Box::new(self.clone())
    }

    fn spinner(&self, message: &str) -> Box<dyn ProgressTracker + '_> {
        self.record(DisplayCall::ProgressSpinner {
            message: message.to_string(),
        });
        Box::new(self.clone())
    }
}

impl StatusProvider for MockDisplayProvider {
    fn success(&self, item: &str, details: &str) {
        self.record(DisplayCall::StatusSuccess {
            item: item.to_string(),
            details: details.to_string(),
        });
    }

    fn error(&self, item: &str, details: &str) {
        self.record(DisplayCall::StatusError {
            item: item.to_string(),
            details: details.to_string(),
        });
    }

    fn warning(&self, message: &str) {
        self.record(DisplayCall::StatusWarning {
            message: message.to_string(),
        });
    }

    fn info(&self, message: &str) {
        self.record(DisplayCall::StatusInfo {
            message: message.to_string(),
        });
    }

    fn message(&self, text: &str) {
        self.record(DisplayCall::StatusMessage {
            text: text.to_string(),
        });
    }

    fn subtle(&self, text: &str) {
        self.record(DisplayCall::StatusSubtle {
            text: text.to_string(),
        });
    }

    fn list(&self, items: &[&str]) {
        self.record(DisplayCall::StatusList {
            items: items.iter().map(|s| s.to_string()).collect(),
        });
    }

    fn section(&self, title: &str) {
        self.record(DisplayCall::StatusSection {
            title: title.to_string(),
        });
    }

    fn step(&self, current: usize, total: usize, description: &str) {
        self.record(DisplayCall::StatusStep {
            current,
            total,
            description: description.to_string(),
        });
    }
}

impl ProgressTracker for MockDisplayProvider {
    fn finish(&self, message: &str) {
        self.record(DisplayCall::ProgressFinish {
            message: message.to_string(),
        });
    }

    fn abandon(&self, message: &str) {
        self.record(DisplayCall::ProgressAbandon {
            message: message.to_string(),
        });
    }
}

/// Recorded display call for testing
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    StatusSuccess { item: String, details: String },
    StatusError { item: String, details: String },
    StatusWarning { message: String },
    StatusInfo { message: String },
    StatusMessage { text: String },
    StatusSubtle { text: String },
    StatusList { items: Vec<String> },
    StatusSection { title: String },
    StatusStep {
        current: usize,
        total: usize,
        description: String,
    },
    ProgressSpinner { message: String },
    ProgressFinish { message: String },
    ProgressAbandon { message: String },
}

impl DisplayCall {
    /// All user-visible text carried by the call
    pub fn text(&self) -> String {
        match self {
            DisplayCall::StatusSuccess { item, details }
            | DisplayCall::StatusError { item, details } => format!("{}: {}", item, details),
            DisplayCall::StatusWarning { message }
            | DisplayCall::StatusInfo { message }
            | DisplayCall::ProgressSpinner { message }
            | DisplayCall::ProgressFinish { message }
            | DisplayCall::ProgressAbandon { message } => message.clone(),
            DisplayCall::StatusMessage { text } | DisplayCall::StatusSubtle { text } => {
                text.clone()
            }
            DisplayCall::StatusList { items } => items.join("\n"),
            DisplayCall::StatusSection { title } => title.clone(),
            DisplayCall::StatusStep { description, .. } => description.clone(),
        }
    }
}
