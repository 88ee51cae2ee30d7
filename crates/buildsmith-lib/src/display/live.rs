//! Live display provider implementation
//!
//! Writes status lines to stdout and drives indicatif spinners that share
//! the tracing-indicatif multi-progress with log output.

use super::providers::*;
use super::styling::StyleManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Live implementation of DisplayProvider
pub struct LiveDisplayProvider {
    styling: StyleManager,
}

impl LiveDisplayProvider {
    pub fn new(color: bool) -> Self {
        Self {
            styling: StyleManager::new(color),
        }
    }
}

impl DisplayProvider for LiveDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider + '_> {
        Box::new(LiveStatusProvider {
            styling: &self.styling,
        })
    }

    fn spinner(&self, message: &str) -> Box<dyn ProgressTracker + '_> {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Box::new(LiveProgressTracker {
            bar,
            styling: &self.styling,
        })
    }
}

struct LiveStatusProvider<'a> {
    styling: &'a StyleManager,
}

impl StatusProvider for LiveStatusProvider<'_> {
    fn success(&self, item: &str, details: &str) {
        println!("{}", self.styling.format_success(&join_details(item, details)));
    }

    fn error(&self, item: &str, details: &str) {
        println!("{}", self.styling.format_error(&join_details(item, details)));
    }

    fn warning(&self, message: &str) {
        println!("{}", self.styling.format_warning(message));
    }

    fn info(&self, message: &str) {
        println!("{}", self.styling.format_info(message));
    }

    fn message(&self, text: &str) {
        println!("{}", text);
    }

    fn subtle(&self, text: &str) {
        println!("{}", self.styling.style_subtle(text));
    }

    fn list(&self, items: &[&str]) {
        for item in items {
            println!("  {} {}", self.styling.bullet(), item);
        }
    }

    fn section(&self, title: &str) {
        println!();
        println!("{}", self.styling.style_emphasis(title));
    }

    fn step(&self, current: usize, total: usize, description: &str) {
        let prefix = format!("[{}/{}]", current, total);
        println!("{} {}", self.styling.style_subtle(&prefix), description);
    }
}

struct LiveProgressTracker<'a> {
    bar: ProgressBar,
    styling: &'a StyleManager,
}

impl ProgressTracker for LiveProgressTracker<'_> {
    fn finish(&self, message: &str) {
        self.bar
            .finish_with_message(self.styling.format_success(message));
    }

    fn abandon(&self, message: &str) {
        self.bar
            .abandon_with_message(self.styling.format_error(message));
    }
}

fn join_details(item: &str, details: &str) -> String {
    if details.is_empty() {
        item.to_string()
    } else {
        format!("{}: {}", item, details)
    }
}
