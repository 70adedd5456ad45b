//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark used in summaries
pub const CHECK: &str = "✓";

/// Semantic styles for terminal output
pub trait Stylize {
    /// Bold text for headings and names
    fn emphasis(&self) -> String;
    /// Dimmed text for secondary information
    fn muted(&self) -> String;
    /// Cyan text for values
    fn accent(&self) -> String;
    /// Green text for successful outcomes
    fn success(&self) -> String;
    /// Yellow text for skipped or degraded outcomes
    fn caution(&self) -> String;
}

impl<T: Display> Stylize for T {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn caution(&self) -> String {
        self.yellow().to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Dimmed arrow for list items
pub fn arrow() -> String {
    "→".muted()
}

/// Style for spinners
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
