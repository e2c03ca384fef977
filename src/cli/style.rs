//! Terminal styling helpers for CLI output

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Extension trait for consistent CLI colors
///
/// Every style degrades to plain text when stdout is not a terminal.
pub trait Stylize: Display + Sized {
    /// De-emphasized detail text
    fn muted(&self) -> String {
        self.if_supports_color(Stream::Stdout, |text| text.dimmed())
            .to_string()
    }

    /// Highlighted value (branch names, issue keys)
    fn accent(&self) -> String {
        self.if_supports_color(Stream::Stdout, |text| text.cyan())
            .to_string()
    }

    /// Section and heading text
    fn emphasis(&self) -> String {
        self.if_supports_color(Stream::Stdout, |text| text.bold())
            .to_string()
    }

    /// Warning text
    fn warn(&self) -> String {
        self.if_supports_color(Stream::Stdout, |text| text.yellow())
            .to_string()
    }

    /// Success text
    fn success(&self) -> String {
        self.if_supports_color(Stream::Stdout, |text| text.green())
            .to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    "✓".success()
}

/// Spinner template used while the pipeline runs
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
