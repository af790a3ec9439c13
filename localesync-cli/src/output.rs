//! Output formatting for the CLI.
//!
//! Handles human-readable and JSON output formats.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::json;

use crate::OutputFormat;

/// Output handler for CLI commands.
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print a success message (green in human format).
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            match self.format {
                OutputFormat::Human => println!("\x1b[32m{}\x1b[0m", msg),
                OutputFormat::Json => println!("{}", json!({"type": "success", "message": msg})),
            }
        }
    }

    pub fn info(&self, msg: &str) {
        if !self.quiet {
            match self.format {
                OutputFormat::Human => println!("{}", msg),
                OutputFormat::Json => println!("{}", json!({"type": "info", "message": msg})),
            }
        }
    }

    /// Print a warning message (yellow in human format).
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            match self.format {
                OutputFormat::Human => eprintln!("\x1b[33m{}\x1b[0m", msg),
                OutputFormat::Json => eprintln!("{}", json!({"type": "warning", "message": msg})),
            }
        }
    }

    /// Print an error message (red in human format, always shown).
    pub fn error(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("\x1b[31merror: {}\x1b[0m", msg),
            OutputFormat::Json => eprintln!("{}", json!({"type": "error", "message": msg})),
        }
    }

    /// Print a whole result document; only used in JSON mode.
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{s}"),
            Err(e) => self.error(&format!("failed to serialize output: {e}")),
        }
    }

    /// A progress bar over `len` files, hidden for JSON and quiet output.
    pub fn file_progress(&self, len: u64) -> ProgressBar {
        if self.quiet || self.is_json() {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        ProgressBar::new(len).with_style(style)
    }
}
