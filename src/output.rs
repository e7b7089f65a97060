//! Run outcome reporting.

use serde::Serialize;

use crate::theme::Theme;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,   // Only errors
    Normal,  // Standard output
    Verbose, // Also print the resulting PATH list
}

impl OutputMode {
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            OutputMode::Quiet
        } else if verbose >= 1 {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

/// Machine-readable outcome report for `--json`.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub outcome: &'static str,
    pub directory: String,
    pub message: String,
}

pub fn print_json(report: &JsonReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize report: {e}"),
    }
}

/// Print the full PATH list, one entry per line. Verbose mode only.
pub fn print_path_list(parts: &[String], mode: OutputMode) {
    if mode != OutputMode::Verbose {
        return;
    }
    println!();
    println!("{}", Theme::header("Machine PATH entries:"));
    for part in parts {
        println!("  {}", Theme::muted(part));
    }
}
