//! Shared result printing.

use colored::Colorize;
use landmark_mesh::{MeshWarning, WarningSeverity};
use serde::Serialize;

use crate::OutputFormat;

/// JSON form of a [`MeshWarning`].
#[derive(Serialize)]
pub struct WarningInfo {
    pub code: &'static str,
    pub severity: String,
    pub message: String,
}

impl From<&MeshWarning> for WarningInfo {
    fn from(w: &MeshWarning) -> Self {
        Self {
            code: w.code(),
            severity: format!("{:?}", w.severity()).to_lowercase(),
            message: w.to_string(),
        }
    }
}

/// Print `value` as pretty JSON.
///
/// Commands print their own text output; this covers `--format json`.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to serialize output: {}", e),
        },
        OutputFormat::Text => {}
    }
}

/// Text listing of `warnings` under a `Warnings:` heading.
pub fn print_warnings(warnings: &[MeshWarning]) {
    println!("\n{} ({})", "Warnings:".bold(), warnings.len());
    for warning in warnings {
        let icon = match warning.severity() {
            WarningSeverity::Warning => "⚠".yellow(),
            WarningSeverity::Info => "ℹ".blue(),
        };
        println!("  {} [{}] {}", icon, warning.code(), warning);
    }
}
