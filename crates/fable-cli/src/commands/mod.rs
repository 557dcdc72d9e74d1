pub mod check;
pub mod export;
pub mod info;
pub mod list;
pub mod play;

use std::path::Path;

use colored::Colorize;
use fable_builder::{Severity, ValidationReport};
use fable_story::Story;

/// Read and parse a story file without the loader's schema gate, so the
/// validator can report every problem instead of stopping at the first.
fn read_story(path: &Path) -> Result<Story, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&json).map_err(|e| format!("invalid story JSON: {e}"))
}

/// Print a validation report to stderr with a severity summary.
fn print_report(report: &ValidationReport) {
    for diag in report.iter() {
        let line = diag.to_string();
        match diag.severity {
            Severity::Error => eprintln!("{}", line.red()),
            Severity::Warning => eprintln!("{}", line.yellow()),
        }
    }

    let errors = report.errors.len();
    let warnings = report.warnings.len();
    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    } else if warnings > 0 {
        eprintln!(
            "  {} warning{}",
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    }
}
