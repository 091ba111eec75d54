//! Output formatting for validation results.

use serde::Serialize;
use sui_ptb_builder::sui_ptb_core::{Diagnostic, ValidationResult};

#[derive(Debug, Serialize)]
pub struct ValidationReport<'a> {
    pub valid: bool,
    pub commands: usize,
    pub errors: &'a [String],
    pub warnings: &'a [String],
    pub diagnostics: &'a [Diagnostic],
}

impl<'a> ValidationReport<'a> {
    pub fn new(result: &'a ValidationResult, commands: usize) -> Self {
        Self {
            valid: result.is_valid(),
            commands,
            errors: &result.errors,
            warnings: &result.warnings,
            diagnostics: &result.diagnostics,
        }
    }
}

/// Human-readable validation summary.
pub fn format_validation(result: &ValidationResult, commands: usize) -> String {
    let mut out = String::new();

    if result.is_valid() {
        out.push_str(&format!(
            "\x1b[32m✓ Block is valid\x1b[0m ({} commands)\n",
            commands
        ));
    } else {
        out.push_str(&format!(
            "\x1b[31m✗ Block has {} error(s)\x1b[0m ({} commands)\n",
            result.errors.len(),
            commands
        ));
    }

    if !result.errors.is_empty() {
        out.push_str("\n\x1b[1mErrors:\x1b[0m\n");
        for error in &result.errors {
            out.push_str(&format!("  \x1b[31m{}\x1b[0m\n", error));
        }
    }

    if !result.warnings.is_empty() {
        out.push_str("\n\x1b[1mWarnings:\x1b[0m\n");
        for warning in &result.warnings {
            out.push_str(&format!("  \x1b[33m{}\x1b[0m\n", warning));
        }
    }

    out
}
