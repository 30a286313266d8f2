//! Output rendering for validation results.
//!
//! Supports `text` (default) and `json` outputs. The JSON form is the raw
//! array of per-file results; file read/write errors go to stderr in both
//! modes. `--quiet` hides warnings and infos in text output; errors are
//! always shown. `--verbose` adds fix previews.

use crate::models::{FileError, Severity, ValidationResult};
use crate::utils;
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;
use std::path::{Path, PathBuf};

/// Rendering options resolved from CLI and config.
pub struct OutputOptions {
    pub format: String,
    pub verbose: bool,
    pub quiet: bool,
    pub repo_root: PathBuf,
}

fn use_colors(format: &str) -> bool {
    format != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print results in the requested format; file errors always go to stderr.
pub fn print_results(results: &[ValidationResult], file_errors: &[FileError], opts: &OutputOptions) {
    match opts.format.as_str() {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_json(results)).unwrap()
        ),
        _ => print_text(results, opts),
    }
    for err in file_errors {
        eprintln!("{} {}: {}", utils::error_prefix(), err.path, err.message);
    }
}

fn print_text(results: &[ValidationResult], opts: &OutputOptions) {
    let color = use_colors(&opts.format);
    for res in results {
        let visible: Vec<_> = res
            .issues
            .iter()
            .filter(|is| is.severity == Severity::Error || !opts.quiet)
            .collect();
        if visible.is_empty() {
            continue;
        }
        let file = utils::display_path(Path::new(&res.file_path), &opts.repo_root);
        if color {
            println!("{}", file.bold());
        } else {
            println!("{}", file);
        }
        for is in visible {
            let (icon, tag) = severity_markers(is.severity, color);
            println!(
                "  {} {} {}:{} {} ❲{}❳",
                icon, tag, is.line, is.column, is.message, is.kind
            );
            if color {
                println!("      {}", is.context.bright_black());
            } else {
                println!("      {}", is.context);
            }
            if opts.verbose {
                if let Some(fix) = &is.fix {
                    if color {
                        println!("      {} {}", "fix:".green().bold(), fix);
                    } else {
                        println!("      fix: {}", fix);
                    }
                }
            }
        }
    }
    let (issues, errors, warnings) = totals(results);
    let summary = format!(
        "— Summary — files={} issues={} errors={} warnings={}",
        results.len(),
        issues,
        errors,
        warnings
    );
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

fn severity_markers(severity: Severity, color: bool) -> (String, String) {
    match severity {
        Severity::Error => {
            if color {
                ("✖".red().to_string(), "⟦error⟧".red().bold().to_string())
            } else {
                ("✖".to_string(), "⟦error⟧".to_string())
            }
        }
        Severity::Warning => {
            if color {
                ("▲".yellow().to_string(), "⟦warn⟧".yellow().bold().to_string())
            } else {
                ("▲".to_string(), "⟦warn⟧".to_string())
            }
        }
        Severity::Info => {
            if color {
                ("◆".blue().to_string(), "⟦info⟧".blue().bold().to_string())
            } else {
                ("◆".to_string(), "⟦info⟧".to_string())
            }
        }
    }
}

fn totals(results: &[ValidationResult]) -> (usize, usize, usize) {
    let issues = results.iter().map(|r| r.issues.len()).sum();
    let errors = results.iter().map(|r| r.stats.errors).sum();
    let warnings = results.iter().map(|r| r.stats.warnings).sum();
    (issues, errors, warnings)
}

/// Compose the JSON document (pure) for testing/snapshot purposes.
pub fn compose_json(results: &[ValidationResult]) -> JsonVal {
    // Directly serialize the result array, keeping stable shape
    serde_json::to_value(results).unwrap()
}
