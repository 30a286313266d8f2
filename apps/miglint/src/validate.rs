//! Validation runner: target expansion and the per-file pipeline.
//!
//! Files are independent, so they are processed with `rayon` and collected
//! in input order; output is deterministic because target order is. A file
//! that cannot be read (or written back under `--fix`) becomes a
//! `FileError` and the batch keeps going.

use crate::config::Effective;
use crate::fix;
use crate::models::{FileError, ValidationResult};
use crate::rules;
use crate::scan::SourceFile;
use glob::glob;
use rayon::prelude::*;
use std::path::PathBuf;

/// Expand CLI paths into the validation target list. Directories expand to
/// their immediate `*.sql` files (no recursion), sorted; missing paths are
/// recorded as errors.
pub fn collect_targets(paths: &[String], errors: &mut Vec<FileError>) -> Vec<PathBuf> {
    let mut targets = Vec::new();
    for p in paths {
        let path = PathBuf::from(p);
        if path.is_dir() {
            let pattern = path.join("*.sql").to_string_lossy().to_string();
            let mut found: Vec<PathBuf> = glob(&pattern)
                .expect("bad glob pattern")
                .flatten()
                .filter(|p| p.is_file())
                .collect();
            found.sort();
            targets.extend(found);
        } else if path.is_file() {
            targets.push(path);
        } else {
            errors.push(FileError {
                path: p.clone(),
                message: "no such file or directory".to_string(),
            });
        }
    }
    targets
}

/// Validate every target: scan, run the rule battery, optionally rewrite
/// fixable lines in place. Returns per-file results plus the files that
/// failed to read or write.
pub fn run_validate(paths: &[String], eff: &Effective) -> (Vec<ValidationResult>, Vec<FileError>) {
    let mut errors = Vec::new();
    let targets = collect_targets(paths, &mut errors);

    let per_file: Vec<(Option<ValidationResult>, Option<FileError>)> = targets
        .par_iter()
        .map(|path| {
            let file = match SourceFile::load(path) {
                Ok(f) => f,
                Err(e) => {
                    return (
                        None,
                        Some(FileError {
                            path: path.to_string_lossy().to_string(),
                            message: e.to_string(),
                        }),
                    )
                }
            };
            let issues = rules::run_rules(&file, &eff.known_tables);
            let mut write_err = None;
            if eff.fix {
                if let Some(fixed) = fix::apply_fixes(&file, &issues) {
                    if let Err(e) = fix::write_fixed(path, &fixed) {
                        write_err = Some(FileError {
                            path: path.to_string_lossy().to_string(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            (
                Some(ValidationResult::new(
                    path.to_string_lossy().to_string(),
                    issues,
                )),
                write_err,
            )
        })
        .collect();

    let mut results = Vec::new();
    for (res, err) in per_file {
        if let Some(r) = res {
            results.push(r);
        }
        if let Some(e) = err {
            errors.push(e);
        }
    }
    (results, errors)
}
