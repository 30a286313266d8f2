//! Applies line-local fixes collected during validation.
//!
//! Fixes replace whole lines and never add or remove them. When two
//! fixable issues land on the same line, the first in battery order wins
//! for this pass; a rerun converges on the remainder.

use crate::error::MiglintError;
use crate::models::Issue;
use crate::scan::SourceFile;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Produce the fixed file content, or `None` when no issue carries a fix.
/// Replacements are applied in descending line order; since fixes are
/// line-for-line this cannot shift indices, but the order is kept anyway.
pub fn apply_fixes(file: &SourceFile, issues: &[Issue]) -> Option<String> {
    let mut fixes: BTreeMap<usize, &str> = BTreeMap::new();
    for issue in issues {
        if let Some(fix) = issue.fix.as_deref() {
            fixes.entry(issue.line).or_insert(fix);
        }
    }
    if fixes.is_empty() {
        return None;
    }
    let mut lines = file.lines.clone();
    for (line_no, fix) in fixes.iter().rev() {
        if let Some(slot) = lines.get_mut(line_no - 1) {
            *slot = (*fix).to_string();
        }
    }
    let mut out = lines.join("\n");
    if file.trailing_newline {
        out.push('\n');
    }
    Some(out)
}

/// Overwrite the original file with the fixed content. No backup is taken;
/// write failures are surfaced per file.
pub fn write_fixed(path: &Path, content: &str) -> Result<(), MiglintError> {
    fs::write(path, content).map_err(|e| MiglintError::Write {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}
