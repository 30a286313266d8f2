//! Line scanner: loads a migration file into an ordered line buffer.
//!
//! All rules consume this buffer; nothing re-reads the file. The helpers
//! here are pure functions of the line array:
//! - `created_tables`: names defined by `CREATE TABLE` in this file.
//! - `create_table_rows`: per-line flags marking `CREATE TABLE ( ... );`
//!   blocks, computed in a single forward pass.

use crate::error::MiglintError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

static CREATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bCREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?:"?(\w+)"?\.)?"?(\w+)"?"#)
        .unwrap()
});

/// A migration file split into lines. The buffer keeps no terminators;
/// `trailing_newline` remembers whether the source ended with one so the
/// fixer can reproduce it byte-for-byte.
pub struct SourceFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
    pub trailing_newline: bool,
}

impl SourceFile {
    /// Split `content` into the line buffer for `path`.
    pub fn parse(path: &Path, content: &str) -> SourceFile {
        SourceFile {
            path: path.to_path_buf(),
            lines: content.lines().map(str::to_string).collect(),
            trailing_newline: content.ends_with('\n'),
        }
    }

    /// Read and split a file. Failures surface as a per-file error so the
    /// caller can keep validating sibling files.
    pub fn load(path: &Path) -> Result<SourceFile, MiglintError> {
        let content = fs::read_to_string(path).map_err(|e| MiglintError::Read {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(SourceFile::parse(path, &content))
    }
}

/// Lowercased table names defined via `CREATE TABLE` anywhere in the file.
/// Schema-qualified definitions contribute both `name` and `schema.name`.
pub fn created_tables(lines: &[String]) -> HashSet<String> {
    let mut out = HashSet::new();
    for line in lines {
        for cap in CREATE_TABLE_RE.captures_iter(line) {
            let name = cap[2].to_lowercase();
            if let Some(schema) = cap.get(1) {
                out.insert(format!("{}.{}", schema.as_str().to_lowercase(), name));
            }
            out.insert(name);
        }
    }
    out
}

/// Flag each line that sits inside a `CREATE TABLE ( ... );` block,
/// including the opening and closing lines. One forward pass; a block
/// opened and closed on the same line flags only that line.
pub fn create_table_rows(lines: &[String]) -> Vec<bool> {
    let mut flags = vec![false; lines.len()];
    let mut open = false;
    for (i, line) in lines.iter().enumerate() {
        if open {
            flags[i] = true;
            if line.contains(");") {
                open = false;
            }
            continue;
        }
        if CREATE_TABLE_RE.is_match(line) {
            flags[i] = true;
            if !line.contains(");") {
                open = true;
            }
        }
    }
    flags
}

/// True for lines that are entirely a SQL comment.
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with("--")
}
