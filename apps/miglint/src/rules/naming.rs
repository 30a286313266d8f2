//! Naming conventions for indexes and constraints.

use crate::models::{Issue, RuleKind, Severity};
use crate::scan::is_comment;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static CREATE_INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\bCREATE\s+(?:UNIQUE\s+)?INDEX\s+(?:CONCURRENTLY\s+)?(?:IF\s+NOT\s+EXISTS\s+)?"?(\w+)"?\s+ON\s+(?:"?(\w+)"?\.)?"?(\w+)"?\s*(?:USING\s+\w+\s*)?\(([^)]*)\)"#,
    )
    .unwrap()
});

static CONSTRAINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bCONSTRAINT\s+"?(\w+)"?"#).unwrap());

const CONSTRAINT_PREFIXES: &[&str] = &["pk_", "fk_", "uk_", "ck_", "chk_"];

// Postgres truncates identifiers past this length, which silently renames
// the constraint and breaks later ALTERs that use the full name.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Warn when an index name lacks the `idx_` prefix (fix renames it) and
/// when the same `(table, columns)` tuple is indexed twice in the file.
pub fn index_creation(lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut seen: HashMap<(String, String), usize> = HashMap::new();
    for (i, line) in lines.iter().enumerate() {
        if is_comment(line) {
            continue;
        }
        for cap in CREATE_INDEX_RE.captures_iter(line) {
            let name_match = cap.get(1).unwrap();
            let name = name_match.as_str();
            if !name.to_ascii_lowercase().starts_with("idx_") {
                let fixed = format!(
                    "{}idx_{}{}",
                    &line[..name_match.start()],
                    name,
                    &line[name_match.end()..]
                );
                issues.push(
                    Issue::new(
                        RuleKind::IndexCreation,
                        Severity::Warning,
                        format!("index `{}` should be named `idx_{}`", name, name),
                        i + 1,
                        name_match.start(),
                        line,
                    )
                    .with_fix(fixed),
                );
            }
            let table = match cap.get(2) {
                Some(schema) => format!(
                    "{}.{}",
                    schema.as_str().to_ascii_lowercase(),
                    cap[3].to_ascii_lowercase()
                ),
                None => cap[3].to_ascii_lowercase(),
            };
            let columns = cap[4]
                .split(',')
                .map(|c| c.trim().to_ascii_lowercase())
                .collect::<Vec<_>>()
                .join(",");
            let key = (table, columns);
            match seen.get(&key).copied() {
                Some(first_line) => issues.push(Issue::new(
                    RuleKind::IndexCreation,
                    Severity::Warning,
                    format!(
                        "duplicate index on `{}` ({}); first defined on line {}",
                        key.0, &cap[4], first_line
                    ),
                    i + 1,
                    cap.get(0).unwrap().start(),
                    line,
                )),
                None => {
                    seen.insert(key, i + 1);
                }
            }
        }
    }
    issues
}

/// Warn on constraint names without a recognized prefix; error on names
/// past the Postgres identifier limit. Both can fire for one constraint.
pub fn constraint_naming(lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if is_comment(line) {
            continue;
        }
        for cap in CONSTRAINT_RE.captures_iter(line) {
            let name_match = cap.get(1).unwrap();
            let name = name_match.as_str();
            let lower = name.to_ascii_lowercase();
            if !CONSTRAINT_PREFIXES.iter().any(|p| lower.starts_with(p)) {
                issues.push(Issue::new(
                    RuleKind::ConstraintNaming,
                    Severity::Warning,
                    format!(
                        "constraint `{}` should start with one of: {}",
                        name,
                        CONSTRAINT_PREFIXES.join(", ")
                    ),
                    i + 1,
                    name_match.start(),
                    line,
                ));
            }
            if name.len() > MAX_IDENTIFIER_LEN {
                issues.push(Issue::new(
                    RuleKind::ConstraintNaming,
                    Severity::Error,
                    format!(
                        "constraint name `{}` is {} characters; Postgres truncates identifiers at {}",
                        name,
                        name.len(),
                        MAX_IDENTIFIER_LEN
                    ),
                    i + 1,
                    name_match.start(),
                    line,
                ));
            }
        }
    }
    issues
}
