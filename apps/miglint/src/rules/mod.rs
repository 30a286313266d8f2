//! Rule battery for migration SQL.
//!
//! Every rule is an independent line/regex heuristic over the shared line
//! buffer; none parses SQL. Rules never fail — they emit zero or more
//! issues and the runner concatenates them in a fixed order, so output
//! ordering is battery order, then line/match order within a rule.

pub mod columns;
pub mod commas;
pub mod generated;
pub mod naming;
pub mod policies;
pub mod tables;

use crate::models::Issue;
use crate::scan::{self, SourceFile};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Per-file inputs shared by rules: tables created in this file, the
/// known-table catalog, and the per-line `CREATE TABLE` block flags.
pub struct RuleContext<'a> {
    pub defined: HashSet<String>,
    pub known: &'a BTreeSet<String>,
    pub in_table: Vec<bool>,
}

/// Run the full battery against one file.
pub fn run_rules(file: &SourceFile, known: &BTreeSet<String>) -> Vec<Issue> {
    let ctx = RuleContext {
        defined: scan::created_tables(&file.lines),
        known,
        in_table: scan::create_table_rows(&file.lines),
    };
    let lines = &file.lines;
    let mut issues = Vec::new();
    issues.extend(generated::generated_column_syntax(lines));
    issues.extend(tables::foreign_key_reference(lines, &ctx));
    issues.extend(generated::subquery_in_generated_column(lines));
    issues.extend(generated::missing_stored_keyword(lines));
    issues.extend(commas::comma_placement(lines, &ctx));
    issues.extend(tables::table_reference(lines, &ctx));
    issues.extend(columns::column_definition(lines, &ctx));
    issues.extend(naming::index_creation(lines));
    issues.extend(naming::constraint_naming(lines));
    issues.extend(policies::policy_overlap(lines));
    issues
}

static COLUMN_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*"?([A-Za-z_]\w*)"?\s+[A-Za-z]"#).unwrap());

const NON_COLUMN_KEYWORDS: &[&str] = &[
    "primary", "foreign", "unique", "check", "constraint", "exclude", "like", "references",
    "create", "alter", "drop", "insert", "update", "delete", "select", "grant", "revoke",
    "comment", "on", "values", "partition",
];

/// Heuristic: does this line look like a column definition (`name type ...`)
/// inside a `CREATE TABLE` body? Table-level constraint keywords do not.
pub(crate) fn column_def_shape(line: &str) -> bool {
    match COLUMN_SHAPE_RE.captures(line) {
        Some(cap) => !NON_COLUMN_KEYWORDS.contains(&cap[1].to_ascii_lowercase().as_str()),
        None => false,
    }
}

pub(crate) fn contains_ci(line: &str, needle: &str) -> bool {
    line.to_ascii_lowercase().contains(needle)
}

static CREATE_KW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bCREATE\b").unwrap());
static CONSTRAINT_KW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bCONSTRAINT\b").unwrap());

// Substring checks would also hit column names like `created_at`; these
// match the bare keyword only.
pub(crate) fn has_create_kw(line: &str) -> bool {
    CREATE_KW_RE.is_match(line)
}

pub(crate) fn has_constraint_kw(line: &str) -> bool {
    CONSTRAINT_KW_RE.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RuleKind, Severity};
    use std::path::Path;

    #[test]
    fn test_battery_order_is_stable() {
        // One file tripping a generated-column error, an index warning, and
        // a constraint warning: issues must come out in battery order even
        // though the index line precedes the generated column.
        let sql = "\
CREATE INDEX orders_idx ON orders (id);
CREATE TABLE orders (
  id UUID PRIMARY KEY,
  total NUMERIC,
  doubled NUMERIC GENERATED ALWAYS AS (total * 2),
  CONSTRAINT orders_total CHECK (total >= 0)
);
";
        let file = SourceFile::parse(Path::new("m.sql"), sql);
        let issues = run_rules(&file, &BTreeSet::new());
        let kinds: Vec<RuleKind> = issues.iter().map(|i| i.kind).collect();
        let stored = kinds
            .iter()
            .position(|k| *k == RuleKind::MissingStoredKeyword)
            .unwrap();
        let index = kinds
            .iter()
            .position(|k| *k == RuleKind::IndexCreation)
            .unwrap();
        let constraint = kinds
            .iter()
            .position(|k| *k == RuleKind::ConstraintNaming)
            .unwrap();
        assert!(stored < index);
        assert!(index < constraint);
    }

    #[test]
    fn test_clean_file_has_no_issues() {
        let sql = "\
CREATE TABLE projects (
  id UUID PRIMARY KEY,
  name TEXT,
  status PROJECT_STATUS
);

CREATE INDEX idx_projects_status ON projects (status);
";
        let file = SourceFile::parse(Path::new("m.sql"), sql);
        let issues = run_rules(&file, &BTreeSet::new());
        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
    }

    #[test]
    fn test_issues_are_collected_never_fatal() {
        // A thoroughly broken file still yields a full issue list.
        let sql = "\
CREATE TABLE broken (
  amount MONEYBAG,
  total NUMERIC GENERATED ALWAYS AS ((SELECT sum(x) FROM other),
  owner_id UUID
);
ALTER TABLE broken ADD CONSTRAINT broken_fk FOREIGN KEY (owner_id) REFERENCES nowhere(id);
";
        let file = SourceFile::parse(Path::new("m.sql"), sql);
        let issues = run_rules(&file, &BTreeSet::new());
        assert!(issues.iter().any(|i| i.severity == Severity::Error));
        assert!(issues.len() >= 4);
    }

    #[test]
    fn test_column_def_shape() {
        assert!(column_def_shape("  email TEXT NOT NULL"));
        assert!(column_def_shape("  \"order\" INTEGER"));
        assert!(!column_def_shape("  PRIMARY KEY (id)"));
        assert!(!column_def_shape("  CONSTRAINT fk_x FOREIGN KEY (a) REFERENCES b(id)"));
        assert!(!column_def_shape(");"));
    }
}
