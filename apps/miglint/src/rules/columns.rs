//! Column-definition checks inside `CREATE TABLE` bodies.

use crate::models::{Issue, RuleKind, Severity};
use crate::rules::{column_def_shape, contains_ci, has_create_kw, RuleContext};
use crate::scan::is_comment;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static COLUMN_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)^\s*"?([A-Za-z_]\w*)"?\s+([A-Za-z]\w*(?:\s+(?:PRECISION|VARYING))?(?:\s+WITH(?:OUT)?\s+TIME\s+ZONE)?)"#,
    )
    .unwrap()
});

// Primitive Postgres types plus the application's domain enums. A type
// outside this set is usually a typo (MONEYBAG for NUMERIC and the like).
const ALLOWED_TYPES: &[&str] = &[
    "TEXT",
    "VARCHAR",
    "CHAR",
    "CHARACTER",
    "CHARACTER VARYING",
    "SMALLINT",
    "INT",
    "INT2",
    "INT4",
    "INT8",
    "INTEGER",
    "BIGINT",
    "SMALLSERIAL",
    "SERIAL",
    "BIGSERIAL",
    "NUMERIC",
    "DECIMAL",
    "REAL",
    "DOUBLE PRECISION",
    "FLOAT4",
    "FLOAT8",
    "BOOLEAN",
    "BOOL",
    "DATE",
    "TIME",
    "TIMETZ",
    "TIMESTAMP",
    "TIMESTAMPTZ",
    "TIMESTAMP WITH TIME ZONE",
    "TIMESTAMP WITHOUT TIME ZONE",
    "UUID",
    "JSON",
    "JSONB",
    "BYTEA",
    "INTERVAL",
    "INET",
    "CIDR",
    "MACADDR",
    "TSVECTOR",
    "TSQUERY",
    // application domain types
    "USER_ROLE",
    "PROJECT_STATUS",
    "TASK_STATUS",
    "TASK_PRIORITY",
    "DOCUMENT_CATEGORY",
    "NOTIFICATION_TYPE",
    "APPROVAL_STATUS",
];

static ALLOWED: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALLOWED_TYPES.iter().copied().collect());

fn normalize_type(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// Warn on declared types outside the allow-list; info on `*_id` columns
/// declared without `PRIMARY KEY` or `REFERENCES`.
pub fn column_definition(lines: &[String], ctx: &RuleContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if !ctx.in_table[i]
            || is_comment(line)
            || has_create_kw(line)
            || line.trim_start().starts_with(')')
            || !column_def_shape(line)
        {
            continue;
        }
        let Some(cap) = COLUMN_TYPE_RE.captures(line) else {
            continue;
        };
        let name = cap[1].to_ascii_lowercase();
        let declared = normalize_type(&cap[2]);
        if !ALLOWED.contains(declared.as_str()) {
            issues.push(Issue::new(
                RuleKind::ColumnDefinition,
                Severity::Warning,
                format!("column `{}` uses unrecognized type `{}`", name, declared),
                i + 1,
                cap.get(2).unwrap().start(),
                line,
            ));
        }
        if name.ends_with("_id")
            && !contains_ci(line, "primary key")
            && !contains_ci(line, "references")
        {
            issues.push(Issue::new(
                RuleKind::ColumnDefinition,
                Severity::Info,
                format!(
                    "column `{}` looks like a key but has no PRIMARY KEY or REFERENCES constraint",
                    name
                ),
                i + 1,
                cap.get(1).unwrap().start(),
                line,
            ));
        }
    }
    issues
}
