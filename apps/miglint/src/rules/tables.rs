//! Table-name resolution for foreign keys and DML references.
//!
//! A name resolves when it is created by this file or present in the
//! known-table catalog (migrations applied before this one). Resolution is
//! textual; schema-qualified names check both the bare and qualified form.

use crate::models::{Issue, RuleKind, Severity};
use crate::rules::RuleContext;
use crate::scan::is_comment;
use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bREFERENCES\s+(?:"?(\w+)"?\.)?"?(\w+)"?\s*\("#).unwrap()
});

static DML_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:FROM|JOIN|UPDATE|INSERT\s+INTO)\s+(?:"?(\w+)"?\.)?"?(\w+)"?"#).unwrap()
});

static TRIGGER_TIMING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:BEFORE|AFTER|INSTEAD\s+OF)\s+(?:INSERT|UPDATE|DELETE|TRUNCATE)\b|\bCREATE\s+TRIGGER\b|\bEXECUTE\s+(?:FUNCTION|PROCEDURE)\b",
    )
    .unwrap()
});

// Words the loose DML regex can capture that are never table names.
const NOT_A_TABLE: &[&str] = &[
    "select", "set", "cascade", "restrict", "only", "not", "null", "exists", "lateral",
    "unnest", "generate_series", "excluded", "values", "where", "default", "current_timestamp",
    "now", "old", "new",
];

fn resolves(schema: Option<&str>, name: &str, ctx: &RuleContext) -> bool {
    let name = name.to_ascii_lowercase();
    if ctx.defined.contains(&name) || ctx.known.contains(&name) {
        return true;
    }
    if let Some(schema) = schema {
        let qualified = format!("{}.{}", schema.to_ascii_lowercase(), name);
        return ctx.defined.contains(&qualified) || ctx.known.contains(&qualified);
    }
    false
}

/// Error on `REFERENCES table(col)` targets that resolve nowhere; a foreign
/// key to a missing table fails at apply time.
pub fn foreign_key_reference(lines: &[String], ctx: &RuleContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if is_comment(line) {
            continue;
        }
        for cap in REFERENCES_RE.captures_iter(line) {
            let schema = cap.get(1).map(|m| m.as_str());
            let name = &cap[2];
            if resolves(schema, name, ctx) {
                continue;
            }
            issues.push(Issue::new(
                RuleKind::ForeignKeyReference,
                Severity::Error,
                format!(
                    "foreign key references `{}`, which is not created in this file and is not a known table",
                    name
                ),
                i + 1,
                cap.get(0).unwrap().start(),
                line,
            ));
        }
    }
    issues
}

/// Warn on `FROM`/`JOIN`/`UPDATE`/`DELETE FROM`/`INSERT INTO` targets that
/// resolve nowhere. Comments and trigger-timing clauses are skipped;
/// `DELETE FROM` is covered by the `FROM` alternative.
pub fn table_reference(lines: &[String], ctx: &RuleContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if is_comment(line) || TRIGGER_TIMING_RE.is_match(line) {
            continue;
        }
        for cap in DML_REF_RE.captures_iter(line) {
            let schema = cap.get(1).map(|m| m.as_str());
            let name = &cap[2];
            if NOT_A_TABLE.contains(&name.to_ascii_lowercase().as_str()) {
                continue;
            }
            if resolves(schema, name, ctx) {
                continue;
            }
            issues.push(Issue::new(
                RuleKind::TableReference,
                Severity::Warning,
                format!(
                    "table `{}` is referenced but not created in this file and is not a known table",
                    name
                ),
                i + 1,
                cap.get(0).unwrap().start(),
                line,
            ));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan;
    use std::collections::{BTreeSet, HashSet};

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    fn ctx_for<'a>(lines: &[String], known: &'a BTreeSet<String>) -> RuleContext<'a> {
        RuleContext {
            defined: scan::created_tables(lines),
            known,
            in_table: scan::create_table_rows(lines),
        }
    }

    #[test]
    fn test_unknown_references_is_single_error() {
        let ls = lines("ALTER TABLE tasks ADD CONSTRAINT fk_t FOREIGN KEY (p) REFERENCES nonexistent_table(id);");
        let known = BTreeSet::new();
        let ctx = RuleContext {
            defined: HashSet::new(),
            known: &known,
            in_table: vec![false],
        };
        let issues = foreign_key_reference(&ls, &ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("nonexistent_table"));
    }

    #[test]
    fn test_references_resolved_in_file_or_catalog() {
        let src = "CREATE TABLE projects (id UUID PRIMARY KEY);\n\
                   CREATE TABLE tasks (\n  project_id UUID REFERENCES projects(id),\n  owner_id UUID REFERENCES users(id)\n);";
        let ls = lines(src);
        let known: BTreeSet<String> = ["users".to_string()].into_iter().collect();
        let ctx = ctx_for(&ls, &known);
        assert!(foreign_key_reference(&ls, &ctx).is_empty());
    }

    #[test]
    fn test_schema_qualified_reference() {
        let ls = lines("ALTER TABLE t ADD COLUMN u UUID REFERENCES auth.users(id);");
        let known: BTreeSet<String> = ["auth.users".to_string()].into_iter().collect();
        let ctx = ctx_for(&ls, &known);
        assert!(foreign_key_reference(&ls, &ctx).is_empty());
    }

    #[test]
    fn test_dml_reference_warns_once_for_delete_from() {
        let ls = lines("DELETE FROM orphaned_rows WHERE created_at < now();");
        let known = BTreeSet::new();
        let ctx = ctx_for(&ls, &known);
        let issues = table_reference(&ls, &ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_trigger_timing_lines_skipped() {
        let ls = lines(
            "CREATE TRIGGER set_updated_at BEFORE UPDATE ON tasks\nFOR EACH ROW EXECUTE FUNCTION touch_updated_at();",
        );
        let known = BTreeSet::new();
        let ctx = ctx_for(&ls, &known);
        assert!(table_reference(&ls, &ctx).is_empty());
    }

    #[test]
    fn test_on_update_cascade_not_flagged() {
        let ls = lines("  project_id UUID REFERENCES projects(id) ON UPDATE CASCADE,");
        let known: BTreeSet<String> = ["projects".to_string()].into_iter().collect();
        let ctx = ctx_for(&ls, &known);
        assert!(table_reference(&ls, &ctx).is_empty());
    }

    #[test]
    fn test_comment_lines_skipped() {
        let ls = lines("-- seeds FROM legacy_system\nINSERT INTO projects (id) VALUES ('x');");
        let known: BTreeSet<String> = ["projects".to_string()].into_iter().collect();
        let ctx = ctx_for(&ls, &known);
        assert!(table_reference(&ls, &ctx).is_empty());
    }
}
