//! Comma placement inside `CREATE TABLE` bodies.
//!
//! Two checks: a comma sitting directly before a closing paren (error,
//! fixable by removal), and a heuristic for a missing comma between two
//! consecutive column-definition lines (warning, fixable by appending).

use crate::models::{Issue, RuleKind, Severity};
use crate::rules::{column_def_shape, has_constraint_kw, has_create_kw, RuleContext};
use crate::scan::is_comment;
use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*\)").unwrap());

pub fn comma_placement(lines: &[String], ctx: &RuleContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if is_comment(line) {
            continue;
        }
        for m in TRAILING_COMMA_RE.find_iter(line) {
            issues.push(
                Issue::new(
                    RuleKind::CommaPlacement,
                    Severity::Error,
                    "trailing comma before closing parenthesis",
                    i + 1,
                    m.start(),
                    line,
                )
                .with_fix(TRAILING_COMMA_RE.replace_all(line, ")").to_string()),
            );
        }
        if let Some(issue) = missing_comma(lines, ctx, i) {
            issues.push(issue);
        }
    }
    issues
}

/// Possible missing comma: a column-definition line that does not end in a
/// comma, immediately followed by another column-definition line in the
/// same `CREATE TABLE` body. Lines with `CREATE`/`CONSTRAINT`, comments,
/// and the last column before `);` are skipped.
fn missing_comma(lines: &[String], ctx: &RuleContext, i: usize) -> Option<Issue> {
    if !ctx.in_table[i] {
        return None;
    }
    let line = &lines[i];
    if has_create_kw(line) || has_constraint_kw(line) || line.contains(");") {
        return None;
    }
    let trimmed = line.trim_end();
    if trimmed.trim().is_empty()
        || trimmed.ends_with(',')
        || trimmed.ends_with('(')
        || !column_def_shape(line)
    {
        return None;
    }
    let next = lines.get(i + 1)?;
    if !*ctx.in_table.get(i + 1)? {
        return None;
    }
    if next.trim_start().starts_with(')')
        || is_comment(next)
        || has_constraint_kw(next)
        || has_create_kw(next)
        || !column_def_shape(next)
    {
        return None;
    }
    Some(
        Issue::new(
            RuleKind::CommaPlacement,
            Severity::Warning,
            "possible missing comma after column definition",
            i + 1,
            trimmed.len(),
            line,
        )
        .with_fix(format!("{},", trimmed)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan;
    use std::collections::{BTreeSet, HashSet};

    fn ctx_for<'a>(lines: &[String], known: &'a BTreeSet<String>) -> RuleContext<'a> {
        RuleContext {
            defined: HashSet::new(),
            known,
            in_table: scan::create_table_rows(lines),
        }
    }

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_trailing_comma_removed() {
        let ls = lines("CREATE TABLE t (\n  email TEXT,)");
        let known = BTreeSet::new();
        let ctx = ctx_for(&ls, &known);
        let issues = comma_placement(&ls, &ctx);
        let trailing: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .collect();
        assert_eq!(trailing.len(), 1);
        assert_eq!(trailing[0].line, 2);
        assert_eq!(trailing[0].fix.as_deref(), Some("  email TEXT)"));
    }

    #[test]
    fn test_missing_comma_between_columns() {
        let ls = lines("CREATE TABLE t (\n  id UUID PRIMARY KEY\n  email TEXT,\n  name TEXT\n);");
        let known = BTreeSet::new();
        let ctx = ctx_for(&ls, &known);
        let issues = comma_placement(&ls, &ctx);
        let warns: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect();
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].line, 2);
        assert_eq!(warns[0].fix.as_deref(), Some("  id UUID PRIMARY KEY,"));
    }

    #[test]
    fn test_last_column_before_close_is_skipped() {
        let ls = lines("CREATE TABLE t (\n  id UUID PRIMARY KEY,\n  name TEXT\n);");
        let known = BTreeSet::new();
        let ctx = ctx_for(&ls, &known);
        assert!(comma_placement(&ls, &ctx).is_empty());
    }

    #[test]
    fn test_constraint_and_comment_lines_skipped() {
        let ls = lines(
            "CREATE TABLE t (\n  id UUID\n  -- the owner\n  CONSTRAINT pk_t PRIMARY KEY (id)\n);",
        );
        let known = BTreeSet::new();
        let ctx = ctx_for(&ls, &known);
        let warns: Vec<_> = comma_placement(&ls, &ctx)
            .into_iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect();
        assert!(warns.is_empty());
    }

    #[test]
    fn test_outside_create_table_ignored() {
        let ls = lines("SELECT a\nFROM t;");
        let known = BTreeSet::new();
        let ctx = ctx_for(&ls, &known);
        assert!(comma_placement(&ls, &ctx).is_empty());
    }
}
