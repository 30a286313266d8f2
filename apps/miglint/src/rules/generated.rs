//! Rules for `GENERATED ALWAYS AS (...) STORED` columns.
//!
//! Expressions are taken line-locally: from the opening paren after `AS` to
//! its matching close on the same line. An expression spanning lines shows
//! up as unbalanced parentheses, which is the documented heuristic.

use crate::models::{Issue, RuleKind, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

static GENERATED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bGENERATED\s+ALWAYS\s+AS\s*\(").unwrap());
static SELECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSELECT\b").unwrap());
static STORED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSTORED\b").unwrap());

/// Slice between the paren at `open` and its matching close, or `None`
/// when the line ends before the parens rebalance.
fn expression_body(line: &str, open: usize) -> Option<&str> {
    let mut depth = 0usize;
    for (i, ch) in line[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&line[open + 1..open + i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Locate the generated-column clause on a line, returning the match start
/// and the index of the expression's opening paren.
fn generated_clause(line: &str) -> Option<(usize, usize)> {
    GENERATED_RE.find(line).map(|m| (m.start(), m.end() - 1))
}

/// Error on a generated column whose expression contains a `SELECT`
/// keyword or never closes its parentheses on the line.
pub fn generated_column_syntax(lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let Some((start, open)) = generated_clause(line) else {
            continue;
        };
        match expression_body(line, open) {
            None => issues.push(Issue::new(
                RuleKind::GeneratedColumnSyntax,
                Severity::Error,
                "unbalanced parentheses in generated column expression",
                i + 1,
                start,
                line,
            )),
            Some(expr) if SELECT_RE.is_match(expr) => issues.push(Issue::new(
                RuleKind::GeneratedColumnSyntax,
                Severity::Error,
                "generated column expression contains a SELECT keyword",
                i + 1,
                start,
                line,
            )),
            Some(_) => {}
        }
    }
    issues
}

/// Error on any `SELECT` inside a generated-column expression, nested
/// function calls included. Fires alongside `generated_column_syntax`.
pub fn subquery_in_generated_column(lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let Some((start, open)) = generated_clause(line) else {
            continue;
        };
        // Fall back to the rest of the line when the parens never close.
        let expr = expression_body(line, open).unwrap_or(&line[open + 1..]);
        if SELECT_RE.is_match(expr) {
            issues.push(Issue::new(
                RuleKind::SubqueryInGeneratedColumn,
                Severity::Error,
                "subqueries are not allowed in generated columns; compute the value in a trigger instead",
                i + 1,
                start,
                line,
            ));
        }
    }
    issues
}

/// Insert ` STORED` ahead of the trailing comma or semicolon.
fn append_stored(line: &str) -> String {
    let trimmed = line.trim_end();
    if let Some(rest) = trimmed.strip_suffix(',') {
        format!("{} STORED,", rest)
    } else if let Some(rest) = trimmed.strip_suffix(';') {
        format!("{} STORED;", rest)
    } else {
        format!("{} STORED", trimmed)
    }
}

/// Error (fixable) when a generated-column line lacks the `STORED` keyword;
/// Postgres only supports stored generated columns.
pub fn missing_stored_keyword(lines: &[String]) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let Some((start, _)) = generated_clause(line) else {
            continue;
        };
        if STORED_RE.is_match(line) {
            continue;
        }
        issues.push(
            Issue::new(
                RuleKind::MissingStoredKeyword,
                Severity::Error,
                "generated column is missing the STORED keyword",
                i + 1,
                start,
                line,
            )
            .with_fix(append_stored(line)),
        );
    }
    issues
}
