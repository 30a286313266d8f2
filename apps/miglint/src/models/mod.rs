//! Shared data models for validation output.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
/// Severity of an issue. Only `Error` affects the process exit code.
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
/// Identifier of the rule that produced an issue. Serialized kebab-case,
/// matching the ids shown in text output.
pub enum RuleKind {
    GeneratedColumnSyntax,
    ForeignKeyReference,
    SubqueryInGeneratedColumn,
    MissingStoredKeyword,
    CommaPlacement,
    TableReference,
    ColumnDefinition,
    IndexCreation,
    ConstraintNaming,
    PolicyOverlap,
}

impl RuleKind {
    /// Stable kebab-case id used by both printers.
    pub fn id(&self) -> &'static str {
        match self {
            RuleKind::GeneratedColumnSyntax => "generated-column-syntax",
            RuleKind::ForeignKeyReference => "foreign-key-reference",
            RuleKind::SubqueryInGeneratedColumn => "subquery-in-generated-column",
            RuleKind::MissingStoredKeyword => "missing-stored-keyword",
            RuleKind::CommaPlacement => "comma-placement",
            RuleKind::TableReference => "table-reference",
            RuleKind::ColumnDefinition => "column-definition",
            RuleKind::IndexCreation => "index-creation",
            RuleKind::ConstraintNaming => "constraint-naming",
            RuleKind::PolicyOverlap => "policy-overlap",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Serialize)]
/// A single finding with location, severity, and optional line-local fix.
///
/// `line` is 1-based; `column` is a 0-based byte offset within that line.
/// `fix` holds the full replacement line and is present iff `fixable`.
pub struct Issue {
    pub kind: RuleKind,
    pub severity: Severity,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub context: String,
    pub fixable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

impl Issue {
    /// Build a non-fixable issue for `line_no` (1-based) at `column`.
    pub fn new(
        kind: RuleKind,
        severity: Severity,
        message: impl Into<String>,
        line_no: usize,
        column: usize,
        context: &str,
    ) -> Self {
        Issue {
            kind,
            severity,
            message: message.into(),
            line: line_no,
            column,
            context: context.trim().to_string(),
            fixable: false,
            fix: None,
        }
    }

    /// Attach a replacement line, marking the issue fixable.
    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self.fixable = true;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
/// Issue counts by severity, derived from the issue list.
pub struct Stats {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
/// Validation outcome for one file. Issues keep battery order, then
/// line/match order within a rule. `stats` is always the tally of `issues`.
pub struct ValidationResult {
    pub file_path: String,
    pub issues: Vec<Issue>,
    pub stats: Stats,
}

impl ValidationResult {
    pub fn new(file_path: impl Into<String>, issues: Vec<Issue>) -> Self {
        let mut stats = Stats::default();
        for is in &issues {
            match is.severity {
                Severity::Error => stats.errors += 1,
                Severity::Warning => stats.warnings += 1,
                Severity::Info => stats.infos += 1,
            }
        }
        ValidationResult {
            file_path: file_path.into(),
            issues,
            stats,
        }
    }
}

#[derive(Debug, Clone)]
/// A file that could not be read or written back; reported per file and
/// counted toward the failure exit code without aborting the batch.
pub struct FileError {
    pub path: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_derived_from_issues() {
        let issues = vec![
            Issue::new(
                RuleKind::ConstraintNaming,
                Severity::Error,
                "too long",
                3,
                2,
                "  CONSTRAINT x",
            ),
            Issue::new(
                RuleKind::IndexCreation,
                Severity::Warning,
                "prefix",
                5,
                0,
                "CREATE INDEX y ...",
            ),
            Issue::new(
                RuleKind::ColumnDefinition,
                Severity::Info,
                "no key",
                7,
                2,
                "  owner_id UUID",
            ),
        ];
        let res = ValidationResult::new("m.sql", issues);
        assert_eq!(res.stats.errors, 1);
        assert_eq!(res.stats.warnings, 1);
        assert_eq!(res.stats.infos, 1);
    }

    #[test]
    fn test_fixable_carries_fix_text() {
        let is = Issue::new(
            RuleKind::CommaPlacement,
            Severity::Error,
            "trailing comma",
            1,
            11,
            "  email TEXT,)",
        )
        .with_fix("  email TEXT)");
        assert!(is.fixable);
        assert_eq!(is.fix.as_deref(), Some("  email TEXT)"));
    }

    #[test]
    fn test_serialized_ids_are_kebab_case() {
        let v = serde_json::to_value(RuleKind::MissingStoredKeyword).unwrap();
        assert_eq!(v, "missing-stored-keyword");
        let s = serde_json::to_value(Severity::Warning).unwrap();
        assert_eq!(s, "warning");
    }
}
