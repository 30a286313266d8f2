//! Row-level-security policy overlap.
//!
//! Postgres evaluates every permissive policy matching a (table, role,
//! action) on each row access, so several overlapping policies multiply
//! per-query work. This rule groups `CREATE POLICY` statements by that
//! tuple and flags combinations covered more than once; the remedy is one
//! consolidated policy with OR'd conditions.

use crate::models::{Issue, RuleKind, Severity};
use crate::scan::is_comment;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static CREATE_POLICY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bCREATE\s+POLICY\s+(?:"([^"]+)"|(\w+))\s+ON\s+(?:"?(\w+)"?\.)?"?(\w+)"?"#)
        .unwrap()
});
static POLICY_FOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bFOR\s+(SELECT|INSERT|UPDATE|DELETE|ALL)\b").unwrap());
static POLICY_TO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bTO\s+([A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)*)").unwrap());

struct PolicyDef {
    name: String,
    line: usize,
    column: usize,
    context: String,
}

/// Warn when more than one policy in the file covers the same
/// (table, action, role) combination. The statement is read line-locally:
/// `FOR`/`TO` clauses on later lines fall back to ALL/public.
pub fn policy_overlap(lines: &[String]) -> Vec<Issue> {
    let mut groups: BTreeMap<(String, String, String), Vec<PolicyDef>> = BTreeMap::new();
    for (i, line) in lines.iter().enumerate() {
        if is_comment(line) {
            continue;
        }
        let Some(cap) = CREATE_POLICY_RE.captures(line) else {
            continue;
        };
        let name = cap
            .get(1)
            .or_else(|| cap.get(2))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let table = match cap.get(3) {
            Some(schema) => format!(
                "{}.{}",
                schema.as_str().to_ascii_lowercase(),
                cap[4].to_ascii_lowercase()
            ),
            None => cap[4].to_ascii_lowercase(),
        };
        let action = POLICY_FOR_RE
            .captures(line)
            .map(|c| c[1].to_ascii_uppercase())
            .unwrap_or_else(|| "ALL".to_string());
        let roles: Vec<String> = match POLICY_TO_RE.captures(line) {
            Some(c) => c[1]
                .split(',')
                .map(|r| r.trim().to_ascii_lowercase())
                .collect(),
            None => vec!["public".to_string()],
        };
        for role in roles {
            groups
                .entry((table.clone(), action.clone(), role))
                .or_default()
                .push(PolicyDef {
                    name: name.clone(),
                    line: i + 1,
                    column: cap.get(0).unwrap().start(),
                    context: line.clone(),
                });
        }
    }

    let mut issues = Vec::new();
    for ((table, action, role), defs) in &groups {
        if defs.len() < 2 {
            continue;
        }
        let names = defs
            .iter()
            .map(|d| format!("`{}`", d.name))
            .collect::<Vec<_>>()
            .join(", ");
        let second = &defs[1];
        issues.push(Issue::new(
            RuleKind::PolicyOverlap,
            Severity::Warning,
            format!(
                "{} policies ({}) cover table `{}` for role `{}` action {}; consolidate into one policy with OR'd conditions",
                defs.len(),
                names,
                table,
                role,
                action
            ),
            second.line,
            second.column,
            &second.context,
        ));
    }
    issues.sort_by_key(|i| (i.line, i.column));
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<String> {
        src.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_overlapping_policies_warn() {
        let ls = lines(
            "CREATE POLICY \"Members can view\" ON projects FOR SELECT TO authenticated USING (true);\n\
             CREATE POLICY \"Owners can view\" ON projects FOR SELECT TO authenticated USING (owner_id = auth.uid());",
        );
        let issues = policy_overlap(&ls);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].line, 2);
        assert!(issues[0].message.contains("`Members can view`"));
        assert!(issues[0].message.contains("role `authenticated`"));
    }

    #[test]
    fn test_distinct_actions_do_not_overlap() {
        let ls = lines(
            "CREATE POLICY p1 ON projects FOR SELECT TO authenticated USING (true);\n\
             CREATE POLICY p2 ON projects FOR INSERT TO authenticated WITH CHECK (true);",
        );
        assert!(policy_overlap(&ls).is_empty());
    }

    #[test]
    fn test_distinct_tables_do_not_overlap() {
        let ls = lines(
            "CREATE POLICY p1 ON projects FOR SELECT TO authenticated USING (true);\n\
             CREATE POLICY p1 ON tasks FOR SELECT TO authenticated USING (true);",
        );
        assert!(policy_overlap(&ls).is_empty());
    }

    #[test]
    fn test_role_list_is_split() {
        let ls = lines(
            "CREATE POLICY p1 ON tasks TO authenticated, anon USING (true);\n\
             CREATE POLICY p2 ON tasks TO anon USING (true);",
        );
        let issues = policy_overlap(&ls);
        // Only the anon combination overlaps; both policies default to ALL.
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("role `anon`"));
    }

    #[test]
    fn test_missing_clauses_default_to_all_public() {
        let ls = lines(
            "CREATE POLICY p1 ON daily_logs USING (true);\nCREATE POLICY p2 ON daily_logs USING (false);",
        );
        let issues = policy_overlap(&ls);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("role `public`"));
        assert!(issues[0].message.contains("action ALL"));
    }
}
