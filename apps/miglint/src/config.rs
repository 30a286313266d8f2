//! Configuration discovery and effective settings resolution.
//!
//! miglint reads `miglint.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an
//! `Effective` config. Defaults:
//! - `format`: `text`
//! - `quiet` / `verbose`: false
//! - `fix.write`: false
//! - `tables.known`: empty (extends the built-in catalog)
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

// Tables created by migrations that predate the files being validated,
// plus the hosted-auth schema. References to these resolve without an
// in-file CREATE TABLE.
pub const DEFAULT_KNOWN_TABLES: &[&str] = &[
    "auth.users",
    "users",
    "user_profiles",
    "companies",
    "company_members",
    "projects",
    "project_members",
    "tasks",
    "task_assignments",
    "task_dependencies",
    "documents",
    "document_versions",
    "milestones",
    "daily_logs",
    "rfis",
    "submittals",
    "change_orders",
    "punch_list_items",
    "inspections",
    "notifications",
    "activity_logs",
];

#[derive(Debug, Default, Deserialize, Clone)]
/// Fix-related configuration section under `[fix]`.
pub struct FixCfg {
    pub write: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Known-table catalog extension under `[tables]`.
pub struct TablesCfg {
    #[serde(default)]
    pub known: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `miglint.toml|yaml`.
pub struct MiglintConfig {
    pub format: Option<String>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    #[serde(default)]
    pub fix: Option<FixCfg>,
    #[serde(default)]
    pub tables: Option<TablesCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub format: String,
    pub quiet: bool,
    pub verbose: bool,
    pub fix: bool,
    pub known_tables: BTreeSet<String>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `miglint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("miglint.toml").exists()
            || cur.join("miglint.yaml").exists()
            || cur.join("miglint.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `MiglintConfig` from `miglint.toml` or `miglint.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<MiglintConfig> {
    let toml_path = root.join("miglint.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: MiglintConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["miglint.yaml", "miglint.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: MiglintConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_format: Option<&str>,
    cli_fix: Option<bool>,
    cli_verbose: Option<bool>,
    cli_quiet: Option<bool>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let format = cli_format
        .map(|s| s.to_string())
        .or(cfg.format)
        .unwrap_or_else(|| "text".to_string());

    let quiet = cli_quiet.or(cfg.quiet).unwrap_or(false);
    let verbose = cli_verbose.or(cfg.verbose).unwrap_or(false);
    let fix = cli_fix
        .or_else(|| cfg.fix.as_ref().and_then(|f| f.write))
        .unwrap_or(false);

    let mut known_tables: BTreeSet<String> = DEFAULT_KNOWN_TABLES
        .iter()
        .map(|t| t.to_string())
        .collect();
    if let Some(tables) = cfg.tables {
        known_tables.extend(tables.known.into_iter().map(|t| t.to_ascii_lowercase()));
    }

    Effective {
        repo_root,
        format,
        quiet,
        verbose,
        fix,
        known_tables,
    }
}
