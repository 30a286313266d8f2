//! Supporting helpers: stderr prefixes and path display.

use owo_colors::OwoColorize;
use std::path::Path;

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if colors_enabled() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if colors_enabled() {
        "note:".bright_black().bold().to_string()
    } else {
        "note:".to_string()
    }
}

/// Render `path` relative to `root` when possible; keeps output short and
/// stable across machines.
pub fn display_path(path: &Path, root: &Path) -> String {
    match pathdiff::diff_paths(path, root) {
        Some(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().to_string(),
        _ => path.to_string_lossy().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_display_path_relativizes_under_root() {
        let root = PathBuf::from("/repo");
        let p = PathBuf::from("/repo/migrations/001.sql");
        assert_eq!(display_path(&p, &root), "migrations/001.sql");
    }

    #[test]
    fn test_display_path_keeps_unrelated_paths() {
        let root = PathBuf::from("/repo");
        let p = PathBuf::from("other/002.sql");
        assert_eq!(display_path(&p, &root), "other/002.sql");
    }
}
