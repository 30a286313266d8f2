//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "miglint",
    version,
    about = "Validate Postgres migration SQL",
    long_about = "miglint — a tiny, fast CLI to validate Postgres migration .sql files.\n\nRuns a fixed battery of heuristic checks (generated columns, foreign keys,\ncomma placement, naming conventions, RLS policy overlap) and can rewrite\nfixable findings in place.\n\nConfiguration precedence: CLI > miglint.toml > defaults.",
    after_help = "Examples:\n  miglint validate supabase/migrations\n  miglint validate 001_init.sql --format json\n  miglint validate supabase/migrations --fix --verbose",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current miglint version."
    )]
    Version,
    /// Validate migration files
    #[command(
        visible_alias = "validate-migrations",
        about = "Run validation checks",
        long_about = "Validate .sql files with the heuristic rule battery. Error-severity findings and unreadable files drive a non-zero exit.",
        after_help = "Examples:\n  miglint validate supabase/migrations\n  miglint validate supabase/migrations --quiet\n  miglint validate 001_init.sql --fix"
    )]
    Validate {
        #[arg(
            required = true,
            help = "Files or directories; directories expand to their immediate *.sql files"
        )]
        paths: Vec<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Rewrite fixable findings into the source files")]
        fix: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Include fix previews in text output")]
        verbose: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Suppress warnings and infos in text output (errors always shown)")]
        quiet: bool,
        #[arg(long, help = "Output mode: text|json (default: text)")]
        format: Option<String>,
        #[arg(long, help = "Repository root for config discovery (default: current dir)")]
        repo_root: Option<String>,
    },
}
