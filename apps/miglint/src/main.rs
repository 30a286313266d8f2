//! miglint CLI binary entry point.
//! Delegates to modules for validation and printing, then selects the exit
//! code: 0 clean, 1 for error findings or file failures, 2 when the
//! invocation yields nothing to validate.

mod cli;
mod config;
mod error;
mod fix;
mod models;
mod output;
mod rules;
mod scan;
mod utils;
mod validate;

use clap::Parser;
use cli::{Cli, Commands};
use output::OutputOptions;

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Validate {
            paths,
            fix,
            verbose,
            quiet,
            format,
            repo_root,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                format.as_deref(),
                if fix { Some(true) } else { None },
                if verbose { Some(true) } else { None },
                if quiet { Some(true) } else { None },
            );
            // Friendly note if no miglint config was found
            if config::load_config(&eff.repo_root).is_none() && eff.format != "json" {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No miglint.toml found; using the built-in table catalog."
                );
            }
            let (results, errors) = validate::run_validate(&paths, &eff);
            if results.is_empty() && errors.is_empty() {
                eprintln!(
                    "{} {}",
                    utils::error_prefix(),
                    "No .sql files matched the given paths."
                );
                std::process::exit(2);
            }
            output::print_results(
                &results,
                &errors,
                &OutputOptions {
                    format: eff.format.clone(),
                    verbose: eff.verbose,
                    quiet: eff.quiet,
                    repo_root: eff.repo_root.clone(),
                },
            );
            let failed = results.iter().any(|r| r.stats.errors > 0) || !errors.is_empty();
            if failed {
                std::process::exit(1);
            }
        }
    }
}
