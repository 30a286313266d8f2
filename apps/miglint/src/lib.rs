//! miglint core library.
//!
//! This crate exposes programmatic APIs for validating Postgres migration
//! `.sql` files with a fixed battery of heuristic rules, and for applying
//! the line-local fixes the rules propose.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution, including
//!   the known-table catalog.
//! - `scan`: Line buffer loading and pure helpers over it.
//! - `rules`: The rule battery; one submodule per rule family.
//! - `fix`: Line replacement and write-back for fixable findings.
//! - `validate`: Target expansion and the per-file pipeline.
//! - `models`: Data models for issues, stats, and per-file results.
//! - `output`: Text/JSON printers.
//! - `error`: File access and config errors.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod error;
pub mod fix;
pub mod models;
pub mod output;
pub mod rules;
pub mod scan;
pub mod utils;
pub mod validate;
