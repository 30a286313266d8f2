//! Error type for file access.
//!
//! Rule findings are never errors; they are collected as issues. This type
//! only covers a file that cannot be read or written back, reported per
//! file without aborting the batch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MiglintError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
