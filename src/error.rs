//! Error types for provepack
//!
//! Uses `thiserror` for library errors; the binary wraps them with `anyhow`.
//! Every variant is terminal for the current run - nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for provepack operations
pub type ProvepackResult<T> = Result<T, ProvepackError>;

/// Main error type for provepack operations
#[derive(Error, Debug)]
pub enum ProvepackError {
    /// A referenced path does not resolve to an existing filesystem entry
    #[error("file or directory does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Build step stdout is malformed or missing a required field
    #[error("invalid build output: {message}")]
    BuildOutputInvalid { message: String },

    /// Build step reported failure; `payload` is its own diagnostic, verbatim
    #[error("build step failed: {payload}")]
    BuildFailed { payload: String },

    /// Incompatible or unknown argument for the selected mode
    #[error("{message}")]
    ArgumentRejected { message: String },

    /// I/O failure while staging or zipping the archive
    #[error("failed to write archive {path}: {message}")]
    ArchiveWriteFailed { path: PathBuf, message: String },

    /// Conf file could not be parsed
    #[error("invalid conf file {file}: {message}")]
    ConfInvalid { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProvepackError {
    /// Rejection for arguments the front end knows but does not accept
    pub fn unrecognized_arguments(args: &str) -> Self {
        Self::ArgumentRejected {
            message: format!("unrecognized arguments: {args}"),
        }
    }
}
