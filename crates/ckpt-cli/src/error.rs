//! Error types for ckpt-cli
//!
//! Every error is printed to stdout as a one-line JSON document before the
//! process exits, so callers always get parseable output.

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Malformed invocation
    #[error("{0}")]
    Usage(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Report could not be rendered
    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage(_) | Self::FileNotFound(_) => ExitCode::from(1),
            Self::Render(_) => ExitCode::from(2),
        }
    }
}
