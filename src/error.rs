//! Error types for checkpoint inspection.
//!
//! Leaf-level failures never show up here: they are captured inside the
//! offending [`TensorDescriptor`](crate::inspect::TensorDescriptor). Every
//! variant of [`InspectError`] is fatal to one analysis call and is turned
//! into a [`FailureReport`](crate::inspect::FailureReport) by the analyzer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for inspection operations
pub type Result<T> = std::result::Result<T, InspectError>;

/// Fatal inspection errors.
///
/// # Examples
///
/// ```
/// use ckpt_inspector::error::InspectError;
///
/// let err = InspectError::Decode {
///     message: "header length exceeds file size".to_string(),
/// };
/// assert!(err.to_string().contains("Failed to load checkpoint"));
/// ```
#[derive(Error, Debug)]
pub enum InspectError {
    /// The decoder could not materialize an object graph from the bytes.
    #[error("Failed to load checkpoint: {message}")]
    Decode {
        /// Decoder message
        message: String,
    },

    /// No decoder capability is available for this file.
    #[error("No decoder available for {format} files ({path})")]
    UnsupportedEnvironment {
        /// Format label derived from the file extension
        format: String,
        /// File that was requested
        path: PathBuf,
        /// Remediation hints
        suggestions: Vec<String>,
    },

    /// The object graph nests deeper than the configured limit.
    #[error("Checkpoint nesting exceeds maximum depth {limit} at '{path}'")]
    DepthExceeded {
        /// Dotted path of the node that crossed the limit
        path: String,
        /// Configured depth limit
        limit: usize,
    },

    /// I/O error while reading the checkpoint
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InspectError {
    /// Build a decode error from any displayable message.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Remediation hints attached to this error, if any.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::UnsupportedEnvironment { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}
