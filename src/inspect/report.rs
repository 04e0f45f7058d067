//! Analysis reports.
//!
//! Field names and order are the JSON wire contract consumed by callers.

use super::extract::TensorDescriptor;
use super::metadata::MetadataMap;
use super::walk::Walked;
use crate::error::InspectError;
use serde::Serialize;

/// Outcome of analyzing one checkpoint file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisReport {
    /// The checkpoint was decoded and walked
    Success(CheckpointReport),
    /// Analysis aborted
    Failure(FailureReport),
}

impl AnalysisReport {
    /// Whether analysis completed
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Borrow the successful report
    #[must_use]
    pub fn as_success(&self) -> Option<&CheckpointReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::Failure(_) => None,
        }
    }

    /// Borrow the failure report
    #[must_use]
    pub fn as_failure(&self) -> Option<&FailureReport> {
        match self {
            Self::Success(_) => None,
            Self::Failure(report) => Some(report),
        }
    }

    /// Size of the analyzed file in bytes
    #[must_use]
    pub fn file_size(&self) -> u64 {
        match self {
            Self::Success(report) => report.file_size,
            Self::Failure(report) => report.file_size,
        }
    }

    /// Render as indented JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Tensor inventory and metadata of a decoded checkpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointReport {
    /// Tensor descriptors in traversal order
    pub tensors: Vec<TensorDescriptor>,
    /// Non-tensor metadata
    pub metadata: MetadataMap,
    /// File size in bytes
    pub file_size: u64,
    /// Number of tensor descriptors, error entries included
    pub total_tensors: usize,
    /// Sum of element counts
    pub total_parameters: u64,
    /// Container format identifier
    pub format_type: String,
}

impl CheckpointReport {
    /// Assemble a report from a traversal
    #[must_use]
    pub fn new(walked: Walked, file_size: u64, format_type: impl Into<String>) -> Self {
        let total_parameters = walked
            .tensors
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.element_count));
        Self {
            total_tensors: walked.tensors.len(),
            tensors: walked.tensors,
            metadata: walked.metadata,
            file_size,
            total_parameters,
            format_type: format_type.into(),
        }
    }

    /// Sum of tensor storage sizes
    #[must_use]
    pub fn total_size_bytes(&self) -> u64 {
        self.tensors
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.size_bytes))
    }

    /// Number of tensors that could not be read
    #[must_use]
    pub fn error_tensor_count(&self) -> usize {
        self.tensors.iter().filter(|t| t.is_error()).count()
    }
}

/// Fatal analysis failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    /// Failure description
    pub error: String,
    /// File size in bytes, probed independently of the failure
    pub file_size: u64,
    /// Diagnostic trace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
    /// Remediation hints
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl FailureReport {
    /// Build a failure report from a fatal error
    #[must_use]
    pub fn from_error(err: &InspectError, file_size: u64) -> Self {
        let (error, traceback) = match err {
            InspectError::Decode { .. } | InspectError::UnsupportedEnvironment { .. } => {
                (err.to_string(), None)
            }
            InspectError::DepthExceeded { .. } | InspectError::Io(_) => (
                format!("Error analyzing file: {err}"),
                Some(error_chain(err)),
            ),
        };
        Self {
            error,
            file_size,
            traceback,
            suggestions: err.suggestions().to_vec(),
        }
    }
}

/// Debug rendering of an error followed by its source chain
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut trace = format!("{err:?}");
    let mut source = err.source();
    while let Some(cause) = source {
        trace.push_str("\ncaused by: ");
        trace.push_str(&cause.to_string());
        source = cause.source();
    }
    trace
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
