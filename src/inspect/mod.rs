//! Checkpoint inspection.
//!
//! Builds a tensor inventory and a metadata map from a loaded checkpoint
//! graph.
//!
//! # Checkpoint shapes
//!
//! - **Training checkpoint**: root mapping with a `state_dict` entry plus
//!   auxiliary fields (epoch, loss, optimizer state)
//! - **Parameter map**: root mapping of (possibly nested) tensors
//! - **Single tensor**: the root itself is a tensor
//! - **Opaque object**: anything else, reported by type and rendering
//!
//! # Example
//!
//! ```
//! use ckpt_inspector::graph::{Node, TensorMeta};
//! use ckpt_inspector::inspect::{analyze_graph, InspectOptions};
//!
//! let root = Node::mapping([
//!     ("state_dict", Node::mapping([("fc.weight", TensorMeta::new("F32", vec![10, 4]).into())])),
//!     ("epoch", Node::from(50_i64)),
//! ]);
//! let report = analyze_graph(&root, 0, "pytorch_pickle", &InspectOptions::default()).unwrap();
//! assert_eq!(report.total_parameters, 40);
//! ```

mod extract;
mod metadata;
mod report;
mod summary;
mod walk;

pub use extract::{extract_descriptor, TensorDescriptor, DEFAULT_ELEMENT_SIZE};
pub use metadata::{MetadataMap, MetadataValue};
pub use report::{AnalysisReport, CheckpointReport, FailureReport};
pub use summary::{group_prefix, CheckpointSummary, GroupStats, LARGE_FILE_THRESHOLD, ROOT_GROUP};
pub use walk::{walk, walk_checkpoint, Walked, BARE_TENSOR_NAME, STATE_DICT_KEY};

use crate::error::Result;
use crate::graph::Node;
use crate::loader::{probe_file_size, LoaderRegistry};
use std::path::Path;

/// Default nesting limit for checkpoint graphs
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default character limit for opaque-root renderings
pub const DEFAULT_CONTENT_LIMIT: usize = 1000;

/// Options for checkpoint inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectOptions {
    /// Deepest mapping nesting accepted before aborting
    pub max_depth: usize,
    /// Characters kept from an opaque root's rendering
    pub content_limit: usize,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            content_limit: DEFAULT_CONTENT_LIMIT,
        }
    }
}

impl InspectOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nesting limit
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the rendering limit for opaque roots
    #[must_use]
    pub fn with_content_limit(mut self, content_limit: usize) -> Self {
        self.content_limit = content_limit;
        self
    }
}

/// Analyze an already-loaded checkpoint graph.
///
/// # Errors
/// Returns an error if the graph nests deeper than `options.max_depth`.
pub fn analyze_graph(
    root: &Node,
    file_size: u64,
    format_type: &str,
    options: &InspectOptions,
) -> Result<CheckpointReport> {
    let walked = walk_checkpoint(root, options)?;
    Ok(CheckpointReport::new(walked, file_size, format_type))
}

/// Analyzer bound to a set of decoder capabilities
#[derive(Debug)]
pub struct Analyzer {
    loaders: LoaderRegistry,
    options: InspectOptions,
}

impl Analyzer {
    /// Create an analyzer over the given loaders
    #[must_use]
    pub fn new(loaders: LoaderRegistry) -> Self {
        Self {
            loaders,
            options: InspectOptions::default(),
        }
    }

    /// Replace the inspection options
    #[must_use]
    pub fn with_options(mut self, options: InspectOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options
    #[must_use]
    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    /// Registered loaders
    #[must_use]
    pub fn loaders(&self) -> &LoaderRegistry {
        &self.loaders
    }

    /// Analyze a checkpoint file, folding fatal errors into the report.
    ///
    /// Never fails: decoder and traversal errors become a
    /// [`FailureReport`] carrying a freshly probed file size.
    pub fn analyze_path(&self, path: &Path) -> AnalysisReport {
        match self.try_analyze_path(path) {
            Ok(report) => AnalysisReport::Success(report),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "analysis failed");
                AnalysisReport::Failure(FailureReport::from_error(&err, probe_file_size(path)))
            }
        }
    }

    /// Analyze a checkpoint file.
    ///
    /// # Errors
    /// Returns an error if no loader handles the file, the file cannot be
    /// read or decoded, or the graph is too deep.
    pub fn try_analyze_path(&self, path: &Path) -> Result<CheckpointReport> {
        let loader = self.loaders.resolve(path)?;
        let file_size = std::fs::metadata(path)?.len();
        tracing::debug!(
            path = %path.display(),
            loader = loader.name(),
            file_size,
            "decoding checkpoint"
        );

        let root = loader.load(path)?;
        let report = analyze_graph(&root, file_size, loader.format_type(), &self.options)?;
        tracing::debug!(
            tensors = report.total_tensors,
            parameters = report.total_parameters,
            errors = report.error_tensor_count(),
            "checkpoint analyzed"
        );
        Ok(report)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(LoaderRegistry::with_defaults())
    }
}

#[cfg(test)]
#[path = "tests_inspect_options.rs"]
mod tests;
