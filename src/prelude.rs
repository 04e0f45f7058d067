//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use ckpt_inspector::prelude::*;
//! ```

pub use crate::error::{InspectError, Result};
pub use crate::graph::{Node, Primitive, TensorAccessError, TensorLike, TensorMeta};
pub use crate::inspect::{
    analyze_graph, AnalysisReport, Analyzer, CheckpointReport, CheckpointSummary, InspectOptions,
    MetadataValue, TensorDescriptor,
};
pub use crate::loader::{CheckpointLoader, LoaderRegistry, SafetensorsLoader};
