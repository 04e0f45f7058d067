//! Aggregate statistics over a checkpoint report.

use super::report::CheckpointReport;
use crate::graph::dtype;
use indexmap::IndexMap;
use serde::Serialize;

/// Files above this size get a large-file notice (1 GiB)
pub const LARGE_FILE_THRESHOLD: u64 = 1024 * 1024 * 1024;

/// Group label for tensors whose name has no dot
pub const ROOT_GROUP: &str = "root";

/// Per-group totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    /// Tensors in the group
    pub tensor_count: usize,
    /// Sum of element counts
    pub parameters: u64,
    /// Sum of storage sizes
    pub size_bytes: u64,
}

/// Summary derived from a [`CheckpointReport`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckpointSummary {
    /// Sum of tensor storage sizes
    pub total_size_bytes: u64,
    /// Tensors that could not be read
    pub error_tensors: usize,
    /// Tensor count per normalized dtype, sorted by dtype
    pub dtype_counts: IndexMap<String, usize>,
    /// Totals per top-level name prefix, sorted by prefix
    pub groups: IndexMap<String, GroupStats>,
    /// File exceeds [`LARGE_FILE_THRESHOLD`]
    pub large_file: bool,
}

impl CheckpointSummary {
    /// Summarize a report
    #[must_use]
    pub fn from_report(report: &CheckpointReport) -> Self {
        let mut dtype_counts: IndexMap<String, usize> = IndexMap::new();
        let mut groups: IndexMap<String, GroupStats> = IndexMap::new();

        for tensor in &report.tensors {
            *dtype_counts
                .entry(dtype::normalize(&tensor.dtype).to_string())
                .or_default() += 1;

            let group = groups.entry(group_prefix(&tensor.name).to_string()).or_default();
            group.tensor_count += 1;
            group.parameters = group.parameters.saturating_add(tensor.element_count);
            group.size_bytes = group.size_bytes.saturating_add(tensor.size_bytes);
        }

        dtype_counts.sort_keys();
        groups.sort_keys();

        Self {
            total_size_bytes: report.total_size_bytes(),
            error_tensors: report.error_tensor_count(),
            dtype_counts,
            groups,
            large_file: report.file_size > LARGE_FILE_THRESHOLD,
        }
    }
}

/// First dotted component of a tensor name, or [`ROOT_GROUP`]
#[must_use]
pub fn group_prefix(name: &str) -> &str {
    name.split_once('.').map_or(ROOT_GROUP, |(prefix, _)| prefix)
}
