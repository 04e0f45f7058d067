//! Checkpoint graph traversal.
//!
//! Tensors are flattened to their full dotted path. Metadata nests one level
//! per mapping boundary: a nested mapping without tensors shows up as a
//! single entry holding its own metadata map, whose keys are again full
//! dotted paths.

use super::extract::{extract_descriptor, TensorDescriptor};
use super::metadata::{leaf_value, MetadataMap, MetadataValue};
use super::InspectOptions;
use crate::error::{InspectError, Result};
use crate::graph::{Mapping, Node};

/// Key that marks a full training checkpoint
pub const STATE_DICT_KEY: &str = "state_dict";

/// Name given to a checkpoint that is a single bare tensor
pub const BARE_TENSOR_NAME: &str = "tensor";

/// Output of a traversal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Walked {
    /// Tensor descriptors in traversal order
    pub tensors: Vec<TensorDescriptor>,
    /// Non-tensor metadata
    pub metadata: MetadataMap,
}

/// Walk a checkpoint root, recognizing the full-training-checkpoint layout.
///
/// When the root mapping holds [`STATE_DICT_KEY`], only that subtree is
/// searched for tensors; every sibling key becomes a flat metadata entry,
/// even if it hides tensors deeper down (optimizer state and the like).
///
/// # Errors
/// Returns [`InspectError::DepthExceeded`] if the graph nests deeper than
/// `options.max_depth`.
pub fn walk_checkpoint(root: &Node, options: &InspectOptions) -> Result<Walked> {
    let Some((root_map, state_dict)) = root
        .as_mapping()
        .and_then(|map| map.get(STATE_DICT_KEY).map(|sd| (map, sd)))
    else {
        return walk(root, "", options);
    };

    let walker = Walker { options };
    let mut walked = match state_dict {
        Node::Mapping(params) => walker.walk_mapping(params, "", 1)?,
        other => {
            tracing::debug!(
                kind = other.type_name(),
                "state_dict is not a mapping, no tensors collected"
            );
            Walked::default()
        }
    };
    if !walked.metadata.is_empty() {
        tracing::debug!(
            entries = walked.metadata.len(),
            "dropping non-tensor entries found inside state_dict"
        );
        walked.metadata.clear();
    }

    for (key, value) in root_map {
        if key == STATE_DICT_KEY {
            continue;
        }
        walked
            .metadata
            .insert(key.clone(), leaf_value(value, walker.sequence_budget(0)));
    }

    Ok(walked)
}

/// Walk any node with the general classification rules.
///
/// - mapping: per-key classification, recursing into nested mappings
/// - tensor: one descriptor named `prefix` (or [`BARE_TENSOR_NAME`])
/// - anything else: `{"type": .., "content": ..}` with the rendering cut to
///   `options.content_limit` characters and `options.max_depth` levels
///
/// # Errors
/// Returns [`InspectError::DepthExceeded`] if the graph nests deeper than
/// `options.max_depth`.
pub fn walk(node: &Node, prefix: &str, options: &InspectOptions) -> Result<Walked> {
    let walker = Walker { options };
    match node {
        Node::Mapping(map) => walker.walk_mapping(map, prefix, 0),
        Node::Tensor(tensor) => {
            let name = if prefix.is_empty() {
                BARE_TENSOR_NAME
            } else {
                prefix
            };
            Ok(Walked {
                tensors: vec![extract_descriptor(tensor.as_ref(), name)],
                metadata: MetadataMap::new(),
            })
        }
        other => {
            let mut metadata = MetadataMap::new();
            metadata.insert(
                "type".to_string(),
                MetadataValue::Str(other.type_name().to_string()),
            );
            metadata.insert(
                "content".to_string(),
                MetadataValue::Str(other.render(options.max_depth, options.content_limit)),
            );
            Ok(Walked {
                tensors: Vec::new(),
                metadata,
            })
        }
    }
}

struct Walker<'a> {
    options: &'a InspectOptions,
}

impl Walker<'_> {
    /// Sequence nesting kept verbatim for a leaf of a mapping at `depth`
    fn sequence_budget(&self, depth: usize) -> usize {
        self.options.max_depth.saturating_sub(depth) + 1
    }

    fn walk_mapping(&self, map: &Mapping, prefix: &str, depth: usize) -> Result<Walked> {
        if depth > self.options.max_depth {
            tracing::warn!(path = prefix, limit = self.options.max_depth, "checkpoint too deep");
            return Err(InspectError::DepthExceeded {
                path: prefix.to_string(),
                limit: self.options.max_depth,
            });
        }

        let mut walked = Walked::default();
        for (key, value) in map {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };

            match value {
                Node::Tensor(tensor) => {
                    walked
                        .tensors
                        .push(extract_descriptor(tensor.as_ref(), &full_key));
                }
                Node::Mapping(nested) => {
                    let sub = self.walk_mapping(nested, &full_key, depth + 1)?;
                    walked.tensors.extend(sub.tensors);
                    if !sub.metadata.is_empty() {
                        walked
                            .metadata
                            .insert(full_key, MetadataValue::Map(sub.metadata));
                    }
                }
                other => {
                    let value = leaf_value(other, self.sequence_budget(depth));
                    walked.metadata.insert(full_key, value);
                }
            }
        }
        Ok(walked)
    }
}

#[cfg(test)]
#[path = "walk_tests.rs"]
mod tests;
