//! Non-tensor metadata values.

use crate::graph::{Node, Primitive};
use indexmap::IndexMap;
use serde::Serialize;

/// Dotted-path key to value, in traversal order
pub type MetadataMap = IndexMap<String, MetadataValue>;

/// One metadata entry.
///
/// Serialized untagged, so a [`TypeName`](Self::TypeName) is
/// indistinguishable from a [`Str`](Self::Str) on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Text
    Str(String),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Sequence of primitives (possibly nested)
    List(Vec<MetadataValue>),
    /// Type name standing in for a value that cannot be stored verbatim
    TypeName(String),
    /// Metadata collected from a nested mapping
    Map(MetadataMap),
}

impl MetadataValue {
    /// Borrow the nested map, if any
    #[must_use]
    pub fn as_map(&self) -> Option<&MetadataMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&Primitive> for MetadataValue {
    fn from(p: &Primitive) -> Self {
        match p {
            Primitive::Str(s) => Self::Str(s.clone()),
            Primitive::Int(i) => Self::Int(*i),
            Primitive::Float(x) => Self::Float(*x),
            Primitive::Bool(b) => Self::Bool(*b),
        }
    }
}

/// Verbatim value for a primitive or a sequence made only of primitives.
///
/// Returns `None` for anything else, including a sequence that holds a
/// mapping or tensor anywhere inside it. `depth_budget` bounds how deep
/// nested sequences are followed.
pub(crate) fn plain_value(node: &Node, depth_budget: usize) -> Option<MetadataValue> {
    match node {
        Node::Primitive(p) => Some(p.into()),
        Node::Sequence(items) if depth_budget > 0 => items
            .iter()
            .map(|item| plain_value(item, depth_budget - 1))
            .collect::<Option<Vec<_>>>()
            .map(MetadataValue::List),
        _ => None,
    }
}

/// Verbatim value if possible, otherwise the node's type name
pub(crate) fn leaf_value(node: &Node, depth_budget: usize) -> MetadataValue {
    plain_value(node, depth_budget)
        .unwrap_or_else(|| MetadataValue::TypeName(node.type_name().to_string()))
}
