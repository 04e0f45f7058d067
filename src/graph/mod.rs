//! Loaded checkpoint object graph.
//!
//! Decoders materialize a checkpoint as a tree of [`Node`]s. Classification
//! happens when the tree is built: every node already knows whether it is a
//! mapping, a tensor leaf, a primitive, a sequence or an opaque object, so
//! the analyzer never has to guess at runtime.
//!
//! Tensor leaves are anything implementing [`TensorLike`]. Each accessor
//! distinguishes "attribute absent" (`Ok(None)`) from "attribute raised"
//! (`Err`), which is what the descriptor extractor needs to decide between a
//! defaulted field and an error descriptor.

pub mod dtype;

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Insertion-ordered mapping node
pub type Mapping = IndexMap<String, Node>;

/// Result of reading one attribute from a tensor-like leaf
pub type AccessResult<T> = std::result::Result<Option<T>, TensorAccessError>;

/// Reading a tensor attribute failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{attribute}: {message}")]
pub struct TensorAccessError {
    /// Attribute that failed ("shape", "dtype", ...)
    pub attribute: &'static str,
    /// Failure description
    pub message: String,
}

impl TensorAccessError {
    /// Create a new access error
    pub fn new(attribute: &'static str, message: impl Into<String>) -> Self {
        Self {
            attribute,
            message: message.into(),
        }
    }
}

/// Capability interface for tensor leaves.
///
/// Only metadata is exposed; element values are never read.
pub trait TensorLike: fmt::Debug + Send + Sync {
    /// Dimensions, outermost first
    fn shape(&self) -> AccessResult<Vec<u64>>;

    /// Element dtype name as reported by the decoder (e.g. "F32", "torch.float16")
    fn dtype(&self) -> AccessResult<String>;

    /// Number of elements. Defaults to the product of [`shape`](Self::shape).
    fn element_count(&self) -> AccessResult<u64> {
        match self.shape()? {
            Some(dims) => dims
                .iter()
                .try_fold(1u64, |acc, &d| acc.checked_mul(d))
                .map(Some)
                .ok_or_else(|| TensorAccessError::new("element_count", "shape product overflows u64")),
            None => Ok(None),
        }
    }

    /// Bytes per element
    fn element_size(&self) -> AccessResult<u64>;

    /// Storage location identifier (e.g. "cpu")
    fn device(&self) -> AccessResult<String> {
        Ok(None)
    }
}

/// Decoded tensor header: dtype, shape and device without any data.
///
/// This is the adapter decoders use when their native tensor type carries
/// plain metadata fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorMeta {
    /// Dtype name
    pub dtype: String,
    /// Shape dimensions
    pub shape: Vec<u64>,
    /// Device identifier
    pub device: String,
}

impl TensorMeta {
    /// Create a CPU tensor header
    #[must_use]
    pub fn new(dtype: impl Into<String>, shape: Vec<u64>) -> Self {
        Self {
            dtype: dtype.into(),
            shape,
            device: "cpu".to_string(),
        }
    }

    /// Set the device identifier
    #[must_use]
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }
}

impl TensorLike for TensorMeta {
    fn shape(&self) -> AccessResult<Vec<u64>> {
        Ok(Some(self.shape.clone()))
    }

    fn dtype(&self) -> AccessResult<String> {
        Ok(Some(self.dtype.clone()))
    }

    fn element_size(&self) -> AccessResult<u64> {
        Ok(dtype::element_size(&self.dtype))
    }

    fn device(&self) -> AccessResult<String> {
        Ok(Some(self.device.clone()))
    }
}

/// Scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Text
    Str(String),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
}

impl Primitive {
    /// Type name used when a value is reported by kind
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "str",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
        }
    }
}

/// One node of a loaded checkpoint graph
#[derive(Debug, Clone)]
pub enum Node {
    /// Key/value container (state dicts, checkpoint wrappers, configs)
    Mapping(Mapping),
    /// Tensor leaf
    Tensor(Arc<dyn TensorLike>),
    /// Scalar value
    Primitive(Primitive),
    /// Ordered list
    Sequence(Vec<Node>),
    /// Anything the decoder could not classify further
    Opaque {
        /// Decoder-reported type name
        type_name: String,
        /// Decoder-provided rendering
        repr: String,
    },
}

impl Node {
    /// Build a mapping node from key/value pairs, preserving order
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Wrap a tensor-like leaf
    pub fn tensor(tensor: impl TensorLike + 'static) -> Self {
        Self::Tensor(Arc::new(tensor))
    }

    /// Build a sequence node
    pub fn sequence(items: impl IntoIterator<Item = Node>) -> Self {
        Self::Sequence(items.into_iter().collect())
    }

    /// Build an opaque node
    pub fn opaque(type_name: impl Into<String>, repr: impl Into<String>) -> Self {
        Self::Opaque {
            type_name: type_name.into(),
            repr: repr.into(),
        }
    }

    /// Type name used when a value is reported by kind
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Mapping(_) => "dict",
            Self::Tensor(_) => "Tensor",
            Self::Primitive(p) => p.type_name(),
            Self::Sequence(_) => "list",
            Self::Opaque { type_name, .. } => type_name,
        }
    }

    /// Borrow as a mapping
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow as a tensor leaf
    #[must_use]
    pub fn as_tensor(&self) -> Option<&dyn TensorLike> {
        match self {
            Self::Tensor(t) => Some(t.as_ref()),
            _ => None,
        }
    }

    /// Render for display, nesting at most `max_depth` containers deep and
    /// keeping at most `char_limit` characters.
    ///
    /// Containers past the depth limit render as `[...]` or `{...}`.
    ///
    /// ```
    /// use ckpt_inspector::graph::Node;
    ///
    /// let node = Node::sequence([Node::sequence([Node::from(1_i64)])]);
    /// assert_eq!(node.render(1, 100), "[[...]]");
    /// assert_eq!(node.render(8, 3), "[[1");
    /// ```
    #[must_use]
    pub fn render(&self, max_depth: usize, char_limit: usize) -> String {
        let mut out = String::new();
        let mut writer = CharLimited {
            out: &mut out,
            remaining: char_limit,
        };
        // Err only means the limit was reached
        let _ = self.write_repr(&mut writer, max_depth, false);
        out
    }

    fn write_repr<W: fmt::Write>(&self, w: &mut W, depth: usize, nested: bool) -> fmt::Result {
        match self {
            Self::Mapping(_) if depth == 0 => w.write_str("{...}"),
            Self::Sequence(_) if depth == 0 => w.write_str("[...]"),
            Self::Mapping(map) => {
                w.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        w.write_str(", ")?;
                    }
                    write!(w, "{key:?}: ")?;
                    value.write_repr(w, depth - 1, true)?;
                }
                w.write_str("}")
            }
            Self::Sequence(items) => {
                w.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        w.write_str(", ")?;
                    }
                    item.write_repr(w, depth - 1, true)?;
                }
                w.write_str("]")
            }
            Self::Tensor(t) => {
                let shape = t.shape().ok().flatten().unwrap_or_default();
                let dtype = t
                    .dtype()
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| "unknown".to_string());
                write!(w, "tensor(shape={shape:?}, dtype={dtype})")
            }
            Self::Primitive(Primitive::Str(s)) if nested => write!(w, "{s:?}"),
            Self::Primitive(p) => write!(w, "{p}"),
            Self::Opaque { repr, .. } => w.write_str(repr),
        }
    }
}

/// Nesting rendered by `Display` before containers collapse to placeholders
const DISPLAY_DEPTH: usize = 64;

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_repr(f, DISPLAY_DEPTH, false)
    }
}

/// Writer that stops accepting text after a character budget
struct CharLimited<'a> {
    out: &'a mut String,
    remaining: usize,
}

impl fmt::Write for CharLimited<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.remaining == 0 {
                return Err(fmt::Error);
            }
            self.out.push(c);
            self.remaining -= 1;
        }
        Ok(())
    }
}

impl From<Primitive> for Node {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Primitive(Primitive::Str(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Primitive(Primitive::Str(s))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Self::Primitive(Primitive::Int(i))
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Self::Primitive(Primitive::Float(x))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Primitive(Primitive::Bool(b))
    }
}

impl From<TensorMeta> for Node {
    fn from(t: TensorMeta) -> Self {
        Self::tensor(t)
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
