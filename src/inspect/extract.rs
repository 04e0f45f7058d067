//! Tensor descriptor extraction.
//!
//! Turns one tensor-like leaf into a [`TensorDescriptor`]. Absent attributes
//! fall back to defaults; an attribute that fails to read turns the whole
//! descriptor into the error variant, discarding anything already read.

use crate::graph::{TensorAccessError, TensorLike};
use serde::Serialize;

/// Bytes per element assumed when the leaf does not report an element size
pub const DEFAULT_ELEMENT_SIZE: u64 = 4;

/// Metadata of one tensor leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TensorDescriptor {
    /// Dotted path of the tensor in the checkpoint tree
    pub name: String,
    /// Dtype name as reported by the decoder
    pub dtype: String,
    /// Shape dimensions
    pub shape: Vec<u64>,
    /// Number of elements (1 for scalar tensors)
    pub element_count: u64,
    /// Storage size in bytes
    pub size_bytes: u64,
    /// Device identifier
    pub device: String,
    /// Why the leaf could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TensorDescriptor {
    /// Error variant: zeroed counts, sentinel dtype and device
    #[must_use]
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dtype: "error".to_string(),
            shape: Vec::new(),
            element_count: 0,
            size_bytes: 0,
            device: "unknown".to_string(),
            error: Some(error.into()),
        }
    }

    /// Whether this descriptor is the error variant
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Extract the descriptor for `leaf`, never failing.
///
/// ```
/// use ckpt_inspector::graph::TensorMeta;
/// use ckpt_inspector::inspect::extract_descriptor;
///
/// let d = extract_descriptor(&TensorMeta::new("F16", vec![8, 4]), "fc.weight");
/// assert_eq!(d.element_count, 32);
/// assert_eq!(d.size_bytes, 64);
/// ```
pub fn extract_descriptor(leaf: &dyn TensorLike, name: &str) -> TensorDescriptor {
    match read_descriptor(leaf, name) {
        Ok(descriptor) => descriptor,
        Err(err) => {
            tracing::warn!(tensor = name, error = %err, "tensor metadata unreadable");
            TensorDescriptor::failed(name, err.to_string())
        }
    }
}

fn read_descriptor(
    leaf: &dyn TensorLike,
    name: &str,
) -> Result<TensorDescriptor, TensorAccessError> {
    let reported_shape = leaf.shape()?;
    let dtype = leaf.dtype()?.unwrap_or_else(|| "unknown".to_string());

    let shape_product = match &reported_shape {
        Some(dims) => Some(checked_product(dims)?),
        None => None,
    };

    let element_count = match (leaf.element_count()?, shape_product) {
        (Some(count), Some(product)) if count != product => {
            return Err(TensorAccessError::new(
                "element_count",
                format!("reported {count} elements but shape holds {product}"),
            ));
        }
        (Some(count), _) => count,
        (None, Some(product)) => product,
        // Absent shape reads as a scalar
        (None, None) => 1,
    };

    let element_size = leaf.element_size()?.unwrap_or(DEFAULT_ELEMENT_SIZE);
    let size_bytes = element_count.checked_mul(element_size).ok_or_else(|| {
        TensorAccessError::new(
            "element_size",
            format!("{element_count} elements of {element_size} bytes overflow u64"),
        )
    })?;

    let device = leaf.device()?.unwrap_or_else(|| "unknown".to_string());

    Ok(TensorDescriptor {
        name: name.to_string(),
        dtype,
        shape: reported_shape.unwrap_or_default(),
        element_count,
        size_bytes,
        device,
        error: None,
    })
}

fn checked_product(dims: &[u64]) -> Result<u64, TensorAccessError> {
    dims.iter().try_fold(1u64, |acc, &d| {
        acc.checked_mul(d)
            .ok_or_else(|| TensorAccessError::new("shape", format!("{dims:?} overflows u64")))
    })
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
