//! Dtype naming and element sizes.
//!
//! Decoders report dtypes in their own vocabulary: SafeTensors uses short
//! upper-case tags (`F32`, `BF16`), pickle-based checkpoints use framework
//! names (`torch.float32`). Everything here accepts both.

/// Broad family of a dtype, used for grouping in summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DtypeCategory {
    /// Floating point (including bf16 and fp8)
    Float,
    /// Signed integer
    Int,
    /// Unsigned integer
    UInt,
    /// Boolean
    Bool,
    /// Unknown or exotic
    Other,
}

impl DtypeCategory {
    /// Lower-case label
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Bool => "bool",
            Self::Other => "other",
        }
    }
}

/// Map framework dtype names onto the short tag form.
///
/// Names without a known mapping are returned unchanged.
///
/// ```
/// use ckpt_inspector::graph::dtype::normalize;
///
/// assert_eq!(normalize("torch.float32"), "F32");
/// assert_eq!(normalize("BF16"), "BF16");
/// assert_eq!(normalize("torch.complex64"), "torch.complex64");
/// ```
#[must_use]
pub fn normalize(dtype: &str) -> &str {
    match dtype {
        "torch.float64" | "torch.double" => "F64",
        "torch.float32" | "torch.float" => "F32",
        "torch.float16" | "torch.half" => "F16",
        "torch.bfloat16" => "BF16",
        "torch.int64" | "torch.long" => "I64",
        "torch.int32" | "torch.int" => "I32",
        "torch.int16" | "torch.short" => "I16",
        "torch.int8" => "I8",
        "torch.uint8" => "U8",
        "torch.bool" => "BOOL",
        "torch.float8_e4m3fn" => "F8_E4M3",
        "torch.float8_e5m2" => "F8_E5M2",
        other => other,
    }
}

/// Bytes per element, or `None` for dtypes this crate does not know.
#[must_use]
pub fn element_size(dtype: &str) -> Option<u64> {
    match normalize(dtype) {
        "F64" | "I64" | "U64" => Some(8),
        "F32" | "I32" | "U32" => Some(4),
        "F16" | "BF16" | "I16" | "U16" => Some(2),
        "I8" | "U8" | "BOOL" | "F8_E4M3" | "F8_E5M2" => Some(1),
        _ => None,
    }
}

/// Classify a dtype into its broad family
#[must_use]
pub fn category(dtype: &str) -> DtypeCategory {
    let tag = normalize(dtype);
    if tag == "BOOL" {
        DtypeCategory::Bool
    } else if tag.starts_with('F') || tag == "BF16" {
        DtypeCategory::Float
    } else if tag.starts_with('I') {
        DtypeCategory::Int
    } else if tag.starts_with('U') {
        DtypeCategory::UInt
    } else {
        DtypeCategory::Other
    }
}
