//! In-memory checkpoint builders for tests.
//!
//! Produces minimal but valid `SafeTensors` files without touching disk, so
//! unit, property and CLI tests share one source of fixtures.

use serde_json::{json, Map, Value};

/// Assemble a `SafeTensors` file from a header object and a data length.
///
/// The data section is zero-filled; the header is written verbatim, so
/// malformed headers can be built on purpose.
#[must_use]
pub fn build_safetensors(header: &Value, data_len: usize) -> Vec<u8> {
    let header_bytes = header.to_string().into_bytes();
    let mut out = Vec::with_capacity(8 + header_bytes.len() + data_len);
    out.extend_from_slice(&(header_bytes.len() as u64).to_le_bytes());
    out.extend_from_slice(&header_bytes);
    out.resize(out.len() + data_len, 0);
    out
}

/// Header builder that lays tensors out back to back
#[derive(Debug, Clone, Default)]
pub struct SafetensorsBuilder {
    entries: Map<String, Value>,
    metadata: Option<Map<String, Value>>,
    offset: u64,
}

impl SafetensorsBuilder {
    /// Empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tensor; `elem_size` bytes per element
    #[must_use]
    pub fn tensor(mut self, name: &str, dtype: &str, shape: &[u64], elem_size: u64) -> Self {
        let len = shape.iter().product::<u64>() * elem_size;
        let end = self.offset + len;
        self.entries.insert(
            name.to_string(),
            json!({ "dtype": dtype, "shape": shape, "data_offsets": [self.offset, end] }),
        );
        self.offset = end;
        self
    }

    /// Insert a raw header entry
    #[must_use]
    pub fn raw_entry(mut self, name: &str, entry: Value) -> Self {
        self.entries.insert(name.to_string(), entry);
        self
    }

    /// Add a `__metadata__` string entry
    #[must_use]
    pub fn metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Header as JSON
    #[must_use]
    pub fn header(&self) -> Value {
        let mut header = self.entries.clone();
        if let Some(meta) = &self.metadata {
            header.insert("__metadata__".to_string(), Value::Object(meta.clone()));
        }
        Value::Object(header)
    }

    /// Complete file bytes
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        build_safetensors(&self.header(), usize::try_from(self.offset).unwrap_or(0))
    }
}

/// Two-tensor file with metadata: `tensor1` F32 [2, 3], `tensor2` I64 [10]
#[must_use]
pub fn build_pygmy_safetensors() -> Vec<u8> {
    SafetensorsBuilder::new()
        .tensor("tensor1", "F32", &[2, 3], 4)
        .tensor("tensor2", "I64", &[10], 8)
        .metadata("format", "test")
        .metadata("created_by", "ckpt-inspector test")
        .build()
}
