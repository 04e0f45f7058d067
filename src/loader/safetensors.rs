//! `SafeTensors` header decoder.
//!
//! ```text
//! [8-byte header: u64 header length (little-endian)]
//! [JSON header: tensor name -> {dtype, shape, data_offsets}, "__metadata__"]
//! [Raw tensor data]
//! ```
//!
//! Only the header is read; tensor data is never touched. Malformed tensor
//! entries are kept and surface as unreadable leaves rather than being
//! dropped.

use super::CheckpointLoader;
use crate::error::{InspectError, Result};
use crate::graph::{dtype, AccessResult, Node, Primitive, TensorAccessError, TensorLike};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Largest header accepted (100 MB)
pub const MAX_HEADER_LEN: u64 = 100_000_000;

/// Key holding free-form string metadata
const METADATA_KEY: &str = "__metadata__";

/// Decoder for `.safetensors` files
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetensorsLoader;

impl SafetensorsLoader {
    /// Decode an in-memory `SafeTensors` file
    ///
    /// # Errors
    /// Returns [`InspectError::Decode`] if the header is missing or malformed.
    pub fn decode(bytes: &[u8]) -> Result<Node> {
        let header = read_header(bytes, bytes.len() as u64)?;
        parse_header(&header)
    }
}

impl CheckpointLoader for SafetensorsLoader {
    fn name(&self) -> &'static str {
        "SafeTensors"
    }

    fn format_type(&self) -> &'static str {
        "safetensors"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["safetensors"]
    }

    fn load(&self, path: &Path) -> Result<Node> {
        let file = File::open(path)
            .map_err(|e| InspectError::decode(format!("cannot open {}: {e}", path.display())))?;
        let file_len = file
            .metadata()
            .map_err(|e| InspectError::decode(format!("cannot stat {}: {e}", path.display())))?
            .len();
        let header = read_header(BufReader::new(file), file_len)?;
        parse_header(&header)
    }
}

/// Read the length prefix and JSON header bytes
fn read_header(mut reader: impl Read, file_len: u64) -> Result<Vec<u8>> {
    if file_len < 8 {
        return Err(InspectError::decode(format!(
            "file is {file_len} bytes, need at least 8 bytes for the SafeTensors header length"
        )));
    }

    let mut len_buf = [0u8; 8];
    reader
        .read_exact(&mut len_buf)
        .map_err(|e| InspectError::decode(format!("cannot read header length: {e}")))?;
    let header_len = u64::from_le_bytes(len_buf);

    if header_len == 0 {
        return Err(InspectError::decode("SafeTensors header length is 0"));
    }
    if header_len > MAX_HEADER_LEN {
        return Err(InspectError::decode(format!(
            "SafeTensors header is {header_len} bytes, maximum supported is {MAX_HEADER_LEN}"
        )));
    }
    if header_len > file_len - 8 {
        return Err(InspectError::decode(format!(
            "SafeTensors header length {header_len} exceeds file size {file_len}"
        )));
    }

    // Bounded by MAX_HEADER_LEN above
    let mut header = vec![0u8; header_len as usize];
    reader
        .read_exact(&mut header)
        .map_err(|e| InspectError::decode(format!("cannot read header: {e}")))?;
    Ok(header)
}

fn parse_header(header: &[u8]) -> Result<Node> {
    let text = std::str::from_utf8(header)
        .map_err(|e| InspectError::decode(format!("header is not valid UTF-8: {e}")))?;
    let value: Value = serde_json::from_str(text)
        .map_err(|e| InspectError::decode(format!("invalid JSON in header: {e}")))?;
    let Value::Object(entries) = value else {
        return Err(InspectError::decode("header must be a JSON object"));
    };

    let root = entries
        .into_iter()
        .map(|(name, entry)| {
            let node = match entry {
                Value::Object(fields) if name != METADATA_KEY => Node::tensor(HeaderTensor {
                    dtype: fields.get("dtype").cloned(),
                    shape: fields.get("shape").cloned(),
                    data_offsets: fields.get("data_offsets").cloned(),
                }),
                other => json_to_node(other),
            };
            (name, node)
        })
        .collect();
    Ok(Node::Mapping(root))
}

fn json_to_node(value: Value) -> Node {
    match value {
        Value::Null => Node::opaque("NoneType", "None"),
        Value::Bool(b) => Node::Primitive(Primitive::Bool(b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Node::Primitive(Primitive::Int(i)),
            None => Node::Primitive(Primitive::Float(n.as_f64().unwrap_or(f64::NAN))),
        },
        Value::String(s) => Node::Primitive(Primitive::Str(s)),
        Value::Array(items) => Node::Sequence(items.into_iter().map(json_to_node).collect()),
        Value::Object(map) => Node::Mapping(
            map.into_iter()
                .map(|(k, v)| (k, json_to_node(v)))
                .collect(),
        ),
    }
}

/// One tensor entry of the header, validated lazily on access
#[derive(Debug, Clone)]
struct HeaderTensor {
    dtype: Option<Value>,
    shape: Option<Value>,
    data_offsets: Option<Value>,
}

impl HeaderTensor {
    fn offsets(&self) -> AccessResult<(u64, u64)> {
        let raw = required(&self.data_offsets, "data_offsets")?;
        let pair = raw
            .as_array()
            .filter(|a| a.len() == 2)
            .and_then(|a| Some((a[0].as_u64()?, a[1].as_u64()?)));
        match pair {
            Some((start, end)) if start <= end => Ok(Some((start, end))),
            _ => Err(TensorAccessError::new(
                "data_offsets",
                format!("expected [start, end] with start <= end, got {raw}"),
            )),
        }
    }
}

/// Tensor entries must carry every field
fn required<'a>(
    field: &'a Option<Value>,
    attribute: &'static str,
) -> std::result::Result<&'a Value, TensorAccessError> {
    field
        .as_ref()
        .ok_or_else(|| TensorAccessError::new(attribute, "missing from header entry"))
}

impl TensorLike for HeaderTensor {
    fn shape(&self) -> AccessResult<Vec<u64>> {
        let raw = required(&self.shape, "shape")?;
        raw.as_array()
            .and_then(|dims| dims.iter().map(Value::as_u64).collect::<Option<Vec<_>>>())
            .map(Some)
            .ok_or_else(|| {
                TensorAccessError::new(
                    "shape",
                    format!("expected an array of non-negative integers, got {raw}"),
                )
            })
    }

    fn dtype(&self) -> AccessResult<String> {
        match required(&self.dtype, "dtype")? {
            Value::String(s) => Ok(Some(s.clone())),
            other => Err(TensorAccessError::new(
                "dtype",
                format!("expected a string, got {other}"),
            )),
        }
    }

    fn element_size(&self) -> AccessResult<u64> {
        let size = self
            .dtype()
            .ok()
            .flatten()
            .and_then(|d| dtype::element_size(&d));
        let offsets = self.offsets()?;

        if let (Some(size), Some((start, end)), Ok(Some(count))) =
            (size, offsets, self.element_count())
        {
            let expected = count.checked_mul(size);
            if expected != Some(end - start) {
                return Err(TensorAccessError::new(
                    "data_offsets",
                    format!(
                        "span of {} bytes does not match {count} elements of {size} bytes",
                        end - start
                    ),
                ));
            }
        }
        Ok(size)
    }

    fn device(&self) -> AccessResult<String> {
        Ok(Some("cpu".to_string()))
    }
}

#[cfg(test)]
#[path = "safetensors_tests.rs"]
mod tests;
