use super::*;
use crate::inspect::extract::TensorDescriptor;
use crate::inspect::metadata::MetadataValue;
use std::path::PathBuf;

fn descriptor(name: &str, count: u64, size: u64) -> TensorDescriptor {
    TensorDescriptor {
        name: name.to_string(),
        dtype: "F32".to_string(),
        shape: vec![count],
        element_count: count,
        size_bytes: size,
        device: "cpu".to_string(),
        error: None,
    }
}

fn sample_walked() -> Walked {
    let mut metadata = MetadataMap::new();
    metadata.insert("epoch".to_string(), MetadataValue::Int(3));
    Walked {
        tensors: vec![
            descriptor("w", 6, 24),
            TensorDescriptor::failed("broken", "dtype: bad"),
            descriptor("b", 2, 8),
        ],
        metadata,
    }
}

#[test]
fn test_totals() {
    let report = CheckpointReport::new(sample_walked(), 100, "safetensors");
    assert_eq!(report.total_tensors, 3);
    assert_eq!(report.total_parameters, 8);
    assert_eq!(report.total_size_bytes(), 32);
    assert_eq!(report.error_tensor_count(), 1);
}

#[test]
fn test_success_json_field_order() {
    let report = AnalysisReport::Success(CheckpointReport::new(sample_walked(), 100, "safetensors"));
    let json = report.to_json_pretty().unwrap();

    let positions: Vec<usize> = [
        "\"tensors\"",
        "\"metadata\"",
        "\"file_size\"",
        "\"total_tensors\"",
        "\"total_parameters\"",
        "\"format_type\"",
    ]
    .iter()
    .map(|key| json.find(key).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(json.contains("\"format_type\": \"safetensors\""));
}

#[test]
fn test_decode_failure_has_only_error_and_size() {
    let err = InspectError::decode("truncated header");
    let report = AnalysisReport::Failure(FailureReport::from_error(&err, 42));
    let value: serde_json::Value = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

    let obj = value.as_object().unwrap();
    let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    assert_eq!(keys, ["error", "file_size"]);
    assert_eq!(obj["error"], "Failed to load checkpoint: truncated header");
    assert_eq!(obj["file_size"], 42);
    assert!(!report.is_success());
    assert_eq!(report.file_size(), 42);
}

#[test]
fn test_environment_failure_carries_suggestions() {
    let err = InspectError::UnsupportedEnvironment {
        format: "PyTorch pickle".to_string(),
        path: PathBuf::from("m.pt"),
        suggestions: vec!["Convert to SafeTensors".to_string()],
    };
    let report = FailureReport::from_error(&err, 7);
    assert_eq!(report.suggestions, ["Convert to SafeTensors".to_string()]);
    assert!(report.traceback.is_none());
}

#[test]
fn test_depth_failure_has_traceback() {
    let err = InspectError::DepthExceeded {
        path: "a.b".to_string(),
        limit: 1,
    };
    let report = FailureReport::from_error(&err, 0);
    assert!(report.error.starts_with("Error analyzing file:"));
    assert!(report.traceback.as_deref().is_some_and(|t| t.contains("DepthExceeded")));
}

#[test]
fn test_io_failure_traceback_lists_cause() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let report = FailureReport::from_error(&InspectError::Io(io), 0);
    assert!(report.traceback.as_deref().is_some_and(|t| t.contains("caused by: denied")));
}

#[test]
fn test_accessors() {
    let ok = AnalysisReport::Success(CheckpointReport::new(Walked::default(), 5, "x"));
    assert!(ok.as_success().is_some());
    assert!(ok.as_failure().is_none());
    assert_eq!(ok.file_size(), 5);
}
