use super::*;
use crate::error::InspectError;
use crate::graph::TensorMeta;
use crate::loader::test_factory::{build_pygmy_safetensors, SafetensorsBuilder};
use crate::loader::CheckpointLoader;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(suffix: &str, bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

/// Loader that hands out a fixed graph, standing in for a pickle decoder
struct FixedGraphLoader(Node);

impl CheckpointLoader for FixedGraphLoader {
    fn name(&self) -> &'static str {
        "fixed"
    }
    fn format_type(&self) -> &'static str {
        "pytorch_pickle"
    }
    fn extensions(&self) -> &'static [&'static str] {
        &["pt"]
    }
    fn load(&self, _path: &Path) -> Result<Node> {
        Ok(self.0.clone())
    }
}

/// Loader that always fails to decode
struct CorruptLoader;

impl CheckpointLoader for CorruptLoader {
    fn name(&self) -> &'static str {
        "corrupt"
    }
    fn format_type(&self) -> &'static str {
        "pytorch_pickle"
    }
    fn extensions(&self) -> &'static [&'static str] {
        &["pt"]
    }
    fn load(&self, _path: &Path) -> Result<Node> {
        Err(InspectError::decode("invalid load key, 'x'"))
    }
}

// ========================================================================
// Options
// ========================================================================

#[test]
fn test_inspect_options_defaults() {
    let opts = InspectOptions::new();
    assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(opts.content_limit, DEFAULT_CONTENT_LIMIT);
}

#[test]
fn test_inspect_options_builders() {
    let opts = InspectOptions::new().with_max_depth(3).with_content_limit(10);
    assert_eq!(opts.max_depth, 3);
    assert_eq!(opts.content_limit, 10);

    let analyzer = Analyzer::default().with_options(opts.clone());
    assert_eq!(analyzer.options(), &opts);
    assert_eq!(analyzer.loaders().len(), 1);
}

// ========================================================================
// analyze_graph
// ========================================================================

#[test]
fn test_analyze_graph_training_checkpoint() {
    let root = Node::mapping([
        (
            "state_dict",
            Node::mapping([
                ("fc.weight", TensorMeta::new("torch.float32", vec![10, 4]).into()),
                ("fc.bias", TensorMeta::new("torch.float32", vec![10]).into()),
            ]),
        ),
        ("epoch", Node::from(50_i64)),
        ("loss", Node::from(0.1)),
    ]);
    let report = analyze_graph(&root, 1234, "pytorch_pickle", &InspectOptions::default()).unwrap();

    assert_eq!(report.total_tensors, 2);
    assert_eq!(report.total_parameters, 50);
    assert_eq!(report.file_size, 1234);
    assert_eq!(report.format_type, "pytorch_pickle");
    assert_eq!(report.tensors[0].size_bytes, 160);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["metadata"], serde_json::json!({"epoch": 50, "loss": 0.1}));
}

#[test]
fn test_analyze_graph_is_idempotent() {
    let root = Node::mapping([
        ("a", Node::mapping([("w", TensorMeta::new("F32", vec![4, 4]).into())])),
        ("note", Node::from("x")),
    ]);
    let opts = InspectOptions::default();
    let first = AnalysisReport::Success(analyze_graph(&root, 0, "x", &opts).unwrap());
    let second = AnalysisReport::Success(analyze_graph(&root, 0, "x", &opts).unwrap());
    assert_eq!(first.to_json_pretty().unwrap(), second.to_json_pretty().unwrap());
}

// ========================================================================
// Analyzer over files
// ========================================================================

#[test]
fn test_analyze_path_safetensors() {
    let bytes = build_pygmy_safetensors();
    let file = write_temp(".safetensors", &bytes);

    let report = Analyzer::default().analyze_path(file.path());
    let ok = report.as_success().unwrap();
    assert_eq!(ok.file_size, bytes.len() as u64);
    assert_eq!(ok.format_type, "safetensors");
    assert_eq!(ok.total_tensors, 2);
}

#[test]
fn test_analyze_path_decode_failure() {
    let file = write_temp(".pt", b"not a pickle");
    let analyzer = Analyzer::new(LoaderRegistry::new().with_loader(CorruptLoader));

    let report = analyzer.analyze_path(file.path());
    let failure = report.as_failure().unwrap();
    assert_eq!(failure.error, "Failed to load checkpoint: invalid load key, 'x'");
    assert_eq!(failure.file_size, 12);
    assert!(failure.traceback.is_none());
    assert!(failure.suggestions.is_empty());
}

#[test]
fn test_analyze_path_truncated_safetensors() {
    let mut bytes = SafetensorsBuilder::new().tensor("w", "F32", &[2], 4).build();
    bytes.truncate(20);
    let file = write_temp(".safetensors", &bytes);

    let report = Analyzer::default().analyze_path(file.path());
    assert_eq!(report.file_size(), 20);
    assert!(report
        .as_failure()
        .is_some_and(|f| f.error.contains("exceeds file size")));
}

#[test]
fn test_analyze_path_without_decoder() {
    let file = write_temp(".pth", b"\x80\x02}q\x00.");
    let report = Analyzer::default().analyze_path(file.path());
    let failure = report.as_failure().unwrap();
    assert!(failure.error.contains("PyTorch pickle"));
    assert!(!failure.suggestions.is_empty());
    assert_eq!(failure.file_size, 6);
}

#[test]
fn test_analyze_path_with_injected_decoder() {
    let graph = Node::mapping([
        ("state_dict", Node::mapping([("w", TensorMeta::new("F16", vec![3]).into())])),
        ("optimizer", Node::mapping([("state", Node::mapping([("0", TensorMeta::new("F32", vec![3]).into())]))])),
    ]);
    let file = write_temp(".pt", b"pickle");
    let analyzer = Analyzer::new(LoaderRegistry::with_defaults().with_loader(FixedGraphLoader(graph)));

    let report = analyzer.try_analyze_path(file.path()).unwrap();
    assert_eq!(report.format_type, "pytorch_pickle");
    assert_eq!(report.total_tensors, 1);
    assert_eq!(report.metadata["optimizer"], MetadataValue::TypeName("dict".to_string()));
}

#[test]
fn test_analyze_path_depth_failure() {
    let mut graph: Node = TensorMeta::new("F32", vec![1]).into();
    for i in 0..5 {
        graph = Node::mapping([(format!("l{i}"), graph)]);
    }
    let file = write_temp(".pt", b"pickle");
    let analyzer = Analyzer::new(LoaderRegistry::new().with_loader(FixedGraphLoader(graph)))
        .with_options(InspectOptions::new().with_max_depth(2));

    let report = analyzer.analyze_path(file.path());
    let failure = report.as_failure().unwrap();
    assert!(failure.error.contains("maximum depth 2"));
    assert!(failure.traceback.is_some());
}

#[test]
fn test_analyze_missing_file() {
    let report = Analyzer::default().analyze_path(Path::new("/nonexistent/dir/model.safetensors"));
    let failure = report.as_failure().unwrap();
    assert_eq!(failure.file_size, 0);
}
