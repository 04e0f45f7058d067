//! Output formatting utilities

use ckpt_inspector::graph::dtype::{self, DtypeCategory};
use ckpt_inspector::inspect::{
    AnalysisReport, CheckpointReport, CheckpointSummary, FailureReport, MetadataValue,
};
use colored::{ColoredString, Colorize};
use std::path::Path;

/// Print a one-line JSON error document to stdout
pub(crate) fn print_error_json(message: &str) {
    println!("{}", serde_json::json!({ "error": message }));
}

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// Print an error message
pub(crate) fn fail(msg: &str) {
    println!("{} {}", "[FAIL]".red().bold(), msg);
}

/// Format bytes as human-readable size
pub(crate) fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Format a shape as `[a, b, c]`
pub(crate) fn format_shape(shape: &[u64]) -> String {
    let dims: Vec<String> = shape.iter().map(u64::to_string).collect();
    format!("[{}]", dims.join(", "))
}

/// Dtype tag colored by family
fn dtype_badge(raw: &str) -> ColoredString {
    let tag = dtype::normalize(raw);
    match dtype::category(raw) {
        DtypeCategory::Float => tag.blue(),
        DtypeCategory::Int => tag.green(),
        DtypeCategory::UInt => tag.cyan(),
        DtypeCategory::Bool => tag.magenta(),
        DtypeCategory::Other => tag.normal(),
    }
}

/// Human-readable rendering of a report
pub(crate) fn print_summary(path: &Path, report: &AnalysisReport) {
    section(&format!("Checkpoint: {}", path.display()));
    match report {
        AnalysisReport::Success(ok) => print_success(ok),
        AnalysisReport::Failure(failure) => print_failure(failure),
    }
}

fn print_failure(failure: &FailureReport) {
    kv("File size", format_size(failure.file_size));
    fail(&failure.error);
    if let Some(trace) = &failure.traceback {
        section("Error Details");
        println!("{trace}");
    }
    if !failure.suggestions.is_empty() {
        section("Suggestions");
        for hint in &failure.suggestions {
            println!("  - {hint}");
        }
    }
}

fn print_success(report: &CheckpointReport) {
    let summary = CheckpointSummary::from_report(report);

    kv("Format", &report.format_type);
    kv("File size", format_size(report.file_size));
    kv("Tensors", report.total_tensors);
    kv("Parameters", report.total_parameters);
    kv("Tensor bytes", format_size(summary.total_size_bytes));
    if summary.large_file {
        warning("Large checkpoint (over 1 GiB): analysis may use significant memory");
    }
    if summary.error_tensors > 0 {
        warning(&format!("{} tensor(s) could not be read", summary.error_tensors));
    }

    if !summary.dtype_counts.is_empty() {
        section("Dtypes");
        for (tag, count) in &summary.dtype_counts {
            println!("  {:<10} {count}", dtype_badge(tag));
        }
    }

    if !summary.groups.is_empty() {
        section("Groups");
        for (prefix, stats) in &summary.groups {
            println!(
                "  {:<32} {:>6} tensors {:>14} params {:>12}",
                prefix,
                stats.tensor_count,
                stats.parameters,
                format_size(stats.size_bytes)
            );
        }
    }

    section("Tensors");
    let mut tensors: Vec<_> = report.tensors.iter().collect();
    tensors.sort_by(|a, b| a.name.cmp(&b.name));
    for tensor in tensors {
        match &tensor.error {
            Some(err) => println!("  {} {}", tensor.name, format!("! {err}").red()),
            None => println!(
                "  {} [{}] {} {} ({})",
                tensor.name,
                dtype_badge(&tensor.dtype),
                format_shape(&tensor.shape),
                format_size(tensor.size_bytes),
                tensor.device
            ),
        }
    }

    section("Metadata");
    if report.metadata.is_empty() {
        println!("  {}", "No metadata found".italic());
    }
    for (key, value) in &report.metadata {
        kv(key, render_metadata(value));
    }
}

fn render_metadata(value: &MetadataValue) -> String {
    match value {
        MetadataValue::Str(s) | MetadataValue::TypeName(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckpt_inspector::graph::{Node, TensorMeta};
    use ckpt_inspector::inspect::{
        analyze_graph, InspectOptions, MetadataMap, TensorDescriptor, LARGE_FILE_THRESHOLD,
    };

    #[test]
    fn test_format_shape() {
        assert_eq!(format_shape(&[2, 3]), "[2, 3]");
        assert_eq!(format_shape(&[]), "[]");
    }

    #[test]
    fn test_format_size_binary_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(2048), "2 KiB");
    }

    #[test]
    fn test_render_metadata() {
        assert_eq!(render_metadata(&MetadataValue::Str("x".to_string())), "x");
        assert_eq!(render_metadata(&MetadataValue::Int(5)), "5");
        let mut nested = MetadataMap::new();
        nested.insert("a.b".to_string(), MetadataValue::Bool(true));
        assert_eq!(render_metadata(&MetadataValue::Map(nested)), r#"{"a.b":true}"#);
    }

    #[test]
    fn test_print_summary_does_not_panic() {
        let failure = AnalysisReport::Failure(FailureReport {
            error: "boom".to_string(),
            file_size: 10,
            traceback: Some("trace".to_string()),
            suggestions: vec!["retry".to_string()],
        });
        print_summary(Path::new("x.pt"), &failure);
    }

    #[test]
    fn test_dtype_badge_normalizes() {
        assert!(dtype_badge("torch.float32").to_string().contains("F32"));
        assert!(dtype_badge("I64").to_string().contains("I64"));
        assert!(dtype_badge("weird").to_string().contains("weird"));
    }

    #[test]
    fn test_print_summary_success_does_not_panic() {
        let root = Node::mapping([
            (
                "encoder",
                Node::mapping([
                    ("w", TensorMeta::new("torch.float32", vec![4, 4]).into()),
                    ("mask", TensorMeta::new("BOOL", vec![4]).into()),
                    ("meta", Node::mapping([("name", Node::from("enc"))])),
                ]),
            ),
            ("step", TensorMeta::new("I64", vec![]).into()),
            ("ids", TensorMeta::new("U8", vec![2]).into()),
            ("q", TensorMeta::new("Q4_K", vec![32]).into()),
            ("epoch", Node::from(3_i64)),
            ("lr", Node::sequence([Node::from(0.1), Node::from(0.01)])),
        ]);
        let mut report = analyze_graph(
            &root,
            LARGE_FILE_THRESHOLD + 1,
            "safetensors",
            &InspectOptions::default(),
        )
        .unwrap();
        report
            .tensors
            .push(TensorDescriptor::failed("encoder.bad", "dtype: unreadable"));

        print_summary(Path::new("model.safetensors"), &AnalysisReport::Success(report));
    }

    #[test]
    fn test_print_summary_empty_success() {
        let empty = Node::mapping(Vec::<(String, Node)>::new());
        let report = analyze_graph(&empty, 0, "x", &InspectOptions::default()).unwrap();
        print_summary(Path::new("empty.safetensors"), &AnalysisReport::Success(report));
    }
}
