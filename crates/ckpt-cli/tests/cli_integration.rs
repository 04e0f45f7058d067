//! End-to-end tests for the `ckpt` binary

use assert_cmd::Command;
use ckpt_inspector::loader::test_factory::{build_pygmy_safetensors, SafetensorsBuilder};
use predicates::prelude::*;
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

fn ckpt() -> Command {
    let mut cmd = Command::cargo_bin("ckpt").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_temp(suffix: &str, bytes: &[u8]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// Usage errors
// ============================================================================

#[test]
fn test_no_arguments() {
    let output = ckpt().assert().code(1).get_output().clone();
    let json = stdout_json(&output);
    assert!(json["error"].as_str().unwrap().starts_with("Usage: ckpt"));
}

#[test]
fn test_too_many_arguments() {
    ckpt()
        .args(["a.pt", "b.pt"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"error\""));
}

#[test]
fn test_missing_file() {
    let output = ckpt()
        .arg("/nonexistent/dir/model.pt")
        .assert()
        .code(1)
        .get_output()
        .clone();
    let json = stdout_json(&output);
    assert_eq!(json["error"], "File not found: /nonexistent/dir/model.pt");
}

#[test]
fn test_help() {
    ckpt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-depth"));
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_safetensors_report() {
    let bytes = build_pygmy_safetensors();
    let file = write_temp(".safetensors", &bytes);

    let output = ckpt().arg(file.path()).assert().success().get_output().clone();
    let json = stdout_json(&output);

    assert_eq!(json["total_tensors"], 2);
    assert_eq!(json["total_parameters"], 16);
    assert_eq!(json["file_size"], bytes.len() as u64);
    assert_eq!(json["format_type"], "safetensors");
    assert_eq!(json["tensors"][0]["name"], "tensor1");
    assert_eq!(json["tensors"][0]["shape"], serde_json::json!([2, 3]));
    assert_eq!(json["tensors"][0]["size_bytes"], 24);
    assert!(json["tensors"][0].get("error").is_none());

    let keys: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        ["tensors", "metadata", "file_size", "total_tensors", "total_parameters", "format_type"]
    );
}

#[test]
fn test_pickle_without_decoder_reports_error() {
    let file = write_temp(".pt", b"\x80\x02}q\x00.");
    let output = ckpt().arg(file.path()).assert().success().get_output().clone();
    let json = stdout_json(&output);

    assert!(json["error"].as_str().unwrap().contains("PyTorch pickle"));
    assert_eq!(json["file_size"], 6);
    assert!(!json["suggestions"].as_array().unwrap().is_empty());
}

#[test]
fn test_truncated_safetensors_reports_error() {
    let mut bytes = SafetensorsBuilder::new().tensor("w", "F32", &[4], 4).build();
    bytes.truncate(12);
    let file = write_temp(".safetensors", &bytes);

    let output = ckpt().arg(file.path()).assert().success().get_output().clone();
    let json = stdout_json(&output);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to load checkpoint"));
    assert_eq!(json["file_size"], 12);
}

#[test]
fn test_max_depth_zero_fails_nested_metadata() {
    let bytes = build_pygmy_safetensors();
    let file = write_temp(".safetensors", &bytes);

    let output = ckpt()
        .arg(file.path())
        .args(["--max-depth", "0"])
        .assert()
        .success()
        .get_output()
        .clone();
    let json = stdout_json(&output);
    assert!(json["error"].as_str().unwrap().contains("maximum depth 0"));
}

#[test]
fn test_summary_view() {
    let file = write_temp(".safetensors", &build_pygmy_safetensors());
    ckpt()
        .arg(file.path())
        .arg("--summary")
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Tensors ==="))
        .stdout(predicate::str::contains("tensor1"))
        .stdout(predicate::str::contains("[2, 3]"))
        .stdout(predicate::str::contains("__metadata__"));
}

#[test]
fn test_summary_view_failure() {
    let file = write_temp(".bin", b"junk");
    ckpt()
        .arg(file.path())
        .arg("--summary")
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("[FAIL]"))
        .stdout(predicate::str::contains("=== Suggestions ==="));
}
