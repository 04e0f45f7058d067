//! Inspect command implementation
//!
//! Analyzes one checkpoint file and prints either the JSON report or a
//! human-readable summary. A failed analysis is still a report: it goes to
//! stdout like any other and does not change the exit code.

use crate::error::{CliError, Result};
use crate::output;
use ckpt_inspector::inspect::{AnalysisReport, Analyzer, InspectOptions};
use std::path::Path;
use tracing::debug;

/// Run the inspect command
pub(crate) fn run(path: &Path, summary: bool, max_depth: usize) -> Result<()> {
    let report = analyze(path, max_depth)?;
    if summary {
        output::print_summary(path, &report);
    } else {
        println!("{}", report.to_json_pretty()?);
    }
    Ok(())
}

/// Validate the path and analyze it with the bundled decoders
fn analyze(path: &Path, max_depth: usize) -> Result<AnalysisReport> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }

    let options = InspectOptions::new().with_max_depth(max_depth);
    let analyzer = Analyzer::default().with_options(options);
    let report = analyzer.analyze_path(path);
    debug!(path = %path.display(), success = report.is_success(), "report ready");
    Ok(report)
}
