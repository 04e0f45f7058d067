//! ckpt - checkpoint structure inspector
//!
//! Usage:
//!   ckpt model.safetensors              # JSON report on stdout
//!   ckpt model.safetensors --summary    # Human-readable summary
//!   ckpt model.pt --max-depth 16        # Tighter nesting limit
//!
//! Every outcome is printed to stdout. Diagnostics go to stderr and are
//! controlled by `RUST_LOG`.

use ckpt_inspector::inspect::DEFAULT_MAX_DEPTH;
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod error;
mod logging;
mod output;

use error::CliError;

const USAGE: &str = "Usage: ckpt <FILE> [--summary] [--max-depth <N>]";

/// ckpt - Checkpoint Structure Inspector
///
/// Lists every tensor in a model checkpoint with its dtype, shape, element
/// count, byte size and device, plus the checkpoint's non-tensor metadata.
#[derive(Parser, Debug)]
#[command(name = "ckpt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the checkpoint file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print a human-readable summary instead of JSON
    #[arg(long)]
    summary: bool,

    /// Deepest mapping nesting accepted before the analysis is aborted
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn parse_args() -> Result<Cli, CliError> {
    Cli::try_parse().map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            std::process::exit(0);
        }
        _ => CliError::Usage(USAGE.to_string()),
    })
}

fn execute(cli: &Cli) -> Result<(), CliError> {
    commands::inspect::run(&cli.file, cli.summary, cli.max_depth)
}

fn main() -> ExitCode {
    logging::init();

    let result = parse_args().and_then(|cli| execute(&cli));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error_json(&e.to_string());
            e.exit_code()
        }
    }
}
