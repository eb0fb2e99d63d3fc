//! Top-level application orchestration.
//!
//! `src/main.rs` only maps the result to an exit code; this module parses the
//! command line, sets up logging and dispatches to the pipeline or the
//! synthetic-capture writer.

use std::fs::File;
use std::io::BufWriter;

use clap::Parser;
use log::info;

use crate::cli::{AnalyzeArgs, Cli, Command, SynthArgs};
use crate::data::{SynthSpec, generate_capture, write_capture};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `scopefit` binary.
pub fn run() -> Result<(), AppError> {
    // RUST_LOG overrides; warnings (failed fits) are shown by default.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();

    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(&args),
        Command::Synth(args) => handle_synth(&args),
    }
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<(), AppError> {
    let config = args.to_config();
    info!("analyzing {}", config.csv_path.display());
    pipeline::run_analysis(&config)?;
    Ok(())
}

fn handle_synth(args: &SynthArgs) -> Result<(), AppError> {
    let spec = SynthSpec {
        rows: args.rows,
        seed: args.seed,
        noise: args.noise,
        dt: args.dt,
        ..SynthSpec::default()
    };
    let series = generate_capture(&spec)?;

    let file = File::create(&args.out)
        .map_err(|e| AppError::input(format!("Failed to create '{}': {e}", args.out.display())))?;
    write_capture(BufWriter::new(file), &series)?;

    println!("wrote {} rows to {}", series.len(), args.out.display());
    Ok(())
}

/// Rewrite argv so `scopefit` defaults to `scopefit analyze`.
///
/// - `scopefit`                    -> `scopefit analyze`
/// - `scopefit cap.csv --no-show`  -> `scopefit analyze cap.csv --no-show`
/// - `scopefit --help/--version`   -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let keep = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help" | "analyze" | "synth"
    );
    if !keep {
        argv.insert(1, "analyze".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_analyze() {
        assert_eq!(rewrite_args(args(&["scopefit"])), args(&["scopefit", "analyze"]));
        assert_eq!(
            rewrite_args(args(&["scopefit", "cap.csv", "--no-show"])),
            args(&["scopefit", "analyze", "cap.csv", "--no-show"])
        );
    }

    #[test]
    fn subcommands_and_help_untouched() {
        for list in [["scopefit", "synth"], ["scopefit", "--help"], ["scopefit", "analyze"]] {
            assert_eq!(rewrite_args(args(&list)), args(&list));
        }
    }
}
