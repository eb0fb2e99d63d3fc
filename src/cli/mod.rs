//! Command-line parsing for the oscilloscope peak fitter.
//!
//! Argument parsing and dispatch live here and in `crate::app`; nothing in
//! this module touches the numeric code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    AnalysisConfig, ColumnLayout, DEFAULT_CSV_PATH, DEFAULT_ERRORBAR_SCAN_LEN, DEFAULT_ERRORBAR_STRIDE,
    DEFAULT_GAUSS_WINDOW, DEFAULT_LORENTZ_WINDOW, DEFAULT_TIME_COLUMN, DEFAULT_VOLTAGE_COLUMN, ErrorBarSpec, Window,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "scopefit", version, about = "Gaussian/Lorentzian peak fits for oscilloscope captures")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plot a capture, fit the central and right-most peaks, and report the fits.
    Analyze(AnalyzeArgs),
    /// Write a synthetic two-peak capture in the scope CSV layout.
    Synth(SynthArgs),
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// Capture CSV (no header row).
    #[arg(value_name = "CSV", default_value = DEFAULT_CSV_PATH)]
    pub csv: PathBuf,

    /// Zero-based column holding time (s).
    #[arg(long, default_value_t = DEFAULT_TIME_COLUMN)]
    pub time_column: usize,

    /// Zero-based column holding voltage (V).
    #[arg(long, default_value_t = DEFAULT_VOLTAGE_COLUMN)]
    pub voltage_column: usize,

    /// Field delimiter (a single ASCII character).
    #[arg(long, default_value_t = ',', value_parser = parse_delimiter)]
    pub delimiter: char,

    /// Central-peak window `LO:HI` (sample indices, upper exclusive).
    #[arg(long, default_value_t = DEFAULT_GAUSS_WINDOW)]
    pub gauss_window: Window,

    /// Right-most-peak window `LO:HI`.
    #[arg(long, default_value_t = DEFAULT_LORENTZ_WINDOW)]
    pub lorentz_window: Window,

    /// Error-bar sampling stride.
    #[arg(long, default_value_t = DEFAULT_ERRORBAR_STRIDE)]
    pub stride: usize,

    /// Number of leading samples scanned for error bars.
    #[arg(long, default_value_t = DEFAULT_ERRORBAR_SCAN_LEN)]
    pub scan_len: usize,

    /// Gaussian initial guess `A,X0,SIGMA`.
    #[arg(long, value_name = "A,X0,SIGMA", value_parser = parse_triple)]
    pub gauss_guess: Option<[f64; 3]>,

    /// Lorentzian initial guess `A,X0,FWHM`.
    #[arg(long, value_name = "A,X0,FWHM", value_parser = parse_triple)]
    pub lorentz_guess: Option<[f64; 3]>,

    /// Do not open the interactive figure viewer.
    #[arg(long)]
    pub no_show: bool,

    /// Write the figures as SVG files into this directory.
    #[arg(long, value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// Write a JSON report of both fits.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

impl AnalyzeArgs {
    pub fn to_config(&self) -> AnalysisConfig {
        let defaults = AnalysisConfig::default();
        AnalysisConfig {
            csv_path: self.csv.clone(),
            layout: ColumnLayout {
                time_column: self.time_column,
                voltage_column: self.voltage_column,
                // ASCII is enforced by `parse_delimiter`.
                delimiter: self.delimiter as u8,
            },
            gauss_window: self.gauss_window,
            lorentz_window: self.lorentz_window,
            errorbar: ErrorBarSpec {
                stride: self.stride,
                scan_len: self.scan_len,
            },
            gauss_guess: self.gauss_guess.unwrap_or(defaults.gauss_guess),
            lorentz_guess: self.lorentz_guess.unwrap_or(defaults.lorentz_guess),
            show: !self.no_show,
            save_dir: self.save_dir.clone(),
            export: self.export.clone(),
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Output CSV path.
    #[arg(value_name = "OUT")]
    pub out: PathBuf,

    #[arg(long, default_value_t = 2500)]
    pub rows: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the added noise (V).
    #[arg(long, default_value_t = 1e-3)]
    pub noise: f64,

    /// Sample period (s).
    #[arg(long, default_value_t = 4e-5)]
    pub dt: f64,
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(format!("delimiter must be a single ASCII character, got '{s}'")),
    }
}

fn parse_triple(s: &str) -> Result<[f64; 3], String> {
    let values = s
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .map_err(|e| format!("'{part}' is not a number: {e}"))
        })
        .collect::<Result<Vec<f64>, String>>()?;
    <[f64; 3]>::try_from(values).map_err(|v| format!("expected 3 comma-separated values, got {}", v.len()))
}
