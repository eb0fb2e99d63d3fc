//! Shared domain types.
//!
//! These types are intentionally kept small: a capture is two parallel `f64`
//! vectors, windows are index pairs, and fit outputs are plain vectors so they
//! serialize directly into the JSON report.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default capture file, read from the working directory.
pub const DEFAULT_CSV_PATH: &str = "Data-Oscilloscope.csv";
/// Default column holding the time coordinate (0-based).
pub const DEFAULT_TIME_COLUMN: usize = 3;
/// Default column holding the voltage coordinate (0-based).
pub const DEFAULT_VOLTAGE_COLUMN: usize = 4;
/// Central-peak window `[980, 1170)`.
pub const DEFAULT_GAUSS_WINDOW: Window = Window { lower: 980, upper: 1170 };
/// Right-most-peak window `[2000, 2500)`.
pub const DEFAULT_LORENTZ_WINDOW: Window = Window { lower: 2000, upper: 2500 };
pub const DEFAULT_ERRORBAR_STRIDE: usize = 250;
pub const DEFAULT_ERRORBAR_SCAN_LEN: usize = 2500;
/// Gaussian initial guess `(a, x0, σ)`.
pub const DEFAULT_GAUSS_GUESS: [f64; 3] = [1.0, 0.4, 0.1];
/// Lorentzian initial guess `(a, x0, f)`.
pub const DEFAULT_LORENTZ_GUESS: [f64; 3] = [0.0172, 0.0898, 0.005];

/// An oscilloscope capture: index-aligned time and voltage samples in
/// acquisition order.
///
/// The fields are private so the equal-length invariant cannot be broken after
/// construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleSeries {
    time: Vec<f64>,
    voltage: Vec<f64>,
}

impl SampleSeries {
    pub fn new(time: Vec<f64>, voltage: Vec<f64>) -> Result<Self, AppError> {
        if time.len() != voltage.len() {
            return Err(AppError::data(format!(
                "Time and voltage lengths differ ({} vs {}).",
                time.len(),
                voltage.len()
            )));
        }
        Ok(Self { time, voltage })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn voltage(&self) -> &[f64] {
        &self.voltage
    }

    /// Borrow the whole capture as a slice pair.
    pub fn as_slice(&self) -> SeriesSlice<'_> {
        SeriesSlice {
            time: &self.time,
            voltage: &self.voltage,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.voltage.iter().copied())
    }
}

/// A borrowed, index-aligned view into a [`SampleSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSlice<'a> {
    pub time: &'a [f64],
    pub voltage: &'a [f64],
}

impl<'a> SeriesSlice<'a> {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + 'a {
        self.time.iter().copied().zip(self.voltage.iter().copied())
    }
}

/// Half-open index range `[lower, upper)` into a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub lower: usize,
    pub upper: usize,
}

impl Window {
    pub fn new(lower: usize, upper: usize) -> Result<Self, AppError> {
        if lower >= upper {
            return Err(AppError::data(format!(
                "Invalid window [{lower}, {upper}): lower index must be below upper index."
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn len(&self) -> usize {
        self.upper - self.lower
    }

    pub fn is_empty(&self) -> bool {
        self.upper <= self.lower
    }
}

/// Formats as `LO:HI`, the same form [`FromStr`] accepts.
impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lower, self.upper)
    }
}

/// Parses `LO:HI`, as accepted on the command line.
impl FromStr for Window {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lo, hi) = s
            .split_once(':')
            .ok_or_else(|| AppError::input(format!("Window '{s}' must look like LO:HI.")))?;
        let lo = lo
            .trim()
            .parse::<usize>()
            .map_err(|e| AppError::input(format!("Invalid window lower index '{lo}': {e}")))?;
        let hi = hi
            .trim()
            .parse::<usize>()
            .map_err(|e| AppError::input(format!("Invalid window upper index '{hi}': {e}")))?;
        Window::new(lo, hi).map_err(|e| AppError::input(e.message().to_string()))
    }
}

/// Sampled points for the error-bar overlay.
///
/// `magnitude` is one scalar applied to every point: the population standard
/// deviation of the full raw voltage series, not a per-point uncertainty.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBarSet {
    pub points: Vec<(f64, f64)>,
    pub magnitude: f64,
}

/// Which peak model to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Gaussian,
    Lorentzian,
}

impl ModelKind {
    pub fn param_len(self) -> usize {
        3
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Gaussian => "Gaussian",
            ModelKind::Lorentzian => "Lorentzian",
        }
    }

    pub fn param_names(self) -> [&'static str; 3] {
        match self {
            ModelKind::Gaussian => ["a", "x0", "sigma"],
            ModelKind::Lorentzian => ["a", "x0", "f"],
        }
    }
}

/// Output of one successful peak fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub model: ModelKind,
    /// Optimal `(amplitude, center, width)`.
    pub params: Vec<f64>,
    /// Row-major parameter covariance (`params.len()` square).
    pub covariance: Vec<Vec<f64>>,
    /// `sqrt(diag(covariance))`.
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals at the optimum.
    pub ssr: f64,
    /// Model evaluations spent by the solver.
    pub evaluations: usize,
}

/// Where to find the two numeric columns in each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub time_column: usize,
    pub voltage_column: usize,
    pub delimiter: u8,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            time_column: DEFAULT_TIME_COLUMN,
            voltage_column: DEFAULT_VOLTAGE_COLUMN,
            delimiter: b',',
        }
    }
}

/// Stride sampling used for the error-bar overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorBarSpec {
    pub stride: usize,
    /// Indices `[0, scan_len)` are scanned (clamped to the series length).
    pub scan_len: usize,
}

impl Default for ErrorBarSpec {
    fn default() -> Self {
        Self {
            stride: DEFAULT_ERRORBAR_STRIDE,
            scan_len: DEFAULT_ERRORBAR_SCAN_LEN,
        }
    }
}

/// Fully resolved configuration for one `scopefit analyze` run.
///
/// `Default` reproduces the fixed lab-report parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    pub layout: ColumnLayout,
    pub gauss_window: Window,
    pub lorentz_window: Window,
    pub errorbar: ErrorBarSpec,
    pub gauss_guess: [f64; 3],
    pub lorentz_guess: [f64; 3],
    /// Show the figures in the terminal, blocking on each.
    pub show: bool,
    /// Write the figures as SVG files into this directory.
    pub save_dir: Option<PathBuf>,
    /// Write a JSON report of both fits to this path.
    pub export: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            layout: ColumnLayout::default(),
            gauss_window: DEFAULT_GAUSS_WINDOW,
            lorentz_window: DEFAULT_LORENTZ_WINDOW,
            errorbar: ErrorBarSpec::default(),
            gauss_guess: DEFAULT_GAUSS_GUESS,
            lorentz_guess: DEFAULT_LORENTZ_GUESS,
            show: true,
            save_dir: None,
            export: None,
        }
    }
}
