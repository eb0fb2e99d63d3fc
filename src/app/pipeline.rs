//! The analysis workflow shared by the CLI and the integration tests.
//!
//! load -> error bars -> central window (Gaussian) -> right-most window
//! (baseline-corrected, Lorentzian)
//!
//! [`compute`] does the numeric work only; [`run_analysis`] adds console
//! reporting, figures and the optional JSON export around it. The overview
//! comes first, then both reports and the export, then one figure per
//! successful fit.

use std::io::Write;

use chrono::Utc;
use log::info;

use crate::data::{baseline_corrected, sample_error_bars, slice_window};
use crate::domain::{AnalysisConfig, ErrorBarSet, FitResult, ModelKind, SampleSeries, Window};
use crate::error::AppError;
use crate::fit::{FitError, fit_peak, predict_curve};
use crate::io::{AnalysisReport, FitRecord, load_capture, write_report_json};
use crate::math::min_value;
use crate::plot::{BaseChartData, Figure, FitChartData, save_figure_svg};
use crate::report::{format_fit_failure, format_fit_report};

/// One fit: its window, the exact data it was fitted to, and the outcome.
#[derive(Debug, Clone)]
pub struct PeakFit {
    pub model: ModelKind,
    pub window: Window,
    pub time: Vec<f64>,
    /// Fitted voltages; baseline-corrected for the Lorentzian.
    pub voltage: Vec<f64>,
    pub outcome: Result<FitResult, FitError>,
}

impl PeakFit {
    /// Fit figure data, or `None` when the fit failed.
    pub fn chart(&self) -> Option<FitChartData> {
        let fit = self.outcome.as_ref().ok()?;
        Some(FitChartData {
            model: self.model,
            data: self.time.iter().copied().zip(self.voltage.iter().copied()).collect(),
            curve: predict_curve(fit, &self.time),
        })
    }

    pub fn report(&self) -> String {
        match &self.outcome {
            Ok(fit) => format_fit_report(fit),
            Err(e) => format_fit_failure(self.model, e),
        }
    }

    fn record(&self) -> FitRecord {
        FitRecord::new(self.model, self.window, &self.outcome)
    }
}

/// Everything computed by one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub series: SampleSeries,
    pub error_bars: ErrorBarSet,
    pub gauss: PeakFit,
    pub lorentz: PeakFit,
}

impl AnalysisOutput {
    pub fn overview(&self, config: &AnalysisConfig) -> Result<Figure<'_>, AppError> {
        overview_figure(&self.series, &self.error_bars, config.gauss_window)
    }
}

/// Load the capture and sample the error-bar overlay.
pub fn load_stage(config: &AnalysisConfig) -> Result<(SampleSeries, ErrorBarSet), AppError> {
    let series = load_capture(&config.csv_path, &config.layout)?;
    if series.is_empty() {
        return Err(AppError::data(format!(
            "Capture '{}' contains no rows.",
            config.csv_path.display()
        )));
    }
    let error_bars = sample_error_bars(&series, config.errorbar)?;
    info!(
        "sampled {} error-bar points, magnitude {:.6}",
        error_bars.points.len(),
        error_bars.magnitude
    );
    Ok((series, error_bars))
}

/// Cut both windows and run both fits.
///
/// Window errors are fatal. Fit errors are kept per fit, so one failed fit
/// never prevents the other.
pub fn fit_stage(series: &SampleSeries, config: &AnalysisConfig) -> Result<(PeakFit, PeakFit), AppError> {
    let central = slice_window(series, config.gauss_window)?;
    let right = slice_window(series, config.lorentz_window)?;
    info!(
        "windows: central {} ({} samples), right-most {} ({} samples)",
        config.gauss_window,
        central.len(),
        config.lorentz_window,
        right.len()
    );

    let gauss = PeakFit {
        model: ModelKind::Gaussian,
        window: config.gauss_window,
        time: central.time.to_vec(),
        voltage: central.voltage.to_vec(),
        outcome: fit_peak(ModelKind::Gaussian, central.time, central.voltage, config.gauss_guess),
    };

    let baseline = min_value(series.voltage()).unwrap_or(0.0);
    let corrected = baseline_corrected(right.voltage, baseline);
    let lorentz = PeakFit {
        model: ModelKind::Lorentzian,
        window: config.lorentz_window,
        outcome: fit_peak(ModelKind::Lorentzian, right.time, &corrected, config.lorentz_guess),
        time: right.time.to_vec(),
        voltage: corrected,
    };

    Ok((gauss, lorentz))
}

/// The numeric part of an analysis run, without any output.
pub fn compute(config: &AnalysisConfig) -> Result<AnalysisOutput, AppError> {
    let (series, error_bars) = load_stage(config)?;
    let (gauss, lorentz) = fit_stage(&series, config)?;
    Ok(AnalysisOutput {
        series,
        error_bars,
        gauss,
        lorentz,
    })
}

/// Overview figure: the full trace with the `window` slice highlighted.
pub fn overview_figure<'a>(
    series: &'a SampleSeries,
    error_bars: &'a ErrorBarSet,
    window: Window,
) -> Result<Figure<'a>, AppError> {
    Ok(Figure::Overview(BaseChartData {
        raw: series.as_slice(),
        window: slice_window(series, window)?,
        error_bars,
    }))
}

/// Run the full analysis: console reports, figures and optional export.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisOutput, AppError> {
    run_analysis_to(config, &mut std::io::stdout().lock())
}

/// [`run_analysis`] with the console reports written to `out`.
///
/// Both reports and the export are written before any fit figure is
/// presented, so a rendering failure cannot hide either fit's result.
pub fn run_analysis_to<W: Write>(config: &AnalysisConfig, out: &mut W) -> Result<AnalysisOutput, AppError> {
    let (series, error_bars) = load_stage(config)?;

    present(&overview_figure(&series, &error_bars, config.gauss_window)?, config)?;

    let (gauss, lorentz) = fit_stage(&series, config)?;
    for peak in [&gauss, &lorentz] {
        writeln!(out, "{}", peak.report()).map_err(|e| AppError::render(format!("Failed to write report: {e}")))?;
    }

    let output = AnalysisOutput {
        series,
        error_bars,
        gauss,
        lorentz,
    };

    if let Some(path) = &config.export {
        let report = AnalysisReport {
            generated: Utc::now(),
            input: config.csv_path.clone(),
            rows: output.series.len(),
            error_bar_magnitude: output.error_bars.magnitude,
            fits: vec![output.gauss.record(), output.lorentz.record()],
        };
        write_report_json(path, &report)?;
    }

    for peak in [&output.gauss, &output.lorentz] {
        if let Some(chart) = peak.chart() {
            present(&Figure::Fit(chart), config)?;
        }
    }

    Ok(output)
}

/// Save and/or show one figure according to `config`.
fn present(figure: &Figure<'_>, config: &AnalysisConfig) -> Result<(), AppError> {
    if let Some(dir) = &config.save_dir {
        save_figure_svg(dir, figure)?;
    }
    if config.show {
        crate::tui::show_figure(figure)?;
    }
    Ok(())
}
