//! JSON export of an analysis run (`--export PATH`).
//!
//! Non-finite covariance entries (undetermined fits) serialize as `null`.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::domain::{FitResult, ModelKind, Window};
use crate::error::AppError;
use crate::fit::FitError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated: DateTime<Utc>,
    pub input: PathBuf,
    pub rows: usize,
    pub error_bar_magnitude: f64,
    pub fits: Vec<FitRecord>,
}

/// One fit: the window it ran on and either its result or the failure text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitRecord {
    pub model: ModelKind,
    /// `[lower, upper)` sample indices.
    pub window: [usize; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<FitResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FitRecord {
    pub fn new(model: ModelKind, window: Window, outcome: &Result<FitResult, FitError>) -> Self {
        let (result, error) = match outcome {
            Ok(fit) => (Some(fit.clone()), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            model,
            window: [window.lower, window.upper],
            result,
            error,
        }
    }
}

/// Write `report` as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &AnalysisReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::input(format!("Failed to write report JSON: {e}")))?;

    info!("wrote report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_records_success_and_failure() {
        let fit = FitResult {
            model: ModelKind::Lorentzian,
            params: vec![0.016, 0.0896, 0.0045],
            covariance: vec![vec![1e-8, 0.0, 0.0], vec![0.0, 1e-9, 0.0], vec![0.0, 0.0, f64::INFINITY]],
            std_errors: vec![1e-4, 3e-5, f64::INFINITY],
            ssr: 2e-4,
            evaluations: 9,
        };
        let report = AnalysisReport {
            generated: Utc::now(),
            input: PathBuf::from("capture.csv"),
            rows: 2500,
            error_bar_magnitude: 0.12,
            fits: vec![
                FitRecord::new(
                    ModelKind::Gaussian,
                    Window { lower: 980, upper: 981 },
                    &Err(FitError::TooFewPoints { points: 1, params: 3 }),
                ),
                FitRecord::new(ModelKind::Lorentzian, Window { lower: 2000, upper: 2500 }, &Ok(fit)),
            ],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_json(&path, &report).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["rows"], 2500);
        assert_eq!(json["fits"][0]["model"], "gaussian");
        assert!(json["fits"][0]["error"].as_str().unwrap().contains("1 points"));
        assert!(json["fits"][0].get("result").is_none());
        assert_eq!(json["fits"][1]["window"][1], 2500);
        assert!(json["fits"][1]["result"]["covariance"][2][2].is_null());
        assert!(json["generated"].as_str().is_some());
    }

    #[test]
    fn unwritable_path_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let report = AnalysisReport {
            generated: Utc::now(),
            input: PathBuf::new(),
            rows: 0,
            error_bar_magnitude: 0.0,
            fits: Vec::new(),
        };
        let err = write_report_json(&dir.path().join("missing/report.json"), &report).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }
}
