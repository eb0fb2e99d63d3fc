//! Console formatting for fit outcomes.
//!
//! Everything here returns `String` so callers decide where it goes and tests
//! can assert on it directly.

use crate::domain::{FitResult, ModelKind};
use crate::fit::FitError;

/// Scientific notation with a fixed mantissa width, so matrix columns line up.
fn sci(v: f64) -> String {
    if v.is_finite() {
        format!("{v:>13.6e}")
    } else {
        format!("{v:>13}")
    }
}

/// Format a square matrix one row per line, each row bracketed.
pub fn format_matrix(rows: &[Vec<f64>], indent: &str) -> String {
    let mut out = String::new();
    for row in rows {
        let cells: Vec<String> = row.iter().map(|&v| sci(v)).collect();
        out.push_str(&format!("{indent}[{} ]\n", cells.join(" ")));
    }
    out
}

/// Parameters, covariance matrix and standard errors of one fit.
pub fn format_fit_report(fit: &FitResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} fit ===\n", fit.model.display_name()));

    out.push_str("Parameters:\n");
    for ((name, value), err) in fit.model.param_names().iter().zip(&fit.params).zip(&fit.std_errors) {
        out.push_str(&format!("  {name:<6} = {} ± {}\n", sci(*value), sci(*err).trim_start()));
    }

    out.push_str("Covariance matrix:\n");
    out.push_str(&format_matrix(&fit.covariance, "  "));

    let errs: Vec<String> = fit.std_errors.iter().map(|&v| sci(v)).collect();
    out.push_str(&format!("Standard errors:\n  [{} ]\n", errs.join(" ")));

    out.push_str(&format!("SSR = {:.6e} ({} evaluations)\n", fit.ssr, fit.evaluations));
    out
}

/// The one-line report for a failed fit.
pub fn format_fit_failure(model: ModelKind, err: &FitError) -> String {
    format!("=== {} fit ===\nfit failed: {err}\n", model.display_name())
}
