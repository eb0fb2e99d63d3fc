//! Fixed-index windowing of a capture.
//!
//! Windows are bounds-checked: an index past the end of the capture is an
//! error instead of a silently shorter slice.

use crate::domain::{SampleSeries, SeriesSlice, Window};
use crate::error::AppError;

/// Borrow `[window.lower, window.upper)` of both sequences.
pub fn slice_window<'a>(series: &'a SampleSeries, window: Window) -> Result<SeriesSlice<'a>, AppError> {
    if window.is_empty() {
        return Err(AppError::data(format!("Window {window} is empty.")));
    }
    if window.upper > series.len() {
        return Err(AppError::data(format!(
            "Window {window} exceeds capture length {}.",
            series.len()
        )));
    }

    let range = window.lower..window.upper;
    Ok(SeriesSlice {
        time: &series.time()[range.clone()],
        voltage: &series.voltage()[range],
    })
}

/// Subtract `baseline` from every voltage in the window.
///
/// Used to remove the DC offset before the Lorentzian fit, where the baseline
/// is the minimum voltage of the whole capture.
pub fn baseline_corrected(voltage: &[f64], baseline: f64) -> Vec<f64> {
    voltage.iter().map(|v| v - baseline).collect()
}
