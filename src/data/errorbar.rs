//! Stride sampling for the error-bar overlay.

use crate::domain::{ErrorBarSet, ErrorBarSpec, SampleSeries};
use crate::error::AppError;
use crate::math::population_std;

/// Pick samples `0, stride, 2·stride, …` below `min(len, scan_len)` and attach
/// the population standard deviation of the ENTIRE voltage series to every one
/// of them.
pub fn sample_error_bars(series: &SampleSeries, spec: ErrorBarSpec) -> Result<ErrorBarSet, AppError> {
    if spec.stride == 0 {
        return Err(AppError::data("Error-bar stride must be > 0."));
    }
    let magnitude = population_std(series.voltage())
        .ok_or_else(|| AppError::data("Cannot compute voltage spread of an empty or non-finite capture."))?;

    let end = spec.scan_len.min(series.len());
    let points = (0..end)
        .step_by(spec.stride)
        .map(|i| (series.time()[i], series.voltage()[i]))
        .collect();

    Ok(ErrorBarSet { points, magnitude })
}
