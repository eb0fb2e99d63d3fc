//! Synthetic capture generation.
//!
//! Produces a two-peak waveform laid out like the scope export, so the whole
//! pipeline can be exercised without lab hardware. The Gaussian sits under the
//! default central window and the Lorentzian under the default right-most
//! window.

use std::io::Write;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::SampleSeries;
use crate::error::AppError;
use crate::models::{gauss_function, lorentz};

/// Generating parameters of a synthetic capture.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthSpec {
    pub rows: usize,
    /// Sample period in seconds; `time[i] = i * dt`.
    pub dt: f64,
    pub seed: u64,
    /// Standard deviation of additive Gaussian noise (V).
    pub noise: f64,
    pub baseline: f64,
    pub gauss_index: usize,
    pub gauss_amplitude: f64,
    /// Gaussian σ in samples.
    pub gauss_sigma_samples: f64,
    pub lorentz_index: usize,
    pub lorentz_amplitude: f64,
    /// Lorentzian full width at half maximum in seconds.
    pub lorentz_fwhm: f64,
}

impl Default for SynthSpec {
    fn default() -> Self {
        Self {
            rows: 2500,
            dt: 4e-5,
            seed: 42,
            noise: 1e-3,
            baseline: 0.0,
            gauss_index: 1070,
            gauss_amplitude: 1.0,
            gauss_sigma_samples: 20.0,
            lorentz_index: 2240,
            lorentz_amplitude: 0.016,
            lorentz_fwhm: 0.0045,
        }
    }
}

impl SynthSpec {
    /// True Gaussian `(a, x0, σ)` in time units.
    pub fn gauss_params(&self) -> [f64; 3] {
        [
            self.gauss_amplitude,
            self.gauss_index as f64 * self.dt,
            self.gauss_sigma_samples * self.dt,
        ]
    }

    /// True Lorentzian `(a, x0, f)` in time units.
    pub fn lorentz_params(&self) -> [f64; 3] {
        [
            self.lorentz_amplitude,
            self.lorentz_index as f64 * self.dt,
            self.lorentz_fwhm,
        ]
    }
}

/// Generate the capture described by `spec`.
pub fn generate_capture(spec: &SynthSpec) -> Result<SampleSeries, AppError> {
    if spec.rows == 0 {
        return Err(AppError::input("Synthetic capture needs at least one row."));
    }
    if !(spec.dt.is_finite() && spec.dt > 0.0) {
        return Err(AppError::input("Sample period must be finite and > 0."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, spec.noise.max(0.0))
        .map_err(|e| AppError::input(format!("Noise distribution error: {e}")))?;

    let g = spec.gauss_params();
    let l = spec.lorentz_params();

    let mut time = Vec::with_capacity(spec.rows);
    let mut voltage = Vec::with_capacity(spec.rows);
    for i in 0..spec.rows {
        let t = i as f64 * spec.dt;
        let v = spec.baseline
            + gauss_function(t, g[0], g[1], g[2])
            + lorentz(t, l[0], l[1], l[2])
            + normal.sample(&mut rng);
        time.push(t);
        voltage.push(v);
    }

    SampleSeries::new(time, voltage)
}

/// Write a capture in the scope layout: `index,0,0,time,voltage`, no header.
pub fn write_capture<W: Write>(out: W, series: &SampleSeries) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    for (i, (t, v)) in series.points().enumerate() {
        writer
            .write_record([i.to_string(), "0".to_string(), "0".to_string(), t.to_string(), v.to_string()])
            .map_err(|e| AppError::input(format!("Failed to write synthetic row {i}: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush synthetic capture: {e}")))?;
    Ok(())
}
