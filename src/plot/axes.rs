//! Axis configuration for the base chart.
//!
//! The overview figure draws the same chart twice; only the axes differ. An
//! [`AxisConfig`] carries exactly the options that vary between the two
//! passes: limits, tick spacing, and label format. Anything left `None` is
//! derived from the data.

use std::ops::Range;

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;

use crate::math::finite_range;

/// Tick label format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    /// Fixed number of decimals.
    Fixed(usize),
}

impl TickFormat {
    pub fn format(self, v: f64) -> String {
        match self {
            TickFormat::Fixed(decimals) => format!("{v:.decimals$}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisConfig {
    pub x_limits: Option<(f64, f64)>,
    pub x_tick_step: Option<f64>,
    pub y_limits: Option<(f64, f64)>,
    pub y_tick_step: Option<f64>,
    pub y_format: Option<TickFormat>,
}

impl AxisConfig {
    /// The zoomed second pass of the overview: y ∈ [0, 0.15] every 0.014 V
    /// with two decimals, x ∈ [0, 0.1] every 0.01 s.
    pub fn rescaled() -> Self {
        Self {
            x_limits: Some((0.0, 0.1)),
            x_tick_step: Some(0.01),
            y_limits: Some((0.0, 0.15)),
            y_tick_step: Some(0.014),
            y_format: Some(TickFormat::Fixed(2)),
        }
    }
}

/// Fully resolved axis: bounds, tick positions, and label format.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAxis {
    pub lo: f64,
    pub hi: f64,
    pub ticks: Vec<f64>,
    pub format: TickFormat,
}

impl ResolvedAxis {
    /// Use `limits` when given, otherwise the padded range of `values`.
    pub fn resolve<I>(limits: Option<(f64, f64)>, step: Option<f64>, format: Option<TickFormat>, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (lo, hi) = match limits {
            Some((lo, hi)) if lo.is_finite() && hi.is_finite() && hi > lo => (lo, hi),
            _ => finite_range(values)
                .map(|(lo, hi)| pad_range(lo, hi, 0.05))
                .unwrap_or((0.0, 1.0)),
        };

        let step = step
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or_else(|| nice_step((hi - lo) / 5.0));
        let format = format.unwrap_or(TickFormat::Fixed(auto_decimals(step)));

        Self {
            lo,
            hi,
            ticks: tick_positions(lo, hi, step),
            format,
        }
    }
}

impl ResolvedAxis {
    /// Plotters coordinate for this axis; its key points are exactly `ticks`.
    pub fn coord(&self) -> TickedRange {
        TickedRange {
            inner: (self.lo..self.hi).into(),
            ticks: self.ticks.clone(),
        }
    }
}

/// A linear `f64` axis whose tick positions are fixed in advance.
///
/// Uses default formatting so mesh label formatters apply; `WithKeyPoints`
/// does not.
#[derive(Clone)]
pub struct TickedRange {
    inner: RangedCoordf64,
    ticks: Vec<f64>,
}

impl Ranged for TickedRange {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    /// All ticks when they fit the hint, otherwise every k-th tick.
    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        let max = hint.max_num_points();
        if max == 0 || self.ticks.is_empty() {
            return Vec::new();
        }
        let stride = self.ticks.len().div_ceil(max);
        self.ticks.iter().copied().step_by(stride).collect()
    }

    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

/// Multiples of `step` inside `[lo, hi]`.
pub fn tick_positions(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    const MAX_TICKS: i64 = 200;
    if !(step.is_finite() && step > 0.0) || hi < lo {
        return Vec::new();
    }
    let slack = (hi - lo) * 1e-9;
    let first = ((lo - slack) / step).ceil() as i64;
    let last = ((hi + slack) / step).floor() as i64;
    if last - first > MAX_TICKS {
        return Vec::new();
    }
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Round a raw spacing up to 1, 2, or 5 × 10ⁿ.
pub fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

fn auto_decimals(step: f64) -> usize {
    if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescaled_ticks() {
        let y = ResolvedAxis::resolve(Some((0.0, 0.15)), Some(0.014), Some(TickFormat::Fixed(2)), std::iter::empty());
        assert_eq!(y.ticks.len(), 11);
        assert!((y.ticks[10] - 0.14).abs() < 1e-12);
        assert_eq!(y.format.format(y.ticks[1]), "0.01");

        let x = ResolvedAxis::resolve(Some((0.0, 0.1)), Some(0.01), None, std::iter::empty());
        assert_eq!(x.ticks.len(), 11);
        assert_eq!(x.format.format(0.03), "0.03");
    }

    #[test]
    fn auto_axis_pads_data_range() {
        let axis = ResolvedAxis::resolve(None, None, None, [0.0, 1.0, f64::NAN, 0.5]);
        assert!(axis.lo < 0.0 && axis.hi > 1.0);
        // span 1.1 / 5 = 0.22 rounds up to a 0.5 step
        assert_eq!(axis.ticks, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn ticked_range_keeps_exact_ticks() {
        let y = ResolvedAxis::resolve(Some((0.0, 0.15)), Some(0.014), Some(TickFormat::Fixed(2)), std::iter::empty());
        let coord = y.coord();
        assert_eq!(coord.key_points(20usize), y.ticks);
        assert_eq!(coord.key_points(6usize).len(), 6);
        assert_eq!(coord.range(), 0.0..0.15);
        assert_eq!(coord.map(&0.0, (0, 150)), 0);
        assert_eq!(coord.map(&0.15, (0, 150)), 150);
    }

    #[test]
    fn nice_steps() {
        assert!((nice_step(0.013) - 0.02).abs() < 1e-15);
        assert_eq!(nice_step(3.0), 5.0);
        assert_eq!(nice_step(0.0), 1.0);
    }
}
