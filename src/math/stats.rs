//! Whole-series summary statistics.

/// Population standard deviation (divides by `n`, not `n - 1`).
///
/// Returns `None` for an empty slice or when any value is non-finite.
pub fn population_std(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    Some(var.sqrt())
}

/// Minimum of a slice, ignoring NaNs. `None` when nothing finite remains.
pub fn min_value(values: &[f64]) -> Option<f64> {
    let m = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::INFINITY, f64::min);
    if m.is_finite() { Some(m) } else { None }
}

/// `(min, max)` over finite values.
pub fn finite_range<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_std_matches_hand_computation() {
        // mean 5, squared deviations sum 32, n = 8 -> var 4
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std(&v).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(population_std(&[]), None);
        assert_eq!(population_std(&[3.0]), Some(0.0));
    }

    #[test]
    fn min_and_range() {
        assert_eq!(min_value(&[0.3, -0.2, f64::NAN, 0.1]), Some(-0.2));
        assert_eq!(min_value(&[]), None);
        assert_eq!(finite_range([1.0, f64::INFINITY, -3.0]), Some((-3.0, 1.0)));
    }
}
