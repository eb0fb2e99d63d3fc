//! Peak model evaluation for the Gaussian and Lorentzian shapes.
//!
//! The fitter relies on two primitive operations:
//! - evaluate `f(x; p)` (for residuals/plots)
//! - fill the Jacobian row `∂f/∂p` at `x` (for the solver)
//!
//! Both models take `p = (a, x0, w)`:
//!
//! - Gaussian:   `f = a · exp(−(x−x0)² / (2σ²))`, `w = σ`
//! - Lorentzian: `f = (0.5·a·f) / ((x−x0)² + (0.5·f)²)`, `w = f` (FWHM)

use crate::domain::ModelKind;

pub fn gauss_function(x: f64, a: f64, x0: f64, sigma: f64) -> f64 {
    a * (-(x - x0).powi(2) / (2.0 * sigma * sigma)).exp()
}

pub fn lorentz(x: f64, a: f64, x0: f64, f: f64) -> f64 {
    let half = 0.5 * f;
    (half * a) / ((x - x0).powi(2) + half * half)
}

/// Evaluate the model at `x`.
///
/// # Panics
/// Panics if `params` has fewer than `model.param_len()` entries.
pub fn evaluate(model: ModelKind, x: f64, params: &[f64]) -> f64 {
    match model {
        ModelKind::Gaussian => gauss_function(x, params[0], params[1], params[2]),
        ModelKind::Lorentzian => lorentz(x, params[0], params[1], params[2]),
    }
}

/// Fill `out` with `∂f/∂(a, x0, w)` at `x`.
///
/// # Panics
/// Panics if `params` or `out` are shorter than `model.param_len()`.
pub fn fill_jacobian_row(model: ModelKind, x: f64, params: &[f64], out: &mut [f64]) {
    let (a, x0, w) = (params[0], params[1], params[2]);
    let dx = x - x0;
    match model {
        ModelKind::Gaussian => {
            let s2 = w * w;
            let e = (-dx * dx / (2.0 * s2)).exp();
            out[0] = e;
            out[1] = a * e * dx / s2;
            out[2] = a * e * dx * dx / (s2 * w);
        }
        ModelKind::Lorentzian => {
            let half = 0.5 * w;
            let d = dx * dx + half * half;
            out[0] = half / d;
            out[1] = a * half * 2.0 * dx / (d * d);
            // d/dw [0.5 a w / (dx² + w²/4)] = 0.5 a (dx² − w²/4) / d²
            out[2] = 0.5 * a * (dx * dx - half * half) / (d * d);
        }
    }
}

/// Map parameters to their canonical sign.
///
/// The Gaussian is even in σ, and the Lorentzian is unchanged when `a` and
/// `f` flip sign together. Returns the per-parameter sign factors applied, so
/// a covariance can be transformed the same way.
pub fn canonicalize(model: ModelKind, params: &mut [f64]) -> [f64; 3] {
    match model {
        ModelKind::Gaussian if params[2] < 0.0 => {
            params[2] = -params[2];
            [1.0, 1.0, -1.0]
        }
        ModelKind::Lorentzian if params[2] < 0.0 => {
            params[0] = -params[0];
            params[2] = -params[2];
            [-1.0, 1.0, -1.0]
        }
        _ => [1.0, 1.0, 1.0],
    }
}
