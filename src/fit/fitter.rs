//! Peak fitting for a single window.
//!
//! Given:
//! - window times `x_i`
//! - window voltages `y_i`
//! - a model kind and an initial guess `p0 = (a, x0, w)`
//!
//! we minimize `Σ (f(x_i; p) − y_i)²` with Levenberg–Marquardt and derive
//!
//! ```text
//! pcov = (JᵀJ)⁺ · SSR / (n − p)
//! perr = sqrt(diag(pcov))
//! ```
//!
//! One attempt per call: no retries and no guess refinement.

use log::{info, warn};
use nalgebra::{DMatrix, DVector};

use crate::domain::{FitResult, ModelKind};
use crate::fit::FitError;
use crate::math::{LmOptions, gram_pseudo_inverse, levenberg_marquardt};
use crate::models::{canonicalize, evaluate, fill_jacobian_row};

/// Fit `model` to `(x, y)` starting from `guess`.
pub fn fit_peak(model: ModelKind, x: &[f64], y: &[f64], guess: [f64; 3]) -> Result<FitResult, FitError> {
    fit_peak_with(model, x, y, guess, &LmOptions::for_params(model.param_len()))
}

/// [`fit_peak`] with explicit solver options.
pub fn fit_peak_with(
    model: ModelKind,
    x: &[f64],
    y: &[f64],
    guess: [f64; 3],
    opts: &LmOptions,
) -> Result<FitResult, FitError> {
    let n = x.len();
    let p = model.param_len();

    if y.len() != n {
        return Err(FitError::LengthMismatch { x: n, y: y.len() });
    }
    if n < p {
        return Err(FitError::TooFewPoints { points: n, params: p });
    }
    if x.iter().chain(y).chain(guess.iter()).any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite);
    }

    let outcome = levenberg_marquardt(
        DVector::from_row_slice(&guess),
        |params| model_residuals(model, x, y, params.as_slice()),
        |params| model_jacobian(model, x, params.as_slice()),
        opts,
    )
    .inspect_err(|e| warn!("{} fit failed: {e}", model.display_name()))?;

    let ssr = outcome.residuals.norm_squared();
    let dof = n - p;
    let mut covariance = if dof == 0 {
        DMatrix::from_element(p, p, f64::INFINITY)
    } else {
        gram_pseudo_inverse(&outcome.jacobian) * (ssr / dof as f64)
    };
    if covariance.iter().any(|v| v.is_nan()) {
        covariance.fill(f64::INFINITY);
    }

    let mut params: Vec<f64> = outcome.params.iter().copied().collect();
    let signs = canonicalize(model, &mut params);
    for i in 0..p {
        for j in 0..p {
            covariance[(i, j)] *= signs[i] * signs[j];
        }
    }

    let std_errors = (0..p).map(|i| covariance[(i, i)].sqrt()).collect();
    let covariance = (0..p)
        .map(|i| covariance.row(i).iter().copied().collect())
        .collect();

    info!(
        "{} fit converged ({:?}): params={params:?} ssr={ssr:.6e} evaluations={}",
        model.display_name(),
        outcome.reason,
        outcome.evaluations
    );

    Ok(FitResult {
        model,
        params,
        covariance,
        std_errors,
        ssr,
        evaluations: outcome.evaluations,
    })
}

/// Evaluate a fitted model on `x`.
pub fn predict_curve(fit: &FitResult, x: &[f64]) -> Vec<(f64, f64)> {
    x.iter()
        .map(|&xi| (xi, evaluate(fit.model, xi, &fit.params)))
        .collect()
}

fn model_residuals(model: ModelKind, x: &[f64], y: &[f64], params: &[f64]) -> DVector<f64> {
    DVector::from_iterator(
        x.len(),
        x.iter().zip(y).map(|(&xi, &yi)| evaluate(model, xi, params) - yi),
    )
}

fn model_jacobian(model: ModelKind, x: &[f64], params: &[f64]) -> DMatrix<f64> {
    let p = model.param_len();
    let mut jac = DMatrix::<f64>::zeros(x.len(), p);
    let mut row = vec![0.0; p];
    for (i, &xi) in x.iter().enumerate() {
        fill_jacobian_row(model, xi, params, &mut row);
        for j in 0..p {
            jac[(i, j)] = row[j];
        }
    }
    jac
}
