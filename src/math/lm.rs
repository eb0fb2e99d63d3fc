//! Levenberg–Marquardt nonlinear least squares.
//!
//! Minimizes `F(p) = ½ Σ r_i(p)²` for a residual vector `r` with a known
//! Jacobian `J = ∂r/∂p`. Each iteration solves
//!
//! ```text
//! (JᵀJ + μ·D) δ = −Jᵀr
//! ```
//!
//! where `D` is the running maximum of `diag(JᵀJ)` (Marquardt scaling, so the
//! damping is invariant to the units of each parameter). Step acceptance and
//! the μ update follow the gain-ratio rule of Nielsen:
//!
//! - `ρ = (F(p) − F(p+δ)) / (L(0) − L(δ))`
//! - accepted (`ρ > 0`): `μ ← μ · max(1/3, 1 − (2ρ − 1)³)`, `ν ← 2`
//! - rejected: `μ ← μ · ν`, `ν ← 2ν`
//!
//! `μ` starts at `1e-3`; `D` already carries each parameter's scale.
//!
//! Stopping rules: `‖Jᵀr‖∞ ≤ gtol`, an exact zero residual, and, checked only
//! after a trial step has been evaluated, `‖δ‖ ≤ xtol (‖p‖ + xtol)` or
//! relative actual and predicted reductions both `≤ ftol`.
//! Running out of residual evaluations is a failure, not a result.

use log::debug;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

use crate::math::linalg::{is_rank_deficient, solve_symmetric};

/// Solver tolerances and budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmOptions {
    /// Maximum number of residual evaluations.
    pub max_evaluations: usize,
    pub ftol: f64,
    pub xtol: f64,
    pub gtol: f64,
}

impl LmOptions {
    /// Defaults sized for `n_params` parameters: `200 · (n_params + 1)`
    /// evaluations and `1.49012e-8` relative tolerances.
    pub fn for_params(n_params: usize) -> Self {
        Self {
            max_evaluations: 200 * (n_params + 1),
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            gtol: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ZeroResidual,
    SmallGradient,
    SmallStep,
    SmallReduction,
}

#[derive(Debug, Clone)]
pub struct LmOutcome {
    pub params: DVector<f64>,
    pub residuals: DVector<f64>,
    /// Jacobian at `params`.
    pub jacobian: DMatrix<f64>,
    pub evaluations: usize,
    pub iterations: usize,
    pub reason: StopReason,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LmError {
    #[error("Jacobian is singular at the initial guess")]
    SingularJacobian,
    #[error("damped step could not be solved (Jacobian singular at iteration {iteration})")]
    SingularStep { iteration: usize },
    #[error("residuals or Jacobian are not finite at the initial guess")]
    NonFinite,
    #[error("number of residual evaluations reached {evaluations} without convergence")]
    MaxEvaluations { evaluations: usize },
}

/// Run Levenberg–Marquardt from `p0`.
///
/// `residual(p)` returns `r(p)`; `jacobian(p)` returns `∂r/∂p` with one row
/// per residual.
pub fn levenberg_marquardt<R, J>(
    p0: DVector<f64>,
    mut residual: R,
    mut jacobian: J,
    opts: &LmOptions,
) -> Result<LmOutcome, LmError>
where
    R: FnMut(&DVector<f64>) -> DVector<f64>,
    J: FnMut(&DVector<f64>) -> DMatrix<f64>,
{
    let mut p = p0;
    let mut evaluations = 1usize;
    let mut r = residual(&p);
    let mut jac = jacobian(&p);

    if !all_finite(r.iter()) || !all_finite(jac.iter()) {
        return Err(LmError::NonFinite);
    }
    if is_rank_deficient(&jac) {
        return Err(LmError::SingularJacobian);
    }

    let mut f = 0.5 * r.norm_squared();
    let mut a = jac.tr_mul(&jac);
    let mut g = jac.tr_mul(&r);
    let mut diag = a.diagonal();

    // D already carries the scale of each parameter, so μ is dimensionless.
    let mut mu = 1e-3_f64;
    let mut nu = 2.0_f64;
    let mut iterations = 0usize;

    let reason = loop {
        if f == 0.0 {
            break StopReason::ZeroResidual;
        }
        if g.amax() <= opts.gtol {
            break StopReason::SmallGradient;
        }
        iterations += 1;

        let mut damped = a.clone();
        for i in 0..damped.nrows() {
            damped[(i, i)] += mu * diag[i];
        }
        let Some(delta) = solve_symmetric(&damped, &(-&g)) else {
            mu *= nu;
            nu *= 2.0;
            if !mu.is_finite() {
                return Err(LmError::SingularStep { iteration: iterations });
            }
            continue;
        };

        if evaluations >= opts.max_evaluations {
            return Err(LmError::MaxEvaluations { evaluations });
        }
        let p_new = &p + &delta;
        let r_new = residual(&p_new);
        evaluations += 1;

        let f_new = if all_finite(r_new.iter()) {
            0.5 * r_new.norm_squared()
        } else {
            f64::INFINITY
        };

        // L(0) − L(δ) = ½ δᵀ(μ D δ − g)
        let predicted = 0.5 * delta.dot(&(diag.component_mul(&delta) * mu - &g));
        let rho = if predicted > 0.0 { (f - f_new) / predicted } else { -1.0 };
        let actual_rel = (f - f_new) / f;
        let predicted_rel = predicted / f;

        if rho > 0.0 {
            p = p_new;
            r = r_new;
            f = f_new;
            jac = jacobian(&p);
            if !all_finite(jac.iter()) {
                return Err(LmError::SingularStep { iteration: iterations });
            }
            a = jac.tr_mul(&jac);
            g = jac.tr_mul(&r);
            diag = diag.zip_map(&a.diagonal(), f64::max);

            mu *= (1.0_f64 / 3.0).max(1.0 - (2.0 * rho - 1.0).powi(3));
            nu = 2.0;
        } else {
            mu *= nu;
            nu *= 2.0;
            if !mu.is_finite() {
                return Err(LmError::SingularStep { iteration: iterations });
            }
        }

        // Tested only on a step that was actually evaluated.
        if actual_rel.abs() <= opts.ftol && predicted_rel <= opts.ftol && rho <= 2.0 {
            break StopReason::SmallReduction;
        }
        if delta.norm() <= opts.xtol * (p.norm() + opts.xtol) {
            break StopReason::SmallStep;
        }
    };

    debug!(
        "levenberg-marquardt stopped ({reason:?}) after {iterations} iterations, {evaluations} evaluations, ssr={:.6e}",
        2.0 * f
    );

    Ok(LmOutcome {
        params: p,
        residuals: r,
        jacobian: jac,
        evaluations,
        iterations,
        reason,
    })
}

fn all_finite<'a, I: IntoIterator<Item = &'a f64>>(values: I) -> bool {
    values.into_iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// y = b0 · exp(b1 · x) on exact data.
    fn exp_problem() -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|&t| 3.0 * (-1.5 * t).exp()).collect();
        (x, y)
    }

    fn run(x: &[f64], y: &[f64], p0: [f64; 2], opts: &LmOptions) -> Result<LmOutcome, LmError> {
        levenberg_marquardt(
            DVector::from_row_slice(&p0),
            |p| DVector::from_iterator(x.len(), x.iter().zip(y).map(|(&t, &yi)| p[0] * (p[1] * t).exp() - yi)),
            |p| {
                let mut j = DMatrix::zeros(x.len(), 2);
                for (i, &t) in x.iter().enumerate() {
                    let e = (p[1] * t).exp();
                    j[(i, 0)] = e;
                    j[(i, 1)] = p[0] * t * e;
                }
                j
            },
            opts,
        )
    }

    #[test]
    fn recovers_exponential_decay() {
        let (x, y) = exp_problem();
        let out = run(&x, &y, [1.0, -0.5], &LmOptions::for_params(2)).unwrap();
        assert!((out.params[0] - 3.0).abs() < 1e-6, "{:?}", out.params);
        assert!((out.params[1] + 1.5).abs() < 1e-6, "{:?}", out.params);
        assert!(out.evaluations <= 600);
    }

    #[test]
    fn badly_scaled_problem_converges() {
        // y = (a / τ) · exp(−t / τ) with a = 0.02, τ = 0.002: parameters near
        // 1e-2 while ∂y/∂τ reaches several thousand.
        let t: Vec<f64> = (0..60).map(|i| i as f64 * 1e-4).collect();
        let model = |a: f64, tau: f64, t: f64| a / tau * (-t / tau).exp();
        let y: Vec<f64> = t.iter().map(|&ti| model(0.02, 0.002, ti)).collect();

        let out = levenberg_marquardt(
            DVector::from_row_slice(&[0.025, 0.0025]),
            |p| DVector::from_iterator(t.len(), t.iter().zip(&y).map(|(&ti, &yi)| model(p[0], p[1], ti) - yi)),
            |p| {
                let mut j = DMatrix::zeros(t.len(), 2);
                for (i, &ti) in t.iter().enumerate() {
                    let e = (-ti / p[1]).exp();
                    j[(i, 0)] = e / p[1];
                    j[(i, 1)] = p[0] * e * (ti - p[1]) / p[1].powi(3);
                }
                j
            },
            &LmOptions::for_params(2),
        )
        .unwrap();

        assert!(out.evaluations > 1);
        assert!(((out.params[0] - 0.02) / 0.02).abs() < 1e-6, "{:?}", out.params);
        assert!(((out.params[1] - 0.002) / 0.002).abs() < 1e-6, "{:?}", out.params);
    }

    #[test]
    fn exhausted_budget_is_an_error() {
        let (x, y) = exp_problem();
        let opts = LmOptions {
            max_evaluations: 2,
            ..LmOptions::for_params(2)
        };
        let err = run(&x, &y, [1.0, -0.5], &opts).unwrap_err();
        assert_eq!(err, LmError::MaxEvaluations { evaluations: 2 });
    }

    #[test]
    fn zero_jacobian_column_is_singular() {
        let (x, y) = exp_problem();
        // b0 = 0 zeroes the second Jacobian column.
        let err = run(&x, &y, [0.0, -0.5], &LmOptions::for_params(2)).unwrap_err();
        assert_eq!(err, LmError::SingularJacobian);
    }
}
