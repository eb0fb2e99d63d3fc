//! Small dense linear-algebra helpers for the nonlinear solver.
//!
//! Each Levenberg–Marquardt step solves a damped normal-equation system
//!
//! ```text
//! (JᵀJ + μ·D) δ = −Jᵀr
//! ```
//!
//! and the covariance estimate needs `(JᵀJ)⁺` at the optimum.
//!
//! Implementation choices:
//! - The damped system is symmetric positive definite for μ > 0, so we try a
//!   Cholesky factorization first.
//! - If Cholesky fails we fall back to SVD with progressively looser
//!   tolerances. (Nalgebra's `QR::solve` is intended for square systems and
//!   will panic for non-square matrices, so we never use it on `J` directly.)
//! - The covariance pseudo-inverse is built from the SVD of `J` itself rather
//!   than of `JᵀJ`, which squares the condition number.

use nalgebra::{DMatrix, DVector};

/// Solve a symmetric (ideally positive-definite) system `a · x = b`.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_symmetric(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    if let Some(chol) = a.clone().cholesky() {
        let x = chol.solve(b);
        if x.iter().all(|v| v.is_finite()) {
            return Some(x);
        }
    }

    let svd = a.clone().svd(true, true);
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(x) = svd.solve(b, tol) {
            if x.iter().all(|v| v.is_finite()) {
                return Some(x);
            }
        }
    }

    None
}

/// Singular values of `j`, largest first.
pub fn singular_values(j: &DMatrix<f64>) -> DVector<f64> {
    let mut s = j.clone().svd(false, false).singular_values;
    s.as_mut_slice()
        .sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    s
}

/// `true` when `j` has a zero column or its smallest singular value falls
/// below `eps · max(rows, cols) · s_max`.
pub fn is_rank_deficient(j: &DMatrix<f64>) -> bool {
    if j.column_iter().any(|c| c.norm() == 0.0) {
        return true;
    }
    let s = singular_values(j);
    if s.len() < j.ncols() {
        return true;
    }
    let s_max = s[0];
    let cutoff = f64::EPSILON * j.nrows().max(j.ncols()) as f64 * s_max;
    s_max.is_nan() || s_max <= 0.0 || s[s.len() - 1] <= cutoff
}

/// Moore–Penrose inverse of `JᵀJ`, computed from the thin SVD of `J`.
///
/// Singular values at or below `eps · max(rows, cols) · s_max` are treated as
/// zero, so the result stays finite for rank-deficient Jacobians.
pub fn gram_pseudo_inverse(j: &DMatrix<f64>) -> DMatrix<f64> {
    let cols = j.ncols();
    let svd = j.clone().svd(false, true);
    let Some(v_t) = svd.v_t else {
        return DMatrix::from_element(cols, cols, f64::INFINITY);
    };
    let s = &svd.singular_values;
    let s_max = s.iter().copied().fold(0.0, f64::max);
    let cutoff = f64::EPSILON * j.nrows().max(cols) as f64 * s_max;

    let mut out = DMatrix::<f64>::zeros(cols, cols);
    for (k, &sk) in s.iter().enumerate() {
        if sk <= cutoff {
            continue;
        }
        let v = v_t.row(k).transpose();
        out += (&v * v.transpose()) / (sk * sk);
    }
    out
}
