//! Peak fitting: model + window + initial guess in, parameters and their
//! covariance out.

use thiserror::Error;

use crate::math::LmError;

pub mod fitter;

pub use fitter::*;

/// Why a single fit produced no result.
///
/// A failed fit is reported for that fit only; it never aborts the other fit
/// or the raw-data figure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("improper input: {points} points cannot determine {params} parameters")]
    TooFewPoints { points: usize, params: usize },
    #[error("x and y lengths differ ({x} vs {y})")]
    LengthMismatch { x: usize, y: usize },
    #[error("data or initial guess contain non-finite values")]
    NonFinite,
    #[error("Jacobian is singular at the initial guess")]
    SingularJacobian,
    #[error("optimal parameters not found: {evaluations} model evaluations without convergence")]
    NotConverged { evaluations: usize },
    #[error("optimal parameters not found: damped step singular at iteration {iteration}")]
    SingularStep { iteration: usize },
}

impl From<LmError> for FitError {
    fn from(err: LmError) -> Self {
        match err {
            LmError::SingularJacobian => FitError::SingularJacobian,
            LmError::NonFinite => FitError::NonFinite,
            LmError::MaxEvaluations { evaluations } => FitError::NotConverged { evaluations },
            LmError::SingularStep { iteration } => FitError::SingularStep { iteration },
        }
    }
}
