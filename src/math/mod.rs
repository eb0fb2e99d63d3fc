//! Mathematical utilities: summary statistics, dense linear algebra, and the
//! Levenberg–Marquardt solver.

pub mod linalg;
pub mod lm;
pub mod stats;

pub use linalg::*;
pub use lm::*;
pub use stats::*;
