//! Console reporting of fit outcomes.

pub mod format;

pub use format::*;
