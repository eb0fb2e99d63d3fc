//! Input/output helpers.
//!
//! - capture CSV ingest (`ingest`)
//! - JSON run report (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
