//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the capture representation (`SampleSeries`, `SeriesSlice`)
//! - windows and error-bar sets (`Window`, `ErrorBarSet`)
//! - fit outputs (`FitResult`, `ModelKind`)
//! - the run configuration and its fixed defaults (`AnalysisConfig`)

pub mod types;

pub use types::*;
