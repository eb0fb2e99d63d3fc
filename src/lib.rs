//! `scope-fit` library crate.
//!
//! The binary (`scopefit`) is a thin wrapper around this library so that the
//! loading, windowing and fitting code is testable without spawning processes
//! or opening a terminal.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
