//! Figure construction and rendering.
//!
//! - `axes`: per-pass axis configuration and tick resolution
//! - `figure`: the backend-independent Plotters drawing routines
//! - `svg`: optional SVG persistence

pub mod axes;
pub mod figure;
pub mod svg;

pub use axes::{AxisConfig, TickFormat};
pub use figure::{BaseChartData, Figure, FitChartData, Palette, draw_figure};
pub use svg::{PlotError, save_figure_svg};
