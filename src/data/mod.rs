//! Operations on a loaded capture: windowing, error-bar sampling, and the
//! synthetic capture generator.

pub mod errorbar;
pub mod synth;
pub mod window;

pub use errorbar::*;
pub use synth::{SynthSpec, generate_capture, write_capture};
pub use window::*;
