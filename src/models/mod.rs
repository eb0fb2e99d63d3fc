//! Peak model implementations.
//!
//! Models are implemented as small, pure functions so that fitting code can
//! stay generic over the model kind.

pub mod model;

pub use model::*;
