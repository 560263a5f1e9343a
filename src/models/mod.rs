//! Closed-form superconducting-circuit models.
//!
//! Models are implemented as small, pure functions so that optimization and
//! synthetic-data code can stay generic.

pub mod model;

pub use model::*;
