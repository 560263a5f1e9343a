//! Mathematical utilities: discrete derivatives and intercept geometry.

pub mod geometry;
pub mod gradient;

pub use geometry::*;
pub use gradient::*;
