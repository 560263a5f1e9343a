//! Data providers that stand in for an external field solver.

pub mod synthetic;

pub use synthetic::*;
