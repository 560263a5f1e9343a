//! Derivative-free design-parameter optimization.
//!
//! Responsibilities:
//!
//! - the black-box objective contract (`objective`)
//! - finite-difference gradients (`derivative`)
//! - Adadelta descent with box constraints (`adadelta`)
//! - progress hooks (`observer`)

pub mod adadelta;
pub mod derivative;
pub mod objective;
pub mod observer;

pub use adadelta::*;
pub use derivative::*;
pub use objective::*;
pub use observer::*;
