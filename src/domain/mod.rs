//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - configuration enums (`EvalMode`, `DisplayMode`, `GradientSpacing`, `ObjectiveModel`)
//! - admittance samples and intercepts (`SamplePoint`, `Intercept`)
//! - run outputs (`OptimizationResult`, `ImpedanceExtraction`)
//! - resolved run configurations (`OptimizeConfig`, `ImpedanceConfig`)

pub mod types;

pub use types::*;
