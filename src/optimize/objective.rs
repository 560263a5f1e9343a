//! Black-box objective contract.

use crate::domain::EvalMode;
use crate::error::AppError;

/// A scalar objective driven toward `target`.
///
/// In `EvalMode::Abs` implementations return a magnitude comparable across
/// nearby points (typically `|value - target|`); in `EvalMode::True` they
/// return the raw value. Errors are handed back to the optimizer's caller
/// untouched.
pub trait Objective {
    fn evaluate(&mut self, point: &[f64], target: f64, mode: EvalMode) -> Result<f64, AppError>;
}

impl<F> Objective for F
where
    F: FnMut(&[f64], f64, EvalMode) -> Result<f64, AppError>,
{
    fn evaluate(&mut self, point: &[f64], target: f64, mode: EvalMode) -> Result<f64, AppError> {
        self(point, target, mode)
    }
}
