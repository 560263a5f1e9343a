//! Discrete derivative of a complex-valued sequence.
//!
//! Interior samples use centered differences and the two boundary samples use
//! one-sided differences, so the output has the same length as the input.
//!
//! With `GradientSpacing::Frequency` the interior formula is the second-order
//! accurate one for non-uniform grids:
//!
//! ```text
//! g_i = (h_s^2 y_{i+1} + (h_d^2 - h_s^2) y_i - h_d^2 y_{i-1}) / (h_s h_d (h_s + h_d))
//! ```
//!
//! where `h_s = x_i - x_{i-1}` and `h_d = x_{i+1} - x_i`. Repeated frequencies
//! give zero denominators; the resulting NaN/inf is returned as-is.

use num_complex::Complex64;

use crate::domain::GradientSpacing;
use crate::error::AppError;

/// Gradient of `values` sampled at `frequencies`.
///
/// Requires at least two samples and matching lengths.
pub fn complex_gradient(
    frequencies: &[f64],
    values: &[Complex64],
    spacing: GradientSpacing,
) -> Result<Vec<Complex64>, AppError> {
    if frequencies.len() != values.len() {
        return Err(AppError::input(format!(
            "Frequency/value length mismatch: {} frequencies vs {} values.",
            frequencies.len(),
            values.len()
        )));
    }
    let n = values.len();
    if n < 2 {
        return Err(AppError::input(format!(
            "A gradient needs at least 2 samples, got {n}."
        )));
    }

    let mut out = Vec::with_capacity(n);
    match spacing {
        GradientSpacing::Index => {
            out.push(values[1] - values[0]);
            for i in 1..n - 1 {
                out.push((values[i + 1] - values[i - 1]) / 2.0);
            }
            out.push(values[n - 1] - values[n - 2]);
        }
        GradientSpacing::Frequency => {
            let x = frequencies;
            out.push((values[1] - values[0]) / (x[1] - x[0]));
            for i in 1..n - 1 {
                let hs = x[i] - x[i - 1];
                let hd = x[i + 1] - x[i];
                let numer = values[i + 1] * (hs * hs) + values[i] * (hd * hd - hs * hs)
                    - values[i - 1] * (hd * hd);
                out.push(numer / (hs * hd * (hs + hd)));
            }
            out.push((values[n - 1] - values[n - 2]) / (x[n - 1] - x[n - 2]));
        }
    }
    Ok(out)
}
