//! Line intercepts in `(frequency, Re, Im)` space.
//!
//! Each admittance sample is embedded as the 3-vector `(f, Re Y, Im Y)`. A sign
//! change of `Im Y` between two consecutive samples is resolved by walking the
//! straight line through them back to the plane `Im = 0`.

use nalgebra::Vector3;
use num_complex::Complex64;

use crate::error::AppError;

/// Embed a sample as `(frequency, re, im)`.
pub fn embed(frequency: f64, value: Complex64) -> Vector3<f64> {
    Vector3::new(frequency, value.re, value.im)
}

/// Point on the line through `prev` and `post` whose imaginary coordinate is zero.
///
/// The line is parametrized from `post` along `d = post - prev`:
/// `x = post - t d` with `t = post.im / d.im`. Frequency and real coordinates
/// are solved independently with the same `t`.
pub fn zero_imag_intercept(prev: &Vector3<f64>, post: &Vector3<f64>) -> Result<Vector3<f64>, AppError> {
    let direction = post - prev;
    if direction.z == 0.0 {
        return Err(AppError::numeric(format!(
            "Cannot interpolate intercept: imaginary component of direction is zero between f={} and f={}.",
            prev.x, post.x
        )));
    }
    let t = post.z / direction.z;
    let frequency = post.x - t * direction.x;
    let real = post.y - t * direction.y;
    Ok(Vector3::new(frequency, real, 0.0))
}
