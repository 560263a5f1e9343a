//! Black-box quantization: effective port impedances from an admittance sweep.
//!
//! For an admittance curve `Y(ω)` the modes sit where `Im Y` crosses zero. At
//! each crossing `p` the effective impedance is
//!
//! ```text
//! Z_eff_p = 2 / (ω_p * Im Y'(ω_p))
//! ```
//!
//! (Nigg et al., "Black-box superconducting circuit quantization", PRL 108,
//! 240502, Eq. 4; see DESIGN.md for the sign/factor note.)
//!
//! Pipeline:
//! 1. discrete gradient of the curve
//! 2. intercept search (exact zeros kept verbatim, sign changes interpolated)
//! 3. `Z_eff` per intercept
//!
//! Zero denominators in step 3 are left to IEEE arithmetic, so a singular
//! intercept reports `±inf`/`NaN` instead of a substituted value.

use num_complex::Complex64;
use tracing::{debug, warn};

use crate::domain::{GradientSpacing, ImpedanceExtraction, Intercept, InterceptKind, SamplePoint};
use crate::error::AppError;
use crate::math::{complex_gradient, embed, zero_imag_intercept};
use crate::quantization::source::AdmittanceSource;

/// Attach gradient estimates to a frequency-ordered admittance curve.
///
/// Fewer than two samples yields an empty list.
pub fn sample_points(
    frequencies: &[f64],
    values: &[Complex64],
    spacing: GradientSpacing,
) -> Result<Vec<SamplePoint>, AppError> {
    if frequencies.len() != values.len() {
        return Err(AppError::input(format!(
            "Frequency/value length mismatch: {} frequencies vs {} values.",
            frequencies.len(),
            values.len()
        )));
    }
    if values.len() < 2 {
        return Ok(Vec::new());
    }

    let gradient = complex_gradient(frequencies, values, spacing)?;
    Ok(frequencies
        .iter()
        .zip(values)
        .zip(gradient)
        .map(|((&frequency, &value), gradient)| SamplePoint {
            frequency,
            value,
            gradient,
        })
        .collect())
}

/// Find every point where `Im Y` is zero or changes sign.
///
/// Samples are visited in order. A sample with `Im Y == 0` is kept verbatim;
/// otherwise a strictly negative product with the previous sample's `Im Y`
/// synthesizes an interpolated intercept from the pair.
pub fn find_intercepts(samples: &[SamplePoint]) -> Result<Vec<Intercept>, AppError> {
    if samples.len() < 2 {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for (i, sample) in samples.iter().enumerate() {
        if sample.value.im == 0.0 {
            out.push(Intercept {
                frequency: sample.frequency,
                value: sample.value,
                gradient: sample.gradient,
                kind: InterceptKind::Exact,
            });
        } else if i > 0 && samples[i - 1].value.im * sample.value.im < 0.0 {
            out.push(interpolate_intercept(&samples[i - 1], sample)?);
        }
    }
    Ok(out)
}

/// Synthesize an intercept between a sign-changing pair `prev -> post`.
///
/// The gradient is blended by distance in `(f, Re, Im)` space with crossed
/// weights: `post`'s gradient is weighted by `prev`'s normalized distance to
/// the intercept and `prev`'s gradient by `post`'s.
pub fn interpolate_intercept(prev: &SamplePoint, post: &SamplePoint) -> Result<Intercept, AppError> {
    let p = embed(prev.frequency, prev.value);
    let q = embed(post.frequency, post.value);
    let x = zero_imag_intercept(&p, &q)?;

    let dist_prev = (p - x).norm();
    let dist_post = (q - x).norm();
    let total = dist_prev + dist_post;

    let weight_post = dist_prev / total;
    let weight_prev = dist_post / total;
    let gradient = post.gradient * weight_post + prev.gradient * weight_prev;

    debug!(
        frequency = x.x,
        real = x.y,
        dist_prev,
        dist_post,
        "interpolated intercept"
    );

    Ok(Intercept {
        frequency: x.x,
        value: Complex64::new(x.y, 0.0),
        gradient,
        kind: InterceptKind::Interpolated,
    })
}

/// `Z_eff = 2 / (frequency * Im(gradient))` for one intercept.
pub fn effective_impedance(intercept: &Intercept) -> f64 {
    2.0 / (intercept.frequency * intercept.gradient.im)
}

/// Run the full extraction on one curve.
pub fn extract_effective_impedance(
    frequencies: &[f64],
    values: &[Complex64],
    spacing: GradientSpacing,
) -> Result<ImpedanceExtraction, AppError> {
    let samples = sample_points(frequencies, values, spacing)?;
    let mut extraction = extract_from_samples(&samples)?;
    extraction.samples = frequencies.len();
    Ok(extraction)
}

/// Extraction over samples whose gradients are already known.
pub fn extract_from_samples(samples: &[SamplePoint]) -> Result<ImpedanceExtraction, AppError> {
    let intercepts = find_intercepts(samples)?;
    let impedances: Vec<f64> = intercepts.iter().map(effective_impedance).collect();

    for (i, z) in impedances.iter().enumerate() {
        if !z.is_finite() {
            warn!(index = i, frequency = intercepts[i].frequency, "singular effective impedance");
        }
    }

    Ok(ImpedanceExtraction {
        intercepts,
        impedances,
        samples: samples.len(),
    })
}

/// Fetch the sweep for `port` once and extract its effective impedances.
pub fn calc_effective_impedance_for_port<S>(
    port: &str,
    source: &S,
    spacing: GradientSpacing,
) -> Result<ImpedanceExtraction, AppError>
where
    S: AdmittanceSource + ?Sized,
{
    let sweep = source.get_params(port)?;
    debug!(port, samples = sweep.frequencies.len(), "admittance sweep loaded");
    extract_effective_impedance(&sweep.frequencies, &sweep.values, spacing)
}
