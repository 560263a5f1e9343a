//! Synthetic admittance sweeps of a parallel GLC tank.
//!
//! Useful as a stand-in for a field solver: the true mode frequency is
//! `1/sqrt(LC)` and the true effective impedance is `sqrt(L/C)`, so the
//! extractor can be checked end to end.

use std::collections::BTreeMap;

use num_complex::Complex64;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::SyntheticConfig;
use crate::error::AppError;
use crate::models::parallel_lc_admittance;
use crate::quantization::{AdmittanceSource, AdmittanceSweep};

/// Serves the same synthetic sweep for every port name.
#[derive(Debug, Clone)]
pub struct SyntheticLcSource {
    config: SyntheticConfig,
}

impl SyntheticLcSource {
    pub fn new(config: SyntheticConfig) -> Result<Self, AppError> {
        let c = &config;
        if !(c.inductance.is_finite() && c.inductance > 0.0 && c.capacitance.is_finite() && c.capacitance > 0.0) {
            return Err(AppError::input("Inductance and capacitance must be finite and > 0."));
        }
        if !(c.omega_min.is_finite() && c.omega_max.is_finite() && c.omega_min > 0.0 && c.omega_max > c.omega_min) {
            return Err(AppError::input(format!(
                "Invalid frequency range: min={}, max={} (must be finite, >0, and max>min).",
                c.omega_min, c.omega_max
            )));
        }
        if c.points < 2 {
            return Err(AppError::input("Synthetic sweep needs at least 2 points."));
        }
        if !(c.noise.is_finite() && c.noise >= 0.0) {
            return Err(AppError::input("Noise level must be finite and >= 0."));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// Mode frequency `1/sqrt(LC)` (rad/s).
    pub fn resonance(&self) -> f64 {
        1.0 / (self.config.inductance * self.config.capacitance).sqrt()
    }

    /// Effective impedance `sqrt(L/C)` (ohm).
    pub fn characteristic_impedance(&self) -> f64 {
        (self.config.inductance / self.config.capacitance).sqrt()
    }

    pub fn sweep(&self) -> Result<AdmittanceSweep, AppError> {
        let c = &self.config;
        let mut rng = StdRng::seed_from_u64(c.seed);
        // `new` already checked that `noise` is finite and >= 0.
        let normal = Normal::new(0.0, c.noise)
            .map_err(|e| AppError::numeric(format!("Noise distribution error: {e}")))?;

        let step = (c.omega_max - c.omega_min) / (c.points as f64 - 1.0);
        let mut frequencies = Vec::with_capacity(c.points);
        let mut values = Vec::with_capacity(c.points);
        for i in 0..c.points {
            let omega = c.omega_min + step * i as f64;
            let mut y = parallel_lc_admittance(omega, c.inductance, c.capacitance, c.conductance);
            if c.noise > 0.0 {
                y += Complex64::new(0.0, normal.sample(&mut rng));
            }
            frequencies.push(omega);
            values.push(y);
        }

        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), "synthetic-glc".to_string());
        metadata.insert("inductance_h".to_string(), format!("{:e}", c.inductance));
        metadata.insert("capacitance_f".to_string(), format!("{:e}", c.capacitance));
        metadata.insert("seed".to_string(), c.seed.to_string());

        Ok(AdmittanceSweep {
            frequencies,
            values,
            metadata,
        })
    }
}

impl AdmittanceSource for SyntheticLcSource {
    fn get_params(&self, _name: &str) -> Result<AdmittanceSweep, AppError> {
        self.sweep()
    }
}
