//! Closed-form circuit models used as optimization objectives.
//!
//! Units follow the usual design-sheet conventions: inductance in nH,
//! capacitance in fF, frequencies in GHz, energies in MHz.
//!
//! Each model is a pure function of the design point. `ModelObjective` wraps one
//! as an `Objective`: `Abs` mode returns `|value - target|`, `True` mode the value.

use std::f64::consts::PI;

use num_complex::Complex64;

use crate::constants::physical;
use crate::domain::{EvalMode, ObjectiveModel};
use crate::error::AppError;
use crate::optimize::Objective;

const NANO: f64 = 1e-9;
const FEMTO: f64 = 1e-15;

/// Resonance frequency `1 / (2π sqrt(LC))` in GHz.
pub fn lc_frequency_ghz(inductance_nh: f64, capacitance_ff: f64) -> f64 {
    1.0 / (2.0 * PI * (inductance_nh * NANO * capacitance_ff * FEMTO).sqrt()) / 1e9
}

/// Characteristic impedance `sqrt(L/C)` in ohm.
pub fn lc_impedance_ohm(inductance_nh: f64, capacitance_ff: f64) -> f64 {
    (inductance_nh * NANO / (capacitance_ff * FEMTO)).sqrt()
}

/// Charging energy `E_C / h = e² / (2 C h)` in MHz.
pub fn charging_energy_mhz(capacitance_ff: f64) -> f64 {
    let k = physical();
    k.electron_charge * k.electron_charge / (2.0 * capacitance_ff * FEMTO * k.planck) / 1e6
}

/// Admittance of a parallel GLC tank at angular frequency `omega` (SI units).
pub fn parallel_lc_admittance(omega: f64, inductance: f64, capacitance: f64, conductance: f64) -> Complex64 {
    Complex64::new(conductance, omega * capacitance - 1.0 / (omega * inductance))
}

/// Evaluate `model` at `point`.
pub fn predict(model: ObjectiveModel, point: &[f64]) -> Result<f64, AppError> {
    if point.len() != model.dimension() {
        return Err(AppError::input(format!(
            "{} expects {} parameter(s), got {}.",
            model.display_name(),
            model.dimension(),
            point.len()
        )));
    }
    Ok(match model {
        ObjectiveModel::LcFrequency => lc_frequency_ghz(point[0], point[1]),
        ObjectiveModel::LcImpedance => lc_impedance_ohm(point[0], point[1]),
        ObjectiveModel::ChargingEnergy => charging_energy_mhz(point[0]),
    })
}

/// A built-in model exposed through the `Objective` contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelObjective {
    pub model: ObjectiveModel,
}

impl ModelObjective {
    pub fn new(model: ObjectiveModel) -> Self {
        Self { model }
    }
}

impl Objective for ModelObjective {
    fn evaluate(&mut self, point: &[f64], target: f64, mode: EvalMode) -> Result<f64, AppError> {
        let value = predict(self.model, point)?;
        Ok(match mode {
            EvalMode::Abs => (value - target).abs(),
            EvalMode::True => value,
        })
    }
}
