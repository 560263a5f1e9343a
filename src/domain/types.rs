//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during optimization and extraction
//! - exported to JSON/CSV
//! - reused by library callers without going through the CLI

use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// How an objective is asked to report its value.
///
/// The gradient estimator uses `Abs` (distance from target, so perturbed
/// readings are comparable); each accepted candidate is scored with `True`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalMode {
    Abs,
    True,
}

impl EvalMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EvalMode::Abs => "abs",
            EvalMode::True => "true",
        }
    }
}

/// Closed box constraint `[min, max]` for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// NaN coordinates are treated as inside: they never trigger early termination.
    pub fn contains(&self, x: f64) -> bool {
        !(x > self.max || x < self.min)
    }
}

impl FromStr for Bound {
    type Err = AppError;

    /// Parse `min:max`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lo, hi) = s
            .split_once(':')
            .ok_or_else(|| AppError::input(format!("Invalid bound '{s}': expected 'min:max'.")))?;
        let min = lo
            .trim()
            .parse::<f64>()
            .map_err(|e| AppError::input(format!("Invalid bound minimum '{lo}': {e}")))?;
        let max = hi
            .trim()
            .parse::<f64>()
            .map_err(|e| AppError::input(format!("Invalid bound maximum '{hi}': {e}")))?;
        Ok(Bound { min, max })
    }
}

/// Acceptable relative error, stored as a fraction (`"5%"` -> `0.05`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptableError(pub f64);

impl AcceptableError {
    pub fn fraction(self) -> f64 {
        self.0
    }
}

impl Default for AcceptableError {
    fn default() -> Self {
        AcceptableError(0.05)
    }
}

impl FromStr for AcceptableError {
    type Err = AppError;

    /// Accepts `"5%"`, `"0.5 %"` or a bare percentage `"5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%').trim();
        let pct = trimmed
            .parse::<f64>()
            .map_err(|e| AppError::input(format!("Invalid acceptable error '{s}': {e}")))?;
        if !pct.is_finite() || pct < 0.0 {
            return Err(AppError::input(format!(
                "Invalid acceptable error '{s}': must be a finite, non-negative percentage."
            )));
        }
        Ok(AcceptableError(pct / 100.0))
    }
}

/// Console progress output during optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    None,
    Iteration,
    Percentage,
    Both,
}

/// Sample spacing used for the discrete derivative of an admittance curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GradientSpacing {
    /// Unit spacing between consecutive samples.
    #[default]
    Index,
    /// Derivative with respect to the sample frequencies.
    Frequency,
}

/// Built-in analytic objectives exposed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectiveModel {
    /// `[L nH, C fF]` -> resonance frequency (GHz).
    LcFrequency,
    /// `[L nH, C fF]` -> characteristic impedance (ohm).
    LcImpedance,
    /// `[C fF]` -> charging energy `E_C / h` (MHz).
    ChargingEnergy,
}

impl ObjectiveModel {
    pub fn dimension(self) -> usize {
        match self {
            ObjectiveModel::LcFrequency | ObjectiveModel::LcImpedance => 2,
            ObjectiveModel::ChargingEnergy => 1,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ObjectiveModel::LcFrequency => "LC resonance frequency (GHz)",
            ObjectiveModel::LcImpedance => "LC characteristic impedance (ohm)",
            ObjectiveModel::ChargingEnergy => "Charging energy E_C/h (MHz)",
        }
    }
}

/// One sample of an admittance curve with its local gradient estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub frequency: f64,
    pub value: Complex64,
    pub gradient: Complex64,
}

/// Whether an intercept was observed directly or synthesized from a sign change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterceptKind {
    Exact,
    Interpolated,
}

impl InterceptKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InterceptKind::Exact => "exact",
            InterceptKind::Interpolated => "interpolated",
        }
    }
}

/// A point where the imaginary part of the curve is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intercept {
    pub frequency: f64,
    pub value: Complex64,
    pub gradient: Complex64,
    pub kind: InterceptKind,
}

/// Effective impedances aligned one-to-one with their intercepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpedanceExtraction {
    pub intercepts: Vec<Intercept>,
    pub impedances: Vec<f64>,
    /// Number of sweep samples the extraction ran on.
    #[serde(default)]
    pub samples: usize,
}

impl ImpedanceExtraction {
    pub fn len(&self) -> usize {
        self.impedances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impedances.is_empty()
    }

    /// Indices whose impedance is NaN or infinite.
    pub fn singular_indices(&self) -> Vec<usize> {
        self.impedances
            .iter()
            .enumerate()
            .filter(|(_, z)| !z.is_finite())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Extraction result of one named port pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortImpedance {
    pub port: String,
    pub n_samples: usize,
    pub extraction: ImpedanceExtraction,
}

/// Why an optimization run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Relative error fell to or below the acceptable fraction.
    Converged,
    /// A coordinate left its bound; the offending point is the last in the trajectory.
    BoundReached,
    /// Iteration budget exhausted.
    IterationsExhausted,
}

impl Termination {
    pub fn display_name(self) -> &'static str {
        match self {
            Termination::Converged => "converged",
            Termination::BoundReached => "bound reached",
            Termination::IterationsExhausted => "iterations exhausted",
        }
    }
}

/// Full diagnostic output of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Every visited point, in visit order.
    pub solutions: Vec<Vec<f64>>,
    /// Objective (`true` mode) value of each visited point.
    pub evaluations: Vec<f64>,
    pub best_index: usize,
    pub best_point: Vec<f64>,
    pub best_evaluation: f64,
    /// Percent (not fraction) error of the best evaluation against target.
    pub percent_error: f64,
    pub termination: Termination,
    pub iterations: usize,
}

/// Parameters of a synthetic parallel-LC admittance sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    /// Inductance (H).
    pub inductance: f64,
    /// Capacitance (F).
    pub capacitance: f64,
    /// Shunt conductance (S).
    pub conductance: f64,
    /// Angular-frequency range (rad/s).
    pub omega_min: f64,
    pub omega_max: f64,
    pub points: usize,
    /// Standard deviation of Gaussian noise on Im(Y) (S).
    pub noise: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            inductance: 10e-9,
            capacitance: 1e-12,
            conductance: 1e-3,
            omega_min: 0.5e10,
            omega_max: 1.5e10,
            points: 200,
            noise: 0.0,
            seed: 42,
        }
    }
}

/// Where admittance sweeps come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SweepInput {
    Csv(PathBuf),
    Synthetic(SyntheticConfig),
}

/// Fully resolved configuration for `bbq impedance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpedanceConfig {
    pub input: SweepInput,
    pub ports: Vec<String>,
    pub spacing: GradientSpacing,
    pub export: Option<PathBuf>,
}

/// Fully resolved configuration for `bbq optimize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeConfig {
    pub model: ObjectiveModel,
    pub initial: Vec<f64>,
    pub bounds: Vec<Bound>,
    pub target: f64,
    pub rho: f64,
    pub epsilon: f64,
    pub delta: f64,
    pub max_iterations: usize,
    pub acceptable_error: AcceptableError,
    pub display: DisplayMode,
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceptable_error_parses_percent_strings() {
        let a: AcceptableError = "5%".parse().unwrap();
        assert!((a.fraction() - 0.05).abs() < 1e-15);
        let b: AcceptableError = " 0.5 % ".parse().unwrap();
        assert!((b.fraction() - 0.005).abs() < 1e-15);
        let c: AcceptableError = "1".parse().unwrap();
        assert!((c.fraction() - 0.01).abs() < 1e-15);
    }

    #[test]
    fn acceptable_error_rejects_garbage() {
        assert!("five%".parse::<AcceptableError>().is_err());
        let err = "-1%".parse::<AcceptableError>().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn bound_parses_and_checks_membership() {
        let b: Bound = "-10:10".parse().unwrap();
        assert_eq!(b, Bound::new(-10.0, 10.0));
        assert!(b.contains(10.0));
        assert!(!b.contains(10.5));
        assert!(b.contains(f64::NAN));
        assert!("10".parse::<Bound>().is_err());
    }

    #[test]
    fn singular_indices_flag_non_finite() {
        let extraction = ImpedanceExtraction {
            intercepts: Vec::new(),
            impedances: vec![1.0, f64::INFINITY, f64::NAN, 2.0],
            samples: 10,
        };
        assert_eq!(extraction.singular_indices(), vec![1, 2]);
    }
}
