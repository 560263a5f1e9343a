//! Admittance sweep providers.
//!
//! An electromagnetic solver (or a file it exported) is queried once per port
//! pair and returns `(frequencies, curve values, metadata)`. The extractor only
//! consumes the first two; metadata travels along for reports.

use std::collections::{BTreeMap, HashMap};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One frequency sweep of a port-pair admittance, ordered by ascending frequency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmittanceSweep {
    pub frequencies: Vec<f64>,
    pub values: Vec<Complex64>,
    pub metadata: BTreeMap<String, String>,
}

impl AdmittanceSweep {
    pub fn new(frequencies: Vec<f64>, values: Vec<Complex64>) -> Self {
        Self {
            frequencies,
            values,
            metadata: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Anything that can produce the admittance sweep for a named port pair (e.g. `"Y11"`).
pub trait AdmittanceSource {
    fn get_params(&self, name: &str) -> Result<AdmittanceSweep, AppError>;

    /// Port names this source can serve, if it knows them up front.
    fn port_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A fixed set of sweeps held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    sweeps: HashMap<String, AdmittanceSweep>,
}

impl InMemorySource {
    pub fn insert(&mut self, name: impl Into<String>, frequencies: Vec<f64>, values: Vec<Complex64>) {
        self.sweeps
            .insert(name.into(), AdmittanceSweep::new(frequencies, values));
    }

    pub fn insert_sweep(&mut self, name: impl Into<String>, sweep: AdmittanceSweep) {
        self.sweeps.insert(name.into(), sweep);
    }
}

impl AdmittanceSource for InMemorySource {
    fn get_params(&self, name: &str) -> Result<AdmittanceSweep, AppError> {
        self.sweeps
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::input(format!("Unknown port '{name}'.")))
    }

    fn port_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sweeps.keys().cloned().collect();
        names.sort();
        names
    }
}
