//! Physical constants used by the analysis models.
//!
//! The table is built once per process and shared read-only.

use std::f64::consts::PI;
use std::sync::OnceLock;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhysicalConstants {
    /// Elementary charge (C).
    pub electron_charge: f64,
    /// Planck constant (J s).
    pub planck: f64,
    /// Reduced Planck constant (J s).
    pub planck_reduced: f64,
    /// Magnetic flux quantum `h / 2e` (Wb).
    pub flux_quantum: f64,
    /// Reduced flux quantum `Φ0 / 2π` (Wb).
    pub reduced_flux_quantum: f64,
}

static PHYSICAL: OnceLock<PhysicalConstants> = OnceLock::new();

/// The process-wide constants table.
pub fn physical() -> &'static PhysicalConstants {
    PHYSICAL.get_or_init(|| {
        let flux_quantum = 2.067e-15;
        PhysicalConstants {
            electron_charge: 1.60217657e-19,
            planck: 6.62606957e-34,
            planck_reduced: 1.0545718e-34,
            flux_quantum,
            reduced_flux_quantum: flux_quantum / (2.0 * PI),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_shared_and_consistent() {
        let a = physical();
        let b = physical();
        assert!(std::ptr::eq(a, b));
        // hbar = h / 2π to the table's precision.
        assert!((a.planck / (2.0 * PI) - a.planck_reduced).abs() / a.planck_reduced < 1e-6);
        // Φ0 ≈ h / 2e.
        let phi0 = a.planck / (2.0 * a.electron_charge);
        assert!((phi0 - a.flux_quantum).abs() / a.flux_quantum < 1e-3);
        assert!((a.reduced_flux_quantum * 2.0 * PI - a.flux_quantum).abs() < 1e-30);
    }
}
