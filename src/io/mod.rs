//! Input/output helpers.
//!
//! - CSV ingest of admittance sweeps (`ingest`)
//! - impedance CSV export (`export`)
//! - optimization trajectory JSON read/write (`trajectory`)

pub mod export;
pub mod ingest;
pub mod trajectory;

pub use export::*;
pub use ingest::*;
pub use trajectory::*;
