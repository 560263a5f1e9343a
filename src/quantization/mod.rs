//! Black-box circuit quantization.
//!
//! Responsibilities:
//!
//! - query an admittance source for a port pair (`source`)
//! - locate zero crossings of `Im Y` and compute effective impedances (`black_box`)

pub mod black_box;
pub mod source;

pub use black_box::*;
pub use source::*;
