//! `bbq-tune` library crate.
//!
//! The binary (`bbq`) is a thin wrapper around this library so that:
//!
//! - the optimizer and the impedance extractor are testable without spawning processes
//! - admittance sources and objectives can be plugged in by other callers

pub mod app;
pub mod cli;
pub mod constants;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod optimize;
pub mod quantization;
pub mod report;
