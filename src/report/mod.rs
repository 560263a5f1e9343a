//! Reporting utilities: terminal tables, run summaries, and progress output.

pub mod format;
pub mod observer;

pub use format::*;
pub use observer::*;
