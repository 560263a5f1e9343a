//! Read/write optimization trajectory JSON files.
//!
//! A trajectory file is the portable record of an optimization run:
//! - tool name and generation timestamp
//! - the resolved run configuration
//! - the full result (visited points, evaluations, best point, termination)
//!
//! Non-finite numbers are written as JSON `null` by `serde_json`, so a run that
//! diverged to NaN can be exported but not read back.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{OptimizationResult, OptimizeConfig};
use crate::error::AppError;

pub const TOOL_NAME: &str = "bbq";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub config: OptimizeConfig,
    pub result: OptimizationResult,
}

impl TrajectoryFile {
    pub fn new(config: &OptimizeConfig, result: &OptimizationResult) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            generated_at: Utc::now(),
            config: config.clone(),
            result: result.clone(),
        }
    }
}

/// Write a trajectory JSON file.
pub fn write_trajectory_json(path: &Path, trajectory: &TrajectoryFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create trajectory JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, trajectory)
        .map_err(|e| AppError::io(format!("Failed to write trajectory JSON: {e}")))?;
    Ok(())
}

/// Read a trajectory JSON file.
pub fn read_trajectory_json(path: &Path) -> Result<TrajectoryFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open trajectory JSON '{}': {e}", path.display())))?;
    let trajectory: TrajectoryFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid trajectory JSON: {e}")))?;
    Ok(trajectory)
}
