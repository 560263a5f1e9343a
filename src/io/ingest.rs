//! CSV ingest of admittance sweeps.
//!
//! This module turns a solver export into clean, frequency-ordered
//! `(frequency, Y)` sweeps, one per port pair.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (sorted by frequency, duplicates rejected)
//! - **Separation of concerns**: no extraction logic here
//!
//! Expected columns (case-insensitive, BOM-tolerant):
//!
//! | column    | aliases                      | required |
//! |-----------|------------------------------|----------|
//! | frequency | `freq`, `omega`, `f`         | yes      |
//! | real part | `re`, `y_re`, `real`         | yes      |
//! | imag part | `im`, `y_im`, `imag`         | yes      |
//! | port      |                              | no       |
//!
//! Rows without a `port` column belong to `DEFAULT_PORT`.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use num_complex::Complex64;
use tracing::warn;

use crate::error::AppError;
use crate::quantization::{AdmittanceSource, AdmittanceSweep};

/// Port name used when the CSV has no `port` column.
pub const DEFAULT_PORT: &str = "Y11";

const FREQ_COLUMNS: [&str; 4] = ["frequency", "freq", "omega", "f"];
const RE_COLUMNS: [&str; 3] = ["re", "y_re", "real"];
const IM_COLUMNS: [&str; 3] = ["im", "y_im", "imag"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub port: Option<String>,
    pub message: String,
}

/// Summary stats for one ingested sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepStats {
    pub n_points: usize,
    pub freq_min: f64,
    pub freq_max: f64,
}

/// Sweeps loaded from a CSV file, keyed by port name.
#[derive(Debug, Clone)]
pub struct CsvAdmittanceSource {
    sweeps: BTreeMap<String, AdmittanceSweep>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl CsvAdmittanceSource {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Parse CSV from any reader; `origin` is recorded in sweep metadata.
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
            .clone();
        let header_map = build_header_map(&headers);

        let freq_col = resolve_column(&header_map, &FREQ_COLUMNS)?;
        let re_col = resolve_column(&header_map, &RE_COLUMNS)?;
        let im_col = resolve_column(&header_map, &IM_COLUMNS)?;
        let port_col = header_map.get("port").copied();

        let mut rows: BTreeMap<String, Vec<(f64, Complex64)>> = BTreeMap::new();
        let mut row_errors = Vec::new();
        let mut rows_read = 0usize;

        for (idx, result) in reader.records().enumerate() {
            // +2: records() starts after the header and CSV lines are 1-based.
            let line = idx + 2;
            rows_read += 1;

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    row_errors.push(RowError {
                        line,
                        port: None,
                        message: format!("CSV parse error: {e}"),
                    });
                    continue;
                }
            };

            let port = port_col
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_PORT)
                .to_string();

            match parse_row(&record, freq_col, re_col, im_col) {
                Ok(sample) => rows.entry(port).or_default().push(sample),
                Err(message) => row_errors.push(RowError {
                    line,
                    port: Some(port),
                    message,
                }),
            }
        }

        for err in &row_errors {
            warn!(line = err.line, port = ?err.port, "skipped row: {}", err.message);
        }

        let mut sweeps = BTreeMap::new();
        let mut rows_used = 0usize;
        for (port, mut samples) in rows {
            samples.sort_by(|a, b| a.0.total_cmp(&b.0));
            if let Some(w) = samples.windows(2).find(|w| w[0].0 == w[1].0) {
                return Err(AppError::input(format!(
                    "Duplicate frequency {} for port '{port}'.",
                    w[0].0
                )));
            }
            rows_used += samples.len();

            let mut metadata = BTreeMap::new();
            metadata.insert("source".to_string(), origin.to_string());
            metadata.insert("port".to_string(), port.clone());
            let (frequencies, values) = samples.into_iter().unzip();
            sweeps.insert(
                port,
                AdmittanceSweep {
                    frequencies,
                    values,
                    metadata,
                },
            );
        }

        if rows_used == 0 {
            return Err(AppError::input(format!("No valid admittance rows in '{origin}'.")));
        }

        Ok(Self {
            sweeps,
            row_errors,
            rows_read,
            rows_used,
        })
    }

    pub fn stats(&self, port: &str) -> Option<SweepStats> {
        let sweep = self.sweeps.get(port)?;
        Some(SweepStats {
            n_points: sweep.frequencies.len(),
            freq_min: *sweep.frequencies.first()?,
            freq_max: *sweep.frequencies.last()?,
        })
    }
}

impl AdmittanceSource for CsvAdmittanceSource {
    fn get_params(&self, name: &str) -> Result<AdmittanceSweep, AppError> {
        self.sweeps.get(name).cloned().ok_or_else(|| {
            let known: Vec<&str> = self.sweeps.keys().map(String::as_str).collect();
            AppError::input(format!(
                "Unknown port '{name}'. Available: {}.",
                known.join(", ")
            ))
        })
    }

    fn port_names(&self) -> Vec<String> {
        self.sweeps.keys().cloned().collect()
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Result<usize, AppError> {
    names
        .iter()
        .find_map(|n| header_map.get(*n).copied())
        .ok_or_else(|| {
            AppError::input(format!(
                "Missing required column: one of `{}`",
                names.join("`, `")
            ))
        })
}

fn parse_row(record: &StringRecord, freq: usize, re: usize, im: usize) -> Result<(f64, Complex64), String> {
    let frequency = parse_f64(record, freq, "frequency")?;
    let re = parse_f64(record, re, "re")?;
    let im = parse_f64(record, im, "im")?;
    Ok((frequency, Complex64::new(re, im)))
}

fn parse_f64(record: &StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))?;
    let v = raw
        .parse::<f64>()
        .map_err(|e| format!("Invalid `{name}` value '{raw}': {e}"))?;
    if !v.is_finite() {
        return Err(format!("Non-finite `{name}` value '{raw}'."));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_port_file_uses_default_port_and_sorts() {
        let csv = "\u{feff}Freq,Y_Re,Y_Im\n3,1,-2\n1,1,2\n2,1,2\n4,1,-2\n";
        let source = CsvAdmittanceSource::from_reader(csv.as_bytes(), "inline").unwrap();
        assert_eq!(source.port_names(), vec![DEFAULT_PORT.to_string()]);

        let sweep = source.get_params(DEFAULT_PORT).unwrap();
        assert_eq!(sweep.frequencies, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(sweep.values[2], Complex64::new(1.0, -2.0));
        assert_eq!(sweep.metadata.get("source").map(String::as_str), Some("inline"));

        let stats = source.stats(DEFAULT_PORT).unwrap();
        assert_eq!(stats.n_points, 4);
        assert_eq!(stats.freq_max, 4.0);
    }

    #[test]
    fn multi_port_file_splits_by_port_and_reports_bad_rows() {
        let csv = "port,frequency,re,im\n\
                   Y11,1.0,0.1,1.0\n\
                   Y22,1.0,0.2,-1.0\n\
                   Y11,2.0,0.1,abc\n\
                   Y11,3.0,0.1,-1.0\n\
                   Y22,2.0,0.2,1.0\n";
        let source = CsvAdmittanceSource::from_reader(csv.as_bytes(), "inline").unwrap();
        assert_eq!(source.port_names(), vec!["Y11".to_string(), "Y22".to_string()]);
        assert_eq!(source.rows_read, 5);
        assert_eq!(source.rows_used, 4);
        assert_eq!(source.row_errors.len(), 1);
        assert_eq!(source.row_errors[0].line, 4);
        assert_eq!(source.get_params("Y11").unwrap().frequencies, vec![1.0, 3.0]);

        let err = source.get_params("Y12").unwrap_err();
        assert!(err.message().contains("Y11, Y22"));
    }

    #[test]
    fn missing_columns_and_duplicates_are_input_errors() {
        let err = CsvAdmittanceSource::from_reader("freq,re\n1,2\n".as_bytes(), "inline").unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = CsvAdmittanceSource::from_reader("f,re,im\n1,0,1\n1,0,2\n".as_bytes(), "inline")
            .unwrap_err();
        assert!(err.message().contains("Duplicate frequency"));
    }
}
