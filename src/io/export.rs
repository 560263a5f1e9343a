//! Export per-intercept impedance results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Singular impedances are written as `inf`/`NaN` exactly as computed.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::PortImpedance;
use crate::error::AppError;

/// Write all ports' intercepts and impedances to a CSV file.
pub fn write_impedance_csv(path: &Path, ports: &[PortImpedance]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_impedance_rows(&mut file, ports)
}

/// Write the CSV body to any writer.
pub fn write_impedance_rows<W: Write>(out: &mut W, ports: &[PortImpedance]) -> Result<(), AppError> {
    writeln!(out, "port,index,kind,frequency,re,im,grad_re,grad_im,z_eff")
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for port in ports {
        let rows = port
            .extraction
            .intercepts
            .iter()
            .zip(&port.extraction.impedances)
            .enumerate();
        for (i, (x, z)) in rows {
            writeln!(
                out,
                "{},{},{},{:.12e},{:.12e},{:.12e},{:.12e},{:.12e},{:.12e}",
                port.port,
                i,
                x.kind.as_str(),
                x.frequency,
                x.value.re,
                x.value.im,
                x.gradient.re,
                x.gradient.im,
                z,
            )
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    Ok(())
}
