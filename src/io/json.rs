use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::convergence::ConvergenceReport;
use crate::error::Result;

/// Write one convergence report as pretty JSON. Undefined (NaN) estimates become `null`.
pub fn write_report<W: Write>(writer: &mut W, report: &ConvergenceReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_report_file(path: impl AsRef<Path>, report: &ConvergenceReport) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_report(&mut file, report)?;
    file.flush()?;
    Ok(())
}

/// `convergence_<method>.json`
pub fn report_file_name(method: &str) -> String {
    format!("convergence_{}.json", method)
}
