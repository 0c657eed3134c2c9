use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::convergence::ErrorPoint;
use crate::error::{Error, Result};
use crate::sweep::SweepPoint;
use crate::trajectory::Trajectory;

// ---------------------------------------------------------------------------
// Number formatting
// ---------------------------------------------------------------------------

/// C-style scientific notation: `1.00000000000000e+01`.
pub fn sci(x: f64, precision: usize) -> String {
    if !x.is_finite() {
        return format!("{}", x);
    }
    let s = format!("{:.*e}", precision, x);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Trajectory tables: "# t <column>" then "<t> <v>" rows
// ---------------------------------------------------------------------------

pub fn write_trajectory<W: Write>(writer: &mut W, column: &str, trajectory: &Trajectory) -> io::Result<()> {
    writeln!(writer, "# t {}", column)?;
    for (t, v) in trajectory.points() {
        writeln!(writer, "{:.6} {}", t, sci(v, 14))?;
    }
    Ok(())
}

pub fn write_trajectory_file(path: impl AsRef<Path>, column: &str, trajectory: &Trajectory) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_trajectory(&mut file, column, trajectory)?;
    file.flush()?;
    Ok(())
}

/// Read a two-column table. Blank lines and `#` lines are skipped; extra
/// columns after the second are ignored.
pub fn read_trajectory<R: BufRead>(reader: R) -> Result<Trajectory> {
    let mut points = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let malformed = || Error::MalformedRow { line: idx + 1, content: line.clone() };
        let mut fields = trimmed.split_whitespace().map(str::parse::<f64>);
        let t = fields.next().and_then(|r| r.ok()).ok_or_else(malformed)?;
        let v = fields.next().and_then(|r| r.ok()).ok_or_else(malformed)?;
        points.push((t, v));
    }

    Ok(points.into_iter().collect())
}

pub fn read_trajectory_file(path: impl AsRef<Path>) -> Result<Trajectory> {
    read_trajectory(BufReader::new(File::open(path)?))
}

// ---------------------------------------------------------------------------
// Side-by-side comparison table
// ---------------------------------------------------------------------------

/// Tab-separated `Time  Analytical  Euler  Runge-Kutta 4`, rows zipped to
/// the shortest input.
pub fn write_comparison<W: Write>(
    writer: &mut W,
    analytic: &Trajectory,
    euler: &Trajectory,
    rk4: &Trajectory,
) -> io::Result<()> {
    writeln!(writer, "Time\tAnalytical\tEuler\tRunge-Kutta 4")?;
    let rows = analytic
        .points()
        .zip(euler.velocities())
        .zip(rk4.velocities());
    for (((t, a), e), r) in rows {
        writeln!(writer, "{:.4}\t{:.6}\t{:.6}\t{:.6}", t, a, e, r)?;
    }
    Ok(())
}

pub fn write_comparison_file(
    path: impl AsRef<Path>,
    analytic: &Trajectory,
    euler: &Trajectory,
    rk4: &Trajectory,
) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_comparison(&mut file, analytic, euler, rk4)?;
    file.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Error series and sweep tables
// ---------------------------------------------------------------------------

pub fn write_error_series<W: Write>(writer: &mut W, series: &[ErrorPoint]) -> io::Result<()> {
    writeln!(writer, "# h error log_h log_error")?;
    for p in series {
        writeln!(
            writer,
            "{:.6} {} {:.10} {:.10}",
            p.h,
            sci(p.error, 14),
            p.h.ln(),
            p.error.ln()
        )?;
    }
    Ok(())
}

pub fn write_error_series_file(path: impl AsRef<Path>, series: &[ErrorPoint]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_error_series(&mut file, series)?;
    file.flush()?;
    Ok(())
}

pub fn write_sweep<W: Write>(writer: &mut W, points: &[SweepPoint]) -> io::Result<()> {
    writeln!(writer, "# mu v_exact v_euler v_rk4")?;
    for p in points {
        writeln!(
            writer,
            "{:.6} {} {} {}",
            p.mu,
            sci(p.exact, 10),
            sci(p.euler, 10),
            sci(p.rk4, 10)
        )?;
    }
    Ok(())
}

pub fn write_sweep_file(path: impl AsRef<Path>, points: &[SweepPoint]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_sweep(&mut file, points)?;
    file.flush()?;
    Ok(())
}
