use std::fs;
use std::path::{Path, PathBuf};

use super::table::{read_trajectory_file, write_trajectory_file};
use crate::error::{Error, Result};
use crate::integrator::Method;
use crate::trajectory::{Trajectory, TrajectoryFamily};

// ---------------------------------------------------------------------------
// File naming: <method>_<h>.txt, analytic_cut_<h>.txt, analytic_full_<h>.txt
// ---------------------------------------------------------------------------

pub const EXTENSION: &str = "txt";
pub const ANALYTIC_CUT: &str = "analytic_cut";
pub const ANALYTIC_FULL: &str = "analytic_full";

/// Step size as it appears in file names: `2` for integral steps, else the
/// shortest decimal that parses back to the same value.
pub fn step_label(h: f64) -> String {
    if h.fract() == 0.0 && h.abs() < 1e15 {
        format!("{}", h as i64)
    } else {
        format!("{}", h)
    }
}

pub fn file_name(prefix: &str, h: f64) -> String {
    format!("{}_{}.{}", prefix, step_label(h), EXTENSION)
}

/// Subdirectory holding one method's trajectories.
pub fn method_dir(root: &Path, method: Method) -> PathBuf {
    root.join(format!("{}_sol", method.name()))
}

/// Which family a file belongs to, and its step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileKind {
    Numeric(f64),
    AnalyticCut(f64),
}

/// Classify a file name inside a method directory. `None` for anything else.
pub fn classify(file_name: &str, method: Method) -> Option<FileKind> {
    let stem = file_name.strip_suffix(EXTENSION)?.strip_suffix('.')?;
    if let Some(step) = stem
        .strip_prefix(ANALYTIC_CUT)
        .and_then(|rest| rest.strip_prefix('_'))
    {
        return step.parse().ok().map(FileKind::AnalyticCut);
    }
    let step = stem.strip_prefix(method.name())?.strip_prefix('_')?;
    step.parse().ok().map(FileKind::Numeric)
}

// ---------------------------------------------------------------------------
// Directory save / load
// ---------------------------------------------------------------------------

/// Write one method's trajectory and its analytic cut into the method directory.
pub fn save_run(root: &Path, method: Method, h: f64, numeric: &Trajectory, analytic: &Trajectory) -> Result<Vec<PathBuf>> {
    let dir = method_dir(root, method);
    fs::create_dir_all(&dir)?;

    let numeric_path = dir.join(file_name(method.name(), h));
    let analytic_path = dir.join(file_name(ANALYTIC_CUT, h));
    write_trajectory_file(&numeric_path, &format!("v_{}", method.name()), numeric)?;
    write_trajectory_file(&analytic_path, "v_exact_cut", analytic)?;
    Ok(vec![numeric_path, analytic_path])
}

/// Load `(numeric, analytic)` families for `method` from `root/<method>_sol`.
///
/// Fails with [`Error::MissingData`] when either family comes back empty.
pub fn load_family_dir(root: &Path, method: Method) -> Result<(TrajectoryFamily, TrajectoryFamily)> {
    let dir = method_dir(root, method);
    let mut numeric = TrajectoryFamily::new();
    let mut analytic = TrajectoryFamily::new();

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(Error::MissingData(dir)),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(kind) = name.to_str().and_then(|n| classify(n, method)) else {
            continue;
        };
        let trajectory = read_trajectory_file(entry.path())?;
        match kind {
            FileKind::Numeric(h) => numeric.insert(h, trajectory),
            FileKind::AnalyticCut(h) => analytic.insert(h, trajectory),
        }
    }

    if numeric.is_empty() || analytic.is_empty() {
        return Err(Error::MissingData(dir));
    }
    Ok((numeric, analytic))
}
