use serde::Serialize;

use super::regression::{fit_line, log_order_grid};
use super::richardson::{richardson, ConvergenceResult};
use super::EPS;
use crate::integrator::Method;
use crate::trajectory::{Trajectory, TrajectoryFamily};

// ---------------------------------------------------------------------------
// Error against a reference solution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorPoint {
    pub h: f64,
    pub error: f64,
}

/// Piecewise-linear interpolation, clamped to the end values outside the table.
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return f64::NAN;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    // First node strictly greater than x
    let hi = xs[..n].partition_point(|&xi| xi <= x);
    let lo = hi - 1;
    let w = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + w * (ys[hi] - ys[lo])
}

/// Max |numeric - reference| on the numeric grid, reference interpolated.
pub fn max_error(numeric: &Trajectory, reference: &Trajectory) -> f64 {
    let (xs, ys) = (reference.times(), reference.velocities());
    numeric
        .points()
        .map(|(t, v)| (v - interp(t, xs, ys)).abs())
        .fold(0.0_f64, f64::max)
}

/// Per-step max error for every step present in both families, ascending h.
///
/// Errors are floored at [`EPS`] so their logarithms stay finite.
pub fn error_series(numeric: &TrajectoryFamily, analytic: &TrajectoryFamily) -> Vec<ErrorPoint> {
    numeric
        .iter()
        .filter_map(|(h, tr)| {
            let reference = analytic.get(h)?;
            Some(ErrorPoint { h, error: max_error(tr, reference).max(EPS) })
        })
        .collect()
}

/// Slope of `log error` against `log h`. NaN with fewer than two points.
pub fn observed_order(series: &[ErrorPoint]) -> f64 {
    let log_h: Vec<f64> = series.iter().map(|p| p.h.ln()).collect();
    let log_e: Vec<f64> = series.iter().map(|p| p.error.ln()).collect();
    fit_line(&log_h, &log_e).map_or(f64::NAN, |(slope, _)| slope)
}

// ---------------------------------------------------------------------------
// Combined report
// ---------------------------------------------------------------------------

/// Everything the analyzer has to say about one method.
#[derive(Debug, Clone, Serialize)]
pub struct ConvergenceReport {
    pub method: String,
    pub nominal_order: u32,
    pub steps: Vec<f64>,
    pub richardson: ConvergenceResult,
    /// Negated log-log slope, so near `-nominal_order`.
    pub regression_order: f64,
    pub observed_order: f64,
    pub errors: Vec<ErrorPoint>,
}

pub fn analyze(
    method: Method,
    numeric: &TrajectoryFamily,
    analytic: &TrajectoryFamily,
) -> ConvergenceReport {
    let errors = error_series(numeric, analytic);
    ConvergenceReport {
        method: method.name().to_string(),
        nominal_order: method.order(),
        steps: numeric.steps(),
        richardson: richardson(numeric),
        regression_order: log_order_grid(numeric),
        observed_order: observed_order(&errors),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelParameters;
    use approx::assert_abs_diff_eq;

    #[test]
    fn interp_inside_and_clamped() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 10.0, 30.0];
        assert_eq!(interp(0.5, &xs, &ys), 5.0);
        assert_eq!(interp(2.0, &xs, &ys), 20.0);
        assert_eq!(interp(1.0, &xs, &ys), 10.0);
        assert_eq!(interp(-1.0, &xs, &ys), 0.0);
        assert_eq!(interp(9.0, &xs, &ys), 30.0);
        assert!(interp(1.0, &[], &[]).is_nan());
    }

    #[test]
    fn error_series_matches_only_shared_steps() {
        let params = ModelParameters { t_end: 10.0, h: 0.4, ..Default::default() };
        let numeric = TrajectoryFamily::refined(&params, Method::Euler, 3);
        let analytic = TrajectoryFamily::analytic(&params, &[0.4, 0.1]);
        let series = error_series(&numeric, &analytic);
        let hs: Vec<f64> = series.iter().map(|p| p.h).collect();
        assert_eq!(hs, vec![0.1, 0.4]);
        assert!(series[0].error < series[1].error);
    }

    #[test]
    fn euler_observed_order_is_one() {
        let params = ModelParameters { h: 0.8, ..Default::default() };
        let numeric = TrajectoryFamily::refined(&params, Method::Euler, 4);
        let analytic = TrajectoryFamily::analytic(&params, &numeric.steps());
        let order = observed_order(&error_series(&numeric, &analytic));
        assert_abs_diff_eq!(order, 1.0, epsilon = 0.1);
    }

    #[test]
    fn report_fields_populated() {
        let params = ModelParameters { h: 0.8, ..Default::default() };
        let numeric = TrajectoryFamily::refined(&params, Method::Euler, 4);
        let analytic = TrajectoryFamily::analytic(&params, &numeric.steps());
        let report = analyze(Method::Euler, &numeric, &analytic);
        assert_eq!(report.method, "euler");
        assert_eq!(report.nominal_order, 1);
        assert_eq!(report.steps, vec![0.1, 0.2, 0.4, 0.8]);
        assert_eq!(report.errors.len(), 4);
        assert!(report.richardson.is_defined());
        assert!(report.regression_order < 0.0);
        assert!(report.observed_order > 0.0);
    }
}
