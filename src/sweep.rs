use serde::Serialize;

use crate::integrator::{euler, rk4};
use crate::model::ModelParameters;

// ---------------------------------------------------------------------------
// Parametric drag sweep
// ---------------------------------------------------------------------------

pub const DEFAULT_SWEEP_POINTS: usize = 50;

/// Final velocity by each solution for one drag coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub mu: f64,
    pub exact: f64,
    pub euler: f64,
    pub rk4: f64,
}

/// `count` evenly spaced values from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (count - 1) as f64;
            (0..count).map(|i| lo + step * i as f64).collect()
        }
    }
}

/// Sweep mu over `[0.1*mu, 1.5*mu]` around the base parameter set.
///
/// Each point integrates its own parameter copy; the base set is untouched.
/// Velocities are taken at the last grid node.
pub fn mu_sweep(base: &ModelParameters, count: usize) -> Vec<SweepPoint> {
    linspace(0.1 * base.mu, 1.5 * base.mu, count)
        .into_iter()
        .map(|mu| {
            let params = base.with_mu(mu);
            let end_velocity = |(_, v): (f64, f64)| v;
            SweepPoint {
                mu,
                exact: params.analytic(params.grid_end()),
                euler: euler(&params).last().map_or(f64::NAN, end_velocity),
                rk4: rk4(&params).last().map_or(f64::NAN, end_velocity),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linspace_endpoints() {
        let xs = linspace(0.05, 0.75, 50);
        assert_eq!(xs.len(), 50);
        assert_eq!(xs[0], 0.05);
        assert_relative_eq!(xs[49], 0.75, epsilon = 1e-12);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn sweep_covers_range() {
        let base = ModelParameters::default();
        let pts = mu_sweep(&base, DEFAULT_SWEEP_POINTS);
        assert_eq!(pts.len(), 50);
        assert_relative_eq!(pts[0].mu, 0.05);
        assert_relative_eq!(pts[49].mu, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn more_drag_lowers_final_velocity() {
        let pts = mu_sweep(&ModelParameters::default(), 10);
        for pair in pts.windows(2) {
            assert!(pair[1].exact < pair[0].exact);
            assert!(pair[1].rk4 < pair[0].rk4);
        }
    }

    #[test]
    fn rk4_tracks_exact_across_sweep() {
        for p in mu_sweep(&ModelParameters::default(), 20) {
            assert_relative_eq!(p.rk4, p.exact, max_relative = 1e-10);
            assert!((p.euler - p.exact).abs() > (p.rk4 - p.exact).abs());
        }
    }
}
