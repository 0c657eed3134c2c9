//! Empirical order-of-accuracy estimation from trajectory families.
//!
//! Two independent estimators work on the same input:
//!
//! * [`richardson`]: three finest refinement levels, order plus an error
//!   estimate for the finest grid.
//! * [`log_order_grid`]: negated least-squares slope through every adjacent ratio-2
//!   pair, more tolerant of per-level noise.
//!
//! Insufficient or degenerate data is not an error: results come back as NaN.

pub mod regression;
pub mod richardson;
pub mod series;

pub use regression::{fit_line, log_order_grid};
pub use richardson::{richardson, ConvergenceResult};
pub use series::{analyze, error_series, observed_order, ConvergenceReport, ErrorPoint};

use crate::trajectory::Trajectory;

/// Floor added to discrepancies so logarithms and ratios never see exact zero.
pub const EPS: f64 = 1e-30;

/// Fine-level discrepancy below which Richardson's ratio is noise.
pub const SATURATION_FLOOR: f64 = 1e-20;

/// Max |coarse - fine[::2]| over the shared leading nodes.
///
/// Valid only when the coarse nodes are every other fine node. When the
/// coarse grid overshoots `t_end` by one node more than the subsampled fine
/// grid, the extra node is ignored.
pub fn max_discrepancy(coarse: &Trajectory, fine: &Trajectory) -> f64 {
    coarse
        .velocities()
        .iter()
        .zip(fine.velocities().iter().step_by(2))
        .map(|(c, f)| (c - f).abs())
        .fold(0.0_f64, f64::max)
}

/// Nodes compared by [`max_discrepancy`].
pub(crate) fn shared_nodes(coarse: &Trajectory, fine: &Trajectory) -> usize {
    coarse.len().min(fine.len().div_ceil(2))
}

/// `a / b ≈ 2` with numpy `isclose` default tolerances.
pub(crate) fn is_ratio_two(big: f64, small: f64) -> bool {
    (big / small - 2.0).abs() <= 1e-8 + 1e-5 * 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrepancy_uses_every_other_fine_node() {
        let coarse: Trajectory = vec![(0.0, 0.0), (2.0, 2.0), (4.0, 4.0)].into_iter().collect();
        let fine: Trajectory = (0..5).map(|i| (i as f64, i as f64 + 0.25 * i as f64)).collect();
        // fine[::2] = [0, 2.5, 5]
        assert_eq!(max_discrepancy(&coarse, &fine), 1.0);
    }

    #[test]
    fn discrepancy_ignores_unmatched_tail() {
        let coarse: Trajectory = vec![(0.0, 1.0), (2.0, 1.0), (4.0, 99.0)].into_iter().collect();
        let fine: Trajectory = vec![(0.0, 1.0), (1.0, 5.0), (2.0, 1.5)].into_iter().collect();
        assert_eq!(max_discrepancy(&coarse, &fine), 0.5);
    }

    #[test]
    fn shared_nodes_counts_overlap() {
        let coarse: Trajectory = (0..3).map(|i| (2.0 * i as f64, 0.0)).collect();
        let fine: Trajectory = (0..3).map(|i| (i as f64, 0.0)).collect();
        assert_eq!(shared_nodes(&coarse, &fine), 2);
        assert_eq!(shared_nodes(&fine, &coarse), 2);
        let single: Trajectory = vec![(0.0, 0.0)].into_iter().collect();
        assert_eq!(shared_nodes(&coarse, &single), 1);
    }

    #[test]
    fn ratio_two_tolerance() {
        assert!(is_ratio_two(0.2, 0.1));
        assert!(is_ratio_two(1.6, 0.8));
        assert!(!is_ratio_two(0.3, 0.1));
        assert!(!is_ratio_two(1.0, 0.3));
    }
}
