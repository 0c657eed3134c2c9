use serde::Serialize;

use super::{max_discrepancy, shared_nodes, EPS, SATURATION_FLOOR};
use crate::trajectory::TrajectoryFamily;

/// Order estimate and absolute-error estimate for the finest grid.
///
/// NaN in either field means "undefined" (too few levels, or the
/// discrepancies have reached round-off).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergenceResult {
    pub order: f64,
    pub error: f64,
}

impl ConvergenceResult {
    pub fn undefined() -> Self {
        Self { order: f64::NAN, error: f64::NAN }
    }

    pub fn is_defined(&self) -> bool {
        self.order.is_finite() && self.error.is_finite()
    }
}

/// Three-level Richardson estimate from the three finest steps `h < 2h < 4h`.
///
/// With `d_coarse = max|v_4h - v_2h[::2]|` and `d_fine = max|v_2h - v_h[::2]|`:
///
/// ```text
/// p   = log2((d_coarse + EPS) / (d_fine + EPS))
/// err = (d_fine + EPS) / (2^p - 1)
/// ```
///
/// The grids must nest (see [`TrajectoryFamily`]). Undefined when a pair of
/// levels shares only the initial node, as happens when `t_end < 4h`.
pub fn richardson(family: &TrajectoryFamily) -> ConvergenceResult {
    let mut finest = family.iter();
    let (Some((_, fine)), Some((_, mid)), Some((_, coarse))) =
        (finest.next(), finest.next(), finest.next())
    else {
        return ConvergenceResult::undefined();
    };
    if shared_nodes(coarse, mid) < 2 || shared_nodes(mid, fine) < 2 {
        return ConvergenceResult::undefined();
    }

    let d_coarse = max_discrepancy(coarse, mid);
    let d_fine = max_discrepancy(mid, fine);

    if d_fine < SATURATION_FLOOR {
        return ConvergenceResult::undefined();
    }

    let order = ((d_coarse + EPS) / (d_fine + EPS)).log2();
    let error = (d_fine + EPS) / (2f64.powf(order) - 1.0);
    ConvergenceResult { order, error }
}
