use nalgebra::{DMatrix, DVector};

use super::{is_ratio_two, max_discrepancy, EPS};
use crate::trajectory::TrajectoryFamily;

// ---------------------------------------------------------------------------
// Least-squares line
// ---------------------------------------------------------------------------

/// Fit `y = slope*x + intercept` by least squares.
///
/// `None` for fewer than two points or when all `x` coincide.
pub fn fit_line(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }

    let a = DMatrix::from_fn(n, 2, |i, j| if j == 0 { xs[i] } else { 1.0 });
    let b = DVector::from_column_slice(&ys[..n]);

    let svd = a.svd(true, true);
    if svd.rank(1e-12) < 2 {
        return None;
    }
    let coef = svd.solve(&b, 1e-12).ok()?;
    Some((coef[0], coef[1]))
}

// ---------------------------------------------------------------------------
// Log-log order over the whole grid
// ---------------------------------------------------------------------------

/// Order from the slope of `log residual` against `log h_big` over every
/// adjacent pair `(h_small, h_big = 2*h_small)`, reported as the negated
/// slope: a first-order method comes back near `-1`.
///
/// Pairs whose ratio is not 2 are skipped. Residuals are clamped at
/// [`EPS`] and clamped points are dropped before fitting, since they carry
/// no signal. NaN if fewer than two points survive.
pub fn log_order_grid(family: &TrajectoryFamily) -> f64 {
    let members: Vec<_> = family.iter().collect();

    let (log_h, log_r): (Vec<f64>, Vec<f64>) = members
        .windows(2)
        .filter(|pair| is_ratio_two(pair[1].0, pair[0].0))
        .map(|pair| {
            let (h_small, small) = pair[0];
            let (h_big, big) = pair[1];
            debug_assert!(h_small < h_big);
            let residual = max_discrepancy(big, small).max(EPS);
            (h_big.ln(), residual.ln())
        })
        .filter(|&(_, lr)| lr > EPS.ln() + 1e-12)
        .unzip();

    match fit_line(&log_h, &log_r) {
        Some((slope, _)) => -slope,
        None => f64::NAN,
    }
}
