use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::ModelParameters;
use crate::trajectory::Trajectory;

// ---------------------------------------------------------------------------
// Time grid
// ---------------------------------------------------------------------------

/// Number of steps covering `[0, t_end]`: `ceil(t_end / h)`.
pub fn step_count(t_end: f64, h: f64) -> usize {
    (t_end / h).ceil().max(0.0) as usize
}

/// Nodes `t_i = i*h`, `i = 0..=ceil(t_end/h)`.
///
/// The last node may overshoot `t_end`. Nodes are multiples of `h` rather
/// than running sums, so the grid of step `2h` coincides bit-for-bit with
/// every other node of the grid of step `h`.
pub fn time_grid(t_end: f64, h: f64) -> Vec<f64> {
    (0..=step_count(t_end, h)).map(|i| i as f64 * h).collect()
}

// ---------------------------------------------------------------------------
// Single steps
// ---------------------------------------------------------------------------

/// Explicit Euler step. Local error O(h^2), global O(h).
pub fn euler_step(f: impl Fn(f64, f64) -> f64, t: f64, v: f64, h: f64) -> f64 {
    v + h * f(t, v)
}

/// Classical RK4 step. Local error O(h^5), global O(h^4).
pub fn rk4_step(f: impl Fn(f64, f64) -> f64, t: f64, v: f64, h: f64) -> f64 {
    let k1 = f(t, v);
    let k2 = f(t + 0.5 * h, v + 0.5 * h * k1);
    let k3 = f(t + 0.5 * h, v + 0.5 * h * k2);
    let k4 = f(t + h, v + h * k3);

    v + (k1 + 2.0 * k2 + 2.0 * k3 + k4) * (h / 6.0)
}

// ---------------------------------------------------------------------------
// Method selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Euler,
    Rk4,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Euler, Method::Rk4];

    /// File-name prefix and CLI spelling.
    pub fn name(self) -> &'static str {
        match self {
            Method::Euler => "euler",
            Method::Rk4 => "rk4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Method::Euler => "Euler",
            Method::Rk4 => "Runge-Kutta 4",
        }
    }

    /// Nominal global order of accuracy.
    pub fn order(self) -> u32 {
        match self {
            Method::Euler => 1,
            Method::Rk4 => 4,
        }
    }

    pub fn step(self, f: impl Fn(f64, f64) -> f64, t: f64, v: f64, h: f64) -> f64 {
        match self {
            Method::Euler => euler_step(f, t, v, h),
            Method::Rk4 => rk4_step(f, t, v, h),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "euler" => Ok(Method::Euler),
            "rk4" => Ok(Method::Rk4),
            other => Err(Error::UnknownMethod(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Trajectory drivers
// ---------------------------------------------------------------------------

/// Integrate `dv/dt = f(t, v)` from `v(0) = v0` over the grid of [`time_grid`].
///
/// No domain checks: once `f` goes non-finite the rest of the trajectory does too.
pub fn integrate(
    f: impl Fn(f64, f64) -> f64,
    v0: f64,
    t_end: f64,
    h: f64,
    method: Method,
) -> Trajectory {
    let t = time_grid(t_end, h);
    let mut v = Vec::with_capacity(t.len());
    v.push(v0);

    for i in 1..t.len() {
        let next = method.step(&f, t[i - 1], v[i - 1], h);
        v.push(next);
    }

    t.into_iter().zip(v).collect()
}

pub fn solve(params: &ModelParameters, method: Method) -> Trajectory {
    integrate(|t, v| params.rhs(t, v), params.v0, params.t_end, params.h, method)
}

pub fn euler(params: &ModelParameters) -> Trajectory {
    solve(params, Method::Euler)
}

pub fn rk4(params: &ModelParameters) -> Trajectory {
    solve(params, Method::Rk4)
}

/// Closed form on the integration grid (the "cut" analytic curve).
pub fn analytic_on_grid(params: &ModelParameters) -> Trajectory {
    time_grid(params.t_end, params.h)
        .into_iter()
        .map(|t| (t, params.analytic(t)))
        .collect()
}

/// Closed form on `points` evenly spaced nodes spanning exactly `[0, t_end]`.
pub fn analytic_dense(params: &ModelParameters, points: usize) -> Trajectory {
    let last = points.saturating_sub(1).max(1) as f64;
    (0..points)
        .map(|i| {
            let t = params.t_end * i as f64 / last;
            (t, params.analytic(t))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
