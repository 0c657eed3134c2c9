use crate::error::{Error, Result};
use crate::integrator::step_count;

// ---------------------------------------------------------------------------
// Equation of motion
// ---------------------------------------------------------------------------
//
// Constant thrust F, linear drag mu*v, mass growing linearly as m0 + mu*t:
//
//     dv/dt = (F - mu*v) / (m0 + mu*t)
//
// (m0 + mu*t) * v is linear in t, which gives the closed form below.

/// Closed-form velocity at time `t`.
///
/// Non-finite when `m0 + mu*t == 0`.
pub fn analytic_velocity(t: f64, thrust: f64, m0: f64, mu: f64, v0: f64) -> f64 {
    (thrust * t + m0 * v0) / (m0 + mu * t)
}

/// Right-hand side dv/dt at `(t, v)`. Same domain as [`analytic_velocity`].
pub fn derivative(t: f64, v: f64, thrust: f64, m0: f64, mu: f64) -> f64 {
    (thrust - mu * v) / (m0 + mu * t)
}

// ---------------------------------------------------------------------------
// Model parameters
// ---------------------------------------------------------------------------

/// One immutable parameter set per trajectory computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParameters {
    pub thrust: f64, // F, N
    pub m0: f64,     // initial mass, kg
    pub mu: f64,     // mass-flow / drag coefficient, kg/s
    pub v0: f64,     // initial velocity, m/s
    pub t_end: f64,  // integration horizon, s
    pub h: f64,      // step size, s
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            thrust: 10.0,
            m0: 5.0,
            mu: 0.5,
            v0: 0.0,
            t_end: 60.0,
            h: 0.1,
        }
    }
}

impl ModelParameters {
    pub fn mass(&self, t: f64) -> f64 {
        self.m0 + self.mu * t
    }

    pub fn analytic(&self, t: f64) -> f64 {
        analytic_velocity(t, self.thrust, self.m0, self.mu, self.v0)
    }

    pub fn rhs(&self, t: f64, v: f64) -> f64 {
        derivative(t, v, self.thrust, self.m0, self.mu)
    }

    pub fn with_mu(self, mu: f64) -> Self {
        Self { mu, ..self }
    }

    pub fn with_step(self, h: f64) -> Self {
        Self { h, ..self }
    }

    /// Last node of the integration grid, `ceil(t_end/h) * h`.
    pub fn grid_end(&self) -> f64 {
        step_count(self.t_end, self.h) as f64 * self.h
    }

    /// Check the parameter set before integrating.
    ///
    /// Mass is linear in t, so positivity at both ends of the grid covers
    /// the whole interval.
    pub fn validate(&self) -> Result<()> {
        let values = [self.thrust, self.m0, self.mu, self.v0, self.t_end, self.h];
        if values.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidParameters(
                "all parameters must be finite".into(),
            ));
        }
        if self.h <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "step size must be positive, got h = {}",
                self.h
            )));
        }
        if self.t_end <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "horizon must be positive, got t_end = {}",
                self.t_end
            )));
        }
        let t_last = self.grid_end();
        if self.mass(0.0) <= 0.0 || self.mass(t_last) <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "mass m0 + mu*t must stay positive on [0, {}]",
                t_last
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
