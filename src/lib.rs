//! Velocity of a variable-mass body under constant thrust and linear drag,
//! `dv/dt = (F - mu*v) / (m0 + mu*t)`: closed form, explicit Euler and RK4
//! fixed-step integrators, and empirical convergence-order estimation.

pub mod convergence;
pub mod error;
pub mod integrator;
pub mod io;
pub mod model;
pub mod sweep;
pub mod trajectory;

pub use convergence::{log_order_grid, richardson, ConvergenceReport, ConvergenceResult};
pub use error::{Error, Result};
pub use integrator::{euler, integrate, rk4, solve, Method};
pub use model::{analytic_velocity, derivative, ModelParameters};
pub use trajectory::{Trajectory, TrajectoryFamily};
