use crate::integrator::{analytic_on_grid, solve, Method};
use crate::model::ModelParameters;

// ---------------------------------------------------------------------------
// Trajectory: sampled (t, v) pairs
// ---------------------------------------------------------------------------

/// Velocity samples on a time grid. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    t: Vec<f64>,
    v: Vec<f64>,
}

impl Trajectory {
    pub fn times(&self) -> &[f64] {
        &self.t
    }

    pub fn velocities(&self) -> &[f64] {
        &self.v
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.t.iter().copied().zip(self.v.iter().copied())
    }

    pub fn last(&self) -> Option<(f64, f64)> {
        Some((*self.t.last()?, *self.v.last()?))
    }

    /// Largest |v - exact(t)| over the samples.
    pub fn max_error_by(&self, exact: impl Fn(f64) -> f64) -> f64 {
        self.points()
            .map(|(t, v)| (v - exact(t)).abs())
            .fold(0.0_f64, f64::max)
    }
}

impl FromIterator<(f64, f64)> for Trajectory {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let (t, v) = iter.into_iter().unzip();
        Self { t, v }
    }
}

// ---------------------------------------------------------------------------
// TrajectoryFamily: one method, several step sizes
// ---------------------------------------------------------------------------

/// Trajectories of a single method keyed by step size, finest first.
///
/// The convergence estimators assume every coarser grid's nodes are exactly
/// every other node of the next finer grid (ratio-2 steps, common origin).
/// [`TrajectoryFamily::refined`] builds families that satisfy this; families
/// assembled by hand or loaded from disk are taken on trust.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryFamily {
    members: Vec<(f64, Trajectory)>,
}

impl TrajectoryFamily {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping ascending step order; an equal step replaces the old entry.
    pub fn insert(&mut self, h: f64, trajectory: Trajectory) {
        match self.members.binary_search_by(|(k, _)| k.total_cmp(&h)) {
            Ok(i) => self.members[i].1 = trajectory,
            Err(i) => self.members.insert(i, (h, trajectory)),
        }
    }

    pub fn get(&self, h: f64) -> Option<&Trajectory> {
        self.members
            .binary_search_by(|(k, _)| k.total_cmp(&h))
            .ok()
            .map(|i| &self.members[i].1)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Step sizes, ascending.
    pub fn steps(&self) -> Vec<f64> {
        self.members.iter().map(|(h, _)| *h).collect()
    }

    /// `(h, trajectory)` pairs, ascending in h.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &Trajectory)> + '_ {
        self.members.iter().map(|(h, tr)| (*h, tr))
    }

    /// `levels` trajectories at steps `h, h/2, h/4, ...` where `h = params.h`.
    pub fn refined(params: &ModelParameters, method: Method, levels: usize) -> Self {
        refined_steps(params.h, levels)
            .map(|h| (h, solve(&params.with_step(h), method)))
            .collect()
    }

    /// Closed form sampled on each of the given grids.
    pub fn analytic(params: &ModelParameters, steps: &[f64]) -> Self {
        steps
            .iter()
            .map(|&h| (h, analytic_on_grid(&params.with_step(h))))
            .collect()
    }
}

impl FromIterator<(f64, Trajectory)> for TrajectoryFamily {
    fn from_iter<I: IntoIterator<Item = (f64, Trajectory)>>(iter: I) -> Self {
        let mut family = TrajectoryFamily::new();
        for (h, tr) in iter {
            family.insert(h, tr);
        }
        family
    }
}

/// `h, h/2, h/4, ...`; halving is exact in binary floating point.
pub fn refined_steps(coarsest: f64, levels: usize) -> impl Iterator<Item = f64> {
    (0..levels).map(move |k| coarsest / f64::powi(2.0, k as i32))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize, h: f64) -> Trajectory {
        (0..n).map(|i| (i as f64 * h, 1.0)).collect()
    }

    #[test]
    fn family_keeps_steps_sorted() {
        let mut fam = TrajectoryFamily::new();
        fam.insert(0.4, flat(3, 0.4));
        fam.insert(0.1, flat(9, 0.1));
        fam.insert(0.2, flat(5, 0.2));
        assert_eq!(fam.steps(), vec![0.1, 0.2, 0.4]);
        assert_eq!(fam.get(0.2).unwrap().len(), 5);
        assert!(fam.get(0.3).is_none());
    }

    #[test]
    fn equal_step_replaces() {
        let mut fam = TrajectoryFamily::new();
        fam.insert(0.5, flat(3, 0.5));
        fam.insert(0.5, flat(7, 0.5));
        assert_eq!(fam.len(), 1);
        assert_eq!(fam.get(0.5).unwrap().len(), 7);
    }

    #[test]
    fn refined_steps_halve_exactly() {
        let steps: Vec<f64> = refined_steps(1.6, 4).collect();
        assert_eq!(steps, vec![1.6, 0.8, 0.4, 0.2]);
        assert_eq!(steps[1] * 2.0, steps[0]);
        assert_eq!(steps[3] * 2.0, steps[2]);
    }

    #[test]
    fn refined_family_grids_nest() {
        let params = ModelParameters { t_end: 8.0, h: 1.0, ..Default::default() };
        let fam = TrajectoryFamily::refined(&params, Method::Euler, 3);
        assert_eq!(fam.steps(), vec![0.25, 0.5, 1.0]);
        let fine = fam.get(0.5).unwrap();
        let coarse = fam.get(1.0).unwrap();
        for (tc, tf) in coarse.times().iter().zip(fine.times().iter().step_by(2)) {
            assert_eq!(tc, tf);
        }
    }

    #[test]
    fn max_error_by_picks_worst_sample() {
        let tr: Trajectory = vec![(0.0, 0.0), (1.0, 1.5), (2.0, 2.1)].into_iter().collect();
        let err = tr.max_error_by(|t| t);
        assert!((err - 0.5).abs() < 1e-12);
    }
}
