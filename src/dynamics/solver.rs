//! Jakobsen relaxation: iterative position-based distance constraints.

use serde::{Deserialize, Serialize};

use crate::config::{ensure_relaxation_passes, ensure_stiffness, DEFAULT_RELAXATION_PASSES};
use crate::core::{constraints::DistanceConstraint, point_mass::PointMass, topology::Grid};
use crate::error::{Result, SimError};
use crate::utils::{
    math::{separation, Real},
    slots::pair_mut,
};

/// Outcome of relaxing a single constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correction {
    Applied,
    /// Both endpoints pinned; the solver never overrides a pin.
    BothPinned,
    /// Endpoints coincide, so there is no direction to correct along.
    Degenerate,
    /// Endpoint indices do not address two distinct particles.
    Detached,
}

/// Counters collected over a relaxation call.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaxationMetrics {
    pub passes: u32,
    pub corrections: usize,
    pub pinned_skips: usize,
    pub degenerate_skips: usize,
    /// Largest `|length - rest length|` after the final pass.
    pub max_stretch: Real,
}

impl RelaxationMetrics {
    pub fn record(&mut self, correction: Correction) {
        match correction {
            Correction::Applied => self.corrections += 1,
            Correction::BothPinned => self.pinned_skips += 1,
            Correction::Degenerate | Correction::Detached => self.degenerate_skips += 1,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.corrections += other.corrections;
        self.pinned_skips += other.pinned_skips;
        self.degenerate_skips += other.degenerate_skips;
        self.max_stretch = self.max_stretch.max(other.max_stretch);
    }
}

/// Relaxation solver. `passes` is both the number of sweeps per call and
/// the exponent of the stiffness correction factor, so the two can never
/// drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SolverData")]
pub struct JakobsenSolver {
    passes: u32,
    stiffness: Real,
}

#[derive(Deserialize)]
struct SolverData {
    passes: u32,
    stiffness: Real,
}

impl TryFrom<SolverData> for JakobsenSolver {
    type Error = SimError;

    fn try_from(data: SolverData) -> Result<Self> {
        Self::with_passes(data.stiffness, data.passes)
    }
}

impl JakobsenSolver {
    pub fn new(stiffness: Real) -> Result<Self> {
        Self::with_passes(stiffness, DEFAULT_RELAXATION_PASSES)
    }

    pub fn with_passes(stiffness: Real, passes: u32) -> Result<Self> {
        ensure_stiffness(stiffness)?;
        ensure_relaxation_passes(passes)?;
        Ok(Self { passes, stiffness })
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn stiffness(&self) -> Real {
        self.stiffness
    }

    pub fn set_stiffness(&mut self, stiffness: Real) -> Result<()> {
        ensure_stiffness(stiffness)?;
        self.stiffness = stiffness;
        Ok(())
    }

    /// `k = 1 - (1 - stiffness)^passes`.
    pub fn correction_factor(&self) -> Real {
        let exponent = i32::try_from(self.passes).unwrap_or(i32::MAX);
        1.0 - (1.0 - self.stiffness).powi(exponent)
    }

    /// Runs every pass over `constraints` in order (Gauss-Seidel: later
    /// constraints see positions already moved by earlier ones).
    pub fn relax(&self, particles: &mut [PointMass], constraints: &[DistanceConstraint]) -> RelaxationMetrics {
        let k = self.correction_factor();
        let mut metrics = RelaxationMetrics {
            passes: self.passes,
            ..Default::default()
        };
        for _ in 0..self.passes {
            for constraint in constraints {
                metrics.record(relax_constraint(particles, constraint, k));
            }
        }
        metrics.max_stretch = max_stretch(particles, constraints);
        if metrics.degenerate_skips > 0 {
            log::debug!(
                "relaxation skipped {} degenerate corrections",
                metrics.degenerate_skips
            );
        }
        metrics
    }

    /// Sequential grid sweep: each pass relaxes all vertical links
    /// top-to-bottom, then all horizontal links left-to-right. The grid
    /// stores its constraints in exactly that order.
    pub fn relax_grid(&self, grid: &mut Grid) -> RelaxationMetrics {
        let (particles, constraints) = grid.split_mut();
        self.relax(particles, constraints)
    }
}

/// Moves the endpoints of one constraint toward its rest length.
pub fn relax_constraint(particles: &mut [PointMass], constraint: &DistanceConstraint, k: Real) -> Correction {
    let (a, b) = constraint.endpoints();
    match pair_mut(particles, a, b) {
        Some((v, w)) => relax_pair(v, w, constraint.rest_length(), k),
        None => Correction::Detached,
    }
}

/// Correction for endpoints `v` and `w`, weighted by inverse mass. A free
/// endpoint tied to a pinned one takes the whole correction; two free
/// endpoints split it.
pub fn relax_pair(v: &mut PointMass, w: &mut PointMass, rest_length: Real, k: Real) -> Correction {
    if v.pinned && w.pinned {
        return Correction::BothPinned;
    }
    let Some((r_hat, r_mag)) = separation(v.position, w.position) else {
        return Correction::Degenerate;
    };
    let delta = r_mag - rest_length;

    if v.pinned {
        w.position -= r_hat * (k * w.inverse_mass() * delta);
    } else if w.pinned {
        v.position += r_hat * (k * v.inverse_mass() * delta);
    } else {
        let half = delta / 2.0;
        v.position += r_hat * (k * v.inverse_mass() * half);
        w.position -= r_hat * (k * w.inverse_mass() * half);
    }
    Correction::Applied
}

pub(crate) fn max_stretch(particles: &[PointMass], constraints: &[DistanceConstraint]) -> Real {
    constraints
        .iter()
        .filter_map(|c| c.stretch(particles))
        .fold(0.0, |acc: Real, s| acc.max(s.abs()))
}
