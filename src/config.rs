//! Global configuration constants for the simulation kernel.
//!
//! Coordinates are screen-space: +Y points down, so gravity is positive Y.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Result, SimError};

/// Default integration timestep (in seconds), matching a 100 Hz scheduler.
pub const DEFAULT_TIME_STEP: f64 = 1.0 / 100.0;

/// Number of Jakobsen relaxation passes per tick. Also the exponent of the
/// stiffness correction factor.
pub const DEFAULT_RELAXATION_PASSES: u32 = 20;

/// Upper bound on relaxation passes per tick.
pub const MAX_RELAXATION_PASSES: u32 = 10_000;

/// Uniform gravitational acceleration applied to rope and cloth particles.
pub const SOFT_BODY_GRAVITY: [f64; 2] = [0.0, 1000.0];

/// Gravitational constant used between planets.
pub const GRAVITATIONAL_CONSTANT: f64 = 10_000.0;

/// Mass per unit area of a launched planet.
pub const PLANET_DENSITY: f64 = 0.1;

/// Scale from launch drag distance to initial planet velocity.
pub const LAUNCH_VELOCITY_SCALE: f64 = 0.25;

/// Default particle radius for ropes and cloths.
pub const DEFAULT_PARTICLE_RADIUS: f64 = 5.0;

/// Default particle mass for ropes and cloths.
pub const DEFAULT_PARTICLE_MASS: f64 = 5.0;

/// Default constraint stiffness.
pub const DEFAULT_STIFFNESS: f64 = 1.0;

/// Default number of particles along a rope, or per side of a cloth.
pub const DEFAULT_POINT_COUNT: usize = 20;

/// Tunable simulation parameters, loadable from any serde format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub time_step: f64,
    pub relaxation_passes: u32,
    pub gravity: [f64; 2],
    pub gravitational_constant: f64,
    pub particle_radius: f64,
    pub particle_mass: f64,
    pub stiffness: f64,
    pub point_count: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            relaxation_passes: DEFAULT_RELAXATION_PASSES,
            gravity: SOFT_BODY_GRAVITY,
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            particle_radius: DEFAULT_PARTICLE_RADIUS,
            particle_mass: DEFAULT_PARTICLE_MASS,
            stiffness: DEFAULT_STIFFNESS,
            point_count: DEFAULT_POINT_COUNT,
        }
    }
}

impl SimulationConfig {
    /// Checks every field against the ranges the kernel accepts.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("time step", self.time_step)?;
        ensure_positive("particle radius", self.particle_radius)?;
        ensure_positive("particle mass", self.particle_mass)?;
        ensure_stiffness(self.stiffness)?;
        ensure_relaxation_passes(self.relaxation_passes)?;
        if self.point_count < 2 {
            return Err(SimError::invalid(format!(
                "point count must be at least 2, got {}",
                self.point_count
            )));
        }
        if !self.gravitational_constant.is_finite() || self.gravity.iter().any(|g| !g.is_finite())
        {
            return Err(SimError::invalid("gravity terms must be finite"));
        }
        Ok(())
    }
}

pub(crate) fn ensure_relaxation_passes(passes: u32) -> Result<()> {
    if (1..=MAX_RELAXATION_PASSES).contains(&passes) {
        Ok(())
    } else {
        Err(SimError::invalid(format!(
            "relaxation passes must be in 1..={MAX_RELAXATION_PASSES}, got {passes}"
        )))
    }
}

/// Stiffness lives in (0, 1].
pub(crate) fn ensure_stiffness(stiffness: f64) -> Result<()> {
    if stiffness > 0.0 && stiffness <= 1.0 {
        Ok(())
    } else {
        Err(SimError::invalid(format!(
            "stiffness must be in (0, 1], got {stiffness}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let bad = [
            SimulationConfig {
                stiffness: 0.0,
                ..Default::default()
            },
            SimulationConfig {
                stiffness: 1.5,
                ..Default::default()
            },
            SimulationConfig {
                relaxation_passes: 0,
                ..Default::default()
            },
            SimulationConfig {
                relaxation_passes: u32::MAX,
                ..Default::default()
            },
            SimulationConfig {
                point_count: 1,
                ..Default::default()
            },
            SimulationConfig {
                particle_mass: -1.0,
                ..Default::default()
            },
            SimulationConfig {
                time_step: 0.0,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }
}
