use serde::{Deserialize, Serialize};

use super::point_mass::PointMass;
use crate::config::{LAUNCH_VELOCITY_SCALE, PLANET_DENSITY};
use crate::error::Result;
use crate::utils::math::{Real, Vector};

/// Circular gravitating body. Shares the integration code of [`PointMass`]
/// but is never pinned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    body: PointMass,
}

impl Planet {
    /// `dt` seeds the previous position used by the Verlet scheme.
    pub fn new(position: Vector, velocity: Vector, mass: Real, radius: Real, dt: Real) -> Result<Self> {
        Ok(Self {
            body: PointMass::with_velocity(position, velocity, radius, mass, dt)?,
        })
    }

    /// Planet thrown by dragging from `center` to `aim`: mass follows the
    /// disc area, velocity the drag vector.
    pub fn launched(center: Vector, aim: Vector, radius: Real, dt: Real) -> Result<Self> {
        let mass = PLANET_DENSITY * std::f64::consts::PI * radius * radius;
        let velocity = LAUNCH_VELOCITY_SCALE * (aim - center);
        Self::new(center, velocity, mass, radius, dt)
    }

    pub fn position(&self) -> Vector {
        self.body.position
    }

    pub fn previous_position(&self) -> Vector {
        self.body.previous_position
    }

    pub fn velocity(&self) -> Vector {
        self.body.velocity
    }

    pub fn force(&self) -> Vector {
        self.body.force
    }

    pub fn mass(&self) -> Real {
        self.body.mass()
    }

    pub fn radius(&self) -> Real {
        self.body.radius()
    }

    pub fn momentum(&self) -> Vector {
        self.body.velocity * self.body.mass()
    }

    pub fn kinetic_energy(&self) -> Real {
        self.body.kinetic_energy()
    }

    pub(crate) fn body_mut(&mut self) -> &mut PointMass {
        &mut self.body
    }
}
