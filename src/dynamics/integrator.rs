use serde::{Deserialize, Serialize};

use crate::core::{planet::Planet, point_mass::PointMass};
use crate::utils::math::Real;

/// Time-integration scheme applied uniformly to a set of bodies.
///
/// Every scheme keeps both position history and velocity current, so the
/// mode can be switched between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Integrator {
    /// Forward Euler. First order, gains energy on closed orbits.
    #[default]
    Euler,
    /// Velocity first, then position. Same trajectory as Verlet.
    SemiImplicitEuler,
    /// Störmer–Verlet on position history.
    Verlet,
}

impl Integrator {
    pub fn integrate(self, particle: &mut PointMass, dt: Real) {
        match self {
            Integrator::Euler => particle.integrate_euler(dt),
            Integrator::SemiImplicitEuler => particle.integrate_semi_implicit_euler(dt),
            Integrator::Verlet => particle.integrate_verlet(dt),
        }
    }

    pub fn step_planets(self, planets: &mut [Planet], dt: Real) {
        for planet in planets.iter_mut() {
            self.integrate(planet.body_mut(), dt);
        }
    }

    /// Next mode in the `Euler -> Verlet -> Euler` toggle used by the
    /// interactive front-end.
    pub fn toggled(self) -> Self {
        match self {
            Integrator::Verlet => Integrator::Euler,
            Integrator::Euler | Integrator::SemiImplicitEuler => Integrator::Verlet,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Integrator::Euler => "Euler",
            Integrator::SemiImplicitEuler => "Semi-implicit Euler",
            Integrator::Verlet => "Verlet",
        }
    }
}
