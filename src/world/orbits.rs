use crate::{
    config::{DEFAULT_TIME_STEP, GRAVITATIONAL_CONSTANT},
    core::planet::Planet,
    dynamics::{
        forces::{pairwise_gravitate, potential_energy},
        integrator::Integrator,
    },
    error::{ensure_positive, Result, SimError},
    utils::{
        logging::ScopedTimer,
        math::{vec2, Real, Vector},
    },
};

use super::StepReport;

/// Unconnected planets attracting each other pairwise.
#[derive(Debug, Clone)]
pub struct PlanetSystem {
    planets: Vec<Planet>,
    integrator: Integrator,
    gravitational_constant: Real,
    time_step: Real,
}

impl Default for PlanetSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanetSystem {
    pub fn new() -> Self {
        Self {
            planets: Vec::new(),
            integrator: Integrator::default(),
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            time_step: DEFAULT_TIME_STEP,
        }
    }

    pub fn with_gravitational_constant(mut self, g: Real) -> Result<Self> {
        if !g.is_finite() {
            return Err(SimError::invalid(format!(
                "gravitational constant must be finite, got {g}"
            )));
        }
        self.gravitational_constant = g;
        Ok(self)
    }

    /// Timestep used to seed the position history of new planets.
    pub fn with_time_step(mut self, dt: Real) -> Result<Self> {
        ensure_positive("time step", dt)?;
        self.time_step = dt;
        Ok(self)
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    /// Two equal planets on opposite sides of a shared centre, moving in
    /// opposite directions.
    pub fn two_body_demo() -> Result<Self> {
        let mut system = Self::new();
        system.load_two_body_demo()?;
        Ok(system)
    }

    /// Replaces the current planets with the two-body preset, keeping the
    /// integrator mode.
    pub fn load_two_body_demo(&mut self) -> Result<()> {
        let planets = vec![
            Planet::new(vec2(230.0, 300.0), vec2(0.0, 65.0), 250.0, 30.0, self.time_step)?,
            Planet::new(vec2(370.0, 300.0), vec2(0.0, -65.0), 250.0, 30.0, self.time_step)?,
        ];
        self.planets = planets;
        log::info!("loaded two-body demo");
        Ok(())
    }

    pub fn add_planet(&mut self, position: Vector, velocity: Vector, mass: Real, radius: Real) -> Result<usize> {
        let planet = Planet::new(position, velocity, mass, radius, self.time_step)?;
        self.planets.push(planet);
        Ok(self.planets.len() - 1)
    }

    /// Adds a planet thrown from `center` toward `aim`.
    pub fn launch(&mut self, center: Vector, aim: Vector, radius: Real) -> Result<usize> {
        let planet = Planet::launched(center, aim, radius, self.time_step)?;
        self.planets.push(planet);
        Ok(self.planets.len() - 1)
    }

    pub fn clear(&mut self) {
        self.planets.clear();
    }

    /// Advances one tick: reset forces, pairwise gravitation, integration
    /// with the current mode.
    pub fn step(&mut self, dt: Real) -> Result<StepReport> {
        ensure_positive("time step", dt)?;
        let mut report = StepReport::default();
        for planet in self.planets.iter_mut() {
            planet.body_mut().reset_force();
        }
        report.degenerate_pairs = pairwise_gravitate(&mut self.planets, self.gravitational_constant);
        {
            let _timer = ScopedTimer::recording("planets::integrate", &mut report.integrate_time);
            self.integrator.step_planets(&mut self.planets, dt);
        }
        Ok(report)
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }

    /// Switching is allowed between any two ticks.
    pub fn set_integrator(&mut self, integrator: Integrator) {
        if integrator != self.integrator {
            log::debug!("integrator: {} -> {}", self.integrator.label(), integrator.label());
        }
        self.integrator = integrator;
    }

    pub fn toggle_integrator(&mut self) -> Integrator {
        self.set_integrator(self.integrator.toggled());
        self.integrator
    }

    pub fn gravitational_constant(&self) -> Real {
        self.gravitational_constant
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    pub fn positions(&self) -> Vec<Vector> {
        self.planets.iter().map(Planet::position).collect()
    }

    pub fn radii(&self) -> Vec<Real> {
        self.planets.iter().map(Planet::radius).collect()
    }

    pub fn kinetic_energy(&self) -> Real {
        self.planets.iter().map(Planet::kinetic_energy).sum()
    }

    pub fn potential_energy(&self) -> Real {
        potential_energy(&self.planets, self.gravitational_constant)
    }

    pub fn total_energy(&self) -> Real {
        self.kinetic_energy() + self.potential_energy()
    }

    pub fn total_momentum(&self) -> Vector {
        self.planets.iter().map(Planet::momentum).sum()
    }

    /// Mass-weighted mean position, `None` for an empty system.
    pub fn center_of_mass(&self) -> Option<Vector> {
        let total: Real = self.planets.iter().map(Planet::mass).sum();
        if self.planets.is_empty() || total <= 0.0 {
            return None;
        }
        let weighted: Vector = self.planets.iter().map(|p| p.position() * p.mass()).sum();
        Some(weighted / total)
    }
}
