use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Result, SimError};
use crate::utils::math::{Real, Vector};

/// A simulated particle.
///
/// `velocity` is persisted state for the Euler schemes. Under Verlet it is
/// only a read-out reconstructed from position history every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointMassData")]
pub struct PointMass {
    pub position: Vector,
    pub previous_position: Vector,
    pub velocity: Vector,
    pub force: Vector,
    mass: Real,
    radius: Real,
    pub pinned: bool,
}

/// Unchecked wire form; deserialization goes through [`PointMass::new`].
#[derive(Deserialize)]
struct PointMassData {
    position: Vector,
    previous_position: Vector,
    velocity: Vector,
    force: Vector,
    mass: Real,
    radius: Real,
    pinned: bool,
}

impl TryFrom<PointMassData> for PointMass {
    type Error = SimError;

    fn try_from(data: PointMassData) -> Result<Self> {
        let mut particle = Self::new(data.position, data.radius, data.mass)?;
        particle.previous_position = data.previous_position;
        particle.velocity = data.velocity;
        particle.force = data.force;
        particle.pinned = data.pinned;
        Ok(particle)
    }
}

impl PointMass {
    /// Creates a particle at rest.
    pub fn new(position: Vector, radius: Real, mass: Real) -> Result<Self> {
        ensure_positive("mass", mass)?;
        ensure_positive("radius", radius)?;
        Ok(Self {
            position,
            previous_position: position,
            velocity: Vector::ZERO,
            force: Vector::ZERO,
            mass,
            radius,
            pinned: false,
        })
    }

    /// Creates a moving particle whose position history is seeded so that
    /// the first Verlet step continues with `velocity`.
    pub fn with_velocity(
        position: Vector,
        velocity: Vector,
        radius: Real,
        mass: Real,
        dt: Real,
    ) -> Result<Self> {
        ensure_positive("time step", dt)?;
        let mut particle = Self::new(position, radius, mass)?;
        particle.velocity = velocity;
        particle.previous_position = position - velocity * dt;
        Ok(particle)
    }

    pub fn mass(&self) -> Real {
        self.mass
    }

    pub fn inverse_mass(&self) -> Real {
        1.0 / self.mass
    }

    pub fn radius(&self) -> Real {
        self.radius
    }

    /// Adds to the accumulated force. Pinned particles accept the force and
    /// discard it at integration time.
    pub fn apply_force(&mut self, force: Vector) {
        self.force += force;
    }

    pub fn reset_force(&mut self) {
        self.force = Vector::ZERO;
    }

    pub fn acceleration(&self) -> Vector {
        self.force / self.mass
    }

    /// Störmer–Verlet position update.
    pub fn integrate_verlet(&mut self, dt: Real) {
        if self.pinned {
            return;
        }

        let acceleration = self.acceleration();
        let current = self.position;
        self.position = 2.0 * current - self.previous_position + acceleration * dt * dt;
        self.previous_position = current;
        self.velocity = (self.position - self.previous_position) / dt;
    }

    /// Forward (explicit) Euler: the position advances with the velocity from
    /// the start of the step.
    pub fn integrate_euler(&mut self, dt: Real) {
        if self.pinned {
            return;
        }

        let acceleration = self.acceleration();
        self.previous_position = self.position;
        self.position += self.velocity * dt;
        self.velocity += acceleration * dt;
    }

    /// Semi-implicit Euler: velocity first, then position with the new
    /// velocity. Produces the same trajectory as Verlet.
    pub fn integrate_semi_implicit_euler(&mut self, dt: Real) {
        if self.pinned {
            return;
        }

        let acceleration = self.acceleration();
        self.velocity += acceleration * dt;
        self.previous_position = self.position;
        self.position += self.velocity * dt;
    }

    /// Moves the particle without touching its history. Releasing a dragged
    /// particle therefore keeps the implied Verlet velocity of the drag.
    pub fn set_position(&mut self, position: Vector) {
        self.position = position;
    }

    pub fn toggle_pinned(&mut self) {
        self.pinned = !self.pinned;
    }

    pub fn kinetic_energy(&self) -> Real {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::vec2;
    use approx::assert_relative_eq;

    const DT: Real = 0.01;

    #[test]
    fn rejects_non_positive_mass_and_radius() {
        assert!(PointMass::new(Vector::ZERO, 1.0, 0.0).is_err());
        assert!(PointMass::new(Vector::ZERO, 1.0, -3.0).is_err());
        assert!(PointMass::new(Vector::ZERO, 0.0, 1.0).is_err());
        assert!(PointMass::new(Vector::ZERO, 1.0, 1.0).is_ok());
    }

    #[test]
    fn verlet_from_rest_moves_by_a_dt_squared() {
        let mut p = PointMass::new(vec2(0.0, 0.0), 1.0, 2.0).unwrap();
        p.apply_force(vec2(0.0, 200.0));
        p.integrate_verlet(DT);
        assert_relative_eq!(p.position.y, 100.0 * DT * DT, epsilon = 1e-12);
        assert_eq!(p.previous_position, Vector::ZERO);
        assert_relative_eq!(p.velocity.y, 100.0 * DT, epsilon = 1e-12);
    }

    #[test]
    fn verlet_without_force_keeps_constant_velocity() {
        let mut p =
            PointMass::with_velocity(vec2(10.0, 0.0), vec2(3.0, -4.0), 1.0, 1.0, DT).unwrap();
        for _ in 0..100 {
            p.integrate_verlet(DT);
        }
        assert_relative_eq!(p.position.x, 13.0, epsilon = 1e-9);
        assert_relative_eq!(p.position.y, -4.0, epsilon = 1e-9);
        assert_relative_eq!(p.velocity.x, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn pinned_particle_ignores_integration() {
        let mut p = PointMass::new(vec2(5.0, 5.0), 1.0, 1.0).unwrap();
        p.pinned = true;
        p.apply_force(vec2(1000.0, 1000.0));
        p.integrate_verlet(DT);
        p.integrate_euler(DT);
        p.integrate_semi_implicit_euler(DT);
        assert_eq!(p.position, vec2(5.0, 5.0));
    }

    #[test]
    fn euler_variants_differ_in_update_order() {
        let start = PointMass::with_velocity(Vector::ZERO, vec2(1.0, 0.0), 1.0, 1.0, DT).unwrap();

        let mut explicit = start;
        explicit.apply_force(vec2(0.0, 10.0));
        explicit.integrate_euler(DT);
        assert_relative_eq!(explicit.position.y, 0.0);
        assert_relative_eq!(explicit.velocity.y, 0.1, epsilon = 1e-12);

        let mut semi = start;
        semi.apply_force(vec2(0.0, 10.0));
        semi.integrate_semi_implicit_euler(DT);
        assert_relative_eq!(semi.position.y, 0.1 * DT, epsilon = 1e-12);
        assert_relative_eq!(semi.position.x, DT, epsilon = 1e-12);
    }

    #[test]
    fn deserialization_validates_mass_and_radius() {
        let mut p = PointMass::new(vec2(1.0, 2.0), 3.0, 4.0).unwrap();
        p.pinned = true;
        let json = serde_json::to_string(&p).unwrap();
        let back: PointMass = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);

        let massless = json.replace("\"mass\":4.0", "\"mass\":0.0");
        assert!(serde_json::from_str::<PointMass>(&massless).is_err());
        let flat = json.replace("\"radius\":3.0", "\"radius\":-1.0");
        assert!(serde_json::from_str::<PointMass>(&flat).is_err());
    }

    #[test]
    fn set_position_keeps_history() {
        let mut p = PointMass::new(vec2(1.0, 1.0), 1.0, 1.0).unwrap();
        p.set_position(vec2(4.0, 1.0));
        assert_eq!(p.previous_position, vec2(1.0, 1.0));
        p.integrate_verlet(DT);
        assert_relative_eq!(p.position.x, 7.0);
    }
}
