use crate::core::{planet::Planet, point_mass::PointMass};
use crate::utils::{
    math::{separation, Real, Vector},
    slots::pair_mut,
};

/// External force applied to every particle of a soft body each tick.
pub trait ForceGenerator: Send + Sync {
    fn apply(&self, particle: &mut PointMass, dt: Real);
}

/// Uniform gravitational field; force scales with particle mass.
pub struct GravityForce {
    pub acceleration: Vector,
}

impl GravityForce {
    pub fn new(acceleration: Vector) -> Self {
        Self { acceleration }
    }
}

impl ForceGenerator for GravityForce {
    fn apply(&self, particle: &mut PointMass, _dt: Real) {
        if particle.pinned {
            return;
        }
        particle.apply_force(self.acceleration * particle.mass());
    }
}

/// Collection of forces applied to a soft body every tick.
pub struct ForceRegistry {
    forces: Vec<Box<dyn ForceGenerator>>,
}

impl Default for ForceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceRegistry {
    pub fn new() -> Self {
        Self { forces: Vec::new() }
    }

    /// Registry preloaded with a uniform gravity field.
    pub fn with_gravity(acceleration: Vector) -> Self {
        let mut registry = Self::new();
        registry.add_force(GravityForce::new(acceleration));
        registry
    }

    pub fn add_force<F: ForceGenerator + 'static>(&mut self, force: F) {
        self.forces.push(Box::new(force));
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub fn apply_all(&self, particles: &mut [PointMass], dt: Real) {
        for force in &self.forces {
            for particle in particles.iter_mut() {
                force.apply(particle, dt);
            }
        }
    }
}

impl std::fmt::Debug for ForceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceRegistry")
            .field("forces", &self.forces.len())
            .finish()
    }
}

/// Accumulates inverse-square attraction for every unordered pair, equal
/// and opposite on the two bodies.
///
/// Coincident pairs have no defined direction and are skipped; the return
/// value is the number of skipped pairs.
pub fn pairwise_gravitate(bodies: &mut [Planet], g: Real) -> usize {
    let mut degenerate = 0;
    let count = bodies.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let Some((a, b)) = pair_mut(bodies, i, j) else {
                continue;
            };
            let Some((direction, length)) = separation(a.position(), b.position()) else {
                log::debug!("skipping gravitation between coincident bodies {i} and {j}");
                degenerate += 1;
                continue;
            };
            let magnitude = g * a.mass() * b.mass() / (length * length);
            let force = direction * magnitude;
            a.body_mut().apply_force(force);
            b.body_mut().apply_force(-force);
        }
    }
    degenerate
}

/// Total gravitational potential energy, `-G m1 m2 / r` summed over pairs.
/// Coincident pairs contribute nothing.
pub fn potential_energy(bodies: &[Planet], g: Real) -> Real {
    let mut total = 0.0;
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if let Some((_, length)) = separation(a.position(), b.position()) {
                total -= g * a.mass() * b.mass() / length;
            }
        }
    }
    total
}
