use crate::{
    config::{SimulationConfig, SOFT_BODY_GRAVITY},
    core::{
        point_mass::PointMass,
        topology::{build_chain, Chain},
    },
    dynamics::{forces::ForceRegistry, solver::JakobsenSolver},
    error::Result,
    utils::{
        logging::ScopedTimer,
        math::{Real, Vector},
    },
};

use super::{integrate_soft_body, nearest_index, StepReport};

/// A chain of particles under gravity, held together by distance
/// constraints.
#[derive(Debug)]
pub struct Rope {
    chain: Chain,
    solver: JakobsenSolver,
    forces: ForceRegistry,
}

impl Rope {
    pub fn new(
        start: Vector,
        end: Vector,
        count: usize,
        radius: Real,
        mass: Real,
        stiffness: Real,
    ) -> Result<Self> {
        let solver = JakobsenSolver::new(stiffness)?;
        let chain = build_chain(start, end, count, radius, mass)?;
        log::info!("created rope with {count} particles");
        Ok(Self {
            chain,
            solver,
            forces: ForceRegistry::with_gravity(Vector::from(SOFT_BODY_GRAVITY)),
        })
    }

    pub fn from_config(start: Vector, end: Vector, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let solver = JakobsenSolver::with_passes(config.stiffness, config.relaxation_passes)?;
        let chain = build_chain(
            start,
            end,
            config.point_count,
            config.particle_radius,
            config.particle_mass,
        )?;
        Ok(Self {
            chain,
            solver,
            forces: ForceRegistry::with_gravity(Vector::from(config.gravity)),
        })
    }

    /// Advances one tick: gravity, Verlet integration, relaxation.
    pub fn step(&mut self, dt: Real) -> Result<StepReport> {
        let mut report = StepReport::default();
        integrate_soft_body(self.chain.particles_mut(), &self.forces, dt, &mut report)?;
        {
            let _timer = ScopedTimer::recording("rope::relax", &mut report.relax_time);
            let (particles, constraints) = self.chain.split_mut();
            report.relaxation = self.solver.relax(particles, constraints);
        }
        Ok(report)
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn particles(&self) -> &[PointMass] {
        self.chain.particles()
    }

    pub fn positions(&self) -> Vec<Vector> {
        self.particles().iter().map(|p| p.position).collect()
    }

    /// Endpoint positions of every link, for line drawing.
    pub fn links(&self) -> Vec<(Vector, Vector)> {
        super::link_segments(self.chain.particles(), self.chain.constraints())
    }

    pub fn pinned_indices(&self) -> Vec<usize> {
        super::pinned_indices(self.particles())
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.particles().get(index).is_some_and(|p| p.pinned)
    }

    /// Index of the particle closest to `point`; the first one wins ties.
    pub fn nearest_particle(&self, point: Vector) -> usize {
        // chains always hold at least two particles
        nearest_index(self.particles(), point).unwrap_or(0)
    }

    /// Out-of-range indices are ignored.
    pub fn toggle_pinned(&mut self, index: usize) {
        if let Some(p) = self.chain.particles_mut().get_mut(index) {
            p.toggle_pinned();
        }
    }

    /// Out-of-range indices are ignored.
    pub fn set_position(&mut self, index: usize, point: Vector) {
        if let Some(p) = self.chain.particles_mut().get_mut(index) {
            p.set_position(point);
        }
    }

    pub fn stiffness(&self) -> Real {
        self.solver.stiffness()
    }

    pub fn set_stiffness(&mut self, stiffness: Real) -> Result<()> {
        self.solver.set_stiffness(stiffness)
    }

    pub fn solver(&self) -> &JakobsenSolver {
        &self.solver
    }

    pub fn forces_mut(&mut self) -> &mut ForceRegistry {
        &mut self.forces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::{distance, vec2};
    use approx::assert_relative_eq;

    #[test]
    fn free_rope_falls() {
        let mut rope = Rope::new(vec2(100.0, 100.0), vec2(300.0, 100.0), 10, 5.0, 5.0, 1.0).unwrap();
        rope.step(0.01).unwrap();
        assert!(rope.particles().iter().all(|p| p.position.y > 100.0));
    }

    #[test]
    fn pinned_end_holds_while_rope_hangs() {
        let mut rope = Rope::new(vec2(0.0, 0.0), vec2(100.0, 0.0), 5, 1.0, 1.0, 1.0).unwrap();
        rope.toggle_pinned(0);
        let mut lowest_tip: Real = 0.0;
        for _ in 0..300 {
            rope.step(0.01).unwrap();
            lowest_tip = lowest_tip.max(rope.particles()[4].position.y);
        }
        assert_eq!(rope.particles()[0].position, vec2(0.0, 0.0));
        assert!(lowest_tip > 90.0, "tip should swing down, got {lowest_tip}");
        for pair in rope.particles().windows(2) {
            assert_relative_eq!(
                distance(pair[0].position, pair[1].position),
                25.0,
                epsilon = 0.5
            );
        }
    }

    #[test]
    fn out_of_range_commands_are_ignored() {
        let mut rope = Rope::new(vec2(0.0, 0.0), vec2(10.0, 0.0), 3, 1.0, 1.0, 1.0).unwrap();
        let before = rope.positions();
        rope.toggle_pinned(3);
        rope.set_position(99, vec2(50.0, 50.0));
        assert_eq!(rope.positions(), before);
        assert!(rope.pinned_indices().is_empty());
        assert!(!rope.is_pinned(3));
    }

    #[test]
    fn stiffness_is_validated_on_update() {
        let mut rope = Rope::new(vec2(0.0, 0.0), vec2(10.0, 0.0), 3, 1.0, 1.0, 1.0).unwrap();
        assert!(rope.set_stiffness(0.0).is_err());
        rope.set_stiffness(0.25).unwrap();
        assert_eq!(rope.stiffness(), 0.25);
    }
}
