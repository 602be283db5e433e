use crate::{
    config::{SimulationConfig, SOFT_BODY_GRAVITY},
    core::{
        point_mass::PointMass,
        topology::{build_grid, Grid, GridIndex},
    },
    dynamics::{
        forces::ForceRegistry,
        solver::{JakobsenSolver, RelaxationMetrics},
    },
    error::Result,
    utils::{
        logging::ScopedTimer,
        math::{Real, Vector},
    },
};

use super::{integrate_soft_body, nearest_index, StepReport};

/// A square lattice of particles under gravity with row and column links.
#[derive(Debug)]
pub struct Cloth {
    grid: Grid,
    solver: JakobsenSolver,
    forces: ForceRegistry,
    parallel_enabled: bool,
}

impl Cloth {
    pub fn new(
        start: Vector,
        end: Vector,
        side_count: usize,
        radius: Real,
        mass: Real,
        stiffness: Real,
    ) -> Result<Self> {
        let solver = JakobsenSolver::new(stiffness)?;
        let grid = build_grid(start, end, side_count, radius, mass)?;
        log::info!("created cloth with {side_count}x{side_count} particles");
        Ok(Self {
            grid,
            solver,
            forces: ForceRegistry::with_gravity(Vector::from(SOFT_BODY_GRAVITY)),
            parallel_enabled: false,
        })
    }

    pub fn from_config(start: Vector, end: Vector, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let solver = JakobsenSolver::with_passes(config.stiffness, config.relaxation_passes)?;
        let grid = build_grid(
            start,
            end,
            config.point_count,
            config.particle_radius,
            config.particle_mass,
        )?;
        Ok(Self {
            grid,
            solver,
            forces: ForceRegistry::with_gravity(Vector::from(config.gravity)),
            parallel_enabled: false,
        })
    }

    /// Advances one tick: gravity, Verlet integration, then the
    /// vertical-then-horizontal relaxation sweep.
    pub fn step(&mut self, dt: Real) -> Result<StepReport> {
        let mut report = StepReport::default();
        integrate_soft_body(self.grid.particles_mut(), &self.forces, dt, &mut report)?;
        {
            let _timer = ScopedTimer::recording("cloth::relax", &mut report.relax_time);
            report.relaxation = self.relax();
        }
        Ok(report)
    }

    #[cfg(feature = "parallel")]
    fn relax(&mut self) -> RelaxationMetrics {
        if self.parallel_enabled {
            crate::dynamics::parallel::relax_grid(&self.solver, &mut self.grid)
        } else {
            self.solver.relax_grid(&mut self.grid)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn relax(&mut self) -> RelaxationMetrics {
        self.solver.relax_grid(&mut self.grid)
    }

    /// Relaxes independent links of each sweep concurrently. Results are
    /// identical to the sequential sweep. Without the `parallel` feature the
    /// flag is recorded but has no effect.
    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel_enabled = enabled;
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn particles(&self) -> &[PointMass] {
        self.grid.particles()
    }

    pub fn particle(&self, at: GridIndex) -> Option<&PointMass> {
        self.grid.particle(at)
    }

    pub fn positions(&self) -> Vec<Vector> {
        self.particles().iter().map(|p| p.position).collect()
    }

    pub fn links(&self) -> Vec<(Vector, Vector)> {
        super::link_segments(self.grid.particles(), self.grid.constraints())
    }

    pub fn pinned_indices(&self) -> Vec<GridIndex> {
        super::pinned_indices(self.particles())
            .into_iter()
            .filter_map(|i| self.grid.coords(i))
            .collect()
    }

    pub fn is_pinned(&self, at: GridIndex) -> bool {
        self.grid.particle(at).is_some_and(|p| p.pinned)
    }

    /// Closest particle to `point`; ties resolve to the first in row-major
    /// order.
    pub fn nearest_particle(&self, point: Vector) -> GridIndex {
        nearest_index(self.particles(), point)
            .and_then(|i| self.grid.coords(i))
            .unwrap_or(GridIndex::new(0, 0))
    }

    /// Out-of-range indices are ignored.
    pub fn toggle_pinned(&mut self, at: GridIndex) {
        if let Some(p) = self.grid.particle_mut(at) {
            p.toggle_pinned();
        }
    }

    /// Out-of-range indices are ignored.
    pub fn set_position(&mut self, at: GridIndex, point: Vector) {
        if let Some(p) = self.grid.particle_mut(at) {
            p.set_position(point);
        }
    }

    /// Pins every particle of the first row, like a curtain rail.
    pub fn pin_top_row(&mut self) {
        for col in 0..self.grid.cols() {
            if let Some(p) = self.grid.particle_mut(GridIndex::new(0, col)) {
                p.pinned = true;
            }
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
    use crate::utils::math::vec2;

    fn cloth() -> Cloth {
        Cloth::new(vec2(100.0, 100.0), vec2(200.0, 200.0), 5, 5.0, 5.0, 1.0).unwrap()
    }

    #[test]
    fn curtain_hangs_from_pinned_row() {
        let mut cloth = cloth();
        cloth.pin_top_row();
        assert_eq!(cloth.pinned_indices().len(), 5);
        let report = cloth.step(0.01).unwrap();
        assert_eq!(report.relaxation.passes, 20);
        assert!(report.relaxation.pinned_skips > 0);
        for col in 0..5 {
            let top = cloth.particle(GridIndex::new(0, col)).unwrap();
            assert_eq!(top.position.y, 100.0);
            let bottom = cloth.particle(GridIndex::new(4, col)).unwrap();
            assert!(bottom.position.y > 200.0);
        }
    }

    #[test]
    fn nearest_and_toggle_use_grid_coordinates() {
        let mut cloth = cloth();
        let at = cloth.nearest_particle(vec2(151.0, 174.0));
        assert_eq!(at, GridIndex::new(3, 2));
        cloth.toggle_pinned(at);
        assert!(cloth.is_pinned(at));
        cloth.toggle_pinned(at);
        assert!(!cloth.is_pinned(at));
    }

    #[test]
    fn out_of_range_commands_are_ignored() {
        let mut cloth = cloth();
        let before = cloth.positions();
        cloth.toggle_pinned(GridIndex::new(5, 0));
        cloth.set_position(GridIndex::new(0, 9), vec2(0.0, 0.0));
        assert_eq!(cloth.positions(), before);
        assert!(cloth.pinned_indices().is_empty());
    }

    #[test]
    fn links_cover_every_constraint() {
        let cloth = cloth();
        assert_eq!(cloth.links().len(), 5 * 4 + 5 * 4);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_cloth_tracks_sequential_cloth() {
        let mut sequential = cloth();
        let mut parallel = cloth();
        sequential.pin_top_row();
        parallel.pin_top_row();
        parallel.set_parallel_enabled(true);
        for _ in 0..50 {
            sequential.step(0.01).unwrap();
            parallel.step(0.01).unwrap();
        }
        assert_eq!(sequential.positions(), parallel.positions());
    }
}
