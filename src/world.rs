//! Scene façades consumed by front-ends, plus a fixed-timestep container.

pub mod cloth;
pub mod orbits;
pub mod rope;

use std::time::{Duration, Instant};

use crate::{
    config::DEFAULT_TIME_STEP,
    core::{constraints::DistanceConstraint, point_mass::PointMass},
    dynamics::{forces::ForceRegistry, solver::RelaxationMetrics},
    error::{ensure_positive, Result},
    utils::{
        logging::{warn_if_frame_budget_exceeded, ScopedTimer},
        math::{distance, Real, Vector},
    },
};

pub use cloth::Cloth;
pub use orbits::PlanetSystem;
pub use rope::Rope;

/// Per-tick diagnostics.
#[derive(Debug, Default, Clone)]
pub struct StepReport {
    pub relaxation: RelaxationMetrics,
    /// Gravitating pairs skipped because the bodies coincide.
    pub degenerate_pairs: usize,
    pub integrate_time: Duration,
    pub relax_time: Duration,
}

/// The simulation currently owned by a world.
#[derive(Debug)]
pub enum Scene {
    Rope(Rope),
    Cloth(Cloth),
    Planets(PlanetSystem),
}

impl Scene {
    pub fn step(&mut self, dt: Real) -> Result<StepReport> {
        match self {
            Scene::Rope(rope) => rope.step(dt),
            Scene::Cloth(cloth) => cloth.step(dt),
            Scene::Planets(system) => system.step(dt),
        }
    }

    pub fn positions(&self) -> Vec<Vector> {
        match self {
            Scene::Rope(rope) => rope.positions(),
            Scene::Cloth(cloth) => cloth.positions(),
            Scene::Planets(system) => system.positions(),
        }
    }

    /// Flat index of the closest particle. Planets are not pickable.
    pub fn nearest_particle(&self, point: Vector) -> Option<usize> {
        match self {
            Scene::Rope(rope) => Some(rope.nearest_particle(point)),
            Scene::Cloth(cloth) => {
                let at = cloth.nearest_particle(point);
                cloth.grid().index(at)
            }
            Scene::Planets(_) => None,
        }
    }

    /// Out-of-range or non-pickable targets are ignored.
    pub fn toggle_pinned(&mut self, index: usize) {
        match self {
            Scene::Rope(rope) => rope.toggle_pinned(index),
            Scene::Cloth(cloth) => {
                if let Some(at) = cloth.grid().coords(index) {
                    cloth.toggle_pinned(at);
                }
            }
            Scene::Planets(_) => {}
        }
    }

    /// Out-of-range or non-pickable targets are ignored.
    pub fn set_position(&mut self, index: usize, point: Vector) {
        match self {
            Scene::Rope(rope) => rope.set_position(index, point),
            Scene::Cloth(cloth) => {
                if let Some(at) = cloth.grid().coords(index) {
                    cloth.set_position(at, point);
                }
            }
            Scene::Planets(_) => {}
        }
    }
}

/// Owns at most one scene and advances it at a fixed timestep.
#[derive(Debug)]
pub struct PhysicsWorld {
    scene: Option<Scene>,
    time_step: Real,
    time_accumulated: Real,
    ticks: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_STEP)
    }
}

impl PhysicsWorld {
    /// Non-positive or non-finite timesteps fall back to the default.
    pub fn new(time_step: Real) -> Self {
        let ts = if time_step.is_finite() && time_step > 0.0 {
            time_step
        } else {
            DEFAULT_TIME_STEP
        };
        Self {
            scene: None,
            time_step: ts,
            time_accumulated: 0.0,
            ticks: 0,
        }
    }

    pub fn time_step(&self) -> Real {
        self.time_step
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    pub fn set_scene(&mut self, scene: Scene) {
        self.scene = Some(scene);
        self.time_accumulated = 0.0;
    }

    /// Drops the scene wholesale.
    pub fn clear(&mut self) {
        if self.scene.take().is_some() {
            log::info!("scene cleared after {} ticks", self.ticks);
        }
        self.time_accumulated = 0.0;
        self.ticks = 0;
    }

    /// Runs exactly one fixed tick. `Ok(None)` when there is no scene.
    pub fn step(&mut self) -> Result<Option<StepReport>> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(None);
        };
        let started = Instant::now();
        let report = scene.step(self.time_step)?;
        self.ticks += 1;
        warn_if_frame_budget_exceeded(started.elapsed(), Duration::from_secs_f64(self.time_step));
        Ok(Some(report))
    }

    /// Accumulates wall-clock time and runs as many fixed ticks as fit.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Real) -> Result<usize> {
        ensure_positive("elapsed time", elapsed)?;
        self.time_accumulated += elapsed;

        let mut ticks = 0;
        while self.time_accumulated >= self.time_step {
            self.time_accumulated -= self.time_step;
            if self.step()?.is_none() {
                self.time_accumulated = 0.0;
                break;
            }
            ticks += 1;
        }
        Ok(ticks)
    }
}

/// Shared soft-body phase: reset forces, apply external forces, Verlet.
pub(crate) fn integrate_soft_body(
    particles: &mut [PointMass],
    forces: &ForceRegistry,
    dt: Real,
    report: &mut StepReport,
) -> Result<()> {
    ensure_positive("time step", dt)?;
    let _timer = ScopedTimer::recording("soft_body::integrate", &mut report.integrate_time);
    for particle in particles.iter_mut() {
        particle.reset_force();
    }
    forces.apply_all(particles, dt);
    for particle in particles.iter_mut() {
        particle.integrate_verlet(dt);
    }
    Ok(())
}

/// Linear scan; strict comparison keeps the first of equally close
/// particles.
pub(crate) fn nearest_index(particles: &[PointMass], point: Vector) -> Option<usize> {
    let mut best: Option<(usize, Real)> = None;
    for (i, particle) in particles.iter().enumerate() {
        let d = distance(point, particle.position);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

pub(crate) fn link_segments(
    particles: &[PointMass],
    constraints: &[DistanceConstraint],
) -> Vec<(Vector, Vector)> {
    constraints
        .iter()
        .filter_map(|c| {
            let (a, b) = c.endpoints();
            Some((particles.get(a)?.position, particles.get(b)?.position))
        })
        .collect()
}

pub(crate) fn pinned_indices(particles: &[PointMass]) -> Vec<usize> {
    particles
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.pinned.then_some(i))
        .collect()
}
