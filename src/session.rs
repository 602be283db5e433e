//! Interactive state for a front-end driving one scene: pause flag, corner
//! points placed before a rope or cloth exists, drag target, and the
//! planet being aimed before launch.

use crate::{
    config::SimulationConfig,
    dynamics::integrator::Integrator,
    error::{ensure_positive, Result},
    utils::math::{Real, Vector},
    world::{Cloth, PhysicsWorld, PlanetSystem, Rope, Scene, StepReport},
};

/// Radius given to launched planets unless changed.
pub const DEFAULT_LAUNCH_RADIUS: Real = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    Rope,
    Cloth,
    Planets,
}

/// Planet placed but not yet thrown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingLaunch {
    pub center: Vector,
    pub aim: Vector,
    pub radius: Real,
}

#[derive(Debug)]
pub struct Session {
    kind: SceneKind,
    config: SimulationConfig,
    world: PhysicsWorld,
    paused: bool,
    pending_points: Vec<Vector>,
    point_count: usize,
    drag_index: Option<usize>,
    pending_launch: Option<PendingLaunch>,
    launch_radius: Real,
}

impl Session {
    /// Rope and cloth sessions start paused with no scene; planet sessions
    /// start running with an empty system.
    pub fn new(kind: SceneKind, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut session = Self {
            kind,
            config,
            world: PhysicsWorld::new(config.time_step),
            paused: kind != SceneKind::Planets,
            pending_points: Vec::with_capacity(2),
            point_count: config.point_count,
            drag_index: None,
            pending_launch: None,
            launch_radius: DEFAULT_LAUNCH_RADIUS,
        };
        if kind == SceneKind::Planets {
            let system = session.empty_planets(Integrator::default())?;
            session.world.set_scene(Scene::Planets(system));
        }
        Ok(session)
    }

    fn empty_planets(&self, integrator: Integrator) -> Result<PlanetSystem> {
        Ok(PlanetSystem::new()
            .with_gravitational_constant(self.config.gravitational_constant)?
            .with_time_step(self.config.time_step)?
            .with_integrator(integrator))
    }

    fn planets_mut(&mut self) -> Option<&mut PlanetSystem> {
        match self.world.scene_mut() {
            Some(Scene::Planets(system)) => Some(system),
            _ => None,
        }
    }

    /// Primary click. Before a rope or cloth exists this records up to two
    /// corner points; afterwards it toggles the pin of the nearest
    /// particle. For planets the first click places a planet and the
    /// second throws it toward the aim point.
    pub fn place_point(&mut self, point: Vector) -> Result<()> {
        match self.kind {
            SceneKind::Planets => match self.pending_launch.take() {
                None => {
                    self.pending_launch = Some(PendingLaunch {
                        center: point,
                        aim: point,
                        radius: self.launch_radius,
                    });
                }
                Some(launch) => {
                    if let Some(system) = self.planets_mut() {
                        system.launch(launch.center, launch.aim, launch.radius)?;
                    }
                }
            },
            SceneKind::Rope | SceneKind::Cloth => {
                if self.world.scene().is_some() {
                    self.pin_nearest(point);
                } else if self.pending_points.len() < 2 {
                    self.pending_points.push(point);
                }
            }
        }
        Ok(())
    }

    /// Moves the aim of a planet waiting to be launched.
    pub fn aim_at(&mut self, point: Vector) {
        if let Some(launch) = self.pending_launch.as_mut() {
            launch.aim = point;
        }
    }

    pub fn set_launch_radius(&mut self, radius: Real) -> Result<()> {
        ensure_positive("launch radius", radius)?;
        self.launch_radius = radius;
        Ok(())
    }

    /// Changes the particle count used by the next rope or cloth. Never
    /// drops below two.
    pub fn adjust_point_count(&mut self, delta: isize) -> usize {
        self.point_count = self.point_count.saturating_add_signed(delta).max(2);
        self.point_count
    }

    /// Builds the rope or cloth once both corner points are placed.
    /// Returns whether a scene was created.
    pub fn confirm(&mut self) -> Result<bool> {
        if self.kind == SceneKind::Planets || self.world.scene().is_some() {
            return Ok(false);
        }
        let &[start, end] = self.pending_points.as_slice() else {
            return Ok(false);
        };
        let config = SimulationConfig {
            point_count: self.point_count,
            ..self.config
        };
        let scene = match self.kind {
            SceneKind::Rope => Scene::Rope(Rope::from_config(start, end, &config)?),
            _ => Scene::Cloth(Cloth::from_config(start, end, &config)?),
        };
        self.world.set_scene(scene);
        Ok(true)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Rope and cloth sessions return to their initial state. Planet
    /// sessions drop every planet but keep the integrator mode and the
    /// pause flag.
    pub fn reset(&mut self) -> Result<()> {
        self.drag_index = None;
        self.pending_launch = None;
        match self.kind {
            SceneKind::Planets => {
                let integrator = self.integrator().unwrap_or_default();
                let system = self.empty_planets(integrator)?;
                self.world.set_scene(Scene::Planets(system));
            }
            SceneKind::Rope | SceneKind::Cloth => {
                self.world.clear();
                self.pending_points.clear();
                self.point_count = self.config.point_count;
                self.paused = true;
            }
        }
        log::info!("session reset ({:?})", self.kind);
        Ok(())
    }

    /// Loads the two-body preset. Only meaningful for planet sessions.
    pub fn load_demo(&mut self) -> Result<bool> {
        match self.planets_mut() {
            Some(system) => {
                system.load_two_body_demo()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn toggle_integrator(&mut self) -> Option<Integrator> {
        self.planets_mut().map(PlanetSystem::toggle_integrator)
    }

    pub fn integrator(&self) -> Option<Integrator> {
        match self.world.scene() {
            Some(Scene::Planets(system)) => Some(system.integrator()),
            _ => None,
        }
    }

    /// Toggles the pin of the particle nearest to `point`.
    pub fn pin_nearest(&mut self, point: Vector) -> Option<usize> {
        let scene = self.world.scene_mut()?;
        let index = scene.nearest_particle(point)?;
        scene.toggle_pinned(index);
        Some(index)
    }

    /// Grabs the nearest particle, toggling its pin so it stays where the
    /// pointer puts it.
    pub fn begin_drag(&mut self, point: Vector) -> Option<usize> {
        let index = self.pin_nearest(point)?;
        self.drag_index = Some(index);
        Some(index)
    }

    pub fn drag_to(&mut self, point: Vector) {
        let Some(index) = self.drag_index else {
            return;
        };
        if let Some(scene) = self.world.scene_mut() {
            scene.set_position(index, point);
        }
    }

    /// Releases the grabbed particle and toggles its pin back.
    pub fn end_drag(&mut self) {
        let Some(index) = self.drag_index.take() else {
            return;
        };
        if let Some(scene) = self.world.scene_mut() {
            scene.toggle_pinned(index);
        }
    }

    /// One scheduler tick. `Ok(None)` while paused or without a scene.
    pub fn tick(&mut self) -> Result<Option<StepReport>> {
        if self.paused {
            return Ok(None);
        }
        self.world.step()
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pending_points(&self) -> &[Vector] {
        &self.pending_points
    }

    /// Outline of the scene `confirm` would build. A rope previews the
    /// positions of its particles; a cloth previews the four corners of
    /// its rectangle, in drawing order. Fewer than two points are
    /// returned as placed.
    pub fn preview(&self) -> Vec<Vector> {
        let &[start, end] = self.pending_points.as_slice() else {
            return self.pending_points.clone();
        };
        match self.kind {
            SceneKind::Cloth => vec![
                start,
                Vector::new(end.x, start.y),
                end,
                Vector::new(start.x, end.y),
            ],
            _ => {
                let stride = (end - start) / (self.point_count - 1) as Real;
                (0..self.point_count)
                    .map(|i| start + stride * i as Real)
                    .collect()
            }
        }
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn drag_index(&self) -> Option<usize> {
        self.drag_index
    }

    pub fn pending_launch(&self) -> Option<PendingLaunch> {
        self.pending_launch
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::vec2;

    fn rope_session() -> Session {
        let config = SimulationConfig {
            point_count: 5,
            ..Default::default()
        };
        Session::new(SceneKind::Rope, config).unwrap()
    }

    #[test]
    fn rope_needs_two_points_before_confirm() {
        let mut session = rope_session();
        assert!(session.is_paused());
        session.place_point(vec2(0.0, 0.0)).unwrap();
        assert!(!session.confirm().unwrap());
        session.place_point(vec2(100.0, 0.0)).unwrap();
        session.place_point(vec2(999.0, 0.0)).unwrap();
        assert_eq!(session.pending_points().len(), 2);
        assert_eq!(session.preview()[1], vec2(25.0, 0.0));
        assert!(session.confirm().unwrap());
        assert!(!session.confirm().unwrap());
        let Some(Scene::Rope(rope)) = session.world().scene() else {
            panic!("expected a rope scene");
        };
        assert_eq!(rope.len(), 5);
    }

    #[test]
    fn cloth_preview_outlines_the_rectangle() {
        let mut session = Session::new(SceneKind::Cloth, SimulationConfig::default()).unwrap();
        session.place_point(vec2(10.0, 20.0)).unwrap();
        assert_eq!(session.preview(), vec![vec2(10.0, 20.0)]);
        session.place_point(vec2(50.0, 80.0)).unwrap();
        assert_eq!(
            session.preview(),
            vec![
                vec2(10.0, 20.0),
                vec2(50.0, 20.0),
                vec2(50.0, 80.0),
                vec2(10.0, 80.0),
            ]
        );
    }

    #[test]
    fn paused_session_does_not_tick() {
        let mut session = rope_session();
        session.place_point(vec2(0.0, 0.0)).unwrap();
        session.place_point(vec2(100.0, 0.0)).unwrap();
        session.confirm().unwrap();
        assert!(session.tick().unwrap().is_none());
        assert!(!session.toggle_pause());
        assert!(session.tick().unwrap().is_some());
        assert_eq!(session.world().ticks(), 1);
    }

    #[test]
    fn clicks_after_confirm_toggle_pins() {
        let mut session = rope_session();
        session.place_point(vec2(0.0, 0.0)).unwrap();
        session.place_point(vec2(100.0, 0.0)).unwrap();
        session.confirm().unwrap();
        session.place_point(vec2(2.0, 1.0)).unwrap();
        let Some(Scene::Rope(rope)) = session.world().scene() else {
            panic!("expected a rope scene");
        };
        assert_eq!(rope.pinned_indices(), vec![0]);
    }

    #[test]
    fn drag_pins_moves_and_restores() {
        let mut session = rope_session();
        session.place_point(vec2(0.0, 0.0)).unwrap();
        session.place_point(vec2(100.0, 0.0)).unwrap();
        session.confirm().unwrap();
        assert_eq!(session.begin_drag(vec2(48.0, 3.0)), Some(2));
        session.drag_to(vec2(50.0, 80.0));
        session.toggle_pause();
        session.tick().unwrap();
        {
            let Some(Scene::Rope(rope)) = session.world().scene() else {
                panic!("expected a rope scene");
            };
            assert!(rope.is_pinned(2));
            assert_eq!(rope.positions()[2], vec2(50.0, 80.0));
        }
        session.end_drag();
        assert_eq!(session.drag_index(), None);
        let Some(Scene::Rope(rope)) = session.world().scene() else {
            panic!("expected a rope scene");
        };
        assert!(!rope.is_pinned(2));
    }

    #[test]
    fn point_count_is_clamped_and_reset() {
        let mut session = rope_session();
        assert_eq!(session.adjust_point_count(-10), 2);
        assert_eq!(session.adjust_point_count(3), 5);
        session.place_point(vec2(0.0, 0.0)).unwrap();
        session.reset().unwrap();
        assert!(session.pending_points().is_empty());
        assert_eq!(session.point_count(), 5);
        assert!(session.world().scene().is_none());
    }

    #[test]
    fn planets_launch_on_second_click() {
        let mut session = Session::new(SceneKind::Planets, SimulationConfig::default()).unwrap();
        assert!(!session.is_paused());
        session.place_point(vec2(100.0, 100.0)).unwrap();
        session.aim_at(vec2(140.0, 100.0));
        assert_eq!(session.pending_launch().unwrap().aim, vec2(140.0, 100.0));
        session.place_point(vec2(0.0, 0.0)).unwrap();
        assert!(session.pending_launch().is_none());
        let Some(Scene::Planets(system)) = session.world().scene() else {
            panic!("expected planets");
        };
        assert_eq!(system.len(), 1);
        assert_eq!(system.planets()[0].velocity(), vec2(10.0, 0.0));
    }

    #[test]
    fn planet_reset_keeps_integrator() {
        let mut session = Session::new(SceneKind::Planets, SimulationConfig::default()).unwrap();
        assert!(session.load_demo().unwrap());
        assert_eq!(session.toggle_integrator(), Some(Integrator::Verlet));
        session.reset().unwrap();
        assert_eq!(session.integrator(), Some(Integrator::Verlet));
        assert!(!session.is_paused());
        let Some(Scene::Planets(system)) = session.world().scene() else {
            panic!("expected planets");
        };
        assert!(system.is_empty());
    }

    #[test]
    fn soft_body_sessions_ignore_planet_commands() {
        let mut session = rope_session();
        assert!(!session.load_demo().unwrap());
        assert_eq!(session.toggle_integrator(), None);
        assert!(session.set_launch_radius(0.0).is_err());
    }
}
