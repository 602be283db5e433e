//! Tether – a 2D particle and constraint simulation kernel.
//!
//! The crate provides three scenes that share one integration core:
//! ropes and cloths built from point masses held together by distance
//! constraints (relaxed with Jakobsen's method), and systems of planets
//! under pairwise gravitation with switchable integrators. Rendering and
//! input are left to the caller; [`Session`] captures the interactive
//! state a front-end needs.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod session;
pub mod utils;
pub mod world;

pub use glam::DVec2;

pub use crate::config::SimulationConfig;
pub use crate::core::{
    constraints::DistanceConstraint,
    planet::Planet,
    point_mass::PointMass,
    topology::{build_chain, build_grid, Chain, Grid, GridIndex},
};
pub use crate::dynamics::{
    forces::{ForceGenerator, ForceRegistry, GravityForce},
    integrator::Integrator,
    solver::{JakobsenSolver, RelaxationMetrics},
};
pub use crate::error::{Result, SimError};
pub use crate::session::{SceneKind, Session};
pub use crate::utils::math::{vec2, Real, Vector};
pub use crate::world::{Cloth, PhysicsWorld, PlanetSystem, Rope, Scene, StepReport};
