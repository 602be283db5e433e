//! Core types: particles, planets, constraints, and the layouts that tie
//! them together.

pub mod constraints;
pub mod planet;
pub mod point_mass;
pub mod topology;

pub use constraints::DistanceConstraint;
pub use planet::Planet;
pub use point_mass::PointMass;
pub use topology::{build_chain, build_grid, Chain, Grid, GridIndex};
