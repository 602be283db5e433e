//! Simulation dynamics: integration, forces, and constraint relaxation.

pub mod forces;
pub mod integrator;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod solver;

pub use forces::{pairwise_gravitate, potential_energy, ForceGenerator, ForceRegistry, GravityForce};
pub use integrator::Integrator;
pub use solver::{relax_constraint, relax_pair, Correction, JakobsenSolver, RelaxationMetrics};
