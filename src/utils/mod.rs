//! Utility helpers: vector math, slot access, and logging.

pub mod logging;
pub mod math;
pub mod slots;

pub use math::{distance, separation, vec2, Real, Vector};
pub use slots::pair_mut;
