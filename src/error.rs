//! Error types for the simulation kernel.
//!
//! Only construction and configuration can fail. Per-tick degeneracies
//! (coincident endpoints or bodies) are skipped and reported through
//! metrics instead, and out-of-range indices on editing commands are
//! silently ignored.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A constructor or setter received parameters that cannot describe a
    /// valid entity (too few particles, non-positive mass, ...).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

/// Convenient Result type alias for fallible simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Rejects values that are not strictly positive and finite.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}
