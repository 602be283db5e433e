use serde::{Deserialize, Serialize};

use super::point_mass::PointMass;
use crate::error::{ensure_positive, Result, SimError};
use crate::utils::math::{distance, Real};

/// Rest-length relationship between two particles of the same owner.
///
/// Endpoints are indices into the owner's particle storage and are fixed
/// for the lifetime of the constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConstraintData")]
pub struct DistanceConstraint {
    a: usize,
    b: usize,
    rest_length: Real,
}

#[derive(Deserialize)]
struct ConstraintData {
    a: usize,
    b: usize,
    rest_length: Real,
}

impl TryFrom<ConstraintData> for DistanceConstraint {
    type Error = SimError;

    fn try_from(data: ConstraintData) -> Result<Self> {
        Self::new(data.a, data.b, data.rest_length)
    }
}

impl DistanceConstraint {
    pub fn new(a: usize, b: usize, rest_length: Real) -> Result<Self> {
        if a == b {
            return Err(SimError::invalid(format!(
                "constraint endpoints must differ, got {a} twice"
            )));
        }
        ensure_positive("rest length", rest_length)?;
        Ok(Self { a, b, rest_length })
    }

    /// Uses the current separation of the two particles as rest length.
    pub fn between(particles: &[PointMass], a: usize, b: usize) -> Result<Self> {
        let (pa, pb) = match (particles.get(a), particles.get(b)) {
            (Some(pa), Some(pb)) => (pa, pb),
            _ => {
                return Err(SimError::invalid(format!(
                    "constraint endpoint out of range: ({a}, {b}) with {} particles",
                    particles.len()
                )))
            }
        };
        Self::new(a, b, distance(pa.position, pb.position))
    }

    pub fn endpoints(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    pub fn rest_length(&self) -> Real {
        self.rest_length
    }

    /// Signed stretch of the constraint for the given storage.
    pub fn stretch(&self, particles: &[PointMass]) -> Option<Real> {
        let pa = particles.get(self.a)?;
        let pb = particles.get(self.b)?;
        Some(distance(pa.position, pb.position) - self.rest_length)
    }
}
