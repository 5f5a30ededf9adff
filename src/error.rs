//! Error types for physics operations.

use core::fmt;

/// Errors that can occur during physics operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    /// `solve()` was called on a solver with no world bound.
    WorldNotBound,
    /// A constraint, joint or face referenced a particle that does not
    /// exist (yet).
    ParticleOutOfBounds { index: usize, count: usize },
    /// A face or shape definition referenced a constraint that does not
    /// exist (yet).
    ConstraintOutOfBounds { index: usize, count: usize },
    /// A face's three constraints do not span exactly three distinct
    /// particles.
    DegenerateFace,
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::WorldNotBound => {
                write!(f, "solver has no world bound")
            }
            PhysicsError::ParticleOutOfBounds { index, count } => {
                write!(f, "particle index {} out of bounds (count: {})", index, count)
            }
            PhysicsError::ConstraintOutOfBounds { index, count } => {
                write!(f, "constraint index {} out of bounds (count: {})", index, count)
            }
            PhysicsError::DegenerateFace => {
                write!(f, "face constraints must span exactly three distinct particles")
            }
        }
    }
}
