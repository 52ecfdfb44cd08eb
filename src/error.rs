//! Error types for physics operations.

use thiserror::Error;

use crate::body::BodyHandle;

/// Errors that can occur when building or editing a simulation.
///
/// Stepping never fails; these come from constructors and setters that
/// reject inputs the integrators would later divide by or propagate as NaN.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Mass must be positive and finite.
    #[error("mass must be positive and finite, got {mass}")]
    InvalidMass { mass: f64 },
    /// Radius must be positive and finite.
    #[error("radius must be positive and finite, got {radius}")]
    InvalidRadius { radius: f64 },
    /// Rectangle width and height must be positive and finite.
    #[error("rectangle extent must be positive and finite, got {width}x{height}")]
    InvalidExtent { width: f64, height: f64 },
    /// Constraint rest distance must be positive and finite.
    #[error("constraint distance must be positive and finite, got {distance}")]
    InvalidDistance { distance: f64 },
    /// Stiffness must be in [0, 1].
    #[error("stiffness must be in [0, 1], got {stiffness}")]
    InvalidStiffness { stiffness: f64 },
    /// Restitution must be in [0, 1].
    #[error("restitution must be in [0, 1], got {restitution}")]
    InvalidRestitution { restitution: f64 },
    /// Friction damping must be in [0, 1).
    #[error("friction must be in [0, 1), got {friction}")]
    InvalidFriction { friction: f64 },
    /// Fixed timestep must be positive and finite.
    #[error("fixed timestep must be positive and finite, got {dt}")]
    InvalidTimestep { dt: f64 },
    /// Boundary rectangle must have positive, finite size.
    #[error("boundary must be positive and finite, got {width}x{height}")]
    InvalidBoundary { width: f64, height: f64 },
    /// A position, velocity or force component was NaN or infinite.
    #[error("{what} must be finite")]
    NonFinite { what: &'static str },
    /// Cloth grids need at least 2x2 particles.
    #[error("grid must be at least 2x2, got {cols}x{rows}")]
    InvalidGridDimensions { cols: usize, rows: usize },
    /// Cloth cell lies outside the grid.
    #[error("cloth cell ({col}, {row}) is outside the {cols}x{rows} grid")]
    CellOutOfRange { col: usize, row: usize, cols: usize, rows: usize },
    /// Ropes need at least one segment.
    #[error("rope needs at least 1 segment")]
    InsufficientSegments,
    /// Any other rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Handle does not refer to a registered body.
    #[error("no body registered for handle {0}")]
    UnknownBody(BodyHandle),
    /// Operation needs a Verlet body.
    #[error("body {0} is not a Verlet body")]
    NotVerlet(BodyHandle),
    /// A body cannot be constrained to itself.
    #[error("body {0} cannot be constrained to itself")]
    SelfConstraint(BodyHandle),
}

/// Result type for physics operations.
pub type Result<T> = core::result::Result<T, PhysicsError>;

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn invalid_mass_message() {
        let err = PhysicsError::InvalidMass { mass: -1.0 };
        assert!(err.to_string().contains("mass must be positive"));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn unknown_body_names_handle() {
        let err = PhysicsError::UnknownBody(BodyHandle::from_raw(7));
        assert!(err.to_string().contains("#7"));
    }

    #[test]
    fn extent_message_has_both_sides() {
        let err = PhysicsError::InvalidExtent { width: 0.0, height: 3.0 };
        assert_eq!(err.to_string(), "rectangle extent must be positive and finite, got 0x3");
    }
}
