//! Configuration types for the simulation.

use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::vec::Vec2;

/// How far a pin shields a body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PinPolicy {
    /// Pinned bodies ignore forces, integration, constraints, collisions and
    /// the domain boundary.
    #[default]
    Anchored,
    /// Pinned bodies ignore forces, integration, constraints and collisions,
    /// but boundary handling may still push them back inside the domain.
    ConstraintsOnly,
}

/// Rectangular domain `[0, width] x [0, height]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds<F: Float> {
    pub width: F,
    pub height: F,
}

impl<F: Float> Bounds<F> {
    pub fn new(width: F, height: F) -> Result<Self> {
        let ok = |v: F| v.is_finite() && v > F::zero();
        if !(ok(width) && ok(height)) {
            return Err(PhysicsError::InvalidBoundary {
                width: width.to_f64(),
                height: height.to_f64(),
            });
        }
        Ok(Bounds { width, height })
    }
}

/// Configuration for the fixed-timestep simulation.
///
/// # Builder Pattern
/// ```
/// use tumble::config::SimulationConfig;
/// use tumble::vec::Vec2;
///
/// let config: SimulationConfig<f32> = SimulationConfig::new()
///     .with_constraint_iterations(8)
///     .with_gravity(Vec2::new(0.0, 981.0))
///     .with_max_steps_per_frame(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig<F: Float> {
    /// Seconds per physics step. Default: 1/60.
    pub fixed_dt: F,
    /// Constraint relaxation sweeps per step. Default: 5.
    pub constraint_iterations: usize,
    /// Steps a single frame may run before the backlog is dropped. Default: 5.
    pub max_steps_per_frame: usize,
    /// Gravity acceleration. Default: (0, 490.5), screen space with y down.
    pub gravity: Vec2<F>,
    /// Domain for boundary handling. Default: none.
    pub bounds: Option<Bounds<F>>,
    /// Default: [`PinPolicy::Anchored`].
    pub pin_policy: PinPolicy,
}

impl<F: Float> SimulationConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SimulationConfig {
            fixed_dt: F::one() / F::from_f32(60.0),
            constraint_iterations: 5,
            max_steps_per_frame: 5,
            gravity: Vec2::new(F::zero(), F::from_f64(490.5)),
            bounds: None,
            pin_policy: PinPolicy::Anchored,
        }
    }

    pub fn with_fixed_dt(mut self, fixed_dt: F) -> Self {
        self.fixed_dt = fixed_dt;
        self
    }

    pub fn with_constraint_iterations(mut self, iterations: usize) -> Self {
        self.constraint_iterations = iterations;
        self
    }

    pub fn with_max_steps_per_frame(mut self, max_steps: usize) -> Self {
        self.max_steps_per_frame = max_steps;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds<F>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_pin_policy(mut self, pin_policy: PinPolicy) -> Self {
        self.pin_policy = pin_policy;
        self
    }

    /// Check the values a builder chain may have left out of range.
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > F::zero()) {
            return Err(PhysicsError::InvalidTimestep { dt: self.fixed_dt.to_f64() });
        }
        if self.max_steps_per_frame == 0 {
            return Err(PhysicsError::InvalidConfig("max_steps_per_frame must be at least 1"));
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::NonFinite { what: "gravity" });
        }
        if let Some(bounds) = self.bounds {
            Bounds::new(bounds.width, bounds.height)?;
        }
        Ok(())
    }
}

impl<F: Float> Default for SimulationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c: SimulationConfig<f64> = SimulationConfig::default();
        assert!((c.fixed_dt - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(c.constraint_iterations, 5);
        assert_eq!(c.max_steps_per_frame, 5);
        assert_eq!(c.gravity, Vec2::new(0.0, 490.5));
        assert!(c.bounds.is_none());
        assert_eq!(c.pin_policy, PinPolicy::Anchored);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let c: SimulationConfig<f32> = SimulationConfig::new().with_fixed_dt(0.0);
        assert!(matches!(c.validate(), Err(PhysicsError::InvalidTimestep { .. })));
        let c: SimulationConfig<f32> = SimulationConfig::new().with_max_steps_per_frame(0);
        assert!(matches!(c.validate(), Err(PhysicsError::InvalidConfig(_))));
        let c: SimulationConfig<f32> = SimulationConfig::new().with_gravity(Vec2::new(f32::NAN, 0.0));
        assert!(c.validate().is_err());
    }

    #[test]
    fn bounds_must_be_positive() {
        assert!(Bounds::new(0.0f32, 10.0).is_err());
        assert!(Bounds::new(800.0f32, 600.0).is_ok());
    }
}
