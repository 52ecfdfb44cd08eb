//! Distance constraints between Verlet bodies.

use crate::body::{Body, BodyHandle};
use crate::error::{PhysicsError, Result};
use crate::float::Float;

/// Keeps the owning body at `rest_distance` from `target`.
///
/// Stored on the owning body but solved symmetrically: both endpoints move
/// by their inverse-mass share of the correction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DistanceConstraint<F: Float> {
    pub target: BodyHandle,
    pub rest_distance: F,
    pub stiffness: F,
}

/// Alias kept short for the common case.
pub type Constraint<F> = DistanceConstraint<F>;

impl<F: Float> DistanceConstraint<F> {
    /// Validated constraint: `rest_distance` finite and positive,
    /// `stiffness` in [0, 1].
    pub fn new(target: BodyHandle, rest_distance: F, stiffness: F) -> Result<Self> {
        if !(rest_distance.is_finite() && rest_distance > F::zero()) {
            return Err(PhysicsError::InvalidDistance { distance: rest_distance.to_f64() });
        }
        if !(stiffness >= F::zero() && stiffness <= F::one()) {
            return Err(PhysicsError::InvalidStiffness { stiffness: stiffness.to_f64() });
        }
        Ok(DistanceConstraint { target, rest_distance, stiffness })
    }

    /// Default stiffness used by [`crate::Simulation::add_constraint`] callers
    /// that don't care.
    pub fn default_stiffness() -> F {
        F::half()
    }

    /// Relax the pair once. `owner` is the body storing the constraint.
    ///
    /// Skips coincident endpoints and pairs where both are pinned.
    pub fn solve(&self, owner: &mut Body<F>, target: &mut Body<F>) {
        let w_owner = owner.inverse_mass();
        let w_target = target.inverse_mass();
        let w_total = w_owner + w_target;
        if w_total <= F::zero() {
            return; // both pinned
        }

        let delta = target.position - owner.position;
        let dist = delta.length();
        if dist <= F::zero() {
            return; // degenerate
        }

        let difference = (self.rest_distance - dist) / dist;
        let correction = delta.scale(difference * self.stiffness);

        if !owner.pinned {
            owner.position -= correction.scale(w_owner / w_total);
        }
        if !target.pinned {
            target.position += correction.scale(w_target / w_total);
        }
    }
}
