//! Force accumulation and the two integration schemes.

use crate::body::{Body, BodyKind, BodySet};
use crate::float::Float;
use crate::vec::Vec2;

/// Accumulate `gravity * mass` into every dynamic body.
pub fn apply_gravity<F: Float>(bodies: &mut BodySet<F>, gravity: Vec2<F>) {
    for (_, body) in bodies.iter_mut() {
        let weight = gravity.scale(body.mass());
        body.apply_force(weight);
    }
}

/// Semi-implicit Euler: velocity from acceleration, damping, then position.
///
/// Skipped for bodies without physics, pinned bodies and Verlet bodies.
pub fn euler_step<F: Float>(body: &mut Body<F>, dt: F) {
    if !body.is_dynamic() {
        return;
    }
    let damping = F::one() - body.friction();
    let BodyKind::Euler(state) = &mut body.kind else {
        return;
    };
    state.velocity += state.acceleration.scale(dt);
    state.velocity = state.velocity.scale(damping);
    body.position += state.velocity.scale(dt);
    state.acceleration = Vec2::zero();
}

/// Position Verlet with damped implicit velocity.
///
/// Skipped for bodies without physics, pinned bodies and Euler bodies.
pub fn verlet_step<F: Float>(body: &mut Body<F>, dt: F) {
    if !body.is_dynamic() {
        return;
    }
    let damping = F::one() - body.friction();
    let BodyKind::Verlet(state) = &mut body.kind else {
        return;
    };
    let velocity = (body.position - state.old_position).scale(damping);
    state.old_position = body.position;
    body.position += velocity + state.acceleration.scale(dt * dt);
    state.acceleration = Vec2::zero();
}

/// Integrate all Euler bodies, then all Verlet bodies, in registration order.
pub fn integrate<F: Float>(bodies: &mut BodySet<F>, dt: F) {
    for (_, body) in bodies.iter_mut() {
        euler_step(body, dt);
    }
    for (_, body) in bodies.iter_mut() {
        verlet_step(body, dt);
    }
}
