//! Domain boundary handling: bounce, wrap or ignore.

use crate::body::{Body, BodyKind, BodySet, BoundaryPolicy};
use crate::config::{Bounds, PinPolicy};
use crate::float::Float;

/// Apply each body's boundary policy against `bounds`.
pub fn handle_boundaries<F: Float>(bodies: &mut BodySet<F>, bounds: Bounds<F>, pin_policy: PinPolicy) {
    for (_, body) in bodies.iter_mut() {
        if !body.has_physics {
            continue;
        }
        if body.pinned && pin_policy == PinPolicy::Anchored {
            continue;
        }
        handle_body(body, bounds);
    }
}

/// Boundary response for a single body, ignoring pin and physics flags.
pub fn handle_body<F: Float>(body: &mut Body<F>, bounds: Bounds<F>) {
    match body.boundary {
        BoundaryPolicy::None => {}
        BoundaryPolicy::Wrap => wrap(body, bounds),
        BoundaryPolicy::Bounce => bounce(body, bounds),
    }
}

fn wrap<F: Float>(body: &mut Body<F>, bounds: Bounds<F>) {
    let bb = body.aabb();
    let half = body.shape.half_extents();
    let (half_w, half_h) = (half.x, half.y);
    let before = body.position;
    if bb.max.x < F::zero() {
        body.position.x = bounds.width + half_w;
    }
    if bb.min.x > bounds.width {
        body.position.x = -half_w;
    }
    if bb.max.y < F::zero() {
        body.position.y = bounds.height + half_h;
    }
    if bb.min.y > bounds.height {
        body.position.y = -half_h;
    }
    // Carry the old position along so the teleport adds no implicit velocity.
    if let BodyKind::Verlet(v) = &mut body.kind {
        v.old_position += body.position - before;
    }
}

fn bounce<F: Float>(body: &mut Body<F>, bounds: Bounds<F>) {
    let bb = body.aabb();
    let restitution = body.restitution();
    let half = body.shape.half_extents();
    let (half_w, half_h) = (half.x, half.y);

    match &mut body.kind {
        BodyKind::Verlet(v) => {
            // Clamp, then rebuild old position so the implicit velocity
            // points back inside, scaled by restitution.
            if bb.min.x < F::zero() {
                body.position.x = body.position.x - bb.min.x;
                v.old_position.x = body.position.x + (body.position.x - v.old_position.x) * restitution;
            } else if bb.max.x > bounds.width {
                body.position.x = body.position.x - (bb.max.x - bounds.width);
                v.old_position.x = body.position.x + (body.position.x - v.old_position.x) * restitution;
            }
            if bb.min.y < F::zero() {
                body.position.y = body.position.y - bb.min.y;
                v.old_position.y = body.position.y + (body.position.y - v.old_position.y) * restitution;
            } else if bb.max.y > bounds.height {
                body.position.y = body.position.y - (bb.max.y - bounds.height);
                v.old_position.y = body.position.y + (body.position.y - v.old_position.y) * restitution;
            }
        }
        BodyKind::Euler(e) => {
            if bb.min.x < F::zero() {
                body.position.x = half_w;
                if e.velocity.x < F::zero() {
                    e.velocity.x = -e.velocity.x * restitution;
                }
            } else if bb.max.x > bounds.width {
                body.position.x = bounds.width - half_w;
                if e.velocity.x > F::zero() {
                    e.velocity.x = -e.velocity.x * restitution;
                }
            }
            if bb.min.y < F::zero() {
                body.position.y = half_h;
                if e.velocity.y < F::zero() {
                    e.velocity.y = -e.velocity.y * restitution;
                }
            } else if bb.max.y > bounds.height {
                body.position.y = bounds.height - half_h;
                if e.velocity.y > F::zero() {
                    e.velocity.y = -e.velocity.y * restitution;
                }
            }
        }
    }
}
