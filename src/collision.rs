//! Pairwise circle collisions: positional correction plus normal impulse.
//!
//! Only circular bodies (Euler circles and Verlet particles) take part.
//! Rectangles are skipped entirely. The pair scan is O(n^2) over
//! registration order.

use crate::body::{Body, BodyKind, BodySet};
use crate::float::Float;
use crate::vec::Vec2;

/// Fraction of the overlap removed per step. Full correction jitters when
/// many bodies overlap at once.
const CORRECTION_PERCENT: f64 = 0.8;

/// Pairs closer than this (squared) are treated as coincident and skipped.
const COINCIDENT_DIST_SQ: f64 = 0.001;

/// Resolve every overlapping pair once. Returns the number of contacts.
pub fn resolve_collisions<F: Float>(bodies: &mut BodySet<F>) -> usize {
    let mut contacts = 0;
    for i in 0..bodies.len() {
        if bodies.at(i).collision_radius().is_none() {
            continue;
        }
        for j in (i + 1)..bodies.len() {
            let (a, b) = bodies.pair_mut(i, j);
            if collide_pair(a, b) {
                contacts += 1;
            }
        }
    }
    contacts
}

/// Velocity the impulse acts on: explicit for Euler, per-step displacement
/// for Verlet.
fn contact_velocity<F: Float>(body: &Body<F>) -> Vec2<F> {
    match &body.kind {
        BodyKind::Euler(e) => e.velocity,
        BodyKind::Verlet(v) => body.position - v.old_position,
    }
}

/// Change a body's velocity by `delta`. Verlet bodies carry velocity in
/// `old_position`, so that moves the opposite way.
fn apply_velocity_change<F: Float>(body: &mut Body<F>, delta: Vec2<F>) {
    if body.pinned {
        return;
    }
    match &mut body.kind {
        BodyKind::Euler(e) => e.velocity += delta,
        BodyKind::Verlet(v) => v.old_position -= delta,
    }
}

/// Separate and bounce one pair. Returns true when the pair was in contact.
pub fn collide_pair<F: Float>(a: &mut Body<F>, b: &mut Body<F>) -> bool {
    let (Some(ra), Some(rb)) = (a.collision_radius(), b.collision_radius()) else {
        return false;
    };
    if a.pinned && b.pinned {
        return false;
    }

    let delta = b.position - a.position;
    let dist_sq = delta.length_sq();
    let min_dist = ra + rb;
    if dist_sq >= min_dist * min_dist || dist_sq <= F::from_f64(COINCIDENT_DIST_SQ) {
        return false;
    }

    let dist = dist_sq.sqrt();
    let overlap = min_dist - dist;
    let normal = delta.scale(F::one() / dist);

    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let total_inv = inv_a + inv_b;
    if total_inv <= F::zero() {
        return false;
    }

    // Positional correction, split by inverse-mass share.
    let correction = normal.scale(overlap * F::from_f64(CORRECTION_PERCENT) / total_inv);
    if !a.pinned {
        a.position -= correction.scale(inv_a);
    }
    if !b.pinned {
        b.position += correction.scale(inv_b);
    }

    let relative = contact_velocity(b) - contact_velocity(a);
    let vel_along_normal = relative.dot(normal);
    if vel_along_normal >= F::zero() {
        return true; // separating
    }

    let restitution = a.restitution().min(b.restitution());
    let j = -(F::one() + restitution) * vel_along_normal / total_inv;
    let impulse = normal.scale(j);
    apply_velocity_change(a, -impulse.scale(inv_a));
    apply_velocity_change(b, impulse.scale(inv_b));
    true
}
