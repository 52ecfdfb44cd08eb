//! Iterative relaxation of distance constraints.

use crate::body::BodySet;
use crate::float::Float;
use crate::observer::StepObserver;

/// One Gauss-Seidel sweep: every body's constraints, in registration order.
pub fn solve_once<F: Float>(bodies: &mut BodySet<F>) {
    for i in 0..bodies.len() {
        let count = bodies.at(i).constraints().len();
        for k in 0..count {
            let constraint = bodies.at(i).constraints()[k];
            // Removal prunes constraints to dead bodies, but stay tolerant.
            let Some(j) = bodies.index_of(constraint.target) else {
                continue;
            };
            if i == j {
                continue;
            }
            let (owner, target) = bodies.pair_mut(i, j);
            constraint.solve(owner, target);
        }
    }
}

/// Run `iterations` sweeps, reporting each to the observer.
pub fn solve_constraints<F: Float, O: StepObserver>(
    bodies: &mut BodySet<F>,
    iterations: usize,
    observer: &mut O,
) {
    for i in 0..iterations {
        solve_once(bodies);
        observer.on_constraint_iteration(i);
    }
}
