//! Rope (chain) built from Verlet bodies and distance constraints.

use crate::body::{Body, BodyHandle};
use crate::constraint::DistanceConstraint;
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::simulation::Simulation;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Configuration for creating a rope.
#[derive(Clone, Debug)]
pub struct RopeConfig<F: Float> {
    pub segments: usize,
    pub stiffness: F,
    pub particle_mass: F,
    pub particle_radius: F,
    pub friction: F,
    pub pin_start: bool,
    pub pin_end: bool,
}

impl<F: Float> Default for RopeConfig<F> {
    fn default() -> Self {
        RopeConfig {
            segments: 10,
            stiffness: F::one(),
            particle_mass: F::one(),
            particle_radius: F::from_f32(2.0),
            friction: F::from_f64(0.01),
            pin_start: true,
            pin_end: false,
        }
    }
}

/// Handles of a rope's links, start to end.
#[derive(Clone, Debug)]
pub struct Rope {
    links: AllocVec<BodyHandle>,
}

impl Rope {
    /// Add `segments + 1` evenly spaced links from `start` to `end`, each
    /// constrained to the next at the straight-line segment length.
    pub fn build<F: Float>(
        sim: &mut Simulation<F>,
        start: Vec2<F>,
        end: Vec2<F>,
        config: &RopeConfig<F>,
    ) -> Result<Self> {
        if config.segments == 0 {
            return Err(PhysicsError::InsufficientSegments);
        }
        let segments = F::from_f32(config.segments as f32);
        let segment_length = start.distance(end) / segments;

        // Validate everything before touching the simulation.
        let template = Body::verlet(start, config.particle_radius)?
            .with_mass(config.particle_mass)?
            .with_friction(config.friction)?;
        DistanceConstraint::new(BodyHandle::from_raw(0), segment_length, config.stiffness)?;

        let mut links = AllocVec::with_capacity(config.segments + 1);
        for i in 0..=config.segments {
            let t = F::from_f32(i as f32) / segments;
            let mut body = template.clone();
            body.override_position(start.lerp(end, t));
            body.pinned = (i == 0 && config.pin_start) || (i == config.segments && config.pin_end);
            links.push(sim.add_body(body)?);
        }
        for pair in links.windows(2) {
            sim.add_constraint(pair[0], pair[1], segment_length, config.stiffness)?;
        }
        Ok(Rope { links })
    }

    pub fn links(&self) -> &[BodyHandle] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.links.len().saturating_sub(1)
    }

    /// Current link positions; links removed from the simulation are skipped.
    pub fn positions<F: Float>(&self, sim: &Simulation<F>) -> AllocVec<Vec2<F>> {
        self.links.iter().filter_map(|h| sim.body(*h)).map(|b| b.position).collect()
    }

    /// Sum of the distances between consecutive links.
    pub fn length<F: Float>(&self, sim: &Simulation<F>) -> F {
        let positions = self.positions(sim);
        positions.windows(2).fold(F::zero(), |acc, w| acc + w[0].distance(w[1]))
    }
}
