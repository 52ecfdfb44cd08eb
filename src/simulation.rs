//! The simulation: body registry, configuration and the step pipeline.

use tracing::{debug, trace, warn};

use crate::body::{Body, BodyHandle, BodyKind, BodySet, BoundaryPolicy, Shape};
use crate::boundary::handle_boundaries;
use crate::collision::resolve_collisions;
use crate::config::{Bounds, PinPolicy, SimulationConfig};
use crate::constraint::{Constraint, DistanceConstraint};
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::integrator::{apply_gravity, integrate};
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::solver::solve_constraints;
use crate::timestep::{FixedTimestep, FrameReport, LoopState};
use crate::vec::Vec2;

/// A 2D world of Euler and Verlet bodies advanced in fixed steps.
///
/// Each [`step`](Simulation::step) runs, in order: gravity, Euler
/// integration, Verlet integration, constraint relaxation, circle
/// collisions, boundary handling. Bodies are visited in registration order.
pub struct Simulation<F: Float> {
    bodies: BodySet<F>,
    config: SimulationConfig<F>,
    clock: FixedTimestep<F>,
}

impl<F: Float> Default for Simulation<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Simulation<F> {
    /// Empty simulation with the default configuration.
    pub fn new() -> Self {
        Simulation {
            bodies: BodySet::new(),
            config: SimulationConfig::new(),
            clock: FixedTimestep::new(),
        }
    }

    pub fn with_config(config: SimulationConfig<F>) -> Result<Self> {
        config.validate()?;
        Ok(Simulation { bodies: BodySet::new(), config, clock: FixedTimestep::new() })
    }

    pub fn config(&self) -> &SimulationConfig<F> {
        &self.config
    }

    // --- registry ---

    /// Register a body built with [`Body::euler`] or [`Body::verlet`].
    /// The body is validated again, so edits made to its public fields after
    /// construction cannot slip through.
    pub fn add_body(&mut self, body: Body<F>) -> Result<BodyHandle> {
        body.validate()?;
        let verlet = body.is_verlet();
        let handle = self.bodies.insert(body);
        debug!(%handle, verlet, total = self.bodies.len(), "body added");
        Ok(handle)
    }

    pub fn create_euler_body(&mut self, shape: Shape<F>, position: Vec2<F>) -> Result<BodyHandle> {
        self.add_body(Body::euler(shape, position)?)
    }

    pub fn create_verlet_body(&mut self, position: Vec2<F>, radius: F) -> Result<BodyHandle> {
        self.add_body(Body::verlet(position, radius)?)
    }

    /// Remove a body and every constraint that points at it.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body<F>> {
        let body = self.bodies.remove(handle).ok_or(PhysicsError::UnknownBody(handle))?;
        debug!(%handle, total = self.bodies.len(), "body removed");
        Ok(body)
    }

    /// Constrain `a` to stay `rest_distance` from `b`. Both must be
    /// registered Verlet bodies; the constraint is stored on `a`.
    pub fn add_constraint(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
        rest_distance: F,
        stiffness: F,
    ) -> Result<()> {
        if a == b {
            return Err(PhysicsError::SelfConstraint(a));
        }
        let target = self.bodies.get(b).ok_or(PhysicsError::UnknownBody(b))?;
        if !target.is_verlet() {
            return Err(PhysicsError::NotVerlet(b));
        }
        let constraint = DistanceConstraint::new(b, rest_distance, stiffness)?;
        let owner = self.bodies.get_mut(a).ok_or(PhysicsError::UnknownBody(a))?;
        match &mut owner.kind {
            BodyKind::Verlet(v) => v.constraints.push(constraint),
            BodyKind::Euler(_) => return Err(PhysicsError::NotVerlet(a)),
        }
        debug!(owner = %a, target = %b, rest = ?rest_distance, stiffness = ?stiffness, "constraint added");
        Ok(())
    }

    /// Drop every constraint owned by or pointing at `handle`. Returns how
    /// many were removed.
    pub fn detach(&mut self, handle: BodyHandle) -> Result<usize> {
        if !self.bodies.contains(handle) {
            return Err(PhysicsError::UnknownBody(handle));
        }
        let mut removed = 0;
        for (owner, body) in self.bodies.iter_mut() {
            if let BodyKind::Verlet(v) = &mut body.kind {
                let before = v.constraints.len();
                if owner == handle {
                    v.constraints.clear();
                } else {
                    v.constraints.retain(|c| c.target != handle);
                }
                removed += before - v.constraints.len();
            }
        }
        debug!(%handle, removed, "body detached");
        Ok(removed)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body<F>> {
        self.bodies.get(handle)
    }

    /// Direct mutable access. Mass and coefficients stay behind their
    /// validating setters.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body<F>> {
        self.bodies.get_mut(handle)
    }

    /// Bodies in registration order: what a renderer reads each frame.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body<F>)> {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.bodies.constraint_count()
    }

    pub fn constraints(&self, handle: BodyHandle) -> Result<&[Constraint<F>]> {
        Ok(self.get(handle)?.constraints())
    }

    fn get(&self, handle: BodyHandle) -> Result<&Body<F>> {
        self.bodies.get(handle).ok_or(PhysicsError::UnknownBody(handle))
    }

    fn get_mut(&mut self, handle: BodyHandle) -> Result<&mut Body<F>> {
        self.bodies.get_mut(handle).ok_or(PhysicsError::UnknownBody(handle))
    }

    // --- read accessors ---

    pub fn position(&self, handle: BodyHandle) -> Result<Vec2<F>> {
        Ok(self.get(handle)?.position)
    }

    /// Euler velocity, or per-step displacement for Verlet bodies.
    pub fn velocity(&self, handle: BodyHandle) -> Result<Vec2<F>> {
        Ok(self.get(handle)?.velocity())
    }

    /// Velocity in units per second for either kind, using the fixed step
    /// to convert Verlet displacement.
    pub fn velocity_per_second(&self, handle: BodyHandle) -> Result<Vec2<F>> {
        Ok(self.get(handle)?.velocity_per_second(self.config.fixed_dt))
    }

    pub fn shape(&self, handle: BodyHandle) -> Result<Shape<F>> {
        Ok(self.get(handle)?.shape)
    }

    pub fn is_pinned(&self, handle: BodyHandle) -> Result<bool> {
        Ok(self.get(handle)?.pinned)
    }

    // --- mutation ---

    /// Accumulate a force for the next step. Ignored by pinned bodies and
    /// bodies without physics.
    pub fn add_force(&mut self, handle: BodyHandle, fx: F, fy: F) -> Result<()> {
        let force = Vec2::new(fx, fy);
        if !force.is_finite() {
            return Err(PhysicsError::NonFinite { what: "force" });
        }
        self.get_mut(handle)?.apply_force(force);
        Ok(())
    }

    /// Instantaneous velocity change of `impulse / mass`.
    pub fn apply_impulse(&mut self, handle: BodyHandle, jx: F, jy: F) -> Result<()> {
        let impulse = Vec2::new(jx, jy);
        if !impulse.is_finite() {
            return Err(PhysicsError::NonFinite { what: "impulse" });
        }
        let dt = self.config.fixed_dt;
        let body = self.get_mut(handle)?;
        if !body.is_dynamic() {
            return Ok(());
        }
        let dv = impulse.scale(F::one() / body.mass());
        match &mut body.kind {
            BodyKind::Euler(e) => e.velocity += dv,
            BodyKind::Verlet(v) => v.old_position -= dv.scale(dt),
        }
        Ok(())
    }

    /// Set velocity in units per second. Verlet bodies get an old position
    /// one fixed step behind.
    pub fn set_velocity(&mut self, handle: BodyHandle, vx: F, vy: F) -> Result<()> {
        let velocity = Vec2::new(vx, vy);
        if !velocity.is_finite() {
            return Err(PhysicsError::NonFinite { what: "velocity" });
        }
        let dt = self.config.fixed_dt;
        let body = self.get_mut(handle)?;
        match &mut body.kind {
            BodyKind::Euler(e) => e.velocity = velocity,
            BodyKind::Verlet(v) => v.old_position = body.position - velocity.scale(dt),
        }
        Ok(())
    }

    /// Move a body outright, as a drag does. Verlet bodies come to rest
    /// at the new point.
    pub fn override_position(&mut self, handle: BodyHandle, x: F, y: F) -> Result<()> {
        let position = Vec2::new(x, y);
        if !position.is_finite() {
            return Err(PhysicsError::NonFinite { what: "position" });
        }
        self.get_mut(handle)?.override_position(position);
        Ok(())
    }

    pub fn set_pinned(&mut self, handle: BodyHandle, pinned: bool) -> Result<()> {
        let body = self.get_mut(handle)?;
        body.pinned = pinned;
        if pinned {
            // A pin holds still: drop any motion carried into it.
            match &mut body.kind {
                BodyKind::Euler(e) => {
                    e.velocity = Vec2::zero();
                    e.acceleration = Vec2::zero();
                }
                BodyKind::Verlet(v) => {
                    v.old_position = body.position;
                    v.acceleration = Vec2::zero();
                }
            }
        }
        Ok(())
    }

    pub fn set_boundary_policy(&mut self, handle: BodyHandle, policy: BoundaryPolicy) -> Result<()> {
        self.get_mut(handle)?.boundary = policy;
        Ok(())
    }

    pub fn set_mass(&mut self, handle: BodyHandle, mass: F) -> Result<()> {
        self.get_mut(handle)?.set_mass(mass)
    }

    pub fn set_restitution(&mut self, handle: BodyHandle, restitution: F) -> Result<()> {
        self.get_mut(handle)?.set_restitution(restitution)
    }

    pub fn set_friction(&mut self, handle: BodyHandle, friction: F) -> Result<()> {
        self.get_mut(handle)?.set_friction(friction)
    }

    pub fn set_has_physics(&mut self, handle: BodyHandle, has_physics: bool) -> Result<()> {
        self.get_mut(handle)?.has_physics = has_physics;
        Ok(())
    }

    /// Nearest draggable body: an unpinned Verlet body with physics whose
    /// centre lies within `max_distance` of `point`. Ties go to the earlier
    /// registration.
    pub fn pick(&self, point: Vec2<F>, max_distance: F) -> Option<BodyHandle> {
        let mut best: Option<(BodyHandle, F)> = None;
        let limit = max_distance * max_distance;
        for (handle, body) in self.bodies.iter() {
            if !body.is_verlet() || !body.has_physics || body.pinned {
                continue;
            }
            let d = body.position.distance_sq(point);
            if d >= limit {
                continue;
            }
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((handle, d));
            }
        }
        best.map(|(h, _)| h)
    }

    // --- global settings ---

    pub fn set_gravity(&mut self, gx: F, gy: F) -> Result<()> {
        let gravity = Vec2::new(gx, gy);
        if !gravity.is_finite() {
            return Err(PhysicsError::NonFinite { what: "gravity" });
        }
        self.config.gravity = gravity;
        debug!(gx = ?gx, gy = ?gy, "gravity set");
        Ok(())
    }

    pub fn set_boundary(&mut self, width: F, height: F) -> Result<()> {
        self.config.bounds = Some(Bounds::new(width, height)?);
        debug!(width = ?width, height = ?height, "boundary set");
        Ok(())
    }

    /// Remove the domain; boundary handling stops until one is set again.
    pub fn clear_boundary(&mut self) {
        self.config.bounds = None;
    }

    pub fn set_pin_policy(&mut self, policy: PinPolicy) {
        self.config.pin_policy = policy;
    }

    // --- stepping ---

    /// Run one physics step of `dt` seconds.
    pub fn step(&mut self, dt: F) {
        self.step_observed(dt, &mut NoOpStepObserver);
    }

    /// [`step`](Simulation::step), reporting each phase to `observer`.
    pub fn step_observed<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        apply_gravity(&mut self.bodies, self.config.gravity);
        observer.on_forces();

        integrate(&mut self.bodies, dt);
        observer.on_integrate();

        solve_constraints(&mut self.bodies, self.config.constraint_iterations, observer);

        let contacts = resolve_collisions(&mut self.bodies);
        observer.on_collisions(contacts);

        if let Some(bounds) = self.config.bounds {
            handle_boundaries(&mut self.bodies, bounds, self.config.pin_policy);
        }
        observer.on_boundaries();

        trace!(dt = ?dt, contacts, "step");
        observer.on_step_complete();
    }

    /// Feed `wall_clock_delta` seconds into the accumulator and run the
    /// fixed steps it pays for, up to `max_steps_per_frame`.
    pub fn run_frame(&mut self, wall_clock_delta: F) -> FrameReport {
        self.run_frame_observed(wall_clock_delta, &mut NoOpStepObserver)
    }

    pub fn run_frame_observed<O: StepObserver>(&mut self, wall_clock_delta: F, observer: &mut O) -> FrameReport {
        let fixed_dt = self.config.fixed_dt;
        let plan = self.clock.plan(wall_clock_delta, fixed_dt, self.config.max_steps_per_frame);
        for _ in 0..plan.steps {
            self.step_observed(fixed_dt, observer);
        }
        let clamped = plan.dropped > F::zero();
        if clamped {
            warn!(steps = plan.steps, dropped = ?plan.dropped, "physics lagging, dropped accumulated time");
            observer.on_frame_clamped(plan.dropped.to_f64());
        }
        FrameReport { steps: plan.steps, clamped }
    }

    // --- frame driver ---

    /// Stopped -> Running, measuring the first frame from `now` (seconds).
    pub fn start(&mut self, now: F) {
        if self.clock.start(now) {
            debug!("simulation started");
        }
    }

    /// Running -> Stopped. Pending accumulated time is discarded.
    pub fn stop(&mut self) {
        if self.clock.stop() {
            self.clock.reset();
            debug!("simulation stopped");
        }
    }

    pub fn state(&self) -> LoopState {
        self.clock.state()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Animation-frame callback: advance by the wall-clock time since the
    /// previous tick. Does nothing while stopped.
    pub fn tick(&mut self, now: F) -> FrameReport {
        match self.clock.delta_since_last(now) {
            Some(delta) => self.run_frame(delta),
            None => FrameReport::default(),
        }
    }

    /// Time waiting in the accumulator, in seconds.
    pub fn pending_time(&self) -> F {
        self.clock.accumulator()
    }
}
