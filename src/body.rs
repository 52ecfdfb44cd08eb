//! Body model: Euler circles/rectangles and Verlet particles.
//!
//! Bodies live in a [`BodySet`] and are addressed by [`BodyHandle`]. Handles
//! are never reused, so a handle to a removed body simply stops resolving.

use core::fmt;

use crate::constraint::Constraint;
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Stable identifier of a registered body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(u64);

impl BodyHandle {
    /// Build a handle from its raw id. Mostly useful in tests and for
    /// round-tripping through external storage.
    pub const fn from_raw(id: u64) -> Self {
        BodyHandle(id)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision and boundary shape of a body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape<F: Float> {
    Circle { radius: F },
    Rect { width: F, height: F },
}

impl<F: Float> Shape<F> {
    /// Validated circle.
    pub fn circle(radius: F) -> Result<Self> {
        if !(radius.is_finite() && radius > F::zero()) {
            return Err(PhysicsError::InvalidRadius { radius: radius.to_f64() });
        }
        Ok(Shape::Circle { radius })
    }

    /// Validated axis-aligned rectangle, centred on the body position.
    pub fn rect(width: F, height: F) -> Result<Self> {
        let ok = |v: F| v.is_finite() && v > F::zero();
        if !(ok(width) && ok(height)) {
            return Err(PhysicsError::InvalidExtent {
                width: width.to_f64(),
                height: height.to_f64(),
            });
        }
        Ok(Shape::Rect { width, height })
    }

    pub fn radius(&self) -> Option<F> {
        match *self {
            Shape::Circle { radius } => Some(radius),
            Shape::Rect { .. } => None,
        }
    }

    /// Half extents of the bounding box.
    pub fn half_extents(&self) -> Vec2<F> {
        match *self {
            Shape::Circle { radius } => Vec2::new(radius, radius),
            Shape::Rect { width, height } => Vec2::new(width * F::half(), height * F::half()),
        }
    }
}

/// What happens when a body reaches the edge of the domain.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Clamp inside and reflect the normal velocity, scaled by restitution.
    #[default]
    Bounce,
    /// Reappear just past the opposite edge once fully outside.
    Wrap,
    /// Ignore the domain.
    None,
}

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb<F: Float> {
    pub min: Vec2<F>,
    pub max: Vec2<F>,
}

impl<F: Float> Aabb<F> {
    pub fn width(&self) -> F {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> F {
        self.max.y - self.min.y
    }
}

/// Euler-integrated state: explicit velocity plus an acceleration accumulator.
#[derive(Clone, Debug, PartialEq)]
pub struct EulerState<F: Float> {
    pub velocity: Vec2<F>,
    pub acceleration: Vec2<F>,
}

/// Verlet-integrated state. Velocity is implicit: `position - old_position`.
#[derive(Clone, Debug, PartialEq)]
pub struct VerletState<F: Float> {
    pub old_position: Vec2<F>,
    pub acceleration: Vec2<F>,
    pub constraints: AllocVec<Constraint<F>>,
}

/// Integration scheme of a body, with the state that scheme needs.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyKind<F: Float> {
    Euler(EulerState<F>),
    Verlet(VerletState<F>),
}

/// A simulated body.
///
/// Mass and coefficients are private so they only change through the
/// validating `with_*` / `set_*` methods.
#[derive(Clone, Debug, PartialEq)]
pub struct Body<F: Float> {
    pub position: Vec2<F>,
    pub shape: Shape<F>,
    mass: F,
    restitution: F,
    friction: F,
    /// When false the body is skipped by forces, integration, collisions and
    /// boundaries; it is still reported to renderers.
    pub has_physics: bool,
    /// Pinned bodies have infinite mass: no forces, integration or
    /// constraint/collision correction.
    pub pinned: bool,
    pub boundary: BoundaryPolicy,
    pub kind: BodyKind<F>,
}

fn check_position<F: Float>(position: Vec2<F>) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::NonFinite { what: "position" })
    }
}

// Catches shapes built literally instead of through `Shape::circle`/`rect`.
fn check_shape<F: Float>(shape: Shape<F>) -> Result<()> {
    match shape {
        Shape::Circle { radius } => Shape::circle(radius).map(|_| ()),
        Shape::Rect { width, height } => Shape::rect(width, height).map(|_| ()),
    }
}

impl<F: Float> Body<F> {
    /// Euler body with the default coefficients (mass 1, restitution 1,
    /// friction 0.05).
    pub fn euler(shape: Shape<F>, position: Vec2<F>) -> Result<Self> {
        check_position(position)?;
        check_shape(shape)?;
        Ok(Body {
            position,
            shape,
            mass: F::one(),
            restitution: F::one(),
            friction: F::from_f64(0.05),
            has_physics: true,
            pinned: false,
            boundary: BoundaryPolicy::Bounce,
            kind: BodyKind::Euler(EulerState {
                velocity: Vec2::zero(),
                acceleration: Vec2::zero(),
            }),
        })
    }

    /// Verlet particle at rest, with restitution 0.9 and friction 0.01.
    pub fn verlet(position: Vec2<F>, radius: F) -> Result<Self> {
        check_position(position)?;
        Ok(Body {
            position,
            shape: Shape::circle(radius)?,
            mass: F::one(),
            restitution: F::from_f64(0.9),
            friction: F::from_f64(0.01),
            has_physics: true,
            pinned: false,
            boundary: BoundaryPolicy::Bounce,
            kind: BodyKind::Verlet(VerletState {
                old_position: position,
                acceleration: Vec2::zero(),
                constraints: AllocVec::new(),
            }),
        })
    }

    pub fn with_mass(mut self, mass: F) -> Result<Self> {
        self.set_mass(mass)?;
        Ok(self)
    }

    pub fn with_restitution(mut self, restitution: F) -> Result<Self> {
        self.set_restitution(restitution)?;
        Ok(self)
    }

    pub fn with_friction(mut self, friction: F) -> Result<Self> {
        self.set_friction(friction)?;
        Ok(self)
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn with_physics(mut self, has_physics: bool) -> Self {
        self.has_physics = has_physics;
        self
    }

    pub fn set_mass(&mut self, mass: F) -> Result<()> {
        if !(mass.is_finite() && mass > F::zero()) {
            return Err(PhysicsError::InvalidMass { mass: mass.to_f64() });
        }
        self.mass = mass;
        Ok(())
    }

    pub fn set_restitution(&mut self, restitution: F) -> Result<()> {
        if !(restitution >= F::zero() && restitution <= F::one()) {
            return Err(PhysicsError::InvalidRestitution { restitution: restitution.to_f64() });
        }
        self.restitution = restitution;
        Ok(())
    }

    pub fn set_friction(&mut self, friction: F) -> Result<()> {
        if !(friction >= F::zero() && friction < F::one()) {
            return Err(PhysicsError::InvalidFriction { friction: friction.to_f64() });
        }
        self.friction = friction;
        Ok(())
    }

    pub fn mass(&self) -> F {
        self.mass
    }

    pub fn restitution(&self) -> F {
        self.restitution
    }

    pub fn friction(&self) -> F {
        self.friction
    }

    /// Re-check every invariant the integrators rely on. Run when a body is
    /// registered, since `position` and `shape` are public.
    pub fn validate(&self) -> Result<()> {
        check_position(self.position)?;
        check_shape(self.shape)?;
        if !(self.mass.is_finite() && self.mass > F::zero()) {
            return Err(PhysicsError::InvalidMass { mass: self.mass.to_f64() });
        }
        if !(self.restitution >= F::zero() && self.restitution <= F::one()) {
            return Err(PhysicsError::InvalidRestitution { restitution: self.restitution.to_f64() });
        }
        if !(self.friction >= F::zero() && self.friction < F::one()) {
            return Err(PhysicsError::InvalidFriction { friction: self.friction.to_f64() });
        }
        if let BodyKind::Verlet(v) = &self.kind {
            check_position(v.old_position)?;
        }
        Ok(())
    }

    pub fn is_verlet(&self) -> bool {
        matches!(self.kind, BodyKind::Verlet(_))
    }

    /// Responds to forces and integration this step.
    pub fn is_dynamic(&self) -> bool {
        self.has_physics && !self.pinned
    }

    /// 0 for pinned bodies, `1 / mass` otherwise.
    pub fn inverse_mass(&self) -> F {
        if self.pinned {
            F::zero()
        } else {
            F::one() / self.mass
        }
    }

    /// Explicit velocity for Euler bodies; per-step displacement
    /// `position - old_position` for Verlet bodies.
    pub fn velocity(&self) -> Vec2<F> {
        match &self.kind {
            BodyKind::Euler(e) => e.velocity,
            BodyKind::Verlet(v) => self.position - v.old_position,
        }
    }

    /// Velocity in units per second, converting Verlet displacement with `dt`.
    pub fn velocity_per_second(&self, dt: F) -> Vec2<F> {
        match &self.kind {
            BodyKind::Euler(e) => e.velocity,
            BodyKind::Verlet(v) => {
                if dt.is_near_zero(F::from_f32(1e-30)) {
                    return Vec2::zero();
                }
                (self.position - v.old_position).scale(F::one() / dt)
            }
        }
    }

    /// Accumulate a force into the variant's acceleration accumulator.
    /// No-op for bodies without physics and for pinned bodies.
    pub fn apply_force(&mut self, force: Vec2<F>) {
        if !self.is_dynamic() {
            return;
        }
        let accel = force.scale(F::one() / self.mass);
        match &mut self.kind {
            BodyKind::Euler(e) => e.acceleration += accel,
            BodyKind::Verlet(v) => v.acceleration += accel,
        }
    }

    /// Set the position outright, as a drag does. Verlet bodies also lose
    /// their implicit velocity and pending acceleration.
    pub fn override_position(&mut self, position: Vec2<F>) {
        self.position = position;
        if let BodyKind::Verlet(v) = &mut self.kind {
            v.old_position = position;
            v.acceleration = Vec2::zero();
        }
    }

    /// Radius when the body takes part in circle collisions.
    pub fn collision_radius(&self) -> Option<F> {
        if !self.has_physics {
            return None;
        }
        self.shape.radius().filter(|r| *r > F::zero())
    }

    pub fn aabb(&self) -> Aabb<F> {
        let half = self.shape.half_extents();
        Aabb { min: self.position - half, max: self.position + half }
    }

    /// Constraints owned by this body; empty for Euler bodies.
    pub fn constraints(&self) -> &[Constraint<F>] {
        match &self.kind {
            BodyKind::Verlet(v) => &v.constraints,
            BodyKind::Euler(_) => &[],
        }
    }
}

/// Insertion-ordered body collection.
///
/// Handles are issued in increasing order and removal keeps the order of
/// the remaining bodies, so lookups are a binary search.
#[derive(Clone, Debug)]
pub struct BodySet<F: Float> {
    entries: AllocVec<(BodyHandle, Body<F>)>,
    next_id: u64,
}

impl<F: Float> Default for BodySet<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> BodySet<F> {
    pub fn new() -> Self {
        BodySet { entries: AllocVec::new(), next_id: 0 }
    }

    pub fn insert(&mut self, body: Body<F>) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.entries.push((handle, body));
        handle
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body<F>> {
        let index = self.index_of(handle)?;
        let (_, body) = self.entries.remove(index);
        for (_, other) in self.entries.iter_mut() {
            if let BodyKind::Verlet(v) = &mut other.kind {
                v.constraints.retain(|c| c.target != handle);
            }
        }
        Some(body)
    }

    pub fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.entries.binary_search_by_key(&handle, |(h, _)| *h).ok()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.index_of(handle).is_some()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body<F>> {
        self.index_of(handle).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body<F>> {
        match self.index_of(handle) {
            Some(i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn at(&self, index: usize) -> &Body<F> {
        &self.entries[index].1
    }

    pub fn at_mut(&mut self, index: usize) -> &mut Body<F> {
        &mut self.entries[index].1
    }

    /// Mutable access to two distinct bodies by index.
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut Body<F>, &mut Body<F>) {
        assert!(i != j, "pair_mut needs two distinct indices");
        if i < j {
            let (lo, hi) = self.entries.split_at_mut(j);
            (&mut lo[i].1, &mut hi[0].1)
        } else {
            let (lo, hi) = self.entries.split_at_mut(i);
            (&mut hi[0].1, &mut lo[j].1)
        }
    }

    /// Bodies in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body<F>)> {
        self.entries.iter().map(|(h, b)| (*h, b))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut Body<F>)> {
        self.entries.iter_mut().map(|(h, b)| (*h, b))
    }

    pub fn constraint_count(&self) -> usize {
        self.entries.iter().map(|(_, b)| b.constraints().len()).sum()
    }
}
