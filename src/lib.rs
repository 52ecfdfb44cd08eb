//! Fixed-timestep 2D physics for games and toys.
//!
//! `tumble` advances a set of bodies through time under gravity, friction,
//! distance constraints, circle collisions and a rectangular domain. Two
//! integration schemes live side by side: explicit Euler bodies (circles and
//! rectangles with stored velocity) and Verlet particles (circles whose
//! velocity is implied by their previous position, ideal for ropes and cloth).
//!
//! # Features
//!
//! - **Euler and Verlet bodies** in one world, tagged by [`BodyKind`]
//! - **Constraint solver**: mass-weighted distance constraints, pin aware,
//!   relaxed a fixed number of sweeps per step
//! - **Circle collisions**: positional correction plus restitution impulse
//! - **Boundaries**: per-body bounce, wrap or none
//! - **Fixed timestep**: accumulator with a per-frame step cap
//! - **Builders**: [`Rope`] and [`Cloth`]
//! - **Observable**: monitor each phase via the [`StepObserver`] trait
//! - **`no_std` compatible**
//!
//! ```
//! use tumble::{Simulation, Shape, Vec2};
//!
//! let mut sim: Simulation<f32> = Simulation::new();
//! sim.set_boundary(800.0, 600.0).unwrap();
//! let ball = sim.create_euler_body(Shape::circle(10.0).unwrap(), Vec2::new(400.0, 100.0)).unwrap();
//! let report = sim.run_frame(0.04);
//! assert_eq!(report.steps, 2);
//! assert!(sim.position(ball).unwrap().y > 100.0);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod body;
pub mod constraint;
pub mod integrator;
pub mod solver;
pub mod collision;
pub mod boundary;
pub mod timestep;
pub mod simulation;
pub mod rope;
pub mod cloth;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use body::{Aabb, Body, BodyHandle, BodyKind, BodySet, BoundaryPolicy, EulerState, Shape, VerletState};
pub use constraint::{Constraint, DistanceConstraint};
pub use simulation::Simulation;
pub use timestep::{FixedTimestep, FrameReport, LoopState};
pub use rope::{Rope, RopeConfig};
pub use cloth::{Cloth, ClothConfig};
pub use config::{Bounds, PinPolicy, SimulationConfig};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::{PhysicsError, Result};
