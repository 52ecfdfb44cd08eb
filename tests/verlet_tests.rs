use approx::assert_abs_diff_eq;
use tumble::solver::{solve_constraints, solve_once};
use tumble::{Body, BodyKind, BodySet, DistanceConstraint, NoOpStepObserver, Shape, Simulation, SimulationConfig, Vec2};

fn no_gravity() -> Simulation<f64> {
    Simulation::with_config(SimulationConfig::new().with_gravity(Vec2::zero())).unwrap()
}

#[test]
fn free_fall_gravity() {
    let mut sim: Simulation<f32> = Simulation::with_config(
        SimulationConfig::new().with_gravity(Vec2::new(0.0, 9.81)),
    )
    .unwrap();
    let p = sim.create_verlet_body(Vec2::new(0.0, 100.0), 1.0).unwrap();
    sim.set_friction(p, 0.0).unwrap();

    for _ in 0..60 {
        sim.step(1.0 / 60.0);
    }

    let expected_y = 100.0 + 0.5 * 9.81 * 1.0;
    let y = sim.position(p).unwrap().y;
    assert!((y - expected_y).abs() < 1.0, "pos.y = {}, expected ~ {}", y, expected_y);
}

#[test]
fn verlet_matches_euler_trajectory() {
    let mut sim: Simulation<f64> = Simulation::with_config(
        SimulationConfig::new().with_gravity(Vec2::new(3.0, 250.0)),
    )
    .unwrap();
    let euler = sim.create_euler_body(Shape::circle(1.0).unwrap(), Vec2::new(0.0, 0.0)).unwrap();
    let verlet = sim.create_verlet_body(Vec2::new(500.0, 0.0), 1.0).unwrap();
    sim.set_friction(euler, 0.0).unwrap();
    sim.set_friction(verlet, 0.0).unwrap();

    for _ in 0..300 {
        sim.step(1.0 / 60.0);
        let e = sim.position(euler).unwrap();
        let v = sim.position(verlet).unwrap() - Vec2::new(500.0, 0.0);
        assert_abs_diff_eq!(e.x, v.x, epsilon = 1e-6);
        assert_abs_diff_eq!(e.y, v.y, epsilon = 1e-6);
    }
}

#[test]
fn pinned_particle_stays_fixed() {
    let mut sim: Simulation<f32> = Simulation::new();
    let anchor = sim.create_verlet_body(Vec2::new(5.0, 5.0), 1.0).unwrap();
    let bob = sim.create_verlet_body(Vec2::new(5.0, 25.0), 1.0).unwrap();
    sim.set_pinned(anchor, true).unwrap();
    sim.add_constraint(anchor, bob, 20.0, 1.0).unwrap();
    sim.add_constraint(bob, anchor, 20.0, 1.0).unwrap();

    for i in 0..200 {
        sim.add_force(anchor, 1000.0, -1000.0).unwrap();
        sim.add_force(bob, 300.0 * (i % 3) as f32, 0.0).unwrap();
        sim.step(1.0 / 60.0);
        assert_eq!(sim.position(anchor).unwrap(), Vec2::new(5.0, 5.0));
    }
    assert!(sim.position(bob).unwrap() != Vec2::new(5.0, 25.0));
}

fn stretched_pair(stiffness: f64) -> (BodySet<f64>, tumble::BodyHandle, tumble::BodyHandle) {
    let mut set = BodySet::new();
    let a = set.insert(Body::verlet(Vec2::new(0.0, 0.0), 1.0).unwrap());
    let b = set.insert(Body::verlet(Vec2::new(15.0, 0.0), 1.0).unwrap());
    let c = DistanceConstraint::new(b, 10.0, stiffness).unwrap();
    if let BodyKind::Verlet(v) = &mut set.get_mut(a).unwrap().kind {
        v.constraints.push(c);
    }
    (set, a, b)
}

#[test]
fn constraint_error_shrinks_monotonically() {
    let (mut set, a, b) = stretched_pair(0.5);
    let gap = |set: &BodySet<f64>| {
        (set.get(a).unwrap().position.distance(set.get(b).unwrap().position) - 10.0).abs()
    };
    let mut previous = gap(&set);
    for _ in 0..5 {
        solve_constraints(&mut set, 5, &mut NoOpStepObserver);
        let now = gap(&set);
        assert!(now < previous, "gap {} did not shrink below {}", now, previous);
        previous = now;
    }
}

#[test]
fn compressed_constraint_pushes_apart() {
    let mut set = BodySet::new();
    let a = set.insert(Body::verlet(Vec2::new(0.0f64, 0.0), 1.0).unwrap());
    let b = set.insert(Body::verlet(Vec2::new(4.0, 0.0), 1.0).unwrap());
    if let BodyKind::Verlet(v) = &mut set.get_mut(a).unwrap().kind {
        v.constraints.push(DistanceConstraint::new(b, 10.0, 1.0).unwrap());
    }
    solve_once(&mut set);
    assert_abs_diff_eq!(set.get(a).unwrap().position.x, -3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(set.get(b).unwrap().position.x, 7.0, epsilon = 1e-12);
}

#[test]
fn zero_stiffness_constraint_is_inert() {
    let (mut set, _a, b) = stretched_pair(0.0);
    solve_constraints(&mut set, 5, &mut NoOpStepObserver);
    assert_eq!(set.get(b).unwrap().position, Vec2::new(15.0, 0.0));
}

#[test]
fn drag_override_leaves_no_velocity_spike() {
    let mut sim = no_gravity();
    let p = sim.create_verlet_body(Vec2::new(0.0, 0.0), 1.0).unwrap();
    sim.set_friction(p, 0.0).unwrap();
    sim.add_force(p, 50.0, 0.0).unwrap();
    sim.override_position(p, 200.0, 100.0).unwrap();
    sim.step(1.0 / 60.0);
    assert_eq!(sim.position(p).unwrap(), Vec2::new(200.0, 100.0));
    assert_eq!(sim.velocity(p).unwrap(), Vec2::zero());
}

#[test]
fn kinematic_verlet_is_left_alone() {
    let mut sim: Simulation<f64> = Simulation::new();
    let p = sim.create_verlet_body(Vec2::new(10.0, 10.0), 1.0).unwrap();
    sim.set_has_physics(p, false).unwrap();
    for _ in 0..30 {
        sim.step(1.0 / 60.0);
    }
    assert_eq!(sim.position(p).unwrap(), Vec2::new(10.0, 10.0));
}
