use approx::assert_abs_diff_eq;
use tumble::collision::resolve_collisions;
use tumble::{Body, BodySet, Shape, Simulation, SimulationConfig, Vec2};

fn circle(x: f64, y: f64, r: f64) -> Body<f64> {
    Body::euler(Shape::circle(r).unwrap(), Vec2::new(x, y)).unwrap()
}

#[test]
fn overlapping_equal_circles_separate_and_stop_approaching() {
    let r = 10.0;
    let mut sim: Simulation<f64> = Simulation::with_config(
        SimulationConfig::new().with_gravity(Vec2::zero()),
    )
    .unwrap();
    let a = sim.create_euler_body(Shape::circle(r).unwrap(), Vec2::new(100.0, 100.0)).unwrap();
    let b = sim.create_euler_body(Shape::circle(r).unwrap(), Vec2::new(100.0 + r, 100.0)).unwrap();
    for h in [a, b] {
        sim.set_friction(h, 0.0).unwrap();
        sim.set_restitution(h, 0.5).unwrap();
    }
    sim.set_velocity(a, 30.0, 0.0).unwrap();
    sim.set_velocity(b, -30.0, 0.0).unwrap();

    let before = sim.position(a).unwrap().distance(sim.position(b).unwrap());
    sim.step(1.0 / 60.0);
    let after = sim.position(a).unwrap().distance(sim.position(b).unwrap());
    assert!(after > before, "distance {} should grow past {}", after, before);
    assert!(after < 2.0 * r);

    let normal = (sim.position(b).unwrap() - sim.position(a).unwrap()).normalize();
    let rel = sim.velocity(b).unwrap() - sim.velocity(a).unwrap();
    assert!(rel.dot(normal) >= 0.0);
}

#[test]
fn single_pass_removes_eighty_percent_of_overlap() {
    let mut set = BodySet::new();
    let a = set.insert(circle(0.0, 0.0, 10.0));
    let b = set.insert(circle(10.0, 0.0, 10.0));
    assert_eq!(resolve_collisions(&mut set), 1);
    let d = set.get(a).unwrap().position.distance(set.get(b).unwrap().position);
    assert_abs_diff_eq!(d, 18.0, epsilon = 1e-9);
}

#[test]
fn heavier_body_moves_less() {
    let mut set = BodySet::new();
    let heavy = set.insert(circle(0.0, 0.0, 5.0).with_mass(9.0).unwrap());
    let light = set.insert(circle(8.0, 0.0, 5.0));
    resolve_collisions(&mut set);
    let heavy_moved = set.get(heavy).unwrap().position.x.abs();
    let light_moved = set.get(light).unwrap().position.x - 8.0;
    assert_abs_diff_eq!(heavy_moved * 9.0, light_moved, epsilon = 1e-9);
}

#[test]
fn mixed_euler_and_verlet_collide() {
    let mut set = BodySet::new();
    let ball = set.insert(circle(0.0, 0.0, 5.0));
    let particle = set.insert(Body::verlet(Vec2::new(6.0, 0.0), 5.0).unwrap());
    assert_eq!(resolve_collisions(&mut set), 1);
    assert!(set.get(ball).unwrap().position.x < 0.0);
    assert!(set.get(particle).unwrap().position.x > 6.0);
}

#[test]
fn rectangles_and_pinned_pairs_are_skipped() {
    let mut set = BodySet::new();
    set.insert(Body::euler(Shape::rect(10.0, 10.0).unwrap(), Vec2::new(0.0f64, 0.0)).unwrap());
    set.insert(circle(1.0, 0.0, 5.0).with_pinned(true));
    set.insert(Body::verlet(Vec2::new(2.0, 0.0), 5.0).unwrap().with_pinned(true));
    assert_eq!(resolve_collisions(&mut set), 0);
}

#[test]
fn coincident_centres_are_left_for_next_step() {
    let mut set = BodySet::new();
    let a = set.insert(circle(3.0, 3.0, 5.0));
    let b = set.insert(circle(3.0, 3.0, 5.0));
    assert_eq!(resolve_collisions(&mut set), 0);
    assert_eq!(set.get(a).unwrap().position, set.get(b).unwrap().position);
}

#[test]
fn pile_settles_without_nan() {
    let mut sim: Simulation<f32> = Simulation::new();
    sim.set_boundary(200.0, 200.0).unwrap();
    for i in 0..40 {
        let x = 20.0 + (i % 8) as f32 * 21.0;
        let y = 20.0 + (i / 8) as f32 * 21.0;
        let h = sim.create_euler_body(Shape::circle(10.0).unwrap(), Vec2::new(x, y)).unwrap();
        sim.set_restitution(h, 0.3).unwrap();
    }
    for _ in 0..600 {
        sim.step(1.0 / 60.0);
    }
    for (_, body) in sim.bodies() {
        assert!(body.position.is_finite());
        assert!(body.position.x >= 10.0 - 1e-3 && body.position.x <= 190.0 + 1e-3);
        assert!(body.position.y >= 10.0 - 1e-3 && body.position.y <= 190.0 + 1e-3);
    }
}
