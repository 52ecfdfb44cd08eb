use tumble::{Cloth, ClothConfig, Simulation, SimulationConfig, Vec2};

fn cloth_sim() -> Simulation<f32> {
    Simulation::with_config(SimulationConfig::new().with_constraint_iterations(8)).unwrap()
}

#[test]
fn default_cloth_layout() {
    let mut sim = cloth_sim();
    let cloth = Cloth::build(&mut sim, Vec2::new(100.0, 50.0), &ClothConfig::default()).unwrap();
    assert_eq!(cloth.cols(), 20);
    assert_eq!(cloth.rows(), 15);
    assert_eq!(cloth.particle_count(), 300);
    // Horizontal 19 * 15 + vertical 20 * 14
    assert_eq!(sim.constraint_count(), 285 + 280);

    assert_eq!(cloth.position_at(&sim, 0, 0).unwrap(), Vec2::new(100.0, 50.0));
    assert_eq!(cloth.position_at(&sim, 3, 2).unwrap(), Vec2::new(145.0, 80.0));

    // Pins at columns 0, 4, 8, 12, 16 and the last one.
    let pinned = (0..20).filter(|&c| sim.is_pinned(cloth.handle(c, 0).unwrap()).unwrap()).count();
    assert_eq!(pinned, 6);
    assert!(sim.is_pinned(cloth.handle(19, 0).unwrap()).unwrap());
}

#[test]
fn cloth_hangs_from_pins() {
    let mut sim = cloth_sim();
    let config = ClothConfig { cols: 6, rows: 5, spacing: 10.0, ..ClothConfig::default() };
    let cloth = Cloth::build(&mut sim, Vec2::new(0.0, 0.0), &config).unwrap();

    for _ in 0..60 {
        sim.step(1.0 / 60.0);
    }

    assert_eq!(cloth.position_at(&sim, 0, 0).unwrap(), Vec2::new(0.0, 0.0));
    assert_eq!(cloth.position_at(&sim, 5, 0).unwrap(), Vec2::new(50.0, 0.0));
    let bottom = cloth.position_at(&sim, 2, 4).unwrap();
    assert!(bottom.y > 40.0, "bottom row should sag, y = {}", bottom.y);
    assert!(bottom.y < 80.0, "constraints should hold the cloth, y = {}", bottom.y);
    for (_, body) in sim.bodies() {
        assert!(body.position.is_finite());
    }
}

#[test]
fn torn_particle_falls_free() {
    let mut sim = cloth_sim();
    let config = ClothConfig { cols: 5, rows: 4, spacing: 10.0, pin_every: 1, ..ClothConfig::default() };
    let cloth = Cloth::build(&mut sim, Vec2::new(0.0, 0.0), &config).unwrap();

    let removed = cloth.tear_at(&mut sim, 2, 3).unwrap();
    // Bottom-row particle: left, right and above.
    assert_eq!(removed, 3);

    for _ in 0..60 {
        sim.step(1.0 / 60.0);
    }
    let loose = cloth.position_at(&sim, 2, 3).unwrap();
    let held = cloth.position_at(&sim, 1, 3).unwrap();
    assert!(loose.y > held.y + 50.0, "loose {} vs held {}", loose.y, held.y);
}

#[test]
fn shear_cloth_resists_skew() {
    let skew = |shear: Option<f32>| {
        let mut sim = cloth_sim();
        sim.set_gravity(0.0, 0.0).unwrap();
        let config = ClothConfig { cols: 3, rows: 3, spacing: 10.0, shear_stiffness: shear, pin_every: 0, ..ClothConfig::default() };
        let cloth = Cloth::build(&mut sim, Vec2::new(0.0, 0.0), &config).unwrap();
        sim.set_pinned(cloth.handle(0, 0).unwrap(), true).unwrap();
        sim.set_pinned(cloth.handle(1, 0).unwrap(), true).unwrap();
        sim.set_pinned(cloth.handle(2, 0).unwrap(), true).unwrap();
        // Shove the bottom row sideways and let it recover.
        for col in 0..3 {
            sim.set_velocity(cloth.handle(col, 2).unwrap(), 60.0, 0.0).unwrap();
        }
        for _ in 0..10 {
            sim.step(1.0 / 60.0);
        }
        cloth.position_at(&sim, 1, 2).unwrap().x - 10.0
    };
    let loose = skew(None).abs();
    let braced = skew(Some(0.8)).abs();
    assert!(braced < loose, "braced {} loose {}", braced, loose);
}
