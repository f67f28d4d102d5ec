//! Integration tests for frame-to-frame smoke simulation

use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use pv_smoke::{
    MAX_AGE, Particle, SimulationParams, Simulator, SpawnInterval, VelocityRange, load, save,
    try_load,
};

fn params(notes: Vec<SpawnInterval>, new_per_note: u32) -> SimulationParams {
    SimulationParams {
        fps: 30.0,
        new_per_note,
        notes,
        y_start: 50.0,
        vx: VelocityRange::new(-15.0, 15.0),
        vy: VelocityRange::new(-15.0, 15.0),
        width: 100,
        height: 100,
    }
}

/// Runs the simulator on an in-memory population through real cache files
fn simulate_population(
    simulator: &Simulator,
    dir: &TempDir,
    particles: &[Particle],
    rng: &mut StdRng,
) -> Vec<Particle> {
    let input = dir.path().join("in.smoke");
    let output = dir.path().join("out.smoke");
    save(&input, particles);
    simulator.simulate(rng, &input, &output);
    try_load(&output).unwrap()
}

#[test]
fn test_empty_scenario() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("frame.smoke");
    let simulator = Simulator::new(params(Vec::new(), 0)).unwrap();

    let report = simulator.simulate(&mut StdRng::seed_from_u64(0), "", &output);

    assert_eq!(report.saved, 0);
    assert!(output.exists());
    assert_eq!(try_load(&output).unwrap(), Vec::new());
}

#[test]
fn test_missing_input_uses_only_spawns() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("frame.smoke");
    let simulator = Simulator::new(params(vec![SpawnInterval::new(10.0, 20.0)], 5)).unwrap();

    let report = simulator.simulate(
        &mut StdRng::seed_from_u64(1),
        dir.path().join("does_not_exist.smoke"),
        &output,
    );

    assert_eq!(report.loaded, 0);
    assert_eq!(report.spawned, 5);
    assert_eq!(load(&output).len(), 5);
}

#[test]
fn test_saved_records_are_alive() {
    let dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(2);
    let simulator = Simulator::new(SimulationParams {
        vx: VelocityRange::new(-3000.0, 3000.0),
        vy: VelocityRange::new(-3000.0, 3000.0),
        ..params(vec![SpawnInterval::new(0.0, 100.0)], 50)
    })
    .unwrap();

    let mut prev = String::new();
    for frame in 0..10 {
        let output = dir.path().join(format!("{frame}.smoke"));
        let report = simulator.simulate(&mut rng, &prev, &output);
        assert!(report.out_of_bounds > 0, "fast particles should leave the frame");

        // Read raw records to see what was actually written
        let bytes = std::fs::read(&output).unwrap();
        let count = i32::from_le_bytes(bytes[..4].try_into().unwrap()) as usize;
        assert_eq!(count, report.saved);
        for record in bytes[4..].chunks(Particle::RECORD_SIZE) {
            assert_eq!(record[0], 1);
        }
        prev = output.to_string_lossy().into_owned();
    }
}

#[test]
fn test_velocity_decays_and_age_advances() {
    let dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    let simulator = Simulator::new(params(Vec::new(), 0)).unwrap();
    let dt = simulator.frame_time();

    let mut population = vec![Particle::new(50.0, 50.0, 0.3, -0.4)];
    for _ in 0..30 {
        let before = population[0];
        population = simulate_population(&simulator, &dir, &population, &mut rng);
        assert_eq!(population.len(), 1);
        let after = population[0];

        assert!(after.speed() < before.speed());
        assert!(after.age > before.age);
        assert!((after.age - before.age - dt).abs() < 1e-5);
        assert!((after.x - (before.x + before.vx)).abs() < 1e-5);
    }
}

#[test]
fn test_lifetime_cull() {
    let dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(4);
    let simulator = Simulator::new(params(Vec::new(), 0)).unwrap();

    let mut old = Particle::new(50.0, 50.0, 0.0, 0.0);
    old.age = MAX_AGE + 0.001;
    let mut young = Particle::new(60.0, 60.0, 0.0, 0.0);
    young.age = MAX_AGE - 1.0;

    let survivors = simulate_population(&simulator, &dir, &[old, young], &mut rng);
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].x, 60.0);
}

#[test]
fn test_particle_lives_about_six_seconds() {
    let dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let simulator = Simulator::new(params(Vec::new(), 0)).unwrap();

    let mut population = vec![Particle::new(50.0, 50.0, 0.0, 0.0)];
    let mut frames = 0;
    while !population.is_empty() {
        population = simulate_population(&simulator, &dir, &population, &mut rng);
        frames += 1;
        assert!(frames < 1000);
    }
    // Survives until its age passes 6s, then one more frame to be culled
    assert!((181..=183).contains(&frames), "lived {frames} frames");
}

#[test]
fn test_bounds_cull() {
    let dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    let simulator = Simulator::new(params(Vec::new(), 0)).unwrap();

    let population = [
        Particle::new(99.5, 50.0, 1.0, 0.0),
        Particle::new(50.0, 0.5, 0.0, -1.0),
        Particle::new(0.5, 50.0, -1.0, 0.0),
        Particle::new(50.0, 99.0, 0.0, 1.0),
        Particle::new(50.0, 50.0, 1.0, 1.0),
    ];

    let survivors = simulate_population(&simulator, &dir, &population, &mut rng);
    assert_eq!(survivors.len(), 1);
    assert_eq!((survivors[0].x, survivors[0].y), (51.0, 51.0));
}

#[test]
fn test_order_preserved_across_frames() {
    let dir = TempDir::new().unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let simulator = Simulator::new(SimulationParams {
        vx: VelocityRange::fixed(0.0),
        vy: VelocityRange::fixed(0.0),
        ..params(
            vec![SpawnInterval::new(10.0, 11.0), SpawnInterval::new(80.0, 81.0)],
            2,
        )
    })
    .unwrap();

    let first = dir.path().join("1.smoke");
    let second = dir.path().join("2.smoke");
    simulator.simulate(&mut rng, "", &first);
    simulator.simulate(&mut rng, &first, &second);

    let xs: Vec<bool> = load(&second).iter().map(|p| p.x < 50.0).collect();
    assert_eq!(xs, vec![true, true, false, false, true, true, false, false]);
}

#[test]
fn test_unwritable_output_does_not_panic() {
    let dir = TempDir::new().unwrap();
    let simulator = Simulator::new(params(vec![SpawnInterval::new(10.0, 20.0)], 5)).unwrap();
    let output = dir.path().join("missing_dir").join("frame.smoke");

    let report = simulator.simulate(&mut StdRng::seed_from_u64(8), "", &output);
    assert_eq!(report.spawned, 5);
    assert!(!output.exists());
}

#[test]
fn test_simulate_free_function_rejects_bad_fps() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("frame.smoke");

    let report = pv_smoke::simulate(
        SimulationParams {
            fps: 0.0,
            ..params(Vec::new(), 0)
        },
        "",
        &output,
    );
    assert_eq!(report.saved, 0);
    assert!(!output.exists());
}
