//! Integration tests for simulating and compositing smoke onto frames

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use pv_smoke::{
    Canvas, Particle, Renderer, Rgb8Frame, SimulationParams, Simulator, SpawnInterval,
    VelocityRange, brightness, load, render, save,
};

fn still_params() -> SimulationParams {
    SimulationParams {
        fps: 30.0,
        new_per_note: 5,
        notes: vec![SpawnInterval::new(10.0, 20.0)],
        y_start: 50.0,
        vx: VelocityRange::fixed(0.0),
        vy: VelocityRange::fixed(0.0),
        width: 100,
        height: 100,
    }
}

fn lit_pixels(frame: &Rgb8Frame) -> Vec<(u32, u32)> {
    let mut lit = Vec::new();
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            if frame.get_pixel(x, y) != [0, 0, 0] {
                lit.push((x, y));
            }
        }
    }
    lit
}

#[test]
fn test_spawn_then_render_scenario() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("frame.smoke");

    Simulator::new(still_params())
        .unwrap()
        .simulate(&mut StdRng::seed_from_u64(11), "", &cache);
    let particles = load(&cache);
    assert_eq!(particles.len(), 5);

    let mut frame = Rgb8Frame::new(100, 100);
    let report = render(&mut frame, &cache, 10.0);
    assert_eq!(report.stamped, 5);

    let centers: Vec<(i64, i64)> = particles
        .iter()
        .map(|p| (p.x as i64, p.y as i64))
        .collect();
    let value = brightness(particles[0].age);

    for &(cx, cy) in &centers {
        assert!((10..20).contains(&cx));
        assert_eq!(cy, 50);
        assert_eq!(frame.get_pixel(cx as u32, cy as u32), [value; 3]);
    }

    // Every lit pixel belongs to some particle's 3x3 stamp
    for (x, y) in lit_pixels(&frame) {
        let covered = centers
            .iter()
            .any(|&(cx, cy)| (i64::from(x) - cx).abs() <= 1 && (i64::from(y) - cy).abs() <= 1);
        assert!(covered, "pixel ({x}, {y}) lit outside any stamp");
    }
}

#[test]
fn test_half_life_brightness() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("frame.smoke");

    let mut particle = Particle::new(5.0, 5.0, 0.0, 0.0);
    particle.age = 3.0;
    save(&cache, &[particle]);

    let mut frame = Rgb8Frame::new(10, 10);
    Renderer::new(10.0).render(&mut frame, &cache);

    let [r, g, b] = frame.get_pixel(5, 5);
    assert!(r == 127 || r == 128, "center value {r}");
    assert_eq!((r, r), (g, b));
}

#[test]
fn test_missing_cache_leaves_frame_untouched() {
    let dir = TempDir::new().unwrap();
    let mut frame = Rgb8Frame::filled(8, 8, [12, 34, 56]);

    let report = render(&mut frame, dir.path().join("missing.smoke"), 10.0);
    assert_eq!(report.loaded, 0);
    assert_eq!(frame, Rgb8Frame::filled(8, 8, [12, 34, 56]));
}

#[test]
fn test_low_intensity_blends_with_background() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("frame.smoke");
    save(&cache, &[Particle::new(2.0, 2.0, 0.0, 0.0)]);

    let mut frame = Rgb8Frame::filled(5, 5, [101, 3, 199]);
    render(&mut frame, &cache, 1.0);

    // 10% of the way towards white at the center, 1/30 at neighbours
    assert_eq!(frame.get_pixel(2, 2), [116, 28, 205]);
    assert_eq!(frame.get_pixel(1, 2), [106, 11, 201]);
    assert_eq!(frame.get_pixel(0, 0), [101, 3, 199]);
}

#[cfg(feature = "image")]
#[test]
fn test_render_onto_image_buffer() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("frame.smoke");
    save(&cache, &[Particle::new(1.0, 1.0, 0.0, 0.0)]);

    let mut img = image::RgbImage::new(3, 3);
    let report = render(&mut img, &cache, 10.0);

    assert_eq!(report.stamped, 1);
    assert_eq!(img.get_pixel(1, 1).0, [255, 255, 255]);
    assert_eq!(img.get_pixel(0, 0).0, [85, 85, 85]);
}
