//! Smoke compositing
//!
//! Every particle is drawn as a soft 3x3 stamp: the center pixel is blended
//! towards a gray of the particle's brightness by `intensity / 10`, and each
//! of the eight neighbours by `intensity / 30`. Brightness fades linearly from
//! 255 at spawn to 0 at [`MAX_AGE`].
//!
//! Stamps are blended one after another in cache order, so where stamps
//! overlap the later particle dominates.

use log::debug;
use std::path::Path;

use crate::MAX_AGE;
use crate::canvas::Canvas;
use crate::particle::Particle;
use crate::store;

/// Offsets of the eight pixels surrounding a stamp's center
const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Gray level of a particle of the given age
///
/// `255 * (1 - age / MAX_AGE)`, truncated. Ages outside `0..=MAX_AGE` are
/// clamped, so a corrupt cache cannot produce out-of-range values.
pub fn brightness(age: f32) -> u8 {
    let faded = (age / MAX_AGE).clamp(0.0, 1.0);
    (255.0 * (1.0 - faded)) as u8
}

/// Counters describing one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Particles available for drawing
    pub loaded: usize,
    /// Particles that were stamped onto the canvas
    pub stamped: usize,
    /// Particles skipped for lying outside the canvas
    pub skipped: usize,
}

/// Draws smoke particles onto a canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    intensity: f64,
}

impl Renderer {
    /// Create a renderer with the given intensity multiplier
    ///
    /// An intensity of `10` replaces the center pixel outright.
    pub fn new(intensity: f64) -> Self {
        Self { intensity }
    }

    /// The intensity multiplier
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Blend ratio for the center pixel of a stamp
    pub fn center_ratio(&self) -> f64 {
        self.intensity / 10.0
    }

    /// Blend ratio for the eight surrounding pixels of a stamp
    pub fn glow_ratio(&self) -> f64 {
        self.intensity / 30.0
    }

    /// Stamp every live particle in `particles` onto `canvas`
    pub fn render_particles<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        particles: &[Particle],
    ) -> RenderReport {
        let mut report = RenderReport {
            loaded: particles.len(),
            ..RenderReport::default()
        };

        for particle in particles.iter().filter(|p| p.alive) {
            if self.stamp(canvas, particle) {
                report.stamped += 1;
            } else {
                report.skipped += 1;
            }
        }
        report
    }

    /// Stamp the particles of the cache at `path` onto `canvas`
    ///
    /// An unreadable cache is logged and leaves the canvas untouched.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, path: impl AsRef<Path>) -> RenderReport {
        let particles = store::load(path);
        let report = self.render_particles(canvas, &particles);
        debug!(
            "Rendered {} of {} particles ({} off canvas)",
            report.stamped, report.loaded, report.skipped
        );
        report
    }

    fn stamp<C: Canvas + ?Sized>(&self, canvas: &mut C, particle: &Particle) -> bool {
        if !(particle.x.is_finite() && particle.y.is_finite()) {
            return false;
        }
        let x = particle.x as i64;
        let y = particle.y as i64;
        if !canvas.in_bounds(x, y) {
            return false;
        }

        let value = brightness(particle.age);
        let color = [value; 3];

        canvas.mix_pixel(x as u32, y as u32, color, self.center_ratio());
        for (dx, dy) in NEIGHBOURS {
            let (nx, ny) = (x + dx, y + dy);
            if canvas.in_bounds(nx, ny) {
                canvas.mix_pixel(nx as u32, ny as u32, color, self.glow_ratio());
            }
        }
        true
    }
}

/// Stamp the particles of the cache at `path` onto `canvas`
pub fn render<C: Canvas + ?Sized>(
    canvas: &mut C,
    path: impl AsRef<Path>,
    intensity: f64,
) -> RenderReport {
    Renderer::new(intensity).render(canvas, path)
}
