//! Per-frame smoke simulation
//!
//! One call advances a particle cache by exactly one video frame:
//!
//! 1. Load the previous frame's particles (an empty input path starts from
//!    nothing).
//! 2. Spawn `new_per_note` particles above every active note.
//! 3. Move every particle, cull the ones that left the frame or outlived
//!    [`MAX_AGE`](crate::MAX_AGE), and slow the rest down by air resistance.
//! 4. Write the survivors to the output cache.
//!
//! Particle order is preserved: loaded particles first, then spawns per note
//! in note order. The renderer blends overlapping particles in that order.

use log::{debug, trace, warn};
use std::path::Path;

use crate::error::{Result, SmokeError};
use crate::particle::{Fate, Particle};
use crate::random::UniformSource;
use crate::{AIR_RESISTANCE, store};

/// Horizontal interval `[x_start, x_end)` above one active note
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnInterval {
    /// Left edge in pixels
    pub x_start: f64,
    /// Right edge in pixels (exclusive)
    pub x_end: f64,
}

impl SpawnInterval {
    /// Create a spawn interval
    pub fn new(x_start: f64, x_end: f64) -> Self {
        Self { x_start, x_end }
    }

    /// Narrow a sampled position to `f32` without landing on `x_end`
    fn position(self, x: f64) -> f32 {
        let x = x as f32;
        let end = self.x_end as f32;
        if self.x_end > self.x_start && x >= end {
            end.next_down()
        } else {
            x
        }
    }
}

/// Uniform velocity range in pixels per second
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct VelocityRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl VelocityRange {
    /// Create a velocity range
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range that always yields `velocity`
    pub fn fixed(velocity: f64) -> Self {
        Self::new(velocity, velocity)
    }

    /// The same range in pixels per frame
    fn per_frame(self, fps: f64) -> Self {
        Self::new(self.min / fps, self.max / fps)
    }
}

/// Everything one simulation call needs besides the cache paths
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    /// Video frames per second
    pub fps: f64,
    /// Particles spawned per active note per frame
    pub new_per_note: u32,
    /// One spawn interval per active note
    pub notes: Vec<SpawnInterval>,
    /// Vertical spawn position shared by all new particles
    pub y_start: f64,
    /// Initial horizontal velocity range in pixels per second
    pub vx: VelocityRange,
    /// Initial vertical velocity range in pixels per second
    pub vy: VelocityRange,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

/// Counters describing one simulated frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationReport {
    /// Particles read from the input cache
    pub loaded: usize,
    /// Particles spawned this frame
    pub spawned: usize,
    /// Particles culled for leaving the frame
    pub out_of_bounds: usize,
    /// Particles culled for exceeding the maximum age
    pub expired: usize,
    /// Particles handed to the output cache
    pub saved: usize,
}

/// Advances smoke particles one frame at a time
#[derive(Debug, Clone)]
pub struct Simulator {
    params: SimulationParams,
    vx: VelocityRange,
    vy: VelocityRange,
    decay: f32,
    dt: f32,
}

impl Simulator {
    /// Create a simulator, validating the parameters
    ///
    /// # Errors
    ///
    /// Returns [`SmokeError::InvalidParameters`] for a non-positive or
    /// non-finite frame rate or spawn height, and [`SmokeError::InvalidRange`]
    /// for a velocity range or note interval with a non-finite bound.
    pub fn new(params: SimulationParams) -> Result<Self> {
        if !(params.fps.is_finite() && params.fps > 0.0) {
            return Err(SmokeError::InvalidParameters(format!(
                "fps must be positive and finite, got {}",
                params.fps
            )));
        }
        if !params.y_start.is_finite() {
            return Err(SmokeError::InvalidParameters(format!(
                "spawn height must be finite, got {}",
                params.y_start
            )));
        }
        check_range("vx", params.vx.min, params.vx.max)?;
        check_range("vy", params.vy.min, params.vy.max)?;
        for note in &params.notes {
            check_range("note", note.x_start, note.x_end)?;
        }

        let vx = params.vx.per_frame(params.fps);
        let vy = params.vy.per_frame(params.fps);
        let decay = AIR_RESISTANCE.powf(1.0 / params.fps) as f32;
        let dt = (1.0 / params.fps) as f32;

        Ok(Self {
            params,
            vx,
            vy,
            decay,
            dt,
        })
    }

    /// The parameters this simulator was built with
    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Velocity multiplier applied to every surviving particle each frame
    ///
    /// Equal to `AIR_RESISTANCE^(1 / fps)`, so a second of frames always
    /// removes the same share of velocity whatever the frame rate.
    pub fn decay_factor(&self) -> f32 {
        self.decay
    }

    /// Seconds added to a surviving particle's age each frame
    pub fn frame_time(&self) -> f32 {
        self.dt
    }

    /// Append this frame's new particles, returning how many were spawned
    pub fn spawn<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        particles: &mut Vec<Particle>,
    ) -> usize {
        let per_note = self.params.new_per_note as usize;
        particles.reserve(self.params.notes.len() * per_note);

        for note in &self.params.notes {
            for _ in 0..per_note {
                let x = note.position(rng.uniform(note.x_start, note.x_end));
                let vx = rng.uniform(self.vx.min, self.vx.max);
                let vy = rng.uniform(self.vy.min, self.vy.max);
                particles.push(Particle::new(
                    x,
                    self.params.y_start as f32,
                    vx as f32,
                    vy as f32,
                ));
            }
        }
        self.params.notes.len() * per_note
    }

    /// Spawn, integrate and cull one frame in memory
    ///
    /// On return `particles` holds only live particles.
    pub fn step<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        particles: &mut Vec<Particle>,
    ) -> SimulationReport {
        let mut report = SimulationReport {
            spawned: self.spawn(rng, particles),
            ..SimulationReport::default()
        };

        let (width, height) = (self.params.width, self.params.height);
        for particle in particles.iter_mut() {
            match particle.advance(self.decay, self.dt, width, height) {
                Fate::Survived => {}
                Fate::OutOfBounds => {
                    trace!("Particle left the frame at ({}, {})", particle.x, particle.y);
                    report.out_of_bounds += 1;
                }
                Fate::Expired => {
                    trace!("Particle expired at age {}", particle.age);
                    report.expired += 1;
                }
            }
        }

        particles.retain(|p| p.alive);
        report.saved = particles.len();
        report
    }

    /// Simulate one frame from the `input` cache into the `output` cache
    ///
    /// An empty `input` path means there is no previous frame. Unreadable
    /// input and unwritable output are logged and otherwise ignored.
    pub fn simulate<R: UniformSource + ?Sized>(
        &self,
        rng: &mut R,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> SimulationReport {
        let input = input.as_ref();
        let mut particles = if input.as_os_str().is_empty() {
            Vec::new()
        } else {
            store::load(input)
        };
        let loaded = particles.len();

        let mut report = self.step(rng, &mut particles);
        report.loaded = loaded;

        store::save(output, &particles);
        debug!(
            "Simulated frame: {} loaded, {} spawned, {} left frame, {} expired, {} saved",
            report.loaded, report.spawned, report.out_of_bounds, report.expired, report.saved
        );
        report
    }
}

fn check_range(what: &'static str, min: f64, max: f64) -> Result<()> {
    if min.is_finite() && max.is_finite() {
        Ok(())
    } else {
        Err(SmokeError::InvalidRange { what, min, max })
    }
}

/// Simulate one frame using the thread-local random generator
///
/// Invalid parameters are logged and nothing is written.
pub fn simulate(
    params: SimulationParams,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> SimulationReport {
    match Simulator::new(params) {
        Ok(simulator) => simulator.simulate(&mut rand::rng(), input, output),
        Err(e) => {
            warn!("Smoke simulation skipped: {e}");
            SimulationReport::default()
        }
    }
}

/// User-facing smoke settings
///
/// These stay constant over a video; [`SmokeSettings::params`] combines them
/// with the per-frame notes and video format.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SmokeSettings {
    /// Particles spawned per active note per frame
    pub new_per_note: u32,
    /// Initial horizontal velocity in pixels per second
    pub vx: VelocityRange,
    /// Initial vertical velocity in pixels per second
    pub vy: VelocityRange,
    /// Render intensity
    pub intensity: f64,
    /// Spawn height in pixels; the bottom row when unset
    pub y_start: Option<f64>,
}

impl Default for SmokeSettings {
    fn default() -> Self {
        Self {
            new_per_note: 3,
            vx: VelocityRange::new(-60.0, 60.0),
            vy: VelocityRange::new(-120.0, -40.0),
            intensity: 1.0,
            y_start: None,
        }
    }
}

impl SmokeSettings {
    /// Simulation parameters for one frame
    pub fn params(
        &self,
        fps: f64,
        width: u32,
        height: u32,
        notes: Vec<SpawnInterval>,
    ) -> SimulationParams {
        SimulationParams {
            fps,
            new_per_note: self.new_per_note,
            notes,
            y_start: self
                .y_start
                .unwrap_or_else(|| f64::from(height.saturating_sub(1))),
            vx: self.vx,
            vy: self.vy,
            width,
            height,
        }
    }
}
