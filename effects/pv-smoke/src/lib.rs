//! Smoke particle effect for piano visualizer frames.
//!
//! This crate simulates a field of drifting smoke particles that rise from the
//! keys of active notes and composites them onto rendered video frames. The
//! simulation and the compositing are two independent stages that only share
//! state through a small binary particle cache on disk, so a video driver can
//! simulate frame `N`, render frame `N`, and then feed frame `N`'s cache into
//! the simulation of frame `N + 1`.
//!
//! # Architecture
//!
//! - [`Particle`]: a single smoke particle (liveness, age, position, velocity)
//! - [`store`]: reading and writing particle caches
//! - [`Simulator`]: spawns, integrates and culls particles for one frame
//! - [`Renderer`]: blends cached particles onto a [`Canvas`]
//!
//! # Examples
//!
//! ```no_run
//! use pv_smoke::{Rgb8Frame, Renderer, SimulationParams, Simulator, SpawnInterval, VelocityRange};
//!
//! let params = SimulationParams {
//!     fps: 30.0,
//!     new_per_note: 4,
//!     notes: vec![SpawnInterval::new(100.0, 140.0)],
//!     y_start: 1079.0,
//!     vx: VelocityRange::new(-60.0, 60.0),
//!     vy: VelocityRange::new(-120.0, -40.0),
//!     width: 1920,
//!     height: 1080,
//! };
//!
//! let simulator = Simulator::new(params).unwrap();
//! let mut rng = rand::rng();
//! simulator.simulate(&mut rng, "frame_00000.smoke", "frame_00001.smoke");
//!
//! let mut frame = Rgb8Frame::new(1920, 1080);
//! Renderer::new(1.0).render(&mut frame, "frame_00001.smoke");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod canvas;
pub mod error;
pub mod particle;
pub mod random;
pub mod renderer;
pub mod simulator;
pub mod store;

pub use canvas::{Canvas, Rgb8Frame, mix};
pub use error::{Result, SmokeError};
pub use particle::{Fate, Particle};
pub use random::UniformSource;
pub use renderer::{RenderReport, Renderer, brightness, render};
pub use simulator::{
    SimulationParams, SimulationReport, Simulator, SmokeSettings, SpawnInterval, VelocityRange,
    simulate,
};
pub use store::{
    StoreSummary, load, read_particles, save, try_load, try_save, write_particles,
};

/// Maximum particle lifetime in seconds
///
/// Particles older than this are culled by the simulator and render fully faded.
pub const MAX_AGE: f32 = 6.0;

/// Fraction of velocity a particle keeps after one second of air resistance
pub const AIR_RESISTANCE: f64 = 0.95;
