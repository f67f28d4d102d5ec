//! Individual smoke particle and its cache record

use std::io::{self, Read, Write};

use crate::MAX_AGE;

/// A single smoke particle
///
/// Positions are in frame pixel space. Velocities are in pixels per simulated
/// frame, not per second.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    /// Whether the particle should be persisted and rendered
    pub alive: bool,
    /// Seconds since the particle was spawned
    pub age: f32,
    /// Horizontal position in pixels
    pub x: f32,
    /// Vertical position in pixels
    pub y: f32,
    /// Horizontal velocity in pixels per frame
    pub vx: f32,
    /// Vertical velocity in pixels per frame
    pub vy: f32,
}

/// Outcome of advancing a particle by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// The particle survived the frame
    Survived,
    /// The particle left the frame
    OutOfBounds,
    /// The particle was already older than [`MAX_AGE`]
    Expired,
}

impl Particle {
    /// Size in bytes of one record in a particle cache
    ///
    /// One flag byte, three padding bytes, then five `f32` fields.
    pub const RECORD_SIZE: usize = 24;

    /// Create a freshly spawned particle
    pub fn new(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self {
            alive: true,
            age: 0.0,
            x,
            y,
            vx,
            vy,
        }
    }

    /// Speed in pixels per frame
    #[inline]
    pub fn speed(&self) -> f32 {
        self.vx.hypot(self.vy)
    }

    /// Age as a fraction of [`MAX_AGE`], clamped to `0.0..=1.0`
    #[inline]
    pub fn age_fraction(&self) -> f32 {
        (self.age / MAX_AGE).clamp(0.0, 1.0)
    }

    /// Whether the position lies inside `[0, width) x [0, height)`
    #[inline]
    pub fn in_frame(&self, width: u32, height: u32) -> bool {
        self.x >= 0.0 && self.x < width as f32 && self.y >= 0.0 && self.y < height as f32
    }

    /// Advance the particle by one frame
    ///
    /// Moves the particle by its velocity first. A particle that ends up
    /// outside the frame, or that was already past [`MAX_AGE`], is marked dead
    /// and left otherwise untouched. Survivors have their velocity scaled by
    /// `decay` and their age increased by `dt` seconds.
    pub fn advance(&mut self, decay: f32, dt: f32, width: u32, height: u32) -> Fate {
        self.x += self.vx;
        self.y += self.vy;

        if !self.in_frame(width, height) {
            self.alive = false;
            return Fate::OutOfBounds;
        }
        if self.age > MAX_AGE {
            self.alive = false;
            return Fate::Expired;
        }

        self.vx *= decay;
        self.vy *= decay;
        self.age += dt;
        Fate::Survived
    }

    /// Reads one cache record
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut flag = [0u8; 4];
        reader.read_exact(&mut flag)?;

        let mut buf = [0u8; 4];
        let mut fields = [0f32; 5];
        for field in &mut fields {
            reader.read_exact(&mut buf)?;
            *field = f32::from_le_bytes(buf);
        }
        let [age, x, y, vx, vy] = fields;

        Ok(Self {
            alive: flag[0] != 0,
            age,
            x,
            y,
            vx,
            vy,
        })
    }

    /// Writes one cache record
    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&[u8::from(self.alive), 0, 0, 0])?;
        writer.write_all(&self.age.to_le_bytes())?;
        writer.write_all(&self.x.to_le_bytes())?;
        writer.write_all(&self.y.to_le_bytes())?;
        writer.write_all(&self.vx.to_le_bytes())?;
        writer.write_all(&self.vy.to_le_bytes())?;
        Ok(())
    }
}
