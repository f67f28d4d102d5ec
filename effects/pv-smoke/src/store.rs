//! Particle cache reading and writing
//!
//! A particle cache is the only state shared between two simulation calls, or
//! between a simulation call and a render call. It is a flat binary file:
//!
//! ```text
//! i32 count (little-endian)
//! count x 24-byte particle record
//! ```
//!
//! There is no magic, version tag or checksum. See [`Particle::RECORD_SIZE`]
//! for the record layout.
//!
//! [`load`] and [`save`] never fail: problems are logged as warnings and the
//! caller continues with an empty population or a discarded output. Use
//! [`try_load`] and [`try_save`] to get the error instead.

use log::{debug, warn};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Result, SmokeError};
use crate::particle::Particle;

/// Load the live particles of a cache file
///
/// Returns an empty population when the path is empty or cannot be read. A
/// cache that ends early yields the records that could be read. Both cases
/// are reported with a warning.
pub fn load(path: impl AsRef<Path>) -> Vec<Particle> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        warn!("Cannot read particle cache: empty path");
        return Vec::new();
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("Cannot read particle cache {}: {e}", path.display());
            return Vec::new();
        }
    };

    let mut particles = Vec::new();
    if let Err(e) = read_into(&mut BufReader::new(file), &mut particles) {
        warn!("Particle cache {}: {e}", path.display());
    }
    debug!(
        "Loaded {} particles from {}",
        particles.len(),
        path.display()
    );
    particles
}

/// Write a population to a cache file
///
/// Every particle is written in order, whatever its liveness. An unwritable
/// destination is reported with a warning.
pub fn save(path: impl AsRef<Path>, particles: &[Particle]) {
    let path = path.as_ref();
    match try_save(path, particles) {
        Ok(()) => debug!("Saved {} particles to {}", particles.len(), path.display()),
        Err(e) => warn!("Cannot write particle cache {}: {e}", path.display()),
    }
}

/// Load the live particles of a cache file, reporting any failure
pub fn try_load(path: impl AsRef<Path>) -> Result<Vec<Particle>> {
    let file = File::open(path)?;
    read_particles(&mut BufReader::new(file))
}

/// Write a population to a cache file, reporting any failure
pub fn try_save(path: impl AsRef<Path>, particles: &[Particle]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_particles(&mut writer, particles)?;
    writer.flush()?;
    Ok(())
}

/// Read the live particles of a cache from any reader
///
/// Records flagged dead are skipped. A cache holding fewer records than its
/// header announces is an error.
pub fn read_particles<R: Read>(reader: &mut R) -> Result<Vec<Particle>> {
    let mut particles = Vec::new();
    read_into(reader, &mut particles)?;
    Ok(particles)
}

/// Write a population to any writer
pub fn write_particles<W: Write>(writer: &mut W, particles: &[Particle]) -> Result<()> {
    let count = i32::try_from(particles.len()).map_err(|_| {
        SmokeError::InvalidParameters(format!(
            "{} particles do not fit in a cache header",
            particles.len()
        ))
    })?;

    writer.write_all(&count.to_le_bytes())?;
    for particle in particles {
        particle.write(writer)?;
    }
    Ok(())
}

/// Reads records into `particles`, leaving the ones read so far on truncation
fn read_into<R: Read>(reader: &mut R, particles: &mut Vec<Particle>) -> Result<()> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    let count = i32::from_le_bytes(buf);
    if count < 0 {
        warn!("Particle cache announces {count} records, treating as empty");
        return Ok(());
    }

    let expected = count as usize;
    for index in 0..expected {
        match Particle::read(reader) {
            Ok(particle) if particle.alive => particles.push(particle),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(SmokeError::TruncatedStore {
                    expected,
                    found: index,
                });
            }
            Err(e) => return Err(SmokeError::Io(e)),
        }
    }
    Ok(())
}

/// Aggregate statistics over a particle population
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct StoreSummary {
    /// Number of particles
    pub count: usize,
    /// Youngest and oldest age in seconds
    pub age_range: Option<(f32, f32)>,
    /// Mean age in seconds
    pub mean_age: f32,
    /// Mean speed in pixels per frame
    pub mean_speed: f32,
    /// Bounding box of positions as `[min_x, min_y, max_x, max_y]`
    pub bounds: Option<[f32; 4]>,
}

impl StoreSummary {
    /// Summarize a population
    pub fn from_particles(particles: &[Particle]) -> Self {
        let Some(first) = particles.first() else {
            return Self {
                count: 0,
                age_range: None,
                mean_age: 0.0,
                mean_speed: 0.0,
                bounds: None,
            };
        };

        let mut age_range = (first.age, first.age);
        let mut bounds = [first.x, first.y, first.x, first.y];
        let mut total_age = 0.0f64;
        let mut total_speed = 0.0f64;

        for p in particles {
            age_range.0 = age_range.0.min(p.age);
            age_range.1 = age_range.1.max(p.age);
            bounds[0] = bounds[0].min(p.x);
            bounds[1] = bounds[1].min(p.y);
            bounds[2] = bounds[2].max(p.x);
            bounds[3] = bounds[3].max(p.y);
            total_age += f64::from(p.age);
            total_speed += f64::from(p.speed());
        }

        let n = particles.len() as f64;
        Self {
            count: particles.len(),
            age_range: Some(age_range),
            mean_age: (total_age / n) as f32,
            mean_speed: (total_speed / n) as f32,
            bounds: Some(bounds),
        }
    }
}

impl fmt::Display for StoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.age_range, self.bounds) {
            (Some((min_age, max_age)), Some([x0, y0, x1, y1])) => write!(
                f,
                "{} particles, age {:.2}s..{:.2}s, within ({:.1}, {:.1})..({:.1}, {:.1})",
                self.count, min_age, max_age, x0, y0, x1, y1
            ),
            _ => write!(f, "{} particles", self.count),
        }
    }
}
