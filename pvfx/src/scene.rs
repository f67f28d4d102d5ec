//! Scene files driving multi-frame smoke runs
//!
//! A scene describes the video format, the smoke settings and when each note
//! is held. Scenes and standalone settings files are read as JSON when the
//! extension is `.json` and as YAML otherwise.
//!
//! ```yaml
//! width: 640
//! height: 360
//! fps: 30
//! smoke:
//!   new_per_note: 4
//!   intensity: 2.0
//! notes:
//!   - { start: 0.0, end: 1.5, x_start: 100, x_end: 130 }
//!   - { start: 0.5, end: 2.0, x_start: 300, x_end: 330 }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use pv_smoke::{MAX_AGE, SmokeSettings, SpawnInterval};

/// Default video resolution
pub const DEFAULT_RESOLUTION: (u32, u32) = (1920, 1080);

/// Default video frame rate
pub const DEFAULT_FPS: f64 = 30.0;

/// One held note
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SceneNote {
    /// Press time in seconds
    pub start: f64,
    /// Release time in seconds
    pub end: f64,
    /// Left edge of the key in pixels
    pub x_start: f64,
    /// Right edge of the key in pixels
    pub x_end: f64,
}

impl SceneNote {
    /// Whether the note is held at `time` seconds
    pub fn is_active(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// A multi-frame smoke run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Frames per second
    pub fps: f64,
    /// Number of frames to produce; derived from the notes when unset
    pub frames: Option<u32>,
    /// Background color of every frame
    pub background: [u8; 3],
    /// Smoke settings
    pub smoke: SmokeSettings,
    /// Held notes
    pub notes: Vec<SceneNote>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            width: DEFAULT_RESOLUTION.0,
            height: DEFAULT_RESOLUTION.1,
            fps: DEFAULT_FPS,
            frames: None,
            background: [0, 0, 0],
            smoke: SmokeSettings::default(),
            notes: Vec::new(),
        }
    }
}

impl Scene {
    /// Read a scene file
    pub fn load(path: &Path) -> Result<Self> {
        let scene: Self = read_config(path)?;
        scene
            .validate()
            .with_context(|| format!("Invalid scene: {}", path.display()))?;
        Ok(scene)
    }

    /// Check the frame rate and note timings
    pub fn validate(&self) -> Result<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            anyhow::bail!("Scene fps must be positive, got {}", self.fps);
        }
        for (index, note) in self.notes.iter().enumerate() {
            if !(note.start.is_finite() && note.end.is_finite()) {
                anyhow::bail!(
                    "Note {index} must start and end at finite times, got {}..{}",
                    note.start,
                    note.end
                );
            }
        }
        Ok(())
    }

    /// Number of frames to render
    ///
    /// Unless set explicitly, runs until the last note is released and its
    /// smoke has had [`MAX_AGE`] seconds to fade.
    pub fn frame_count(&self) -> u32 {
        self.frames.unwrap_or_else(|| {
            let last_release = self.notes.iter().map(|n| n.end).fold(0.0, f64::max);
            ((last_release + f64::from(MAX_AGE)) * self.fps).ceil() as u32
        })
    }

    /// Time in seconds at the start of `frame`
    pub fn frame_time(&self, frame: u32) -> f64 {
        f64::from(frame) / self.fps
    }

    /// Spawn intervals of the notes held during `frame`, in scene order
    pub fn active_notes(&self, frame: u32) -> Vec<SpawnInterval> {
        let time = self.frame_time(frame);
        self.notes
            .iter()
            .filter(|n| n.is_active(time))
            .map(|n| SpawnInterval::new(n.x_start, n.x_end))
            .collect()
    }
}

/// Read a JSON or YAML file into `T`, picked by extension
pub fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()))
    } else {
        serde_yaml_ng::from_str(&text)
            .with_context(|| format!("Failed to parse YAML: {}", path.display()))
    }
}
