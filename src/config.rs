//! # Engine Configuration
//!
//! Construction-time parameters for the terrain engine, loaded from a JSON file.
//! Every field has a default, so a partial file (or no file at all) yields a
//! working engine. A live chunk is never reconfigured: changing any of these values
//! means building a new [`ChunkStreamer`](crate::engine_state::voxels::streaming::ChunkStreamer).
//!
//! ## Example
//!
//! ```json
//! {
//!     "chunk_size": [32, 32, 32],
//!     "noise_scale": 0.05,
//!     "max_height_offset": 12,
//!     "noise": { "kind": "perlin", "seed": 7 },
//!     "demo": { "frames": 600, "use_gpu": false }
//! }
//! ```

use std::path::Path;

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::{
    noise::{ConstantNoise, GradientNoise, NoiseField, PerlinNoise},
    streaming::StreamSettings,
    terrain::TerrainParams,
};
use crate::error::TerrainError;

/// Which noise field drives the terrain heightmap.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseKind {
    /// Built-in hash gradient noise (no seed, identical everywhere).
    #[default]
    Gradient,
    /// Perlin noise from the `noise` crate.
    Perlin {
        /// Seed handed to `noise::Perlin`
        seed: u32,
    },
    /// Every column samples the same value.
    Flat {
        /// The constant sample, nominally in [-1, 1]
        value: f64,
    },
}

impl NoiseKind {
    /// Builds the configured noise field.
    pub fn build(&self) -> Box<dyn NoiseField> {
        match self {
            NoiseKind::Gradient => Box::new(GradientNoise),
            NoiseKind::Perlin { seed } => Box::new(PerlinNoise::new(*seed)),
            NoiseKind::Flat { value } => Box::new(ConstantNoise::new(*value)),
        }
    }
}

/// Settings for the headless fly-through driven by [`crate::run`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of frames to simulate
    pub frames: u32,
    /// Viewer speed in blocks per second
    pub speed: f32,
    /// Seed for the viewer's wandering path
    pub seed: u64,
    /// Try to upload meshes to a real GPU device
    pub use_gpu: bool,
    /// Simulated frame duration in milliseconds
    pub frame_time_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            frames: 1200,
            speed: 6.0,
            seed: 0x5EED,
            use_gpu: true,
            frame_time_ms: 16,
        }
    }
}

/// Top level engine configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunk dimensions in blocks along X, Y and Z
    pub chunk_size: [u32; 3],
    /// Multiplier applied to world coordinates before sampling noise
    pub noise_scale: f64,
    /// Height range added on top of the baseline ground level
    pub max_height_offset: i32,
    /// World Y of every chunk origin (there is no vertical streaming)
    pub vertical_origin: i32,
    /// Noise field selection
    pub noise: NoiseKind,
    /// Demo driver settings
    pub demo: DemoConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            chunk_size: [16, 16, 16],
            noise_scale: 0.1,
            max_height_offset: 8,
            vertical_origin: 0,
            noise: NoiseKind::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Reads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TerrainError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, TerrainError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the generator cannot work with.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.chunk_size.iter().any(|&d| d == 0) {
            return Err(TerrainError::InvalidConfig(format!(
                "chunk_size must be non-zero on every axis, got {:?}",
                self.chunk_size
            )));
        }
        if self.chunk_size.iter().any(|&d| d > i32::MAX as u32) {
            return Err(TerrainError::InvalidConfig(format!(
                "chunk_size {:?} does not fit block coordinates",
                self.chunk_size
            )));
        }
        let volume = self
            .chunk_size
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d as usize));
        if volume.is_none() {
            return Err(TerrainError::InvalidConfig(format!(
                "chunk_size {:?} overflows the block array",
                self.chunk_size
            )));
        }
        if !self.noise_scale.is_finite() {
            return Err(TerrainError::InvalidConfig(format!(
                "noise_scale must be finite, got {}",
                self.noise_scale
            )));
        }
        if self.max_height_offset < 0 {
            return Err(TerrainError::InvalidConfig(format!(
                "max_height_offset must be >= 0, got {}",
                self.max_height_offset
            )));
        }
        if !self.demo.speed.is_finite() || self.demo.speed < 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "demo speed must be finite and >= 0, got {}",
                self.demo.speed
            )));
        }
        if let NoiseKind::Flat { value } = self.noise {
            if !value.is_finite() {
                return Err(TerrainError::InvalidConfig(format!(
                    "flat noise value must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Streaming settings derived from this configuration.
    pub fn stream_settings(&self) -> StreamSettings {
        StreamSettings {
            chunk_size: Vector3::new(
                self.chunk_size[0] as i32,
                self.chunk_size[1] as i32,
                self.chunk_size[2] as i32,
            ),
            vertical_origin: self.vertical_origin,
            params: TerrainParams {
                noise_scale: self.noise_scale,
                max_height_offset: self.max_height_offset,
            },
        }
    }
}
