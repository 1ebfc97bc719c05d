//! # Error Types
//!
//! Every fallible operation in the crate reports a [`TerrainError`]. The chunk and
//! renderer boundary itself never fails: out-of-range lookups resolve to air and an
//! empty mesh simply renders nothing, so these variants only surface from editing,
//! raw block decoding, configuration loading and GPU acquisition.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the voxel terrain engine.
#[derive(Error, Debug)]
pub enum TerrainError {
    /// A write addressed a cell outside the grid bounds.
    #[error("block coordinate ({x}, {y}, {z}) is outside the chunk bounds")]
    OutOfBounds {
        /// Local X coordinate
        x: i32,
        /// Local Y coordinate
        y: i32,
        /// Local Z coordinate
        z: i32,
    },

    /// A raw block array did not match the grid volume.
    #[error("raw block array holds {actual} cells, expected {expected}")]
    RawLength {
        /// Cell count implied by the grid size
        expected: usize,
        /// Cell count actually supplied
        actual: usize,
    },

    /// A raw block array contained an id with no matching block type.
    #[error("unknown block type id {0}")]
    UnknownBlockType(u8),

    /// The configuration parsed but holds values the engine cannot use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    ConfigIo {
        /// Path that was being read
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::config::EngineConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// No GPU adapter or device could be acquired.
    #[error("gpu unavailable: {0}")]
    Gpu(String),
}
