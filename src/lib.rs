#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! Procedural voxel terrain around a moving viewer: a deterministic 2D noise field
//! drives a heightmap that fills a fixed-size chunk of blocks, the chunk's exposed
//! faces are turned into a triangle mesh, and a streaming controller replaces the
//! chunk whenever the viewer crosses into a neighbouring one.
//!
//! ## Key Modules
//!
//! * `config` - JSON engine configuration with defaults
//! * `engine_state` - Viewer, voxels, meshing, streaming and renderers
//! * `error` - The crate's error type
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use voxel_terrain::config::EngineConfig;
//! use voxel_terrain::engine_state::{rendering::HeadlessRenderer, EngineState};
//!
//! let config = EngineConfig::default();
//! let mut engine = EngineState::new(&config, Box::new(HeadlessRenderer::new())).unwrap();
//! for _ in 0..60 {
//!     engine.frame(Duration::from_millis(16));
//! }
//! assert_eq!(engine.renderer().live_meshes(), 1);
//! ```
//!
//! The `voxel-terrain` binary runs the same loop from a configuration file given as
//! its first argument, uploading to a GPU device when one is available.

use cgmath::Point3;
use log::{error, info, warn};
use web_time::{Duration, Instant};

use config::EngineConfig;
use engine_state::{
    rendering::{gpu::GpuChunkRenderer, ChunkRenderer, HeadlessRenderer},
    voxels::streaming::StreamEvent,
    EngineState,
};
use error::TerrainError;

pub mod config;
pub mod engine_state;
pub mod error;

/// Name of the stopwatch reported when a run finishes.
pub const RUN_STOPWATCH: &str = "Terrain Run";

/// Totals for one driven run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Frames simulated
    pub frames: u64,
    /// Chunk replacements after boundary crossings
    pub regenerations: u64,
    /// Remeshes after edits
    pub remeshes: u64,
    /// Origin of the chunk live at the end of the run
    pub final_origin: Point3<i32>,
    /// Where the viewer ended up
    pub final_position: Point3<f32>,
}

/// Entry point of the `voxel-terrain` binary.
///
/// Initializes logging from `RUST_LOG`, loads the configuration named by the first
/// command line argument (or uses defaults), picks a renderer and drives the
/// configured number of frames.
pub fn run() -> Result<RunSummary, TerrainError> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("loading configuration from {path}");
            EngineConfig::load(&path)
        }
        None => {
            info!("no configuration given, using defaults");
            Ok(EngineConfig::default())
        }
    };
    let config = config.inspect_err(|e| error!("{e}"))?;

    let renderer = pick_renderer(&config);
    run_with(&config, renderer).inspect_err(|e| error!("{e}"))
}

/// Chooses the GPU renderer when requested and available, the headless one otherwise.
pub fn pick_renderer(config: &EngineConfig) -> Box<dyn ChunkRenderer> {
    if !config.demo.use_gpu {
        info!("GPU disabled by configuration, using headless renderer");
        return Box::new(HeadlessRenderer::new());
    }

    match GpuChunkRenderer::request_headless() {
        Ok(renderer) => Box::new(renderer),
        Err(e) => {
            warn!("{e}; falling back to headless renderer");
            Box::new(HeadlessRenderer::new())
        }
    }
}

/// Drives `config.demo.frames` fixed-length frames against `renderer`.
///
/// # Arguments
/// * `config` - Engine and demo configuration
/// * `renderer` - Renderer to upload meshes into
///
/// # Returns
/// A summary of the run, or the configuration error that prevented it
pub fn run_with(
    config: &EngineConfig,
    renderer: Box<dyn ChunkRenderer>,
) -> Result<RunSummary, TerrainError> {
    let stopwatch = Instant::now();
    let mut engine = EngineState::new(config, renderer)?;
    let dt = Duration::from_millis(config.demo.frame_time_ms);

    for _ in 0..config.demo.frames {
        if let StreamEvent::Regenerated { to, .. } = engine.frame(dt) {
            info!(
                "frame {}: viewer at {:?}, live chunk {:?}",
                engine.frames(),
                engine.viewer().position(),
                to
            );
        }
    }

    let stats = *engine.streamer().stats();
    let summary = RunSummary {
        frames: engine.frames(),
        regenerations: stats.regenerations,
        remeshes: stats.remeshes,
        final_origin: engine.streamer().origin(),
        final_position: engine.viewer().position(),
    };

    let renderer = engine.shutdown();
    if renderer.live_meshes() != 0 {
        warn!("{} meshes still live after shutdown", renderer.live_meshes());
    }

    info!(
        "{RUN_STOPWATCH}: {} frames, {} chunk regenerations in {:?}",
        summary.frames,
        summary.regenerations,
        stopwatch.elapsed()
    );
    Ok(summary)
}
