//! # Engine State Module
//!
//! Ties the viewer, the chunk streamer and the renderer together into a per-frame
//! update.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the viewer, the streamer and the renderer
//! * `camera_state` - The viewer the streamer follows
//! * `rendering` - Vertex format, meshing and renderer implementations
//! * `voxels` - Blocks, chunks, noise, terrain generation and streaming
//!
//! ## Frame Order
//!
//! 1. Advance the viewer
//! 2. Hand its position to the streamer, which regenerates or remeshes the live
//!    chunk and talks to the renderer as needed

use cgmath::Point3;
use log::debug;
use web_time::Duration;

use camera_state::Viewer;
use rendering::ChunkRenderer;
use voxels::{
    noise::NoiseField,
    streaming::{ChunkStreamer, StreamEvent},
};

use crate::config::EngineConfig;
use crate::error::TerrainError;

pub mod camera_state;
pub mod rendering;
pub mod voxels;

/// The main state container for the voxel terrain engine.
pub struct EngineState {
    /// The viewer the live chunk follows
    viewer: Viewer,
    /// Owner of the live chunk
    streamer: ChunkStreamer<Box<dyn NoiseField>>,
    /// Receives mesh uploads and releases
    renderer: Box<dyn ChunkRenderer>,
    /// Viewer speed in blocks per second
    speed: f32,
    /// Frames run so far
    frames: u64,
}

impl EngineState {
    /// Creates the engine and builds the first chunk under the viewer.
    ///
    /// The viewer starts above the world origin, one chunk height over the
    /// vertical origin.
    ///
    /// # Arguments
    /// * `config` - Validated before anything is built
    /// * `renderer` - Renderer the streamer uploads into
    ///
    /// # Returns
    /// The engine, or [`TerrainError::InvalidConfig`] for an unusable configuration
    pub fn new(
        config: &EngineConfig,
        mut renderer: Box<dyn ChunkRenderer>,
    ) -> Result<Self, TerrainError> {
        config.validate()?;
        let settings = config.stream_settings();

        let start = Point3::new(
            0.0,
            (settings.vertical_origin + settings.chunk_size.y) as f32,
            0.0,
        );
        let viewer = Viewer::new(start, config.demo.seed);
        let streamer =
            ChunkStreamer::new(settings, config.noise.build(), start, renderer.as_mut());

        Ok(EngineState {
            viewer,
            streamer,
            renderer,
            speed: config.demo.speed,
            frames: 0,
        })
    }

    /// Runs one frame.
    ///
    /// # Arguments
    /// * `dt` - Time elapsed since the last frame
    ///
    /// # Returns
    /// What the streamer did this frame
    pub fn frame(&mut self, dt: Duration) -> StreamEvent {
        let position = self.viewer.advance(dt, self.speed);
        let event = self.streamer.update(position, self.renderer.as_mut());
        self.frames += 1;

        if event != StreamEvent::Unchanged {
            debug!("frame {}: {:?} at viewer {:?}", self.frames, event, position);
        }
        event
    }

    /// The viewer.
    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// The viewer, for repositioning.
    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    /// The streamer.
    pub fn streamer(&self) -> &ChunkStreamer<Box<dyn NoiseField>> {
        &self.streamer
    }

    /// The streamer, for editing the live chunk.
    pub fn streamer_mut(&mut self) -> &mut ChunkStreamer<Box<dyn NoiseField>> {
        &mut self.streamer
    }

    /// The renderer.
    pub fn renderer(&self) -> &dyn ChunkRenderer {
        self.renderer.as_ref()
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Releases the live chunk's renderer resources and returns the renderer.
    pub fn shutdown(self) -> Box<dyn ChunkRenderer> {
        let EngineState {
            streamer,
            mut renderer,
            ..
        } = self;
        streamer.shutdown(renderer.as_mut());
        renderer
    }
}
