//! # Chunk Streaming
//!
//! Ties the lifetime of the single live chunk to the viewer's position.
//!
//! The streamer is a two-state machine. It sits in [`StreamState::Stable`] while the
//! viewer stays inside the current chunk's X/Z footprint. When the viewer's
//! floor-aligned chunk origin differs from the live chunk's origin on X or Z, it
//! enters [`StreamState::Regenerating`], tears the old chunk down (renderer handle
//! first, then the block data), generates and meshes a chunk at the new origin,
//! uploads it and returns to `Stable`. All of this happens synchronously inside
//! [`ChunkStreamer::update`], so the frame that crosses a boundary pays for the
//! rebuild.
//!
//! Vertical movement never triggers regeneration; every chunk origin uses the
//! configured vertical origin.
//!
//! The renderer is passed into every call that can touch GPU resources rather than
//! being stored, so the caller keeps ownership of it.

use cgmath::{Point3, Vector3};
use log::{debug, info};
use web_time::{Duration, Instant};

use super::chunk::Chunk;
use super::noise::NoiseField;
use super::terrain::TerrainParams;
use crate::engine_state::rendering::ChunkRenderer;

/// Chunk dimensions and terrain parameters used for every chunk the streamer builds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamSettings {
    /// Blocks along X, Y and Z
    pub chunk_size: Vector3<i32>,
    /// World Y of every chunk origin
    pub vertical_origin: i32,
    /// Heightmap parameters
    pub params: TerrainParams,
}

impl StreamSettings {
    /// The floor-aligned chunk origin containing `viewer` on X and Z.
    ///
    /// Origins are clamped to the outermost chunks whose every block still has an
    /// `i32` world coordinate, so a viewer arbitrarily far out streams the edge chunk.
    pub fn chunk_origin_for(&self, viewer: Point3<f32>) -> Point3<i32> {
        Point3::new(
            align_to_chunk(viewer.x, self.chunk_size.x),
            self.vertical_origin,
            align_to_chunk(viewer.z, self.chunk_size.z),
        )
    }
}

/// Floors `coord` to a multiple of `size` that keeps `[origin, origin + size)` in `i32`.
fn align_to_chunk(coord: f32, size: i32) -> i32 {
    let size = i64::from(size.max(1));
    let min_cell = -((-i64::from(i32::MIN)).div_euclid(size));
    let max_cell = (i64::from(i32::MAX) - size + 1).div_euclid(size);

    let cell = (f64::from(coord) / size as f64).floor();
    // NaN casts to 0
    let cell = (cell as i64).clamp(min_cell, max_cell);
    (cell * size) as i32
}

/// Streamer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// The live chunk matches the viewer's position
    Stable,
    /// A replacement chunk is being built
    Regenerating,
}

/// What an [`ChunkStreamer::update`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEvent {
    /// Nothing changed
    Unchanged,
    /// The live chunk was edited and its mesh re-uploaded
    Remeshed,
    /// The viewer crossed a chunk boundary and the chunk was replaced
    Regenerated {
        /// Origin of the destroyed chunk
        from: Point3<i32>,
        /// Origin of the new chunk
        to: Point3<i32>,
    },
}

/// Counters for rebuild work.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StreamStats {
    /// Chunks built, including the first one
    pub chunks_built: u64,
    /// Boundary crossings handled
    pub regenerations: u64,
    /// Mesh rebuilds after edits
    pub remeshes: u64,
    /// Duration of the most recent build or remesh
    pub last_rebuild: Duration,
}

/// Owns the single live chunk and replaces it as the viewer moves.
pub struct ChunkStreamer<N: NoiseField> {
    /// Chunk size and terrain parameters
    settings: StreamSettings,
    /// Heightmap source
    noise: N,
    /// Current state
    state: StreamState,
    /// The live chunk
    chunk: Chunk,
    /// Rebuild counters
    stats: StreamStats,
}

impl<N: NoiseField> ChunkStreamer<N> {
    /// Builds and uploads the chunk containing `viewer`.
    pub fn new<R: ChunkRenderer + ?Sized>(
        settings: StreamSettings,
        noise: N,
        viewer: Point3<f32>,
        renderer: &mut R,
    ) -> Self {
        let origin = settings.chunk_origin_for(viewer);
        let mut streamer = ChunkStreamer {
            settings,
            noise,
            state: StreamState::Regenerating,
            chunk: Chunk::empty(origin, settings.chunk_size),
            stats: StreamStats::default(),
        };
        streamer.build_current(renderer);
        streamer.state = StreamState::Stable;
        info!("initial chunk at {:?}", origin);
        streamer
    }

    /// Streaming settings.
    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    /// The floor-aligned chunk origin containing `viewer`.
    pub fn chunk_origin_for(&self, viewer: Point3<f32>) -> Point3<i32> {
        self.settings.chunk_origin_for(viewer)
    }

    /// Current state. Always `Stable` between calls.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Origin of the live chunk.
    pub fn origin(&self) -> Point3<i32> {
        self.chunk.origin()
    }

    /// The live chunk.
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    /// The live chunk, for edits. Edited meshes are rebuilt on the next update.
    pub fn chunk_mut(&mut self) -> &mut Chunk {
        &mut self.chunk
    }

    /// Rebuild counters.
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Reacts to the viewer's latest position.
    pub fn update<R: ChunkRenderer + ?Sized>(
        &mut self,
        viewer: Point3<f32>,
        renderer: &mut R,
    ) -> StreamEvent {
        let target = self.chunk_origin_for(viewer);
        let current = self.chunk.origin();

        if target.x != current.x || target.z != current.z {
            self.regenerate(target, renderer);
            return StreamEvent::Regenerated {
                from: current,
                to: target,
            };
        }

        if self.chunk.is_mesh_dirty() {
            self.remesh(renderer);
            return StreamEvent::Remeshed;
        }

        StreamEvent::Unchanged
    }

    /// Releases the live chunk's renderer resources and consumes the streamer.
    pub fn shutdown<R: ChunkRenderer + ?Sized>(mut self, renderer: &mut R) {
        if let Some(handle) = self.chunk.take_mesh_handle() {
            renderer.release_mesh(handle);
        }
        debug!("streamer shut down at {:?}", self.chunk.origin());
    }

    fn regenerate<R: ChunkRenderer + ?Sized>(&mut self, target: Point3<i32>, renderer: &mut R) {
        self.state = StreamState::Regenerating;

        let mut old = std::mem::replace(
            &mut self.chunk,
            Chunk::empty(target, self.settings.chunk_size),
        );
        if let Some(handle) = old.take_mesh_handle() {
            renderer.release_mesh(handle);
        }
        let from = old.origin();
        drop(old);

        self.build_current(renderer);
        self.stats.regenerations += 1;
        self.state = StreamState::Stable;

        info!(
            "chunk {:?} -> {:?} ({} faces, {:?})",
            from,
            target,
            self.chunk.mesh().face_count(),
            self.stats.last_rebuild
        );
    }

    fn remesh<R: ChunkRenderer + ?Sized>(&mut self, renderer: &mut R) {
        let start = Instant::now();
        if let Some(handle) = self.chunk.take_mesh_handle() {
            renderer.release_mesh(handle);
        }
        self.chunk.rebuild_mesh();
        self.upload_current(renderer);

        self.stats.remeshes += 1;
        self.stats.last_rebuild = start.elapsed();
        debug!(
            "remeshed chunk at {:?} in {:?}",
            self.chunk.origin(),
            self.stats.last_rebuild
        );
    }

    /// Generates terrain into the (empty) live chunk, meshes and uploads it.
    fn build_current<R: ChunkRenderer + ?Sized>(&mut self, renderer: &mut R) {
        let start = Instant::now();
        self.chunk.fill_terrain(&self.noise, &self.settings.params);
        self.upload_current(renderer);

        self.stats.chunks_built += 1;
        self.stats.last_rebuild = start.elapsed();
        debug!(
            "built chunk at {:?}: {} solid blocks, {} vertices in {:?}",
            self.chunk.origin(),
            self.chunk.grid().solid_count(),
            self.chunk.mesh().vertex_count(),
            self.stats.last_rebuild
        );
    }

    fn upload_current<R: ChunkRenderer + ?Sized>(&mut self, renderer: &mut R) {
        let handle = if self.chunk.mesh().is_empty() {
            None
        } else {
            Some(renderer.upload_mesh(self.chunk.origin(), self.chunk.mesh()))
        };
        self.chunk.attach_mesh_handle(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::rendering::HeadlessRenderer;
    use crate::engine_state::voxels::noise::{ConstantNoise, GradientNoise};

    fn settings(sx: i32, sy: i32, sz: i32) -> StreamSettings {
        StreamSettings {
            chunk_size: Vector3::new(sx, sy, sz),
            vertical_origin: 0,
            params: TerrainParams {
                noise_scale: 0.1,
                max_height_offset: 8,
            },
        }
    }

    #[test]
    fn origins_are_floor_aligned() {
        let s = settings(16, 16, 8);
        assert_eq!(s.chunk_origin_for(Point3::new(0.0, 0.0, 0.0)), Point3::new(0, 0, 0));
        assert_eq!(s.chunk_origin_for(Point3::new(15.9, 90.0, 7.9)), Point3::new(0, 0, 0));
        assert_eq!(s.chunk_origin_for(Point3::new(16.0, 0.0, 8.0)), Point3::new(16, 0, 8));
        assert_eq!(s.chunk_origin_for(Point3::new(-0.1, 0.0, -8.5)), Point3::new(-16, 0, -16));
    }

    #[test]
    fn far_viewers_clamp_to_edge_chunks() {
        let s = settings(16, 16, 16);

        let far = s.chunk_origin_for(Point3::new(1.0e10, 0.0, -1.0e10));
        assert_eq!(far.x % 16, 0);
        assert_eq!(far.z % 16, 0);
        assert_eq!(i64::from(far.x) + 15, i64::from(i32::MAX));
        assert_eq!(far.z, i32::MIN);

        let huge = s.chunk_origin_for(Point3::new(f32::MAX, 0.0, f32::MIN));
        assert_eq!(huge, far);
        let inf = s.chunk_origin_for(Point3::new(f32::INFINITY, 0.0, f32::NEG_INFINITY));
        assert_eq!(inf, far);
        assert_eq!(s.chunk_origin_for(Point3::new(f32::NAN, 0.0, 0.0)).x, 0);
    }

    #[test]
    fn odd_sizes_clamp_inside_i32() {
        let s = settings(48, 16, 7);
        let far = s.chunk_origin_for(Point3::new(-1.0e12, 0.0, 1.0e12));
        assert_eq!(far.x % 48, 0);
        assert!(i64::from(far.x) >= i64::from(i32::MIN));
        assert_eq!(far.z % 7, 0);
        assert!(i64::from(far.z) + 6 <= i64::from(i32::MAX));
    }

    #[test]
    fn streaming_to_a_far_viewer_does_not_overflow() {
        let mut renderer = HeadlessRenderer::new();
        let mut streamer = ChunkStreamer::new(
            settings(4, 4, 4),
            GradientNoise,
            Point3::new(0.0, 0.0, 0.0),
            &mut renderer,
        );

        let event = streamer.update(Point3::new(1.0e10, 0.0, -1.0e10), &mut renderer);
        assert!(matches!(event, StreamEvent::Regenerated { .. }));
        assert_eq!(streamer.origin(), Point3::new(i32::MAX - 3, 0, i32::MIN));
        assert!(streamer
            .chunk()
            .mesh()
            .vertices()
            .iter()
            .all(|v| v.position.iter().all(|c| c.is_finite())));

        let again = streamer.update(Point3::new(2.0e10, 0.0, -3.0e10), &mut renderer);
        assert_eq!(again, StreamEvent::Unchanged);
    }

    #[test]
    fn vertical_origin_is_fixed() {
        let mut s = settings(16, 16, 16);
        s.vertical_origin = -32;
        assert_eq!(s.chunk_origin_for(Point3::new(1.0, 500.0, 1.0)).y, -32);
    }

    #[test]
    fn new_streamer_uploads_one_chunk() {
        let mut renderer = HeadlessRenderer::new();
        let streamer = ChunkStreamer::new(
            settings(16, 16, 16),
            GradientNoise,
            Point3::new(20.0, 0.0, -3.0),
            &mut renderer,
        );
        assert_eq!(streamer.origin(), Point3::new(16, 0, -16));
        assert_eq!(streamer.state(), StreamState::Stable);
        assert_eq!(renderer.live_meshes(), 1);
        assert_eq!(streamer.stats().chunks_built, 1);
    }

    #[test]
    fn moving_within_a_chunk_changes_nothing() {
        let mut renderer = HeadlessRenderer::new();
        let mut streamer = ChunkStreamer::new(
            settings(16, 16, 16),
            GradientNoise,
            Point3::new(1.0, 0.0, 1.0),
            &mut renderer,
        );
        for step in 0..15 {
            let viewer = Point3::new(1.0 + step as f32, 0.0, 14.0);
            assert_eq!(streamer.update(viewer, &mut renderer), StreamEvent::Unchanged);
        }
        assert_eq!(renderer.uploads(), 1);
    }

    #[test]
    fn vertical_movement_never_regenerates() {
        let mut renderer = HeadlessRenderer::new();
        let mut streamer = ChunkStreamer::new(
            settings(16, 16, 16),
            GradientNoise,
            Point3::new(1.0, 0.0, 1.0),
            &mut renderer,
        );
        let event = streamer.update(Point3::new(1.0, 300.0, 1.0), &mut renderer);
        assert_eq!(event, StreamEvent::Unchanged);
        let event = streamer.update(Point3::new(1.0, -300.0, 1.0), &mut renderer);
        assert_eq!(event, StreamEvent::Unchanged);
    }

    #[test]
    fn crossing_a_boundary_swaps_the_chunk() {
        let mut renderer = HeadlessRenderer::new();
        let mut streamer = ChunkStreamer::new(
            settings(16, 16, 16),
            GradientNoise,
            Point3::new(1.0, 0.0, 1.0),
            &mut renderer,
        );
        let first = streamer.chunk().mesh_handle();

        let event = streamer.update(Point3::new(-0.5, 0.0, 1.0), &mut renderer);
        assert_eq!(
            event,
            StreamEvent::Regenerated {
                from: Point3::new(0, 0, 0),
                to: Point3::new(-16, 0, 0),
            }
        );
        assert_eq!(streamer.origin(), Point3::new(-16, 0, 0));
        assert_eq!(streamer.state(), StreamState::Stable);
        assert_eq!(renderer.live_meshes(), 1);
        assert_eq!(renderer.record(first.unwrap()), None);
        assert_eq!(streamer.stats().regenerations, 1);
    }

    #[test]
    fn all_air_chunk_uploads_nothing() {
        let mut s = settings(4, 4, 4);
        s.vertical_origin = 64;
        let mut renderer = HeadlessRenderer::new();
        let mut streamer = ChunkStreamer::new(
            s,
            ConstantNoise::new(0.0),
            Point3::new(0.0, 0.0, 0.0),
            &mut renderer,
        );
        assert!(streamer.chunk().mesh().is_empty());
        assert_eq!(streamer.chunk().mesh_handle(), None);
        assert_eq!(renderer.live_meshes(), 0);

        streamer.update(Point3::new(9.0, 0.0, 0.0), &mut renderer);
        assert_eq!(renderer.uploads(), 0);
    }

    #[test]
    fn edits_are_remeshed_on_next_update() {
        let mut renderer = HeadlessRenderer::new();
        let mut streamer = ChunkStreamer::new(
            settings(4, 4, 4),
            ConstantNoise::new(-1.0),
            Point3::new(0.0, 0.0, 0.0),
            &mut renderer,
        );
        let before = streamer.chunk().mesh().vertex_count();

        streamer
            .chunk_mut()
            .set_block(1, 2, 1, crate::engine_state::voxels::block::Block::AIR)
            .unwrap();
        assert_eq!(
            streamer.update(Point3::new(0.5, 0.0, 0.5), &mut renderer),
            StreamEvent::Remeshed
        );
        assert!(!streamer.chunk().is_mesh_dirty());
        assert_ne!(streamer.chunk().mesh().vertex_count(), before);
        assert_eq!(renderer.live_meshes(), 1);
        assert_eq!(streamer.stats().remeshes, 1);

        assert_eq!(
            streamer.update(Point3::new(0.5, 0.0, 0.5), &mut renderer),
            StreamEvent::Unchanged
        );
    }

    #[test]
    fn shutdown_releases_the_live_mesh() {
        let mut renderer = HeadlessRenderer::new();
        let streamer = ChunkStreamer::new(
            settings(8, 8, 8),
            GradientNoise,
            Point3::new(0.0, 0.0, 0.0),
            &mut renderer,
        );
        streamer.shutdown(&mut renderer);
        assert_eq!(renderer.live_meshes(), 0);
    }
}
