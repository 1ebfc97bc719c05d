use cgmath::{Point3, Vector3};
use voxel_terrain::engine_state::rendering::{ChunkRenderer, HeadlessRenderer, Mesh, MeshHandle};
use voxel_terrain::engine_state::voxels::{
    block::{block_side::BlockSide, Block},
    chunk::{Chunk, VoxelGrid},
    noise::{ConstantNoise, GradientNoise, NoiseField},
    streaming::{ChunkStreamer, StreamEvent, StreamSettings, StreamState},
    terrain::{self, TerrainParams},
};

/// Renderer call, as seen by the recording renderer
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Upload { origin: Point3<i32>, handle: MeshHandle },
    Release(MeshHandle),
}

/// Records every call and panics on a release of a handle it does not hold.
#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<Call>,
    live: Vec<MeshHandle>,
    next: u64,
}

impl ChunkRenderer for RecordingRenderer {
    fn upload_mesh(&mut self, origin: Point3<i32>, mesh: &Mesh) -> MeshHandle {
        assert!(!mesh.is_empty(), "empty meshes must not be uploaded");
        assert!(self.live.is_empty(), "a second chunk went live before the first was released");
        let handle = MeshHandle(self.next);
        self.next += 1;
        self.live.push(handle);
        self.calls.push(Call::Upload { origin, handle });
        handle
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        let position = self
            .live
            .iter()
            .position(|&h| h == handle)
            .expect("released a handle that is not live");
        self.live.remove(position);
        self.calls.push(Call::Release(handle));
    }

    fn live_meshes(&self) -> usize {
        self.live.len()
    }
}

fn settings(size: i32) -> StreamSettings {
    StreamSettings {
        chunk_size: Vector3::new(size, size, size),
        vertical_origin: 0,
        params: TerrainParams {
            noise_scale: 0.1,
            max_height_offset: 8,
        },
    }
}

fn flat_fixture() -> VoxelGrid {
    let mut grid = VoxelGrid::new(Point3::new(0, 0, 0), Vector3::new(4, 4, 4));
    let params = TerrainParams {
        noise_scale: 0.1,
        max_height_offset: 0,
    };
    terrain::generate(&mut grid, &ConstantNoise::new(-1.0), &params);
    grid
}

#[test]
fn test_old_chunk_released_before_new_upload() {
    let mut renderer = RecordingRenderer::default();
    let mut streamer = ChunkStreamer::new(
        settings(16),
        GradientNoise,
        Point3::new(8.0, 20.0, 8.0),
        &mut renderer,
    );

    let event = streamer.update(Point3::new(17.0, 20.0, 8.0), &mut renderer);
    assert_eq!(
        event,
        StreamEvent::Regenerated {
            from: Point3::new(0, 0, 0),
            to: Point3::new(16, 0, 0),
        }
    );

    assert_eq!(
        renderer.calls,
        vec![
            Call::Upload {
                origin: Point3::new(0, 0, 0),
                handle: MeshHandle(0)
            },
            Call::Release(MeshHandle(0)),
            Call::Upload {
                origin: Point3::new(16, 0, 0),
                handle: MeshHandle(1)
            },
        ]
    );
}

#[test]
fn test_streaming_invariant_along_a_path() {
    let mut renderer = RecordingRenderer::default();
    let s = settings(8);
    let mut streamer = ChunkStreamer::new(s, GradientNoise, Point3::new(0.5, 0.0, 0.5), &mut renderer);

    let path = [
        (3.0, 3.0),
        (9.0, 3.0),
        (9.0, -0.5),
        (-7.9, -0.5),
        (-8.1, -16.0),
        (-8.1, -16.0),
        (40.0, 40.0),
        (0.0, 0.0),
    ];

    for (x, z) in path {
        let viewer = Point3::new(x, 5.0, z);
        let before = streamer.origin();
        let event = streamer.update(viewer, &mut renderer);
        let expected = s.chunk_origin_for(viewer);

        assert_eq!(streamer.origin(), expected);
        assert_eq!(streamer.state(), StreamState::Stable);
        assert_eq!(renderer.live_meshes(), 1);
        if before == expected {
            assert_eq!(event, StreamEvent::Unchanged);
        } else {
            assert_eq!(event, StreamEvent::Regenerated { from: before, to: expected });
        }
    }

    assert_eq!(streamer.stats().regenerations, 6);
    streamer.shutdown(&mut renderer);
    assert_eq!(renderer.live_meshes(), 0);
}

#[test]
fn test_streamer_works_through_trait_objects() {
    let mut renderer: Box<dyn ChunkRenderer> = Box::new(HeadlessRenderer::new());
    let noise: Box<dyn NoiseField> = Box::new(GradientNoise);
    let mut streamer = ChunkStreamer::new(settings(16), noise, Point3::new(0.0, 0.0, 0.0), renderer.as_mut());

    streamer.update(Point3::new(-1.0, 0.0, 0.0), renderer.as_mut());
    assert_eq!(streamer.origin(), Point3::new(-16, 0, 0));
    assert_eq!(renderer.live_meshes(), 1);
}

#[test]
fn test_idempotent_rebuild() {
    let params = settings(16).params;
    let origin = Point3::new(-48, 0, 112);
    let size = Vector3::new(16, 16, 16);

    let a = Chunk::generate(origin, size, &GradientNoise, &params);
    let b = Chunk::generate(origin, size, &GradientNoise, &params);

    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.mesh().as_bytes(), b.mesh().as_bytes());
    assert!(!a.mesh().is_empty());
}

#[test]
fn test_regenerated_chunk_matches_fresh_generation() {
    let mut renderer = HeadlessRenderer::new();
    let s = settings(16);
    let mut streamer = ChunkStreamer::new(s, GradientNoise, Point3::new(0.0, 0.0, 0.0), &mut renderer);
    streamer.update(Point3::new(40.0, 0.0, -20.0), &mut renderer);

    let fresh = Chunk::generate(Point3::new(32, 0, -32), s.chunk_size, &GradientNoise, &s.params);
    assert_eq!(streamer.chunk().grid(), fresh.grid());
    assert_eq!(streamer.chunk().mesh(), fresh.mesh());
}

#[test]
fn test_flat_fixture_layers() {
    let grid = flat_fixture();
    for x in 0..4 {
        for z in 0..4 {
            for y in 0..3 {
                assert!(grid.is_solid(x, y, z));
            }
            assert!(!grid.is_solid(x, 3, z));
        }
    }
}

#[test]
fn test_flat_fixture_mesh_totals() {
    let mesh = Mesh::assemble(&flat_fixture());

    // 16 top + 16 bottom + 4 walls of 4x3 faces
    assert_eq!(mesh.face_count(), 80);
    assert_eq!(mesh.vertex_count(), 480);
    assert_eq!(mesh.as_floats().len(), 480 * 8);

    for face in mesh.vertices().chunks_exact(6) {
        let normal = face[0].normal;
        let y_values: Vec<f32> = face.iter().map(|v| v.position[1]).collect();
        if normal == BlockSide::TOP.normal() {
            assert!(y_values.iter().all(|&y| y == 3.0));
        } else if normal == BlockSide::BOTTOM.normal() {
            assert!(y_values.iter().all(|&y| y == 0.0));
        } else {
            // side faces only on the outer walls
            let on_wall = face.iter().all(|v| {
                v.position[0] == 0.0 || v.position[0] == 4.0 || v.position[2] == 0.0 || v.position[2] == 4.0
            });
            assert!(on_wall, "interior side face {:?}", face);
        }
    }
}

#[test]
fn test_edit_then_stream_remeshes_once() {
    let mut renderer = RecordingRenderer::default();
    let mut streamer = ChunkStreamer::new(
        settings(8),
        ConstantNoise::new(0.0),
        Point3::new(1.0, 0.0, 1.0),
        &mut renderer,
    );

    streamer.chunk_mut().set_block(0, 0, 0, Block::AIR).unwrap();
    assert!(streamer.chunk().is_mesh_dirty());
    assert_eq!(
        streamer.update(Point3::new(1.0, 0.0, 1.0), &mut renderer),
        StreamEvent::Remeshed
    );
    assert_eq!(renderer.calls.len(), 3);
    assert_eq!(renderer.calls[1], Call::Release(MeshHandle(0)));
    assert_eq!(
        streamer.update(Point3::new(1.0, 0.0, 1.0), &mut renderer),
        StreamEvent::Unchanged
    );
}
