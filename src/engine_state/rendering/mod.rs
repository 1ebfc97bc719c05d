//! # Rendering Module
//!
//! The renderer side of the chunk pipeline: the vertex format, mesh assembly and
//! the [`ChunkRenderer`] collaborator that owns GPU-side copies of chunk meshes.
//!
//! ## Key Components
//!
//! * `vertex` - Vertex layout shared with the shader pipeline
//! * `meshing` - Face culling and mesh assembly
//! * `gpu` - wgpu-backed renderer that keeps one vertex buffer per uploaded mesh
//! * [`HeadlessRenderer`] - Accounting-only renderer for runs without a GPU
//!
//! ## Ownership
//!
//! The chunk owns its CPU-side mesh; the renderer owns whatever it allocated for
//! the upload and identifies it with a [`MeshHandle`]. Releasing the handle is the
//! teardown hook the streamer calls before a chunk is destroyed. Neither call can
//! fail: an empty mesh is simply never uploaded.

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, warn};

pub mod gpu;
pub mod meshing;
pub mod vertex;

pub use meshing::Mesh;
pub use vertex::Vertex;

/// Identifies renderer-side resources allocated for one uploaded mesh.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// The renderer collaborator consumed by the chunk streamer.
pub trait ChunkRenderer {
    /// Takes ownership of a GPU-side copy of `mesh` for the chunk at `origin`.
    ///
    /// Only called with non-empty meshes.
    fn upload_mesh(&mut self, origin: Point3<i32>, mesh: &Mesh) -> MeshHandle;

    /// Frees everything allocated for `handle`.
    fn release_mesh(&mut self, handle: MeshHandle);

    /// Number of meshes currently held.
    fn live_meshes(&self) -> usize;
}

/// Bookkeeping for one mesh held by the [`HeadlessRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRecord {
    /// Chunk origin the mesh was uploaded for
    pub origin: Point3<i32>,
    /// Vertices that would be drawn
    pub vertex_count: u32,
    /// Bytes that would occupy the vertex buffer
    pub byte_size: u64,
}

/// A renderer that tracks uploads without touching a GPU.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    /// Meshes currently held
    meshes: HashMap<MeshHandle, MeshRecord>,
    /// Next handle id
    next_handle: u64,
    /// Total uploads since creation
    uploads: u64,
}

impl HeadlessRenderer {
    /// Creates an empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record of a live mesh.
    pub fn record(&self, handle: MeshHandle) -> Option<&MeshRecord> {
        self.meshes.get(&handle)
    }

    /// Bytes held across all live meshes.
    pub fn total_bytes(&self) -> u64 {
        self.meshes.values().map(|m| m.byte_size).sum()
    }

    /// Uploads performed since creation.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}

impl ChunkRenderer for HeadlessRenderer {
    fn upload_mesh(&mut self, origin: Point3<i32>, mesh: &Mesh) -> MeshHandle {
        let handle = MeshHandle(self.next_handle);
        self.next_handle += 1;
        self.uploads += 1;

        let record = MeshRecord {
            origin,
            vertex_count: mesh.vertex_count() as u32,
            byte_size: mesh.as_bytes().len() as u64,
        };
        debug!("headless upload {:?}: {:?}", handle, record);
        self.meshes.insert(handle, record);
        handle
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        if self.meshes.remove(&handle).is_none() {
            warn!("release of unknown mesh handle {:?}", handle);
        }
    }

    fn live_meshes(&self) -> usize {
        self.meshes.len()
    }
}
