//! # Chunk Module
//!
//! This module provides the `Chunk` composite: one [`VoxelGrid`] of block data plus
//! the [`Mesh`] derived from it. The mesh is never edited directly; it is rebuilt
//! from the grid whenever the grid changes.
//!
//! ## Lifecycle
//!
//! 1. Created empty (every cell air)
//! 2. Populated by the terrain generator
//! 3. Meshed by the mesh assembler
//! 4. Uploaded to the renderer, which hands back a [`MeshHandle`]
//! 5. Destroyed when the streamer moves to a new origin; the handle is released
//!    to the renderer first

use cgmath::{Point3, Vector3};

use super::block::Block;
use super::noise::NoiseField;
use super::terrain::{self, TerrainParams};
use crate::engine_state::rendering::{meshing::Mesh, MeshHandle};
use crate::error::TerrainError;

pub mod chunk_iteration;
pub mod voxel_grid;

pub use voxel_grid::VoxelGrid;

/// A fixed-size region of the voxel world and its renderable surface.
#[derive(Debug)]
pub struct Chunk {
    /// Block data
    grid: VoxelGrid,
    /// Surface mesh derived from `grid`
    mesh: Mesh,
    /// Set when `grid` changed after `mesh` was assembled
    mesh_dirty: bool,
    /// Renderer-side resources holding `mesh`, if uploaded
    mesh_handle: Option<MeshHandle>,
}

impl Chunk {
    /// Creates a chunk where every block is air.
    pub fn empty(origin: Point3<i32>, size: Vector3<i32>) -> Self {
        Chunk {
            grid: VoxelGrid::new(origin, size),
            mesh: Mesh::default(),
            mesh_dirty: false,
            mesh_handle: None,
        }
    }

    /// Generates terrain for a chunk and assembles its mesh.
    ///
    /// Deterministic: the same origin, size, noise and parameters always produce an
    /// identical grid and a byte-identical mesh.
    pub fn generate<N: NoiseField + ?Sized>(
        origin: Point3<i32>,
        size: Vector3<i32>,
        noise: &N,
        params: &TerrainParams,
    ) -> Self {
        let mut chunk = Chunk::empty(origin, size);
        chunk.fill_terrain(noise, params);
        chunk
    }

    /// Regenerates the terrain in place and reassembles the mesh.
    pub fn fill_terrain<N: NoiseField + ?Sized>(&mut self, noise: &N, params: &TerrainParams) {
        terrain::generate(&mut self.grid, noise, params);
        self.rebuild_mesh();
    }

    /// World position of the chunk's first block.
    pub fn origin(&self) -> Point3<i32> {
        self.grid.origin()
    }

    /// The chunk's block data.
    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// The chunk's surface mesh. May be stale while [`Chunk::is_mesh_dirty`] is true.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Whether the grid changed since the mesh was last assembled.
    pub fn is_mesh_dirty(&self) -> bool {
        self.mesh_dirty
    }

    /// Edits one block and invalidates the mesh.
    ///
    /// # Errors
    /// [`TerrainError::OutOfBounds`] if the coordinate lies outside the chunk.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: Block) -> Result<(), TerrainError> {
        self.grid.set(x, y, z, block)?;
        self.mesh_dirty = true;
        Ok(())
    }

    /// Reassembles the mesh from the current grid.
    pub fn rebuild_mesh(&mut self) {
        self.mesh = Mesh::assemble(&self.grid);
        self.mesh_dirty = false;
    }

    /// The renderer handle for the uploaded mesh, if any.
    pub fn mesh_handle(&self) -> Option<MeshHandle> {
        self.mesh_handle
    }

    /// Records the handle the renderer returned for this chunk's mesh.
    pub fn attach_mesh_handle(&mut self, handle: Option<MeshHandle>) {
        self.mesh_handle = handle;
    }

    /// Detaches the renderer handle so the caller can release it.
    pub fn take_mesh_handle(&mut self) -> Option<MeshHandle> {
        self.mesh_handle.take()
    }
}
