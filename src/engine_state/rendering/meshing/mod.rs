//! Mesh generation for voxel rendering.
//!
//! This module converts a chunk's block data into a flat, already-triangulated
//! vertex list. Every exposed unit face becomes its own quad (two triangles, six
//! vertices); faces are not merged.
//!
//! # Architecture
//! - [`face`]: the culling rule and the per-face unit-cube templates
//! - [`Mesh`]: the assembled vertex list handed to the renderer
//!
//! # Determinism
//! Assembly walks the grid in [`GridPositions`](crate::engine_state::voxels::chunk::chunk_iteration::GridPositions)
//! order and emits faces in [`BlockSide::all`] order, so the same grid always yields
//! a byte-identical mesh.

use log::debug;

use crate::engine_state::voxels::{block::block_side::BlockSide, chunk::VoxelGrid};

use super::vertex::{Vertex, VERTEX_STRIDE_FLOATS};

pub mod face;

pub use face::{face_vertices, visible_faces};

/// Vertices emitted per visible face.
pub const VERTICES_PER_FACE: usize = 6;

/// A triangle list in world space, every three vertices forming one triangle.
///
/// An empty mesh is valid and means there is nothing to draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data, grouped in triangles
    vertices: Vec<Vertex>,
}

impl Mesh {
    /// Builds the surface mesh of `grid`, translated to the grid's world origin.
    pub fn assemble(grid: &VoxelGrid) -> Self {
        let origin = grid.origin();
        let mut vertices = Vec::new();

        for position in grid.positions() {
            let sides = visible_faces(grid, position.x, position.y, position.z);
            if sides.is_empty() {
                continue;
            }

            let world = |o: i32, p: i32| (i64::from(o) + i64::from(p)) as f32;
            let offset = [
                world(origin.x, position.x),
                world(origin.y, position.y),
                world(origin.z, position.z),
            ];
            for side in sides {
                vertices.extend(
                    face_vertices(side)
                        .into_iter()
                        .map(|vertex| vertex.translated(offset)),
                );
            }
        }

        debug!(
            "assembled mesh for chunk at {:?}: {} faces",
            origin,
            vertices.len() / VERTICES_PER_FACE
        );

        Mesh { vertices }
    }

    /// The vertex list.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of vertices to draw.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of quads in the mesh.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_FACE
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The mesh as a flat float sequence, [`VERTEX_STRIDE_FLOATS`] per vertex.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The mesh as bytes, ready for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Counts faces per side, indexed by [`BlockSide`] discriminant.
    pub fn faces_per_side(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for face in self.vertices.chunks_exact(VERTICES_PER_FACE) {
            let normal = face[0].normal;
            if let Some(side) = BlockSide::all().into_iter().find(|s| s.normal() == normal) {
                counts[side as usize] += 1;
            }
        }
        counts
    }
}
