//! Face culling and per-face geometry templates.
//!
//! A solid block shows a face wherever the neighbor across that face is air or
//! lies outside the grid. The chunk boundary therefore always renders its outer
//! faces; there is no lookup into neighboring chunks.

use crate::engine_state::voxels::{block::block_side::BlockSide, chunk::VoxelGrid};

use super::super::Vertex;

/// UVs for the quad corners, in corner order (lower-left, lower-right, upper-right, upper-left).
const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

/// Corner indices of the two triangles making up a quad.
const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// Unit-cube corners of a face, counter-clockwise when viewed from outside the cube.
fn face_corners(side: BlockSide) -> [[f32; 3]; 4] {
    match side {
        BlockSide::RIGHT => [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
        BlockSide::LEFT => [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
        BlockSide::TOP => [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        BlockSide::BOTTOM => [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
        BlockSide::FRONT => [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
        BlockSide::BACK => [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    }
}

/// The six cube-space vertices (two triangles) of one face of a block at the origin.
pub fn face_vertices(side: BlockSide) -> [Vertex; 6] {
    let corners = face_corners(side);
    let normal = side.normal();
    QUAD_TRIANGLES.map(|corner| Vertex::new(corners[corner], QUAD_UVS[corner], normal))
}

/// Faces of the block at `(x, y, z)` that border air or the grid boundary.
///
/// Air and out-of-range cells have no faces. Faces come back in
/// [`BlockSide::all`] order.
pub fn visible_faces(grid: &VoxelGrid, x: i32, y: i32, z: i32) -> Vec<BlockSide> {
    if !grid.is_solid(x, y, z) {
        return Vec::new();
    }

    BlockSide::all()
        .into_iter()
        .filter(|side| {
            let offset = side.offset();
            !grid.is_solid(x + offset.x, y + offset.y, z + offset.z)
        })
        .collect()
}
