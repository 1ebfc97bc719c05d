//! # Voxel Grid Module
//!
//! Dense, fixed-size 3D block storage. Cells live in one contiguous vector indexed
//! by `x + size.x * (y + size.y * z)`, so X varies fastest; [`VoxelGrid::raw_blocks`]
//! exposes exactly that layout for streaming raw block arrays.
//!
//! Every lookup fails closed: a coordinate outside `[0, size)` on any axis has no
//! index, reads as air and is never solid. Face culling relies on this to treat
//! the chunk boundary as exposed.

use cgmath::{Point3, Vector3};

use super::chunk_iteration::GridPositions;
use crate::engine_state::voxels::block::Block;
use crate::error::TerrainError;

/// A dense 3D array of blocks anchored at a world-space origin.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    /// World position of local cell (0, 0, 0)
    origin: Point3<i32>,
    /// Cells along each axis
    size: Vector3<i32>,
    /// One block per cell, X fastest
    blocks: Vec<Block>,
}

impl VoxelGrid {
    /// Creates a grid with every cell initialised to air.
    ///
    /// Non-positive dimensions produce an empty grid in which every coordinate
    /// is out of range.
    pub fn new(origin: Point3<i32>, size: Vector3<i32>) -> Self {
        let size = Vector3::new(size.x.max(0), size.y.max(0), size.z.max(0));
        let volume = size.x as usize * size.y as usize * size.z as usize;
        VoxelGrid {
            origin,
            size,
            blocks: vec![Block::AIR; volume],
        }
    }

    /// Rebuilds a grid from a raw block array in X-fastest order.
    ///
    /// # Errors
    /// * [`TerrainError::RawLength`] if `bytes` does not cover the grid exactly
    /// * [`TerrainError::UnknownBlockType`] if any byte is not a block type id
    pub fn from_raw(
        origin: Point3<i32>,
        size: Vector3<i32>,
        bytes: &[u8],
    ) -> Result<Self, TerrainError> {
        let mut grid = VoxelGrid::new(origin, size);
        if bytes.len() != grid.blocks.len() {
            return Err(TerrainError::RawLength {
                expected: grid.blocks.len(),
                actual: bytes.len(),
            });
        }
        grid.blocks = bytes
            .iter()
            .map(|&b| Block::from_raw(b))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(grid)
    }

    /// World position of local cell (0, 0, 0).
    pub fn origin(&self) -> Point3<i32> {
        self.origin
    }

    /// Cells along each axis.
    pub fn size(&self) -> Vector3<i32> {
        self.size
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    /// Linear index of a local coordinate, or `None` when it is out of range.
    pub fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if !(0..self.size.x).contains(&x)
            || !(0..self.size.y).contains(&y)
            || !(0..self.size.z).contains(&z)
        {
            return None;
        }
        Some(self.linear_index(x, y, z))
    }

    /// X-fastest index of a coordinate already known to be in range.
    fn linear_index(&self, x: i32, y: i32, z: i32) -> usize {
        x as usize + self.size.x as usize * (y as usize + self.size.y as usize * z as usize)
    }

    /// The block at a local coordinate, or `None` when it is out of range.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        self.index(x, y, z).map(|i| self.blocks[i])
    }

    /// The block at a local coordinate, reading out-of-range cells as air.
    pub fn block_or_air(&self, x: i32, y: i32, z: i32) -> Block {
        self.get(x, y, z).unwrap_or(Block::AIR)
    }

    /// Whether the cell holds a solid block. Out-of-range cells are never solid.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.block_or_air(x, y, z).is_solid()
    }

    /// Writes a block.
    ///
    /// # Errors
    /// [`TerrainError::OutOfBounds`] if the coordinate is outside the grid; the grid
    /// is left untouched.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block: Block) -> Result<(), TerrainError> {
        let index = self
            .index(x, y, z)
            .ok_or(TerrainError::OutOfBounds { x, y, z })?;
        self.blocks[index] = block;
        Ok(())
    }

    /// Overwrites every cell with `block_at(position)`, visiting positions in
    /// [`VoxelGrid::positions`] order.
    pub fn fill_with<F: FnMut(Point3<i32>) -> Block>(&mut self, mut block_at: F) {
        for position in self.positions() {
            let index = self.linear_index(position.x, position.y, position.z);
            self.blocks[index] = block_at(position);
        }
    }

    /// Every local coordinate in traversal order: X outermost, then Y, then Z.
    pub fn positions(&self) -> GridPositions {
        GridPositions::new(self.size)
    }

    /// The cells as raw type ids, in X-fastest linear order.
    pub fn raw_blocks(&self) -> &[u8] {
        bytemuck::cast_slice(&self.blocks)
    }

    /// Number of solid cells.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_solid()).count()
    }
}
