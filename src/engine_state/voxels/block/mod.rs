//! # Block Module
//!
//! This module provides the block-level data model for the voxel engine: the
//! compact per-cell [`Block`], the enumerable [`BlockType`](block_type::BlockType)
//! set and the six [`BlockSide`](block_side::BlockSide) faces used by face culling.

use block_type::BlockType;

use crate::error::TerrainError;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage and raw block array streaming.
pub type BlockTypeSize = u8;

/// Represents a single voxel cell in a chunk.
///
/// This is a lightweight structure that stores only the block type. A block's
/// position is implied by where it sits in its grid, so it is never stored.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute and `Pod` derive let a whole grid be viewed as a
/// byte slice, one byte per cell.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// An air block.
    pub const AIR: Block = Block {
        block_type: BlockType::AIR as BlockTypeSize,
    };

    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Decodes a raw type id into a block, rejecting ids with no block type.
    pub fn from_raw(btype: BlockTypeSize) -> Result<Self, TerrainError> {
        BlockType::from_int(btype).map(Block::new)
    }

    /// Returns the rich block type.
    ///
    /// Blocks are only constructed from valid `BlockType`s, so the stored id
    /// always decodes; anything else is treated as air.
    pub fn block_type(&self) -> BlockType {
        BlockType::from_int(self.block_type).unwrap_or(BlockType::AIR)
    }

    /// Whether this block contributes geometry.
    pub fn is_solid(&self) -> bool {
        self.block_type().is_solid()
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::AIR
    }
}
