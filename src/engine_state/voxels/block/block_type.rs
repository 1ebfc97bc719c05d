//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and
//! their conversion from the compact integer encoding.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;

use super::BlockTypeSize;
use crate::error::TerrainError;

/// Enumerates all possible block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion from the raw integer id stored
/// in each [`Block`](super::Block).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air block, which is non-solid and never meshed.
    AIR = 0,

    /// A basic dirt block, the solid material the terrain generator places.
    DIRT = 1,
}

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// # Errors
    /// Returns [`TerrainError::UnknownBlockType`] if the id has no block type.
    pub fn from_int(btype: BlockTypeSize) -> Result<Self, TerrainError> {
        Self::from_u8(btype).ok_or(TerrainError::UnknownBlockType(btype))
    }

    /// Whether blocks of this type are opaque and produce faces.
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockType::AIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_air_is_non_solid() {
        assert!(!BlockType::AIR.is_solid());
        assert!(BlockType::DIRT.is_solid());
    }

    #[test]
    fn decodes_known_ids() {
        assert_eq!(BlockType::from_int(0).unwrap(), BlockType::AIR);
        assert_eq!(BlockType::from_int(1).unwrap(), BlockType::DIRT);
        assert!(BlockType::from_int(2).is_err());
    }

    #[test]
    fn every_other_id_is_unknown() {
        for id in 2..=u8::MAX {
            assert!(matches!(
                BlockType::from_int(id),
                Err(TerrainError::UnknownBlockType(unknown)) if unknown == id
            ));
        }
    }
}
