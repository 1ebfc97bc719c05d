//! # Terrain Generation
//!
//! Heightmap terrain: each `(x, z)` column samples the noise field once and fills
//! every block at or below the resulting height with dirt. There are no caves or
//! overhangs.
//!
//! Ground level is world-absolute. The baseline `size.y / 2` plus the noise offset
//! is compared against each block's world Y, so two chunks at different vertical
//! origins agree on where the surface is.

use log::trace;

use super::block::{block_type::BlockType, Block};
use super::chunk::VoxelGrid;
use super::noise::NoiseField;

/// Parameters shaping the heightmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainParams {
    /// Multiplier applied to world X/Z before sampling noise
    pub noise_scale: f64,
    /// Height range the noise can add above the baseline
    pub max_height_offset: i32,
}

/// World-space surface height of the column at `(world_x, world_z)`.
///
/// `floor((n + 1) / 2 * max_height_offset) + size_y / 2`, where `n` is the noise
/// sample at the scaled world coordinates.
pub fn column_height<N: NoiseField + ?Sized>(
    noise: &N,
    params: &TerrainParams,
    world_x: i32,
    world_z: i32,
    size_y: i32,
) -> i32 {
    let n = noise.sample(
        world_x as f64 * params.noise_scale,
        world_z as f64 * params.noise_scale,
    );
    let offset = ((n + 1.0) * 0.5 * params.max_height_offset as f64).floor() as i32;
    offset.saturating_add(size_y / 2)
}

/// Fills `grid` with heightmap terrain for its origin.
///
/// Every cell is overwritten, so regenerating the same grid is idempotent. The noise
/// is sampled once per `(x, z)` column.
pub fn generate<N: NoiseField + ?Sized>(grid: &mut VoxelGrid, noise: &N, params: &TerrainParams) {
    let origin = grid.origin();
    let size = grid.size();
    let dirt = Block::new(BlockType::DIRT);

    let mut heights = Vec::with_capacity(size.x as usize * size.z as usize);
    for x in 0..size.x {
        for z in 0..size.z {
            let world_x = origin.x.saturating_add(x);
            let world_z = origin.z.saturating_add(z);
            let height = column_height(noise, params, world_x, world_z, size.y);
            trace!("column ({world_x}, {world_z}) height {height}");
            heights.push(height);
        }
    }

    grid.fill_with(|p| {
        let height = heights[p.x as usize * size.z as usize + p.z as usize];
        if origin.y.saturating_add(p.y) <= height {
            dirt
        } else {
            Block::AIR
        }
    });
}
