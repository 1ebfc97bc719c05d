//! # Chunk Iteration Module
//!
//! This module provides the fixed traversal order shared by terrain generation
//! (through [`VoxelGrid::fill_with`](super::VoxelGrid::fill_with)) and mesh assembly.
//! Both walk X outermost, then Y, with Z innermost, so repeated passes over the
//! same grid always visit cells (and emit faces) in the same order.

use cgmath::{Point3, Vector3};

/// An iterator over every local coordinate of a grid.
///
/// Yields `(x, y, z)` for `x` in `0..size.x`, `y` in `0..size.y`, `z` in `0..size.z`,
/// with `z` changing fastest.
#[derive(Debug, Clone)]
pub struct GridPositions {
    /// Grid extent
    size: Vector3<i32>,
    /// The coordinate yielded next, `None` once exhausted
    next: Option<Point3<i32>>,
}

impl GridPositions {
    /// Creates an iterator over a grid of the given size.
    pub fn new(size: Vector3<i32>) -> Self {
        let next = if size.x > 0 && size.y > 0 && size.z > 0 {
            Some(Point3::new(0, 0, 0))
        } else {
            None
        };
        GridPositions { size, next }
    }
}

impl Iterator for GridPositions {
    type Item = Point3<i32>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        let mut advanced = current;
        advanced.z += 1;
        if advanced.z == self.size.z {
            advanced.z = 0;
            advanced.y += 1;
            if advanced.y == self.size.y {
                advanced.y = 0;
                advanced.x += 1;
            }
        }
        self.next = (advanced.x < self.size.x).then_some(advanced);

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_every_cell_once_with_z_fastest() {
        let positions: Vec<_> = GridPositions::new(Vector3::new(2, 2, 3)).collect();
        assert_eq!(positions.len(), 12);
        assert_eq!(positions[0], Point3::new(0, 0, 0));
        assert_eq!(positions[1], Point3::new(0, 0, 1));
        assert_eq!(positions[3], Point3::new(0, 1, 0));
        assert_eq!(positions[6], Point3::new(1, 0, 0));
        assert_eq!(positions[11], Point3::new(1, 1, 2));
    }

    #[test]
    fn empty_extent_yields_nothing() {
        assert_eq!(GridPositions::new(Vector3::new(4, 0, 4)).count(), 0);
    }
}
