//! # Voxel Terrain Core
//!
//! Block data, terrain generation and the streaming controller that keeps one
//! chunk alive around the viewer.
//!
//! ## Architecture
//!
//! * **Block**: Block types, face directions and the one-byte block cell
//! * **Chunk**: Fixed-size 3D grids of blocks and their derived meshes
//! * **Noise**: Deterministic 2D noise fields sampled by the terrain generator
//! * **Terrain**: Heightmap fill of a grid from a noise field
//! * **Streaming**: Replaces the live chunk as the viewer crosses chunk boundaries
//!
//! ## Data Flow
//!
//! 1. The streamer picks the chunk origin under the viewer
//! 2. The terrain generator fills a fresh grid at that origin
//! 3. The mesh assembler turns the grid's exposed faces into triangles
//! 4. The mesh is uploaded to the renderer and the handle kept on the chunk

pub mod block;
pub mod chunk;
pub mod noise;
pub mod streaming;
pub mod terrain;
