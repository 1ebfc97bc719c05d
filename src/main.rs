//! # Voxel Terrain Entry Point
//!
//! Calls into the library's `run()` to stream terrain around a wandering viewer.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- terrain.json
//! ```

fn main() {
    if voxel_terrain::run().is_err() {
        std::process::exit(1);
    }
}
