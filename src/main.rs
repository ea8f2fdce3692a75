//! # Voxel Terrain Entry Point
//!
//! Native entry point: runs the library's headless scripted walk.
//!
//! For web applications, see `WebTerrain` in the library.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    {
        if let Err(error) = voxel_terrain::run() {
            eprintln!("voxel-terrain: {:#}", error);
            std::process::exit(1);
        }
    }
}
