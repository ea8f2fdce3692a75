//! # Voxel Terrain
//!
//! This module contains the terrain side of the engine: how the world's voxels are
//! generated, stored, edited and loaded around the player.
//!
//! ## Architecture
//!
//! * **Noise field**: fractal Perlin height maps, a pure function of position and config
//! * **Chunk**: a square tile of voxels plus the colliders derived from them
//! * **Chunk cache**: bounded LRU memory of generated chunks and their removals
//! * **Chunk manager**: keeps the 3×3 neighbourhood around the player loaded
//! * **Colliders**: unit cubes for voxels and the cylinder for the player body
//! * **Water**: the flat water surface that follows the neighbourhood
//!
//! ## Data Flow
//!
//! 1. The player's position maps to a chunk coordinate
//! 2. On a coordinate change the manager loads the new neighbourhood through the cache
//! 3. Cache misses run the noise field and the two-pass chunk builder
//! 4. Physics and targeting read colliders; rendering reads the instance buffer

pub mod chunk;
pub mod chunk_cache;
pub mod chunk_manager;
pub mod colliders;
pub mod noise_field;
pub mod water;
