//! # Chunk Manager Module
//!
//! This module provides the `ChunkManager` struct, which keeps the 3×3 neighbourhood of
//! chunks around the player loaded and hands out the data the physics, targeting and
//! rendering layers need from it.
//!
//! ## Neighbourhood
//!
//! The manager tracks the player's current chunk separately from its eight neighbours.
//! Whenever the player's chunk coordinate changes, every chunk of the new neighbourhood
//! is loaded through the cache (generated only on a miss) and the union of the
//! neighbours' edge colliders is rebuilt.
//!
//! ## Edits
//!
//! Removed voxels are written through to the cache entry of the owning chunk, so an
//! edit survives the chunk leaving and re-entering the neighbourhood as long as the
//! entry is not evicted.

use cgmath::{MetricSpace, Point2, Point3};
use serde::{Deserialize, Serialize};

use super::chunk::{pos_to_chunk, Chunk, ChunkCoord, CHUNK_DIMENSION};
use super::chunk_cache::{ChunkCache, DEFAULT_CACHE_CAPACITY};
use super::colliders::CubeCollider;
use super::noise_field::NoiseConfig;

/// Offsets from the current chunk to its neighbours: N, NE, E, SE, S, SW, W, NW.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Chunk layout and cache sizing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkSettings {
    /// Columns per chunk side
    pub size: i32,
    /// Most chunks the cache remembers
    pub cache_capacity: usize,
}

impl Default for ChunkSettings {
    fn default() -> Self {
        ChunkSettings {
            size: CHUNK_DIMENSION,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Coordinates of the eight chunks around `center`, in [`NEIGHBOR_OFFSETS`] order.
pub fn neighbor_coords(center: ChunkCoord) -> [ChunkCoord; 8] {
    NEIGHBOR_OFFSETS.map(|(dx, dz)| Point2::new(center.x + dx, center.y + dz))
}

/// Keeps the chunks around the player loaded.
pub struct ChunkManager {
    /// Columns per chunk side
    size: i32,
    /// Parameters every generated chunk is built from
    noise: NoiseConfig,
    /// Generated voxels and removal logs, by coordinate
    cache: ChunkCache,
    /// The chunk the player stands in
    current: Chunk,
    /// The eight chunks around `current`, in [`NEIGHBOR_OFFSETS`] order
    neighbors: Vec<Chunk>,
    /// Union of the neighbours' edge colliders
    edge_colliders: Vec<CubeCollider>,
}

impl ChunkManager {
    /// Creates a manager and loads the neighbourhood around `player_position`.
    ///
    /// # Arguments
    /// * `settings` - Chunk size and cache capacity
    /// * `noise` - Noise parameters for generated chunks
    /// * `player_position` - Where the player starts
    pub fn new(settings: &ChunkSettings, noise: NoiseConfig, player_position: Point3<f32>) -> Self {
        let size = settings.size.max(1);
        let coord = pos_to_chunk(player_position, size);
        let mut manager = ChunkManager {
            size,
            current: Chunk::from_voxels(coord, size, Vec::new()),
            noise,
            cache: ChunkCache::new(settings.cache_capacity),
            neighbors: Vec::with_capacity(NEIGHBOR_OFFSETS.len()),
            edge_colliders: Vec::new(),
        };
        manager.load_neighborhood(coord);
        manager
    }

    /// Returns the chunk at `coord`, from the cache when possible.
    ///
    /// A cache hit rebuilds the chunk from its stored voxels minus its removals; a miss
    /// generates it from noise and records a fresh entry.
    ///
    /// # Returns
    /// `(was_cached, chunk)`
    pub fn try_load_chunk(&mut self, coord: ChunkCoord) -> (bool, Chunk) {
        if let Some(entry) = self.cache.get(coord) {
            log::debug!("Chunk cache hit for {:?}", coord);
            return (true, entry.to_chunk());
        }

        log::debug!("Chunk cache miss for {:?}, generating", coord);
        let chunk = Chunk::generate(coord, self.size, &self.noise);
        self.cache.insert_generated(&chunk);
        (false, chunk)
    }

    /// Reloads the neighbourhood if the player has moved into another chunk.
    ///
    /// # Returns
    /// `true` if the player crossed a chunk boundary this call.
    pub fn update(&mut self, player_position: Point3<f32>) -> bool {
        let coord = pos_to_chunk(player_position, self.size);
        if coord == self.current.coord() {
            return false;
        }

        log::info!(
            "Player crossed from chunk {:?} into {:?}",
            self.current.coord(),
            coord
        );
        self.load_neighborhood(coord);
        true
    }

    fn load_neighborhood(&mut self, coord: ChunkCoord) {
        let current = self.try_load_chunk(coord).1;
        let neighbors: Vec<Chunk> = neighbor_coords(coord)
            .into_iter()
            .map(|neighbor| self.try_load_chunk(neighbor).1)
            .collect();
        self.current = current;
        self.neighbors = neighbors;
        self.rebuild_edge_colliders();
    }

    fn rebuild_edge_colliders(&mut self) {
        self.edge_colliders = self
            .neighbors
            .iter()
            .flat_map(|chunk| chunk.edge_collider_list().iter().copied())
            .collect();
    }

    /// Union of the eight neighbours' edge colliders.
    pub fn edge_colliders(&self) -> &[CubeCollider] {
        &self.edge_colliders
    }

    /// The chunk the player stands in.
    pub fn current_chunk(&self) -> &Chunk {
        &self.current
    }

    /// The eight chunks around the current one.
    pub fn neighbors(&self) -> &[Chunk] {
        &self.neighbors
    }

    /// The current chunk followed by its neighbours.
    pub fn tracked_chunks(&self) -> impl Iterator<Item = &Chunk> {
        std::iter::once(&self.current).chain(self.neighbors.iter())
    }

    /// Noise parameters in use.
    pub fn noise_config(&self) -> &NoiseConfig {
        &self.noise
    }

    /// Columns per chunk side.
    pub fn chunk_size(&self) -> i32 {
        self.size
    }

    /// The chunk cache.
    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    /// Concatenated instance buffer of the whole neighbourhood.
    ///
    /// # Returns
    /// `(positions, count)`: 4 floats per voxel, and the number of voxels.
    pub fn instance_buffer(&self) -> (Vec<f32>, usize) {
        let count = self.voxel_count();
        let mut positions = Vec::with_capacity(4 * count);
        for chunk in self.tracked_chunks() {
            positions.extend_from_slice(chunk.cube_positions());
        }
        (positions, count)
    }

    /// Voxels across the whole neighbourhood.
    pub fn voxel_count(&self) -> usize {
        self.tracked_chunks().map(Chunk::voxel_count).sum()
    }

    /// Colliders the player body is tested against: the current chunk's and the
    /// neighbours' edge colliders, within `reach` of `point`.
    pub fn collision_candidates(&self, point: Point3<f32>, reach: f32) -> Vec<CubeCollider> {
        self.current
            .collider_list()
            .iter()
            .chain(self.edge_colliders.iter())
            .filter(|cube| cube.position().distance(point) <= reach)
            .copied()
            .collect()
    }

    /// Every tracked collider within `reach` of `point`.
    pub fn colliders_within(&self, point: Point3<f32>, reach: f32) -> Vec<CubeCollider> {
        self.tracked_chunks()
            .flat_map(|chunk| chunk.collider_list().iter())
            .filter(|cube| cube.position().distance(point) <= reach)
            .copied()
            .collect()
    }

    /// The tracked chunk owning the integer column `(x, z)`.
    pub fn chunk_for_column(&self, x: i32, z: i32) -> Option<&Chunk> {
        self.tracked_chunks().find(|chunk| chunk.contains_column(x, z))
    }

    /// The tracked chunk owning the column under world `position`.
    pub fn chunk_for_position(&self, position: Point3<f32>) -> Option<&Chunk> {
        self.chunk_for_column(position.x.round() as i32, position.z.round() as i32)
    }

    /// Highest collider in the column under world `(x, z)`, if that column is tracked.
    pub fn top_cube_at(&self, x: f32, z: f32) -> Option<CubeCollider> {
        self.chunk_for_position(Point3::new(x, 0.0, z))
            .and_then(|chunk| chunk.top_cube_at(x, z))
            .copied()
    }

    /// Removes the voxel at `position` from whichever tracked chunk owns it.
    ///
    /// # Returns
    /// `true` if a voxel was removed.
    pub fn remove_cube(&mut self, position: Point3<i32>) -> bool {
        let cache = &mut self.cache;
        if self.current.contains_column(position.x, position.z) {
            let removed = self.current.remove_cube(position, cache);
            if removed {
                log::debug!("Removed voxel {:?} from the current chunk", position);
            }
            return removed;
        }

        let Some(neighbor) = self
            .neighbors
            .iter_mut()
            .find(|chunk| chunk.contains_column(position.x, position.z))
        else {
            log::debug!("No tracked chunk owns voxel {:?}", position);
            return false;
        };

        let removed = neighbor.remove_cube(position, cache);
        if removed {
            log::debug!("Removed voxel {:?} from neighbour {:?}", position, neighbor.coord());
            self.rebuild_edge_colliders();
        }
        removed
    }

    /// Replaces the noise parameters and regenerates the neighbourhood.
    ///
    /// Cache entries are keyed by coordinate only, so the cache is cleared and every
    /// recorded removal is dropped.
    pub fn set_noise_config(&mut self, noise: NoiseConfig) {
        log::info!("Noise configuration changed, regenerating: {:?}", noise);
        self.noise = noise;
        self.cache.clear();
        self.load_neighborhood(self.current.coord());
    }
}
