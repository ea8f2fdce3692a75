//! # Chunk Module
//!
//! This module provides the `Chunk` struct: one square tile of terrain, `size × size`
//! columns wide, holding every voxel generated for that tile together with the
//! colliders the physics and raycasting code test against.
//!
//! ## Storage
//!
//! A chunk keeps three parallel views of the same voxels:
//! - `voxels`: integer world positions, in generation order (surface voxels first,
//!   fill voxels after)
//! - `instances`: the same positions as `CubeInstance` records, so the renderer can take
//!   the instance buffer as a borrowed `&[f32]` without copying
//! - `colliders`: one unit `CubeCollider` per voxel
//!
//! `edge_colliders` is the subset of colliders whose column lies on the chunk's outer
//! ring. Those are the only voxels of a neighbouring chunk the player can touch while
//! standing near a boundary, so the chunk manager unions them for collision checks.
//!
//! ## Coordinates
//!
//! Chunk coordinates are `Point2<i32>` where `x` indexes world x and `y` indexes world
//! z. Chunk `(cx, cz)` is centered at `(cx * size, cz * size)` and spans the integer
//! voxel columns `center - size / 2 ..= center + size / 2 - 1` on each axis.

use std::collections::HashSet;

use cgmath::{Point2, Point3};

use super::chunk_cache::ChunkCache;
use super::colliders::CubeCollider;
use super::noise_field::NoiseConfig;
use chunk_creation::ChunkBuilder;

pub mod chunk_creation;

/// Number of voxel columns along each side of a chunk.
pub const CHUNK_DIMENSION: i32 = 64;

/// Integer chunk coordinate. `x` indexes world x, `y` indexes world z.
pub type ChunkCoord = Point2<i32>;

/// One voxel in the renderer's instance buffer: `[x, y, z, reserved]`.
///
/// The `#[repr(C)]` layout lets a slice of instances be viewed as a flat `f32` slice.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CubeInstance {
    /// Voxel center in homogeneous coordinates; the last component is always 0.
    pub offset: [f32; 4],
}

impl CubeInstance {
    /// Creates the instance record for an integer voxel position.
    pub fn from_voxel(voxel: Point3<i32>) -> Self {
        CubeInstance {
            offset: [voxel.x as f32, voxel.y as f32, voxel.z as f32, 0.0],
        }
    }
}

/// Maps a world position to the coordinate of the chunk containing it.
///
/// # Arguments
/// * `position` - Any world-space position; only x and z are used
/// * `size` - Chunk side length
///
/// Coordinates are clamped to [`max_chunk_coord`] so that voxel positions inside any
/// reachable chunk, and its neighbours, still fit in an `i32`.
pub fn pos_to_chunk(position: Point3<f32>, size: i32) -> ChunkCoord {
    let half = size as f32 / 2.0;
    let limit = max_chunk_coord(size);
    let axis = |value: f32| (((value + half) / size as f32).floor() as i32).clamp(-limit, limit);
    Point2::new(axis(position.x), axis(position.z))
}

/// Largest chunk coordinate magnitude [`pos_to_chunk`] returns for chunks of `size`.
pub fn max_chunk_coord(size: i32) -> i32 {
    i32::MAX / size.max(1) / 2
}

/// World-space (x, z) center of the chunk at `coord`.
pub fn chunk_center(coord: ChunkCoord, size: i32) -> Point2<f32> {
    Point2::new(
        coord.x.saturating_mul(size) as f32,
        coord.y.saturating_mul(size) as f32,
    )
}

/// A square tile of generated terrain.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Grid coordinate of this chunk.
    coord: ChunkCoord,
    /// Columns per side.
    size: i32,
    /// Voxel positions, in generation order.
    voxels: Vec<Point3<i32>>,
    /// Instance records parallel to `voxels`.
    instances: Vec<CubeInstance>,
    /// Colliders parallel to `voxels`.
    colliders: Vec<CubeCollider>,
    /// Colliders whose column lies on the outer ring.
    edge_colliders: Vec<CubeCollider>,
}

impl Chunk {
    /// Generates the chunk at `coord` from noise.
    ///
    /// Runs the height pass and then the fill pass; see [`chunk_creation`].
    ///
    /// # Arguments
    /// * `coord` - Chunk coordinate
    /// * `size` - Columns per side
    /// * `config` - Noise parameters
    pub fn generate(coord: ChunkCoord, size: i32, config: &NoiseConfig) -> Self {
        let mut builder = ChunkBuilder::from_noise(coord, size, config);
        builder.fill_pass();
        builder.return_chunk()
    }

    /// Rebuilds a chunk from a previously generated voxel list.
    ///
    /// Colliders and the edge ring are derived from the positions alone, so a chunk
    /// reconstructed from the cache is indistinguishable from the generated one.
    ///
    /// # Arguments
    /// * `coord` - Chunk coordinate
    /// * `size` - Columns per side
    /// * `voxels` - Voxel positions, in the order they should be rendered
    pub fn from_voxels(coord: ChunkCoord, size: i32, voxels: Vec<Point3<i32>>) -> Self {
        let mut chunk = Chunk {
            coord,
            size,
            instances: voxels.iter().copied().map(CubeInstance::from_voxel).collect(),
            colliders: voxels.iter().copied().map(CubeCollider::from_voxel).collect(),
            edge_colliders: Vec::new(),
            voxels,
        };
        chunk.edge_colliders = chunk
            .voxels
            .iter()
            .filter(|voxel| chunk.is_edge_column(voxel.x, voxel.z))
            .copied()
            .map(CubeCollider::from_voxel)
            .collect();
        chunk
    }

    /// Grid coordinate of this chunk.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Columns per side.
    pub fn size(&self) -> i32 {
        self.size
    }

    /// World-space (x, z) center.
    pub fn center(&self) -> Point2<f32> {
        chunk_center(self.coord, self.size)
    }

    /// Smallest voxel x and z covered by this chunk.
    pub fn min_column(&self) -> (i32, i32) {
        (
            self.coord.x.saturating_mul(self.size) - self.size / 2,
            self.coord.y.saturating_mul(self.size) - self.size / 2,
        )
    }

    /// Whether the integer column `(x, z)` belongs to this chunk.
    pub fn contains_column(&self, x: i32, z: i32) -> bool {
        let (min_x, min_z) = self.min_column();
        (min_x..min_x + self.size).contains(&x) && (min_z..min_z + self.size).contains(&z)
    }

    /// Whether the integer column `(x, z)` lies on this chunk's outer ring.
    pub fn is_edge_column(&self, x: i32, z: i32) -> bool {
        let (min_x, min_z) = self.min_column();
        let (max_x, max_z) = (min_x + self.size - 1, min_z + self.size - 1);
        self.contains_column(x, z) && (x == min_x || x == max_x || z == min_z || z == max_z)
    }

    /// Voxel positions, in generation order.
    pub fn voxels(&self) -> &[Point3<i32>] {
        &self.voxels
    }

    /// Flattened instance buffer: 4 floats (x, y, z, 0) per voxel.
    pub fn cube_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Every collider in the chunk.
    pub fn collider_list(&self) -> &[CubeCollider] {
        &self.colliders
    }

    /// Colliders on the chunk's outer ring.
    pub fn edge_collider_list(&self) -> &[CubeCollider] {
        &self.edge_colliders
    }

    /// Number of voxels to draw.
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    /// Returns the highest collider in the column containing world `(x, z)`.
    ///
    /// Voxel centers sit on integers, so the column is found by rounding.
    pub fn top_cube_at(&self, x: f32, z: f32) -> Option<&CubeCollider> {
        let column = (x.round() as i32, z.round() as i32);
        self.voxels
            .iter()
            .zip(self.colliders.iter())
            .filter(|(voxel, _)| (voxel.x, voxel.z) == column)
            .max_by_key(|(voxel, _)| voxel.y)
            .map(|(_, collider)| collider)
    }

    /// Removes the voxel at `position` and records the edit in `cache`.
    ///
    /// # Arguments
    /// * `position` - Integer world position of the voxel to remove
    /// * `cache` - Cache holding this chunk's entry; its removal log is extended so a
    ///   later reload skips the voxel
    ///
    /// # Returns
    /// `true` if a voxel was removed, `false` if none exists at `position`.
    pub fn remove_cube(&mut self, position: Point3<i32>, cache: &mut ChunkCache) -> bool {
        let Some(index) = self.voxels.iter().position(|voxel| *voxel == position) else {
            return false;
        };

        self.voxels.remove(index);
        self.instances.remove(index);
        let collider = self.colliders.remove(index);
        self.edge_colliders.retain(|edge| *edge != collider);

        if !cache.record_removal(self.coord, position) {
            log::warn!(
                "Removed voxel {:?} from chunk {:?} without a cache entry; the edit will not survive a reload",
                position,
                self.coord
            );
        }

        true
    }

    /// Drops every voxel listed in `removed`. Used when rebuilding from the cache.
    pub(crate) fn without(coord: ChunkCoord, size: i32, voxels: &[Point3<i32>], removed: &[Point3<i32>]) -> Self {
        if removed.is_empty() {
            return Self::from_voxels(coord, size, voxels.to_vec());
        }
        let removed: HashSet<Point3<i32>> = removed.iter().copied().collect();
        let live = voxels
            .iter()
            .filter(|voxel| !removed.contains(voxel))
            .copied()
            .collect();
        Self::from_voxels(coord, size, live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_chunk() -> Chunk {
        Chunk::generate(Point2::new(0, 0), 8, &NoiseConfig::default())
    }

    #[test]
    fn pos_to_chunk_maps_around_chunk_centers() {
        assert_eq!(pos_to_chunk(Point3::new(0.0, 5.0, 0.0), 64), Point2::new(0, 0));
        assert_eq!(pos_to_chunk(Point3::new(31.9, 0.0, -32.0), 64), Point2::new(0, 0));
        assert_eq!(pos_to_chunk(Point3::new(32.0, 0.0, -32.1), 64), Point2::new(1, -1));
        assert_eq!(pos_to_chunk(Point3::new(-100.0, 0.0, 200.0), 64), Point2::new(-2, 3));
    }

    #[test]
    fn chunk_center_round_trip_stays_within_half_a_chunk() {
        let size = 64;
        let samples = [
            (0.0, 0.0),
            (31.99, -31.99),
            (-32.0, 32.0),
            (1000.5, -777.25),
            (-4096.0, 12.75),
        ];
        for (x, z) in samples {
            let center = chunk_center(pos_to_chunk(Point3::new(x, 0.0, z), size), size);
            assert!((center.x - x).abs() <= size as f32 / 2.0);
            assert!((center.y - z).abs() <= size as f32 / 2.0);
        }
    }

    #[test]
    fn far_positions_clamp_to_the_largest_chunk_coordinate() {
        let size = 16;
        let limit = max_chunk_coord(size);
        let far = pos_to_chunk(Point3::new(1.0e12, 0.0, -1.0e12), size);
        assert_eq!(far, Point2::new(limit, -limit));

        let chunk = Chunk::from_voxels(Point2::new(limit + 1, -limit - 1), size, Vec::new());
        let (min_x, min_z) = chunk.min_column();
        assert!(min_x > 0 && min_z < 0);
        assert!(chunk.center().x > 1.0e9);
    }

    #[test]
    fn generated_voxels_stay_inside_their_columns() {
        let chunk = Chunk::generate(Point2::new(-1, 2), 8, &NoiseConfig::default());
        assert!(chunk.voxel_count() >= 64);
        assert!(chunk
            .voxels()
            .iter()
            .all(|voxel| chunk.contains_column(voxel.x, voxel.z)));
        assert_eq!(chunk.collider_list().len(), chunk.voxel_count());
        assert_eq!(chunk.cube_positions().len(), 4 * chunk.voxel_count());
    }

    #[test]
    fn cube_positions_are_homogeneous_offsets() {
        let chunk = small_chunk();
        let positions = chunk.cube_positions();
        for (voxel, chunk_of_four) in chunk.voxels().iter().zip(positions.chunks(4)) {
            assert_eq!(
                chunk_of_four,
                &[voxel.x as f32, voxel.y as f32, voxel.z as f32, 0.0]
            );
        }
    }

    #[test]
    fn edge_colliders_cover_only_the_outer_ring() {
        let chunk = small_chunk();
        let (min_x, min_z) = chunk.min_column();
        assert!(!chunk.edge_collider_list().is_empty());
        for collider in chunk.edge_collider_list() {
            let voxel = collider.voxel();
            let on_ring = voxel.x == min_x
                || voxel.x == min_x + 7
                || voxel.z == min_z
                || voxel.z == min_z + 7;
            assert!(on_ring, "{:?} is not on the ring", voxel);
        }
        // Every ring column has at least its surface voxel.
        assert!(chunk.edge_collider_list().len() >= 4 * 8 - 4);
    }

    #[test]
    fn top_cube_is_the_highest_voxel_of_the_column() {
        let chunk = Chunk::from_voxels(
            Point2::new(0, 0),
            8,
            vec![Point3::new(0, 3, 0), Point3::new(0, 1, 0), Point3::new(1, 7, 0)],
        );
        let top = chunk.top_cube_at(0.2, -0.3).map(|c| c.voxel());
        assert_eq!(top, Some(Point3::new(0, 3, 0)));
        assert!(chunk.top_cube_at(2.0, 2.0).is_none());
    }

    #[test]
    fn remove_cube_updates_lists_and_cache() {
        let mut cache = ChunkCache::new(16);
        let chunk = small_chunk();
        cache.insert_generated(&chunk);
        let mut chunk = chunk;

        let target = chunk.voxels()[0];
        let before = chunk.voxel_count();
        assert!(chunk.remove_cube(target, &mut cache));
        assert_eq!(chunk.voxel_count(), before - 1);
        assert_eq!(chunk.collider_list().len(), before - 1);
        assert!(!chunk.voxels().contains(&target));
        assert!(chunk
            .edge_collider_list()
            .iter()
            .all(|collider| collider.voxel() != target));

        let entry = cache.peek(chunk.coord()).expect("entry was inserted");
        assert_eq!(entry.removed, vec![target]);

        assert!(!chunk.remove_cube(target, &mut cache));
    }
}
