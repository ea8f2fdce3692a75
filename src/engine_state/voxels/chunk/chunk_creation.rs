//! # Chunk Creation Module
//!
//! This module turns a noise height grid into the voxel list of a chunk. Creation runs
//! in two passes over a `size × size` grid of column surface heights:
//!
//! 1. **Height pass**: one surface voxel per column at `floor(noise * height)`.
//! 2. **Fill pass**: where a column stands above its lowest Moore neighbour, the vertical
//!    gap is filled with extra voxels so no holes show through the side of a cliff.
//!
//! ## Boundary columns
//!
//! Columns on the chunk's outer ring only compare against neighbours inside the grid,
//! and their fill depth is capped at [`BOUNDARY_FILL_DEPTH`]. The cap keeps steep chunk
//! seams closed without looking at neighbouring chunks, and flat terrain still produces
//! no fill at all.

use cgmath::{Point2, Point3};

use crate::engine_state::voxels::noise_field::{generate_height_map, NoiseConfig};

use super::{chunk_center, Chunk, ChunkCoord};

/// Deepest fill, below the surface voxel, for a column on the chunk's outer ring.
pub const BOUNDARY_FILL_DEPTH: i32 = 2;

/// Relative (row, col) offsets of the eight Moore neighbours.
const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A builder that accumulates a chunk's voxels pass by pass.
///
/// The builder owns the column surface heights so the fill pass can look at
/// neighbours, and appends voxels in the order they should be rendered.
pub struct ChunkBuilder {
    /// Coordinate of the chunk being built
    coord: ChunkCoord,
    /// Columns per side
    size: i32,
    /// Surface voxel height of every column, row-major (`row * size + col`)
    ///
    /// Rows run along world z, columns along world x.
    surface_heights: Vec<i32>,
    /// Voxels emitted so far
    voxels: Vec<Point3<i32>>,
}

impl ChunkBuilder {
    /// Creates a builder and runs the height pass from noise.
    ///
    /// # Arguments
    /// * `coord` - Coordinate of the chunk to create
    /// * `size` - Columns per side
    /// * `config` - Noise parameters
    ///
    /// # Returns
    /// A builder holding one surface voxel per column
    pub fn from_noise(coord: ChunkCoord, size: i32, config: &NoiseConfig) -> Self {
        let center = chunk_center(coord, size);
        let grid = generate_height_map(
            size.max(0) as usize,
            config,
            Point2::new(center.x as f64, center.y as f64),
            true,
        );
        let surface_heights = grid
            .iter()
            .flatten()
            .map(|noise| (noise * config.height).floor() as i32)
            .collect();
        Self::from_surface_heights(coord, size, surface_heights)
    }

    /// Creates a builder from precomputed surface heights and runs the height pass.
    ///
    /// # Arguments
    /// * `coord` - Coordinate of the chunk to create
    /// * `size` - Columns per side
    /// * `surface_heights` - `size * size` heights, row-major with rows along z
    pub fn from_surface_heights(coord: ChunkCoord, size: i32, surface_heights: Vec<i32>) -> Self {
        debug_assert_eq!(surface_heights.len(), (size * size).max(0) as usize);
        let mut builder = ChunkBuilder {
            coord,
            size,
            voxels: Vec::with_capacity(surface_heights.len()),
            surface_heights,
        };
        for row in 0..size {
            for col in 0..size {
                let (x, z) = builder.world_column(row, col);
                builder.voxels.push(Point3::new(x, builder.height(row, col), z));
            }
        }
        builder
    }

    /// Fills the vertical gap between each column and its lowest neighbour.
    ///
    /// For a column at height `h` whose lowest in-grid Moore neighbour sits at `m < h`,
    /// voxels are added at `h - 1` down to `m + 1`. Ring columns stop after
    /// [`BOUNDARY_FILL_DEPTH`] voxels.
    pub fn fill_pass(&mut self) {
        for row in 0..self.size {
            for col in 0..self.size {
                let height = self.height(row, col);
                let lowest_neighbour = MOORE_OFFSETS
                    .iter()
                    .filter_map(|(dr, dc)| self.checked_height(row + dr, col + dc))
                    .fold(height, i32::min);
                if lowest_neighbour >= height {
                    continue;
                }

                let mut floor = lowest_neighbour + 1;
                if self.is_boundary(row, col) {
                    floor = floor.max(height - BOUNDARY_FILL_DEPTH);
                }

                let (x, z) = self.world_column(row, col);
                for y in (floor..height).rev() {
                    self.voxels.push(Point3::new(x, y, z));
                }
            }
        }
    }

    /// Finalizes creation and returns the constructed `Chunk`.
    pub fn return_chunk(self) -> Chunk {
        Chunk::from_voxels(self.coord, self.size, self.voxels)
    }

    /// Number of voxels emitted so far.
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    fn height(&self, row: i32, col: i32) -> i32 {
        self.surface_heights[(row * self.size + col) as usize]
    }

    fn checked_height(&self, row: i32, col: i32) -> Option<i32> {
        if (0..self.size).contains(&row) && (0..self.size).contains(&col) {
            Some(self.height(row, col))
        } else {
            None
        }
    }

    fn is_boundary(&self, row: i32, col: i32) -> bool {
        row == 0 || col == 0 || row == self.size - 1 || col == self.size - 1
    }

    fn world_column(&self, row: i32, col: i32) -> (i32, i32) {
        let half = self.size / 2;
        (
            self.coord.x * self.size - half + col,
            self.coord.y * self.size - half + row,
        )
    }
}
