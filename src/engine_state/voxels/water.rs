//! # Water Plane
//!
//! A single flat quad at the water level, spanning the 3×3 chunk neighbourhood around
//! the player. It is re-centred whenever the player enters another chunk, so the
//! renderer only ever draws one quad.

use cgmath::Point2;

use super::chunk::{chunk_center, ChunkCoord};

/// Corner indices for the quad's triangles: two facing up, then the same two facing down.
const TRIANGLE_CORNERS: [usize; 12] = [0, 3, 2, 1, 2, 0, 0, 2, 1, 2, 3, 0];

/// Half the side of the plane, in chunks.
const HALF_EXTENT_CHUNKS: f32 = 1.5;

/// The water surface drawn around the loaded neighbourhood.
#[derive(Clone, Debug, PartialEq)]
pub struct WaterPlane {
    coord: ChunkCoord,
    size: i32,
    level: f32,
    /// Homogeneous corners, counter-clockwise from (-x, -z).
    corners: [[f32; 4]; 4],
}

impl WaterPlane {
    /// Creates the plane centred on the chunk at `coord`.
    ///
    /// # Arguments
    /// * `coord` - Chunk the player stands in
    /// * `size` - Chunk side length
    /// * `level` - Height of the water surface
    pub fn new(coord: ChunkCoord, size: i32, level: f32) -> Self {
        let mut plane = WaterPlane {
            coord,
            size,
            level,
            corners: [[0.0; 4]; 4],
        };
        plane.recompute_corners();
        plane
    }

    /// Re-centres the plane on `coord`.
    ///
    /// # Returns
    /// `true` if the plane moved.
    pub fn follow(&mut self, coord: ChunkCoord) -> bool {
        if coord == self.coord {
            return false;
        }
        self.coord = coord;
        self.recompute_corners();
        true
    }

    fn recompute_corners(&mut self) {
        let center: Point2<f32> = chunk_center(self.coord, self.size);
        let half = self.size as f32 * HALF_EXTENT_CHUNKS;
        let (x0, x1) = (center.x - half, center.x + half);
        let (z0, z1) = (center.y - half, center.y + half);
        self.corners = [
            [x0, self.level, z0, 1.0],
            [x1, self.level, z0, 1.0],
            [x1, self.level, z1, 1.0],
            [x0, self.level, z1, 1.0],
        ];
    }

    /// Chunk the plane is centred on.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Height of the surface.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// The four corners as `[x, level, z, 1]`.
    pub fn corners(&self) -> &[[f32; 4]; 4] {
        &self.corners
    }

    /// Triangle list for both faces of the quad, 4 floats per vertex.
    pub fn vertex_buffer(&self) -> Vec<f32> {
        TRIANGLE_CORNERS
            .iter()
            .flat_map(|&corner| self.corners[corner])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_spans_the_neighbourhood_at_the_water_level() {
        let plane = WaterPlane::new(Point2::new(0, 0), 16, -3.0);
        assert_eq!(plane.corners()[0], [-24.0, -3.0, -24.0, 1.0]);
        assert_eq!(plane.corners()[2], [24.0, -3.0, 24.0, 1.0]);
    }

    #[test]
    fn following_a_crossing_shifts_the_corners_by_one_chunk() {
        let mut plane = WaterPlane::new(Point2::new(0, 0), 16, 0.0);
        assert!(!plane.follow(Point2::new(0, 0)));
        assert!(plane.follow(Point2::new(1, -2)));
        assert_eq!(plane.coord(), Point2::new(1, -2));
        assert_eq!(plane.corners()[0], [-8.0, 0.0, -56.0, 1.0]);
        assert_eq!(plane.corners()[2], [40.0, 0.0, -8.0, 1.0]);
    }

    #[test]
    fn vertex_buffer_holds_both_faces() {
        let plane = WaterPlane::new(Point2::new(2, 2), 8, 1.5);
        let vertices = plane.vertex_buffer();
        assert_eq!(vertices.len(), 12 * 4);
        assert!(vertices.chunks(4).all(|v| v[1] == 1.5 && v[3] == 1.0));
        assert_eq!(&vertices[0..4], &vertices[20..24]);
    }
}
