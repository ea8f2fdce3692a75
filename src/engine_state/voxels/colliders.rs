//! # Colliders
//!
//! Bounding volumes shared by the chunk, physics and raycasting code.
//!
//! * `CubeCollider` - the axis-aligned unit cube around one voxel
//! * `CylinderCollider` - the upright player body, described by its top and bottom points

use cgmath::{MetricSpace, Point3, Vector3};

/// Side length of a voxel, in world units.
pub const CUBE_LEN: f32 = 1.0;

/// An axis-aligned cube centered on a voxel position.
///
/// Colliders carry no state besides their position, so two colliders with the same
/// center are the same collider.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubeCollider {
    position: Point3<f32>,
    side_length: f32,
}

impl CubeCollider {
    /// Creates a unit collider centered on an integer voxel position.
    pub fn from_voxel(voxel: Point3<i32>) -> Self {
        Self::new(Point3::new(voxel.x as f32, voxel.y as f32, voxel.z as f32))
    }

    /// Creates a unit collider centered at `position`.
    pub fn new(position: Point3<f32>) -> Self {
        CubeCollider {
            position,
            side_length: CUBE_LEN,
        }
    }

    /// Center of the cube.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Side length of the cube.
    pub fn side_length(&self) -> f32 {
        self.side_length
    }

    /// Half the side length.
    pub fn half_extent(&self) -> f32 {
        self.side_length / 2.0
    }

    /// Minimum corner of the cube.
    pub fn min(&self) -> Point3<f32> {
        let h = self.half_extent();
        self.position - Vector3::new(h, h, h)
    }

    /// Maximum corner of the cube.
    pub fn max(&self) -> Point3<f32> {
        let h = self.half_extent();
        self.position + Vector3::new(h, h, h)
    }

    /// Height of the cube's top face.
    pub fn top(&self) -> f32 {
        self.position.y + self.half_extent()
    }

    /// The integer voxel position this collider was built from.
    pub fn voxel(&self) -> Point3<i32> {
        Point3::new(
            self.position.x.round() as i32,
            self.position.y.round() as i32,
            self.position.z.round() as i32,
        )
    }
}

/// An upright cylinder used as the player's body.
///
/// `start` is the top (head) point and `end` the bottom (feet) point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CylinderCollider {
    /// Top of the cylinder.
    pub start: Point3<f32>,
    /// Bottom of the cylinder.
    pub end: Point3<f32>,
    /// Radius around the start-end axis.
    pub radius: f32,
    /// Distance between `start` and `end`, fixed at construction.
    pub height: f32,
}

impl CylinderCollider {
    /// Creates a cylinder between `start` and `end`; the height is derived from them.
    pub fn new(start: Point3<f32>, end: Point3<f32>, radius: f32) -> Self {
        CylinderCollider {
            start,
            end,
            radius,
            height: start.distance(end),
        }
    }

    /// Moves the cylinder so its top sits at `head`, keeping its height.
    pub fn hang_from(&mut self, head: Point3<f32>) {
        self.start = head;
        self.end = head - Vector3::new(0.0, self.height, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_bounds_surround_the_center() {
        let cube = CubeCollider::from_voxel(Point3::new(3, -2, 7));
        assert_eq!(cube.min(), Point3::new(2.5, -2.5, 6.5));
        assert_eq!(cube.max(), Point3::new(3.5, -1.5, 7.5));
        assert_eq!(cube.top(), -1.5);
        assert_eq!(cube.voxel(), Point3::new(3, -2, 7));
    }

    #[test]
    fn cylinder_height_follows_its_endpoints() {
        let mut cylinder =
            CylinderCollider::new(Point3::new(0.0, 5.0, 0.0), Point3::new(0.0, 3.0, 0.0), 0.1);
        assert_eq!(cylinder.height, 2.0);

        cylinder.hang_from(Point3::new(1.0, 10.0, -1.0));
        assert_eq!(cylinder.end, Point3::new(1.0, 8.0, -1.0));
        assert_eq!(cylinder.height, 2.0);
    }
}
