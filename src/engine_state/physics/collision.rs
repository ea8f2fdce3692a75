//! Collision tests between the player body and voxel colliders.

use crate::engine_state::voxels::colliders::{CubeCollider, CylinderCollider};

/// Tests whether the bottom of `cylinder` is resting in the top half of `cube`.
///
/// The bottom point, widened by the cylinder radius, must overlap the cube's horizontal
/// extent, and its height must lie in `(cube.y, cube.y + half_extent]`.
///
/// # Arguments
/// * `cube` - Voxel collider to test against
/// * `cylinder` - Player body
///
/// # Returns
/// `true` if the player should be lifted onto the cube.
pub fn simple_vert_collision(cube: &CubeCollider, cylinder: &CylinderCollider) -> bool {
    let bottom = cylinder.end;
    let (min, max) = (cube.min(), cube.max());

    let overlaps_x = bottom.x + cylinder.radius >= min.x && bottom.x - cylinder.radius <= max.x;
    let overlaps_z = bottom.z + cylinder.radius >= min.z && bottom.z - cylinder.radius <= max.z;
    let center_y = cube.position().y;
    let within_top_half = bottom.y > center_y && bottom.y <= center_y + cube.half_extent();

    overlaps_x && overlaps_z && within_top_half
}
