//! # Raycasting
//!
//! Ray intersection tests used to pick the voxel the player is looking at.
//!
//! Both tests report "no hit" through sentinel values rather than `Option`, since they
//! run over every nearby collider on each tick: [`NO_HIT`] for the cube test and the
//! pair `(NO_HIT, NO_HIT)` for the cylinder test. Callers only accept `t > 0`.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::voxels::colliders::{CubeCollider, CylinderCollider};

pub mod targeting;

/// Returned by the intersection tests when the ray misses.
pub const NO_HIT: f32 = -1.0;

/// Cross products shorter than this treat the ray as parallel to a cylinder's axis.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A ray with a unit direction and its precomputed component-wise inverse.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    origin: Point3<f32>,
    direction: Vector3<f32>,
    inv_direction: Vector3<f32>,
}

impl Ray {
    /// Creates a ray from `origin` along `direction`. The direction is normalized.
    ///
    /// A zero direction is kept as zero; such a ray hits nothing.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        let direction = if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            direction
        };
        Ray {
            origin,
            direction,
            inv_direction: Vector3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z),
        }
    }

    /// Start of the ray.
    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    /// Unit direction of the ray.
    pub fn direction(&self) -> Vector3<f32> {
        self.direction
    }

    /// Point at parameter `t`.
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    fn is_degenerate(&self) -> bool {
        self.direction.magnitude2() == 0.0
    }
}

/// Slab-method intersection of `ray` with the cube `cube`.
///
/// # Returns
/// The distance along the ray to the cube's entry point, or [`NO_HIT`]. A ray starting
/// inside the cube reports the distance back to the entry face.
pub fn ray_cube_intersection(ray: &Ray, cube: &CubeCollider) -> f32 {
    if ray.is_degenerate() {
        return NO_HIT;
    }

    let (min, max) = (cube.min(), cube.max());
    let inv = ray.inv_direction;
    let origin = ray.origin;

    let tx0 = (min.x - origin.x) * inv.x;
    let tx1 = (max.x - origin.x) * inv.x;
    let ty0 = (min.y - origin.y) * inv.y;
    let ty1 = (max.y - origin.y) * inv.y;
    let tz0 = (min.z - origin.z) * inv.z;
    let tz1 = (max.z - origin.z) * inv.z;

    let t_min = tx0.min(tx1).max(ty0.min(ty1)).max(tz0.min(tz1));
    let t_max = tx0.max(tx1).min(ty0.max(ty1)).min(tz0.max(tz1));

    // Entire cube behind the origin, or the slabs never overlap.
    if t_max < 0.0 || t_min > t_max {
        return NO_HIT;
    }
    t_min.abs()
}

/// Intersection of `ray` with the finite cylinder `cylinder`.
///
/// The ray is projected onto the plane perpendicular to the cylinder's axis and the
/// resulting circle test solved as a quadratic.
///
/// # Returns
/// `(t0, t1)`, nearest root first. A root behind the ray or outside the cylinder's
/// height is [`NO_HIT`]. Both are [`NO_HIT`] on a miss or when the ray runs parallel to
/// the axis.
pub fn ray_cylinder_intersection(ray: &Ray, cylinder: &CylinderCollider) -> (f32, f32) {
    let miss = (NO_HIT, NO_HIT);
    let axis = cylinder.end - cylinder.start;
    if ray.is_degenerate() || axis.magnitude2() == 0.0 {
        return miss;
    }
    let axis = axis.normalize();
    if ray.direction.cross(axis).magnitude() < PARALLEL_EPSILON {
        return miss;
    }

    let to_origin = ray.origin - cylinder.start;
    let direction_perp = ray.direction - axis * ray.direction.dot(axis);
    let origin_perp = to_origin - axis * to_origin.dot(axis);

    let a = direction_perp.magnitude2();
    let b = 2.0 * direction_perp.dot(origin_perp);
    let c = origin_perp.magnitude2() - cylinder.radius * cylinder.radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return miss;
    }

    let root = discriminant.sqrt();
    let within_height = |t: f32| {
        let along_axis = (ray.at(t) - cylinder.start).dot(axis);
        if t > 0.0 && (0.0..=cylinder.height).contains(&along_axis) {
            t
        } else {
            NO_HIT
        }
    };

    (
        within_height((-b - root) / (2.0 * a)),
        within_height((-b + root) / (2.0 * a)),
    )
}
