//! # Block Targeting
//!
//! Picks the voxel under the player's aim and decides when holding the mine input long
//! enough should remove it.

use cgmath::{MetricSpace, Point3};
use serde::{Deserialize, Serialize};
use web_time::Duration;

use super::{ray_cube_intersection, Ray};
use crate::engine_state::voxels::colliders::CubeCollider;

/// How far and how long the player mines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    /// Colliders farther than this from the ray origin are ignored
    pub reach: f32,
    /// How long the same voxel must stay targeted before it is removed
    pub mine_duration_ms: u64,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        TargetingConfig {
            reach: 8.0,
            mine_duration_ms: 400,
        }
    }
}

/// Returns the nearest collider hit by `ray` within `reach` of its origin.
///
/// # Returns
/// The hit collider and its distance along the ray, or `None` if nothing in reach is
/// hit in front of the origin.
pub fn nearest_target(ray: &Ray, colliders: &[CubeCollider], reach: f32) -> Option<(CubeCollider, f32)> {
    let mut best: Option<(CubeCollider, f32)> = None;
    for cube in colliders {
        if cube.position().distance(ray.origin()) > reach {
            continue;
        }
        let t = ray_cube_intersection(ray, cube);
        let closer = match best {
            Some((_, best_t)) => t < best_t,
            None => true,
        };
        if t > 0.0 && closer {
            best = Some((*cube, t));
        }
    }
    best
}

/// Tracks how long one voxel has been aimed at while mining.
#[derive(Debug)]
pub struct BlockTargeter {
    config: TargetingConfig,
    target: Option<Point3<i32>>,
    held: Duration,
}

impl BlockTargeter {
    /// Creates a targeter with no target.
    pub fn new(config: TargetingConfig) -> Self {
        BlockTargeter {
            config,
            target: None,
            held: Duration::ZERO,
        }
    }

    /// The voxel currently aimed at, if any.
    pub fn target(&self) -> Option<Point3<i32>> {
        self.target
    }

    /// Targeting settings in use.
    pub fn config(&self) -> &TargetingConfig {
        &self.config
    }

    /// Updates the target for this tick.
    ///
    /// # Arguments
    /// * `ray` - Aim ray
    /// * `mining` - Whether the mine input is held
    /// * `colliders` - Candidate colliders
    /// * `dt` - Tick length
    ///
    /// # Returns
    /// The voxel to remove, once the same voxel has been mined for the configured time.
    pub fn update(&mut self, ray: &Ray, mining: bool, colliders: &[CubeCollider], dt: Duration) -> Option<Point3<i32>> {
        let target = nearest_target(ray, colliders, self.config.reach).map(|(cube, _)| cube.voxel());

        if target != self.target || !mining {
            self.held = Duration::ZERO;
        }
        self.target = target;

        let voxel = target.filter(|_| mining)?;
        self.held += dt;
        log::trace!("Mining {:?} for {:?}", voxel, self.held);

        if self.held >= Duration::from_millis(self.config.mine_duration_ms) {
            self.held = Duration::ZERO;
            self.target = None;
            return Some(voxel);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;

    fn wall() -> Vec<CubeCollider> {
        (0..5)
            .map(|z| CubeCollider::from_voxel(Point3::new(0, 0, z)))
            .collect()
    }

    fn aim() -> Ray {
        Ray::new(Point3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0))
    }

    #[test]
    fn nearest_hit_wins() {
        let (cube, t) = nearest_target(&aim(), &wall(), 8.0).expect("wall is hit");
        assert_eq!(cube.voxel(), Point3::new(0, 0, 0));
        assert!((t - 2.5).abs() < 1e-6);
    }

    #[test]
    fn colliders_out_of_reach_are_ignored() {
        assert!(nearest_target(&aim(), &wall(), 2.0).is_none());
    }

    #[test]
    fn holding_on_one_voxel_mines_it() {
        let mut targeter = BlockTargeter::new(TargetingConfig::default());
        let step = Duration::from_millis(100);
        for _ in 0..3 {
            assert_eq!(targeter.update(&aim(), true, &wall(), step), None);
        }
        assert_eq!(
            targeter.update(&aim(), true, &wall(), step),
            Some(Point3::new(0, 0, 0))
        );
    }

    #[test]
    fn releasing_the_input_resets_the_timer() {
        let mut targeter = BlockTargeter::new(TargetingConfig::default());
        let step = Duration::from_millis(300);
        assert_eq!(targeter.update(&aim(), true, &wall(), step), None);
        assert_eq!(targeter.update(&aim(), false, &wall(), step), None);
        assert_eq!(targeter.update(&aim(), true, &wall(), step), None);
        assert_eq!(targeter.target(), Some(Point3::new(0, 0, 0)));
    }

    #[test]
    fn switching_target_resets_the_timer() {
        let mut targeter = BlockTargeter::new(TargetingConfig::default());
        let step = Duration::from_millis(300);
        assert_eq!(targeter.update(&aim(), true, &wall(), step), None);

        let other = Ray::new(Point3::new(0.0, 0.0, 7.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(targeter.update(&other, true, &wall(), step), None);
        assert_eq!(targeter.target(), Some(Point3::new(0, 0, 4)));
    }
}
