//! # Player Physics
//!
//! This module moves the player through the terrain once per tick.
//!
//! ## Movement model
//!
//! The player's position is the top of its body (the eye point); the body itself is a
//! `CylinderCollider` hanging `player_height` below it. Each tick:
//!
//! 1. Acceleration is gravity above the water level, buoyancy below it, or zero in
//!    creative mode
//! 2. A desired velocity is derived from the movement direction
//! 3. Every velocity axis eases toward its desired value, limited to
//!    `max_acceleration * dt` per tick
//! 4. The position is integrated and the body follows it
//! 5. Outside creative mode, the body's feet are snapped onto any cube they sank into,
//!    then clamped above the highest cube of their column
//!
//! All rates are per second; the tick length arrives as a `web_time::Duration`.
//!
//! ## Water
//!
//! Below `water_level` gravity is replaced by a weak vertical push. While the eye point
//! is within half a body height under the surface the player keeps sinking slowly;
//! deeper than that the push is upward, so a swimmer bobs with the eye point about
//! `player_height / 2` under the surface instead of falling to the bottom.

use cgmath::{MetricSpace, Point3, Vector3, Zero};
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::engine_state::voxels::colliders::{CubeCollider, CylinderCollider};

pub mod collision;

use collision::simple_vert_collision;

/// Tunable physics constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Vertical acceleration outside creative mode, units/s²
    pub gravity: f32,
    /// Speed multiplier applied to the movement direction, units/s
    pub move_speed: f32,
    /// Largest per-axis velocity change, units/s²
    pub max_acceleration: f32,
    /// Extra speed multiplier while in creative mode
    pub creative_speedup: f32,
    /// Upward velocity given by a jump, units/s
    pub jump_velocity: f32,
    /// Distance from the eye point down to the feet
    pub player_height: f32,
    /// Radius of the body cylinder
    pub player_radius: f32,
    /// Only cubes this close to the feet are tested for collision
    pub collision_reach: f32,
    /// Height of the water surface
    pub water_level: f32,
    /// Magnitude of the vertical acceleration in water, units/s²
    pub buoyancy: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: -9.8,
            move_speed: 10.0,
            max_acceleration: 20.0,
            creative_speedup: 4.0,
            jump_velocity: 8.0,
            player_height: 2.0,
            player_radius: 0.1,
            collision_reach: 8.0,
            // Below the lowest terrain the noise field produces.
            water_level: -30.0,
            buoyancy: 2.0,
        }
    }
}

/// The player body and its motion state.
#[derive(Clone, Debug)]
pub struct Player {
    /// Eye point; top of the body
    position: Point3<f32>,
    velocity: Vector3<f32>,
    acceleration: Vector3<f32>,
    /// Body hanging from `position`
    collider: CylinderCollider,
    creative_mode: bool,
    config: PhysicsConfig,
}

impl Player {
    /// Creates a player whose eye point is at `position`.
    pub fn new(position: Point3<f32>, config: PhysicsConfig) -> Self {
        let feet = position - Vector3::new(0.0, config.player_height, 0.0);
        Player {
            position,
            velocity: Vector3::zero(),
            acceleration: Vector3::zero(),
            collider: CylinderCollider::new(position, feet, config.player_radius),
            creative_mode: false,
            config,
        }
    }

    /// Eye point of the player.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Bottom of the body.
    pub fn feet(&self) -> Point3<f32> {
        self.collider.end
    }

    /// Current velocity, units/s.
    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    /// Body collider.
    pub fn collider(&self) -> &CylinderCollider {
        &self.collider
    }

    /// Whether creative (free-flying) mode is on.
    pub fn creative_mode(&self) -> bool {
        self.creative_mode
    }

    /// Physics constants in use.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Moves the eye point to `position`, keeping velocity.
    pub fn teleport(&mut self, position: Point3<f32>) {
        self.position = position;
        self.collider.hang_from(position);
    }

    /// Switches creative mode, zeroing acceleration and vertical velocity.
    pub fn toggle_creative_mode(&mut self) {
        self.creative_mode = !self.creative_mode;
        self.acceleration = Vector3::zero();
        self.velocity.y = 0.0;
        log::info!("Creative mode {}", if self.creative_mode { "on" } else { "off" });
    }

    /// Starts a jump if the player is standing still vertically.
    ///
    /// # Returns
    /// `true` if the jump impulse was applied.
    pub fn jump(&mut self) -> bool {
        if self.creative_mode || self.velocity.y != 0.0 {
            return false;
        }
        self.velocity.y += self.config.jump_velocity;
        true
    }

    /// Advances the player by one tick.
    ///
    /// # Arguments
    /// * `direction` - Normalized movement direction, or zero
    /// * `dt` - Tick length
    /// * `colliders` - Cubes the body may land on
    /// * `ground` - Returns the highest cube in the column under world `(x, z)`
    pub fn update<G>(&mut self, direction: Vector3<f32>, dt: Duration, colliders: &[CubeCollider], ground: G)
    where
        G: Fn(f32, f32) -> Option<CubeCollider>,
    {
        let dt = dt.as_secs_f32();

        self.acceleration = if self.creative_mode {
            Vector3::zero()
        } else {
            Vector3::new(0.0, self.vertical_acceleration(), 0.0)
        };

        let mut desired = (direction + self.acceleration * dt) * self.config.move_speed;
        if self.creative_mode {
            desired *= self.config.creative_speedup;
        }

        let max_step = self.config.max_acceleration * dt;
        self.velocity.x += (desired.x - self.velocity.x).clamp(-max_step, max_step);
        self.velocity.y += (desired.y - self.velocity.y).clamp(-max_step, max_step);
        self.velocity.z += (desired.z - self.velocity.z).clamp(-max_step, max_step);

        self.position += self.velocity * dt;
        self.collider.hang_from(self.position);

        if self.creative_mode {
            return;
        }

        self.resolve_vertical_collisions(colliders);

        let feet = self.collider.end;
        if let Some(top_cube) = ground(feet.x, feet.z) {
            if feet.y < top_cube.top() {
                log::trace!("Ground clamp lifted the player onto {:?}", top_cube.voxel());
                self.rest_on(&top_cube);
            }
        }
    }

    /// Gravity above the water, then a slow sink near the surface and buoyancy deeper.
    fn vertical_acceleration(&self) -> f32 {
        let depth = self.config.water_level - self.position.y;
        if depth <= 0.0 {
            self.config.gravity
        } else if depth < self.config.player_height * 0.5 {
            -self.config.buoyancy
        } else {
            self.config.buoyancy
        }
    }

    /// Whether the eye point is below the water surface.
    pub fn submerged(&self) -> bool {
        self.position.y < self.config.water_level
    }

    fn resolve_vertical_collisions(&mut self, colliders: &[CubeCollider]) {
        for cube in colliders {
            if cube.position().distance(self.collider.end) > self.config.collision_reach {
                continue;
            }
            if !simple_vert_collision(cube, &self.collider) {
                continue;
            }
            if self.velocity.y > 0.0 {
                break;
            }
            self.rest_on(cube);
        }
    }

    fn rest_on(&mut self, cube: &CubeCollider) {
        self.position.y = cube.top() + self.config.player_height;
        if self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }
        self.collider.hang_from(self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(16);

    fn floor() -> Vec<CubeCollider> {
        let mut cubes = Vec::new();
        for x in -2..=2 {
            for z in -2..=2 {
                cubes.push(CubeCollider::from_voxel(Point3::new(x, 0, z)));
            }
        }
        cubes
    }

    fn floor_top(x: f32, z: f32) -> Option<CubeCollider> {
        let (x, z) = (x.round() as i32, z.round() as i32);
        if (-2..=2).contains(&x) && (-2..=2).contains(&z) {
            Some(CubeCollider::from_voxel(Point3::new(x, 0, z)))
        } else {
            None
        }
    }

    fn settle(player: &mut Player, ticks: usize) {
        let cubes = floor();
        for _ in 0..ticks {
            player.update(Vector3::zero(), TICK, &cubes, floor_top);
        }
    }

    #[test]
    fn falling_player_comes_to_rest_on_the_floor() {
        let mut player = Player::new(Point3::new(0.0, 3.0, 0.0), PhysicsConfig::default());
        settle(&mut player, 200);
        assert!((player.position().y - 2.5).abs() < 1e-4);
        assert!((player.feet().y - 0.5).abs() < 1e-4);
        assert_eq!(player.velocity().y, 0.0);
    }

    #[test]
    fn jump_needs_zero_vertical_velocity() {
        let mut player = Player::new(Point3::new(0.0, 3.0, 0.0), PhysicsConfig::default());
        settle(&mut player, 200);

        assert!(player.jump());
        assert_eq!(player.velocity().y, 8.0);
        assert!(!player.jump());

        player.update(Vector3::zero(), TICK, &floor(), floor_top);
        assert!(player.position().y > 2.5);
    }

    #[test]
    fn creative_mode_ignores_gravity_and_jumps() {
        let mut player = Player::new(Point3::new(0.0, 10.0, 0.0), PhysicsConfig::default());
        player.toggle_creative_mode();
        assert!(player.creative_mode());
        assert!(!player.jump());

        settle(&mut player, 50);
        assert_eq!(player.position(), Point3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn toggling_creative_mode_stops_vertical_motion() {
        let mut player = Player::new(Point3::new(0.0, 10.0, 0.0), PhysicsConfig::default());
        settle(&mut player, 10);
        assert!(player.velocity().y < 0.0);
        player.toggle_creative_mode();
        assert_eq!(player.velocity().y, 0.0);
    }

    #[test]
    fn velocity_change_is_rate_limited() {
        let mut player = Player::new(Point3::new(0.0, 10.0, 0.0), PhysicsConfig::default());
        player.toggle_creative_mode();
        player.update(Vector3::unit_x(), Duration::from_millis(100), &[], |_, _| None);
        // max_acceleration 20 * 0.1 s
        assert!((player.velocity().x - 2.0).abs() < 1e-5);
        assert_eq!(player.velocity().z, 0.0);
    }

    fn lake(water_level: f32) -> PhysicsConfig {
        PhysicsConfig {
            water_level,
            ..PhysicsConfig::default()
        }
    }

    #[test]
    fn sinking_stops_inside_the_water_band() {
        let mut player = Player::new(Point3::new(0.0, 15.0, 0.0), lake(10.0));
        let mut lowest = f32::MAX;
        for _ in 0..1200 {
            player.update(Vector3::zero(), TICK, &[], |_, _| None);
            lowest = lowest.min(player.position().y);
        }
        assert!(player.submerged());
        // Bobs around one half body height under the surface.
        assert!(lowest > 8.75);
        assert!((player.position().y - 9.0).abs() < 0.25);
    }

    #[test]
    fn deep_player_floats_up() {
        let mut player = Player::new(Point3::new(0.0, 2.0, 0.0), lake(10.0));
        player.update(Vector3::zero(), TICK, &[], |_, _| None);
        assert!(player.velocity().y > 0.0);
        assert!(player.position().y > 2.0);
    }

    #[test]
    fn water_below_the_floor_leaves_landing_unchanged() {
        let mut player = Player::new(Point3::new(0.0, 3.0, 0.0), lake(-5.0));
        settle(&mut player, 200);
        assert!(!player.submerged());
        assert!((player.position().y - 2.5).abs() < 1e-4);
    }

    #[test]
    fn ground_clamp_lifts_feet_out_of_a_column() {
        let mut player = Player::new(Point3::new(0.0, 1.0, 0.0), PhysicsConfig::default());
        player.update(Vector3::zero(), TICK, &[], floor_top);
        assert!((player.feet().y - 0.5).abs() < 1e-4);
    }
}
