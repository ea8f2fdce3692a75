//! # Engine State Module
//!
//! The core engine module that owns the terrain, the player and the camera, and steps
//! them once per tick.
//!
//! ## Key Components
//!
//! * `TerrainEngine` - The main state container and per-tick driver
//! * `camera` - First-person orientation steering movement and aim
//! * `physics` - Player movement and vertical collision
//! * `raycast` - Ray intersection tests and block targeting
//! * `voxels` - Noise, chunks, the chunk cache and the chunk manager
//!
//! ## Tick order
//!
//! 1. Noise tuning and mode toggles are applied
//! 2. The camera turns and the player moves, colliding with nearby cubes
//! 3. The chunk manager reloads the neighbourhood if the player changed chunk, and the
//!    water plane follows
//! 4. The targeting ray picks a voxel and, after enough mining, removes it
//!
//! Everything runs inline on the calling thread; a tick that crosses a chunk boundary
//! pays for generating whichever neighbours are not cached.

use cgmath::Point3;
use web_time::Duration;

use crate::application_state::config::EngineConfig;
use crate::application_state::input_state::{MovementIntent, NoiseTuning};
use camera::Camera;
use physics::Player;
use raycast::{targeting::BlockTargeter, Ray};
use voxels::{chunk_manager::ChunkManager, noise_field::NoiseConfig, water::WaterPlane};

pub mod camera;
pub mod physics;
pub mod raycast;
pub mod voxels;

/// Height above the spawn column's top cube at which the player's feet start.
const SPAWN_CLEARANCE: f32 = 1.0;

/// Everything the engine needs from the outside for one tick.
#[derive(Clone, Debug, Default)]
pub struct TickInput {
    /// Held movement keys
    pub movement: MovementIntent,
    /// Mouse movement to turn the camera by, in pixels
    pub look_delta: Option<(f64, f64)>,
    /// Jump was pressed this tick
    pub jump: bool,
    /// Creative mode toggle was pressed this tick
    pub toggle_creative: bool,
    /// Reset was pressed this tick
    pub reset: bool,
    /// The mine input is held
    pub mining: bool,
    /// Aim ray in world space; defaults to the camera's look ray from the eye point
    pub target_ray: Option<Ray>,
    /// Noise hotkeys pressed this tick
    pub tuning: Vec<NoiseTuning>,
}

/// What happened during a tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// The player entered a different chunk
    pub crossed_chunk: bool,
    /// Noise tuning regenerated the neighbourhood
    pub retuned: bool,
    /// The voxel mined out this tick
    pub removed: Option<Point3<i32>>,
    /// The voxel under the aim ray after this tick
    pub target: Option<Point3<i32>>,
}

impl TickReport {
    /// Whether the instance buffer differs from the previous tick's.
    pub fn terrain_changed(&self) -> bool {
        self.crossed_chunk || self.retuned || self.removed.is_some()
    }
}

/// The main state container for the terrain engine.
pub struct TerrainEngine {
    /// Settings the engine was built with; `noise` tracks live tuning
    config: EngineConfig,
    /// Loaded terrain around the player
    chunks: ChunkManager,
    /// The player body
    player: Player,
    /// The player's view
    camera: Camera,
    /// Mining progress
    targeter: BlockTargeter,
    /// Water surface around the loaded chunks
    water: WaterPlane,
}

impl TerrainEngine {
    /// Creates an engine and spawns the player above the origin.
    pub fn new(config: EngineConfig) -> Self {
        let origin = Point3::new(0.0, 0.0, 0.0);
        let chunks = ChunkManager::new(&config.chunk, config.noise.clone(), origin);
        let player = Player::new(spawn_point(&chunks, &config), config.physics.clone());
        let targeter = BlockTargeter::new(config.targeting.clone());
        let water = WaterPlane::new(
            chunks.current_chunk().coord(),
            chunks.chunk_size(),
            config.physics.water_level,
        );

        log::info!(
            "Terrain engine ready: {} voxels around spawn {:?}",
            chunks.voxel_count(),
            player.position()
        );

        TerrainEngine {
            config,
            chunks,
            player,
            camera: Camera::default(),
            targeter,
            water,
        }
    }

    /// Advances the simulation by `dt`.
    pub fn tick(&mut self, input: &TickInput, dt: Duration) -> TickReport {
        for tuning in &input.tuning {
            self.apply_tuning(*tuning);
        }
        let reset_crossed = input.reset && self.reset();
        if input.toggle_creative {
            self.player.toggle_creative_mode();
        }
        if let Some(delta) = input.look_delta {
            self.camera.rotate(delta, dt);
        }
        if input.jump {
            self.player.jump();
        }

        let direction = input.movement.direction(
            self.camera.forward(),
            self.camera.right(),
            self.player.creative_mode(),
        );
        let colliders = self
            .chunks
            .collision_candidates(self.player.feet(), self.config.physics.collision_reach);
        let chunks = &self.chunks;
        self.player
            .update(direction, dt, &colliders, |x, z| chunks.top_cube_at(x, z));

        let crossed_chunk = self.chunks.update(self.player.position()) || reset_crossed;
        self.water.follow(self.chunks.current_chunk().coord());

        let ray = input
            .target_ray
            .unwrap_or_else(|| Ray::new(self.player.position(), self.camera.look_vector()));
        let candidates = self
            .chunks
            .colliders_within(ray.origin(), self.config.targeting.reach);
        let mined = self.targeter.update(&ray, input.mining, &candidates, dt);
        let removed = mined.filter(|voxel| self.chunks.remove_cube(*voxel));

        log::trace!(
            "Tick {:?}: player {:?}, velocity {:?}",
            dt,
            self.player.position(),
            self.player.velocity()
        );

        TickReport {
            crossed_chunk,
            retuned: !input.tuning.is_empty(),
            removed,
            target: self.targeter.target(),
        }
    }

    /// Nudges one noise parameter and regenerates the neighbourhood.
    pub fn apply_tuning(&mut self, tuning: NoiseTuning) {
        let mut noise = self.chunks.noise_config().clone();
        tuning.apply(&mut noise);
        self.set_noise_config(noise);
    }

    /// Replaces the noise parameters and regenerates the neighbourhood.
    pub fn set_noise_config(&mut self, noise: NoiseConfig) {
        self.config.noise = noise.clone();
        self.chunks.set_noise_config(noise);
    }

    /// Puts the player back above the origin.
    ///
    /// # Returns
    /// `true` if the neighbourhood had to be reloaded around the origin.
    pub fn reset(&mut self) -> bool {
        let crossed = self.chunks.update(Point3::new(0.0, 0.0, 0.0));
        self.water.follow(self.chunks.current_chunk().coord());
        let spawn = spawn_point(&self.chunks, &self.config);
        self.player = Player::new(spawn, self.config.physics.clone());
        self.camera = Camera::default();
        log::info!("Player reset to {:?}", spawn);
        crossed
    }

    /// Removes the voxel at `position` if it lies in a loaded chunk.
    pub fn remove_cube(&mut self, position: Point3<i32>) -> bool {
        self.chunks.remove_cube(position)
    }

    /// Instance buffer for the whole neighbourhood: 4 floats per voxel, and the count.
    pub fn instance_buffer(&self) -> (Vec<f32>, usize) {
        self.chunks.instance_buffer()
    }

    /// Voxels currently loaded.
    pub fn voxel_count(&self) -> usize {
        self.chunks.voxel_count()
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Moves the player's eye point, e.g. for scripted walks.
    pub fn teleport_player(&mut self, position: Point3<f32>) -> bool {
        self.player.teleport(position);
        let crossed = self.chunks.update(position);
        self.water.follow(self.chunks.current_chunk().coord());
        crossed
    }

    /// The water surface, centred on the player's chunk.
    pub fn water(&self) -> &WaterPlane {
        &self.water
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The chunk manager.
    pub fn chunks(&self) -> &ChunkManager {
        &self.chunks
    }

    /// Settings in use, including any live noise tuning.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

fn spawn_point(chunks: &ChunkManager, config: &EngineConfig) -> Point3<f32> {
    let ground = chunks.top_cube_at(0.0, 0.0).map_or(0.0, |cube| cube.top());
    Point3::new(0.0, ground + SPAWN_CLEARANCE + config.physics.player_height, 0.0)
}

#[cfg(test)]
mod tests {
    use cgmath::{Point2, Vector3};

    use super::*;
    use crate::engine_state::voxels::chunk::max_chunk_coord;
    use crate::engine_state::voxels::chunk_manager::ChunkSettings;

    fn small_engine() -> TerrainEngine {
        TerrainEngine::new(EngineConfig {
            chunk: ChunkSettings {
                size: 16,
                cache_capacity: 64,
            },
            ..EngineConfig::default()
        })
    }

    #[test]
    fn player_spawns_above_the_terrain_and_lands() {
        let mut engine = small_engine();
        let ground = engine
            .chunks()
            .top_cube_at(0.0, 0.0)
            .expect("origin column is loaded")
            .top();
        assert!(engine.player().feet().y > ground);

        for _ in 0..300 {
            engine.tick(&TickInput::default(), Duration::from_millis(16));
        }
        assert!((engine.player().feet().y - ground).abs() < 1e-3);
    }

    #[test]
    fn tuning_regenerates_the_neighbourhood() {
        let mut engine = small_engine();
        let before = engine.config().noise.height;
        let input = TickInput {
            tuning: vec![NoiseTuning::HeightUp],
            ..TickInput::default()
        };
        engine.tick(&input, Duration::from_millis(16));
        assert_eq!(engine.config().noise.height, before + 1.0);
        assert_eq!(engine.chunks().noise_config().height, before + 1.0);
    }

    #[test]
    fn mining_removes_the_aimed_voxel() {
        let mut engine = small_engine();
        let top = engine
            .chunks()
            .top_cube_at(3.0, 3.0)
            .expect("column is loaded");
        let eye = top.position() + Vector3::new(0.0, 3.0, 0.0);
        let input = TickInput {
            mining: true,
            target_ray: Some(Ray::new(eye, Vector3::new(0.0, -1.0, 0.0))),
            ..TickInput::default()
        };

        let mut removed = None;
        for _ in 0..10 {
            let report = engine.tick(&input, Duration::from_millis(50));
            if report.removed.is_some() {
                removed = report.removed;
                break;
            }
        }
        assert_eq!(removed, Some(top.voxel()));
        assert!(!engine.chunks().current_chunk().voxels().contains(&top.voxel()));
    }

    #[test]
    fn water_plane_follows_teleports_and_resets() {
        let mut engine = small_engine();
        assert_eq!(engine.water().coord(), Point2::new(0, 0));
        assert_eq!(engine.water().level(), engine.config().physics.water_level);

        assert!(engine.teleport_player(Point3::new(40.0, 30.0, -20.0)));
        assert_eq!(engine.water().coord(), Point2::new(3, -1));
        assert_eq!(engine.water().corners()[0][0], 48.0 - 24.0);

        assert!(engine.reset());
        assert_eq!(engine.water().coord(), Point2::new(0, 0));
    }

    #[test]
    fn far_teleport_clamps_instead_of_overflowing() {
        let mut engine = small_engine();
        assert!(engine.teleport_player(Point3::new(1.0e12, 10.0, 0.0)));
        let coord = engine.chunks().current_chunk().coord();
        assert_eq!(coord.x, max_chunk_coord(16));
        assert_eq!(coord.y, 0);
    }
}
