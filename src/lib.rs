#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Terrain
//!
//! A procedural voxel terrain engine for a first-person walking simulator.
//!
//! The world is generated chunk by chunk from layered Perlin noise. The chunk the player
//! stands in and its eight neighbours stay loaded; chunks that leave that neighbourhood
//! are remembered in a bounded cache together with the voxels the player mined out of
//! them. The player walks, jumps and falls against per-voxel colliders, and mines the
//! voxel under the crosshair by aiming at it for a moment.
//!
//! ## Key Modules
//!
//! * `application_state` - Configuration, input handling and frame timing
//! * `engine_state` - Terrain generation, chunk management, physics and raycasting
//!
//! ## Usage
//!
//! ```no_run
//! use voxel_terrain::{EngineConfig, TerrainEngine, TickInput};
//! use web_time::Duration;
//!
//! let mut engine = TerrainEngine::new(EngineConfig::default());
//! let report = engine.tick(&TickInput::default(), Duration::from_millis(16));
//! let (positions, count) = engine.instance_buffer();
//! assert_eq!(positions.len(), 4 * count);
//! # let _ = report;
//! ```
//!
//! The native binary runs a headless scripted walk; on the web, `WebTerrain` exposes the
//! engine to a JavaScript renderer.

use cfg_if::cfg_if;

pub mod application_state;
pub mod engine_state;

cfg_if! {
    if #[cfg(target_family = "wasm")] {
        mod web;
        pub use web::WebTerrain;
    } else {
        use application_state::ApplicationState;
        use log::info;
        use web_time::Duration;

        /// Fixed tick length of the headless walk.
        const SCRIPTED_TICK: Duration = Duration::from_millis(16);

        /// Ticks spent walking in each direction of the headless walk.
        const SCRIPTED_LEG_TICKS: usize = 600;
    }
}

pub use application_state::config::EngineConfig;
pub use application_state::input_state::{MovementIntent, NoiseTuning};
pub use engine_state::voxels::noise_field::NoiseConfig;
pub use engine_state::{TerrainEngine, TickInput, TickReport};

/// Runs the headless scripted walk.
///
/// Reads an optional JSON configuration path from the first command-line argument,
/// walks the player east and then north across chunk boundaries, mines the voxel
/// underfoot, and logs what happened along the way.
#[cfg(not(target_family = "wasm"))]
pub fn run() -> anyhow::Result<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let config = EngineConfig::load_or_default(std::env::args().nth(1))?;
    info!("Using noise configuration {:?}", config.noise);

    let mut state = ApplicationState::new(config);
    info!(
        "Spawned at {:?} with {} voxels loaded",
        state.engine_state.player().position(),
        state.engine_state.voxel_count()
    );

    // At yaw 0 forward is +x and strafing right is +z.
    let legs = [("KeyW", "east"), ("KeyD", "north")];
    let mut crossings = 0;
    for (key, heading) in legs {
        state.input_manager.intake_key(key, true);
        for _ in 0..SCRIPTED_LEG_TICKS {
            if state.step(SCRIPTED_TICK).crossed_chunk {
                crossings += 1;
                info!(
                    "Walking {}: entered chunk {:?}, {} voxels loaded",
                    heading,
                    state.engine_state.chunks().current_chunk().coord(),
                    state.engine_state.voxel_count()
                );
            }
        }
        state.input_manager.intake_key(key, false);
    }

    let feet = state.engine_state.player().feet();
    if let Some(ground) = state.engine_state.chunks().top_cube_at(feet.x, feet.z) {
        let removed = state.engine_state.remove_cube(ground.voxel());
        info!("Mined {:?} underfoot: {}", ground.voxel(), removed);
    }

    let (positions, count) = state.engine_state.instance_buffer();
    info!(
        "Walk finished after {} chunk crossings at {:?}: {} instances ({} floats), {} chunks cached",
        crossings,
        state.engine_state.player().position(),
        count,
        positions.len(),
        state.engine_state.chunks().cache().len()
    );
    info!(
        "Water plane at y = {} centred on chunk {:?}",
        state.engine_state.water().level(),
        state.engine_state.water().coord()
    );
    Ok(())
}

/// Installs the browser logger and panic hook. Called once when the module loads.
#[cfg(target_family = "wasm")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_web() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Logger was already initialized");
    }
}
