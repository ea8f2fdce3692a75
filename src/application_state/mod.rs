//! # Application State Management
//!
//! This module sits between a front end (the browser, or the headless native runner)
//! and the engine:
//! - Configuration loading
//! - Input handling
//! - Frame timing

pub mod config;
pub mod input_manager;
pub mod input_state;

use config::EngineConfig;
use input_manager::InputManager;
use web_time::{Duration, Instant};

use crate::engine_state::{TerrainEngine, TickReport};

/// Longest tick the engine is stepped by; longer gaps (a backgrounded tab) are clamped.
const MAX_FRAME_TIME: Duration = Duration::from_millis(100);

/// The running application: the engine plus the input and timing around it.
pub struct ApplicationState {
    /// The core engine state and logic
    pub engine_state: TerrainEngine,

    /// Collects input events between frames
    pub input_manager: InputManager,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: Instant,
}

impl ApplicationState {
    /// Creates the engine from `config` and starts the frame clock.
    pub fn new(config: EngineConfig) -> Self {
        ApplicationState {
            engine_state: TerrainEngine::new(config),
            input_manager: InputManager::new(),
            last_wait_time: Instant::now(),
        }
    }

    /// Steps the engine by the wall-clock time since the previous frame.
    pub fn frame(&mut self) -> TickReport {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_wait_time).min(MAX_FRAME_TIME);
        self.last_wait_time = now;
        self.step(elapsed)
    }

    /// Steps the engine by a fixed `dt`, consuming the input gathered since last step.
    pub fn step(&mut self, dt: Duration) -> TickReport {
        let input = self.input_manager.create_tick_input();
        let report = self.engine_state.tick(&input, dt);
        if report.crossed_chunk {
            log::debug!(
                "Neighbourhood now holds {} voxels",
                self.engine_state.voxel_count()
            );
        }
        report
    }
}
