//! # Web Surface
//!
//! `wasm-bindgen` bindings that let a JavaScript WebGL renderer drive the engine: it
//! forwards DOM input events, calls `frame` once per animation frame, and uploads the
//! returned instance buffer.

use wasm_bindgen::prelude::*;

use crate::application_state::{config::EngineConfig, ApplicationState};

/// The engine as seen from JavaScript.
#[wasm_bindgen]
pub struct WebTerrain {
    state: ApplicationState,
}

#[wasm_bindgen]
impl WebTerrain {
    /// Creates an engine from a JSON configuration, or the defaults when `config_json`
    /// is empty.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WebTerrain, JsError> {
        let config = if config_json.trim().is_empty() {
            EngineConfig::default()
        } else {
            EngineConfig::from_json_str(config_json).map_err(|error| JsError::new(&format!("{:#}", error)))?
        };
        Ok(WebTerrain {
            state: ApplicationState::new(config),
        })
    }

    /// Forwards a `keydown`/`keyup` event by its `KeyboardEvent.code`.
    pub fn key_event(&mut self, code: &str, pressed: bool) {
        self.state.input_manager.intake_key(code, pressed);
    }

    /// Forwards a `mousedown`/`mouseup` event by its `MouseEvent.button`.
    pub fn mouse_button(&mut self, button: u16, pressed: bool) {
        self.state.input_manager.intake_mouse_button(button, pressed);
    }

    /// Forwards a `mousemove` delta.
    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        self.state.input_manager.intake_mouse_motion((dx, dy));
    }

    /// Releases all inputs, e.g. on `blur`.
    pub fn release_inputs(&mut self) {
        self.state.input_manager.reset_inputs();
    }

    /// Steps the engine by the time since the previous frame.
    ///
    /// Returns `true` if the loaded terrain changed, in which case the instance buffer
    /// should be re-uploaded.
    pub fn frame(&mut self) -> bool {
        self.state.frame().terrain_changed()
    }

    /// Flattened instance offsets, 4 floats per voxel.
    pub fn cube_positions(&self) -> Vec<f32> {
        self.state.engine_state.instance_buffer().0
    }

    /// Water plane triangles, 4 floats per vertex; only changes when `frame` returns `true`.
    pub fn water_positions(&self) -> Vec<f32> {
        self.state.engine_state.water().vertex_buffer()
    }

    /// Number of voxel instances to draw.
    pub fn voxel_count(&self) -> usize {
        self.state.engine_state.voxel_count()
    }

    /// Column-major view matrix for the player's eye.
    pub fn view_matrix(&self) -> Vec<f32> {
        let engine = &self.state.engine_state;
        let view = engine.camera().view_matrix(engine.player().position());
        let flat: &[f32; 16] = view.as_ref();
        flat.to_vec()
    }

    /// Whether the player is in creative mode.
    pub fn creative_mode(&self) -> bool {
        self.state.engine_state.player().creative_mode()
    }
}
