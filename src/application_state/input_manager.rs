//! # Input Manager
//!
//! This module turns raw key, button and mouse events into the per-tick `TickInput`
//! the engine consumes. Keys are identified by their DOM `KeyboardEvent.code` names so
//! the web front end can forward events unchanged.
//!
//! Bindings: WASD walk, Space jumps (or floats up in creative mode), ShiftLeft floats
//! down, C toggles creative mode, R resets the player, holding AltLeft turns the tuning
//! keys into noise hotkeys. Dragging with the left mouse button looks around; holding
//! the right button mines.

use std::collections::HashMap;

use super::input_state::{MovementIntent, NoiseTuning, RawInputState};
use crate::engine_state::TickInput;

const KEY_CODES: [&str; 21] = [
    "KeyW",
    "KeyS",
    "KeyA",
    "KeyD",
    "KeyC",
    "KeyR",
    "Space",
    "ShiftLeft",
    "AltLeft",
    "KeyO",
    "KeyP",
    "KeyK",
    "KeyL",
    "KeyN",
    "KeyM",
    "Equal",
    "Minus",
    "BracketLeft",
    "BracketRight",
    "Comma",
    "Period",
];

/// DOM `MouseEvent.button` index of the look (drag) button.
pub const LOOK_BUTTON: u16 = 0;
/// DOM `MouseEvent.button` index of the mine button.
pub const MINE_BUTTON: u16 = 2;

/// Tracks input devices between ticks.
pub struct InputManager {
    /// State of every tracked key at the previous tick
    keyboard_inputs_old: HashMap<&'static str, bool>,
    /// State of every tracked key now
    keyboard_inputs_new: HashMap<&'static str, bool>,
    /// Mouse buttons currently held
    look_held: bool,
    mine_held: bool,
    /// Accumulated mouse movement since the last tick
    mouse_delta: Option<(f64, f64)>,
}

impl InputManager {
    /// Creates a manager with every key released.
    pub fn new() -> Self {
        let released: HashMap<&'static str, bool> = KEY_CODES.iter().map(|code| (*code, false)).collect();
        InputManager {
            keyboard_inputs_old: released.clone(),
            keyboard_inputs_new: released,
            look_held: false,
            mine_held: false,
            mouse_delta: None,
        }
    }

    /// Records a key going down or up. Untracked keys are ignored.
    pub fn intake_key(&mut self, code: &str, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(code) {
            *key_state = pressed;
        } else {
            log::trace!("Ignoring untracked key {}", code);
        }
    }

    /// Records a mouse button going down or up.
    pub fn intake_mouse_button(&mut self, button: u16, pressed: bool) {
        match button {
            LOOK_BUTTON => self.look_held = pressed,
            MINE_BUTTON => self.mine_held = pressed,
            _ => {}
        }
    }

    /// Accumulates mouse movement, in pixels.
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        let (x, y) = self.mouse_delta.unwrap_or((0.0, 0.0));
        self.mouse_delta = Some((x + delta.0, y + delta.1));
    }

    fn key_state(&self, code: &str) -> RawInputState {
        let old = self.keyboard_inputs_old.get(code).copied().unwrap_or(false);
        let new = self.keyboard_inputs_new.get(code).copied().unwrap_or(false);
        RawInputState::from_raw_states(old, new)
    }

    /// Builds this tick's input and rolls the key states forward.
    pub fn create_tick_input(&mut self) -> TickInput {
        let movement = MovementIntent {
            forward: self.key_state("KeyW").is_active(),
            backward: self.key_state("KeyS").is_active(),
            left: self.key_state("KeyA").is_active(),
            right: self.key_state("KeyD").is_active(),
            up: self.key_state("Space").is_active(),
            down: self.key_state("ShiftLeft").is_active(),
        };

        let tuning = if self.key_state("AltLeft").is_active() {
            KEY_CODES
                .iter()
                .filter(|code| self.key_state(code).is_just_pressed())
                .filter_map(|code| NoiseTuning::from_key_code(code))
                .collect()
        } else {
            Vec::new()
        };

        let input = TickInput {
            movement,
            look_delta: self.mouse_delta.take().filter(|_| self.look_held),
            jump: self.key_state("Space").is_just_pressed(),
            toggle_creative: self.key_state("KeyC").is_just_pressed(),
            reset: self.key_state("KeyR").is_just_pressed(),
            mining: self.mine_held,
            target_ray: None,
            tuning,
        };

        self.move_old_states();
        input
    }

    fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }
    }

    /// Releases every key and button. Called when the page loses focus.
    pub fn reset_inputs(&mut self) {
        for state in self.keyboard_inputs_new.values_mut() {
            *state = false;
        }
        self.look_held = false;
        self.mine_held = false;
        self.mouse_delta = None;
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
