//! # Input State
//!
//! This module defines the per-tick input types the engine consumes: held movement
//! keys, edge-triggered actions, and the developer hotkeys that tune the noise.

use cgmath::{InnerSpace, Vector3, Zero};

use crate::engine_state::voxels::noise_field::NoiseConfig;

/// Represents the state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Derives the state from whether the input was down last frame and is down now
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// Which movement keys are held this tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MovementIntent {
    /// Move along the camera's forward direction
    pub forward: bool,
    /// Move against the camera's forward direction
    pub backward: bool,
    /// Strafe left
    pub left: bool,
    /// Strafe right
    pub right: bool,
    /// Float up (creative mode only)
    pub up: bool,
    /// Float down (creative mode only)
    pub down: bool,
}

impl MovementIntent {
    /// Converts the held keys into a unit movement direction.
    ///
    /// # Arguments
    /// * `forward` - Camera forward vector
    /// * `right` - Camera right vector
    /// * `creative_mode` - Whether up/down input is honoured
    ///
    /// # Returns
    /// A normalized direction, or zero when the keys cancel out.
    pub fn direction(&self, forward: Vector3<f32>, right: Vector3<f32>, creative_mode: bool) -> Vector3<f32> {
        let mut direction = Vector3::zero();
        if self.forward {
            direction += forward;
        }
        if self.backward {
            direction -= forward;
        }
        if self.right {
            direction += right;
        }
        if self.left {
            direction -= right;
        }
        direction.y = 0.0;

        if creative_mode {
            if self.up {
                direction.y += 1.0;
            }
            if self.down {
                direction.y -= 1.0;
            }
        }

        if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            direction
        }
    }
}

/// A developer hotkey that nudges one noise parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoiseTuning {
    /// Persistence +0.1
    PersistenceUp,
    /// Persistence -0.1
    PersistenceDown,
    /// Lacunarity +0.1
    LacunarityUp,
    /// Lacunarity -0.1
    LacunarityDown,
    /// Scale +1
    ScaleUp,
    /// Scale -1
    ScaleDown,
    /// Height +1
    HeightUp,
    /// Height -1
    HeightDown,
    /// Frequency +0.1
    FrequencyUp,
    /// Frequency -0.1
    FrequencyDown,
    /// One more octave
    OctavesUp,
    /// One fewer octave
    OctavesDown,
}

impl NoiseTuning {
    /// Maps a keyboard code (as in DOM `KeyboardEvent.code`) to its tuning action.
    ///
    /// O/P persistence, K/L lacunarity, N/M scale, `-`/`=` height, `[`/`]` frequency,
    /// `,`/`.` octaves.
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "KeyP" => Some(NoiseTuning::PersistenceUp),
            "KeyO" => Some(NoiseTuning::PersistenceDown),
            "KeyL" => Some(NoiseTuning::LacunarityUp),
            "KeyK" => Some(NoiseTuning::LacunarityDown),
            "KeyM" => Some(NoiseTuning::ScaleUp),
            "KeyN" => Some(NoiseTuning::ScaleDown),
            "Equal" => Some(NoiseTuning::HeightUp),
            "Minus" => Some(NoiseTuning::HeightDown),
            "BracketRight" => Some(NoiseTuning::FrequencyUp),
            "BracketLeft" => Some(NoiseTuning::FrequencyDown),
            "Period" => Some(NoiseTuning::OctavesUp),
            "Comma" => Some(NoiseTuning::OctavesDown),
            _ => None,
        }
    }

    /// Applies the nudge to `config`.
    pub fn apply(self, config: &mut NoiseConfig) {
        match self {
            NoiseTuning::PersistenceUp => config.persistence += 0.1,
            NoiseTuning::PersistenceDown => config.persistence -= 0.1,
            NoiseTuning::LacunarityUp => config.lacunarity += 0.1,
            NoiseTuning::LacunarityDown => config.lacunarity -= 0.1,
            NoiseTuning::ScaleUp => config.scale += 1.0,
            NoiseTuning::ScaleDown => config.scale -= 1.0,
            NoiseTuning::HeightUp => config.height += 1.0,
            NoiseTuning::HeightDown => config.height -= 1.0,
            NoiseTuning::FrequencyUp => config.frequency += 0.1,
            NoiseTuning::FrequencyDown => config.frequency -= 0.1,
            NoiseTuning::OctavesUp => config.octaves += 1,
            NoiseTuning::OctavesDown => config.octaves = config.octaves.saturating_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_walk_is_normalized_and_flat() {
        let intent = MovementIntent {
            forward: true,
            right: true,
            up: true,
            ..MovementIntent::default()
        };
        let forward = Vector3::new(0.0, 0.5, 1.0);
        let right = Vector3::new(1.0, 0.0, 0.0);
        let direction = intent.direction(forward, right, false);
        assert_eq!(direction.y, 0.0);
        assert!((direction.magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn creative_mode_keeps_vertical_input() {
        let intent = MovementIntent {
            up: true,
            ..MovementIntent::default()
        };
        let direction = intent.direction(Vector3::unit_z(), Vector3::unit_x(), true);
        assert_eq!(direction, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let intent = MovementIntent {
            forward: true,
            backward: true,
            ..MovementIntent::default()
        };
        let direction = intent.direction(Vector3::unit_z(), Vector3::unit_x(), false);
        assert_eq!(direction, Vector3::zero());
    }

    #[test]
    fn hotkeys_nudge_the_noise() {
        let mut config = NoiseConfig::default();
        for code in ["Equal", "Equal", "KeyM", "KeyO"] {
            NoiseTuning::from_key_code(code)
                .expect("mapped hotkey")
                .apply(&mut config);
        }
        assert_eq!(config.height, 18.0);
        assert_eq!(config.scale, 76.0);
        assert!(config.persistence.abs() < 1e-12);
        assert_eq!(NoiseTuning::from_key_code("KeyX"), None);
    }

    #[test]
    fn octaves_never_underflow() {
        let mut config = NoiseConfig {
            octaves: 0,
            ..NoiseConfig::default()
        };
        NoiseTuning::OctavesDown.apply(&mut config);
        assert_eq!(config.octaves, 0);
    }

    #[test]
    fn raw_states_track_transitions() {
        assert!(RawInputState::from_raw_states(false, true).is_just_pressed());
        assert!(RawInputState::from_raw_states(true, true).is_active());
        assert!(!RawInputState::from_raw_states(true, false).is_active());
    }
}
