//! # Camera
//!
//! First-person orientation of the player: yaw and pitch, and the vectors derived from
//! them that steer movement and aim the targeting ray.
//!
//! The camera has no position of its own; it always looks out from the player's eye
//! point.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};
use web_time::Duration;

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Mouse deltas at or below this many pixels are treated as jitter.
const LOOK_DEADZONE: f64 = 0.5;

/// Orientation of a first-person camera.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    /// Horizontal rotation around the Y axis
    pub yaw: Rad<f32>,
    /// Vertical rotation, clamped just short of straight up or down
    pub pitch: Rad<f32>,
    /// Radians turned per pixel of mouse movement per second
    pub sensitivity: f32,
}

impl Camera {
    /// Creates a camera with the given orientation.
    pub fn new<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(yaw: Y, pitch: P, sensitivity: f32) -> Self {
        let mut camera = Camera {
            yaw: yaw.into(),
            pitch: pitch.into(),
            sensitivity,
        };
        camera.clamp_pitch();
        camera
    }

    /// Turns the camera by a mouse delta.
    ///
    /// # Arguments
    /// * `delta` - Mouse movement `(x, y)` in pixels; positive y looks down
    /// * `dt` - Tick length
    pub fn rotate(&mut self, delta: (f64, f64), dt: Duration) {
        let dt = dt.as_secs_f32();
        let (delta_x, delta_y) = delta;
        if delta_x.abs() > LOOK_DEADZONE {
            self.yaw += Rad(delta_x as f32) * self.sensitivity * dt;
        }
        if delta_y.abs() > LOOK_DEADZONE {
            self.pitch += Rad(-delta_y as f32) * self.sensitivity * dt;
        }
        self.clamp_pitch();
    }

    fn clamp_pitch(&mut self) {
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }

    /// Direction the camera looks in.
    pub fn look_vector(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Look direction flattened onto the ground plane.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(yaw_cos, 0.0, yaw_sin).normalize()
    }

    /// Ground-plane direction to the camera's right.
    pub fn right(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize()
    }

    /// View matrix for a camera placed at `eye`.
    pub fn view_matrix(&self, eye: Point3<f32>) -> Matrix4<f32> {
        Matrix4::look_to_rh(eye, self.look_vector(), Vector3::unit_y())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(Rad(0.0), Rad(0.0), 0.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_right_are_horizontal_and_orthogonal() {
        let camera = Camera::new(Rad(0.7), Rad(0.3), 1.0);
        assert_eq!(camera.forward().y, 0.0);
        assert_eq!(camera.right().y, 0.0);
        assert!(camera.forward().dot(camera.right()).abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.rotate((0.0, -1.0e6), Duration::from_millis(16));
        assert!(camera.pitch.0 < FRAC_PI_2);
        assert!(camera.look_vector().y > 0.99);
    }

    #[test]
    fn small_mouse_jitter_is_ignored() {
        let mut camera = Camera::default();
        camera.rotate((0.3, -0.2), Duration::from_millis(16));
        assert_eq!(camera.yaw, Rad(0.0));
        assert_eq!(camera.pitch, Rad(0.0));
    }
}
