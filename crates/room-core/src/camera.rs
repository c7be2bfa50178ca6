//! Camera description and the orbit-style free look used by the viewer.
//!
//! These types avoid platform APIs so the picking math can be exercised in
//! native tests.

use glam::{Mat4, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Keys currently held for camera translation.
#[derive(Default, Clone, Copy, Debug)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Damped yaw/pitch orbit around a focus point.
///
/// Drags adjust the *goal* angles; `update` eases the actual angles toward
/// them, which reads like the original viewer's damped orbit controls.
#[derive(Clone, Debug)]
pub struct OrbitState {
    pub yaw: f32,
    pub pitch: f32,
    goal_yaw: f32,
    goal_pitch: f32,
    pub radius: f32,
    pub focus: Vec3,
}

impl OrbitState {
    pub fn new(focus: Vec3, radius: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch,
            goal_yaw: yaw,
            goal_pitch: pitch,
            radius,
            focus,
        }
    }

    pub fn apply_drag(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.goal_yaw += dx * sensitivity;
        self.goal_pitch = (self.goal_pitch + dy * sensitivity)
            .clamp(-crate::constants::PITCH_LIMIT_RAD, crate::constants::PITCH_LIMIT_RAD);
    }

    /// Ease angles toward their goals and translate the focus point.
    pub fn update(&mut self, input: MoveInput, dt_sec: f32) {
        let alpha = 1.0 - (-dt_sec / crate::constants::LOOK_DAMPING_TAU_SEC).exp();
        self.yaw += (self.goal_yaw - self.yaw) * alpha;
        self.pitch += (self.goal_pitch - self.pitch) * alpha;

        let fwd = Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos());
        let right = Vec3::new(fwd.z, 0.0, -fwd.x);
        let mut step = Vec3::ZERO;
        if input.forward {
            step += fwd;
        }
        if input.back {
            step -= fwd;
        }
        if input.right {
            step += right;
        }
        if input.left {
            step -= right;
        }
        if step.length_squared() > 0.0 {
            self.focus += step.normalize() * crate::constants::MOVE_SPEED * dt_sec;
        }
    }

    pub fn eye(&self) -> Vec3 {
        let cp = self.pitch.cos();
        let dir = Vec3::new(self.yaw.sin() * cp, self.pitch.sin(), self.yaw.cos() * cp);
        self.focus + dir * self.radius
    }

    pub fn write_to(&self, camera: &mut Camera) {
        camera.eye = self.eye();
        camera.target = self.focus;
    }
}
