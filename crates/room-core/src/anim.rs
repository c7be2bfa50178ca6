//! Continuous animation state, advanced by wall-clock time so motion stays
//! correct under variable frame rate.

use crate::scene::{NodeId, Scene};
use glam::{Quat, Vec3};

#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationState {
    pub active: bool,
    /// Radians, monotonically increasing while active.
    pub phase: f32,
}

impl AnimationState {
    pub fn activate(&mut self) {
        self.active = true;
        self.phase = 0.0;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn advance(&mut self, rate_rad_per_sec: f32, dt_sec: f32) {
        if self.active {
            self.phase += rate_rad_per_sec * dt_sec;
        }
    }
}

/// Yaw the node to the current phase.
pub fn apply_spin(scene: &mut Scene, node: NodeId, phase: f32) {
    if let Some(n) = scene.node_mut(node) {
        n.local.rotation = Quat::from_rotation_y(phase);
    }
}

/// Circle the node around `center` in the horizontal plane, spinning it as
/// it goes.
pub fn apply_orbit(scene: &mut Scene, node: NodeId, center: Vec3, radius: f32, phase: f32) {
    if let Some(n) = scene.node_mut(node) {
        n.local.translation = center + Vec3::new(phase.cos() * radius, 0.0, phase.sin() * radius);
        n.local.rotation = Quat::from_rotation_y(phase * 3.0);
    }
}

/// Sinusoidal pulse around a base value: `base + amplitude * sin(t * freq)`.
#[inline]
pub fn pulse(clock_sec: f32, base: f32, amplitude: f32, freq_rad_per_sec: f32) -> f32 {
    base + amplitude * (clock_sec * freq_rad_per_sec).sin()
}
