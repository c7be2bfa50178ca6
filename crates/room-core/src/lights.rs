//! The small fixed light rig the lamp toggle drives.
//!
//! The renderer reads this every frame; the state machine only flips it
//! between the two presets.

use crate::constants::*;
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub visible: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HemisphereLight {
    pub sky: Vec3,
    pub ground: Vec3,
    pub intensity: f32,
    pub visible: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LightRig {
    pub lamp: PointLight,
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
    pub ambient_intensity: f32,
    pub background: Vec3,
}

impl LightRig {
    /// Starts dark, matching the source viewer's "lamp off" boot state.
    pub fn new() -> Self {
        let mut rig = Self {
            lamp: PointLight {
                position: Vec3::ZERO,
                color: LAMP_POINT_COLOR,
                intensity: LAMP_POINT_INTENSITY,
                visible: false,
            },
            hemisphere: HemisphereLight {
                sky: HEMISPHERE_SKY,
                ground: HEMISPHERE_GROUND,
                intensity: 1.0,
                visible: false,
            },
            directional: DirectionalLight {
                direction: Vec3::new(-0.4, -1.0, -0.3).normalize(),
                color: DIRECTIONAL_COLOR,
                intensity: DIRECTIONAL_INTENSITY,
                visible: false,
            },
            ambient_intensity: AMBIENT_INTENSITY_OFF,
            background: BACKGROUND_OFF,
        };
        rig.apply_lamp(false);
        rig
    }

    /// Switch the whole rig between its "on" and "off" presets.
    pub fn apply_lamp(&mut self, on: bool) {
        self.lamp.visible = on;
        self.hemisphere.visible = on;
        self.directional.visible = on;
        self.ambient_intensity = if on {
            AMBIENT_INTENSITY_ON
        } else {
            AMBIENT_INTENSITY_OFF
        };
        self.background = if on { BACKGROUND_ON } else { BACKGROUND_OFF };
    }
}

impl Default for LightRig {
    fn default() -> Self {
        Self::new()
    }
}
