//! One parametrized glow-effect manager for every glowing target.
//!
//! A live effect owns one enlarged translucent overlay clone per mesh node
//! under the target root, plus one point light. Activation after a prior
//! activation releases the old overlays first; deactivation releases
//! everything, so overlay count is exactly the source mesh count while
//! live and zero otherwise.

use crate::anim::pulse;
use crate::constants::*;
use crate::registry::Target;
use crate::scene::{Node, NodeId, Scene};
use fnv::FnvHashMap;
use glam::Vec3;
use smallvec::SmallVec;

pub struct GlowEffect {
    overlays: SmallVec<[NodeId; 8]>,
    pub light_color: Vec3,
    pub light_position: Vec3,
    pub light_intensity: f32,
    base_scale: f32,
    base_opacity: f32,
}

#[derive(Default)]
pub struct GlowManager {
    effects: FnvHashMap<Target, GlowEffect>,
}

impl GlowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap every mesh node under `root` in an overlay clone and light the
    /// effect up. Re-attaching while live disposes the previous generation
    /// first.
    pub fn attach(&mut self, scene: &mut Scene, target: Target, root: NodeId, color: Vec3) {
        if self.effects.contains_key(&target) {
            self.detach(scene, target);
        }
        let mut overlays = SmallVec::new();
        for id in scene.descendants(root) {
            let (mesh, name) = match scene.node(id) {
                Some(n) if n.overlay_opacity.is_none() => match n.mesh {
                    Some(m) => (m, n.name.clone()),
                    None => continue,
                },
                _ => continue,
            };
            let mut clone = Node::with_mesh(format!("{}_glow", name), mesh);
            clone.local.scale = Vec3::splat(GLOW_MESH_SCALE);
            clone.overlay_opacity = Some(GLOW_BASE_OPACITY);
            overlays.push(scene.add_child(id, clone));
        }
        let light_position = scene
            .world_transform(root)
            .transform_point3(Vec3::ZERO);
        self.effects.insert(
            target,
            GlowEffect {
                overlays,
                light_color: color,
                light_position,
                light_intensity: GLOW_LIGHT_INTENSITY,
                base_scale: GLOW_MESH_SCALE,
                base_opacity: GLOW_BASE_OPACITY,
            },
        );
        log::info!(
            "[glow] attached to {} ({} overlays)",
            target.label(),
            self.overlay_count(target)
        );
    }

    /// Dispose every owned overlay and drop the light.
    pub fn detach(&mut self, scene: &mut Scene, target: Target) {
        if let Some(effect) = self.effects.remove(&target) {
            for id in effect.overlays {
                scene.remove_subtree(id);
            }
            log::info!("[glow] detached from {}", target.label());
        }
    }

    pub fn is_active(&self, target: Target) -> bool {
        self.effects.contains_key(&target)
    }

    pub fn overlay_count(&self, target: Target) -> usize {
        self.effects.get(&target).map_or(0, |e| e.overlays.len())
    }

    /// Per-frame: pulse overlay opacity/scale from the global clock and
    /// re-anchor each light to its target's current world position.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        roots: impl Fn(Target) -> Option<NodeId>,
        clock_sec: f32,
    ) {
        for (target, effect) in self.effects.iter_mut() {
            let opacity = pulse(
                clock_sec,
                effect.base_opacity,
                GLOW_PULSE_AMPLITUDE,
                GLOW_PULSE_FREQ_RAD_PER_SEC,
            )
            .clamp(0.05, 1.0);
            let scale = pulse(
                clock_sec,
                effect.base_scale,
                GLOW_SCALE_PULSE_AMPLITUDE,
                GLOW_PULSE_FREQ_RAD_PER_SEC,
            );
            for id in &effect.overlays {
                if let Some(n) = scene.node_mut(*id) {
                    n.overlay_opacity = Some(opacity);
                    n.local.scale = Vec3::splat(scale);
                }
            }
            if let Some(root) = roots(*target) {
                effect.light_position = scene.world_transform(root).transform_point3(Vec3::ZERO);
            }
        }
    }

    /// Live glow lights for the renderer, as (position, color, intensity).
    pub fn lights(&self) -> impl Iterator<Item = (Vec3, Vec3, f32)> + '_ {
        self.effects
            .values()
            .map(|e| (e.light_position, e.light_color, e.light_intensity))
    }
}
