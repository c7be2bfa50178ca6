//! Pointer hit resolution: screen coordinates to a world ray, ray to the
//! nearest interactive target.
//!
//! Pure queries only; nothing here mutates scene or registry state.

use crate::camera::Camera;
use crate::registry::{Target, TargetRegistry};
use crate::scene::{NodeId, Scene};
use glam::{Mat4, Vec3, Vec4};

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub target: Target,
    pub node: NodeId,
    pub distance: f32,
}

/// Screen pixels to normalized device coordinates; top of screen maps to +1.
#[inline]
pub fn ndc_from_screen(sx: f32, sy: f32, width: f32, height: f32) -> (f32, f32) {
    let ndc_x = (2.0 * sx / width.max(1.0)) - 1.0;
    let ndc_y = 1.0 - (2.0 * sy / height.max(1.0));
    (ndc_x, ndc_y)
}

/// Compute a world-space ray from screen-space coordinates.
///
/// Unprojects the far plane point through the inverse view-projection and
/// points the ray from the camera eye through it.
pub fn screen_to_world_ray(camera: &Camera, sx: f32, sy: f32, width: f32, height: f32) -> Ray {
    let (ndc_x, ndc_y) = ndc_from_screen(sx, sy, width, height);
    let inv: Mat4 = camera.view_projection().inverse();
    let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
    let p_far: Vec3 = p_far.truncate() / p_far.w;
    Ray {
        origin: camera.eye,
        dir: (p_far - camera.eye).normalize(),
    }
}

/// Slab test against an axis-aligned box. Returns the entry distance along
/// the ray, 0 when the origin is already inside.
#[inline]
pub fn ray_aabb(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let mut tmin = 0.0f32;
    let mut tmax = f32::INFINITY;
    for i in 0..3 {
        let o = ray.origin[i];
        let d = ray.dir[i];
        if d.abs() < 1e-8 {
            if o < min[i] || o > max[i] {
                return None;
            }
        } else {
            let inv = 1.0 / d;
            let mut t0 = (min[i] - o) * inv;
            let mut t1 = (max[i] - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            tmin = tmin.max(t0);
            tmax = tmax.min(t1);
            if tmin > tmax {
                return None;
            }
        }
    }
    Some(tmin)
}

/// Resolve a ray to the nearest interactive target, or `None`.
///
/// Every attached, visible mesh node is tested (the room's static scenery
/// included, so a wall in front of a target masks it); glow-overlay clones
/// are not pickable. The globally nearest intersection is mapped back to
/// its owning registered root by walking ancestor links; strict `<` keeps
/// the first-tested node on an exact distance tie.
pub fn resolve(scene: &Scene, registry: &TargetRegistry, ray: &Ray) -> Option<Hit> {
    let mut best: Option<(NodeId, f32)> = None;
    for root in scene.roots() {
        for id in scene.descendants(*root) {
            let node = match scene.node(id) {
                Some(n) => n,
                None => continue,
            };
            if node.mesh.is_none() || node.overlay_opacity.is_some() {
                continue;
            }
            if !scene.effectively_visible(id) {
                continue;
            }
            let mesh = match node.mesh.and_then(|m| scene.mesh(m)) {
                Some(m) => m,
                None => continue,
            };
            let world = mesh.local_aabb.transformed(&scene.world_transform(id));
            if let Some(t) = ray_aabb(ray, world.min, world.max) {
                match best {
                    Some((_, bt)) if t >= bt => {}
                    _ => best = Some((id, t)),
                }
            }
        }
    }
    let (node, distance) = best?;
    let target = registry.owner_of(scene, node)?;
    Some(Hit {
        target,
        node,
        distance,
    })
}
