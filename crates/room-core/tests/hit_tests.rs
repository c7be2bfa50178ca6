// Geometry-level tests for NDC conversion, ray casting, and target
// resolution.

use glam::Vec3;
use room_core::camera::Camera;
use room_core::hit::{ndc_from_screen, ray_aabb, resolve, screen_to_world_ray, Ray};
use room_core::registry::{Target, TargetRegistry};
use room_core::scene::{Aabb, MeshData, MeshVertex, Node, Scene};

fn cube_mesh() -> MeshData {
    let mut vertices = Vec::new();
    for z in [-0.5f32, 0.5] {
        for y in [-0.5f32, 0.5] {
            for x in [-0.5f32, 0.5] {
                vertices.push(MeshVertex {
                    position: [x, y, z],
                    normal: [0.0, 1.0, 0.0],
                });
            }
        }
    }
    MeshData {
        vertices,
        indices: vec![0, 1, 2, 2, 1, 3],
        base_color: [1.0, 1.0, 1.0, 1.0],
        local_aabb: Aabb {
            min: Vec3::splat(-0.5),
            max: Vec3::splat(0.5),
        },
    }
}

fn add_box_root(scene: &mut Scene, name: &str, at: Vec3) -> usize {
    let mesh = scene.add_mesh(cube_mesh());
    let mut node = Node::with_mesh(name, mesh);
    node.local.translation = at;
    scene.add_root(node)
}

fn test_camera() -> Camera {
    Camera {
        eye: Vec3::new(0.0, 0.0, 5.0),
        target: Vec3::ZERO,
        up: Vec3::Y,
        aspect: 1.0,
        fovy_radians: std::f32::consts::FRAC_PI_4,
        znear: 0.1,
        zfar: 100.0,
    }
}

#[test]
fn ndc_conversion_inverts_y() {
    // Screen center maps to the NDC origin.
    let (x, y) = ndc_from_screen(400.0, 300.0, 800.0, 600.0);
    assert!(x.abs() < 1e-6 && y.abs() < 1e-6);

    // Top-left corner maps to (-1, +1): top of screen is +1.
    let (x, y) = ndc_from_screen(0.0, 0.0, 800.0, 600.0);
    assert!((x + 1.0).abs() < 1e-6);
    assert!((y - 1.0).abs() < 1e-6);

    // Bottom-right corner maps to (+1, -1).
    let (x, y) = ndc_from_screen(800.0, 600.0, 800.0, 600.0);
    assert!((x - 1.0).abs() < 1e-6);
    assert!((y + 1.0).abs() < 1e-6);
}

#[test]
fn center_ray_points_at_the_camera_target() {
    let cam = test_camera();
    let ray = screen_to_world_ray(&cam, 400.0, 300.0, 800.0, 600.0);
    assert!((ray.origin - cam.eye).length() < 1e-4);
    let expected = (cam.target - cam.eye).normalize();
    assert!((ray.dir - expected).length() < 1e-3);
}

#[test]
fn ray_aabb_hit_miss_and_inside() {
    let ray = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::Z,
    };
    // Box straddling z = 5: entry at 4.5.
    let t = ray_aabb(&ray, Vec3::new(-1.0, -1.0, 4.5), Vec3::new(1.0, 1.0, 5.5));
    assert!(matches!(t, Some(t) if (t - 4.5).abs() < 1e-5));

    // Box off to the side.
    let miss = ray_aabb(&ray, Vec3::new(3.0, -1.0, 4.5), Vec3::new(5.0, 1.0, 5.5));
    assert!(miss.is_none());

    // Box behind the origin.
    let behind = ray_aabb(&ray, Vec3::new(-1.0, -1.0, -5.0), Vec3::new(1.0, 1.0, -4.0));
    assert!(behind.is_none());

    // Origin inside the box: entry clamps to zero.
    let inside = ray_aabb(&ray, Vec3::splat(-1.0), Vec3::splat(1.0));
    assert_eq!(inside, Some(0.0));
}

#[test]
fn nearest_target_wins_regardless_of_registration_order() {
    let mut scene = Scene::new();
    let mut registry = TargetRegistry::new();
    // The far box is registered first; the near one must still win.
    let far = add_box_root(&mut scene, "far", Vec3::new(0.0, 0.0, -5.0));
    let near = add_box_root(&mut scene, "near", Vec3::new(0.0, 0.0, -2.0));
    registry.register(Target::Rasengan).expect("register");
    registry.register(Target::Naruto).expect("register");
    registry.set_root(Target::Rasengan, far);
    registry.set_root(Target::Naruto, near);

    let ray = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::NEG_Z,
    };
    let hit = resolve(&scene, &registry, &ray).expect("should hit");
    assert_eq!(hit.target, Target::Naruto);
    assert!((hit.distance - 1.5).abs() < 1e-4);
}

#[test]
fn closer_scenery_masks_a_registered_target() {
    let mut scene = Scene::new();
    let mut registry = TargetRegistry::new();
    let lamp = add_box_root(&mut scene, "lamp", Vec3::new(0.0, 0.0, -6.0));
    // Unregistered wall in front of the lamp.
    add_box_root(&mut scene, "wall", Vec3::new(0.0, 0.0, -3.0));
    registry.register(Target::Lamp).expect("register");
    registry.set_root(Target::Lamp, lamp);

    let ray = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::NEG_Z,
    };
    assert_eq!(resolve(&scene, &registry, &ray), None);
}

#[test]
fn hit_on_descendant_geometry_resolves_to_the_owning_root() {
    let mut scene = Scene::new();
    let mut registry = TargetRegistry::new();
    let root = scene.add_root(Node::named("figure"));
    let mesh = scene.add_mesh(cube_mesh());
    let mut part = Node::with_mesh("arm", mesh);
    part.local.translation = Vec3::new(0.0, 0.0, -3.0);
    let part_id = scene.add_child(root, part);
    registry.register(Target::Naruto).expect("register");
    registry.set_root(Target::Naruto, root);

    let ray = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::NEG_Z,
    };
    let hit = resolve(&scene, &registry, &ray).expect("should hit");
    assert_eq!(hit.target, Target::Naruto);
    assert_eq!(hit.node, part_id);
}

#[test]
fn invisible_and_detached_nodes_are_not_pickable() {
    let mut scene = Scene::new();
    let mut registry = TargetRegistry::new();
    let box_id = add_box_root(&mut scene, "box", Vec3::new(0.0, 0.0, -3.0));
    registry.register(Target::Naruto).expect("register");
    registry.set_root(Target::Naruto, box_id);
    let ray = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::NEG_Z,
    };
    assert!(resolve(&scene, &registry, &ray).is_some());

    if let Some(n) = scene.node_mut(box_id) {
        n.visible = false;
    }
    assert_eq!(resolve(&scene, &registry, &ray), None);

    if let Some(n) = scene.node_mut(box_id) {
        n.visible = true;
    }
    scene.detach_root(box_id);
    assert_eq!(resolve(&scene, &registry, &ray), None);
}
