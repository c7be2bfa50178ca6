// End-to-end controller scenarios: click ray in, state change plus scene
// and lighting side effects out.

use glam::Vec3;
use room_core::camera::Camera;
use room_core::constants::{
    AMBIENT_INTENSITY_OFF, AMBIENT_INTENSITY_ON, BACKGROUND_OFF, BACKGROUND_ON,
    RASENGAN_SCALE_MULTIPLIER,
};
use room_core::hit::screen_to_world_ray;
use room_core::registry::Target;
use room_core::scene::{Aabb, MeshData, MeshVertex, Node, NodeId};
use room_core::state::Effect;
use room_core::viewer::Viewer;

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

fn add_cube_root(viewer: &mut Viewer, name: &str, at: Vec3) -> NodeId {
    let mesh = viewer.scene.add_mesh(cube_mesh());
    let mut node = Node::with_mesh(name, mesh);
    node.local.translation = at;
    viewer.scene.add_root(node)
}

fn camera_looking_at(eye: Vec3, target: Vec3) -> Camera {
    Camera {
        eye,
        target,
        up: Vec3::Y,
        aspect: 1.0,
        fovy_radians: std::f32::consts::FRAC_PI_4,
        znear: 0.1,
        zfar: 100.0,
    }
}

/// Ray through the screen center of a square viewport.
fn center_ray(camera: &Camera) -> room_core::hit::Ray {
    screen_to_world_ray(camera, 200.0, 200.0, 400.0, 400.0)
}

/// A room whose lamp fixture is a named child mesh, like the GLB export.
fn viewer_with_room() -> (Viewer, Vec3) {
    let mut viewer = Viewer::new(1);
    let room = viewer.scene.add_root(Node::named("room"));
    let lamp_pos = Vec3::new(0.0, 1.5, -2.0);
    let mesh = viewer.scene.add_mesh(cube_mesh());
    let mut lamp = Node::with_mesh("Lampu_Desk", mesh);
    lamp.local.translation = lamp_pos;
    viewer.scene.add_child(room, lamp);
    let mesh = viewer.scene.add_mesh(cube_mesh());
    let mut monitor = Node::with_mesh("Monitor_Screen", mesh);
    monitor.local.translation = Vec3::new(2.0, 1.0, -2.0);
    viewer.scene.add_child(room, monitor);
    viewer.install_room(room);
    (viewer, lamp_pos)
}

#[test]
fn lamp_click_toggles_lights_and_background() {
    let (mut viewer, lamp_pos) = viewer_with_room();
    assert_eq!(viewer.rig.background, BACKGROUND_OFF);
    assert_eq!(viewer.rig.ambient_intensity, AMBIENT_INTENSITY_OFF);
    assert!(!viewer.rig.lamp.visible);

    let camera = camera_looking_at(lamp_pos + Vec3::new(0.0, 0.0, 4.0), lamp_pos);
    let ray = center_ray(&camera);

    let effects = viewer.click_at(&ray);
    assert_eq!(effects.as_slice(), &[Effect::LampChanged { on: true }]);
    assert!(viewer.rig.lamp.visible);
    assert!(viewer.rig.hemisphere.visible);
    assert_eq!(viewer.rig.background, BACKGROUND_ON);
    assert_eq!(viewer.rig.ambient_intensity, AMBIENT_INTENSITY_ON);

    // Second click restores the boot preset.
    let effects = viewer.click_at(&ray);
    assert_eq!(effects.as_slice(), &[Effect::LampChanged { on: false }]);
    assert!(!viewer.rig.lamp.visible);
    assert_eq!(viewer.rig.background, BACKGROUND_OFF);
    assert_eq!(viewer.rig.ambient_intensity, AMBIENT_INTENSITY_OFF);
}

#[test]
fn lamp_light_sits_at_the_fixture() {
    let (viewer, lamp_pos) = viewer_with_room();
    assert!((viewer.rig.lamp.position - lamp_pos).length() < 1e-5);
}

#[test]
fn monitor_opens_on_click_and_only_shuts_down_externally() {
    let (mut viewer, _) = viewer_with_room();
    let monitor_pos = Vec3::new(2.0, 1.0, -2.0);
    let camera = camera_looking_at(monitor_pos + Vec3::new(0.0, 0.0, 4.0), monitor_pos);
    let ray = center_ray(&camera);

    let effects = viewer.click_at(&ray);
    assert_eq!(
        effects.as_slice(),
        &[Effect::MonitorOpened { first_time: true }]
    );

    // Further clicks do not close (or re-open) it.
    assert!(viewer.click_at(&ray).is_empty());

    let effects = viewer.shutdown_monitor();
    assert_eq!(effects.as_slice(), &[Effect::MonitorShutDown]);

    // Reopening is not a first open anymore.
    let effects = viewer.click_at(&ray);
    assert_eq!(
        effects.as_slice(),
        &[Effect::MonitorOpened { first_time: false }]
    );
}

#[test]
fn rasengan_double_click_restores_the_exact_base_scale() {
    let mut viewer = Viewer::new(1);
    let base_scale = Vec3::splat(0.8);
    let root = add_cube_root(&mut viewer, "rasengan", Vec3::new(0.0, 1.0, -2.0));
    if let Some(n) = viewer.scene.node_mut(root) {
        n.local.scale = base_scale;
    }
    viewer.install_rasengan(root);

    let camera = camera_looking_at(Vec3::new(0.0, 1.0, 2.0), Vec3::new(0.0, 1.0, -2.0));
    let ray = center_ray(&camera);

    let effects = viewer.click_at(&ray);
    assert_eq!(
        effects.as_slice(),
        &[Effect::RasenganChanged { enlarged: true }]
    );
    let scale = viewer.scene.node(root).map(|n| n.local.scale).expect("node");
    assert_eq!(scale, base_scale * RASENGAN_SCALE_MULTIPLIER);

    let effects = viewer.click_at(&ray);
    assert_eq!(
        effects.as_slice(),
        &[Effect::RasenganChanged { enlarged: false }]
    );
    let scale = viewer.scene.node(root).map(|n| n.local.scale).expect("node");
    // Exactly the base, not approximately.
    assert_eq!(scale, base_scale);
}

#[test]
fn rasengan_glows_from_the_moment_it_is_installed() {
    let mut viewer = Viewer::new(1);
    let root = add_cube_root(&mut viewer, "rasengan", Vec3::new(0.0, 1.0, -2.0));
    viewer.install_rasengan(root);
    assert_eq!(viewer.glow.overlay_count(Target::Rasengan), 1);
    assert!(viewer.sparks.is_active());
}

#[test]
fn summon_appears_after_the_delay_and_ignores_mid_delay_clicks() {
    let mut viewer = Viewer::new(1);
    let sasuke = add_cube_root(&mut viewer, "sasuke", Vec3::new(0.0, 0.0, -2.0));
    viewer.install_summoner(sasuke);

    // The creature's model loaded detached, off to the side of the click ray.
    let mut summon_node = Node::named("susanoo");
    summon_node.local.translation = Vec3::new(3.0, 0.0, -2.0);
    let summon_root = viewer.scene.add_node(summon_node);
    for i in 0..2 {
        let mesh = viewer.scene.add_mesh(cube_mesh());
        viewer
            .scene
            .add_child(summon_root, Node::with_mesh(format!("shell{}", i), mesh));
    }
    viewer.install_summon_model(summon_root);

    let camera = camera_looking_at(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -2.0));
    let ray = center_ray(&camera);

    let effects = viewer.click_at(&ray);
    assert_eq!(effects.as_slice(), &[Effect::SummonStarted]);
    assert!(!viewer.scene.is_attached(summon_root));

    viewer.advance(1.0, 1.0);
    assert!(!viewer.scene.is_attached(summon_root));
    let pending_before = viewer.interactions.summon_pending();

    // A click during the delay neither summons again nor moves the deadline.
    assert!(viewer.click_at(&ray).is_empty());
    assert_eq!(viewer.interactions.summon_pending(), pending_before);
    assert!(!viewer.scene.is_attached(summon_root));

    // The original deadline still stands.
    viewer.advance(2.0, 3.0);
    assert!(viewer.scene.is_attached(summon_root));
    assert!(viewer.glow.overlay_count(Target::Sasuke) > 0);
    assert_eq!(viewer.glow.overlay_count(Target::Sasuke), 2);

    // Clicking the summoner while visible dismisses immediately and
    // releases every overlay.
    let effects = viewer.click_at(&ray);
    assert_eq!(effects.as_slice(), &[Effect::SummonDismissed]);
    assert!(!viewer.scene.is_attached(summon_root));
    assert_eq!(viewer.glow.overlay_count(Target::Sasuke), 0);
}

#[test]
fn click_into_empty_space_is_a_normal_outcome() {
    let (mut viewer, _) = viewer_with_room();
    let camera = camera_looking_at(Vec3::new(0.0, 10.0, 5.0), Vec3::new(0.0, 20.0, 5.0));
    let ray = center_ray(&camera);
    assert!(viewer.click_at(&ray).is_empty());
}

#[test]
fn missing_fixture_leaves_the_target_inert() {
    let mut viewer = Viewer::new(1);
    // Room with no lamp or monitor node at all.
    let room = viewer.scene.add_root(Node::named("bare_room"));
    viewer.install_room(room);
    assert_eq!(viewer.registry.root_of(Target::Lamp), None);
    assert_eq!(viewer.registry.root_of(Target::Monitor), None);
    assert_eq!(viewer.registry.hit_testable().count(), 0);
}
