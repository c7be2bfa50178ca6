// Continuous-animation math: dt-proportional phase, spin/orbit transforms,
// and the sinusoidal pulse.

use glam::{Quat, Vec3};
use room_core::anim::{apply_orbit, apply_spin, pulse, AnimationState};
use room_core::scene::{Node, Scene};

#[test]
fn phase_advances_proportional_to_elapsed_time() {
    let mut anim = AnimationState::default();
    anim.activate();
    anim.advance(2.0, 0.5);
    assert!((anim.phase - 1.0).abs() < 1e-6);
    // Two small steps equal one big one.
    anim.advance(2.0, 0.25);
    anim.advance(2.0, 0.25);
    assert!((anim.phase - 2.0).abs() < 1e-6);
}

#[test]
fn inactive_animation_does_not_advance() {
    let mut anim = AnimationState::default();
    anim.advance(10.0, 10.0);
    assert_eq!(anim.phase, 0.0);
    assert!(!anim.active);
}

#[test]
fn activation_resets_the_phase() {
    let mut anim = AnimationState::default();
    anim.activate();
    anim.advance(1.0, 3.0);
    anim.deactivate();
    anim.activate();
    assert_eq!(anim.phase, 0.0);
    assert!(anim.active);
}

#[test]
fn spin_yaws_the_node_to_the_phase() {
    let mut scene = Scene::new();
    let id = scene.add_root(Node::named("figure"));
    apply_spin(&mut scene, id, 1.2);
    let rot = scene.node(id).map(|n| n.local.rotation).expect("node");
    let expected = Quat::from_rotation_y(1.2);
    assert!(rot.abs_diff_eq(expected, 1e-6));
}

#[test]
fn orbit_keeps_the_node_on_its_circle() {
    let mut scene = Scene::new();
    let id = scene.add_root(Node::named("orb"));
    let center = Vec3::new(1.0, 2.0, 3.0);
    for phase in [0.0f32, 0.7, 2.4, 5.9] {
        apply_orbit(&mut scene, id, center, 0.5, phase);
        let pos = scene.node(id).map(|n| n.local.translation).expect("node");
        let radial = pos - center;
        assert!((radial.length() - 0.5).abs() < 1e-5, "phase {}", phase);
        assert!(radial.y.abs() < 1e-6, "orbit stays in the horizontal plane");
    }
}

#[test]
fn pulse_is_centered_on_its_base() {
    // sin(0) = 0: midline.
    assert!((pulse(0.0, 0.4, 0.1, 2.0) - 0.4).abs() < 1e-6);
    // Quarter period: crest.
    let quarter = std::f32::consts::FRAC_PI_2 / 2.0;
    assert!((pulse(quarter, 0.4, 0.1, 2.0) - 0.5).abs() < 1e-5);
    // Three quarters: trough.
    let three_quarters = 3.0 * std::f32::consts::FRAC_PI_2 / 2.0;
    assert!((pulse(three_quarters, 0.4, 0.1, 2.0) - 0.3).abs() < 1e-5);
}
