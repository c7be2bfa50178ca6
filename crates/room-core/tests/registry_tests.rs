// Tests for target registration and root-node bookkeeping.

use room_core::registry::{Target, TargetRegistry};
use room_core::scene::{Node, Scene};

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = TargetRegistry::new();
    assert!(registry.register(Target::Lamp).is_ok());
    let err = registry.register(Target::Lamp);
    assert!(err.is_err());
    // The original registration is untouched.
    assert_eq!(registry.root_of(Target::Lamp), None);
}

#[test]
fn targets_without_roots_are_skipped() {
    let mut scene = Scene::new();
    let mut registry = TargetRegistry::new();
    registry.register(Target::Lamp).expect("register");
    registry.register(Target::Monitor).expect("register");
    assert_eq!(registry.hit_testable().count(), 0);

    // Only the loaded target shows up, in registration order.
    let root = scene.add_root(Node::named("monitor"));
    registry.set_root(Target::Monitor, root);
    let testable: Vec<_> = registry.hit_testable().collect();
    assert_eq!(testable, vec![(Target::Monitor, root)]);
}

#[test]
fn owner_resolution_walks_ancestor_links() {
    let mut scene = Scene::new();
    let mut registry = TargetRegistry::new();
    let root = scene.add_root(Node::named("figure"));
    let limb = scene.add_child(root, Node::named("limb"));
    let finger = scene.add_child(limb, Node::named("finger"));
    let stray = scene.add_root(Node::named("scenery"));

    registry.register(Target::Naruto).expect("register");
    registry.set_root(Target::Naruto, root);

    assert_eq!(registry.owner_of(&scene, finger), Some(Target::Naruto));
    assert_eq!(registry.owner_of(&scene, limb), Some(Target::Naruto));
    assert_eq!(registry.owner_of(&scene, root), Some(Target::Naruto));
    assert_eq!(registry.owner_of(&scene, stray), None);
}

#[test]
fn replacing_a_root_forgets_the_old_one() {
    let mut scene = Scene::new();
    let mut registry = TargetRegistry::new();
    let old = scene.add_root(Node::named("old"));
    let new = scene.add_root(Node::named("new"));
    registry.register(Target::Rasengan).expect("register");
    registry.set_root(Target::Rasengan, old);
    registry.set_root(Target::Rasengan, new);

    assert_eq!(registry.root_of(Target::Rasengan), Some(new));
    assert_eq!(registry.owner_of(&scene, old), None);
    assert_eq!(registry.owner_of(&scene, new), Some(Target::Rasengan));
}
