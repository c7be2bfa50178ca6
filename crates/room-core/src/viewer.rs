//! Top-level interaction controller.
//!
//! Owns the scene, the target registry, the per-target state machines and
//! every effect they drive. The web layer feeds it rays and frame deltas;
//! everything else happens here, which is what makes the click behavior
//! testable without a browser.

use crate::anim::{apply_orbit, apply_spin, AnimationState};
use crate::constants::*;
use crate::glow::GlowManager;
use crate::hit::{resolve, Hit, Ray};
use crate::lights::LightRig;
use crate::particles::SparkField;
use crate::registry::{Target, TargetRegistry};
use crate::scene::{NodeId, Scene};
use crate::state::{Effect, Effects, Interactions};
use glam::Vec3;

const RASENGAN_GLOW_COLOR: Vec3 = Vec3::new(0.35, 0.65, 1.0);
const SUMMON_GLOW_COLOR: Vec3 = Vec3::new(0.55, 0.2, 0.85);

pub struct Viewer {
    pub scene: Scene,
    pub registry: TargetRegistry,
    pub interactions: Interactions,
    pub glow: GlowManager,
    pub rig: LightRig,
    pub spin_anim: AnimationState,
    pub orbit_anim: AnimationState,
    pub sparks: SparkField,
    summon_root: Option<NodeId>,
    rasengan_center: Vec3,
    rasengan_base_scale: Option<Vec3>,
}

impl Viewer {
    pub fn new(seed: u64) -> Self {
        let mut registry = TargetRegistry::new();
        for target in [
            Target::Lamp,
            Target::Monitor,
            Target::Naruto,
            Target::Sasuke,
            Target::Rasengan,
        ] {
            if let Err(e) = registry.register(target) {
                log::warn!("[registry] {}", e);
            }
        }
        Self {
            scene: Scene::new(),
            registry,
            interactions: Interactions::new(),
            glow: GlowManager::new(),
            rig: LightRig::new(),
            spin_anim: AnimationState::default(),
            orbit_anim: AnimationState::default(),
            sparks: SparkField::new(seed),
            summon_root: None,
            rasengan_center: Vec3::ZERO,
            rasengan_base_scale: None,
        }
    }

    /// Room model finished loading: locate the named fixtures inside it.
    /// A missing fixture is logged and that target stays non-hit-testable.
    pub fn install_room(&mut self, root: NodeId) {
        match self.scene.find_by_name(root, "lamp") {
            Some(lamp) => {
                self.registry.set_root(Target::Lamp, lamp);
                self.rig.lamp.position = self
                    .scene
                    .world_transform(lamp)
                    .transform_point3(Vec3::ZERO);
            }
            None => log::warn!("[load] room has no 'lamp' node; lamp stays inert"),
        }
        let monitor = self
            .scene
            .find_by_name(root, "monitor")
            .or_else(|| self.scene.find_by_name(root, "screen"));
        match monitor {
            Some(m) => self.registry.set_root(Target::Monitor, m),
            None => log::warn!("[load] room has no 'monitor' node; monitor stays inert"),
        }
    }

    pub fn install_spin_figure(&mut self, root: NodeId) {
        self.registry.set_root(Target::Naruto, root);
    }

    pub fn install_summoner(&mut self, root: NodeId) {
        self.registry.set_root(Target::Sasuke, root);
    }

    /// The rasengan glows and orbits from the moment it loads.
    pub fn install_rasengan(&mut self, root: NodeId) {
        self.registry.set_root(Target::Rasengan, root);
        if let Some(n) = self.scene.node(root) {
            self.rasengan_center = n.local.translation;
        }
        self.glow
            .attach(&mut self.scene, Target::Rasengan, root, RASENGAN_GLOW_COLOR);
        self.orbit_anim.activate();
        self.sparks.set_active(true);
    }

    /// The summon creature loads detached; it enters the scene only when a
    /// summon completes.
    pub fn install_summon_model(&mut self, root: NodeId) {
        self.summon_root = Some(root);
    }

    /// The monitor's deferred companion prop, loaded on first open.
    pub fn install_companion(&mut self, root: NodeId) {
        if let Some(monitor) = self.registry.root_of(Target::Monitor) {
            let anchor = self
                .scene
                .world_transform(monitor)
                .transform_point3(Vec3::ZERO);
            if let Some(n) = self.scene.node_mut(root) {
                n.local.translation = anchor + Vec3::new(0.0, 0.15, 0.0);
            }
        }
        self.scene.attach_root(root);
    }

    pub fn summon_root(&self) -> Option<NodeId> {
        self.summon_root
    }

    /// Resolve a click ray and advance at most one target machine.
    pub fn click_at(&mut self, ray: &Ray) -> Effects {
        let hit: Option<Hit> = resolve(&self.scene, &self.registry, ray);
        let hit = match hit {
            Some(h) => h,
            None => return Effects::new(),
        };
        log::info!(
            "[click] {} at distance {:.2}",
            hit.target.label(),
            hit.distance
        );
        let effects = self.interactions.click(hit.target);
        self.apply_effects(&effects);
        effects
    }

    /// The external monitor shutdown control.
    pub fn shutdown_monitor(&mut self) -> Effects {
        let effects = self.interactions.shutdown_monitor();
        self.apply_effects(&effects);
        effects
    }

    fn apply_effects(&mut self, effects: &Effects) {
        for effect in effects {
            match *effect {
                Effect::LampChanged { on } => {
                    self.rig.apply_lamp(on);
                    log::info!("[lamp] {}", if on { "on" } else { "off" });
                }
                Effect::SpinChanged { spinning } => {
                    if spinning {
                        self.spin_anim.activate();
                    } else {
                        self.spin_anim.deactivate();
                    }
                }
                Effect::SummonStarted => {
                    log::info!("[summon] delay started");
                }
                Effect::SummonAppeared => match self.summon_root {
                    Some(root) => {
                        self.scene.attach_root(root);
                        self.glow
                            .attach(&mut self.scene, Target::Sasuke, root, SUMMON_GLOW_COLOR);
                    }
                    None => log::warn!("[summon] model never loaded; nothing to show"),
                },
                Effect::SummonDismissed => {
                    self.glow.detach(&mut self.scene, Target::Sasuke);
                    if let Some(root) = self.summon_root {
                        self.scene.detach_root(root);
                    }
                }
                Effect::RasenganChanged { enlarged } => {
                    if let Some(root) = self.registry.root_of(Target::Rasengan) {
                        if enlarged {
                            let base = self
                                .scene
                                .node(root)
                                .map(|n| n.local.scale)
                                .unwrap_or(Vec3::ONE);
                            self.rasengan_base_scale = Some(base);
                            if let Some(n) = self.scene.node_mut(root) {
                                n.local.scale = base * RASENGAN_SCALE_MULTIPLIER;
                            }
                        } else if let Some(base) = self.rasengan_base_scale.take() {
                            if let Some(n) = self.scene.node_mut(root) {
                                n.local.scale = base;
                            }
                        }
                    }
                }
                // Overlay UI and camera-look suspension live in the web layer.
                Effect::MonitorOpened { .. } | Effect::MonitorShutDown => {}
            }
        }
    }

    /// Per-frame tick: summon delay, continuous animations, glow pulse and
    /// spark motion. Targets that have not loaded yet are skipped.
    pub fn advance(&mut self, dt_sec: f32, clock_sec: f32) {
        let ticked = self.interactions.tick(dt_sec);
        if !ticked.is_empty() {
            self.apply_effects(&ticked);
        }

        self.spin_anim.advance(SPIN_RATE_RAD_PER_SEC, dt_sec);
        if self.spin_anim.active {
            if let Some(root) = self.registry.root_of(Target::Naruto) {
                apply_spin(&mut self.scene, root, self.spin_anim.phase);
            }
        }

        self.orbit_anim.advance(ORBIT_RATE_RAD_PER_SEC, dt_sec);
        if self.orbit_anim.active {
            if let Some(root) = self.registry.root_of(Target::Rasengan) {
                apply_orbit(
                    &mut self.scene,
                    root,
                    self.rasengan_center,
                    ORBIT_RADIUS,
                    self.orbit_anim.phase,
                );
            }
        }

        let summon_root = self.summon_root;
        let registry = &self.registry;
        self.glow.update(
            &mut self.scene,
            |t| match t {
                Target::Sasuke => summon_root,
                other => registry.root_of(other),
            },
            clock_sec,
        );

        if let Some(root) = self.registry.root_of(Target::Rasengan) {
            self.sparks.center = self
                .scene
                .world_transform(root)
                .transform_point3(Vec3::ZERO);
        }
        self.sparks.update(dt_sec);
    }
}
