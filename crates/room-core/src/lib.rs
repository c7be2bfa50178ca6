//! Platform-independent core of the room viewer: scene-node arena, target
//! registry, pointer hit resolution, per-target interaction state machines,
//! glow effects, and continuous animation. The web crate wires this to the
//! canvas, the renderer, and the event loop.

pub mod anim;
pub mod camera;
pub mod constants;
pub mod glow;
pub mod hit;
pub mod lights;
pub mod particles;
pub mod registry;
pub mod scene;
pub mod state;
pub mod viewer;
