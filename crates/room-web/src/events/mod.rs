pub mod keyboard;
pub mod pointer;

pub use keyboard::wire_global_keys;
pub use pointer::wire_input_handlers;

use crate::constants::ASSET_COMPANION;
use crate::{dom, loader, overlay};
use room_core::camera::{Camera, MoveInput, OrbitState};
use room_core::state::{Effect, Effects};
use room_core::viewer::Viewer;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

#[derive(Default, Clone, Copy)]
pub struct PointerState {
    pub down: bool,
    pub last_x: f32,
    pub last_y: f32,
    pub moved_px: f32,
}

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub viewer: Rc<RefCell<Viewer>>,
    pub camera: Rc<RefCell<Camera>>,
    pub orbit: Rc<RefCell<OrbitState>>,
    pub move_input: Rc<RefCell<MoveInput>>,
    pub look_enabled: Rc<RefCell<bool>>,
    pub pointer: Rc<RefCell<PointerState>>,
}

/// Apply the web-only side of state-machine effects: panel visibility,
/// free-look suspension, and the deferred companion load on first open.
pub fn apply_web_effects(w: &InputWiring, effects: &Effects) {
    for effect in effects {
        match *effect {
            Effect::MonitorOpened { first_time } => {
                *w.look_enabled.borrow_mut() = false;
                if let Some(doc) = dom::window_document() {
                    overlay::show_panel(&doc);
                }
                if first_time {
                    loader::spawn_load(
                        w.viewer.clone(),
                        ASSET_COMPANION,
                        "companion",
                        |v, root| v.install_companion(root),
                    );
                }
            }
            Effect::MonitorShutDown => {
                *w.look_enabled.borrow_mut() = true;
                if let Some(doc) = dom::window_document() {
                    overlay::hide_panel(&doc);
                }
            }
            // Everything else is already applied inside the viewer.
            _ => {}
        }
    }
}
