#![cfg(target_arch = "wasm32")]
//! Browser entry point: wires the canvas, input, asynchronous model loads,
//! and the frame loop around the core viewer.

use crate::constants::*;
use instant::Instant;
use room_core::camera::{Camera, MoveInput, OrbitState};
use room_core::viewer::Viewer;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod loader;
mod overlay;
mod render;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Kick off every model fetch; completions land in arbitrary order and a
/// failed load leaves its target permanently inert.
fn spawn_model_loads(viewer: &Rc<RefCell<Viewer>>) {
    loader::spawn_load(viewer.clone(), ASSET_ROOM, "room", |v, root| {
        v.scene.attach_root(root);
        v.install_room(root);
        if let Some(doc) = dom::window_document() {
            overlay::hide_loading(&doc);
        }
    });
    loader::spawn_load(viewer.clone(), ASSET_NARUTO, "naruto", |v, root| {
        if let Some(n) = v.scene.node_mut(root) {
            n.local.translation = NARUTO_POS;
        }
        v.scene.attach_root(root);
        v.install_spin_figure(root);
    });
    loader::spawn_load(viewer.clone(), ASSET_SASUKE, "sasuke", |v, root| {
        if let Some(n) = v.scene.node_mut(root) {
            n.local.translation = SASUKE_POS;
        }
        v.scene.attach_root(root);
        v.install_summoner(root);
    });
    loader::spawn_load(viewer.clone(), ASSET_RASENGAN, "rasengan", |v, root| {
        if let Some(n) = v.scene.node_mut(root) {
            n.local.translation = RASENGAN_POS;
        }
        v.scene.attach_root(root);
        v.install_rasengan(root);
    });
    // Stays detached until a summon completes.
    loader::spawn_load(viewer.clone(), ASSET_SUSANOO, "susanoo", |v, root| {
        v.install_summon_model(root);
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("room-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::lookup_canvas(&document)?;

    wire_canvas_resize(&canvas);

    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let viewer = Rc::new(RefCell::new(Viewer::new(VIEWER_SEED)));
    let orbit = Rc::new(RefCell::new(OrbitState::new(
        CAMERA_FOCUS,
        CAMERA_RADIUS,
        CAMERA_START_YAW,
        CAMERA_START_PITCH,
    )));
    let camera = {
        let mut cam = Camera {
            eye: CAMERA_FOCUS,
            target: CAMERA_FOCUS,
            up: glam::Vec3::Y,
            aspect: canvas.width() as f32 / canvas.height().max(1) as f32,
            fovy_radians: FOVY_RAD,
            znear: ZNEAR,
            zfar: ZFAR,
        };
        orbit.borrow().write_to(&mut cam);
        Rc::new(RefCell::new(cam))
    };
    let move_input = Rc::new(RefCell::new(MoveInput::default()));
    let look_enabled = Rc::new(RefCell::new(true));
    let pointer = Rc::new(RefCell::new(events::PointerState::default()));

    spawn_model_loads(&viewer);

    let wiring = events::InputWiring {
        canvas: canvas.clone(),
        viewer: viewer.clone(),
        camera: camera.clone(),
        orbit: orbit.clone(),
        move_input: move_input.clone(),
        look_enabled: look_enabled.clone(),
        pointer: pointer.clone(),
    };
    events::wire_input_handlers(wiring.clone());
    events::wire_global_keys(&wiring);

    // The panel's close button doubles as the monitor shutdown control.
    {
        let wiring_close = wiring.clone();
        dom::add_click_listener(&document, "panel-close", move || {
            let effects = wiring_close.viewer.borrow_mut().shutdown_monitor();
            events::apply_web_effects(&wiring_close, &effects);
        });
    }

    let gpu = frame::init_gpu(&canvas).await;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        viewer,
        camera,
        orbit,
        move_input,
        look_enabled,
        canvas,
        gpu,
        last_instant: Instant::now(),
        clock_sec: 0.0,
    }));
    frame::start_loop(frame_ctx);

    Ok(())
}
