use super::{apply_web_effects, InputWiring};
use crate::constants::{CLICK_DRAG_THRESHOLD_PX, DRAG_LOOK_SENSITIVITY};
use glam::Vec2;
use room_core::hit;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w);
}

/// Pointer position in the canvas' backing-store pixel space.
#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let sx = (x_css / rect.width().max(1.0) as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height().max(1.0) as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = pointer_canvas_px(&ev, &w.canvas);
        let mut ps = w.pointer.borrow_mut();
        ps.down = true;
        ps.last_x = pos.x;
        ps.last_y = pos.y;
        ps.moved_px = 0.0;
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let pos = pointer_canvas_px(&ev, &w.canvas);
        let mut ps = w.pointer.borrow_mut();
        if !ps.down {
            return;
        }
        let dx = pos.x - ps.last_x;
        let dy = pos.y - ps.last_y;
        ps.last_x = pos.x;
        ps.last_y = pos.y;
        ps.moved_px += (dx * dx + dy * dy).sqrt();
        drop(ps);
        if *w.look_enabled.borrow() {
            w.orbit
                .borrow_mut()
                .apply_drag(dx, dy, DRAG_LOOK_SENSITIVITY);
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();

    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let was_click = {
            let mut ps = w.pointer.borrow_mut();
            let was_down = ps.down;
            ps.down = false;
            was_down && ps.moved_px < CLICK_DRAG_THRESHOLD_PX
        };
        if was_click {
            let pos = pointer_canvas_px(&ev, &w.canvas);
            let ray = hit::screen_to_world_ray(
                &w.camera.borrow(),
                pos.x,
                pos.y,
                w.canvas.width() as f32,
                w.canvas.height() as f32,
            );
            let effects = w.viewer.borrow_mut().click_at(&ray);
            apply_web_effects(&w, &effects);
        }
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
