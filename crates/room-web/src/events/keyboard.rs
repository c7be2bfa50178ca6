use super::{apply_web_effects, InputWiring};
use wasm_bindgen::JsCast;
use web_sys as web;

fn handle_global_keydown(ev: &web::KeyboardEvent, w: &InputWiring) {
    match ev.key().as_str() {
        "w" | "W" | "ArrowUp" => {
            w.move_input.borrow_mut().forward = true;
            ev.prevent_default();
        }
        "s" | "S" | "ArrowDown" => {
            w.move_input.borrow_mut().back = true;
            ev.prevent_default();
        }
        "a" | "A" | "ArrowLeft" => {
            w.move_input.borrow_mut().left = true;
            ev.prevent_default();
        }
        "d" | "D" | "ArrowRight" => {
            w.move_input.borrow_mut().right = true;
            ev.prevent_default();
        }
        // The monitor's external shutdown control.
        "Escape" => {
            let effects = w.viewer.borrow_mut().shutdown_monitor();
            apply_web_effects(w, &effects);
        }
        _ => {}
    }
}

fn handle_global_keyup(ev: &web::KeyboardEvent, w: &InputWiring) {
    match ev.key().as_str() {
        "w" | "W" | "ArrowUp" => w.move_input.borrow_mut().forward = false,
        "s" | "S" | "ArrowDown" => w.move_input.borrow_mut().back = false,
        "a" | "A" | "ArrowLeft" => w.move_input.borrow_mut().left = false,
        "d" | "D" | "ArrowRight" => w.move_input.borrow_mut().right = false,
        _ => {}
    }
}

pub fn wire_global_keys(w: &InputWiring) {
    if let Some(window) = web::window() {
        let w_down = w.clone();
        let down_closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &w_down);
            }) as Box<dyn FnMut(_)>);
        _ = window
            .add_event_listener_with_callback("keydown", down_closure.as_ref().unchecked_ref());
        down_closure.forget();

        let w_up = w.clone();
        let up_closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keyup(&ev, &w_up);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keyup", up_closure.as_ref().unchecked_ref());
        up_closure.forget();
    }
}
