use crate::render;
use instant::Instant;
use room_core::camera::{Camera, MoveInput, OrbitState};
use room_core::viewer::Viewer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub viewer: Rc<RefCell<Viewer>>,
    pub camera: Rc<RefCell<Camera>>,
    pub orbit: Rc<RefCell<OrbitState>>,
    pub move_input: Rc<RefCell<MoveInput>>,
    pub look_enabled: Rc<RefCell<bool>>,

    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'static>>,

    pub last_instant: Instant,
    pub clock_sec: f32,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        self.clock_sec += dt_sec;

        self.update_camera(dt_sec);
        self.viewer.borrow_mut().advance(dt_sec, self.clock_sec);

        if let Some(g) = &mut self.gpu {
            let w = self.canvas.width();
            let h = self.canvas.height();
            g.resize_if_needed(w, h);
            self.camera.borrow_mut().aspect = w as f32 / h.max(1) as f32;

            let viewer = self.viewer.borrow();
            let camera = self.camera.borrow();
            if let Err(e) = g.render(&viewer, &camera) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    // Free-look update; frozen while the monitor panel is up.
    fn update_camera(&mut self, dt_sec: f32) {
        let mut orbit = self.orbit.borrow_mut();
        if *self.look_enabled.borrow() {
            orbit.update(*self.move_input.borrow(), dt_sec);
        }
        orbit.write_to(&mut self.camera.borrow_mut());
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        if let Some(cb) = tick.borrow().as_ref() {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}
