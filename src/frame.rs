use std::cell::{Cell, RefCell};
use std::rc::Rc;

use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::MAX_FRAME_DT_SEC;
use crate::input;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` loop. Dropping it cancels the pending frame and
/// frees the callback.
pub struct FrameLoop {
    tick: Tick,
    handle: Rc<Cell<Option<i32>>>,
}

fn request(tick: &Tick, handle: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        handle.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
    }
}

impl FrameLoop {
    /// Call `on_frame` with the clamped seconds since the previous frame.
    pub fn start(mut on_frame: impl FnMut(f32) + 'static) -> Self {
        let tick: Tick = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));

        let tick_clone = tick.clone();
        let handle_clone = handle.clone();
        let mut last = Instant::now();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let now = Instant::now();
            let dt = input::clamp_frame_dt((now - last).as_secs_f32(), MAX_FRAME_DT_SEC);
            last = now;
            on_frame(dt);
            request(&tick_clone, &handle_clone);
        }) as Box<dyn FnMut()>));

        request(&tick, &handle);
        Self { tick, handle }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(w), Some(h)) = (web::window(), self.handle.take()) {
            _ = w.cancel_animation_frame(h);
        }
        // breaks the closure's reference to itself
        self.tick.borrow_mut().take();
    }
}
