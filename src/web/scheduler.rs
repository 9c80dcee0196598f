use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::engine::driver::{FrameCallback, FrameScheduler};

/// `requestAnimationFrame`-backed scheduler. Each frame gets its own one-shot
/// closure, freed by the JS side after it runs.
pub struct RafScheduler {
    window: Window,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for RafScheduler {
    fn schedule(&self, frame: FrameCallback) -> bool {
        let callback = Closure::once_into_js(move |ts: f64| frame(ts));
        self.window.request_animation_frame(callback.unchecked_ref()).is_ok()
    }
}
