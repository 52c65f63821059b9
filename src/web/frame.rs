// frame.rs - requestAnimationFrame driver
//
// One callback per thread feeds the shared scheduler; it re-arms itself
// only while some map is still alive.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::sim::{FrameScheduler, SharedAnimation};

thread_local! {
    static SCHEDULER: RefCell<FrameScheduler> = RefCell::new(FrameScheduler::new());
    static CALLBACK: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
}

pub(super) fn enqueue(animation: SharedAnimation) {
    let idle = SCHEDULER.with(|s| s.borrow_mut().register(animation));
    if idle {
        request_tick();
    }
}

fn request_tick() {
    CALLBACK.with(|cell| {
        let mut slot = cell.borrow_mut();
        let callback = slot.get_or_insert_with(|| Closure::<dyn FnMut(f64)>::new(tick));
        let Some(window) = web_sys::window() else {
            log::error!("tactical map: no window to schedule frames on");
            return;
        };
        if let Err(err) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            log::error!("tactical map: requestAnimationFrame failed: {err:?}");
        }
    });
}

fn tick(now_ms: f64) {
    let keep_going = SCHEDULER.with(|s| s.borrow_mut().tick(now_ms));
    if keep_going {
        request_tick();
    } else {
        log::debug!("tactical map: no live maps, frame loop idle");
    }
}
