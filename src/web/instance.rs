// instance.rs - A mounted map and its page subscriptions
//
// The frame loop owns the instance, so listeners and the observer live as
// long as the map is scheduled, whether or not JS still holds a handle.
// An instance that stops on its own unmounts itself and frees the canvas.

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::HtmlCanvasElement;

use super::events::Bindings;
use super::{BOUND_ATTR, WebMap};
use crate::sim::{Animate, FrameOutcome};

pub(super) struct WebInstance {
    map: Rc<RefCell<WebMap>>,
    canvas: HtmlCanvasElement,
    bindings: Option<Bindings>,
}

impl WebInstance {
    pub(super) fn new(map: Rc<RefCell<WebMap>>, canvas: HtmlCanvasElement, bindings: Bindings) -> Self {
        Self { map, canvas, bindings: Some(bindings) }
    }

    pub(super) fn map(&self) -> &Rc<RefCell<WebMap>> {
        &self.map
    }

    pub(super) fn is_mounted(&self) -> bool {
        self.bindings.is_some()
    }

    /// Dispose the map, drop its subscriptions and clear the bound mark.
    pub(super) fn unmount(&mut self) {
        if self.bindings.take().is_none() {
            return;
        }
        self.map.borrow_mut().dispose();
        let _ = self.canvas.remove_attribute(BOUND_ATTR);
        log::info!("tactical map: unmounted");
    }
}

impl Animate for WebInstance {
    fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        if !self.is_mounted() {
            return FrameOutcome::Stopped;
        }
        let outcome = match self.map.try_borrow_mut() {
            Ok(mut map) => map.frame(now_ms),
            Err(_) => FrameOutcome::Skipped,
        };
        if outcome == FrameOutcome::Stopped {
            self.unmount();
        }
        outcome
    }
}
