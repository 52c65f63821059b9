// events.rs - DOM subscriptions of one map
//
// Every subscription unregisters itself on drop, so dropping `Bindings`
// detaches the map from the page.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, HtmlCanvasElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use super::WebMap;
use crate::sim::VisibilityGate;

/// Mirrors the paused flag for page styles.
pub(super) const PAUSED_CLASS: &str = "paused";

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach<F>(target: &EventTarget, kind: &'static str, f: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(f);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

struct VisibilityObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl VisibilityObserver {
    fn observe(canvas: &HtmlCanvasElement, gate: VisibilityGate) -> Result<Self, JsValue> {
        let target = canvas.clone();
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _: IntersectionObserver| {
                apply_visibility(
                    &target,
                    &gate,
                    entries
                        .iter()
                        .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                        .map(|e| e.is_intersecting()),
                );
            },
        );

        let observer = IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &observer_options(),
        )?;
        observer.observe(canvas);
        Ok(Self { observer, _callback: callback })
    }
}

/// Observer settings: any visible pixel counts as intersecting.
pub(super) fn observer_options() -> IntersectionObserverInit {
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(0.0));
    init
}

/// Feed intersection states to the gate in order, then mirror the result
/// as the element's `paused` class.
pub(super) fn apply_visibility<I>(element: &Element, gate: &VisibilityGate, entries: I)
where
    I: IntoIterator<Item = bool>,
{
    gate.observe(entries);
    let _ = element.class_list().toggle_with_force(PAUSED_CLASS, gate.is_paused());
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub(super) struct Bindings {
    _resize: Listener,
    _context_lost: Listener,
    _context_restored: Listener,
    _visibility: VisibilityObserver,
}

impl Bindings {
    pub(super) fn attach(
        window: &Window,
        canvas: &HtmlCanvasElement,
        map: &Rc<RefCell<WebMap>>,
        gate: &VisibilityGate,
    ) -> Result<Self, JsValue> {
        let m = map.clone();
        let context_lost = Listener::attach(canvas, "webglcontextlost", move |event: Event| {
            // keep the browser from discarding the context for good
            event.prevent_default();
            if let Ok(mut map) = m.try_borrow_mut() {
                map.context_lost();
            }
        })?;

        let m = map.clone();
        let context_restored = Listener::attach(canvas, "webglcontextrestored", move |_| {
            if let Ok(mut map) = m.try_borrow_mut() {
                map.context_restored();
            }
        })?;

        let visibility = VisibilityObserver::observe(canvas, gate.clone())?;

        let m = map.clone();
        let resize = Listener::attach(window, "resize", move |_| {
            if let Ok(mut map) = m.try_borrow_mut() {
                map.resize();
            }
        })?;

        Ok(Self {
            _resize: resize,
            _context_lost: context_lost,
            _context_restored: context_restored,
            _visibility: visibility,
        })
    }
}
