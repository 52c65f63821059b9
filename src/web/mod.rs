// web/ - Browser entry point
//
// Looks up the canvas, builds a map over it, wires DOM events and hands the
// map to the shared frame loop. Failures stay local: the page gets no map
// and keeps working.

mod events;
mod frame;
mod instance;
mod surface;

pub use surface::CanvasSurface;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::config::{CANVAS_ID, MOBILE_BREAKPOINT_PX, MapConfig};
use crate::error::MapError;
use crate::render::WebGlBackend;
use crate::sim::{TacticalMap, VisibilityGate};
use events::Bindings;
use instance::WebInstance;

type WebMap = TacticalMap<CanvasSurface, WebGlBackend>;

/// Marks a canvas that already hosts a live map.
const BOUND_ATTR: &str = "data-tactical-map";

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // a second logger install fails harmlessly
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Bind the tactical map to `#tactical-map-canvas`, if the page has one.
#[wasm_bindgen(js_name = initTacticalMap)]
pub fn init_tactical_map() -> Option<TacticalMapHandle> {
    match mount(CANVAS_ID) {
        Ok(handle) => Some(handle),
        Err(MapError::SurfaceNotFound(id)) => {
            log::debug!("tactical map: no #{id} on this page");
            None
        }
        Err(MapError::Context(_)) => None, // already reported, canvas hidden
        Err(err) => {
            log::warn!("tactical map: {err}");
            None
        }
    }
}

fn mount(id: &str) -> Result<TacticalMapHandle, MapError> {
    let window = web_sys::window().ok_or_else(|| MapError::Environment("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| MapError::Environment("no document".into()))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(id)
        .ok_or_else(|| MapError::SurfaceNotFound(id.to_string()))?
        .dyn_into()
        .map_err(|_| MapError::NotACanvas(id.to_string()))?;
    if canvas.has_attribute(BOUND_ATTR) {
        return Err(MapError::AlreadyBound(id.to_string()));
    }

    let viewport = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(MOBILE_BREAKPOINT_PX);
    let config = MapConfig::for_viewport(viewport);
    let gate = VisibilityGate::new();

    let surface = CanvasSurface::new(canvas.clone(), window.clone())?;
    let map = WebMap::build(surface, &config, gate.clone(), |surface, options| {
        WebGlBackend::acquire(surface.canvas(), options)
    })?;
    let map = Rc::new(RefCell::new(map));

    let bindings = match Bindings::attach(&window, &canvas, &map, &gate) {
        Ok(bindings) => bindings,
        Err(err) => {
            map.borrow_mut().dispose();
            return Err(MapError::Environment(format!("{err:?}")));
        }
    };
    let _ = canvas.set_attribute(BOUND_ATTR, "");
    let instance = Rc::new(RefCell::new(WebInstance::new(map, canvas, bindings)));
    frame::enqueue(instance.clone());

    Ok(TacticalMapHandle { instance, gate })
}

/// Control handle for a mounted map.
///
/// The frame loop keeps the map and its page subscriptions alive; dropping
/// the handle changes nothing. Call `dispose` to take the map down.
#[wasm_bindgen]
pub struct TacticalMapHandle {
    instance: Rc<RefCell<WebInstance>>,
    gate: VisibilityGate,
}

#[wasm_bindgen]
impl TacticalMapHandle {
    /// Detach from the page and free GPU resources. Idempotent.
    pub fn dispose(&self) {
        self.instance.borrow_mut().unmount();
    }

    #[wasm_bindgen(js_name = isPaused)]
    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }

    #[wasm_bindgen(js_name = pointCount)]
    pub fn point_count(&self) -> usize {
        self.instance.borrow().map().borrow().point_count()
    }
}
