use web_sys::{Element, HtmlCanvasElement, Window};

use crate::error::MapError;
use crate::sim::Surface;

/// A canvas and the element whose layout box sizes it.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    container: Element,
    window: Window,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, window: Window) -> Result<Self, MapError> {
        let container = canvas.parent_element().ok_or(MapError::MissingContainer)?;
        Ok(Self { canvas, container, window })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn container_size(&self) -> (f64, f64) {
        (self.container.client_width() as f64, self.container.client_height() as f64)
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn hide(&mut self) {
        let _ = self.canvas.style().set_property("display", "none");
    }

    fn is_hidden(&self) -> bool {
        self.canvas
            .style()
            .get_property_value("display")
            .map(|display| display == "none")
            .unwrap_or(false)
    }
}
