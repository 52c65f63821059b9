// render/ - Rendering backends
//
// A backend owns the drawing surface's pixels: WebGL2 in the browser, a CPU
// rasterizer everywhere else. Both draw the same scene with the same camera
// math; sizes are CSS pixels, the drawing buffer is size * pixel ratio.

mod raster;
#[cfg(target_arch = "wasm32")]
mod webgl;

pub use raster::Raster;
#[cfg(target_arch = "wasm32")]
pub use webgl::WebGlBackend;

use crate::error::RenderError;
use crate::scene::{PerspectiveCamera, Scene};

pub trait Backend {
    /// Output size in CSS pixels.
    fn set_size(&mut self, width: u32, height: u32);

    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Draw one frame. Re-uploads positions when the cloud's version moved.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError>;

    /// Rebuild GPU-side resources after the context came back.
    fn restore(&mut self) -> Result<(), RenderError>;

    /// Free everything the backend allocated. Rendering afterwards fails.
    fn release(&mut self);
}

/// Drawing-buffer extent for a CSS size at `ratio`.
#[inline]
pub fn drawing_buffer_size(width: u32, height: u32, ratio: f64) -> (u32, u32) {
    ((width as f64 * ratio).floor() as u32, (height as f64 * ratio).floor() as u32)
}

/// Point-size scale for attenuation: half the drawing-buffer height.
#[inline]
pub fn point_scale(buffer_height: u32) -> f32 {
    buffer_height as f32 * 0.5
}
