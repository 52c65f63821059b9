// sim/ - Map lifecycle and animation
//
// `TacticalMap` owns the scene, camera and backend of one surface and runs
// one frame at a time. Platform glue feeds it timestamps, resize events,
// visibility changes and context events; it never touches the DOM itself.

mod clock;
mod schedule;
mod visibility;
mod wave;

pub use clock::Clock;
pub use schedule::{Animate, FrameOutcome, FrameScheduler, SharedAnimation};
pub use visibility::VisibilityGate;
pub use wave::{Sea, sway, wave_offset};

use crate::config::{MapConfig, RendererOptions};
use crate::error::{MapError, RenderError};
use crate::render::Backend;
use crate::scene::{PerspectiveCamera, Scene};
use crate::world::PointField;

/// The drawable region a map renders into.
pub trait Surface {
    /// Layout size of the parent container, in CSS pixels.
    fn container_size(&self) -> (f64, f64);

    fn device_pixel_ratio(&self) -> f64;

    /// Suppress display of the surface.
    fn hide(&mut self);

    fn is_hidden(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapState {
    Running,
    /// Context gone; renders suppressed until restored.
    ContextLost,
    /// Released; every further frame stops.
    Disposed,
}

pub struct TacticalMap<S, B> {
    surface: S,
    backend: B,
    scene: Scene,
    camera: PerspectiveCamera,
    sea: Sea,
    gate: VisibilityGate,
    clock: Clock,
    state: MapState,
}

impl<S: Surface, B: Backend> TacticalMap<S, B> {
    /// Build the pipeline for `surface`.
    ///
    /// `acquire` creates the backend. If it fails the surface is hidden and
    /// nothing else is built.
    pub fn build<F>(
        mut surface: S,
        config: &MapConfig,
        gate: VisibilityGate,
        acquire: F,
    ) -> Result<Self, MapError>
    where
        F: FnOnce(&S, &RendererOptions) -> Result<B, RenderError>,
    {
        let (width, height) = css_size(surface.container_size());
        let camera = PerspectiveCamera::new(&config.camera, width as f32 / height as f32);

        let mut backend = match acquire(&surface, &config.renderer) {
            Ok(backend) => backend,
            Err(err) => {
                log::error!("tactical map: renderer unavailable: {err}");
                surface.hide();
                return Err(err.into());
            }
        };
        backend.set_size(width, height);
        backend.set_pixel_ratio(config.pixel_ratio(surface.device_pixel_ratio()));

        let field = PointField::generate(&config.field);
        let sea = Sea::from_field(&field);
        log::info!(
            "tactical map: {} points ({} sea) on {}x{} ({:?})",
            field.len(),
            sea.len(),
            width,
            height,
            config.device
        );

        Ok(Self {
            surface,
            backend,
            scene: Scene::new(field),
            camera,
            sea,
            gate,
            clock: Clock::new(),
            state: MapState::Running,
        })
    }

    /// Run one frame at timestamp `now_ms`.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        if self.state == MapState::Disposed {
            return FrameOutcome::Stopped;
        }
        if self.gate.is_paused() {
            return FrameOutcome::Skipped;
        }
        if self.surface.is_hidden() {
            log::debug!("tactical map: surface hidden, stopping");
            return FrameOutcome::Stopped;
        }
        if self.state == MapState::ContextLost {
            return FrameOutcome::Skipped;
        }

        let t = self.clock.elapsed(now_ms) as f32;
        self.sea.animate(&mut self.scene.points, t);

        match self.backend.render(&self.scene, &self.camera) {
            Ok(()) => FrameOutcome::Rendered,
            Err(RenderError::ContextLost) => {
                self.context_lost();
                FrameOutcome::Skipped
            }
            Err(err) => {
                log::error!("tactical map: render failed: {err}");
                self.surface.hide();
                self.dispose();
                FrameOutcome::Stopped
            }
        }
    }

    /// Match camera and backend to the container's current size.
    pub fn resize(&mut self) {
        if self.state == MapState::Disposed {
            return;
        }
        let (width, height) = css_size(self.surface.container_size());
        self.camera.aspect = width as f32 / height as f32;
        self.camera.update_projection_matrix();
        self.backend.set_size(width, height);
    }

    pub fn context_lost(&mut self) {
        if self.state == MapState::Running {
            log::warn!("tactical map: rendering context lost, pausing renders");
            self.state = MapState::ContextLost;
        }
    }

    /// Rebuild backend resources and resume. Stops for good if that fails.
    pub fn context_restored(&mut self) {
        if self.state != MapState::ContextLost {
            return;
        }
        match self.backend.restore() {
            Ok(()) => {
                log::info!("tactical map: rendering context restored");
                self.state = MapState::Running;
            }
            Err(err) => {
                log::error!("tactical map: could not restore context: {err}");
                self.surface.hide();
                self.dispose();
            }
        }
    }

    pub fn dispose(&mut self) {
        if self.state == MapState::Disposed {
            return;
        }
        self.backend.release();
        self.state = MapState::Disposed;
        log::debug!("tactical map: disposed");
    }

    pub fn state(&self) -> MapState {
        self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn gate(&self) -> &VisibilityGate {
        &self.gate
    }

    pub fn sea(&self) -> &Sea {
        &self.sea
    }

    pub fn point_count(&self) -> usize {
        self.scene.points.len()
    }
}

impl<S: Surface, B: Backend> Animate for TacticalMap<S, B> {
    fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        TacticalMap::frame(self, now_ms)
    }
}

/// Container size in whole CSS pixels, never zero.
fn css_size((width, height): (f64, f64)) -> (u32, u32) {
    let clamp = |v: f64| if v.is_finite() && v >= 1.0 { v as u32 } else { 1 };
    (clamp(width), clamp(height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_sizes_clamp_to_one_pixel() {
        assert_eq!(css_size((0.0, 0.0)), (1, 1));
        assert_eq!(css_size((f64::NAN, 300.5)), (1, 300));
        assert_eq!(css_size((800.0, 600.0)), (800, 600));
    }
}
