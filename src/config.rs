// config.rs - Embedded configuration
//
// Nothing here is read at runtime from outside; the only input is the
// viewport width, sampled once at initialization to pick a device profile.

use glam::Vec3;

/// DOM id of the canvas the web entry point binds to.
pub const CANVAS_ID: &str = "tactical-map-canvas";

/// Viewports narrower than this get the mobile profile.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

/// Upper bound on the device pixel ratio handed to the backend.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

const SPACING: f32 = 1.5;
const KEEP_PROBABILITY: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    pub fn from_viewport_width(width: f64) -> Self {
        if width < MOBILE_BREAKPOINT_PX { DeviceClass::Mobile } else { DeviceClass::Desktop }
    }
}

/// Lattice and sampling parameters for the terrain field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    /// Hard cap on generated points.
    pub point_budget: usize,
    /// Lattice cells along x.
    pub grid_width: i32,
    /// Lattice cells along z.
    pub grid_depth: i32,
    pub spacing: f32,
    /// Chance that a lattice cell produces a point.
    pub keep_probability: f64,
    /// Fixed RNG seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl FieldConfig {
    pub fn for_device(device: DeviceClass) -> Self {
        let (point_budget, grid) = match device {
            DeviceClass::Mobile => (1500, 40),
            DeviceClass::Desktop => (6000, 80),
        };
        Self {
            point_budget,
            grid_width: grid,
            grid_depth: grid,
            spacing: SPACING,
            keep_probability: KEEP_PROBABILITY,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 10.0, 40.0),
            target: Vec3::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerPreference {
    Default,
    LowPower,
    HighPerformance,
}

/// Context attributes requested from the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererOptions {
    pub alpha: bool,
    pub antialias: bool,
    pub power_preference: PowerPreference,
    pub fail_if_major_performance_caveat: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            alpha: true,
            antialias: true,
            // high-performance gets refused sooner on weak GPUs
            power_preference: PowerPreference::Default,
            fail_if_major_performance_caveat: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub device: DeviceClass,
    pub field: FieldConfig,
    pub camera: CameraConfig,
    pub renderer: RendererOptions,
    pub max_pixel_ratio: f64,
}

impl MapConfig {
    pub fn for_device(device: DeviceClass) -> Self {
        Self {
            device,
            field: FieldConfig::for_device(device),
            camera: CameraConfig::default(),
            renderer: RendererOptions::default(),
            max_pixel_ratio: MAX_PIXEL_RATIO,
        }
    }

    pub fn for_viewport(width: f64) -> Self {
        Self::for_device(DeviceClass::from_viewport_width(width))
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.field.seed = Some(seed);
        self
    }

    pub fn pixel_ratio(&self, device_ratio: f64) -> f64 {
        device_ratio.min(self.max_pixel_ratio)
    }
}
