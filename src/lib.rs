// ============================================================================
// TACTICAL MAP - Animated terrain point cloud for a page canvas
// ============================================================================
//
// world   -> generated point columns (mountains behind, sea in front)
// scene   -> camera, point cloud, fog
// sim     -> per-map lifecycle, sea waves, shared frame scheduler
// render  -> backends (WebGL2 in the browser, CPU raster elsewhere)
// web     -> DOM glue and the `initTacticalMap` export (wasm32 only)

pub mod config;
pub mod error;
pub mod render;
pub mod scene;
pub mod sim;
pub mod world;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{DeviceClass, FieldConfig, MapConfig};
pub use error::{MapError, RenderError};
pub use render::{Backend, Raster};
pub use sim::{FrameOutcome, FrameScheduler, MapState, Surface, TacticalMap, VisibilityGate};
pub use world::PointField;

#[cfg(target_arch = "wasm32")]
pub use web::{TacticalMapHandle, init_tactical_map};
