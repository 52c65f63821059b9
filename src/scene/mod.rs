// scene/ - Scene graph for the map
//
// A single root: background, exponential fog and exactly one point cloud,
// seen through one perspective camera.

mod camera;
mod color;
mod points;

pub use camera::PerspectiveCamera;
pub use color::Rgb;
pub use points::{PointCloud, PointsMaterial};

use crate::world::PointField;

pub const BACKGROUND: Rgb = Rgb::from_hex(0x000508);
pub const FOG_DENSITY: f32 = 0.015;

/// Squared-exponential distance fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogExp2 {
    pub color: Rgb,
    pub density: f32,
}

impl FogExp2 {
    /// Blend weight towards the fog color at view distance `depth`.
    #[inline]
    pub fn factor(&self, depth: f32) -> f32 {
        let d = self.density * depth;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub background: Option<Rgb>,
    pub fog: Option<FogExp2>,
    pub points: PointCloud,
}

impl Scene {
    pub fn new(field: PointField) -> Self {
        Self {
            background: Some(BACKGROUND),
            fog: Some(FogExp2 { color: BACKGROUND, density: FOG_DENSITY }),
            points: PointCloud::new(field, PointsMaterial::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fog_thickens_with_distance() {
        let fog = FogExp2 { color: BACKGROUND, density: FOG_DENSITY };
        assert_eq!(fog.factor(0.0), 0.0);
        let near = fog.factor(10.0);
        let far = fog.factor(100.0);
        assert!(near > 0.0 && near < far && far <= 1.0);
    }
}
