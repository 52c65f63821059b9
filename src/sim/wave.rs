// wave.rs - Sea surface animation
//
// The sea subset never changes after generation, so its indices are
// collected once and each frame only touches those points.

use crate::scene::PointCloud;
use crate::world::{PointField, is_animated_sea};

const WAVE_FREQ_X: f32 = 0.3;
const WAVE_FREQ_Z: f32 = 0.2;
const WAVE_AMPLITUDE: f32 = 0.5;

const SWAY_RATE: f32 = 0.1;
const SWAY_AMPLITUDE: f32 = 0.05;

/// Vertical offset of a sea point at time `t` (seconds).
#[inline]
pub fn wave_offset(x: f32, z: f32, t: f32) -> f32 {
    (x * WAVE_FREQ_X + t).sin() * (z * WAVE_FREQ_Z + t).cos() * WAVE_AMPLITUDE
}

/// Whole-cloud yaw at time `t`.
#[inline]
pub fn sway(t: f32) -> f32 {
    (t * SWAY_RATE).sin() * SWAY_AMPLITUDE
}

#[derive(Clone, Debug, Default)]
pub struct Sea {
    indices: Vec<usize>,
}

impl Sea {
    pub fn from_field(field: &PointField) -> Self {
        let indices = field
            .positions()
            .iter()
            .zip(field.base_elevation())
            .enumerate()
            .filter(|(_, (p, base))| is_animated_sea(**base, p[2]))
            .map(|(i, _)| i)
            .collect();
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, i: usize) -> bool {
        self.indices.binary_search(&i).is_ok()
    }

    /// Displace every sea point from its base elevation, then sway the cloud.
    pub fn animate(&self, cloud: &mut PointCloud, t: f32) {
        let field = cloud.field_mut();
        for &i in &self.indices {
            let [x, _, z] = field.positions()[i];
            let base = field.base_elevation()[i];
            field.set_y(i, base + wave_offset(x, z, t));
        }
        cloud.mark_positions_dirty();
        cloud.rotation_y = sway(t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeviceClass, FieldConfig};
    use crate::scene::PointsMaterial;

    fn cloud(seed: u64) -> PointCloud {
        let config = FieldConfig { seed: Some(seed), ..FieldConfig::for_device(DeviceClass::Mobile) };
        PointCloud::new(PointField::generate(&config), PointsMaterial::default())
    }

    #[test]
    fn zero_crossings_of_the_wave() {
        // sin(x*0.3 + 0) vanishes at x = 0
        assert_eq!(wave_offset(0.0, 7.5, 0.0), 0.0);
        // cos(z*0.2 + t) vanishes at z*0.2 + t = pi/2
        let z = 5.0;
        let t = std::f32::consts::FRAC_PI_2 - z * 0.2;
        assert!(wave_offset(3.0, z, t).abs() < 1e-6);
        assert_eq!(sway(0.0), 0.0);
    }

    #[test]
    fn sea_points_follow_the_wave_formula() {
        let mut cloud = cloud(5);
        let sea = Sea::from_field(cloud.field());
        let t = 1.7;
        sea.animate(&mut cloud, t);

        let field = cloud.field();
        let mut animated = 0;
        for i in 0..field.len() {
            let [x, y, z] = field.positions()[i];
            let base = field.base_elevation()[i];
            if base < 2.0 && z > -10.0 {
                let expected = base + (x * 0.3 + t).sin() * (z * 0.2 + t).cos() * 0.5;
                assert!((y - expected).abs() < 1e-6, "point {i}: {y} != {expected}");
                animated += 1;
            } else {
                assert_eq!(y, base, "point {i} outside the sea moved");
            }
        }
        assert_eq!(animated, sea.len());
        assert!(animated > 0);
    }

    #[test]
    fn every_sea_point_is_visited() {
        let cloud = cloud(9);
        let sea = Sea::from_field(cloud.field());
        let field = cloud.field();
        for i in 0..field.len() {
            let z = field.positions()[i][2];
            assert_eq!(sea.contains(i), is_animated_sea(field.base_elevation()[i], z));
        }
    }

    #[test]
    fn animate_bumps_version_and_sways() {
        let mut cloud = cloud(2);
        let sea = Sea::from_field(cloud.field());
        sea.animate(&mut cloud, 3.0);
        assert_eq!(cloud.positions_version(), 1);
        assert!((cloud.rotation_y - (0.3f32).sin() * 0.05).abs() < 1e-7);
        // colors never move
        assert_eq!(cloud.field().colors(), self::cloud(2).field().colors());
    }
}
