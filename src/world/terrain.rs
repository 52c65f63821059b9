// terrain.rs - Elevation and region queries
//
// All coordinates are world-space (lattice index * spacing).
// Back of the field (z < MOUNTAIN_LINE) rises into ridges, the front is sea.

use crate::scene::Rgb;

/// Points behind this z may become mountains; points in front of it are sea.
pub const MOUNTAIN_LINE: f32 = -10.0;

/// Base elevation below which a front point is animated as sea.
pub const SEA_CEILING: f32 = 2.0;

pub const GOLD: Rgb = Rgb::from_hex(0xcda47d);
pub const CYAN: Rgb = Rgb::from_hex(0x00f3ff);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Mountain,
    Sea,
}

/// Elevation and classification of one lattice cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub elevation: f32,
    pub region: Region,
}

impl Sample {
    pub fn color(&self) -> Rgb {
        if self.region == Region::Mountain || self.elevation > SEA_CEILING { GOLD } else { CYAN }
    }
}

/// Two octaves of sin/cos ridges. Positive values raise mountains.
#[inline]
pub fn ridge_noise(px: f32, pz: f32) -> f32 {
    (px * 0.1).sin() * (pz * 0.1).cos() * 4.0 + (px * 0.3).sin() * (pz * 0.3).sin() * 2.0
}

/// Height gain with distance behind the mountain line.
#[inline]
pub fn elevation_factor(pz: f32) -> f32 {
    (pz - MOUNTAIN_LINE).abs() / 3.0
}

/// Evaluate the cell at world position (px, pz).
pub fn sample(px: f32, pz: f32) -> Sample {
    if pz < MOUNTAIN_LINE {
        let noise = ridge_noise(px, pz);
        if noise > 0.0 {
            return Sample {
                elevation: noise * elevation_factor(pz) * 0.5,
                region: Region::Mountain,
            };
        }
    }
    Sample { elevation: 0.0, region: Region::Sea }
}

/// Sea points in front of the mountain line are the animated subset.
#[inline]
pub fn is_animated_sea(base_elevation: f32, z: f32) -> bool {
    base_elevation < SEA_CEILING && z > MOUNTAIN_LINE
}
