// field.rs - Generated point columns
//
// Structure-of-Arrays: one column per attribute, one authoritative count.
// Points are only ever appended whole, so index i means the same point in
// every column.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::terrain;
use crate::config::FieldConfig;

/// One point, as handed to `PointField::push`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub base_elevation: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointField {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
    base_elevation: Vec<f32>,
}

impl PointField {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            positions: Vec::with_capacity(n),
            colors: Vec::with_capacity(n),
            base_elevation: Vec::with_capacity(n),
        }
    }

    /// Sample the lattice described by `config`, seeded or from entropy.
    pub fn generate(config: &FieldConfig) -> Self {
        match config.seed {
            Some(seed) => Self::generate_with(config, &mut StdRng::seed_from_u64(seed)),
            None => Self::generate_with(config, &mut StdRng::from_entropy()),
        }
    }

    pub fn generate_with<R: Rng + ?Sized>(config: &FieldConfig, rng: &mut R) -> Self {
        let half_w = config.grid_width / 2;
        let half_d = config.grid_depth / 2;
        let cells = (config.grid_width.max(0) * config.grid_depth.max(0)) as usize;
        let mut field = Self::with_capacity(cells.min(config.point_budget));

        'lattice: for x in -half_w..half_w {
            for z in -half_d..half_d {
                if field.len() >= config.point_budget {
                    log::debug!("point budget {} reached", config.point_budget);
                    break 'lattice;
                }
                // Drop some cells so the grid doesn't read as a grid
                if !rng.gen_bool(config.keep_probability) {
                    continue;
                }

                let px = x as f32 * config.spacing;
                let pz = z as f32 * config.spacing;
                let s = terrain::sample(px, pz);

                field.push(Point {
                    position: [px, s.elevation, pz],
                    color: s.color().to_array(),
                    base_elevation: s.elevation,
                });
            }
        }

        log::debug!("generated {} points from {} cells", field.len(), cells);
        field
    }

    pub fn push(&mut self, p: Point) {
        self.positions.push(p.position);
        self.colors.push(p.color);
        self.base_elevation.push(p.base_elevation);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.base_elevation.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.base_elevation.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn point(&self, i: usize) -> Point {
        Point {
            position: self.positions[i],
            color: self.colors[i],
            base_elevation: self.base_elevation[i],
        }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn base_elevation(&self) -> &[f32] {
        &self.base_elevation
    }

    /// Flat xyz view for buffer uploads.
    pub fn position_floats(&self) -> &[f32] {
        self.positions.as_flattened()
    }

    /// Flat rgb view for buffer uploads.
    pub fn color_floats(&self) -> &[f32] {
        self.colors.as_flattened()
    }

    /// Overwrite the working Y of point `i`. Base elevation is untouched.
    #[inline]
    pub fn set_y(&mut self, i: usize, y: f32) {
        self.positions[i][1] = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeviceClass, FieldConfig};
    use crate::world::{CYAN, GOLD, MOUNTAIN_LINE, ridge_noise};

    fn desktop(seed: u64) -> FieldConfig {
        FieldConfig { seed: Some(seed), ..FieldConfig::for_device(DeviceClass::Desktop) }
    }

    #[test]
    fn columns_stay_in_lockstep() {
        let field = PointField::generate(&desktop(7));
        let n = field.len();
        assert!(n > 0);
        assert_eq!(field.positions().len(), n);
        assert_eq!(field.colors().len(), n);
        assert_eq!(field.base_elevation().len(), n);
        assert_eq!(field.position_floats().len(), 3 * n);
        assert_eq!(field.color_floats().len(), 3 * n);
    }

    #[test]
    fn count_is_bounded_by_lattice() {
        for seed in 0..4 {
            let field = PointField::generate(&desktop(seed));
            assert!(field.len() <= 80 * 80);
            // 0.8 retention over 6400 cells lands far from either bound
            assert!(field.len() > 4000, "only {} points", field.len());
        }
    }

    #[test]
    fn budget_caps_point_count() {
        let config = FieldConfig { point_budget: 100, ..desktop(1) };
        assert_eq!(PointField::generate(&config).len(), 100);
    }

    #[test]
    fn keeping_every_cell_fills_the_lattice() {
        let config = FieldConfig {
            keep_probability: 1.0,
            ..FieldConfig::for_device(DeviceClass::Mobile)
        };
        let field = PointField::generate(&config);
        assert_eq!(field.len(), 1500);

        let config = FieldConfig { point_budget: usize::MAX, ..config };
        assert_eq!(PointField::generate(&config).len(), 40 * 40);
    }

    #[test]
    fn same_seed_same_field() {
        assert_eq!(PointField::generate(&desktop(42)), PointField::generate(&desktop(42)));
    }

    #[test]
    fn positions_sit_on_the_lattice() {
        let field = PointField::generate(&desktop(3));
        for p in field.positions() {
            for coord in [p[0], p[2]] {
                let cell = coord / 1.5;
                assert!((cell - cell.round()).abs() < 1e-4);
                assert!((-40.0..40.0).contains(&cell.round()));
            }
        }
    }

    #[test]
    fn colors_follow_elevation_and_region() {
        let field = PointField::generate(&desktop(11));
        for i in 0..field.len() {
            let p = field.point(i);
            let [px, y, pz] = p.position;
            assert_eq!(y, p.base_elevation);

            if p.base_elevation > 2.0 {
                assert_eq!(p.color, GOLD.to_array());
            }
            if pz < MOUNTAIN_LINE && ridge_noise(px, pz) <= 0.0 {
                assert_eq!(p.base_elevation, 0.0);
                assert_eq!(p.color, CYAN.to_array());
            }
            if pz >= MOUNTAIN_LINE {
                assert_eq!(p.base_elevation, 0.0);
                assert_eq!(p.color, CYAN.to_array());
            }
        }
    }

    #[test]
    fn set_y_leaves_base_elevation() {
        let mut field = PointField::default();
        field.push(Point { position: [1.0, 0.5, 2.0], color: [0.0; 3], base_elevation: 0.5 });
        field.set_y(0, 3.0);
        assert_eq!(field.positions()[0], [1.0, 3.0, 2.0]);
        assert_eq!(field.base_elevation()[0], 0.5);
    }
}
