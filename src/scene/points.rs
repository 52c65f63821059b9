// points.rs - The point-cloud drawable
//
// Owns the generated field. Backends compare `positions_version` with what
// they last uploaded to decide whether the position column needs a re-upload.

use glam::Mat4;

use crate::world::PointField;

#[derive(Clone, Debug, PartialEq)]
pub struct PointsMaterial {
    /// World-space point size.
    pub size: f32,
    pub size_attenuation: bool,
    pub vertex_colors: bool,
    pub transparent: bool,
    pub opacity: f32,
}

impl Default for PointsMaterial {
    fn default() -> Self {
        Self {
            size: 0.3,
            size_attenuation: true,
            vertex_colors: true,
            transparent: true,
            opacity: 0.8,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PointCloud {
    field: PointField,
    pub material: PointsMaterial,
    /// Yaw in radians.
    pub rotation_y: f32,
    positions_version: u64,
}

impl PointCloud {
    pub fn new(field: PointField, material: PointsMaterial) -> Self {
        Self { field, material, rotation_y: 0.0, positions_version: 0 }
    }

    pub fn field(&self) -> &PointField {
        &self.field
    }

    /// Mutable access for animation. Call `mark_positions_dirty` after writing.
    pub fn field_mut(&mut self) -> &mut PointField {
        &mut self.field
    }

    pub fn mark_positions_dirty(&mut self) {
        self.positions_version += 1;
    }

    pub fn positions_version(&self) -> u64 {
        self.positions_version
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y)
    }

    pub fn len(&self) -> usize {
        self.field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }
}
