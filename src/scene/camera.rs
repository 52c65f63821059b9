use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Right-handed perspective camera with a fixed look-at target.
///
/// The projection is cached; call `update_projection_matrix` after
/// changing `aspect`.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let mut camera = Self {
            fov_deg: config.fov_deg,
            aspect,
            near: config.near,
            far: config.far,
            position: config.position,
            target: config.target,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_screen_center() {
        let camera = PerspectiveCamera::new(&CameraConfig::default(), 4.0 / 3.0);
        let clip = camera.projection() * camera.view() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn projection_tracks_aspect_after_update() {
        let mut camera = PerspectiveCamera::new(&CameraConfig::default(), 2.0);
        let before = camera.projection();
        camera.aspect = 0.5;
        assert_eq!(camera.projection(), before);
        camera.update_projection_matrix();
        let expected = Mat4::perspective_rh_gl(60f32.to_radians(), 0.5, 0.1, 1000.0);
        assert_eq!(camera.projection(), expected);
    }
}
