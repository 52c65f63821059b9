// raster.rs - CPU point rasterizer
//
// Output encoding: RGBA8, row-major, origin top-left.
// Points are painter-sorted far to near and drawn as square splats, which is
// what a WebGL point sprite without a texture looks like.

use glam::Vec4;

use super::{Backend, drawing_buffer_size, point_scale};
use crate::error::RenderError;
use crate::scene::{PerspectiveCamera, Rgb, Scene};

const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

struct Splat {
    index: usize,
    x: f32,
    y: f32,
    depth: f32,
    size: f32,
}

pub struct Raster {
    out: Vec<u8>,
    css_w: u32,
    css_h: u32,
    ratio: f64,
    w: u32,
    h: u32,
    frames: u64,
    uploads: u64,
    uploaded_version: Option<u64>,
    released: bool,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        let mut raster = Self {
            out: Vec::new(),
            css_w: width,
            css_h: height,
            ratio: 1.0,
            w: 0,
            h: 0,
            frames: 0,
            uploads: 0,
            uploaded_version: None,
            released: false,
        };
        raster.reallocate();
        raster
    }

    fn reallocate(&mut self) {
        let (w, h) = drawing_buffer_size(self.css_w, self.css_h, self.ratio);
        self.w = w;
        self.h = h;
        self.out.resize((w * h * 4) as usize, 0);
    }

    /// Drawing-buffer width in device pixels.
    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    pub fn css_size(&self) -> (u32, u32) {
        (self.css_w, self.css_h)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.ratio
    }

    pub fn pixels(&self) -> &[u8] {
        &self.out
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.out
    }

    /// RGBA at (x, y), or `None` outside the buffer or after `release`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.w || y >= self.h {
            return None;
        }
        let i = ((y * self.w + x) * 4) as usize;
        self.out.get(i..i + 4)?.try_into().ok()
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Position uploads so far (first frame included).
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    fn clear(&mut self, background: Option<Rgb>) {
        match background {
            Some(c) => {
                let px = [to_u8(c.r), to_u8(c.g), to_u8(c.b), 255];
                for chunk in self.out.chunks_exact_mut(4) {
                    chunk.copy_from_slice(&px);
                }
            }
            None => self.out.fill(0),
        }
    }

    #[inline]
    fn blend(&mut self, x: u32, y: u32, c: Rgb, alpha: f32) {
        let i = ((y * self.w + x) * 4) as usize;
        let px = &mut self.out[i..i + 4];
        for (dst, src) in px.iter_mut().zip([c.r, c.g, c.b]) {
            let d = *dst as f32 / 255.0;
            *dst = to_u8(src * alpha + d * (1.0 - alpha));
        }
        let da = px[3] as f32 / 255.0;
        px[3] = to_u8(alpha + da * (1.0 - alpha));
    }

    fn splat(&mut self, s: &Splat, c: Rgb, alpha: f32) {
        let half = (s.size * 0.5).max(0.5);
        let x0 = (s.x - half).floor().max(0.0) as u32;
        let y0 = (s.y - half).floor().max(0.0) as u32;
        let x1 = ((s.x + half).ceil().max(0.0) as u32).min(self.w);
        let y1 = ((s.y + half).ceil().max(0.0) as u32).min(self.h);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, c, alpha);
            }
        }
    }
}

impl Backend for Raster {
    fn set_size(&mut self, width: u32, height: u32) {
        self.css_w = width;
        self.css_h = height;
        self.reallocate();
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.ratio = ratio;
        self.reallocate();
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        if self.released {
            return Err(RenderError::Unavailable("raster released".into()));
        }

        let cloud = &scene.points;
        if self.uploaded_version != Some(cloud.positions_version()) {
            self.uploaded_version = Some(cloud.positions_version());
            self.uploads += 1;
        }

        self.clear(scene.background);

        let model_view = camera.view() * cloud.model_matrix();
        let projection = camera.projection();
        let scale = point_scale(self.h);
        let material = &cloud.material;
        let (w, h) = (self.w as f32, self.h as f32);

        let mut splats: Vec<Splat> = Vec::with_capacity(cloud.len());
        for (index, p) in cloud.field().positions().iter().enumerate() {
            let mv = model_view * Vec4::new(p[0], p[1], p[2], 1.0);
            let depth = -mv.z;
            if depth <= camera.near || depth >= camera.far {
                continue;
            }
            let clip = projection * mv;
            let ndc = clip.truncate() / clip.w;
            if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
                continue;
            }
            let size = if material.size_attenuation {
                material.size * scale / depth
            } else {
                material.size * self.ratio as f32
            };
            splats.push(Splat {
                index,
                x: (ndc.x * 0.5 + 0.5) * w,
                y: (0.5 - ndc.y * 0.5) * h,
                depth,
                size,
            });
        }

        splats.sort_unstable_by(|a, b| b.depth.total_cmp(&a.depth));

        let alpha = if material.transparent { material.opacity } else { 1.0 };
        let colors = cloud.field().colors();
        for s in &splats {
            let base = if material.vertex_colors {
                let [r, g, b] = colors[s.index];
                Rgb::new(r, g, b)
            } else {
                WHITE
            };
            let c = match scene.fog {
                Some(fog) => base.lerp(fog.color, fog.factor(s.depth)),
                None => base,
            };
            self.splat(s, c, alpha);
        }

        self.frames += 1;
        Ok(())
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        self.released = false;
        self.uploaded_version = None;
        self.reallocate();
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
        self.out = Vec::new();
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::scene::BACKGROUND;
    use crate::world::{Point, PointField};

    fn single_point(position: [f32; 3], color: [f32; 3]) -> Scene {
        let mut field = PointField::default();
        field.push(Point { position, color, base_elevation: position[1] });
        Scene::new(field)
    }

    fn camera(w: u32, h: u32) -> PerspectiveCamera {
        PerspectiveCamera::new(&CameraConfig::default(), w as f32 / h as f32)
    }

    #[test]
    fn buffer_follows_size_and_ratio() {
        let mut raster = Raster::new(400, 300);
        assert_eq!((raster.width(), raster.height()), (400, 300));
        raster.set_pixel_ratio(2.0);
        assert_eq!((raster.width(), raster.height()), (800, 600));
        assert_eq!(raster.pixels().len(), 800 * 600 * 4);
        raster.set_size(101, 51);
        assert_eq!((raster.width(), raster.height()), (202, 102));
        assert_eq!(raster.css_size(), (101, 51));
    }

    #[test]
    fn empty_scene_is_background() {
        let mut raster = Raster::new(16, 16);
        let scene = Scene::new(PointField::default());
        raster.render(&scene, &camera(16, 16)).unwrap();
        let bg = [to_u8(BACKGROUND.r), to_u8(BACKGROUND.g), to_u8(BACKGROUND.b), 255];
        assert_eq!(raster.pixel(0, 0), Some(bg));
        assert_eq!(raster.pixel(15, 15), Some(bg));
        assert_eq!(raster.frames(), 1);
    }

    #[test]
    fn look_at_target_lands_mid_screen() {
        let mut raster = Raster::new(64, 64);
        let scene = single_point([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        raster.render(&scene, &camera(64, 64)).unwrap();

        let [r, g, _, _] = raster.pixel(32, 32).unwrap();
        assert!(r > 100, "red channel {r}");
        assert!(g < 40);
        assert_eq!(raster.pixel(2, 2).map(|px| px[0]), Some(to_u8(BACKGROUND.r)));
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let mut raster = Raster::new(32, 32);
        let scene = single_point([0.0, 10.0, 60.0], [1.0, 1.0, 1.0]);
        raster.render(&scene, &camera(32, 32)).unwrap();
        let bg = to_u8(BACKGROUND.r);
        assert!(raster.pixels().chunks_exact(4).all(|px| px[0] == bg));
    }

    #[test]
    fn uploads_only_when_version_moves() {
        let mut raster = Raster::new(8, 8);
        let mut scene = single_point([0.0; 3], [1.0; 3]);
        let cam = camera(8, 8);
        raster.render(&scene, &cam).unwrap();
        raster.render(&scene, &cam).unwrap();
        assert_eq!(raster.uploads(), 1);
        scene.points.mark_positions_dirty();
        raster.render(&scene, &cam).unwrap();
        assert_eq!(raster.uploads(), 2);
        assert_eq!(raster.frames(), 3);
    }

    #[test]
    fn released_raster_refuses_to_draw() {
        let mut raster = Raster::new(8, 8);
        let scene = single_point([0.0; 3], [1.0; 3]);
        raster.release();
        assert!(raster.render(&scene, &camera(8, 8)).is_err());
        assert_eq!(raster.pixel(0, 0), None);
        raster.restore().unwrap();
        assert!(raster.render(&scene, &camera(8, 8)).is_ok());
    }

    #[test]
    fn pixel_outside_buffer_is_none() {
        let raster = Raster::new(4, 3);
        assert!(raster.pixel(3, 2).is_some());
        assert_eq!(raster.pixel(4, 0), None);
        assert_eq!(raster.pixel(0, 3), None);
        assert_eq!(raster.pixel(u32::MAX, u32::MAX), None);
    }
}
