//! Software 3D viewport.
//!
//! Redraws the whole scene every display refresh: reference grid, then every
//! placed voxel as a flat-shaded cube.  Cubes never intersect (duplicates
//! coincide exactly), so sorting them far-to-near is enough for occlusion.

use glam::{Mat4, Vec2, Vec3};
use pinch_pipeline::scene::{Environment, GridHelper, Scene, Voxel};

use crate::canvas::{shade, Canvas};

const GRID_CENTER_COLOR: u32 = 0xFF444444;
const GRID_COLOR:        u32 = 0xFF888888;
/// Light reaching faces turned away from the directional light.
const AMBIENT:           f32 = 0.15;
const OUTLINE_SHADE:     f32 = 0.35;

// ════════════════════════════════════════════════════════════════════════════
// ViewCamera
// ════════════════════════════════════════════════════════════════════════════

/// Perspective camera.  Screen space has its origin top-left, y down.
#[derive(Clone, Copy, Debug)]
pub struct ViewCamera {
    pub eye:    Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fovy:   f32,
    pub aspect: f32,
    pub near:   f32,
    pub far:    f32,
}

impl Default for ViewCamera {
    fn default() -> Self {
        ViewCamera {
            eye:    Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            fovy:   75.0_f32.to_radians(),
            aspect: 4.0 / 3.0,
            near:   0.1,
            far:    1000.0,
        }
    }
}

impl ViewCamera {
    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.aspect = if height > 0 { width as f32 / height as f32 } else { 1.0 };
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy, self.aspect, self.near, self.far)
    }

    /// World → view space (camera looks down −Z).
    pub fn to_view(&self, p: Vec3) -> Vec3 {
        self.view().transform_point3(p)
    }

    /// View space → pixel coordinates; `None` in front of the near plane.
    pub fn view_to_screen(&self, v: Vec3, width: usize, height: usize) -> Option<Vec2> {
        if -v.z < self.near {
            return None;
        }
        let ndc = self.projection().project_point3(v);
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * width as f32,
            (0.5 - ndc.y * 0.5) * height as f32,
        ))
    }

    pub fn project(&self, p: Vec3, width: usize, height: usize) -> Option<Vec2> {
        self.view_to_screen(self.to_view(p), width, height)
    }

    /// Trim a view-space segment to the visible side of the near plane.
    pub fn clip_near(&self, a: Vec3, b: Vec3) -> Option<(Vec3, Vec3)> {
        let plane = -self.near;
        let a_in = a.z <= plane;
        let b_in = b.z <= plane;
        match (a_in, b_in) {
            (true, true)   => Some((a, b)),
            (false, false) => None,
            _ => {
                let t = (plane - a.z) / (b.z - a.z);
                let cut = a.lerp(b, t);
                if a_in { Some((a, cut)) } else { Some((cut, b)) }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rendering
// ════════════════════════════════════════════════════════════════════════════

/// Draw `scene` as seen from `camera` into `canvas`, replacing its contents.
pub fn render_scene(scene: &Scene, camera: &ViewCamera, canvas: &mut Canvas) {
    let env = scene.environment();
    canvas.fill(env.clear_color);
    draw_grid(&env.grid, camera, canvas);

    let mut order: Vec<(f32, &Voxel)> = scene
        .voxels()
        .iter()
        .map(|v| (camera.eye.distance_squared(v.position.as_vec3()), v))
        .collect();
    order.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (_, voxel) in order {
        draw_voxel(voxel, env, camera, canvas);
    }
}

fn draw_segment(a: Vec3, b: Vec3, camera: &ViewCamera, canvas: &mut Canvas, width: f32, color: u32) {
    let (w, h) = (canvas.width(), canvas.height());
    let Some((a, b)) = camera.clip_near(camera.to_view(a), camera.to_view(b)) else { return };
    if let (Some(p), Some(q)) = (camera.view_to_screen(a, w, h), camera.view_to_screen(b, w, h)) {
        canvas.line(p, q, width, color);
    }
}

fn draw_grid(grid: &GridHelper, camera: &ViewCamera, canvas: &mut Canvas) {
    let half = grid.size * 0.5;
    let step = grid.size / grid.divisions.max(1) as f32;
    for i in 0..=grid.divisions {
        let k = -half + i as f32 * step;
        let color = if i * 2 == grid.divisions { GRID_CENTER_COLOR } else { GRID_COLOR };
        draw_segment(Vec3::new(k, 0.0, -half), Vec3::new(k, 0.0, half), camera, canvas, 1.0, color);
        draw_segment(Vec3::new(-half, 0.0, k), Vec3::new(half, 0.0, k), camera, canvas, 1.0, color);
    }
}

/// Cube faces as (outward normal, corner indices).  Corner `i` has
/// x = bit 0, y = bit 1, z = bit 2.
const FACES: [(Vec3, [usize; 4]); 6] = [
    (Vec3::NEG_X, [0, 4, 6, 2]),
    (Vec3::X,     [1, 3, 7, 5]),
    (Vec3::NEG_Y, [0, 1, 5, 4]),
    (Vec3::Y,     [2, 6, 7, 3]),
    (Vec3::NEG_Z, [0, 2, 3, 1]),
    (Vec3::Z,     [4, 5, 7, 6]),
];

fn draw_voxel(voxel: &Voxel, env: &Environment, camera: &ViewCamera, canvas: &mut Canvas) {
    let (w, h) = (canvas.width(), canvas.height());
    let center = voxel.position.as_vec3();
    let half = voxel.size * 0.5;

    let corners: [Vec3; 8] = std::array::from_fn(|i| {
        let sign = |bit: usize| if i & bit != 0 { half } else { -half };
        center + Vec3::new(sign(1), sign(2), sign(4))
    });
    let light = env.light.direction();

    for (normal, idx) in FACES.iter() {
        let face_center = center + *normal * half;
        if normal.dot(camera.eye - face_center) <= 0.0 {
            continue;
        }
        let mut pts = [Vec2::ZERO; 4];
        let mut visible = true;
        for (slot, &ci) in pts.iter_mut().zip(idx.iter()) {
            match camera.project(corners[ci], w, h) {
                Some(p) => *slot = p,
                None    => { visible = false; break; }
            }
        }
        if !visible {
            continue;
        }

        let lambert = normal.dot(light).max(0.0) * env.light.intensity;
        let k = (AMBIENT + (1.0 - AMBIENT) * lambert).min(1.0);
        canvas.fill_convex_polygon(&pts, shade(voxel.color, k));

        let edge = shade(voxel.color, k * OUTLINE_SHADE);
        for i in 0..4 {
            canvas.line(pts[i], pts[(i + 1) % 4], 1.0, edge);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use pinch_pipeline::scene::VoxelPlacer;

    const W: usize = 320;
    const H: usize = 240;

    fn camera() -> ViewCamera {
        let mut c = ViewCamera::default();
        c.set_viewport(W, H);
        c
    }

    #[test]
    fn origin_projects_to_centre() {
        let p = camera().project(Vec3::ZERO, W, H).unwrap();
        assert!((p.x - 160.0).abs() < 1e-3);
        assert!((p.y - 120.0).abs() < 1e-3);
    }

    #[test]
    fn world_up_is_screen_up() {
        let c = camera();
        let above = c.project(Vec3::new(0.0, 1.0, 0.0), W, H).unwrap();
        let right = c.project(Vec3::new(1.0, 0.0, 0.0), W, H).unwrap();
        assert!(above.y < 120.0);
        assert!(right.x > 160.0);
    }

    #[test]
    fn behind_camera_is_not_projected() {
        assert!(camera().project(Vec3::new(0.0, 0.0, 6.0), W, H).is_none());
    }

    #[test]
    fn near_clip_trims_crossing_segment() {
        let c = camera();
        let a = Vec3::new(0.0, 0.0, -5.0);
        let b = Vec3::new(0.0, 0.0, 5.0);
        let (p, q) = c.clip_near(a, b).unwrap();
        assert_eq!(p, a);
        assert!((q.z + c.near).abs() < 1e-5);
        assert!(c.clip_near(Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 2.0)).is_none());
    }

    #[test]
    fn empty_scene_shows_clear_color_and_grid() {
        let scene = Scene::new();
        let mut canvas = Canvas::new(W, H, 0);
        render_scene(&scene, &camera(), &mut canvas);
        // Viewed edge-on from y = 0, the grid collapses onto the horizon.
        assert_ne!(canvas.pixel(10, H / 2), Some(scene.environment().clear_color));
        assert_eq!(canvas.pixel(10, 10), Some(scene.environment().clear_color));
    }

    #[test]
    fn voxel_covers_its_projection() {
        let mut scene = Scene::new();
        VoxelPlacer::default().place(&mut scene, Vec3::new(2.2, 1.9, 0.0));
        let cam = camera();
        let mut canvas = Canvas::new(W, H, 0);
        render_scene(&scene, &cam, &mut canvas);

        let p = cam.project(Vec3::new(2.0, 2.0, 0.5), W, H).unwrap();
        let px = canvas.pixel(p.x as usize, p.y as usize).unwrap();
        assert_ne!(px, scene.environment().clear_color);
        // Front face: mostly green.
        assert!((px >> 8) & 0xFF > (px >> 16) & 0xFF);
    }

    #[test]
    fn aspect_follows_viewport() {
        let mut c = ViewCamera::default();
        c.set_viewport(1920, 1080);
        assert!((c.aspect - 16.0 / 9.0).abs() < 1e-6);
        c.set_viewport(100, 0);
        assert_eq!(c.aspect, 1.0);
    }
}
