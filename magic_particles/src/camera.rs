//! Orbit camera for the particle view.
//!
//! Looks at the origin from a fixed distance. Dragging changes the azimuth
//! freely and the polar angle within a band, so the view never goes under
//! the shape or straight overhead. No zoom, no pan.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

use glam::{Mat4, Vec3, Vec4};

pub const CAMERA_DISTANCE: f32 = 25.0;
pub const FOV_Y:           f32 = FRAC_PI_3; // 60°
pub const MIN_POLAR:       f32 = FRAC_PI_3;
pub const MAX_POLAR:       f32 = FRAC_PI_2;
const Z_NEAR:              f32 = 0.1;
const Z_FAR:               f32 = 1000.0;
/// Radians per dragged pixel.
const DRAG_SENSITIVITY:    f32 = 0.005;

/// A point after projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Distance from the eye along the view axis.
    pub depth: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Angle around the Y axis; 0 looks down -Z.
    pub azimuth: f32,
    /// Angle from +Y; π/2 is level with the origin.
    pub polar:   f32,
    pub distance: f32,
    pub fov_y:   f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        OrbitCamera { azimuth: 0.0, polar: MAX_POLAR, distance: CAMERA_DISTANCE, fov_y: FOV_Y }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        Vec3::new(sp * sa, cp, sp * ca) * self.distance
    }

    /// Apply a mouse drag of (`dx`, `dy`) pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * DRAG_SENSITIVITY;
        self.polar = (self.polar - dy * DRAG_SENSITIVITY).clamp(MIN_POLAR, MAX_POLAR);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, Z_NEAR, Z_FAR)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Project `p` into a `width`×`height` pixel viewport. `None` when the
    /// point is behind the eye or outside the depth range.
    pub fn project(&self, view_proj: &Mat4, p: Vec3, width: usize, height: usize) -> Option<ScreenPoint> {
        let clip = *view_proj * Vec4::new(p.x, p.y, p.z, 1.0);
        if clip.w <= Z_NEAR {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some(ScreenPoint {
            x:     (ndc.x + 1.0) * 0.5 * width as f32,
            y:     (1.0 - ndc.y) * 0.5 * height as f32,
            depth: clip.w,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
