//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ MAGIC PARTICLES                               ● CAMERA ACTIVE │
//! │ 1 FINGER:  BABY, GO!                                          │
//! │ 2 FINGERS: I LOVE YOU              · · ·                      │
//! │ 3 FINGERS: ♥                    ·  particles ·                │
//! │ FIST: GATHER  OPEN HAND: SCATTER   · · ·      ┌─────────────┐ │
//! │                                               │ hand preview│ │
//! │ keys / mode                                   └─────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Particles are splatted additively, so dense regions glow brighter.

use std::sync::mpsc::Sender;

use glam::Vec3;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use hand_gesture::pose::HandPose;
use hand_gesture::{HandLandmarks, HandState, HAND_CONNECTIONS};
use particle_morph::glyph::{glyph_or_blank, GLYPH_H};
use particle_morph::ParticleMode;

use crate::app::VisionStatus;
use crate::camera::OrbitCamera;
use crate::vision::{SimInput, SimKey};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const BG_TOP:        u32   = 0xFF05050F;
const BG_BOTTOM:     u32   = 0xFF120A22;
const TEXT_COLOR:    u32   = 0xFFEEEEEE;
const DIM_TEXT:      u32   = 0xFF888899;
const TITLE_COLOR:   u32   = 0xFFFFB4DC;
const ACTIVE_COLOR:  u32   = 0xFF33DD66;
const WAITING_COLOR: u32   = 0xFFDD4444;
const PANEL_BG:      u32   = 0xFF101018;
const PANEL_BORDER:  u32   = 0xFF444466;
const BONE_COLOR:    u32   = 0xFF00FF00;
const JOINT_COLOR:   u32   = 0xFFFF0000;
const MARGIN:        usize = 16;
const PANEL_W:       usize = 240;
const PANEL_H:       usize = 180;
const SWATCH_GAP:    usize = 6;
/// World-space point size before perspective attenuation.
const POINT_SIZE:    f32   = 0.15;
/// Share of a particle's color added per covered pixel.
const POINT_ALPHA:   f32   = 0.8;

// ════════════════════════════════════════════════════════════════════════════
// Scene — everything one frame needs
// ════════════════════════════════════════════════════════════════════════════

pub struct Scene<'a> {
    pub positions: &'a [Vec3],
    pub color:     Vec3,
    pub hand:      &'a HandState,
    pub landmarks: Option<&'a HandLandmarks>,
    pub status:    &'a VisionStatus,
    pub mode:      Option<ParticleMode>,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameBuffer — window-independent drawing
// ════════════════════════════════════════════════════════════════════════════

pub struct FrameBuffer {
    width:      usize,
    height:     usize,
    buf:        Vec<u32>,
    background: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let mut background = Vec::with_capacity(width * height);
        for y in 0..height {
            let t = y as f32 / height.max(1) as f32;
            background.extend(std::iter::repeat(blend(BG_TOP, BG_BOTTOM, t)).take(width));
        }
        FrameBuffer { width, height, buf: background.clone(), background }
    }

    pub fn width(&self)  -> usize  { self.width }
    pub fn height(&self) -> usize  { self.height }
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.buf[y * self.width + x]
    }

    pub fn clear(&mut self) {
        self.buf.copy_from_slice(&self.background);
    }

    /// Draw one frame of `scene` seen through `camera`.
    pub fn draw_scene(&mut self, scene: &Scene, camera: &OrbitCamera, legend: &[String; 3], sim: bool) {
        self.clear();
        self.draw_particles(scene.positions, scene.color, camera);
        self.draw_hud(scene, legend, sim);

        let px = self.width.saturating_sub(PANEL_W + MARGIN);
        let py = self.height.saturating_sub(PANEL_H + MARGIN);
        self.draw_preview(scene.landmarks, px, py);

        match scene.status {
            VisionStatus::Loading => {
                self.draw_text_centered("LOADING VISION MODEL...", self.height / 2, 3, TEXT_COLOR);
            }
            VisionStatus::Unavailable(reason) => {
                self.draw_text_centered("VISION UNAVAILABLE", (self.height / 2).saturating_sub(24), 3, WAITING_COLOR);
                self.draw_text_centered(reason, self.height / 2 + 12, 1, DIM_TEXT);
            }
            VisionStatus::Ready => {}
        }
    }

    // ── Particles ─────────────────────────────────────────────────────────

    fn draw_particles(&mut self, positions: &[Vec3], color: Vec3, camera: &OrbitCamera) {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let vp = camera.view_proj(aspect);
        let rgb = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0 * POINT_ALPHA;

        for p in positions {
            let Some(s) = camera.project(&vp, *p, self.width, self.height) else { continue };
            let radius = point_radius_px(s.depth, self.height, camera.fov_y).max(0.6);
            self.splat(s.x, s.y, radius, rgb);
        }
    }

    fn splat(&mut self, cx: f32, cy: f32, radius: f32, rgb: Vec3) {
        let reach = radius.ceil() as isize;
        let (ix, iy) = (cx.floor() as isize, cy.floor() as isize);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let (x, y) = (ix + dx, iy + dy);
                if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
                    continue;
                }
                let ddx = x as f32 + 0.5 - cx;
                let ddy = y as f32 + 0.5 - cy;
                let w = 1.0 - (ddx * ddx + ddy * ddy).sqrt() / (radius + 0.5);
                if w > 0.0 {
                    let i = y as usize * self.width + x as usize;
                    self.buf[i] = add_rgb(self.buf[i], rgb * w);
                }
            }
        }
    }

    // ── HUD ───────────────────────────────────────────────────────────────

    fn draw_hud(&mut self, scene: &Scene, legend: &[String; 3], sim: bool) {
        self.draw_text("MAGIC PARTICLES", MARGIN, MARGIN, 3, TITLE_COLOR);

        let mut y = MARGIN + GLYPH_H * 3 + 14;
        for (label, msg) in ["1 FINGER:  ", "2 FINGERS: ", "3 FINGERS: "].iter().zip(legend) {
            let x = self.draw_text(label, MARGIN, y, 2, DIM_TEXT);
            self.draw_text(msg, x, y, 2, TEXT_COLOR);
            y += GLYPH_H * 2 + 8;
        }
        self.draw_text("FIST: GATHER   OPEN HAND: SCATTER", MARGIN, y, 2, DIM_TEXT);

        // Presence indicator, top right.
        let (label, color) = if scene.hand.presence {
            ("CAMERA ACTIVE", ACTIVE_COLOR)
        } else {
            ("WAITING FOR HAND...", WAITING_COLOR)
        };
        let w = text_width(label, 2);
        let x = self.width.saturating_sub(MARGIN + w);
        self.fill_circle(x.saturating_sub(14) as isize, (MARGIN + GLYPH_H) as isize, 5, color);
        self.draw_text(label, x, MARGIN, 2, color);
        if scene.hand.presence {
            let detail = format!("GESTURE {}  SPREAD {:.2}", scene.hand.gesture.code(), scene.hand.spread);
            let w = text_width(&detail, 1);
            self.draw_text(&detail, self.width.saturating_sub(MARGIN + w), MARGIN + GLYPH_H * 2 + 6, 1, DIM_TEXT);
        }

        let bottom = self.height.saturating_sub(MARGIN + GLYPH_H);
        let mode = scene.mode.map_or("-", ParticleMode::name);
        let end = self.draw_text(&format!("MODE: {}", mode), MARGIN, bottom, 1, DIM_TEXT);
        // Swatch of the current particle color.
        self.fill_rect(end + SWATCH_GAP, bottom, GLYPH_H, GLYPH_H, pack_argb(scene.color));
        if sim {
            self.draw_text(
                "0 FIST  1/2/3 FINGERS  5/O OPEN  UP/DOWN SPREAD  H HAND  DRAG ORBIT  Q QUIT",
                MARGIN, bottom.saturating_sub(GLYPH_H + 6), 1, DIM_TEXT,
            );
        }
    }

    // ── Landmark preview ──────────────────────────────────────────────────

    /// Mirrored skeleton of the detected hand inside a `PANEL_W`×`PANEL_H` box.
    fn draw_preview(&mut self, landmarks: Option<&HandLandmarks>, x0: usize, y0: usize) {
        self.fill_rect(x0, y0, PANEL_W, PANEL_H, PANEL_BG);
        self.draw_border(x0, y0, PANEL_W, PANEL_H, PANEL_BORDER);
        self.draw_text("AI VISION CONTROL", x0 + 6, y0 + 6, 1, DIM_TEXT);

        let Some(hand) = landmarks else { return };
        let to_px = |i: usize| {
            let p = hand[i];
            (
                x0 as f32 + (1.0 - p.x) * PANEL_W as f32,
                y0 as f32 + p.y * PANEL_H as f32,
            )
        };
        let inside = |(x, y): (f32, f32)| {
            x >= x0 as f32 && y >= y0 as f32
                && x < (x0 + PANEL_W) as f32 && y < (y0 + PANEL_H) as f32
        };

        for &(a, b) in HAND_CONNECTIONS.iter() {
            let (pa, pb) = (to_px(a), to_px(b));
            if inside(pa) && inside(pb) {
                self.draw_line(pa, pb, BONE_COLOR);
            }
        }
        for i in 0..hand.points().len() {
            let p = to_px(i);
            if inside(p) {
                self.fill_circle(p.0 as isize, p.1 as isize, 2, JOINT_COLOR);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        let (x, y) = (x as isize, y as isize);
        let (r, b) = (x + w as isize - 1, y + h as isize - 1);
        for col in x..=r {
            self.set_pixel(col, y, color);
            self.set_pixel(col, b, color);
        }
        for row in y..=b {
            self.set_pixel(x, row, color);
            self.set_pixel(r, row, color);
        }
    }

    fn fill_circle(&mut self, cx: isize, cy: isize, r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham line.
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: u32) {
        let (mut x, mut y) = (from.0 as isize, from.1 as isize);
        let (x1, y1) = (to.0 as isize, to.1 as isize);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Draw `text` with the built-in font, each cell `scale` pixels square.
    /// Returns the x coordinate after the last glyph.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) -> usize {
        let mut cx = x;
        for ch in text.chars() {
            let g = glyph_or_blank(ch);
            for row in 0..GLYPH_H {
                for col in 0..g.width {
                    if g.is_set(col, row) {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += (g.width + 1) * scale;
            if cx >= self.width { break; }
        }
        cx
    }

    fn draw_text_centered(&mut self, text: &str, y: usize, scale: usize, color: u32) {
        let x = self.width.saturating_sub(text_width(text, scale)) / 2;
        self.draw_text(text, x, y, scale, color);
    }
}

fn text_width(text: &str, scale: usize) -> usize {
    particle_morph::glyph::text_cells(text) * scale
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer — window, input, camera
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    frame:      FrameBuffer,
    camera:     OrbitCamera,
    legend:     [String; 3],
    /// Present only when the keyboard simulator is the vision source.
    sim_tx:     Option<Sender<SimInput>>,
    last_mouse: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(
        width:  usize,
        height: usize,
        legend: [String; 3],
        sim_tx: Option<Sender<SimInput>>,
    ) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "Magic Particles",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;
        window.set_target_fps(60);

        Ok(Visualizer {
            window,
            frame: FrameBuffer::new(width, height),
            camera: OrbitCamera::default(),
            legend,
            sim_tx,
            last_mouse: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse. Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No)
            || self.window.is_key_pressed(Key::Escape, KeyRepeat::No)
        {
            return false;
        }

        if let Some(tx) = &self.sim_tx {
            let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
            let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

            let mut keys = Vec::new();
            for (key, pose) in [
                (Key::Key0, HandPose::Fist),
                (Key::Key1, HandPose::Point),
                (Key::Key2, HandPose::VSign),
                (Key::Key3, HandPose::ThreeFingers),
                (Key::Key5, HandPose::OpenPalm),
                (Key::O,    HandPose::OpenPalm),
            ] {
                if one_shot(key) { keys.push(SimKey::Pose(pose)); }
            }
            if held(Key::Up)     { keys.push(SimKey::SplayUp); }
            if held(Key::Down)   { keys.push(SimKey::SplayDown); }
            if one_shot(Key::H)  { keys.push(SimKey::ToggleHand); }

            for key in keys {
                // The vision thread may already be gone; nothing to do then.
                let _ = tx.send(SimInput::KeyDown(key));
            }
        }

        // Left-drag orbits.
        let mouse = self.window.get_mouse_pos(MouseMode::Discard);
        if self.window.get_mouse_down(MouseButton::Left) {
            if let (Some((x0, y0)), Some((x1, y1))) = (self.last_mouse, mouse) {
                self.camera.drag(x1 - x0, y1 - y0);
            }
            self.last_mouse = mouse;
        } else {
            self.last_mouse = None;
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, scene: &Scene) {
        let sim = self.sim_tx.is_some();
        self.frame.draw_scene(scene, &self.camera, &self.legend, sim);
        if let Err(e) = self.window.update_with_buffer(self.frame.pixels(), self.frame.width(), self.frame.height()) {
            log::warn!("window update failed: {}", e);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Color helpers
// ────────────────────────────────────────────────────────────────────────────

/// Pack a 0–1 RGB color as opaque ARGB.
fn pack_argb(c: Vec3) -> u32 {
    let c = c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    0xFF000000 | ((c.x.round() as u32) << 16) | ((c.y.round() as u32) << 8) | c.z.round() as u32
}

/// Add `rgb` (0–255 per channel) to an ARGB pixel, saturating.
fn add_rgb(dst: u32, rgb: Vec3) -> u32 {
    let ch = |shift: u32, v: f32| -> u32 {
        let cur = (dst >> shift) & 0xFF;
        (cur + v.max(0.0) as u32).min(0xFF) << shift
    };
    0xFF000000 | ch(16, rgb.x) | ch(8, rgb.y) | ch(0, rgb.z)
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

/// Apparent particle radius in pixels at `depth`, for a viewport `height` tall.
pub fn point_radius_px(depth: f32, height: usize, fov_y: f32) -> f32 {
    let focal = height as f32 * 0.5 / (fov_y * 0.5).tan();
    POINT_SIZE * focal / depth * 0.5
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CAMERA_DISTANCE;
    use hand_gesture::pose::pose_hand;

    const W: usize = 640;
    const H: usize = 480;

    fn legend() -> [String; 3] {
        ["BABY, GO!".into(), "I LOVE YOU".into(), "♥".into()]
    }

    fn brightness(px: u32) -> u32 {
        ((px >> 16) & 0xFF) + ((px >> 8) & 0xFF) + (px & 0xFF)
    }

    #[test]
    fn pack_argb_corners() {
        assert_eq!(pack_argb(Vec3::ZERO), 0xFF000000);
        assert_eq!(pack_argb(Vec3::ONE), 0xFFFFFFFF);
        assert_eq!(pack_argb(Vec3::new(0.0, 1.0, 1.0)), 0xFF00FFFF);
        assert_eq!(pack_argb(Vec3::splat(2.0)), 0xFFFFFFFF);
    }

    #[test]
    fn additive_splats_saturate() {
        let px = add_rgb(0xFF101010, Vec3::new(300.0, 10.0, 0.0));
        assert_eq!(px, 0xFFFF1A10);
    }

    #[test]
    fn overlapping_particles_glow_brighter() {
        let cam = OrbitCamera::default();
        let mut one = FrameBuffer::new(W, H);
        one.draw_particles(&[Vec3::ZERO], Vec3::ONE, &cam);
        let mut many = FrameBuffer::new(W, H);
        many.draw_particles(&[Vec3::ZERO; 3], Vec3::new(0.3, 0.3, 0.3), &cam);
        let c = (W / 2, H / 2);
        assert!(brightness(one.pixel(c.0, c.1)) > brightness(FrameBuffer::new(W, H).pixel(c.0, c.1)));
        let mut single = FrameBuffer::new(W, H);
        single.draw_particles(&[Vec3::ZERO], Vec3::new(0.3, 0.3, 0.3), &cam);
        assert!(brightness(many.pixel(c.0, c.1)) > brightness(single.pixel(c.0, c.1)));
    }

    #[test]
    fn nearer_points_are_larger() {
        let far  = point_radius_px(CAMERA_DISTANCE + 10.0, H, cam_fov());
        let near = point_radius_px(CAMERA_DISTANCE - 10.0, H, cam_fov());
        assert!(near > far);
    }

    fn cam_fov() -> f32 { OrbitCamera::default().fov_y }

    #[test]
    fn text_advances_by_cells() {
        let mut fb = FrameBuffer::new(W, H);
        let end = fb.draw_text("AB", 10, 10, 2, TEXT_COLOR);
        assert_eq!(end, 10 + 2 * 6 * 2);
        // 'A' top row is .###.
        assert_eq!(fb.pixel(10 + 2, 10), TEXT_COLOR);
        assert_ne!(fb.pixel(10, 10), TEXT_COLOR);
    }

    #[test]
    fn preview_is_mirrored() {
        let hand = pose_hand(HandPose::OpenPalm, 1.0);
        let mut fb = FrameBuffer::new(W, H);
        fb.draw_preview(Some(&hand), 0, 0);
        let w = hand.wrist();
        let x = ((1.0 - w.x) * PANEL_W as f32) as usize;
        let y = (w.y * PANEL_H as f32) as usize;
        assert_eq!(fb.pixel(x, y), JOINT_COLOR);
    }

    #[test]
    fn empty_preview_is_just_the_panel() {
        let mut fb = FrameBuffer::new(W, H);
        fb.draw_preview(None, 0, 0);
        assert_eq!(fb.pixel(PANEL_W / 2, PANEL_H - 10), PANEL_BG);
    }

    #[test]
    fn line_hits_both_ends() {
        let mut fb = FrameBuffer::new(W, H);
        fb.draw_line((5.0, 5.0), (40.0, 22.0), BONE_COLOR);
        assert_eq!(fb.pixel(5, 5), BONE_COLOR);
        assert_eq!(fb.pixel(40, 22), BONE_COLOR);
    }

    #[test]
    fn full_scene_draws_without_panicking() {
        let positions: Vec<Vec3> = (0..200)
            .map(|i| Vec3::new((i as f32 * 0.37).sin() * 30.0, (i as f32).cos() * 30.0, i as f32 - 100.0))
            .collect();
        let hand = pose_hand(HandPose::VSign, 0.0);
        let state = HandState::from_landmarks(Some(&hand));
        for status in [VisionStatus::Loading, VisionStatus::Ready, VisionStatus::Unavailable("gone".into())] {
            let scene = Scene {
                positions: &positions,
                color:     Vec3::new(1.0, 0.4, 0.7),
                hand:      &state,
                landmarks: Some(&hand),
                status:    &status,
                mode:      Some(ParticleMode::Msg2),
            };
            let mut fb = FrameBuffer::new(W, H);
            fb.draw_scene(&scene, &OrbitCamera::default(), &legend(), true);
        }
    }

    #[test]
    fn mode_line_shows_particle_color() {
        let absent = HandState::absent();
        let scene = Scene {
            positions: &[],
            color:     Vec3::new(0.0, 1.0, 1.0),
            hand:      &absent,
            landmarks: None,
            status:    &VisionStatus::Ready,
            mode:      Some(ParticleMode::Msg1),
        };
        let mut fb = FrameBuffer::new(W, H);
        fb.draw_hud(&scene, &legend(), false);
        let label = format!("MODE: {}", ParticleMode::Msg1.name());
        let x = MARGIN + text_width(&label, 1) + 1 + SWATCH_GAP;
        let y = H - MARGIN - GLYPH_H;
        assert_eq!(fb.pixel(x + 1, y + 1), 0xFF00FFFF);
    }

    #[test]
    fn tiny_buffer_clips_everything() {
        let absent = HandState::absent();
        let scene = Scene {
            positions: &[Vec3::ZERO],
            color:     Vec3::ONE,
            hand:      &absent,
            landmarks: None,
            status:    &VisionStatus::Ready,
            mode:      None,
        };
        let mut fb = FrameBuffer::new(8, 8);
        fb.draw_scene(&scene, &OrbitCamera::default(), &legend(), false);
        assert_eq!(fb.pixels().len(), 64);
    }
}
