//! Shape templates: point clouds the particle field morphs towards.
//!
//! Text is rasterized into an off-screen monochrome canvas and sampled on a
//! coarse grid; the sphere is sampled directly.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use crate::glyph::{glyph_or_blank, text_cells, GLYPH_H};

/// A single point of a template, in world units.
pub type ParticlePoint = Vec3;

pub const CANVAS_W: usize = 1024;
pub const CANVAS_H: usize = 512;
/// Sample every N-th pixel in both axes.
pub const SAMPLE_STEP: usize = 4;
/// Pixels brighter than this become points.
pub const BRIGHTNESS_THRESHOLD: u8 = 128;
/// World units per canvas pixel.
pub const WORLD_SCALE: f32 = 0.05;

// ════════════════════════════════════════════════════════════════════════════
// Canvas — transient monochrome raster
// ════════════════════════════════════════════════════════════════════════════

struct Canvas {
    width:  usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: usize, height: usize) -> Self {
        Canvas { width, height, pixels: vec![0; width * height] }
    }

    fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    /// Fill the pixels whose centers fall inside `[x0, x1) × [y0, y1)`.
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, value: u8) {
        let clip = |v: f32, max: usize| (v.round().max(0.0) as usize).min(max);
        let (cx0, cx1) = (clip(x0, self.width),  clip(x1, self.width));
        let (cy0, cy1) = (clip(y0, self.height), clip(y1, self.height));
        for row in cy0..cy1 {
            let line = row * self.width;
            self.pixels[line + cx0..line + cx1].fill(value);
        }
    }

    /// Draw `text` centered on the canvas, glyph height `font_size` pixels.
    fn fill_text_centered(&mut self, text: &str, font_size: f32) {
        let cell = font_size / GLYPH_H as f32;
        let total_w = text_cells(text) as f32 * cell;
        let mut x = (self.width as f32 - total_w) / 2.0;
        let y = (self.height as f32 - font_size) / 2.0;

        for c in text.chars() {
            let g = glyph_or_blank(c);
            for row in 0..GLYPH_H {
                for col in 0..g.width {
                    if g.is_set(col, row) {
                        let gx = x + col as f32 * cell;
                        let gy = y + row as f32 * cell;
                        self.fill_rect(gx, gy, gx + cell, gy + cell, u8::MAX);
                    }
                }
            }
            x += (g.width + 1) as f32 * cell;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Generators
// ════════════════════════════════════════════════════════════════════════════

/// Rasterize `text` at `font_size` pixels tall and return one point per
/// bright sample, recentered on the canvas and flipped so text top is +Y.
///
/// Empty text, or text with no supported glyphs, yields no points.
pub fn generate_text_shape(text: &str, font_size: f32) -> Vec<ParticlePoint> {
    if text.is_empty() || !(font_size > 0.0) {
        return Vec::new();
    }

    let mut canvas = Canvas::new(CANVAS_W, CANVAS_H);
    canvas.fill_text_centered(text, font_size);

    let half_w = (canvas.width / 2) as f32;
    let half_h = (canvas.height / 2) as f32;
    let mut points = Vec::new();
    for y in (0..canvas.height).step_by(SAMPLE_STEP) {
        for x in (0..canvas.width).step_by(SAMPLE_STEP) {
            if canvas.get(x, y) > BRIGHTNESS_THRESHOLD {
                points.push(Vec3::new(
                    (x as f32 - half_w) * WORLD_SCALE,
                    -(y as f32 - half_h) * WORLD_SCALE,
                    0.0,
                ));
            }
        }
    }

    log::debug!("text shape {:?} @ {}px → {} points", text, font_size, points.len());
    points
}

/// `count` points uniformly distributed over a sphere of `radius`.
///
/// φ comes from the inverse CDF `acos(2u − 1)`; sampling φ uniformly would
/// bunch points at the poles.
pub fn generate_sphere_shape<R: Rng + ?Sized>(count: usize, radius: f32, rng: &mut R) -> Vec<ParticlePoint> {
    (0..count)
        .map(|_| {
            let theta = rng.gen::<f32>() * TAU;
            let phi = (rng.gen::<f32>() * 2.0 - 1.0).acos();
            Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            )
        })
        .collect()
}

/// `count` points uniform in the cube `[-half_extent, half_extent)³`.
pub fn random_scatter<R: Rng + ?Sized>(count: usize, half_extent: f32, rng: &mut R) -> Vec<ParticlePoint> {
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-half_extent..half_extent),
                rng.gen_range(-half_extent..half_extent),
                rng.gen_range(-half_extent..half_extent),
            )
        })
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
