//! The particle field: N positions chasing N targets.
//!
//! Each frame every particle moves a fraction of the way towards its target
//! plus a per-particle sine offset whose amplitude grows with hand spread.
//! An open hand scatters the shape; a closed fist pulls it tight.

use glam::Vec3;
use rand::Rng;

use hand_gesture::HandState;
use crate::mode::WHITE;
use crate::shape::{random_scatter, ParticlePoint};

/// Fraction of the remaining distance covered per frame at neutral tightness.
pub const LERP_SPEED:       f32 = 0.05;
/// Fraction of the remaining color difference covered per frame.
pub const COLOR_LERP:       f32 = 0.05;
/// Noise amplitude (world units) at full spread.
pub const MAX_EXPANSION:    f32 = 15.0;
/// Tightness used while no hand is visible.
pub const ABSENT_TIGHTNESS: f32 = 0.8;
/// Initial positions are uniform in ±this on each axis.
pub const INITIAL_SCATTER:  f32 = 25.0;

/// Noise amplitude and tightness for the current hand.
pub fn motion_params(hand: &HandState) -> (f32, f32) {
    if hand.presence {
        (hand.spread * MAX_EXPANSION, 1.0 - hand.spread)
    } else {
        (0.0, ABSENT_TIGHTNESS)
    }
}

/// Per-frame lerp factor; tighter hands snap faster.
pub fn lerp_speed(tightness: f32) -> f32 {
    LERP_SPEED * (tightness * 2.0 + 0.5)
}

/// Diffusion offset of particle `i` at time `t`. The index acts as a phase
/// so particles drift out of sync with each other.
pub fn noise_offset(i: usize, t: f32, expansion: f32) -> Vec3 {
    let phase = i as f32;
    Vec3::new(
        (t * 2.0 + phase).sin(),
        (t * 3.0 + phase).cos(),
        (t * 1.5 + phase).sin(),
    ) * expansion
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

/// Fixed-size set of particles with their targets and a shared color.
///
/// `positions.len() == targets.len()` for the field's whole lifetime.
#[derive(Clone, Debug)]
pub struct ParticleField {
    positions:    Vec<Vec3>,
    targets:      Vec<Vec3>,
    color:        Vec3,
    target_color: Vec3,
}

impl ParticleField {
    /// `count` particles scattered randomly, all targeting the origin.
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        ParticleField::from_positions(random_scatter(count, INITIAL_SCATTER, rng))
    }

    /// Field with the given starting positions, all targeting the origin.
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        let targets = vec![Vec3::ZERO; positions.len()];
        ParticleField { positions, targets, color: WHITE, target_color: WHITE }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Overwrite every target from `template`, wrapping when the template is
    /// shorter than the field. An empty template sends everything to the
    /// origin.
    pub fn set_targets(&mut self, template: &[ParticlePoint]) {
        if template.is_empty() {
            self.targets.fill(Vec3::ZERO);
            return;
        }
        for (i, t) in self.targets.iter_mut().enumerate() {
            *t = template[i % template.len()];
        }
    }

    pub fn set_target_color(&mut self, color: Vec3) {
        self.target_color = color;
    }

    /// Advance one frame at elapsed time `t` seconds.
    pub fn update(&mut self, t: f32, hand: &HandState) {
        let (expansion, tightness) = motion_params(hand);
        let speed = lerp_speed(tightness);

        for (i, (p, target)) in self.positions.iter_mut().zip(&self.targets).enumerate() {
            let goal = *target + noise_offset(i, t, expansion);
            *p += (goal - *p) * speed;
        }

        self.color = self.color.lerp(self.target_color, COLOR_LERP);
    }

    pub fn positions(&self)    -> &[Vec3] { &self.positions }
    pub fn targets(&self)      -> &[Vec3] { &self.targets }
    pub fn color(&self)        -> Vec3    { self.color }
    pub fn target_color(&self) -> Vec3    { self.target_color }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
