//! Gesture-driven animator: the mode state machine on top of a
//! [`ParticleField`].

use glam::Vec3;
use rand::Rng;

use hand_gesture::{Gesture, HandState};
use crate::field::ParticleField;
use crate::mode::ParticleMode;
use crate::shape::{generate_sphere_shape, generate_text_shape, ParticlePoint};

// ════════════════════════════════════════════════════════════════════════════
// ShapeLibrary
// ════════════════════════════════════════════════════════════════════════════

/// Text and font size for one message mode.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSpec {
    pub text:      String,
    pub font_size: f32,
}

impl TextSpec {
    pub fn new(text: &str, font_size: f32) -> Self {
        TextSpec { text: text.to_string(), font_size }
    }
}

/// One immutable template per mode, computed once at startup.
#[derive(Clone, Debug)]
pub struct ShapeLibrary {
    templates: [Vec<ParticlePoint>; 4],
}

impl ShapeLibrary {
    pub fn new(
        idle: Vec<ParticlePoint>,
        msg1: Vec<ParticlePoint>,
        msg2: Vec<ParticlePoint>,
        msg3: Vec<ParticlePoint>,
    ) -> Self {
        ShapeLibrary { templates: [idle, msg1, msg2, msg3] }
    }

    /// Sphere of `sphere_count` points for IDLE plus three text shapes.
    pub fn build<R: Rng + ?Sized>(
        sphere_count:  usize,
        sphere_radius: f32,
        messages:      &[TextSpec; 3],
        rng:           &mut R,
    ) -> Self {
        let idle = generate_sphere_shape(sphere_count, sphere_radius, rng);
        let [m1, m2, m3] = messages.each_ref().map(|m| {
            let pts = generate_text_shape(&m.text, m.font_size);
            if pts.is_empty() {
                log::warn!("message {:?} rendered no points; particles will gather at the origin", m.text);
            }
            pts
        });
        ShapeLibrary::new(idle, m1, m2, m3)
    }

    pub fn get(&self, mode: ParticleMode) -> &[ParticlePoint] {
        &self.templates[mode.index()]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleAnimator
// ════════════════════════════════════════════════════════════════════════════

/// Owns the field and the templates; retargets on gesture changes.
///
/// Starts with no mode, so the first gesture seen always retargets.
#[derive(Clone, Debug)]
pub struct ParticleAnimator {
    field:     ParticleField,
    shapes:    ShapeLibrary,
    mode:      Option<ParticleMode>,
    retargets: usize,
}

impl ParticleAnimator {
    pub fn new(field: ParticleField, shapes: ShapeLibrary) -> Self {
        ParticleAnimator { field, shapes, mode: None, retargets: 0 }
    }

    /// Switch mode if `gesture` resolves to a different one. Returns true
    /// when targets and target color were recomputed.
    pub fn apply_gesture(&mut self, gesture: Gesture) -> bool {
        let Some(next) = ParticleMode::transition(self.mode, gesture) else {
            return false;
        };
        self.field.set_targets(self.shapes.get(next));
        self.field.set_target_color(next.color());
        self.mode = Some(next);
        self.retargets += 1;
        log::debug!("mode → {} ({} template points)", next.name(), self.shapes.get(next).len());
        true
    }

    /// One animation frame: apply the hand's gesture, then move particles.
    pub fn tick(&mut self, t: f32, hand: &HandState) {
        self.apply_gesture(hand.gesture);
        self.field.update(t, hand);
    }

    pub fn field(&self)          -> &ParticleField        { &self.field }
    pub fn positions(&self)      -> &[Vec3]               { self.field.positions() }
    pub fn color(&self)          -> Vec3                  { self.field.color() }
    pub fn mode(&self)           -> Option<ParticleMode>  { self.mode }
    pub fn retarget_count(&self) -> usize                 { self.retargets }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{CYAN, WHITE};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tiny_library() -> ShapeLibrary {
        ShapeLibrary::new(
            vec![Vec3::X],
            vec![Vec3::Y, Vec3::NEG_Y],
            vec![],
            vec![Vec3::Z],
        )
    }

    fn animator(n: usize) -> ParticleAnimator {
        ParticleAnimator::new(ParticleField::from_positions(vec![Vec3::ONE; n]), tiny_library())
    }

    #[test]
    fn first_gesture_always_retargets() {
        let mut a = animator(4);
        assert_eq!(a.mode(), None);
        assert!(a.apply_gesture(Gesture::None));
        assert_eq!(a.mode(), Some(ParticleMode::Idle));
        assert!(a.field().targets().iter().all(|t| *t == Vec3::X));
    }

    #[test]
    fn same_gesture_does_not_resnap() {
        let mut a = animator(4);
        a.apply_gesture(Gesture::One);
        assert!(!a.apply_gesture(Gesture::One));
        assert_eq!(a.retarget_count(), 1);
    }

    #[test]
    fn msg1_wraps_two_point_template() {
        let mut a = animator(5);
        a.apply_gesture(Gesture::One);
        let t = a.field().targets();
        assert_eq!(t, &[Vec3::Y, Vec3::NEG_Y, Vec3::Y, Vec3::NEG_Y, Vec3::Y]);
        assert_eq!(a.field().target_color(), CYAN);
    }

    #[test]
    fn empty_message_targets_origin() {
        let mut a = animator(3);
        a.apply_gesture(Gesture::Two);
        assert!(a.field().targets().iter().all(|t| *t == Vec3::ZERO));
        a.tick(0.5, &HandState::absent());
        assert!(a.positions().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn tick_applies_hand_gesture() {
        let mut a = animator(2);
        let hand = HandState { gesture: Gesture::Three, spread: 0.0, presence: true };
        a.tick(0.0, &hand);
        assert_eq!(a.mode(), Some(ParticleMode::Msg3));
        a.tick(0.1, &hand);
        assert_eq!(a.retarget_count(), 1);
    }

    #[test]
    fn absent_hand_falls_back_to_idle() {
        let mut a = animator(2);
        a.tick(0.0, &HandState { gesture: Gesture::Two, spread: 0.3, presence: true });
        a.tick(0.1, &HandState::absent());
        assert_eq!(a.mode(), Some(ParticleMode::Idle));
        assert_eq!(a.field().target_color(), WHITE);
    }

    #[test]
    fn build_library_from_specs() {
        let mut rng = StdRng::seed_from_u64(5);
        let msgs = [
            TextSpec::new("HI", 60.0),
            TextSpec::new("", 100.0),
            TextSpec::new("♥", 180.0),
        ];
        let lib = ShapeLibrary::build(300, 8.0, &msgs, &mut rng);
        assert_eq!(lib.get(ParticleMode::Idle).len(), 300);
        assert!(!lib.get(ParticleMode::Msg1).is_empty());
        assert!(lib.get(ParticleMode::Msg2).is_empty());
        assert!(!lib.get(ParticleMode::Msg3).is_empty());
    }
}
