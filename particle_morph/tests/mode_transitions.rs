// Gesture sequences through the full animator, with real shape templates.

use glam::Vec3;
use hand_gesture::{Gesture, HandState};
use particle_morph::mode::{CYAN, PINK, WHITE};
use particle_morph::{ParticleAnimator, ParticleField, ParticleMode, ShapeLibrary, TextSpec};
use rand::rngs::StdRng;
use rand::SeedableRng;

const N: usize = 1000;

fn animator() -> ParticleAnimator {
    let mut rng = StdRng::seed_from_u64(2024);
    let messages = [
        TextSpec::new("BABY, GO!", 60.0),
        TextSpec::new("I LOVE YOU", 100.0),
        TextSpec::new("♥", 180.0),
    ];
    let shapes = ShapeLibrary::build(N, 8.0, &messages, &mut rng);
    ParticleAnimator::new(ParticleField::new(N, &mut rng), shapes)
}

fn present(gesture: Gesture) -> HandState {
    HandState { gesture, spread: 0.0, presence: true }
}

#[test]
fn sequence_retargets_only_on_change() {
    let mut anim = animator();
    let codes = [0u8, 1, 1, 2, 0];
    let expected = [WHITE, CYAN, CYAN, PINK, WHITE];
    let mut recomputed = 0;

    for (code, color) in codes.iter().zip(expected) {
        let g = Gesture::from_code(*code).unwrap();
        if anim.apply_gesture(g) {
            recomputed += 1;
        }
        assert_eq!(anim.field().target_color(), color, "after gesture {}", code);
    }

    assert_eq!(recomputed, 4);
    assert_eq!(anim.retarget_count(), 4);
}

#[test]
fn field_size_never_changes() {
    let mut anim = animator();
    for frame in 0..240 {
        let g = Gesture::from_code((frame / 30 % 4) as u8).unwrap();
        let hand = HandState { gesture: g, spread: (frame % 60) as f32 / 60.0, presence: frame % 7 != 0 };
        anim.tick(frame as f32 / 60.0, &hand);
        assert_eq!(anim.positions().len(), N);
        assert_eq!(anim.field().targets().len(), N);
    }
}

#[test]
fn fist_gathers_into_message() {
    let mut anim = animator();
    for frame in 0..400 {
        anim.tick(frame as f32 / 60.0, &present(Gesture::Three));
    }
    assert_eq!(anim.mode(), Some(ParticleMode::Msg3));
    // Tight hand, no noise: everyone sits on the flat heart.
    let worst = anim
        .positions()
        .iter()
        .zip(anim.field().targets())
        .map(|(p, t)| (*p - *t).length())
        .fold(0.0f32, f32::max);
    assert!(worst < 1e-3, "worst {}", worst);
    assert!(anim.positions().iter().all(|p| p.z.abs() < 1e-3));
    assert!((anim.color() - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-3);
}

#[test]
fn idle_sphere_radius_reached() {
    let mut anim = animator();
    for frame in 0..400 {
        anim.tick(frame as f32 / 60.0, &HandState::absent());
    }
    for p in anim.positions() {
        assert!((p.length() - 8.0).abs() < 1e-2);
    }
}
