//! Display modes and their colors.

use glam::Vec3;
use hand_gesture::Gesture;

pub const WHITE: Vec3 = Vec3::new(1.0, 1.0, 1.0);
pub const CYAN:  Vec3 = Vec3::new(0.0, 1.0, 1.0);
/// `#ff69b4`
pub const PINK:  Vec3 = Vec3::new(1.0, 105.0 / 255.0, 180.0 / 255.0);
pub const RED:   Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Which shape the particles are gathering into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleMode {
    /// Sphere.
    Idle,
    Msg1,
    Msg2,
    Msg3,
}

impl ParticleMode {
    pub const ALL: [ParticleMode; 4] = [
        ParticleMode::Idle,
        ParticleMode::Msg1,
        ParticleMode::Msg2,
        ParticleMode::Msg3,
    ];

    pub fn from_gesture(g: Gesture) -> Self {
        match g {
            Gesture::None  => ParticleMode::Idle,
            Gesture::One   => ParticleMode::Msg1,
            Gesture::Two   => ParticleMode::Msg2,
            Gesture::Three => ParticleMode::Msg3,
        }
    }

    /// Mode after seeing `g` while in `current`, or `None` if nothing changes.
    pub fn transition(current: Option<ParticleMode>, g: Gesture) -> Option<ParticleMode> {
        let next = ParticleMode::from_gesture(g);
        (current != Some(next)).then_some(next)
    }

    pub fn color(self) -> Vec3 {
        match self {
            ParticleMode::Idle => WHITE,
            ParticleMode::Msg1 => CYAN,
            ParticleMode::Msg2 => PINK,
            ParticleMode::Msg3 => RED,
        }
    }

    /// Position in [`ParticleMode::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ParticleMode::Idle => "IDLE",
            ParticleMode::Msg1 => "MSG_1",
            ParticleMode::Msg2 => "MSG_2",
            ParticleMode::Msg3 => "MSG_3",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gesture_maps_to_mode() {
        assert_eq!(ParticleMode::from_gesture(Gesture::None),  ParticleMode::Idle);
        assert_eq!(ParticleMode::from_gesture(Gesture::One),   ParticleMode::Msg1);
        assert_eq!(ParticleMode::from_gesture(Gesture::Two),   ParticleMode::Msg2);
        assert_eq!(ParticleMode::from_gesture(Gesture::Three), ParticleMode::Msg3);
    }

    #[test]
    fn transition_only_on_change() {
        assert_eq!(ParticleMode::transition(None, Gesture::None), Some(ParticleMode::Idle));
        assert_eq!(ParticleMode::transition(Some(ParticleMode::Idle), Gesture::None), None);
        assert_eq!(
            ParticleMode::transition(Some(ParticleMode::Idle), Gesture::Two),
            Some(ParticleMode::Msg2)
        );
    }

    #[test]
    fn palette() {
        assert_eq!(ParticleMode::Idle.color(), WHITE);
        assert_eq!(ParticleMode::Msg1.color(), CYAN);
        assert_eq!(ParticleMode::Msg2.color(), PINK);
        assert_eq!(ParticleMode::Msg3.color(), RED);
    }

    #[test]
    fn index_matches_all() {
        for (i, m) in ParticleMode::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }
}
