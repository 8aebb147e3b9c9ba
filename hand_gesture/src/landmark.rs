//! Hand landmarks in normalized image space.
//!
//! Indices follow the common 21-point hand model: wrist first, then four
//! joints per digit from the thumb outwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmarks in one detected hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Bone segments between landmarks, for skeleton previews.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),   (1, 2),   (2, 3),   (3, 4),
    (0, 5),   (5, 6),   (6, 7),   (7, 8),
    (5, 9),   (9, 10),  (10, 11), (11, 12),
    (9, 13),  (13, 14), (14, 15), (15, 16),
    (13, 17), (17, 18), (18, 19), (19, 20),
    (0, 17),
];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// One hand keypoint. `x`/`y` are normalized to `[0, 1]` of the image;
/// `z` is relative depth and is ignored by the classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Planar (x/y) distance to `other`.
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    WrongCount(usize),
}

/// Exactly [`LANDMARK_COUNT`] landmarks of a single detected hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks { points }
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> &Landmark {
        &self.points[WRIST]
    }
}

impl std::ops::Index<usize> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, idx: usize) -> &Landmark {
        &self.points[idx]
    }
}

impl TryFrom<&[Landmark]> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(slice: &[Landmark]) -> Result<Self, Self::Error> {
        let points: [Landmark; LANDMARK_COUNT] = slice
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(slice.len()))?;
        Ok(HandLandmarks { points })
    }
}

impl TryFrom<Vec<Landmark>> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(v: Vec<Landmark>) -> Result<Self, Self::Error> {
        HandLandmarks::try_from(v.as_slice())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_from_exact_count() {
        let v = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        let hand = HandLandmarks::try_from(v).unwrap();
        assert_eq!(hand.wrist(), &Landmark::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn try_from_wrong_count() {
        let short = vec![Landmark::default(); 20];
        assert_eq!(HandLandmarks::try_from(short), Err(LandmarkError::WrongCount(20)));
        let long = vec![Landmark::default(); 22];
        assert_eq!(HandLandmarks::try_from(long), Err(LandmarkError::WrongCount(22)));
    }

    #[test]
    fn distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 9.0);
        assert!((a.distance_2d(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn z_defaults_when_missing() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.25,"y":0.75}"#).unwrap();
        assert_eq!(lm, Landmark::new(0.25, 0.75, 0.0));
    }

    #[test]
    fn connections_stay_in_range() {
        for &(a, b) in HAND_CONNECTIONS.iter() {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
        }
    }
}
