//! Gesture and spread classification.
//!
//! Both measures are ratios of landmark distances, so they stay stable as the
//! hand moves closer to or further from the camera.

use serde::{Deserialize, Serialize};

use crate::landmark::{
    HandLandmarks, Landmark, INDEX_PIP, INDEX_TIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP,
    PINKY_TIP, RING_PIP, RING_TIP, THUMB_TIP, WRIST,
};

/// Tip must be this much further from the wrist than the PIP joint.
const EXTENSION_RATIO: f32 = 1.1;

/// Thumb–pinky / wrist–middle-MCP ratio of a closed fist.
const MIN_SPREAD_RATIO: f32 = 0.5;
/// Same ratio for a fully splayed hand.
const MAX_SPREAD_RATIO: f32 = 1.8;

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// Finger-count gesture. The discriminant is the wire/display code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Gesture {
    /// Fist, open palm, or any pattern that is not one of the three below.
    #[default]
    None  = 0,
    /// Index finger only.
    One   = 1,
    /// Index + middle (V-sign).
    Two   = 2,
    /// Index + middle + ring.
    Three = 3,
}

impl Gesture {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Gesture::code`]; `None` for codes outside 0–3.
    pub fn from_code(code: u8) -> Option<Gesture> {
        match code {
            0 => Some(Gesture::None),
            1 => Some(Gesture::One),
            2 => Some(Gesture::Two),
            3 => Some(Gesture::Three),
            _ => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandState
// ════════════════════════════════════════════════════════════════════════════

/// Latest classification result. Consumers replace their copy wholesale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HandState {
    pub gesture:  Gesture,
    /// 0.0 = closed, 1.0 = fully open.
    pub spread:   f32,
    pub presence: bool,
}

impl HandState {
    /// The state reported when no hand is in frame.
    pub const fn absent() -> Self {
        HandState { gesture: Gesture::None, spread: 0.0, presence: false }
    }

    /// Classify `hand` if one was detected; otherwise [`HandState::absent`].
    pub fn from_landmarks(hand: Option<&HandLandmarks>) -> Self {
        match hand {
            Some(h) => {
                let (gesture, spread) = classify(h);
                HandState { gesture, spread, presence: true }
            }
            None => HandState::absent(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Classifier
// ════════════════════════════════════════════════════════════════════════════

/// True iff the finger's tip is further from the wrist than
/// [`EXTENSION_RATIO`] × its PIP joint's distance.
pub fn is_extended(wrist: &Landmark, tip: &Landmark, pip: &Landmark) -> bool {
    tip.distance_2d(wrist) > pip.distance_2d(wrist) * EXTENSION_RATIO
}

/// Finger-count gesture of one hand.
pub fn detect_gesture(hand: &HandLandmarks) -> Gesture {
    let wrist = &hand[WRIST];
    let index  = is_extended(wrist, &hand[INDEX_TIP],  &hand[INDEX_PIP]);
    let middle = is_extended(wrist, &hand[MIDDLE_TIP], &hand[MIDDLE_PIP]);
    let ring   = is_extended(wrist, &hand[RING_TIP],   &hand[RING_PIP]);
    let pinky  = is_extended(wrist, &hand[PINKY_TIP],  &hand[PINKY_PIP]);

    match (index, middle, ring, pinky) {
        (true, true,  true,  false) => Gesture::Three,
        (true, true,  false, false) => Gesture::Two,
        (true, false, false, false) => Gesture::One,
        _                           => Gesture::None,
    }
}

/// Thumb-to-pinky span relative to palm length, mapped onto `[0, 1]`.
///
/// A zero palm length (degenerate input) is replaced by 1 so the result is
/// always finite.
pub fn hand_spread(hand: &HandLandmarks) -> f32 {
    let span = hand[THUMB_TIP].distance_2d(&hand[PINKY_TIP]);
    let palm = hand[WRIST].distance_2d(&hand[MIDDLE_MCP]);
    let palm = if palm == 0.0 { 1.0 } else { palm };

    let ratio = span / palm;
    let t = (ratio - MIN_SPREAD_RATIO) / (MAX_SPREAD_RATIO - MIN_SPREAD_RATIO);
    if t.is_nan() {
        return 0.0;
    }
    t.clamp(0.0, 1.0)
}

/// Classify a detected hand into `(gesture, spread)`.
pub fn classify(hand: &HandLandmarks) -> (Gesture, f32) {
    (detect_gesture(hand), hand_spread(hand))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
