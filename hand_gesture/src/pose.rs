//! Synthetic hand poses.
//!
//! Builds plausible 21-point hands from finger-extension flags, for the
//! keyboard simulator and for tests. The hand is upright in image space
//! (fingers towards smaller `y`), palm facing the camera.

use crate::landmark::{
    HandLandmarks, Landmark, INDEX_MCP, LANDMARK_COUNT, MIDDLE_MCP, PINKY_MCP, RING_MCP,
    THUMB_CMC, THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};
use crate::classify::Gesture;

const WRIST_POS: (f32, f32) = (0.50, 0.80);

/// Knuckle position and (MCP→PIP, PIP→DIP, DIP→tip) bone lengths
/// for index, middle, ring, pinky.
const FINGERS: [((f32, f32), [f32; 3]); 4] = [
    ((0.44, 0.62), [0.060, 0.040, 0.035]),
    ((0.50, 0.60), [0.065, 0.045, 0.035]),
    ((0.56, 0.62), [0.060, 0.040, 0.030]),
    ((0.61, 0.65), [0.045, 0.030, 0.025]),
];

const THUMB_BASE:   (f32, f32) = (0.45, 0.75);
/// Thumb tip folded across the curled fingers.
const THUMB_TUCKED: (f32, f32) = (0.56, 0.66);
/// Thumb tip fully abducted.
const THUMB_OPEN:   (f32, f32) = (0.28, 0.60);

// ════════════════════════════════════════════════════════════════════════════
// HandPose
// ════════════════════════════════════════════════════════════════════════════

/// Named poses the simulator can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandPose {
    Fist,
    Point,
    VSign,
    ThreeFingers,
    OpenPalm,
}

impl HandPose {
    pub const ALL: [HandPose; 5] = [
        HandPose::Fist,
        HandPose::Point,
        HandPose::VSign,
        HandPose::ThreeFingers,
        HandPose::OpenPalm,
    ];

    /// Extension flags for index, middle, ring, pinky.
    pub fn fingers(self) -> [bool; 4] {
        match self {
            HandPose::Fist         => [false, false, false, false],
            HandPose::Point        => [true,  false, false, false],
            HandPose::VSign        => [true,  true,  false, false],
            HandPose::ThreeFingers => [true,  true,  true,  false],
            HandPose::OpenPalm     => [true,  true,  true,  true ],
        }
    }

    /// The gesture the classifier should report for this pose.
    pub fn gesture(self) -> Gesture {
        match self {
            HandPose::Point        => Gesture::One,
            HandPose::VSign        => Gesture::Two,
            HandPose::ThreeFingers => Gesture::Three,
            HandPose::Fist | HandPose::OpenPalm => Gesture::None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandPose::Fist         => "fist",
            HandPose::Point        => "point",
            HandPose::VSign        => "v-sign",
            HandPose::ThreeFingers => "three",
            HandPose::OpenPalm     => "open palm",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Builders
// ════════════════════════════════════════════════════════════════════════════

/// Build a hand with the given index/middle/ring/pinky extension flags.
///
/// `splay` in `[0, 1]` swings the thumb from tucked across the palm to fully
/// abducted, which is what drives the spread measure.
pub fn synthetic_hand(fingers: [bool; 4], splay: f32) -> HandLandmarks {
    let splay = splay.clamp(0.0, 1.0);
    let mut pts = [Landmark::default(); LANDMARK_COUNT];
    let (wx, wy) = WRIST_POS;
    pts[WRIST] = Landmark::new(wx, wy, 0.0);

    // Thumb: straight line from the CMC joint to the tip.
    let tip = lerp2(THUMB_TUCKED, THUMB_OPEN, splay);
    let (bx, by) = THUMB_BASE;
    let along = |t: f32, z: f32| Landmark::new(bx + (tip.0 - bx) * t, by + (tip.1 - by) * t, z);
    pts[THUMB_CMC] = along(0.0, 0.0);
    pts[THUMB_MCP] = along(0.4, -0.01);
    pts[THUMB_IP]  = along(0.7, -0.015);
    pts[THUMB_TIP] = along(1.0, -0.02);

    let mcps = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
    for (f, &((mx, my), [l1, l2, l3])) in FINGERS.iter().enumerate() {
        // Radial direction from the wrist through the knuckle.
        let (dx, dy) = (mx - wx, my - wy);
        let len = dx.hypot(dy);
        let (ux, uy) = (dx / len, dy / len);
        let at = |d: f32, z: f32| Landmark::new(mx + ux * d, my + uy * d, z);

        let base = mcps[f];
        pts[base]     = at(0.0, 0.0);
        pts[base + 1] = at(l1, 0.0);
        if fingers[f] {
            pts[base + 2] = at(l1 + l2, 0.0);
            pts[base + 3] = at(l1 + l2 + l3, 0.0);
        } else {
            // Curled back towards the palm, tip closer to the wrist than PIP.
            pts[base + 2] = at(l1 * 0.5, -0.02);
            pts[base + 3] = at(l1 * 0.15, -0.03);
        }
    }

    HandLandmarks::new(pts)
}

/// Same as [`synthetic_hand`] for a named pose.
pub fn pose_hand(pose: HandPose, splay: f32) -> HandLandmarks {
    synthetic_hand(pose.fingers(), splay)
}

/// Uniformly scale a hand about its wrist and then shift it by `offset`.
pub fn scaled(hand: &HandLandmarks, factor: f32, offset: (f32, f32)) -> HandLandmarks {
    let w = *hand.wrist();
    let mut pts = *hand.points();
    for p in pts.iter_mut() {
        p.x = w.x + (p.x - w.x) * factor + offset.0;
        p.y = w.y + (p.y - w.y) * factor + offset.1;
        p.z *= factor;
    }
    HandLandmarks::new(pts)
}

fn lerp2(a: (f32, f32), b: (f32, f32), t: f32) -> (f32, f32) {
    (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, detect_gesture};

    #[test]
    fn every_pose_classifies_as_named() {
        for pose in HandPose::ALL {
            for splay in [0.0, 0.5, 1.0] {
                assert_eq!(detect_gesture(&pose_hand(pose, splay)), pose.gesture(), "{}", pose.name());
            }
        }
    }

    #[test]
    fn landmarks_inside_image() {
        for pose in HandPose::ALL {
            for p in pose_hand(pose, 1.0).points() {
                assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
            }
        }
    }

    #[test]
    fn classification_survives_scaling() {
        for pose in HandPose::ALL {
            let base = pose_hand(pose, 0.8);
            let (g0, _) = classify(&base);
            for factor in [0.5, 0.75, 1.5] {
                let moved = scaled(&base, factor, (0.05, -0.1));
                assert_eq!(classify(&moved).0, g0, "{} at {}", pose.name(), factor);
            }
        }
    }

    #[test]
    fn splay_is_clamped() {
        let a = pose_hand(HandPose::OpenPalm, 5.0);
        let b = pose_hand(HandPose::OpenPalm, 1.0);
        assert_eq!(a, b);
    }
}
