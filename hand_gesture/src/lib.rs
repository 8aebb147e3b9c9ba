//! # hand_gesture
//!
//! Turns one hand's 21 landmarks into a [`HandState`]: a discrete finger-count
//! [`Gesture`] plus a continuous `spread` in `[0, 1]`.
//!
//! ## Gesture table
//!
//! | Index | Middle | Ring | Pinky | Gesture |
//! |---|---|---|---|---|
//! | ✓ | ✓ | ✓ | ✗ | `Three` (3) |
//! | ✓ | ✓ | ✗ | ✗ | `Two` (2) |
//! | ✓ | ✗ | ✗ | ✗ | `One` (1) |
//! | anything else | | | | `None` (0) |
//!
//! A finger counts as extended when its tip is more than 1.1× as far from
//! the wrist as its PIP joint, so the test does not depend on hand size or
//! camera distance.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_gesture::{classify, pose::{HandPose, synthetic_hand}, Gesture};
//!
//! let hand = synthetic_hand(HandPose::VSign.fingers(), 0.0);
//! let (gesture, spread) = classify(&hand);
//! assert_eq!(gesture, Gesture::Two);
//! assert!(spread >= 0.0 && spread <= 1.0);
//! ```

pub mod landmark;
pub mod classify;
pub mod pose;

pub use landmark::{HandLandmarks, Landmark, LandmarkError, HAND_CONNECTIONS, LANDMARK_COUNT};
pub use classify::{classify, hand_spread, detect_gesture, is_extended, Gesture, HandState};
