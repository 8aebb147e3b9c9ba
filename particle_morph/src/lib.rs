//! # particle_morph
//!
//! A fixed-size particle field that morphs between shape templates:
//! a sphere while idle, and rasterized text for each message gesture.
//!
//! | Gesture | Mode | Shape | Color |
//! |---|---|---|---|
//! | 0 | `Idle` | sphere | white |
//! | 1 | `Msg1` | message 1 | cyan |
//! | 2 | `Msg2` | message 2 | pink |
//! | 3 | `Msg3` | message 3 | red |
//!
//! Hand spread controls diffusion: an open hand scatters particles around
//! their targets, a fist pulls them in tight.
//!
//! ```rust
//! use particle_morph::{ParticleAnimator, ParticleField, ShapeLibrary, TextSpec};
//! use hand_gesture::{Gesture, HandState};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let messages = [TextSpec::new("HI", 60.0), TextSpec::new("YO", 100.0), TextSpec::new("♥", 180.0)];
//! let shapes = ShapeLibrary::build(500, 8.0, &messages, &mut rng);
//! let mut anim = ParticleAnimator::new(ParticleField::new(500, &mut rng), shapes);
//!
//! let hand = HandState { gesture: Gesture::One, spread: 0.2, presence: true };
//! anim.tick(0.016, &hand);
//! assert_eq!(anim.positions().len(), 500);
//! ```

pub mod glyph;
pub mod shape;
pub mod mode;
pub mod field;
pub mod animator;

pub use shape::{generate_sphere_shape, generate_text_shape, random_scatter, ParticlePoint};
pub use mode::ParticleMode;
pub use field::ParticleField;
pub use animator::{ParticleAnimator, ShapeLibrary, TextSpec};
