//! # magic_particles
//!
//! A hand-gesture particle toy. A hand detector watches the webcam (or a
//! keyboard simulator stands in for it); finger counts morph a glowing cloud
//! of particles between a sphere and three text messages, and opening or
//! closing the hand scatters or gathers the cloud.
//!
//! ## Gesture → Shape mapping
//!
//! | Gesture | Shape | Color |
//! |---|---|---|
//! | No hand / fist / open hand | Sphere | White |
//! | Index finger | Message 1 ("BABY, GO!") | Cyan |
//! | Index + middle | Message 2 ("I LOVE YOU") | Pink |
//! | Index + middle + ring | Message 3 (♥) | Red |
//!
//! Hand spread (thumb tip to pinky tip, relative to palm size) controls the
//! diffusion: an open hand scatters the particles, a fist pulls them tight.
//!
//! ## Vision sources
//!
//! * (default) **Simulation**: keyboard poses drive a synthetic hand.
//! * `--detector PROGRAM [ARGS...]`: an external process owns the camera and
//!   answers frame requests with landmark JSON (see [`subprocess`]).
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Hand |
//! |---|---|
//! | `0` | Fist |
//! | `1` | Index finger |
//! | `2` | V-sign |
//! | `3` | Three fingers |
//! | `5` / `O` | Open palm |
//! | `Up` / `Down` | Spread thumb wider / narrower |
//! | `H` | Hide / show the hand |
//! | Mouse drag | Orbit the camera |
//! | `Q` / `Escape` | Quit |

pub mod vision;
pub mod subprocess;
pub mod config;
pub mod camera;
pub mod visualizer;
pub mod app;
