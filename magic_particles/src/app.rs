//! Top-level application state and the render loop.
//!
//! `AppState` owns the `ParticleAnimator`, the newest `HandState` and its
//! landmarks, and the vision status. Each frame it folds in whatever the
//! vision thread delivered, ticks the animator and hands a `Scene` to the
//! visualizer.

use std::sync::mpsc;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::Rng;

use hand_gesture::{HandLandmarks, HandState};
use particle_morph::{ParticleAnimator, ParticleField, ShapeLibrary};

use crate::config::{AppConfig, DetectorConfig};
use crate::subprocess::SubprocessSource;
use crate::vision::{spawn_vision, SimInput, SimVisionSource, VisionEvent, VisionSource};
use crate::visualizer::{Scene, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// VisionStatus
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum VisionStatus {
    /// The detector is still starting.
    Loading,
    Ready,
    /// The detector failed; the hand stays absent for the rest of the run.
    Unavailable(String),
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    animator:  ParticleAnimator,
    hand:      HandState,
    landmarks: Option<HandLandmarks>,
    status:    VisionStatus,
}

impl AppState {
    pub fn new<R: Rng + ?Sized>(cfg: &AppConfig, rng: &mut R) -> Self {
        let field  = ParticleField::new(cfg.particle_count, rng);
        let shapes = ShapeLibrary::build(cfg.particle_count, cfg.sphere_radius, &cfg.message_specs(), rng);
        AppState {
            animator:  ParticleAnimator::new(field, shapes),
            hand:      HandState::absent(),
            landmarks: None,
            status:    VisionStatus::Loading,
        }
    }

    /// Fold in vision events, oldest first. The newest frame wins; older
    /// ones are simply overwritten.
    pub fn apply_vision(&mut self, events: impl IntoIterator<Item = VisionEvent>) {
        for event in events {
            match event {
                VisionEvent::Ready => self.status = VisionStatus::Ready,
                VisionEvent::Frame { state, landmarks } => {
                    if self.hand.presence != state.presence {
                        log::info!("{}", if state.presence { "hand detected" } else { "hand lost" });
                    }
                    self.hand = state;
                    self.landmarks = landmarks;
                }
                VisionEvent::Unavailable(reason) => {
                    self.hand = HandState::absent();
                    self.landmarks = None;
                    self.status = VisionStatus::Unavailable(reason);
                }
            }
        }
    }

    /// Per-frame logic at `t` seconds since start.
    pub fn tick(&mut self, t: f32) {
        self.animator.tick(t, &self.hand);
    }

    pub fn scene(&self) -> Scene<'_> {
        Scene {
            positions: self.animator.positions(),
            color:     self.animator.color(),
            hand:      &self.hand,
            landmarks: self.landmarks.as_ref(),
            status:    &self.status,
            mode:      self.animator.mode(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application until the window closes.
///
/// Opens the window, starts the vision source on its own thread and drives
/// the poll → drain → tick → render loop at the window's frame rate.
pub fn run(cfg: AppConfig) -> Result<()> {
    let (sim_tx, source): (Option<mpsc::Sender<SimInput>>, Box<dyn VisionSource>) = match &cfg.detector {
        DetectorConfig::Simulated => {
            let (tx, rx) = mpsc::channel();
            (Some(tx), Box::new(SimVisionSource { rx }) as Box<dyn VisionSource>)
        }
        DetectorConfig::Command { program, args } => (
            None,
            Box::new(SubprocessSource::new(program.clone(), args.clone(), cfg.min_confidence))
                as Box<dyn VisionSource>,
        ),
    };

    let legend = cfg.messages.each_ref().map(|m| m.text.clone());
    let mut vis = Visualizer::new(cfg.window_width, cfg.window_height, legend, sim_tx)
        .context("opening window")?;

    let mut app = AppState::new(&cfg, &mut rand::thread_rng());
    log::info!(
        "{} particles, {} message shapes ready",
        app.scene().positions.len(),
        cfg.messages.len()
    );

    let vision = spawn_vision(source, cfg.vision_fps);
    let start = Instant::now();

    while vis.is_open() {
        if !vis.poll_input() { break; }
        app.apply_vision(vision.drain());
        app.tick(start.elapsed().as_secs_f32());
        vis.render(&app.scene());
    }

    log::info!("shutting down");
    drop(vision);
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::pose::{pose_hand, HandPose};
    use hand_gesture::Gesture;
    use particle_morph::mode::{PINK, RED};
    use particle_morph::ParticleMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn make_app() -> AppState {
        let cfg = AppConfig { particle_count: 500, ..AppConfig::default() };
        AppState::new(&cfg, &mut StdRng::seed_from_u64(1))
    }

    fn frame_for(pose: HandPose) -> VisionEvent {
        let lm = pose_hand(pose, 0.0);
        VisionEvent::Frame { state: HandState::from_landmarks(Some(&lm)), landmarks: Some(lm) }
    }

    #[test]
    fn starts_loading_without_hand() {
        let app = make_app();
        assert_eq!(app.scene().status, &VisionStatus::Loading);
        assert!(!app.scene().hand.presence);
        assert_eq!(app.scene().positions.len(), 500);
        assert_eq!(app.scene().mode, None);
    }

    #[test]
    fn ready_then_frames() {
        let mut app = make_app();
        app.apply_vision([VisionEvent::Ready, frame_for(HandPose::Point)]);
        assert_eq!(app.scene().status, &VisionStatus::Ready);
        assert_eq!(app.scene().hand.gesture, Gesture::One);
        assert!(app.scene().landmarks.is_some());
    }

    #[test]
    fn newest_frame_wins() {
        let mut app = make_app();
        app.apply_vision([
            frame_for(HandPose::Point),
            frame_for(HandPose::VSign),
            frame_for(HandPose::ThreeFingers),
        ]);
        assert_eq!(app.scene().hand.gesture, Gesture::Three);
    }

    #[test]
    fn empty_drain_keeps_last_state() {
        let mut app = make_app();
        app.apply_vision([frame_for(HandPose::VSign)]);
        app.apply_vision(Vec::new());
        assert_eq!(app.scene().hand.gesture, Gesture::Two);
    }

    #[test]
    fn unavailable_clears_hand() {
        let mut app = make_app();
        app.apply_vision([frame_for(HandPose::VSign)]);
        app.apply_vision([VisionEvent::Unavailable("camera unplugged".into())]);
        assert!(!app.scene().hand.presence);
        assert!(app.scene().landmarks.is_none());
        assert_eq!(app.scene().status, &VisionStatus::Unavailable("camera unplugged".into()));
        app.tick(0.0);
        assert_eq!(app.scene().mode, Some(ParticleMode::Idle));
    }

    #[test]
    fn tick_follows_gesture_and_color() {
        let mut app = make_app();
        app.apply_vision([frame_for(HandPose::VSign)]);
        for i in 0..300 {
            app.tick(i as f32 / 60.0);
        }
        assert_eq!(app.scene().mode, Some(ParticleMode::Msg2));
        assert!((app.scene().color - PINK).length() < 0.01);

        app.apply_vision([frame_for(HandPose::ThreeFingers)]);
        for i in 300..600 {
            app.tick(i as f32 / 60.0);
        }
        assert!((app.scene().color - RED).length() < 0.01);
        assert_eq!(app.animator.retarget_count(), 2);
    }

    #[test]
    fn scene_mirrors_state() {
        let mut app = make_app();
        app.apply_vision([VisionEvent::Ready, frame_for(HandPose::Fist)]);
        app.tick(0.0);
        let scene = app.scene();
        assert_eq!(scene.positions.len(), 500);
        assert!(scene.hand.presence);
        assert!(scene.landmarks.is_some());
        assert_eq!(scene.mode, Some(ParticleMode::Idle));
    }
}
