//! Vision adapter — hand landmarks from an external detector or from the
//! keyboard simulator.
//!
//! The public interface is [`VisionEvent`] delivered over an `mpsc` channel
//! from a dedicated thread. The render loop never blocks on detection; it
//! drains whatever has arrived and keeps the newest hand state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use hand_gesture::pose::{pose_hand, scaled, HandPose};
use hand_gesture::{HandLandmarks, HandState};
use thiserror::Error;

/// Give up on a detector after this many consecutive failed frames.
const MAX_CONSECUTIVE_ERRORS: u32 = 30;
/// How long teardown waits for the vision thread before detaching it.
const JOIN_TIMEOUT: Duration = Duration::from_millis(500);

// ════════════════════════════════════════════════════════════════════════════
// Frame / errors / events
// ════════════════════════════════════════════════════════════════════════════

/// One capture request. The detector owns the camera; the frame tells it
/// which tick this is and how long the session has been running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub seq:     u64,
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("failed to start detector `{program}`: {source}")]
    Spawn { program: String, source: std::io::Error },
    #[error("detector did not signal READY (got {0:?})")]
    NotReady(String),
    #[error("detector closed its output")]
    Closed,
    #[error("detector I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("detector protocol: {0}")]
    Protocol(String),
}

/// Emitted by the vision thread.
#[derive(Clone, Debug, PartialEq)]
pub enum VisionEvent {
    /// The detector loaded and is about to deliver frames.
    Ready,
    /// Result for one processed frame.
    Frame {
        state:     HandState,
        landmarks: Option<HandLandmarks>,
    },
    /// The detector failed to load or stopped working; no more frames follow.
    Unavailable(String),
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkDetector / VisionSource — the narrow seam to the vision capability
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can find one hand's landmarks for a frame.
pub trait LandmarkDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Option<HandLandmarks>, VisionError>;
}

/// Forcibly ends a detector from outside the vision thread.
pub type Interrupt = Box<dyn FnOnce() + Send>;

/// A detector that still has to be loaded. Loading runs on the vision thread
/// so slow model start-up never stalls the window.
pub trait VisionSource: Send + 'static {
    fn name(&self) -> String;
    fn open(self: Box<Self>) -> Result<Box<dyn LandmarkDetector>, VisionError>;

    /// Taken before the source moves to the vision thread. Teardown calls it
    /// when the thread is stuck inside `open` or `detect`; it must make that
    /// call return.
    fn interrupt(&self) -> Option<Interrupt> {
        None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// VisionHandle — owns the thread
// ════════════════════════════════════════════════════════════════════════════

/// Handle to the running vision thread. Dropping it stops the thread and
/// releases the detector; nothing is delivered afterwards.
pub struct VisionHandle {
    rx:        Receiver<VisionEvent>,
    stop:      Arc<AtomicBool>,
    thread:    Option<JoinHandle<()>>,
    interrupt: Option<Interrupt>,
}

impl VisionHandle {
    /// Drain pending events (non-blocking), oldest first.
    pub fn drain(&self) -> Vec<VisionEvent> {
        self.rx.try_iter().collect()
    }
}

impl Drop for VisionHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        let Some(thread) = self.thread.take() else { return };

        if !wait_finished(&thread, JOIN_TIMEOUT) {
            if let Some(interrupt) = self.interrupt.take() {
                log::warn!("vision thread did not stop within {:?}; interrupting detector", JOIN_TIMEOUT);
                interrupt();
                wait_finished(&thread, JOIN_TIMEOUT);
            }
        }
        if thread.is_finished() {
            if thread.join().is_err() {
                log::warn!("vision thread panicked");
            }
        } else {
            log::warn!("vision thread still blocked; detaching");
        }
    }
}

fn wait_finished(thread: &JoinHandle<()>, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while !thread.is_finished() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    thread.is_finished()
}

/// Spawn `source` on its own thread, detecting at up to `fps` frames/second.
pub fn spawn_vision(source: Box<dyn VisionSource>, fps: u32) -> VisionHandle {
    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let period = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let interrupt = source.interrupt();

    let thread_stop = Arc::clone(&stop);
    let thread = thread::Builder::new()
        .name("vision".into())
        .spawn(move || vision_loop(source, tx, thread_stop, period));

    let thread = match thread {
        Ok(t) => Some(t),
        Err(e) => {
            log::error!("could not start vision thread: {}", e);
            None
        }
    };
    VisionHandle { rx, stop, thread, interrupt }
}

fn vision_loop(
    source: Box<dyn VisionSource>,
    tx:     Sender<VisionEvent>,
    stop:   Arc<AtomicBool>,
    period: Duration,
) {
    let name = source.name();
    log::info!("loading vision source: {}", name);

    let mut detector = match source.open() {
        Ok(d) => d,
        Err(e) => {
            log::warn!("vision unavailable ({}): {}", name, e);
            let _ = tx.send(VisionEvent::Unavailable(e.to_string()));
            return;
        }
    };
    log::info!("vision source ready: {}", name);
    if tx.send(VisionEvent::Ready).is_err() { return; }

    let start = Instant::now();
    let mut seq = 0u64;
    let mut failures = 0u32;

    while !stop.load(Ordering::Relaxed) {
        let tick = Instant::now();
        let frame = Frame { seq, elapsed: start.elapsed() };

        let landmarks = match detector.detect(&frame) {
            Ok(l) => {
                failures = 0;
                l
            }
            Err(e) => {
                failures += 1;
                log::warn!("frame {}: {}", seq, e);
                if matches!(e, VisionError::Closed) || failures >= MAX_CONSECUTIVE_ERRORS {
                    let _ = tx.send(VisionEvent::Unavailable(e.to_string()));
                    break;
                }
                None
            }
        };

        let state = HandState::from_landmarks(landmarks.as_ref());
        if stop.load(Ordering::Relaxed) { break; }
        if tx.send(VisionEvent::Frame { state, landmarks }).is_err() { break; }

        seq += 1;
        if let Some(rest) = period.checked_sub(tick.elapsed()) {
            thread::sleep(rest);
        }
    }
    log::debug!("vision thread exiting after {} frames", seq);
}

// ════════════════════════════════════════════════════════════════════════════
// SimVisionSource — keyboard-driven synthetic hand (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    KeyDown(SimKey),
}

/// Simulated key codes (mapped from minifb keys by the visualizer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    Pose(HandPose), // 0 1 2 3 5/O
    SplayUp,        // Up
    SplayDown,      // Down
    ToggleHand,     // H
}

const SPLAY_STEP: f32 = 0.1;

/// Synthetic hand driven by [`SimInput`] events from the window.
pub struct SimVisionSource {
    pub rx: Receiver<SimInput>,
}

impl VisionSource for SimVisionSource {
    fn name(&self) -> String {
        "keyboard simulator".to_string()
    }

    fn open(self: Box<Self>) -> Result<Box<dyn LandmarkDetector>, VisionError> {
        Ok(Box::new(SimDetector::new(self.rx)))
    }
}

pub struct SimDetector {
    rx:      Receiver<SimInput>,
    pose:    HandPose,
    splay:   f32,
    present: bool,
}

impl SimDetector {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimDetector { rx, pose: HandPose::OpenPalm, splay: 0.5, present: false }
    }

    fn apply(&mut self, input: SimInput) {
        let SimInput::KeyDown(key) = input;
        match key {
            SimKey::Pose(p) => {
                self.pose = p;
                self.present = true;
                // A fist has the thumb tucked; other poses keep the current splay.
                if p == HandPose::Fist { self.splay = 0.0; }
            }
            SimKey::SplayUp    => self.splay = (self.splay + SPLAY_STEP).min(1.0),
            SimKey::SplayDown  => self.splay = (self.splay - SPLAY_STEP).max(0.0),
            SimKey::ToggleHand => self.present = !self.present,
        }
    }
}

impl LandmarkDetector for SimDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<HandLandmarks>, VisionError> {
        while let Ok(input) = self.rx.try_recv() {
            self.apply(input);
        }
        if !self.present {
            return Ok(None);
        }
        // Small drift so the preview looks alive; ratios are unaffected.
        let t = frame.elapsed.as_secs_f32();
        let hand = pose_hand(self.pose, self.splay);
        Ok(Some(scaled(&hand, 1.0, ((t * 0.7).sin() * 0.01, (t * 1.1).cos() * 0.01))))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
