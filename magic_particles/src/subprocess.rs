//! External hand detector running as a child process.
//!
//! The child owns the webcam and the landmark model (for example a MediaPipe
//! script). Protocol, one JSON document per line:
//!
//! ```text
//! child → host   READY
//! host  → child  {"frame": 17}
//! child → host   {"hands": [{"score": 0.93, "landmarks": [{"x":..,"y":..,"z":..}, … ×21]}], "error": null}
//! ```

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hand_gesture::{HandLandmarks, Landmark};
use serde::{Deserialize, Serialize};

use crate::vision::{Frame, Interrupt, LandmarkDetector, VisionError, VisionSource};

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct FrameRequest {
    frame: u64,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default = "full_confidence")]
    score:     f32,
    #[serde(default)]
    handedness: Option<String>,
    landmarks: Vec<Landmark>,
}

fn full_confidence() -> f32 { 1.0 }

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Pick the first hand at or above `min_confidence` out of one response line.
///
/// Hands with the wrong number of landmarks are skipped. A response carrying
/// an `error` is logged and counts as "no hand".
pub fn parse_response(line: &str, min_confidence: f32) -> Result<Option<HandLandmarks>, VisionError> {
    let result: DetectionResult = serde_json::from_str(line.trim())
        .map_err(|e| VisionError::Protocol(format!("{} in {:?}", e, line.trim())))?;

    if let Some(err) = result.error {
        log::warn!("detector reported: {}", err);
        return Ok(None);
    }

    for hand in result.hands {
        if hand.score < min_confidence { continue; }
        match HandLandmarks::try_from(hand.landmarks) {
            Ok(lm) => {
                log::trace!(
                    "hand {} score={:.2} wrist=({:.3},{:.3})",
                    hand.handedness.as_deref().unwrap_or("?"), hand.score, lm.wrist().x, lm.wrist().y
                );
                return Ok(Some(lm));
            }
            Err(e) => log::warn!("skipping hand: {}", e),
        }
    }
    Ok(None)
}

// ════════════════════════════════════════════════════════════════════════════
// SubprocessSource / SubprocessDetector
// ════════════════════════════════════════════════════════════════════════════

/// The running child, shared by the detector and the teardown interrupt so
/// either side can end it. No lock is held across pipe I/O.
#[derive(Debug, Default)]
struct ChildSlot {
    child:       Option<Child>,
    interrupted: bool,
}

type SharedChild = Arc<Mutex<ChildSlot>>;

impl ChildSlot {
    fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            shutdown(&mut child);
        }
    }
}

fn lock(slot: &SharedChild) -> MutexGuard<'_, ChildSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Not yet started child process.
#[derive(Debug)]
pub struct SubprocessSource {
    program:        String,
    args:           Vec<String>,
    min_confidence: f32,
    slot:           SharedChild,
}

impl SubprocessSource {
    pub fn new(program: impl Into<String>, args: Vec<String>, min_confidence: f32) -> Self {
        SubprocessSource {
            program: program.into(),
            args,
            min_confidence,
            slot: SharedChild::default(),
        }
    }
}

impl VisionSource for SubprocessSource {
    fn name(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    fn open(self: Box<Self>) -> Result<Box<dyn LandmarkDetector>, VisionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| VisionError::Spawn { program: self.program.clone(), source })?;
        let pipes = (child.stdin.take(), child.stdout.take());

        {
            let mut slot = lock(&self.slot);
            if slot.interrupted {
                shutdown(&mut child);
                return Err(VisionError::Closed);
            }
            slot.child = Some(child);
        }

        let (stdin, stdout) = match pipes {
            (Some(i), Some(o)) => (i, o),
            _ => {
                lock(&self.slot).release();
                return Err(VisionError::Protocol("child pipes unavailable".into()));
            }
        };
        let mut detector = SubprocessDetector {
            child:          Arc::clone(&self.slot),
            stdin:          Some(stdin),
            reader:         BufReader::new(stdout),
            min_confidence: self.min_confidence,
        };

        // Loading the model can take a while; READY marks the end of it.
        let ready = detector.read_line()?;
        if ready.trim() != "READY" {
            return Err(VisionError::NotReady(ready.trim().to_string()));
        }
        Ok(Box::new(detector))
    }

    /// Kills the child, which closes its stdout and wakes a blocked read.
    fn interrupt(&self) -> Option<Interrupt> {
        let slot = Arc::clone(&self.slot);
        Some(Box::new(move || {
            let mut slot = lock(&slot);
            slot.interrupted = true;
            slot.release();
        }))
    }
}

/// Running child process. Dropping it closes the pipe and kills the child.
pub struct SubprocessDetector {
    child:          SharedChild,
    stdin:          Option<ChildStdin>,
    reader:         BufReader<ChildStdout>,
    min_confidence: f32,
}

impl SubprocessDetector {
    fn read_line(&mut self) -> Result<String, VisionError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(VisionError::Closed);
        }
        Ok(line)
    }
}

impl LandmarkDetector for SubprocessDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<HandLandmarks>, VisionError> {
        let stdin = self.stdin.as_mut().ok_or(VisionError::Closed)?;
        let request = serde_json::to_string(&FrameRequest { frame: frame.seq })
            .map_err(|e| VisionError::Protocol(e.to_string()))?;
        writeln!(stdin, "{}", request)?;
        stdin.flush()?;

        let line = self.read_line()?;
        parse_response(&line, self.min_confidence)
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        // Closing stdin lets a well-behaved child exit on EOF.
        drop(self.stdin.take());
        lock(&self.child).release();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
