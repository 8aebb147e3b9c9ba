//! gesture_probe — classify landmark arrays read from stdin.
//!
//! One hand per line, as a JSON array of 21 `{"x":..,"y":..,"z":..}` objects.
//! `[]` or `null` means no hand in that frame. Each input line produces one
//! output line; malformed lines are reported on stderr and skipped.

use hand_gesture::{HandLandmarks, HandState, Landmark};
use std::io::{self, BufRead, Write};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let stdin  = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (n, line) in stdin.lock().lines().enumerate() {
        let line = match line {
            Ok(l)  => l,
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() { continue; }

        match parse_line(&line) {
            Ok(state) => {
                let written = writeln!(
                    out,
                    "gesture={} spread={:.3} presence={}",
                    state.gesture.code(), state.spread, state.presence
                );
                if written.is_err() { break; }
            }
            Err(e) => log::warn!("line {}: {}", n + 1, e),
        }
    }
}

fn parse_line(line: &str) -> Result<HandState, String> {
    let points: Option<Vec<Landmark>> =
        serde_json::from_str(line).map_err(|e| format!("bad JSON: {}", e))?;
    match points {
        None => Ok(HandState::absent()),
        Some(v) if v.is_empty() => Ok(HandState::absent()),
        Some(v) => {
            let hand = HandLandmarks::try_from(v).map_err(|e| e.to_string())?;
            Ok(HandState::from_landmarks(Some(&hand)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::pose::{pose_hand, HandPose};
    use hand_gesture::Gesture;

    #[test]
    fn null_and_empty_are_absent() {
        assert_eq!(parse_line("null").unwrap(), HandState::absent());
        assert_eq!(parse_line("[]").unwrap(), HandState::absent());
    }

    #[test]
    fn full_hand_is_classified() {
        let hand = pose_hand(HandPose::VSign, 0.0);
        let json = serde_json::to_string(hand.points().as_slice()).unwrap();
        let state = parse_line(&json).unwrap();
        assert!(state.presence);
        assert_eq!(state.gesture, Gesture::Two);
    }

    #[test]
    fn short_hand_is_rejected() {
        let err = parse_line(r#"[{"x":0.1,"y":0.2}]"#).unwrap_err();
        assert!(err.contains("got 1"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_line("not json").is_err());
    }
}
