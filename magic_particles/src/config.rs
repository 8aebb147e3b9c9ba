//! Application configuration: defaults, JSON file, command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use particle_morph::TextSpec;
use serde::{Deserialize, Serialize};

/// One message shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageConfig {
    pub text:      String,
    pub font_size: f32,
}

impl MessageConfig {
    fn new(text: &str, font_size: f32) -> Self {
        MessageConfig { text: text.to_string(), font_size }
    }

    pub fn to_spec(&self) -> TextSpec {
        TextSpec::new(&self.text, self.font_size)
    }
}

/// Where hand landmarks come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorConfig {
    /// Keyboard-driven synthetic hand.
    Simulated,
    /// External process speaking the line-JSON detector protocol.
    Command {
        program: String,
        #[serde(default)]
        args:    Vec<String>,
    },
}

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub particle_count: usize,
    pub sphere_radius:  f32,
    /// Messages for gestures 1, 2 and 3.
    pub messages:       [MessageConfig; 3],
    pub detector:       DetectorConfig,
    /// Upper bound on detector frames per second.
    pub vision_fps:     u32,
    /// Hands scoring below this are ignored.
    pub min_confidence: f32,
    pub window_width:   usize,
    pub window_height:  usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            particle_count: 4000,
            sphere_radius:  8.0,
            messages: [
                MessageConfig::new("BABY, GO!", 60.0),
                MessageConfig::new("I LOVE YOU", 100.0),
                MessageConfig::new("♥", 180.0),
            ],
            detector:       DetectorConfig::Simulated,
            vision_fps:     30,
            min_confidence: 0.5,
            window_width:   1024,
            window_height:  640,
        }
    }
}

pub const USAGE: &str = "\
usage: magic_particles [--config FILE] [--particles N] [--sim | --detector PROGRAM [ARGS...]]

  --config FILE        load settings from a JSON file (missing fields use defaults)
  --particles N        number of particles (default 4000)
  --sim                keyboard-simulated hand (default)
  --detector PROG ...  run PROG as the hand detector; remaining arguments go to PROG
  --help               show this message";

impl AppConfig {
    /// Read a JSON config file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build from command-line arguments (without the program name).
    /// `--config` is applied first, then the other flags override it.
    /// Returns `Ok(None)` when `--help` was requested.
    pub fn from_args(args: &[String]) -> Result<Option<Self>> {
        if args.iter().any(|a| a == "--help" || a == "-h") {
            return Ok(None);
        }

        let mut cfg = match args.iter().position(|a| a == "--config") {
            Some(i) => {
                let path = args.get(i + 1).context("--config needs a file path")?;
                AppConfig::load(Path::new(path))?
            }
            None => AppConfig::default(),
        };

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--config" => i += 1,
                "--particles" => {
                    let n = args.get(i + 1).context("--particles needs a number")?;
                    cfg.particle_count = n.parse()
                        .with_context(|| format!("--particles: {:?} is not a number", n))?;
                    i += 1;
                }
                "--sim" => cfg.detector = DetectorConfig::Simulated,
                "--detector" => {
                    let program = args.get(i + 1).context("--detector needs a program")?;
                    cfg.detector = DetectorConfig::Command {
                        program: program.clone(),
                        args:    args[i + 2..].to_vec(),
                    };
                    break;
                }
                other => bail!("unknown argument {:?}\n\n{}", other, USAGE),
            }
            i += 1;
        }

        cfg.validate()?;
        Ok(Some(cfg))
    }

    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            bail!("particle_count must be at least 1");
        }
        if !(self.sphere_radius > 0.0) {
            bail!("sphere_radius must be positive, got {}", self.sphere_radius);
        }
        if self.vision_fps == 0 || self.vision_fps > 240 {
            bail!("vision_fps must be 1–240, got {}", self.vision_fps);
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            bail!("min_confidence must be 0–1, got {}", self.min_confidence);
        }
        if self.window_width < 320 || self.window_height < 240 {
            bail!("window must be at least 320×240");
        }
        Ok(())
    }

    pub fn message_specs(&self) -> [TextSpec; 3] {
        self.messages.each_ref().map(MessageConfig::to_spec)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn args(s: &[&str]) -> Vec<String> {
        s.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.particle_count, 4000);
        assert_eq!(cfg.detector, DetectorConfig::Simulated);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: AppConfig = serde_json::from_str(r#"{"particle_count": 1500}"#).unwrap();
        assert_eq!(cfg.particle_count, 1500);
        assert_eq!(cfg.messages, AppConfig::default().messages);
    }

    #[test]
    fn detector_json_forms() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"detector": {"kind": "command", "program": "python3", "args": ["hands.py"]}}"#,
        ).unwrap();
        assert_eq!(
            cfg.detector,
            DetectorConfig::Command { program: "python3".into(), args: vec!["hands.py".into()] }
        );
        let cfg: AppConfig = serde_json::from_str(r#"{"detector": {"kind": "simulated"}}"#).unwrap();
        assert_eq!(cfg.detector, DetectorConfig::Simulated);
    }

    #[test]
    fn no_args_is_default() {
        assert_eq!(AppConfig::from_args(&[]).unwrap(), Some(AppConfig::default()));
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(AppConfig::from_args(&args(&["--particles", "x", "--help"])).unwrap(), None);
    }

    #[test]
    fn particles_override() {
        let cfg = AppConfig::from_args(&args(&["--particles", "250"])).unwrap().unwrap();
        assert_eq!(cfg.particle_count, 250);
        assert!(AppConfig::from_args(&args(&["--particles", "0"])).is_err());
        assert!(AppConfig::from_args(&args(&["--particles", "many"])).is_err());
        assert!(AppConfig::from_args(&args(&["--particles"])).is_err());
    }

    #[test]
    fn detector_takes_remaining_args() {
        let cfg = AppConfig::from_args(&args(&[
            "--particles", "100", "--detector", "python3", "hands.py", "--camera", "1",
        ])).unwrap().unwrap();
        assert_eq!(cfg.particle_count, 100);
        assert_eq!(
            cfg.detector,
            DetectorConfig::Command {
                program: "python3".into(),
                args:    args(&["hands.py", "--camera", "1"]),
            }
        );
    }

    #[test]
    fn unknown_flag_rejected() {
        assert!(AppConfig::from_args(&args(&["--fast"])).is_err());
    }

    #[test]
    fn config_file_then_overrides() {
        let path = std::env::temp_dir().join(format!("magic_particles_cfg_{}.json", std::process::id()));
        fs::write(&path, r#"{"particle_count": 1234, "sphere_radius": 5.0}"#).unwrap();
        let p = path.to_string_lossy().to_string();

        let cfg = AppConfig::from_args(&args(&["--config", &p])).unwrap().unwrap();
        assert_eq!(cfg.particle_count, 1234);
        assert_eq!(cfg.sphere_radius, 5.0);

        let cfg = AppConfig::from_args(&args(&["--particles", "9", "--config", &p])).unwrap().unwrap();
        assert_eq!(cfg.particle_count, 9);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_config_file_errors() {
        assert!(AppConfig::load(Path::new("/nonexistent/magic.json")).is_err());
    }

    #[test]
    fn message_specs_follow_config() {
        let specs = AppConfig::default().message_specs();
        assert_eq!(specs[1], TextSpec::new("I LOVE YOU", 100.0));
    }
}
