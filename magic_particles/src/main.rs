//! magic_particles — interactive entry point.

use magic_particles::app::run;
use magic_particles::config::{AppConfig, DetectorConfig, USAGE};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cfg = match AppConfig::from_args(&args) {
        Ok(Some(cfg)) => cfg,
        Ok(None) => {
            println!("{}", USAGE);
            return;
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    };

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            Magic Particles — Hand Gesture Morphing           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match &cfg.detector {
        DetectorConfig::Simulated => {
            println!("  Mode: Keyboard simulation  (use --detector PROGRAM for a camera)");
            println!("  Keys: 0 fist  1/2/3 fingers  5/O open  Up/Down spread  H hand  Q quit");
        }
        DetectorConfig::Command { program, args } => {
            println!("  Mode: External detector  ({} {})", program, args.join(" "));
        }
    }
    println!("  Particles: {}", cfg.particle_count);
    println!();

    if let Err(e) = run(cfg) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
