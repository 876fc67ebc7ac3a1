//! gesture_snake: interactive entry point.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gesture_snake::{run, AppConfig, CameraSource};
use hand_gesture::ClassifierConfig;

/// Snake steered by hand swipes in front of a camera.
#[derive(Debug, Parser)]
#[command(name = "gesture_snake", version, about)]
struct Cli {
    /// Milliseconds between two accepted swipe turns.
    #[arg(long, default_value_t = 200)]
    cooldown_ms: u64,

    /// Pixels the hand must travel along one axis to count as a swipe.
    #[arg(long, default_value_t = 30)]
    threshold: i32,

    /// Forget the last hand position whenever the hand leaves the frame.
    #[arg(long)]
    reset_hand_on_loss: bool,

    /// Seed for food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Webcam device index (needs the `camera` feature).  Without it the
    /// camera is simulated: hover the mouse over the camera panel.
    #[arg(long, value_name = "INDEX")]
    camera: Option<i32>,

    /// Show the webcam image unmirrored.
    #[arg(long)]
    no_mirror: bool,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        AppConfig {
            classifier: ClassifierConfig {
                cooldown:           Duration::from_millis(self.cooldown_ms),
                movement_threshold: self.threshold,
                reset_on_hand_loss: self.reset_hand_on_loss,
                ..ClassifierConfig::default()
            },
            camera: match self.camera {
                Some(index) => CameraSource::Device { index, mirror: !self.no_mirror },
                None => CameraSource::Simulated,
            },
            seed: self.seed,
            ..AppConfig::default()
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    println!();
    println!("╔══════════════════════════════════════════════════╗");
    println!("║        Snake Game with Hand Tracking             ║");
    println!("╚══════════════════════════════════════════════════╝");
    println!();
    match cli.camera {
        Some(index) => println!("  Camera: device {}", index),
        None => println!("  Camera: simulated (hover the mouse over the camera panel)"),
    }
    println!("  Arrow keys steer too.  R restarts, Esc quits.");
    println!();

    let cfg = cli.into_config();
    tracing::debug!(?cfg, "configuration");
    run(cfg).context("gesture snake stopped with an error")
}
