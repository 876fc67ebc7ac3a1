//! # gesture_snake
//!
//! Classic snake on a 32 × 28 grid, steered by swiping a hand in front of a
//! camera, with the arrow keys as a fallback.
//!
//! ## Controls
//!
//! | Input | Action |
//! |---|---|
//! | Hand moves ≥ 30 px left / right / up / down | Turn the snake that way |
//! | Arrow keys | Turn the snake |
//! | `R` (after game over) | Start a new game |
//! | `Escape` / close window | Quit |
//!
//! Reversals are never accepted, whichever input asks for them.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────┬────────────────┐
//! │                              │  SNAKE GAME    │
//! │        play area             │  score / dir   │
//! │        800 × 700             │ ┌────────────┐ │
//! │                              │ │  camera    │ │
//! │                              │ └────────────┘ │
//! │                              │  controls      │
//! └──────────────────────────────┴────────────────┘
//! ```
//!
//! ## Feature flags
//!
//! * (default): **Simulated camera**: hover the mouse over the camera panel
//!   and a hand is drawn there; move it to swipe.
//! * `camera`: **Webcam**: frames come from an OpenCV `VideoCapture` device
//!   selected with `--camera <index>`.

pub mod app;
pub mod camera;
pub mod canvas;
pub mod display;
pub mod render;

use thiserror::Error;

use snake_sim::SimError;

pub use app::{run, AppConfig, CameraSource, GameLoop, Pacer, TickOutcome};
pub use camera::{open_camera, Camera, PointerSample, SimCamera};
pub use canvas::Canvas;
pub use display::{key_events, Display, InputEvent, Surface, WindowDisplay};
pub use render::{Layout, Rect, Renderer, Scene};

#[cfg(feature = "camera")]
pub use camera::OpenCvCamera;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("display: {0}")]
    Display(String),
    #[error("camera: {0}")]
    Camera(String),
    #[error(transparent)]
    Simulation(#[from] SimError),
}
