//! # hand_gesture
//!
//! Turns camera frames into snake directions.
//!
//! ```text
//! CameraFrame ──HandDetector──▶ [Hand] ──GestureClassifier──▶ GestureReading
//!                                                              └─ intent: Option<GestureIntent>
//! ```
//!
//! * [`CameraFrame`] is a packed `0xAARRGGBB` image of fixed size.
//! * [`HandDetector`] finds hands and reports landmarks normalised to
//!   `[0, 1]`.  [`SkinDetector`] is the bundled implementation.
//! * [`GestureClassifier`] tracks one reference landmark between frames and
//!   converts a fast enough swipe into a direction, with a cooldown between
//!   accepted changes.

pub mod classifier;
pub mod detector;
pub mod frame;

pub use classifier::{
    dominant_direction, ClassifierConfig, GestureClassifier, GestureIntent, GestureReading,
    HandSample,
};
pub use detector::{Hand, HandDetector, Landmark, SkinDetector, SkinDetectorConfig, WRIST};
pub use frame::{pack_rgb, rgb, CameraFrame, FrameError};
