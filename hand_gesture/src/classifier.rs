//! Swipe classification.
//!
//! # Algorithm
//!
//! Each frame we look at the reference landmark of the first hand only:
//!
//! * **No previous sample**: remember it, emit nothing.
//! * **Cooldown**: nothing is emitted until `cooldown` has passed since the
//!   last emitted intent (the clock starts when the classifier is built).
//! * **Axis dominance**: the axis with the strictly larger movement wins,
//!   provided that movement strictly exceeds `movement_threshold` pixels.
//!   `dx > 0` → Right, `dx < 0` → Left, `dy > 0` → Down, `dy < 0` → Up.
//! * **No reversal**: a candidate opposite to the snake's current heading is
//!   shown as a label but not emitted.
//!
//! The stored sample is overwritten on every frame that has a hand.  Frames
//! without a hand leave it alone, so the next delta spans the gap; set
//! `reset_on_hand_loss` to forget the sample instead.

use std::time::{Duration, Instant};

use snake_sim::Direction;
use tracing::{debug, trace};

use crate::detector::{Hand, WRIST};

#[derive(Clone, Debug, PartialEq)]
pub struct ClassifierConfig {
    /// Minimum time between two emitted intents.
    pub cooldown:           Duration,
    /// Pixels the reference landmark must travel along the dominant axis.
    pub movement_threshold: i32,
    /// Which landmark of the hand to track.
    pub reference_landmark: usize,
    /// Forget the previous sample when the hand disappears.
    pub reset_on_hand_loss: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            cooldown:           Duration::from_millis(200),
            movement_threshold: 30,
            reference_landmark: WRIST,
            reset_on_hand_loss: false,
        }
    }
}

/// Last seen pixel position of the reference landmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandSample {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureIntent {
    pub direction: Direction,
    pub at:        Instant,
}

/// What one frame produced, for the game loop and the camera overlay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GestureReading {
    /// Pixel positions of every landmark of the tracked hand.
    pub landmarks: Vec<(i32, i32)>,
    /// Pixel position of the reference landmark; `None` when no hand.
    pub reference: Option<(i32, i32)>,
    /// Dominant-axis direction, even if it was refused as a reversal.
    pub candidate: Option<Direction>,
    pub intent:    Option<GestureIntent>,
}

impl GestureReading {
    pub fn hand_detected(&self) -> bool {
        self.reference.is_some()
    }
}

pub struct GestureClassifier {
    config:      ClassifierConfig,
    previous:    Option<HandSample>,
    last_change: Instant,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig, now: Instant) -> Self {
        GestureClassifier { config, previous: None, last_change: now }
    }

    pub fn previous(&self) -> Option<HandSample> { self.previous }

    /// Classify one frame of `width × height` pixels.
    ///
    /// `current` is the snake's committed heading, not the pending one.
    pub fn classify(
        &mut self,
        hands: &[Hand],
        width: usize,
        height: usize,
        current: Direction,
        now: Instant,
    ) -> GestureReading {
        let reference = hands
            .first()
            .and_then(|hand| hand.landmark(self.config.reference_landmark).map(|lm| (hand, lm)));

        let Some((hand, reference)) = reference else {
            if self.config.reset_on_hand_loss {
                self.previous = None;
            }
            return GestureReading::default();
        };

        let (x, y) = reference.to_pixels(width, height);
        let mut reading = GestureReading {
            landmarks: hand.landmarks.iter().map(|lm| lm.to_pixels(width, height)).collect(),
            reference: Some((x, y)),
            ..GestureReading::default()
        };

        if let Some(prev) = self.previous {
            let (dx, dy) = (x - prev.x, y - prev.y);
            if now.saturating_duration_since(self.last_change) > self.config.cooldown {
                reading.candidate = dominant_direction(dx, dy, self.config.movement_threshold);
                match reading.candidate {
                    Some(dir) if !dir.is_opposite(current) => {
                        self.last_change = now;
                        reading.intent = Some(GestureIntent { direction: dir, at: now });
                        debug!(%dir, dx, dy, "gesture intent");
                    }
                    Some(dir) => trace!(%dir, %current, "gesture reversal ignored"),
                    None => {}
                }
            }
        }

        self.previous = Some(HandSample { x, y });
        reading
    }
}

/// Direction of a movement whose dominant axis exceeds `threshold` pixels.
pub fn dominant_direction(dx: i32, dy: i32, threshold: i32) -> Option<Direction> {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax > ay && ax > threshold {
        Some(if dx > 0 { Direction::Right } else { Direction::Left })
    } else if ay > ax && ay > threshold {
        Some(if dy > 0 { Direction::Down } else { Direction::Up })
    } else {
        None
    }
}
