//! Hand detection.
//!
//! The classifier only needs "a list of hands, each a list of 2-D landmark
//! points".  [`HandDetector`] is that contract; [`SkinDetector`] is a small
//! colour-segmentation implementation good enough for a single hand in front
//! of a plain background (and for the procedurally drawn hand of the
//! simulated camera).

use crate::frame::{rgb, CameraFrame};

/// Index of the reference landmark (the base of the hand).
pub const WRIST: usize = 0;

// ════════════════════════════════════════════════════════════════════════════
// Landmarks
// ════════════════════════════════════════════════════════════════════════════

/// A landmark in normalised image coordinates, both axes in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y }
    }

    /// Pixel position in a `width × height` frame, truncated toward zero.
    pub fn to_pixels(self, width: usize, height: usize) -> (i32, i32) {
        ((self.x * width as f32) as i32, (self.y * height as f32) as i32)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
}

impl Hand {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Hand { landmarks }
    }

    pub fn landmark(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied()
    }
}

/// Anything that can find hands in a frame.
pub trait HandDetector {
    /// Hands found in `frame`, most confident first.  Empty when none.
    fn detect(&mut self, frame: &CameraFrame) -> Vec<Hand>;
}

// ════════════════════════════════════════════════════════════════════════════
// SkinDetector
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct SkinDetectorConfig {
    /// Smallest blob, as a fraction of the frame area, reported as a hand.
    pub min_area_fraction: f32,
    /// Sample every `stride`-th pixel in both directions.
    pub stride: usize,
}

impl Default for SkinDetectorConfig {
    fn default() -> Self {
        SkinDetectorConfig {
            min_area_fraction: 0.005,
            stride:            2,
        }
    }
}

/// Skin-tone segmentation reporting at most one hand.
///
/// Landmarks, in order: mask centroid ([`WRIST`]), then the topmost,
/// bottommost, leftmost and rightmost skin samples.
#[derive(Clone, Debug, Default)]
pub struct SkinDetector {
    config: SkinDetectorConfig,
}

impl SkinDetector {
    pub fn new(config: SkinDetectorConfig) -> Self {
        SkinDetector { config }
    }
}

impl HandDetector for SkinDetector {
    fn detect(&mut self, frame: &CameraFrame) -> Vec<Hand> {
        let (w, h) = (frame.width(), frame.height());
        if w == 0 || h == 0 {
            return Vec::new();
        }
        let stride = self.config.stride.max(1);

        let mut count = 0usize;
        let (mut sum_x, mut sum_y) = (0u64, 0u64);
        let mut top    = (0usize, usize::MAX);
        let mut bottom = (0usize, 0usize);
        let mut left   = (usize::MAX, 0usize);
        let mut right  = (0usize, 0usize);

        for y in (0..h).step_by(stride) {
            for x in (0..w).step_by(stride) {
                let Some(px) = frame.pixel(x, y) else { continue };
                if !is_skin(px) {
                    continue;
                }
                count += 1;
                sum_x += x as u64;
                sum_y += y as u64;
                if y < top.1    { top = (x, y); }
                if y >= bottom.1 { bottom = (x, y); }
                if x < left.0   { left = (x, y); }
                if x >= right.0 { right = (x, y); }
            }
        }

        let covered = (count * stride * stride) as f32;
        if count == 0 || covered < self.config.min_area_fraction * (w * h) as f32 {
            return Vec::new();
        }

        let norm = |(x, y): (usize, usize)| Landmark::new(x as f32 / w as f32, y as f32 / h as f32);
        let centroid = Landmark::new(
            (sum_x as f32 / count as f32) / w as f32,
            (sum_y as f32 / count as f32) / h as f32,
        );
        vec![Hand::new(vec![centroid, norm(top), norm(bottom), norm(left), norm(right)])]
    }
}

/// Classic RGB skin rule (uniform daylight).
pub fn is_skin(pixel: u32) -> bool {
    let (r, g, b) = rgb(pixel);
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    r > 95 && g > 40 && b > 20
        && max - min > 15
        && (r - g).abs() > 15
        && r > g && r > b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::pack_rgb;

    const BG:   u32 = 0xFF10_1828;
    const SKIN: u32 = 0xFFE0_AC8C; // (224, 172, 140)

    fn frame_with_square(x0: usize, y0: usize, side: usize) -> CameraFrame {
        let mut f = CameraFrame::filled(200, 100, BG);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                f.set_pixel(x, y, SKIN);
            }
        }
        f
    }

    #[test]
    fn skin_rule() {
        assert!(is_skin(SKIN));
        assert!(!is_skin(BG));
        assert!(!is_skin(pack_rgb(255, 255, 255)));
        assert!(!is_skin(pack_rgb(0, 255, 100)));
    }

    #[test]
    fn finds_centroid_of_blob() {
        let mut det = SkinDetector::default();
        let hands = det.detect(&frame_with_square(100, 40, 20));
        assert_eq!(hands.len(), 1);
        let (cx, cy) = hands[0].landmark(WRIST).unwrap().to_pixels(200, 100);
        assert!((cx - 109).abs() <= 1, "cx = {}", cx);
        assert!((cy - 49).abs() <= 1, "cy = {}", cy);
        assert_eq!(hands[0].landmarks.len(), 5);
    }

    #[test]
    fn extremes_bound_the_blob() {
        let mut det = SkinDetector::new(SkinDetectorConfig { stride: 1, ..Default::default() });
        let hand = det.detect(&frame_with_square(20, 10, 30)).remove(0);
        let top    = hand.landmark(1).unwrap().to_pixels(200, 100);
        let bottom = hand.landmark(2).unwrap().to_pixels(200, 100);
        let left   = hand.landmark(3).unwrap().to_pixels(200, 100);
        let right  = hand.landmark(4).unwrap().to_pixels(200, 100);
        assert_eq!(top.1, 10);
        assert_eq!(bottom.1, 39);
        assert_eq!(left.0, 20);
        assert_eq!(right.0, 49);
    }

    #[test]
    fn small_specks_are_ignored() {
        let mut det = SkinDetector::default();
        // 4x4 = 16 px of 20_000 is below the 0.5% floor.
        assert!(det.detect(&frame_with_square(50, 50, 4)).is_empty());
        assert!(det.detect(&CameraFrame::filled(200, 100, BG)).is_empty());
    }

    #[test]
    fn empty_frame_has_no_hands() {
        let mut det = SkinDetector::default();
        assert!(det.detect(&CameraFrame::filled(0, 0, BG)).is_empty());
    }
}
