//! Camera sources.
//!
//! [`Camera::read_frame`] returns `None` for a transient failure; the game
//! loop skips that tick and tries again on the next one.

use std::sync::mpsc::{Receiver, TryRecvError};

use tracing::{debug, info};

use hand_gesture::{pack_rgb, CameraFrame};

use crate::app::CameraSource;
use crate::AppError;

pub trait Camera {
    fn read_frame(&mut self) -> Option<CameraFrame>;
}

/// Open the camera selected by `source`.  The pointer feed only drives the
/// simulated camera.
pub fn open_camera(
    source: &CameraSource,
    pointer_rx: Receiver<PointerSample>,
) -> Result<Box<dyn Camera>, AppError> {
    match source {
        CameraSource::Simulated => {
            info!("using simulated camera");
            Ok(Box::new(SimCamera::new(pointer_rx)))
        }
        #[cfg(feature = "camera")]
        CameraSource::Device { index, mirror } => Ok(Box::new(OpenCvCamera::open(*index, *mirror)?)),
        #[cfg(not(feature = "camera"))]
        CameraSource::Device { index, .. } => Err(AppError::Camera(format!(
            "device {} requested but this build has no webcam support (enable the `camera` feature)",
            index
        ))),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Simulated camera
// ════════════════════════════════════════════════════════════════════════════

/// Mouse position over the camera panel, as sent by the window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerSample {
    /// Normalised position inside the panel, both axes in `[0, 1)`.
    Over { u: f32, v: f32 },
    Away,
}

const SKIN:        (u8, u8, u8) = (224, 172, 140);
const SKIN_SHADOW: (u8, u8, u8) = (200, 150, 120);

/// Procedural camera: a dark backdrop with a hand drawn wherever the mouse
/// hovers over the camera panel.
pub struct SimCamera {
    width:      usize,
    height:     usize,
    pointer_rx: Receiver<PointerSample>,
    hand:       Option<(f32, f32)>,
    frames:     u64,
}

impl SimCamera {
    pub const WIDTH:  usize = 640;
    pub const HEIGHT: usize = 480;

    pub fn new(pointer_rx: Receiver<PointerSample>) -> Self {
        SimCamera { width: Self::WIDTH, height: Self::HEIGHT, pointer_rx, hand: None, frames: 0 }
    }

    /// Keep only the newest pointer sample.
    fn drain_pointer(&mut self) {
        loop {
            match self.pointer_rx.try_recv() {
                Ok(PointerSample::Over { u, v }) => self.hand = Some((u, v)),
                Ok(PointerSample::Away) => self.hand = None,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn backdrop(&self) -> CameraFrame {
        let mut frame = CameraFrame::filled(self.width, self.height, 0);
        // Slow rolling scanline so the feed visibly updates.
        let scan = (self.frames * 3 % self.height as u64) as usize;
        for y in 0..self.height {
            let shade = (y * 24 / self.height) as u8;
            let lift = if y.abs_diff(scan) < 3 { 10 } else { 0 };
            let color = pack_rgb(18 + lift, 22 + shade + lift, 36 + shade + lift);
            for x in 0..self.width {
                frame.set_pixel(x, y, color);
            }
        }
        frame
    }

    fn draw_hand(frame: &mut CameraFrame, cx: f32, cy: f32) {
        let (r, g, b) = SKIN;
        let palm = pack_rgb(r, g, b);
        let (r, g, b) = SKIN_SHADOW;
        let finger = pack_rgb(r, g, b);

        // Palm: ellipse 90 × 110 px.
        fill_ellipse(frame, cx, cy, 45.0, 55.0, palm);
        // Four fingers and a thumb.
        for i in 0..4 {
            let fx = cx - 33.0 + i as f32 * 22.0;
            fill_ellipse(frame, fx, cy - 70.0, 9.0, 28.0, finger);
        }
        fill_ellipse(frame, cx - 55.0, cy - 5.0, 10.0, 24.0, finger);
    }
}

impl Camera for SimCamera {
    fn read_frame(&mut self) -> Option<CameraFrame> {
        self.drain_pointer();
        let mut frame = self.backdrop();
        if let Some((u, v)) = self.hand {
            Self::draw_hand(&mut frame, u * self.width as f32, v * self.height as f32);
        }
        self.frames += 1;
        Some(frame)
    }
}

impl Drop for SimCamera {
    fn drop(&mut self) {
        debug!(frames = self.frames, "simulated camera released");
    }
}

fn fill_ellipse(frame: &mut CameraFrame, cx: f32, cy: f32, rx: f32, ry: f32, color: u32) {
    let y0 = (cy - ry).floor().max(0.0) as usize;
    let y1 = (cy + ry).ceil().max(0.0) as usize;
    let x0 = (cx - rx).floor().max(0.0) as usize;
    let x1 = (cx + rx).ceil().max(0.0) as usize;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = (x as f32 - cx) / rx;
            let dy = (y as f32 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                frame.set_pixel(x, y, color);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Webcam (OpenCV)
// ════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "camera")]
pub use webcam::OpenCvCamera;

#[cfg(feature = "camera")]
mod webcam {
    use opencv::core::{Mat, CV_8UC3};
    use opencv::prelude::*;
    use opencv::videoio::{self, VideoCapture};
    use tracing::{debug, info, warn};

    use hand_gesture::{pack_rgb, CameraFrame};

    use super::Camera;
    use crate::AppError;

    pub struct OpenCvCamera {
        capture: VideoCapture,
        index:   i32,
        mirror:  bool,
    }

    impl OpenCvCamera {
        pub fn open(index: i32, mirror: bool) -> Result<Self, AppError> {
            let capture = VideoCapture::new(index, videoio::CAP_ANY)
                .map_err(|e| AppError::Camera(format!("device {}: {}", index, e)))?;
            let opened = capture
                .is_opened()
                .map_err(|e| AppError::Camera(format!("device {}: {}", index, e)))?;
            if !opened {
                return Err(AppError::Camera(format!("device {} could not be opened", index)));
            }
            info!(index, mirror, "camera opened");
            Ok(OpenCvCamera { capture, index, mirror })
        }
    }

    impl Camera for OpenCvCamera {
        fn read_frame(&mut self) -> Option<CameraFrame> {
            let mut mat = Mat::default();
            match self.capture.read(&mut mat) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(index = self.index, "camera returned no frame");
                    return None;
                }
                Err(e) => {
                    debug!(index = self.index, error = %e, "camera read failed");
                    return None;
                }
            }
            let mut frame = match bgr_to_frame(&mat) {
                Ok(Some(frame)) => frame,
                Ok(None) => return None,
                Err(e) => {
                    debug!(error = %e, "camera frame conversion failed");
                    return None;
                }
            };
            if self.mirror {
                frame.mirror_horizontal();
            }
            Some(frame)
        }
    }

    impl Drop for OpenCvCamera {
        fn drop(&mut self) {
            if let Err(e) = self.capture.release() {
                warn!(index = self.index, error = %e, "camera release failed");
            }
            info!(index = self.index, "camera released");
        }
    }

    /// Packed BGR `Mat` → ARGB frame.  `Ok(None)` for empty or non-BGR images.
    fn bgr_to_frame(mat: &Mat) -> opencv::Result<Option<CameraFrame>> {
        if mat.empty() || mat.typ() != CV_8UC3 {
            return Ok(None);
        }
        let owned;
        let mat = if mat.is_continuous() {
            mat
        } else {
            owned = mat.try_clone()?;
            &owned
        };
        let (w, h) = (mat.cols() as usize, mat.rows() as usize);
        let bytes = mat.data_bytes()?;
        let pixels = bytes
            .chunks_exact(3)
            .take(w * h)
            .map(|bgr| pack_rgb(bgr[2], bgr[1], bgr[0]))
            .collect();
        Ok(CameraFrame::from_pixels(w, h, pixels).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_gesture::{HandDetector, SkinDetector, WRIST};
    use std::sync::mpsc;

    #[test]
    fn no_hand_until_pointer_hovers() {
        let (tx, rx) = mpsc::channel();
        let mut cam = SimCamera::new(rx);
        let mut det = SkinDetector::default();

        let frame = cam.read_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (640, 480));
        assert!(det.detect(&frame).is_empty());

        tx.send(PointerSample::Over { u: 0.5, v: 0.5 }).unwrap();
        let hands = det.detect(&cam.read_frame().unwrap());
        assert_eq!(hands.len(), 1);
        let (x, y) = hands[0].landmark(WRIST).unwrap().to_pixels(640, 480);
        // Fingers pull the centroid a little above the palm centre.
        assert!((x - 320).abs() < 15, "x = {}", x);
        assert!(y < 240 && y > 200, "y = {}", y);

        tx.send(PointerSample::Away).unwrap();
        assert!(det.detect(&cam.read_frame().unwrap()).is_empty());
    }

    #[test]
    fn newest_pointer_sample_wins() {
        let (tx, rx) = mpsc::channel();
        let mut cam = SimCamera::new(rx);
        let mut det = SkinDetector::default();

        tx.send(PointerSample::Over { u: 0.2, v: 0.5 }).unwrap();
        tx.send(PointerSample::Over { u: 0.8, v: 0.5 }).unwrap();
        let hand = det.detect(&cam.read_frame().unwrap()).remove(0);
        let (x, _) = hand.landmark(WRIST).unwrap().to_pixels(640, 480);
        assert!((x - 512).abs() < 15, "x = {}", x);
    }

    #[test]
    fn keeps_producing_frames_after_window_closes() {
        let (tx, rx) = mpsc::channel::<PointerSample>();
        let mut cam = SimCamera::new(rx);
        drop(tx);
        assert!(cam.read_frame().is_some());
    }

    #[test]
    fn hand_at_edge_is_clipped() {
        let (tx, rx) = mpsc::channel();
        let mut cam = SimCamera::new(rx);
        tx.send(PointerSample::Over { u: 0.0, v: 0.0 }).unwrap();
        let frame = cam.read_frame().unwrap();
        assert_eq!(frame.pixels().len(), 640 * 480);
    }

    #[cfg(not(feature = "camera"))]
    #[test]
    fn device_needs_the_camera_feature() {
        let (_tx, rx) = mpsc::channel();
        let err = open_camera(&CameraSource::Device { index: 0, mirror: true }, rx).err();
        assert!(matches!(err, Some(AppError::Camera(_))));
    }
}
