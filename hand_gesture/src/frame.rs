//! Camera image container shared by the camera backends, the detector and
//! the renderer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame {width}x{height} needs {expected} pixels, got {actual}")]
    SizeMismatch {
        width:    usize,
        height:   usize,
        expected: usize,
        actual:   usize,
    },
}

/// Row-major `0xAARRGGBB` pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraFrame {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
}

impl CameraFrame {
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        CameraFrame { width, height, pixels: vec![color; width * height] }
    }

    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u32>) -> Result<Self, FrameError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(FrameError::SizeMismatch { width, height, expected, actual: pixels.len() });
        }
        Ok(CameraFrame { width, height, pixels })
    }

    pub fn width(&self) -> usize  { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn pixels(&self) -> &[u32] { &self.pixels }

    /// Pixel at `(x, y)`; `None` outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Flip left/right in place so the picture reads like a mirror.
    pub fn mirror_horizontal(&mut self) {
        for row in self.pixels.chunks_mut(self.width.max(1)) {
            row.reverse();
        }
    }
}

/// Split `0xAARRGGBB` into `(r, g, b)`.
pub fn rgb(pixel: u32) -> (u8, u8, u8) {
    (((pixel >> 16) & 0xFF) as u8, ((pixel >> 8) & 0xFF) as u8, (pixel & 0xFF) as u8)
}

/// Pack an opaque colour.
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_checked() {
        assert!(CameraFrame::from_pixels(2, 2, vec![0; 4]).is_ok());
        assert_eq!(
            CameraFrame::from_pixels(2, 2, vec![0; 3]),
            Err(FrameError::SizeMismatch { width: 2, height: 2, expected: 4, actual: 3 })
        );
    }

    #[test]
    fn mirror_flips_rows() {
        let mut f = CameraFrame::from_pixels(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        f.mirror_horizontal();
        assert_eq!(f.pixels(), &[3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn pixel_access_is_bounded() {
        let mut f = CameraFrame::filled(4, 3, 0);
        f.set_pixel(3, 2, 7);
        f.set_pixel(4, 2, 9);
        assert_eq!(f.pixel(3, 2), Some(7));
        assert_eq!(f.pixel(4, 2), None);
    }

    #[test]
    fn channel_packing() {
        let c = pack_rgb(224, 172, 140);
        assert_eq!(c >> 24, 0xFF);
        assert_eq!(rgb(c), (224, 172, 140));
    }
}
