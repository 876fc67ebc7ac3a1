//! Software framebuffer with the handful of primitives the renderer needs.
//!
//! Coordinates are signed so shapes may hang off any edge; everything is
//! clipped per pixel.  Colours are `0xAARRGGBB` with the alpha byte ignored
//! on output; translucency is passed explicitly as an `alpha` argument.

use hand_gesture::CameraFrame;

pub struct Canvas {
    width:  usize,
    height: usize,
    buf:    Vec<u32>,
}

impl Canvas {
    pub fn new(width: usize, height: usize, color: u32) -> Self {
        Canvas { width, height, buf: vec![color; width * height] }
    }

    pub fn width(&self) -> usize   { self.width }
    pub fn height(&self) -> usize  { self.height }
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.buf[i])
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    // ── Pixels ───────────────────────────────────────────────────────────

    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.buf[i] = color;
        }
    }

    /// Composite `color` over the existing pixel; `alpha` 255 = opaque.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: u32, alpha: u8) {
        if let Some(i) = self.index(x, y) {
            self.buf[i] = if alpha == 255 {
                color
            } else {
                blend(self.buf[i], color, alpha as f32 / 255.0)
            };
        }
    }

    // ── Rectangles ───────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        self.blend_rect(x, y, w, h, color, 255);
    }

    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32, alpha: u8) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for row in y0..y1 {
            for col in x0..x1 {
                self.blend_pixel(col, row, color, alpha);
            }
        }
    }

    /// Rectangle outline `thickness` pixels wide, drawn inward.
    pub fn draw_border(&mut self, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: u32) {
        let t = thickness.max(1);
        self.fill_rect(x, y, w, t, color);
        self.fill_rect(x, y + h - t, w, t, color);
        self.fill_rect(x, y + t, t, h - 2 * t, color);
        self.fill_rect(x + w - t, y + t, t, h - 2 * t, color);
    }

    pub fn fill_round_rect(&mut self, x: i32, y: i32, w: i32, h: i32, radius: i32, color: u32) {
        self.blend_round_rect(x, y, w, h, radius, color, 255);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn blend_round_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        radius: i32,
        color: u32,
        alpha: u8,
    ) {
        let r = radius.clamp(0, w.min(h) / 2);
        for row in 0..h {
            for col in 0..w {
                if r > 0 && outside_corner(col, row, w, h, r) {
                    continue;
                }
                self.blend_pixel(x + col, y + row, color, alpha);
            }
        }
    }

    /// Rounded outline, `thickness` pixels wide.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_round_border(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        radius: i32,
        thickness: i32,
        color: u32,
    ) {
        let r = radius.clamp(0, w.min(h) / 2);
        let t = thickness.max(1);
        let ir = (r - t).max(0);
        for row in 0..h {
            for col in 0..w {
                if r > 0 && outside_corner(col, row, w, h, r) {
                    continue;
                }
                let inner = col >= t && row >= t && col < w - t && row < h - t
                    && !(ir > 0 && outside_corner(col - t, row - t, w - 2 * t, h - 2 * t, ir));
                if !inner {
                    self.set_pixel(x + col, y + row, color);
                }
            }
        }
    }

    // ── Circles ──────────────────────────────────────────────────────────

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: u32) {
        self.blend_circle(cx, cy, radius, color, 255);
    }

    pub fn blend_circle(&mut self, cx: f32, cy: f32, radius: f32, color: u32, alpha: u8) {
        if radius <= 0.0 {
            return;
        }
        let r2 = radius * radius;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;
        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y, color, alpha);
                }
            }
        }
    }

    // ── Images ───────────────────────────────────────────────────────────

    /// Nearest-neighbour scale of `frame` into the `w × h` box at `(x, y)`.
    pub fn blit_scaled(&mut self, frame: &CameraFrame, x: i32, y: i32, w: i32, h: i32) {
        if w <= 0 || h <= 0 || frame.width() == 0 || frame.height() == 0 {
            return;
        }
        for row in 0..h {
            let sy = row as usize * frame.height() / h as usize;
            for col in 0..w {
                let sx = col as usize * frame.width() / w as usize;
                if let Some(px) = frame.pixel(sx, sy) {
                    self.set_pixel(x + col, y + row, px);
                }
            }
        }
    }

    // ── Text ─────────────────────────────────────────────────────────────

    /// Draw `text` with the built-in 5×7 font, each font pixel a
    /// `scale × scale` block.  `(x, y)` is the top-left corner.
    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: i32, color: u32) {
        let s = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = glyph(ch);
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                        self.fill_rect(cx + col * s, y + row as i32 * s, s, s, color);
                    }
                }
            }
            cx += advance(s);
        }
    }
}

/// True when `(col, row)` of a `w × h` box lies outside its rounded corners.
fn outside_corner(col: i32, row: i32, w: i32, h: i32, r: i32) -> bool {
    let cx = if col < r { r } else if col >= w - r { w - r - 1 } else { return false };
    let cy = if row < r { r } else if row >= h - r { h - r - 1 } else { return false };
    let dx = col - cx;
    let dy = row - cy;
    dx * dx + dy * dy > r * r
}

/// Alpha-blend two ARGB colours. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        ((ca * (1.0 - t) + cb * t).round() as u32) << shift
    };
    0xFF00_0000 | mix(16) | mix(8) | mix(0)
}

// ────────────────────────────────────────────────────────────────────────────
// 5×7 bitmap font
// ────────────────────────────────────────────────────────────────────────────

pub const GLYPH_W: i32 = 5;
pub const GLYPH_H: i32 = 7;

/// Horizontal distance between glyph origins at `scale`.
pub fn advance(scale: i32) -> i32 {
    (GLYPH_W + 1) * scale.max(1)
}

/// Pixel width of `text` at `scale`, without trailing spacing.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { n * advance(scale) - scale.max(1) }
}

pub fn text_height(scale: i32) -> i32 {
    GLYPH_H * scale.max(1)
}

/// Rows top to bottom, bit 4 = leftmost column.  Letters are upper case
/// only; lower case maps onto them.
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ' ' => [0; 7],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '/' => [0b00000, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b00000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '•' => [0b00000, 0b00000, 0b01110, 0b01110, 0b01110, 0b00000, 0b00000],
        _   => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: u32 = 0xFF00_0000;
    const WHITE: u32 = 0xFFFF_FFFF;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(BLACK, WHITE, 0.0), BLACK);
        assert_eq!(blend(BLACK, WHITE, 1.0), WHITE);
        assert_eq!(blend(BLACK, WHITE, 0.5), 0xFF80_8080);
    }

    #[test]
    fn shapes_clip_at_edges() {
        let mut c = Canvas::new(10, 10, BLACK);
        c.fill_rect(-5, -5, 8, 8, WHITE);
        c.fill_circle(9.5, 9.5, 3.0, WHITE);
        assert_eq!(c.pixel(0, 0), Some(WHITE));
        assert_eq!(c.pixel(2, 2), Some(WHITE));
        assert_eq!(c.pixel(3, 3), Some(BLACK));
        assert_eq!(c.pixel(9, 9), Some(WHITE));
        assert_eq!(c.pixel(10, 10), None);
    }

    #[test]
    fn round_rect_skips_corners() {
        let mut c = Canvas::new(20, 20, BLACK);
        c.fill_round_rect(0, 0, 20, 20, 6, WHITE);
        assert_eq!(c.pixel(0, 0), Some(BLACK));
        assert_eq!(c.pixel(10, 0), Some(WHITE));
        assert_eq!(c.pixel(10, 10), Some(WHITE));
        assert_eq!(c.pixel(19, 19), Some(BLACK));
    }

    #[test]
    fn border_leaves_inside_untouched() {
        let mut c = Canvas::new(10, 10, BLACK);
        c.draw_border(0, 0, 10, 10, 2, WHITE);
        assert_eq!(c.pixel(0, 5), Some(WHITE));
        assert_eq!(c.pixel(1, 5), Some(WHITE));
        assert_eq!(c.pixel(2, 5), Some(BLACK));
        assert_eq!(c.pixel(9, 9), Some(WHITE));
    }

    #[test]
    fn text_metrics_and_ink() {
        assert_eq!(text_width("", 3), 0);
        assert_eq!(text_width("AB", 1), 11);
        assert_eq!(text_height(2), 14);

        let mut c = Canvas::new(40, 10, BLACK);
        c.draw_text("I", 0, 0, 1, WHITE);
        // 'I' top row is .###.
        assert_eq!(c.pixel(0, 0), Some(BLACK));
        assert_eq!(c.pixel(1, 0), Some(WHITE));
        assert_eq!(c.pixel(3, 0), Some(WHITE));
        assert_eq!(c.pixel(4, 0), Some(BLACK));
    }

    #[test]
    fn lower_case_uses_upper_glyphs() {
        assert_eq!(glyph('q'), glyph('Q'));
        assert_ne!(glyph('~'), glyph(' '));
    }

    #[test]
    fn blit_scales_nearest() {
        let frame = CameraFrame::from_pixels(2, 1, vec![WHITE, BLACK]).unwrap();
        let mut c = Canvas::new(4, 2, 0xFF12_3456);
        c.blit_scaled(&frame, 0, 0, 4, 2);
        assert_eq!(c.pixels(), &[WHITE, WHITE, BLACK, BLACK, WHITE, WHITE, BLACK, BLACK]);
    }
}
