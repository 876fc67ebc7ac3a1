//! Frame composition.
//!
//! [`Renderer::render`] is a pure function of the [`Scene`]: it reads the
//! simulation state, the latest camera frame and the gesture reading, and
//! paints everything into its own [`Canvas`].  Nothing here mutates game
//! state or touches the window.

use std::time::Duration;

use hand_gesture::{CameraFrame, GestureReading};
use snake_sim::{Direction, Grid, SimulationState};

use crate::canvas::{text_height, text_width, Canvas};

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

pub const BG:          u32 = 0xFF0F_0F19;
pub const GRID_LINE:   u32 = 0xFF1E_1E28;
pub const SNAKE:       u32 = 0xFF00_FF64;
pub const HEAD:        u32 = 0xFF00_FF96;
pub const FOOD:        u32 = 0xFFFF_3232;
pub const TEXT:        u32 = 0xFFDC_DCDC;
pub const ACCENT:      u32 = 0xFF50_C8FF;
pub const PANEL:       u32 = 0xFF19_1923;
pub const BOX:         u32 = 0xFF28_283C;
pub const EYE:         u32 = 0xFF00_0000;
pub const WHITE:       u32 = 0xFFFF_FFFF;
pub const WARN:        u32 = 0xFFFF_0000;
pub const GUIDE:       u32 = 0xFF00_FF00;
pub const LANDMARK:    u32 = 0xFFFF_0000;
pub const REFERENCE:   u32 = 0xFFFF_FF00;
const NO_SIGNAL:       u32 = 0xFF0A_0A12;

// ════════════════════════════════════════════════════════════════════════════
// Layout
// ════════════════════════════════════════════════════════════════════════════

pub const PANEL_W:    i32 = 400;
pub const MIN_HEIGHT: i32 = 700;

const CAMERA_W:   i32 = 360;
const CAMERA_H:   i32 = 270;
const CAMERA_Y:   i32 = 290;
const CONTROLS_Y: i32 = 580;

/// Camera frame pixels kept clear around the guide rectangle.
const GUIDE_INSET: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && y >= self.y as f32
            && x < (self.x + self.w) as f32
            && y < (self.y + self.h) as f32
    }

    /// `(x, y)` relative to this rectangle, both in `[0, 1)`; `None` outside.
    pub fn normalize(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        if !self.contains(x, y) {
            return None;
        }
        Some(((x - self.x as f32) / self.w as f32, (y - self.y as f32) / self.h as f32))
    }
}

/// Window geometry derived from the grid: play area on the left, a fixed
/// width info panel on the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub width:  usize,
    pub height: usize,
    pub play:   Rect,
    pub panel:  Rect,
    pub camera: Rect,
}

impl Layout {
    pub fn for_grid(grid: &Grid) -> Self {
        let play_w = grid.pixel_width();
        let height = grid.pixel_height().max(MIN_HEIGHT);
        Layout {
            width:  (play_w + PANEL_W) as usize,
            height: height as usize,
            play:   Rect::new(0, 0, play_w, grid.pixel_height()),
            panel:  Rect::new(play_w, 0, PANEL_W, height),
            camera: Rect::new(play_w + (PANEL_W - CAMERA_W) / 2, CAMERA_Y, CAMERA_W, CAMERA_H),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scene
// ════════════════════════════════════════════════════════════════════════════

/// Everything one frame is drawn from.
pub struct Scene<'a> {
    pub state:   &'a SimulationState,
    pub grid:    &'a Grid,
    /// Latest camera frame; `None` before the first successful read.
    pub frame:   Option<&'a CameraFrame>,
    pub reading: &'a GestureReading,
    /// Time since start-up, drives the food pulse.
    pub elapsed: Duration,
}

// ════════════════════════════════════════════════════════════════════════════
// Renderer
// ════════════════════════════════════════════════════════════════════════════

pub struct Renderer {
    layout: Layout,
    canvas: Canvas,
}

impl Renderer {
    pub fn new(layout: Layout) -> Self {
        Renderer { layout, canvas: Canvas::new(layout.width, layout.height, BG) }
    }

    pub fn render(&mut self, scene: &Scene<'_>) -> &Canvas {
        self.canvas.clear(BG);
        self.draw_grid(scene.grid);
        self.draw_food(scene);
        self.draw_snake(scene);
        self.draw_panel(scene.state);
        self.draw_camera(scene.frame, scene.reading);
        self.draw_controls();
        if scene.state.is_terminated() {
            self.draw_game_over();
        }
        &self.canvas
    }

    // ── Play area ────────────────────────────────────────────────────────

    fn draw_grid(&mut self, grid: &Grid) {
        let play = self.layout.play;
        let cell = grid.cell_size.max(1) as usize;
        for x in (0..play.w).step_by(cell) {
            self.canvas.fill_rect(x, 0, 1, play.h, GRID_LINE);
        }
        for y in (0..play.h).step_by(cell) {
            self.canvas.fill_rect(0, y, play.w, 1, GRID_LINE);
        }
    }

    fn draw_food(&mut self, scene: &Scene<'_>) {
        let cell = scene.grid.cell_size;
        let (fx, fy) = scene.state.food().to_pixels(cell);
        let cx = (fx + cell / 2) as f32;
        let cy = (fy + cell / 2) as f32;

        let radius = food_radius(cell, scene.elapsed);
        for (i, alpha) in [100u8, 70, 40].into_iter().enumerate() {
            let glow = radius + ((3 - i) * 2) as f32;
            self.canvas.blend_circle(cx, cy, glow, FOOD, alpha);
        }
        self.canvas.fill_circle(cx, cy, radius, FOOD);
    }

    fn draw_snake(&mut self, scene: &Scene<'_>) {
        let cell = scene.grid.cell_size;
        for (i, seg) in scene.state.body().iter().enumerate() {
            let (px, py) = seg.to_pixels(cell);
            if i == 0 {
                self.canvas.fill_round_rect(px, py, cell, cell, 5, HEAD);
                for (ex, ey) in eye_offsets(scene.state.direction(), cell) {
                    self.canvas.fill_circle((px + ex) as f32, (py + ey) as f32, 4.0, EYE);
                }
            } else {
                self.canvas.fill_round_rect(px, py, cell, cell, 4, SNAKE);
                self.canvas.fill_round_rect(px + 4, py + 4, cell - 8, cell - 8, 3, body_shade(i));
            }
        }
    }

    fn draw_game_over(&mut self) {
        let play = self.layout.play;
        self.canvas.blend_rect(play.x, play.y, play.w, play.h, EYE, 180);

        let title = "GAME OVER!";
        let tw = text_width(title, 10);
        let th = text_height(10);
        let tx = play.x + (play.w - tw) / 2;
        let ty = play.y + (play.h - th) / 2 - 30;

        // Widest ring first.
        for i in (2..=10).rev().step_by(2) {
            self.canvas.blend_round_rect(
                tx - 10 - i,
                ty - 10 - i,
                tw + 20 + 2 * i,
                th + 20 + 2 * i,
                12,
                FOOD,
                (i * 10) as u8,
            );
        }
        self.canvas.draw_text(title, tx, ty, 10, FOOD);

        let prompt = "Press R to restart or ESC to quit";
        let pw = text_width(prompt, 3);
        self.canvas.draw_text(prompt, play.x + (play.w - pw) / 2, ty + th + 50, 3, TEXT);
    }

    // ── Info panel ───────────────────────────────────────────────────────

    fn draw_panel(&mut self, state: &SimulationState) {
        let panel = self.layout.panel;
        self.canvas.fill_rect(panel.x, panel.y, panel.w, panel.h, PANEL);
        self.canvas.fill_rect(panel.x, panel.y, 3, panel.h, ACCENT);

        let cx = panel.x + panel.w / 2;
        self.centered("SNAKE GAME", cx, 24, 4, ACCENT);
        self.centered("with Hand Tracking", cx, 64, 2, TEXT);

        self.info_box(&format!("Score: {}", state.score()), cx, 100);
        self.info_box(&format!("Direction: {}", state.direction().label()), cx, 160);
        self.centered(&format!("Speed: {:.1}", state.speed()), cx, 224, 2, TEXT);
    }

    fn info_box(&mut self, text: &str, cx: i32, y: i32) {
        self.canvas.fill_round_rect(cx - 110, y, 220, 50, 10, BOX);
        self.canvas.draw_round_border(cx - 110, y, 220, 50, 10, 2, ACCENT);
        self.centered(text, cx, y + (50 - text_height(2)) / 2, 2, TEXT);
    }

    fn draw_controls(&mut self) {
        let x = self.layout.panel.x + 20;
        self.canvas.draw_text("Controls:", x, CONTROLS_Y, 2, ACCENT);
        let lines = [
            "• Move hand LEFT/RIGHT/UP/DOWN",
            "• Arrow keys also steer",
            "• R restarts after game over",
            "• ESC quits",
        ];
        for (i, line) in lines.iter().enumerate() {
            self.canvas.draw_text(line, x, CONTROLS_Y + 24 + i as i32 * 22, 2, TEXT);
        }
    }

    // ── Camera panel ─────────────────────────────────────────────────────

    fn draw_camera(&mut self, frame: Option<&CameraFrame>, reading: &GestureReading) {
        let cam = self.layout.camera;
        self.centered("Hand Tracking Camera", cam.x + cam.w / 2, cam.y - 24, 2, ACCENT);
        self.canvas.draw_border(cam.x - 3, cam.y - 3, cam.w + 6, cam.h + 6, 3, ACCENT);

        let Some(frame) = frame.filter(|f| f.width() > 0 && f.height() > 0) else {
            self.canvas.fill_rect(cam.x, cam.y, cam.w, cam.h, NO_SIGNAL);
            self.centered("Waiting for camera...", cam.x + cam.w / 2, cam.y + cam.h / 2 - 7, 2, TEXT);
            return;
        };
        self.canvas.blit_scaled(frame, cam.x, cam.y, cam.w, cam.h);

        let sx = cam.w as f32 / frame.width() as f32;
        let sy = cam.h as f32 / frame.height() as f32;
        let map = |(x, y): (i32, i32)| (cam.x as f32 + x as f32 * sx, cam.y as f32 + y as f32 * sy);

        let gx = (GUIDE_INSET * sx) as i32;
        let gy = (GUIDE_INSET * sy) as i32;
        self.canvas.draw_border(cam.x + gx, cam.y + gy, cam.w - 2 * gx, cam.h - 2 * gy, 2, GUIDE);

        for &lm in &reading.landmarks {
            let (x, y) = map(lm);
            self.canvas.fill_circle(x, y, 3.0, LANDMARK);
        }
        if let Some(reference) = reading.reference {
            let (x, y) = map(reference);
            self.canvas.fill_circle(x, y, 6.0, REFERENCE);
        }

        if let Some(dir) = reading.candidate {
            let label = dir.label();
            let tw = text_width(label, 5);
            let th = text_height(5);
            let tx = cam.x + (cam.w - tw) / 2;
            let ty = cam.y + (cam.h - th) / 2;
            self.canvas.blend_rect(tx - 10, ty - 10, tw + 20, th + 20, EYE, 128);
            self.canvas.draw_text(label, tx, ty, 5, GUIDE);
        }

        let (caption, color) = if reading.hand_detected() {
            ("Move hand to control snake", WHITE)
        } else {
            ("No hand detected", WARN)
        };
        self.canvas.draw_text(caption, cam.x + 8, cam.y + 8, 2, color);
    }

    fn centered(&mut self, text: &str, cx: i32, y: i32, scale: i32, color: u32) {
        let w = text_width(text, scale);
        self.canvas.draw_text(text, cx - w / 2, y, scale, color);
    }
}

/// Food disc radius at `elapsed`: half a cell plus up to 2 px of pulse.
pub fn food_radius(cell: i32, elapsed: Duration) -> f32 {
    let t = elapsed.as_millis() as f32;
    let pulse = ((t * 0.01).sin() + 1.0) * 10.0;
    (cell / 2) as f32 + pulse / 10.0
}

/// Eye centres relative to the head cell's top-left, on the side facing
/// `direction`.
pub fn eye_offsets(direction: Direction, cell: i32) -> [(i32, i32); 2] {
    let near = 7;
    let far = cell - 7;
    match direction {
        Direction::Right => [(far, near), (far, far)],
        Direction::Left  => [(near, near), (near, far)],
        Direction::Up    => [(near, near), (far, near)],
        Direction::Down  => [(near, far), (far, far)],
    }
}

/// Inner colour of body segment `index`; darkens toward the tail.
pub fn body_shade(index: usize) -> u32 {
    let g = 200i64.saturating_sub(3 * index as i64).max(80) as u32;
    0xFF00_0000 | (g << 8) | 80
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_sim::{SnakeSimulation, StepOutcome};

    fn render(sim: &SnakeSimulation, frame: Option<&CameraFrame>, reading: &GestureReading) -> Canvas {
        let mut r = Renderer::new(Layout::for_grid(sim.grid()));
        let scene = Scene {
            state: sim.state(),
            grid: sim.grid(),
            frame,
            reading,
            elapsed: Duration::from_millis(1234),
        };
        r.render(&scene);
        r.canvas
    }

    fn in_play_area(c: &Canvas, play: Rect) -> impl Iterator<Item = u32> + '_ {
        (play.y..play.y + play.h)
            .flat_map(move |y| (play.x..play.x + play.w).map(move |x| (x, y)))
            .filter_map(move |(x, y)| c.pixel(x, y))
    }

    #[test]
    fn default_layout_matches_window() {
        let l = Layout::for_grid(&Grid::default());
        assert_eq!((l.width, l.height), (1200, 700));
        assert_eq!(l.play, Rect::new(0, 0, 800, 700));
        assert!(l.camera.x >= l.panel.x && l.camera.x + l.camera.w <= l.panel.x + l.panel.w);
        assert!(l.camera.y + l.camera.h < CONTROLS_Y);
        // Last legend line ends inside the window.
        assert!(CONTROLS_Y + 24 + 3 * 22 + text_height(2) <= l.height as i32);
    }

    #[test]
    fn rect_normalize() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.normalize(10.0, 20.0), Some((0.0, 0.0)));
        assert_eq!(r.normalize(60.0, 45.0), Some((0.5, 0.5)));
        assert_eq!(r.normalize(110.0, 45.0), None);
        assert_eq!(r.normalize(9.0, 45.0), None);
    }

    #[test]
    fn eyes_face_the_heading() {
        assert_eq!(eye_offsets(Direction::Right, 25), [(18, 7), (18, 18)]);
        assert_eq!(eye_offsets(Direction::Up, 25), [(7, 7), (18, 7)]);

        let sim = SnakeSimulation::seeded(Grid::default(), 3).unwrap();
        let c = render(&sim, None, &GestureReading::default());
        // Head at cell (4, 4), heading right.
        assert_eq!(c.pixel(100 + 18, 100 + 7), Some(EYE));
        assert_eq!(c.pixel(100 + 18, 100 + 18), Some(EYE));
        assert_eq!(c.pixel(100 + 7, 100 + 7), Some(HEAD));
    }

    #[test]
    fn body_shade_bottoms_out() {
        assert_eq!(body_shade(1), 0xFF00_C550);
        assert_eq!(body_shade(40), 0xFF00_5050);
        assert_eq!(body_shade(1000), 0xFF00_5050);
    }

    #[test]
    fn food_pulses_within_two_pixels() {
        for ms in (0..2000).step_by(37) {
            let r = food_radius(25, Duration::from_millis(ms));
            assert!((12.0..=14.0).contains(&r), "radius {} at {} ms", r, ms);
        }
    }

    #[test]
    fn game_over_dims_the_play_area() {
        let mut sim = SnakeSimulation::seeded(Grid::default(), 11).unwrap();
        let play = Layout::for_grid(sim.grid()).play;

        let running = render(&sim, None, &GestureReading::default());
        assert!(in_play_area(&running, play).any(|px| px == BG));

        let mut outcome = StepOutcome::Moved;
        for _ in 0..40 {
            outcome = sim.step(Direction::Right).unwrap();
            if sim.state().is_terminated() {
                break;
            }
        }
        assert!(matches!(outcome, StepOutcome::Collided(_)));

        let over = render(&sim, None, &GestureReading::default());
        assert!(in_play_area(&over, play).all(|px| px != BG));
        // The panel is not covered.
        assert_eq!(over.pixel(play.w + 1, 5), Some(ACCENT));
    }

    #[test]
    fn caption_reflects_hand_presence() {
        let sim = SnakeSimulation::seeded(Grid::default(), 5).unwrap();
        let cam = Layout::for_grid(sim.grid()).camera;
        let frame = CameraFrame::filled(640, 480, 0xFF20_2020);

        let none = render(&sim, Some(&frame), &GestureReading::default());
        // Top-left ink of 'N'.
        assert_eq!(none.pixel(cam.x + 8, cam.y + 8), Some(WARN));

        let seen = GestureReading {
            landmarks: vec![(320, 240)],
            reference: Some((320, 240)),
            ..GestureReading::default()
        };
        let c = render(&sim, Some(&frame), &seen);
        assert_eq!(c.pixel(cam.x + 8, cam.y + 8), Some(WHITE));
        // Reference marker at the panel centre.
        assert_eq!(c.pixel(cam.x + cam.w / 2, cam.y + cam.h / 2), Some(REFERENCE));
    }

    #[test]
    fn camera_title_uses_accent() {
        let sim = SnakeSimulation::seeded(Grid::default(), 5).unwrap();
        let cam = Layout::for_grid(sim.grid()).camera;
        let c = render(&sim, None, &GestureReading::default());
        let left = cam.x + cam.w / 2 - text_width("Hand Tracking Camera", 2) / 2;
        // Top-left ink of 'H'.
        assert_eq!(c.pixel(left, cam.y - 24), Some(ACCENT));
    }

    #[test]
    fn placeholder_without_frame() {
        let sim = SnakeSimulation::seeded(Grid::default(), 5).unwrap();
        let cam = Layout::for_grid(sim.grid()).camera;
        let c = render(&sim, None, &GestureReading::default());
        assert_eq!(c.pixel(cam.x + 1, cam.y + 1), Some(NO_SIGNAL));
    }
}
