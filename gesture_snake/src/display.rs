//! Window output and keyboard/mouse input.
//!
//! The window never calls into the game directly.  Key presses are
//! translated into [`InputEvent`]s and pushed onto a channel that the game
//! loop drains once per tick; the mouse position over the camera panel goes
//! to the simulated camera the same way.
//!
//! Input is harvested after *every* platform poll, both the explicit one in
//! [`Display::pump_events`] and the implicit one inside
//! [`Display::present`], so a press is neither lost nor held back a tick.

use std::sync::mpsc::Sender;

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use snake_sim::Direction;

use crate::camera::PointerSample;
use crate::canvas::Canvas;
use crate::render::Layout;
use crate::AppError;

pub const WINDOW_TITLE: &str = "Snake Game with Hand Tracking";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed.
    Quit,
    Escape,
    Arrow(Direction),
    Restart,
}

pub trait Display {
    fn is_open(&self) -> bool;
    /// Poll the platform and queue whatever input arrived since last time.
    fn pump_events(&mut self);
    fn present(&mut self, canvas: &Canvas) -> Result<(), AppError>;
}

// ════════════════════════════════════════════════════════════════════════════
// Surface
// ════════════════════════════════════════════════════════════════════════════

/// The platform side of a window, as far as the game needs it.
///
/// Key state only changes inside `poll` and `blit`; `key_pressed` reports
/// keys that went down during the most recent of those calls.
pub trait Surface {
    fn is_open(&self) -> bool;
    fn poll(&mut self);
    /// Show `canvas`; polls the platform as a side effect.
    fn blit(&mut self, canvas: &Canvas) -> Result<(), AppError>;
    fn key_pressed(&self, key: Key) -> bool;
    fn mouse_pos(&self) -> Option<(f32, f32)>;
}

impl Surface for Window {
    fn is_open(&self) -> bool { Window::is_open(self) }

    fn poll(&mut self) {
        self.update();
    }

    fn blit(&mut self, canvas: &Canvas) -> Result<(), AppError> {
        self.update_with_buffer(canvas.pixels(), canvas.width(), canvas.height())
            .map_err(|e| AppError::Display(e.to_string()))
    }

    fn key_pressed(&self, key: Key) -> bool {
        self.is_key_pressed(key, KeyRepeat::No)
    }

    fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.get_mouse_pos(MouseMode::Discard)
    }
}

const ARROWS: [(Key, Direction); 4] = [
    (Key::Up, Direction::Up),
    (Key::Down, Direction::Down),
    (Key::Left, Direction::Left),
    (Key::Right, Direction::Right),
];

/// Events for the keys `pressed` reports, in a fixed order.
pub fn key_events(pressed: impl Fn(Key) -> bool) -> Vec<InputEvent> {
    let mut events = Vec::new();
    if pressed(Key::Escape) {
        events.push(InputEvent::Escape);
    }
    for (key, dir) in ARROWS {
        if pressed(key) {
            events.push(InputEvent::Arrow(dir));
        }
    }
    if pressed(Key::R) {
        events.push(InputEvent::Restart);
    }
    events
}

// ════════════════════════════════════════════════════════════════════════════
// WindowDisplay
// ════════════════════════════════════════════════════════════════════════════

pub struct WindowDisplay<S = Window> {
    surface:  S,
    layout:   Layout,
    events:   Sender<InputEvent>,
    pointer:  Option<Sender<PointerSample>>,
    was_open: bool,
}

impl WindowDisplay<Window> {
    pub fn open(
        layout: Layout,
        events: Sender<InputEvent>,
        pointer: Option<Sender<PointerSample>>,
    ) -> Result<Self, AppError> {
        let window = Window::new(
            WINDOW_TITLE,
            layout.width,
            layout.height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| AppError::Display(e.to_string()))?;

        Ok(Self::with_surface(window, layout, events, pointer))
    }
}

impl<S: Surface> WindowDisplay<S> {
    pub fn with_surface(
        surface: S,
        layout: Layout,
        events: Sender<InputEvent>,
        pointer: Option<Sender<PointerSample>>,
    ) -> Self {
        WindowDisplay { surface, layout, events, pointer, was_open: true }
    }

    /// Forward whatever the last platform poll saw.
    fn harvest(&mut self) {
        if !self.surface.is_open() {
            if self.was_open {
                self.was_open = false;
                // The loop owns the receiver; if it is gone there is nobody to tell.
                let _ = self.events.send(InputEvent::Quit);
            }
            return;
        }
        for event in key_events(|k| self.surface.key_pressed(k)) {
            let _ = self.events.send(event);
        }
        if let Some(tx) = &self.pointer {
            let sample = self
                .surface
                .mouse_pos()
                .and_then(|(x, y)| self.layout.camera.normalize(x, y))
                .map_or(PointerSample::Away, |(u, v)| PointerSample::Over { u, v });
            let _ = tx.send(sample);
        }
    }
}

impl<S: Surface> Display for WindowDisplay<S> {
    fn is_open(&self) -> bool { self.surface.is_open() }

    fn pump_events(&mut self) {
        self.surface.poll();
        self.harvest();
    }

    fn present(&mut self, canvas: &Canvas) -> Result<(), AppError> {
        self.surface.blit(canvas)?;
        self.harvest();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_sim::Grid;
    use std::sync::mpsc::{self, Receiver};

    /// Keys typed between polls become "pressed" at the next poll or blit,
    /// and stay pressed for that one poll only.
    #[derive(Default)]
    struct FakeSurface {
        typed:   Vec<Key>,
        pressed: Vec<Key>,
        mouse:   Option<(f32, f32)>,
        closed:  bool,
        polls:   usize,
    }

    impl FakeSurface {
        fn latch(&mut self) {
            self.polls += 1;
            self.pressed = std::mem::take(&mut self.typed);
        }
    }

    impl Surface for FakeSurface {
        fn is_open(&self) -> bool { !self.closed }
        fn poll(&mut self) { self.latch(); }
        fn blit(&mut self, _canvas: &Canvas) -> Result<(), AppError> {
            self.latch();
            Ok(())
        }
        fn key_pressed(&self, key: Key) -> bool { self.pressed.contains(&key) }
        fn mouse_pos(&self) -> Option<(f32, f32)> { self.mouse }
    }

    fn display() -> (WindowDisplay<FakeSurface>, Receiver<InputEvent>, Receiver<PointerSample>) {
        let (tx, rx) = mpsc::channel();
        let (ptx, prx) = mpsc::channel();
        let layout = Layout::for_grid(&Grid::default());
        (WindowDisplay::with_surface(FakeSurface::default(), layout, tx, Some(ptx)), rx, prx)
    }

    fn canvas() -> Canvas {
        Canvas::new(4, 4, 0)
    }

    #[test]
    fn key_typed_after_present_is_seen_by_the_next_pump() {
        let (mut d, rx, _prx) = display();
        d.present(&canvas()).unwrap();
        // Typed while the loop sleeps between ticks.
        d.surface.typed.push(Key::Up);
        d.pump_events();
        assert_eq!(rx.try_recv(), Ok(InputEvent::Arrow(Direction::Up)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn key_typed_during_the_tick_is_kept_by_present() {
        let (mut d, rx, _prx) = display();
        d.pump_events();
        d.surface.typed.push(Key::Down);
        d.present(&canvas()).unwrap();
        d.pump_events();
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![InputEvent::Arrow(Direction::Down)]);
    }

    #[test]
    fn every_pump_polls_the_platform() {
        let (mut d, _rx, _prx) = display();
        d.pump_events();
        d.present(&canvas()).unwrap();
        d.pump_events();
        assert_eq!(d.surface.polls, 3);
    }

    #[test]
    fn close_is_reported_once() {
        let (mut d, rx, _prx) = display();
        d.surface.closed = true;
        d.pump_events();
        d.pump_events();
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![InputEvent::Quit]);
        assert!(!d.is_open());
    }

    #[test]
    fn pointer_over_camera_panel_is_normalised() {
        let (mut d, _rx, prx) = display();
        let cam = d.layout.camera;
        d.surface.mouse = Some(((cam.x + cam.w / 2) as f32, (cam.y + cam.h / 2) as f32));
        d.pump_events();
        d.surface.mouse = Some((10.0, 10.0));
        d.pump_events();
        assert_eq!(prx.try_recv(), Ok(PointerSample::Over { u: 0.5, v: 0.5 }));
        assert_eq!(prx.try_recv(), Ok(PointerSample::Away));
    }

    #[test]
    fn key_order_is_fixed() {
        let all = key_events(|_| true);
        assert_eq!(all.first(), Some(&InputEvent::Escape));
        assert_eq!(all.last(), Some(&InputEvent::Restart));
        assert_eq!(all.len(), 6);
        assert!(key_events(|_| false).is_empty());
    }
}
