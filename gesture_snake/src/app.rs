//! Top-level game loop.
//!
//! `GameLoop` owns the simulation, the input arbiter, the gesture
//! classifier and the three devices (camera, hand detector, display).  One
//! call to [`GameLoop::tick`] is one frame of the game; [`GameLoop::run`]
//! repeats it at the snake's current speed.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use hand_gesture::{
    ClassifierConfig, GestureClassifier, GestureReading, HandDetector, SkinDetector,
    SkinDetectorConfig,
};
use snake_sim::{Direction, Grid, InputArbiter, RequestSource, SimulationState, SnakeSimulation};

use crate::camera::{open_camera, Camera, PointerSample};
use crate::display::{Display, InputEvent, WindowDisplay};
use crate::render::{Layout, Renderer, Scene};
use crate::AppError;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CameraSource {
    /// Mouse-driven procedural frames.
    Simulated,
    /// OpenCV capture device; needs the `camera` feature.
    Device { index: i32, mirror: bool },
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub grid:       Grid,
    pub classifier: ClassifierConfig,
    pub detector:   SkinDetectorConfig,
    pub camera:     CameraSource,
    /// Food placement seed; fresh entropy when `None`.
    pub seed:       Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            grid:       Grid::default(),
            classifier: ClassifierConfig::default(),
            detector:   SkinDetectorConfig::default(),
            camera:     CameraSource::Simulated,
            seed:       None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Pacing
// ════════════════════════════════════════════════════════════════════════════

/// Fixed-rate scheduler whose rate may change between ticks.
#[derive(Debug)]
pub struct Pacer {
    next: Instant,
}

impl Pacer {
    pub fn new(now: Instant) -> Self {
        Pacer { next: now }
    }

    /// How long to sleep at `now` so ticks land `1 / ticks_per_second`
    /// apart.  A tick that ran late resets the schedule instead of bursting
    /// to catch up.
    pub fn delay(&mut self, now: Instant, ticks_per_second: f32) -> Duration {
        let period = Duration::from_secs_f64(1.0 / ticks_per_second.max(1.0) as f64);
        self.next += period;
        if self.next > now {
            self.next - now
        } else {
            self.next = now;
            Duration::ZERO
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GameLoop
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Frame simulated and presented.
    Continue,
    /// Camera read failed; nothing was simulated or drawn.
    Skipped,
    Quit,
}

pub struct GameLoop {
    // ── game ─────────────────────────────────────────────────────────────
    sim:        SnakeSimulation,
    arbiter:    InputArbiter,
    classifier: GestureClassifier,
    reading:    GestureReading,

    // ── devices ──────────────────────────────────────────────────────────
    camera:     Box<dyn Camera>,
    detector:   Box<dyn HandDetector>,
    display:    Box<dyn Display>,
    events:     Receiver<InputEvent>,

    renderer:   Renderer,
    started:    Instant,
    running:    bool,
}

impl GameLoop {
    pub fn new(
        cfg: &AppConfig,
        camera: Box<dyn Camera>,
        detector: Box<dyn HandDetector>,
        display: Box<dyn Display>,
        events: Receiver<InputEvent>,
    ) -> Result<Self, AppError> {
        let sim = match cfg.seed {
            Some(seed) => SnakeSimulation::seeded(cfg.grid, seed)?,
            None => SnakeSimulation::new(cfg.grid)?,
        };
        let now = Instant::now();
        Ok(GameLoop {
            arbiter: InputArbiter::new(sim.state().direction()),
            classifier: GestureClassifier::new(cfg.classifier.clone(), now),
            reading: GestureReading::default(),
            renderer: Renderer::new(Layout::for_grid(&cfg.grid)),
            sim,
            camera,
            detector,
            display,
            events,
            started: now,
            running: true,
        })
    }

    pub fn state(&self) -> &SimulationState { self.sim.state() }
    pub fn reading(&self) -> &GestureReading { &self.reading }
    pub fn pending(&self) -> Direction { self.arbiter.pending() }
    pub fn is_running(&self) -> bool { self.running }

    /// One frame: input, camera, gesture, simulation, render.
    pub fn tick(&mut self) -> Result<TickOutcome, AppError> {
        // 1. Window input
        self.display.pump_events();
        self.drain_events()?;
        if !self.running || !self.display.is_open() {
            self.running = false;
            return Ok(TickOutcome::Quit);
        }

        // 2. Camera
        let Some(frame) = self.camera.read_frame() else {
            debug!("no camera frame, tick skipped");
            return Ok(TickOutcome::Skipped);
        };

        // 3. Gesture
        let hands = self.detector.detect(&frame);
        let current = self.sim.state().direction();
        self.reading = self.classifier.classify(
            &hands,
            frame.width(),
            frame.height(),
            current,
            Instant::now(),
        );
        if let Some(intent) = self.reading.intent {
            self.arbiter.submit(intent.direction, RequestSource::Gesture, current);
        }

        // 4. Simulation
        if !self.sim.state().is_terminated() {
            let heading = self.arbiter.pending();
            trace!(%heading, source = ?self.arbiter.last_source(), "step");
            self.sim.step(heading)?;
        }

        // 5. Render
        let scene = Scene {
            state:   self.sim.state(),
            grid:    self.sim.grid(),
            frame:   Some(&frame),
            reading: &self.reading,
            elapsed: self.started.elapsed(),
        };
        let canvas = self.renderer.render(&scene);
        self.display.present(canvas)?;

        Ok(TickOutcome::Continue)
    }

    /// Tick until the player quits, pacing ticks at the snake's speed.
    pub fn run(&mut self) -> Result<(), AppError> {
        info!(speed = self.sim.state().speed(), "game started");
        let mut pacer = Pacer::new(Instant::now());
        loop {
            match self.tick()? {
                TickOutcome::Quit => break,
                // Retry the camera straight away rather than losing a slot.
                TickOutcome::Skipped => continue,
                TickOutcome::Continue => {}
            }
            let wait = pacer.delay(Instant::now(), self.sim.state().speed());
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }
        info!(score = self.sim.state().score(), "game loop stopped");
        Ok(())
    }

    fn drain_events(&mut self) -> Result<(), AppError> {
        loop {
            match self.events.try_recv() {
                Ok(InputEvent::Quit) | Ok(InputEvent::Escape) => {
                    info!("quit requested");
                    self.running = false;
                }
                Ok(InputEvent::Arrow(dir)) => {
                    let current = self.sim.state().direction();
                    self.arbiter.submit(dir, RequestSource::Keyboard, current);
                }
                Ok(InputEvent::Restart) => {
                    if self.sim.reset()? {
                        self.arbiter.reset(self.sim.state().direction());
                        info!("new game");
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.running = false;
                    break;
                }
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Entry point
// ════════════════════════════════════════════════════════════════════════════

/// Open the devices described by `cfg` and play until the window closes.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let (event_tx, event_rx) = mpsc::channel::<InputEvent>();
    let (pointer_tx, pointer_rx) = mpsc::channel::<PointerSample>();

    // Camera first: a missing device should fail before a window appears.
    let camera = open_camera(&cfg.camera, pointer_rx)?;
    let pointer = match cfg.camera {
        CameraSource::Simulated => Some(pointer_tx),
        CameraSource::Device { .. } => None,
    };
    let display = WindowDisplay::open(Layout::for_grid(&cfg.grid), event_tx, pointer)?;
    let detector = SkinDetector::new(cfg.detector.clone());

    let mut game = GameLoop::new(
        &cfg,
        camera,
        Box::new(detector),
        Box::new(display),
        event_rx,
    )?;
    game.run()
}
