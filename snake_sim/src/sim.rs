//! The snake state machine.
//!
//! `Running --step(collision)--> Terminated --reset--> Running`

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::geometry::{Direction, Grid, Position};
use crate::SimError;

// ════════════════════════════════════════════════════════════════════════════
// Rules
// ════════════════════════════════════════════════════════════════════════════

pub const SCORE_PER_FOOD:  u32 = 10;
pub const INITIAL_SPEED:   f32 = 10.0;
pub const SPEED_INCREMENT: f32 = 0.3;
pub const MAX_SPEED:       f32 = 20.0;

/// Head first: pixels (100,100), (75,100), (50,100) at 25 px cells.
const START_BODY: [Position; 3] = [
    Position::new(4, 4),
    Position::new(3, 4),
    Position::new(2, 4),
];
const START_DIRECTION: Direction = Direction::Right;

/// Rejection-sampling budget per grid cell before food placement gives up.
const FOOD_DRAWS_PER_CELL: usize = 64;

// ════════════════════════════════════════════════════════════════════════════
// SimulationState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Terminated,
}

/// Everything the game knows about one round.
///
/// Fields are private: only [`advance`] and [`SnakeSimulation::reset`]
/// produce new states, which keeps the body free of duplicates.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationState {
    body:      VecDeque<Position>,
    food:      Position,
    direction: Direction,
    pending:   Direction,
    score:     u32,
    speed:     f32,
    phase:     Phase,
}

impl SimulationState {
    fn initial(food: Position) -> Self {
        SimulationState {
            body:      START_BODY.iter().copied().collect(),
            food,
            direction: START_DIRECTION,
            pending:   START_DIRECTION,
            score:     0,
            speed:     INITIAL_SPEED,
            phase:     Phase::Running,
        }
    }

    /// Body cells, head first.
    pub fn body(&self) -> &VecDeque<Position> { &self.body }
    pub fn head(&self) -> Position            { self.body[0] }
    pub fn len(&self) -> usize                { self.body.len() }
    pub fn food(&self) -> Position            { self.food }
    pub fn direction(&self) -> Direction      { self.direction }
    pub fn pending(&self) -> Direction        { self.pending }
    pub fn score(&self) -> u32                { self.score }
    /// Ticks per second.
    pub fn speed(&self) -> f32                { self.speed }
    pub fn phase(&self) -> Phase              { self.phase }

    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Step
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    Ate { score: u32 },
    Collided(Collision),
    /// The round was already over; nothing changed.
    AlreadyTerminated,
}

/// Advance `state` by one cell toward `requested`.
///
/// A reversal of the current heading is ignored and the snake keeps going
/// straight.  On a collision the body is left exactly as it was and the
/// phase becomes [`Phase::Terminated`].
pub fn advance<R: Rng>(
    mut state: SimulationState,
    requested: Direction,
    grid: &Grid,
    rng: &mut R,
) -> Result<(SimulationState, StepOutcome), SimError> {
    if state.is_terminated() {
        return Ok((state, StepOutcome::AlreadyTerminated));
    }

    state.pending = requested;
    if !requested.is_opposite(state.direction) {
        state.direction = requested;
    }

    let head = state.head().step(state.direction);
    let collision = if !grid.contains(head) {
        Some(Collision::Wall)
    } else if state.occupies(head) {
        Some(Collision::Body)
    } else {
        None
    };
    if let Some(collision) = collision {
        state.phase = Phase::Terminated;
        info!(score = state.score, length = state.len(), ?collision, "game over");
        return Ok((state, StepOutcome::Collided(collision)));
    }

    state.body.push_front(head);

    if head == state.food {
        state.score += SCORE_PER_FOOD;
        state.speed = (state.speed + SPEED_INCREMENT).min(MAX_SPEED);
        state.food = spawn_food(&state.body, grid, rng)?;
        debug!(score = state.score, speed = state.speed, food = ?state.food, "food eaten");
        let score = state.score;
        return Ok((state, StepOutcome::Ate { score }));
    }

    state.body.pop_back();
    Ok((state, StepOutcome::Moved))
}

/// Pick a uniformly random cell not covered by `body`.
///
/// Requires `body.len() < grid.cell_count()`.  Draws are capped; running out
/// is reported as [`SimError::FoodPlacement`] rather than looping forever.
pub fn spawn_food<R: Rng>(
    body: &VecDeque<Position>,
    grid: &Grid,
    rng: &mut R,
) -> Result<Position, SimError> {
    let cells = grid.cell_count();
    if body.len() >= cells {
        return Err(SimError::FoodPlacement { attempts: 0, occupied: body.len(), cells });
    }

    let attempts = cells * FOOD_DRAWS_PER_CELL;
    for _ in 0..attempts {
        let pos = Position::new(rng.gen_range(0..grid.cols), rng.gen_range(0..grid.rows));
        if !body.contains(&pos) {
            return Ok(pos);
        }
    }
    Err(SimError::FoodPlacement { attempts, occupied: body.len(), cells })
}

// ════════════════════════════════════════════════════════════════════════════
// SnakeSimulation
// ════════════════════════════════════════════════════════════════════════════

/// Owner of the live [`SimulationState`] and the food RNG.
pub struct SnakeSimulation<R = SmallRng> {
    grid:  Grid,
    rng:   R,
    state: SimulationState,
}

impl SnakeSimulation<SmallRng> {
    pub fn new(grid: Grid) -> Result<Self, SimError> {
        Self::with_rng(grid, SmallRng::from_entropy())
    }

    /// Reproducible food placement.
    pub fn seeded(grid: Grid, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(grid, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SnakeSimulation<R> {
    pub fn with_rng(grid: Grid, mut rng: R) -> Result<Self, SimError> {
        validate(&grid)?;
        let state = fresh_state(&grid, &mut rng)?;
        Ok(SnakeSimulation { grid, rng, state })
    }

    pub fn state(&self) -> &SimulationState { &self.state }
    pub fn grid(&self) -> &Grid             { &self.grid }

    /// One tick.  The live state is replaced only when the step succeeds.
    pub fn step(&mut self, requested: Direction) -> Result<StepOutcome, SimError> {
        let (next, outcome) = advance(self.state.clone(), requested, &self.grid, &mut self.rng)?;
        self.state = next;
        Ok(outcome)
    }

    /// Start a new round.  Refused (returns `false`) while still running.
    pub fn reset(&mut self) -> Result<bool, SimError> {
        if !self.state.is_terminated() {
            return Ok(false);
        }
        self.state = fresh_state(&self.grid, &mut self.rng)?;
        info!("round restarted");
        Ok(true)
    }
}

fn validate(grid: &Grid) -> Result<(), SimError> {
    if grid.cell_size <= 0 {
        return Err(SimError::InvalidCellSize(grid.cell_size));
    }
    // Starting snake must fit, with at least one cell left over for food.
    let fits = START_BODY.iter().all(|p| grid.contains(*p));
    if !fits || grid.cell_count() <= START_BODY.len() {
        return Err(SimError::InvalidGrid { cols: grid.cols, rows: grid.rows });
    }
    Ok(())
}

fn fresh_state<R: Rng>(grid: &Grid, rng: &mut R) -> Result<SimulationState, SimError> {
    let body: VecDeque<Position> = START_BODY.iter().copied().collect();
    let food = spawn_food(&body, grid, rng)?;
    Ok(SimulationState::initial(food))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
