//! # snake_sim
//!
//! Discrete-time snake on a fixed cell grid.
//!
//! * [`SnakeSimulation`] owns the [`SimulationState`] and advances it one
//!   cell per tick.  The transition itself is the free function [`advance`],
//!   which takes the state by value and hands back the next one.
//! * [`InputArbiter`] folds keyboard and gesture requests into the single
//!   pending direction fed to the next step, refusing 180° reversals.
//!
//! ## Quick start
//!
//! ```rust
//! use snake_sim::{Direction, Grid, SnakeSimulation, StepOutcome};
//!
//! let mut sim = SnakeSimulation::seeded(Grid::default(), 7).unwrap();
//! let outcome = sim.step(Direction::Down).unwrap();
//! assert!(matches!(outcome, StepOutcome::Moved | StepOutcome::Ate { .. }));
//! assert_eq!(sim.state().direction(), Direction::Down);
//! ```

pub mod arbiter;
pub mod geometry;
pub mod sim;

pub use arbiter::{InputArbiter, RequestSource};
pub use geometry::{Direction, Grid, Position};
pub use sim::{
    advance, spawn_food, Collision, Phase, SimulationState, SnakeSimulation, StepOutcome,
    INITIAL_SPEED, MAX_SPEED, SCORE_PER_FOOD, SPEED_INCREMENT,
};

use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// SimError
// ════════════════════════════════════════════════════════════════════════════

/// Failures of the simulation itself.  A collision is *not* an error; it is
/// the [`Phase::Terminated`] state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("grid {cols}x{rows} cannot hold the starting snake")]
    InvalidGrid { cols: i32, rows: i32 },

    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(i32),

    #[error("no free cell for food after {attempts} draws ({occupied} of {cells} cells occupied)")]
    FoodPlacement {
        attempts: usize,
        occupied: usize,
        cells:    usize,
    },
}
