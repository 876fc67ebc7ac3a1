//! Directions, cell positions and board bounds.
//!
//! Positions are kept in cell units.  The renderer and the pixel-based
//! scenarios convert with [`Position::to_pixels`] / [`Position::from_pixels`].

use std::fmt;

use crate::SimError;

// ════════════════════════════════════════════════════════════════════════════
// Direction
// ════════════════════════════════════════════════════════════════════════════

/// Heading of the snake.  Image space: `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up    => Direction::Down,
            Direction::Down  => Direction::Up,
            Direction::Left  => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True when turning from `self` to `other` would be a 180° turn.
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// One-cell offset `(dx, dy)`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up    => (0, -1),
            Direction::Down  => (0, 1),
            Direction::Left  => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Upper-case label used by the panel and the camera overlay.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up    => "UP",
            Direction::Down  => "DOWN",
            Direction::Left  => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Position
// ════════════════════════════════════════════════════════════════════════════

/// A grid cell, in cell units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Cell under a pixel coordinate.  `None` unless the point is non-negative
    /// and sits exactly on a cell corner.
    pub fn from_pixels(px: i32, py: i32, cell_size: i32) -> Option<Self> {
        if cell_size <= 0 || px < 0 || py < 0 {
            return None;
        }
        if px % cell_size != 0 || py % cell_size != 0 {
            return None;
        }
        Some(Position::new(px / cell_size, py / cell_size))
    }

    /// Top-left pixel of this cell.
    pub fn to_pixels(self, cell_size: i32) -> (i32, i32) {
        (self.x * cell_size, self.y * cell_size)
    }

    /// Neighbouring cell in `direction`.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Grid
// ════════════════════════════════════════════════════════════════════════════

/// Board dimensions.  The default is the 800 × 700 px play area cut into
/// 25 px cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub cols:      i32,
    pub rows:      i32,
    pub cell_size: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Grid { cols: 32, rows: 28, cell_size: 25 }
    }
}

impl Grid {
    pub fn new(cols: i32, rows: i32, cell_size: i32) -> Self {
        Grid { cols, rows, cell_size }
    }

    /// Grid covering a pixel area, rounding partial cells away.
    pub fn from_pixels(width: i32, height: i32, cell_size: i32) -> Result<Self, SimError> {
        if cell_size <= 0 {
            return Err(SimError::InvalidCellSize(cell_size));
        }
        Ok(Grid::new(width / cell_size, height / cell_size, cell_size))
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    pub fn cell_count(&self) -> usize {
        (self.cols.max(0) as usize) * (self.rows.max(0) as usize)
    }

    pub fn pixel_width(&self) -> i32  { self.cols * self.cell_size }
    pub fn pixel_height(&self) -> i32 { self.rows * self.cell_size }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_pair_up() {
        for d in Direction::ALL {
            assert!(d.is_opposite(d.opposite()));
            assert!(!d.is_opposite(d));
            assert_eq!(d.opposite().opposite(), d);
        }
        assert!(!Direction::Up.is_opposite(Direction::Left));
    }

    #[test]
    fn step_follows_image_space() {
        let p = Position::new(5, 5);
        assert_eq!(p.step(Direction::Up),    Position::new(5, 4));
        assert_eq!(p.step(Direction::Down),  Position::new(5, 6));
        assert_eq!(p.step(Direction::Left),  Position::new(4, 5));
        assert_eq!(p.step(Direction::Right), Position::new(6, 5));
    }

    #[test]
    fn pixel_conversion() {
        assert_eq!(Position::from_pixels(100, 75, 25), Some(Position::new(4, 3)));
        assert_eq!(Position::new(31, 4).to_pixels(25), (775, 100));
        assert_eq!(Position::from_pixels(101, 75, 25), None);
        assert_eq!(Position::from_pixels(-25, 0, 25), None);
    }

    #[test]
    fn default_grid_matches_play_area() {
        let g = Grid::default();
        assert_eq!(g.pixel_width(), 800);
        assert_eq!(g.pixel_height(), 700);
        assert_eq!(g.cell_count(), 32 * 28);
        assert_eq!(Grid::from_pixels(800, 700, 25), Ok(g));
    }

    #[test]
    fn bounds_are_half_open() {
        let g = Grid::default();
        assert!(g.contains(Position::new(0, 0)));
        assert!(g.contains(Position::new(31, 27)));
        assert!(!g.contains(Position::new(32, 0)));
        assert!(!g.contains(Position::new(0, 28)));
        assert!(!g.contains(Position::new(-1, 3)));
    }
}
