//! Wrap-around grid geometry.
//!
//! The play field is a torus: leaving through one edge re-enters through the
//! opposite one. Everything here is plain arithmetic with no side effects.

use crate::error::{GameError, Result};

/// A single grid position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }
}

/// Per-tick movement of the snake's head.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Heading {
    pub dx: i32,
    pub dy: i32,
}

impl Heading {
    pub const STILL: Heading = Heading { dx: 0, dy: 0 };
    pub const UP: Heading = Heading { dx: 0, dy: -1 };
    pub const DOWN: Heading = Heading { dx: 0, dy: 1 };
    pub const LEFT: Heading = Heading { dx: -1, dy: 0 };
    pub const RIGHT: Heading = Heading { dx: 1, dy: 0 };
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(GameError::EmptyGrid { width, height });
        }
        Ok(Grid { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Moves `cell` one step along `heading`, wrapping on both axes.
    pub fn step(&self, cell: Cell, heading: Heading) -> Cell {
        Cell {
            x: wrap(cell.x, heading.dx, self.width),
            y: wrap(cell.y, heading.dy, self.height),
        }
    }

    /// Folds an arbitrary cell back onto the grid.
    pub fn normalize(&self, cell: Cell) -> Cell {
        self.step(cell, Heading::STILL)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}

/// Next coordinate on an axis of length `size`, always in `[0, size)`.
///
/// `size` must be positive; `Grid::new` guarantees that for every caller in
/// the game.
pub fn wrap(coord: i32, speed: i32, size: i32) -> i32 {
    (coord as i64 + speed as i64).rem_euclid(size as i64) as i32
}
