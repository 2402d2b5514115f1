use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Grid};
use crate::snake::Snake;

/// The score text lives in row 1, columns 0..10; food never lands there.
pub const HUD_ROW: i32 = 1;
pub const HUD_WIDTH: i32 = 10;

const RANDOM_ATTEMPTS: usize = 64;

pub fn in_hud(cell: Cell) -> bool {
    cell.y == HUD_ROW && cell.x < HUD_WIDTH
}

pub struct FoodSpawner<R: Rng> {
    rng: R,
}

impl<R: Rng> FoodSpawner<R> {
    pub fn new(rng: R) -> Self {
        FoodSpawner { rng }
    }

    /// Picks a cell outside the HUD and off the snake's body.
    ///
    /// Uniform draws first, then a pick among every free cell so a crowded
    /// board still terminates. `None` means there is nowhere left.
    pub fn place_food(&mut self, grid: &Grid, snake: &Snake) -> Option<Cell> {
        let free = |cell: Cell| !in_hud(cell) && !snake.occupies(cell);

        for _ in 0..RANDOM_ATTEMPTS {
            let cell = Cell::new(
                self.rng.gen_range(0..grid.width()),
                self.rng.gen_range(0..grid.height()),
            );
            if free(cell) {
                return Some(cell);
            }
        }

        let choices: Vec<Cell> = grid.cells().filter(|&cell| free(cell)).collect();
        choices.choose(&mut self.rng).copied()
    }
}
