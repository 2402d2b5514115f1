use std::collections::VecDeque;

use crate::grid::{Cell, Grid, Heading};

pub const SEED_LENGTH: i32 = 3;

/// Occupied cells ordered tail to head, plus the current heading.
pub struct Snake {
    body: VecDeque<Cell>,
    heading: Heading,
}

impl Snake {
    pub fn new(grid: &Grid) -> Self {
        let mut snake = Snake { body: VecDeque::new(), heading: Heading::STILL };
        snake.reset_position(grid);
        snake
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    #[cfg(test)]
    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn head(&self) -> Cell {
        // The body is never empty: every constructor goes through reset_position.
        self.body.back().copied().unwrap_or(Cell::new(0, 0))
    }

    /// Overwrites the heading. Reversing into the body is allowed and kills
    /// the snake on the following tick.
    pub fn change_direction(&mut self, vertical: i32, horizontal: i32) {
        self.heading = Heading { dx: horizontal, dy: vertical };
    }

    /// Seeds three cells on a diagonal starting at (width / 2, width / 2),
    /// heading right. The seed is not a connected body; it straightens out
    /// after three moves.
    pub fn reset_position(&mut self, grid: &Grid) {
        let mid = grid.width() / 2;

        self.body = (0..SEED_LENGTH)
            .map(|i| grid.normalize(Cell::new(mid + i, mid + i)))
            .collect();
        self.heading = Heading::RIGHT;
    }

    /// Where the head lands on the next move.
    pub fn updated_head(&self, grid: &Grid) -> Cell {
        grid.step(self.head(), self.heading)
    }

    /// Appends the next head and, unless growing, drops the tail.
    pub fn advance(&mut self, grid: &Grid, grew: bool) -> Cell {
        let new_head = self.updated_head(grid);
        self.body.push_back(new_head);

        if !grew {
            self.body.pop_front();
        }

        new_head
    }

    /// True when the head shares a cell with any other segment.
    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().rev().skip(1).any(|part| *part == head)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    #[cfg(test)]
    pub fn from_parts(parts: &[(i32, i32)], heading: Heading) -> Self {
        Snake {
            body: parts.iter().map(|&(x, y)| Cell::new(x, y)).collect(),
            heading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_from(parts: &[(i32, i32)], heading: Heading) -> Snake {
        Snake::from_parts(parts, heading)
    }

    #[test]
    fn test_reset_seeds_diagonal() {
        let grid = Grid::new(20, 20).unwrap();
        let snake = Snake::new(&grid);

        let body: Vec<_> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![Cell::new(10, 10), Cell::new(11, 11), Cell::new(12, 12)]);
        assert_eq!(snake.heading(), Heading::RIGHT);
    }

    #[test]
    fn test_reset_seed_wraps_on_short_grid() {
        let grid = Grid::new(80, 24).unwrap();
        let snake = Snake::new(&grid);

        assert!(snake.body().iter().all(|c| c.y >= 0 && c.y < 24));
        assert_eq!(snake.head(), Cell::new(42, 42 % 24));
    }

    #[test]
    fn test_change_direction_takes_vertical_first() {
        let grid = Grid::new(10, 10).unwrap();
        let mut snake = Snake::new(&grid);

        snake.change_direction(-1, 0);
        assert_eq!(snake.heading(), Heading::UP);
        snake.change_direction(0, -1);
        assert_eq!(snake.heading(), Heading::LEFT);
    }

    #[test]
    fn test_advance_moves_without_growing() {
        let grid = Grid::new(20, 20).unwrap();
        let mut snake = snake_from(&[(5, 5), (6, 5), (7, 5)], Heading::RIGHT);
        let old_head = snake.head();

        let new_head = snake.advance(&grid, false);

        assert_eq!(snake.body().len(), 3);
        assert_eq!(new_head, grid.step(old_head, Heading::RIGHT));
        assert_eq!(snake.body().front(), Some(&Cell::new(6, 5)));
    }

    #[test]
    fn test_advance_grows_by_one() {
        let grid = Grid::new(20, 20).unwrap();
        let mut snake = snake_from(&[(5, 5), (6, 5), (7, 5)], Heading::DOWN);

        snake.advance(&grid, true);

        assert_eq!(snake.body().len(), 4);
        assert_eq!(snake.body().front(), Some(&Cell::new(5, 5)));
        assert_eq!(snake.head(), Cell::new(7, 6));
    }

    #[test]
    fn test_advance_wraps_around_edge() {
        let grid = Grid::new(8, 8).unwrap();
        let mut snake = snake_from(&[(7, 0)], Heading::RIGHT);

        snake.advance(&grid, false);
        assert_eq!(snake.head(), Cell::new(0, 0));

        snake.change_direction(-1, 0);
        snake.advance(&grid, false);
        assert_eq!(snake.head(), Cell::new(0, 7));
    }

    #[test]
    fn test_bites_itself_after_reversal() {
        let grid = Grid::new(20, 20).unwrap();
        let mut snake = snake_from(&[(5, 5), (6, 5), (7, 5)], Heading::RIGHT);
        assert!(!snake.bites_itself());

        snake.change_direction(0, -1);
        snake.advance(&grid, false);

        assert_eq!(snake.head(), Cell::new(6, 5));
        assert!(snake.bites_itself());
    }

    #[test]
    fn test_still_heading_stacks_cells() {
        let grid = Grid::new(5, 5).unwrap();
        let mut snake = snake_from(&[(1, 1)], Heading::STILL);

        snake.advance(&grid, true);
        assert!(snake.bites_itself());
    }
}
