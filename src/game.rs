use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, info};

use crate::config::Theme;
use crate::error::{GameError, Result};
use crate::food::{FoodSpawner, HUD_ROW};
use crate::grid::{Cell, Grid};
use crate::input::{Control, Steering};
use crate::snake::Snake;
use crate::term::Surface;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    GameOver { won: bool },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum RoundEnd {
    Finished,
    Quit,
}

/// How a game session ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Exit {
    /// Ctrl-C, at any point.
    Interrupted,
    /// The player answered "n" after a round.
    Declined { score: u32 },
}

pub struct Game<S: Surface, R: Rng> {
    surface: S,
    spawner: FoodSpawner<R>,
    steering: Steering,
    theme: Theme,
    tick: Duration,
    grid: Grid,
    snake: Snake,
    food: Cell,
    score: u32,
    state: State,
}

impl<S: Surface, R: Rng> Game<S, R> {
    pub fn new(surface: S, rng: R, steering: Steering, theme: Theme, tick: Duration) -> Result<Self> {
        let grid = surface_grid(&surface)?;
        let snake = Snake::new(&grid);

        let mut game = Game {
            surface,
            spawner: FoodSpawner::new(rng),
            steering,
            theme,
            tick,
            grid,
            snake,
            food: Cell::new(0, 0),
            score: 0,
            state: State::Running,
        };
        game.surface.set_style(theme.text);
        game.reset()?;
        Ok(game)
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[cfg(test)]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    #[cfg(test)]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub fn food(&self) -> Cell {
        self.food
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Plays rounds until the player quits or declines another one.
    pub fn run(&mut self, controls: &Receiver<Control>) -> Result<Exit> {
        loop {
            if self.play_round(controls)? == RoundEnd::Quit {
                return Ok(Exit::Interrupted);
            }

            match self.await_answer(controls)? {
                Some(true) => self.reset()?,
                Some(false) => return Ok(Exit::Declined { score: self.score }),
                None => return Ok(Exit::Interrupted),
            }
        }
    }

    /// Fresh round: grid from the current surface size, seed snake, new food.
    pub fn reset(&mut self) -> Result<()> {
        self.grid = surface_grid(&self.surface)?;
        self.snake.reset_position(&self.grid);
        self.steering.take();
        self.score = 0;
        self.state = State::Running;
        // A board too small for any food ends the round on its first tick.
        self.food = self.spawner.place_food(&self.grid, &self.snake).unwrap_or(self.snake.head());

        info!(width = self.grid.width(), height = self.grid.height(), "round started");
        Ok(())
    }

    /// One game step: eat, check for a bite, move. Returns the new state.
    ///
    /// The bite check runs on the body as it was before this move, so a
    /// collision is caught on the tick after the head enters the body.
    pub fn step(&mut self) -> State {
        if let Some(heading) = self.steering.take() {
            self.snake.change_direction(heading.dy, heading.dx);
        }

        let mut grew = false;
        if self.snake.head() == self.food {
            self.score += 1;
            grew = true;
            debug!(score = self.score, "food eaten");

            match self.spawner.place_food(&self.grid, &self.snake) {
                Some(cell) => self.food = cell,
                None => {
                    self.state = State::GameOver { won: true };
                    return self.state;
                }
            }
        }

        if self.snake.bites_itself() {
            self.state = State::GameOver { won: false };
            return self.state;
        }

        self.snake.advance(&self.grid, grew);
        self.state
    }

    ///////////////////////////////////////////////////////////////////////////

    fn play_round(&mut self, controls: &Receiver<Control>) -> Result<RoundEnd> {
        loop {
            self.surface.clear();

            if let State::GameOver { won } = self.step() {
                info!(score = self.score, won, "game over");
                self.draw_game_over(won);
                self.surface.show()?;
                return Ok(RoundEnd::Finished);
            }

            self.draw_frame();

            if self.pace(controls)? == Some(Control::Quit) {
                return Ok(RoundEnd::Quit);
            }
            self.surface.show()?;
        }
    }

    /// Sleeps out the frame delay while serving resize and quit requests.
    fn pace(&mut self, controls: &Receiver<Control>) -> Result<Option<Control>> {
        let deadline = Instant::now() + self.tick;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match controls.recv_timeout(remaining) {
                Ok(Control::Quit) => return Ok(Some(Control::Quit)),
                Ok(Control::Resize) => self.surface.sync()?,
                Ok(Control::PlayAgain(_)) => {}
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(GameError::InputClosed),
            }
        }
    }

    /// Blocks on the prompt. `None` means Ctrl-C.
    fn await_answer(&mut self, controls: &Receiver<Control>) -> Result<Option<bool>> {
        loop {
            match controls.recv() {
                Ok(Control::PlayAgain(answer)) => return Ok(Some(answer)),
                Ok(Control::Quit) => return Ok(None),
                Ok(Control::Resize) => self.surface.sync()?,
                Err(_) => return Err(GameError::InputClosed),
            }
        }
    }

    fn draw_frame(&mut self) {
        let theme = self.theme;

        self.surface.set_content(self.food.x, self.food.y, theme.food_glyph, theme.food);
        for part in self.snake.body() {
            self.surface.set_content(part.x, part.y, theme.snake_glyph, theme.snake);
        }

        let score = format!("Score: {}", self.score);
        let width = score.chars().count() as i32;
        self.draw_text(1, HUD_ROW, 1 + width, HUD_ROW, &score);
    }

    fn draw_game_over(&mut self, won: bool) {
        let headline = if won { "You won!" } else { "Game Over" };
        let msg = format!("{}, Score: {}, Play Again? y/n", headline, self.score);
        let (w, h) = (self.grid.width(), self.grid.height());

        self.draw_text(w / 2 - 20, h / 2, w / 2 + 20, h / 2, &msg);
    }

    /// Writes `text` inside the box from (x1, y1) to (x2, y2), wrapping at x2
    /// and stopping below y2.
    fn draw_text(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, text: &str) {
        let style = self.theme.text;
        let (mut col, mut row) = (x1, y1);

        for ch in text.chars() {
            self.surface.set_content(col, row, ch, style);
            col += 1;

            if col >= x2 {
                row += 1;
                col = x1;
            }
            if row > y2 {
                break;
            }
        }
    }
}

fn surface_grid<S: Surface>(surface: &S) -> Result<Grid> {
    let (width, height) = surface.size();
    Grid::new(width as i32, height as i32)
}
