use std::io::{stdout, Stdout, Write};

use crossterm::style::{ContentStyle, PrintStyledContent, StyledContent};
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use tracing::debug;

use crate::error::Result;
use crate::TermInt;

/// The cell grid the game draws on.
pub trait Surface {
    fn size(&self) -> (TermInt, TermInt);
    /// Style used for blank cells after `clear`.
    fn set_style(&mut self, style: ContentStyle);
    fn set_content(&mut self, x: i32, y: i32, glyph: char, style: ContentStyle);
    fn clear(&mut self);
    /// Puts everything drawn since the last `show` on screen.
    fn show(&mut self) -> Result<()>;
    /// Picks up a new terminal size and repaints from scratch.
    fn sync(&mut self) -> Result<()>;
    fn fini(&mut self) -> Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Glyph {
    ch: char,
    style: ContentStyle,
}

impl Glyph {
    fn blank(style: ContentStyle) -> Self {
        Glyph { ch: ' ', style }
    }
}

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    style: ContentStyle,
    back: Vec<Glyph>,
    // None marks a cell whose on-screen content is unknown.
    front: Vec<Option<Glyph>>,
    active: bool,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        let style = ContentStyle::default();
        let cells = width as usize * height as usize;

        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            style,
            back: vec![Glyph::blank(style); cells],
            front: vec![None; cells],
            active: false,
        })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.width as usize * y as usize + x as usize)
    }
}

impl Surface for TermManager {
    fn size(&self) -> (TermInt, TermInt) {
        (self.width, self.height)
    }

    fn set_style(&mut self, style: ContentStyle) {
        self.style = style;
    }

    fn set_content(&mut self, x: i32, y: i32, glyph: char, style: ContentStyle) {
        if let Some(i) = self.index(x, y) {
            self.back[i] = Glyph { ch: glyph, style };
        }
    }

    fn clear(&mut self) {
        let blank = Glyph::blank(self.style);
        self.back.iter_mut().for_each(|g| *g = blank);
    }

    fn show(&mut self) -> Result<()> {
        let width = self.width as usize;

        for (i, glyph) in self.back.iter().enumerate() {
            if self.front[i] == Some(*glyph) {
                continue;
            }
            let (x, y) = ((i % width) as TermInt, (i / width) as TermInt);
            queue!(
                self.stdout,
                cursor::MoveTo(x, y),
                PrintStyledContent(StyledContent::new(glyph.style, glyph.ch))
            )?;
            self.front[i] = Some(*glyph);
        }

        self.stdout.flush()?;
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        let (width, height) = terminal::size()?;
        debug!(width, height, "resyncing screen");

        let mut back = vec![Glyph::blank(self.style); width as usize * height as usize];
        for y in 0..height.min(self.height) as usize {
            for x in 0..width.min(self.width) as usize {
                back[y * width as usize + x] = self.back[y * self.width as usize + x];
            }
        }

        self.width = width;
        self.height = height;
        self.back = back;
        self.front = vec![None; width as usize * height as usize];

        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.show()
    }

    fn fini(&mut self) -> Result<()> {
        if self.active {
            self.restore()?;
        }
        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Leave the user's terminal usable even if the game bailed out early.
        let _ = self.fini();
    }
}
