//! Configuration for wrapsnake.
//!
//! Settings are read from `~/.wrapsnake/config.toml`. Every field is
//! optional:
//!
//! ```toml
//! # Delay between frames, in milliseconds
//! tick_ms = 40
//!
//! [glyphs]
//! snake = "■"
//! food = "●"
//!
//! # Any crossterm color name: black, white, red, dark_green, grey, ...
//! [colors]
//! foreground = "white"
//! background = "black"
//! snake = "white"
//! food = "white"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::style::{Color, ContentStyle};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GameError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pacing delay between frames
    pub tick_ms: u64,
    pub glyphs: GlyphConfig,
    pub colors: ColorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: 40,
            glyphs: GlyphConfig::default(),
            colors: ColorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphConfig {
    pub snake: char,
    pub food: char,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self { snake: '■', food: '\u{25CF}' }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub foreground: String,
    pub background: String,
    pub snake: String,
    pub food: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            foreground: "white".to_string(),
            background: "black".to_string(),
            snake: "white".to_string(),
            food: "white".to_string(),
        }
    }
}

/// Resolved styles for everything the game draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub text: ContentStyle,
    pub snake: ContentStyle,
    pub food: ContentStyle,
    pub snake_glyph: char,
    pub food_glyph: char,
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; a broken one is logged and
    /// ignored.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(Self::get_config_path) {
            Some(p) => p,
            None => return Self::default(),
        };
        if !path.exists() {
            return Self::default();
        }

        let parsed = fs::read_to_string(&path)
            .map_err(GameError::from)
            .and_then(|content| Self::from_toml_str(&content));

        match parsed {
            Ok(config) => {
                info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.theme()?;
        Ok(config)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn theme(&self) -> Result<Theme> {
        let background = parse_color(&self.colors.background)?;
        let styled = |name: &str| -> Result<ContentStyle> {
            let mut style = ContentStyle::new();
            style.foreground_color = Some(parse_color(name)?);
            style.background_color = Some(background);
            Ok(style)
        };

        Ok(Theme {
            text: styled(&self.colors.foreground)?,
            snake: styled(&self.colors.snake)?,
            food: styled(&self.colors.food)?,
            snake_glyph: self.glyphs.snake,
            food_glyph: self.glyphs.food,
        })
    }

    /// Directory holding the config file and the log
    pub fn get_config_dir() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(|home| PathBuf::from(home).join(".wrapsnake"))
    }

    pub fn get_config_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|dir| dir.join("config.toml"))
    }
}

fn parse_color(name: &str) -> Result<Color> {
    Color::try_from(name).map_err(|_| GameError::UnknownColor(name.to_string()))
}
