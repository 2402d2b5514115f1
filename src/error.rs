use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("Grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: i32, height: i32 },

    #[error("Input handler stopped")]
    InputClosed,

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unknown color: {0}")]
    UnknownColor(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
