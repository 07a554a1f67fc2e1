//! Error handling for the tilegrid binary.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for tilegrid commands.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Configuration parsing or validation errors.
    #[error("Configuration error: {}", .0.pretty())]
    Config(#[from] config::Error),
    /// Errors surfaced by the layout engine.
    #[error("Engine error: {0}")]
    Engine(#[from] tilegrid_engine::Error),
    /// A layout file that is not valid JSON of the expected shape.
    #[error("Layout error: {0}")]
    Layout(#[from] tilegrid_protocol::codec::Error),
    /// Failed to parse the gesture script.
    #[error("Failed to parse gesture script: {0}")]
    Script(String),
    /// `check` found problems.
    #[error("{0} layout problem(s) found")]
    Problems(usize),
}

impl Error {
    /// Helper to build a script error from an arbitrary message.
    pub fn script<M: Into<String>>(msg: M) -> Self {
        Self::Script(msg.into())
    }
}
