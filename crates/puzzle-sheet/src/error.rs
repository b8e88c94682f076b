//! Puzzle sheet error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{what} not found at {}", path.display())]
    MissingFile { what: &'static str, path: PathBuf },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid theme(s): {}\nValid themes are:\n{}", invalid.join(", "), valid.join(" "))]
    InvalidThemes {
        invalid: Vec<String>,
        valid: Vec<String>,
    },

    #[error("{0}")]
    NoPuzzles(String),

    #[error(transparent)]
    Position(#[from] chess_core::ChessError),

    #[error("Invalid puzzle order: {0}")]
    Reorder(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Stockfish error: {0}")]
    Engine(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, SheetError>;
