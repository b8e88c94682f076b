//! Chess puzzle sheet generator.
//!
//! Positions come from a [`sources::PositionSource`], are curated
//! interactively through a [`console::Console`], and end up as board images
//! in a LaTeX document.

pub mod candidate;
pub mod cli;
pub mod config;
pub mod console;
pub mod curator;
pub mod error;
pub mod render;
pub mod session;
pub mod sources;
pub mod stockfish;
pub mod themes;

pub use error::{Result, SheetError};
