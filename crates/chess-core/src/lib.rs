//! Chess helpers shared by the puzzle sheet tools: FEN handling, PGN scanning
//! and PGN text utilities.

pub mod error;
pub mod fen;
pub mod game_data;
pub mod pgn;

pub use error::ChessError;
