use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChessError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Illegal move '{uci}' in position '{fen}': {reason}")]
    IllegalMove {
        fen: String,
        uci: String,
        reason: String,
    },

    #[error("PGN read error: {0}")]
    Pgn(#[from] std::io::Error),
}
