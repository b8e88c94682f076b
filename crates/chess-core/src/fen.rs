//! FEN parsing, normalization and single-move advancement.

use shakmaty::{fen::Fen, uci::UciMove, CastlingMode, Chess, EnPassantMode, Position};

use crate::error::ChessError;

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const ANALYSIS_BASE_URL: &str = "https://lichess.org/analysis/";

/// Parse a FEN string into a legal position.
pub fn parse_position(fen: &str) -> Result<Chess, ChessError> {
    let trimmed = fen.trim();
    let parsed: Fen = trimmed.parse().map_err(|e: shakmaty::fen::ParseFenError| {
        ChessError::InvalidFen {
            fen: trimmed.to_string(),
            reason: e.to_string(),
        }
    })?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| ChessError::InvalidFen {
            fen: trimmed.to_string(),
            reason: e.to_string(),
        })
}

/// Serialize a position, keeping the en passant square only when a capture is legal.
pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// Round-trip a FEN through the rules engine.
pub fn normalize_fen(fen: &str) -> Result<String, ChessError> {
    parse_position(fen).map(|pos| to_fen(&pos))
}

/// Play a single UCI move on the given FEN and return the resulting FEN.
pub fn play_uci(fen: &str, uci: &str) -> Result<String, ChessError> {
    let pos = parse_position(fen)?;
    let illegal = |reason: String| ChessError::IllegalMove {
        fen: fen.trim().to_string(),
        uci: uci.to_string(),
        reason,
    };

    let uci_move: UciMove = uci.trim().parse().map_err(|e: shakmaty::uci::ParseUciMoveError| illegal(e.to_string()))?;
    let mv = uci_move.to_move(&pos).map_err(|e| illegal(e.to_string()))?;
    let next = pos.play(mv).map_err(|e| illegal(e.to_string()))?;

    Ok(to_fen(&next))
}

/// Lichess analysis board link for a position (spaces become underscores).
pub fn analysis_url(fen: &str) -> String {
    format!("{ANALYSIS_BASE_URL}{}", fen.trim().replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_start_position() {
        assert_eq!(normalize_fen(STANDARD_START_FEN).unwrap(), STANDARD_START_FEN);
        assert_eq!(
            normalize_fen(&format!("  {STANDARD_START_FEN}\n")).unwrap(),
            STANDARD_START_FEN
        );
    }

    #[test]
    fn test_play_uci_drops_unusable_en_passant() {
        let fen = play_uci(STANDARD_START_FEN, "e2e4").unwrap();
        assert_eq!(fen, "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
    }

    #[test]
    fn test_play_uci_rejects_illegal_move() {
        let err = play_uci(STANDARD_START_FEN, "e2e5").unwrap_err();
        assert!(matches!(err, ChessError::IllegalMove { .. }));

        let err = play_uci(STANDARD_START_FEN, "zz").unwrap_err();
        assert!(matches!(err, ChessError::IllegalMove { .. }));
    }

    #[test]
    fn test_parse_position_rejects_garbage() {
        assert!(matches!(
            parse_position("not a fen"),
            Err(ChessError::InvalidFen { .. })
        ));
        // Two white kings parse as FEN but are not a legal position.
        assert!(parse_position("K6K/8/8/8/8/8/8/k7 w - - 0 1").is_err());
    }

    #[test]
    fn test_analysis_url() {
        assert_eq!(
            analysis_url("puzzle one"),
            "https://lichess.org/analysis/puzzle_one"
        );
    }
}
