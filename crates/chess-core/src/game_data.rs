use serde::{Deserialize, Serialize};
use shakmaty::Chess;

/// Seven-tag-roster style headers collected from a PGN game.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: Option<String>,
    pub black: Option<String>,
    pub event: Option<String>,
    pub date: Option<String>,
    pub result: Option<String>, // "1-0", "0-1", "1/2-1/2"
    pub set_up: bool,
    pub fen: Option<String>,
}

/// A game replayed move by move.
///
/// `positions[0]` is the starting position and `positions[k]` the position
/// after ply `k`. Replay stops at the first move that cannot be played, so
/// `positions` always holds a legal prefix of the recorded mainline.
#[derive(Debug, Clone)]
pub struct ScannedGame {
    pub metadata: GameMetadata,
    pub positions: Vec<Chess>,
}

impl ScannedGame {
    /// Number of plies that were successfully replayed.
    pub fn plies(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    /// Position `plies` half-moves before the end of the game.
    pub fn rewind(&self, plies: usize) -> Option<&Chess> {
        let last = self.plies();
        if plies > last || self.positions.is_empty() {
            return None;
        }
        self.positions.get(last - plies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{san::San, Position};

    fn replay(moves: &[&str]) -> ScannedGame {
        let mut positions = vec![Chess::default()];
        for san in moves {
            let pos = positions.last().unwrap().clone();
            let mv = san.parse::<San>().unwrap().to_move(&pos).unwrap();
            positions.push(pos.play(mv).unwrap());
        }
        ScannedGame {
            metadata: GameMetadata::default(),
            positions,
        }
    }

    #[test]
    fn test_rewind_counts_from_the_end() {
        let game = replay(&["e4", "e5", "Nf3"]);
        assert_eq!(game.plies(), 3);
        assert_eq!(game.rewind(0).unwrap().turn(), shakmaty::Color::Black);
        assert_eq!(game.rewind(3).unwrap().fullmoves().get(), 1);
        assert_eq!(game.rewind(3).unwrap().turn(), shakmaty::Color::White);
        assert!(game.rewind(4).is_none());
    }
}
