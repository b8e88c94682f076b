//! Mate-in-N source: scans PGN games for positions with a forced mate.
//!
//! For every game with at least N+1 plies the position N+1 plies before the
//! end is handed to the engine; positions where the side to move mates in
//! exactly N become candidates.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chess_core::fen::to_fen;
use chess_core::game_data::GameMetadata;
use chess_core::pgn::GameReader;
use tracing::{debug, info};

use super::{require_file, PositionSource, Quota};
use crate::candidate::{extract_year, Byline, Candidate, Setup};
use crate::error::{Result, SheetError};
use crate::stockfish::StockfishEngine;

/// Fixed engine search depth for mate detection.
pub const MATE_SEARCH_DEPTH: u32 = 20;

/// Something that can tell whether a position is a forced mate.
pub trait MateProbe {
    /// Mate distance for the side to move, if the engine reports one.
    fn mate_score(&mut self, fen: &str) -> Result<Option<i32>>;
}

/// Spawns a fresh Stockfish process for every probe.
pub struct StockfishProbe {
    path: PathBuf,
    depth: u32,
}

impl StockfishProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            depth: MATE_SEARCH_DEPTH,
        }
    }
}

impl MateProbe for StockfishProbe {
    fn mate_score(&mut self, fen: &str) -> Result<Option<i32>> {
        let mut engine = StockfishEngine::new(&self.path)?;
        let mate = engine.mate_search(fen, self.depth);
        engine.quit();
        mate
    }
}

pub struct MateSource<P: MateProbe = StockfishProbe> {
    games: GameReader<BufReader<File>>,
    mate_in: usize,
    count: usize,
    probe: P,
    scanned: usize,
}

impl MateSource<StockfishProbe> {
    /// Fails with a configuration error before touching the PGN when no engine is configured.
    pub fn open(
        pgn_path: &Path,
        mate_in: usize,
        count: usize,
        engine_path: Option<&Path>,
    ) -> Result<Self> {
        let engine_path = engine_path.ok_or_else(|| {
            SheetError::Config("Stockfish path not set. Use --stockfish or STOCKFISH_PATH.".into())
        })?;
        Self::with_probe(pgn_path, mate_in, count, StockfishProbe::new(engine_path))
    }
}

impl<P: MateProbe> MateSource<P> {
    pub fn with_probe(pgn_path: &Path, mate_in: usize, count: usize, probe: P) -> Result<Self> {
        require_file(pgn_path, "PGN file")?;
        let file = File::open(pgn_path)?;
        info!(path = %pgn_path.display(), mate_in, "Scanning games for mates");

        Ok(Self {
            games: GameReader::new(BufReader::new(file)),
            mate_in,
            count,
            probe,
            scanned: 0,
        })
    }

    fn byline(metadata: &GameMetadata) -> Byline {
        let or = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };
        Byline {
            white: or(&metadata.white, "Unknown"),
            black: or(&metadata.black, "Unknown"),
            event: or(&metadata.event, "Unknown Event"),
            year: extract_year(&or(&metadata.date, "????")),
        }
    }
}

impl<P: MateProbe> PositionSource for MateSource<P> {
    fn next_candidate(&mut self) -> Result<Option<Candidate>> {
        let rewind = self.mate_in + 1;

        while let Some(game) = self.games.next_game()? {
            self.scanned += 1;
            let Some(position) = game.rewind(rewind) else {
                debug!(game = self.scanned, plies = game.plies(), "Game too short");
                continue;
            };

            let fen = to_fen(position);
            let score = self.probe.mate_score(&fen)?;
            debug!(game = self.scanned, %fen, ?score, "Probed position");

            if score == Some(self.mate_in as i32) {
                let candidate =
                    Candidate::from_fen(fen, Setup::Raw).with_byline(Self::byline(&game.metadata));
                return Ok(Some(candidate));
            }
        }

        info!(games = self.scanned, "Finished scanning PGN");
        Ok(None)
    }

    fn quota(&self) -> Quota {
        Quota::Count(self.count)
    }
}
