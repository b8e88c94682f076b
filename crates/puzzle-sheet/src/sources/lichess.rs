//! Lichess puzzle database source.
//!
//! The database is the headerless `lichess_db_puzzle.csv` export with the
//! columns PuzzleId, FEN, Moves, Rating, RatingDeviation, Popularity, NbPlays,
//! Themes, GameUrl, OpeningTags. A leading header row is tolerated.

use std::path::Path;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::info;

use super::{require_file, PositionSource, Quota};
use crate::candidate::{Candidate, Setup};
use crate::error::{Result, SheetError};
use crate::themes::{self, ThemeCheck, THEMES_COLUMN};

const EXPECTED_COLUMNS: usize = 10;
const HEADER_FIRST_CELL: &str = "PuzzleId";

/// One puzzle from the database (only the columns the sheet needs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRow {
    pub id: String,
    pub fen: String,
    pub moves: String,
    pub themes: String,
    pub game_url: String,
}

impl PuzzleRow {
    fn to_candidate(&self) -> Candidate {
        let setup = match self.moves.split_whitespace().next() {
            Some(first) => Setup::PlayFirst(first.to_string()),
            None => Setup::Raw,
        };
        let mut candidate = Candidate::from_fen(self.fen.trim(), setup);
        candidate.themes = self.themes.split_whitespace().map(String::from).collect();
        if !self.game_url.trim().is_empty() {
            candidate.url = self.game_url.trim().to_string();
        }
        candidate
    }
}

/// Read every puzzle row, dropping a header row and enforcing the column count.
pub fn load_rows(db_path: &Path) -> Result<Vec<PuzzleRow>> {
    require_file(db_path, "Lichess DB")?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(db_path)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if index == 0 && record.get(0) == Some(HEADER_FIRST_CELL) {
            continue;
        }
        if record.len() < EXPECTED_COLUMNS {
            return Err(SheetError::Schema(format!(
                "Lichess DB row {} has {} columns, expected {EXPECTED_COLUMNS}",
                index + 1,
                record.len()
            )));
        }
        let field = |i: usize| record.get(i).unwrap_or_default().to_string();
        rows.push(PuzzleRow {
            id: field(0),
            fen: field(1),
            moves: field(2),
            themes: field(THEMES_COLUMN),
            game_url: field(8),
        });
    }

    Ok(rows)
}

/// Samples puzzles uniformly, with replacement, from the theme-filtered table.
pub struct LichessSource {
    rows: Vec<PuzzleRow>,
    count: usize,
    rng: StdRng,
}

impl LichessSource {
    /// Load the database and narrow it to puzzles carrying every requested tag.
    pub fn open(
        db_path: &Path,
        tags: &[String],
        check: &ThemeCheck,
        count: usize,
        rng: StdRng,
    ) -> Result<Self> {
        let rows = load_rows(db_path)?;
        info!(rows = rows.len(), path = %db_path.display(), "Loaded Lichess DB");
        Self::from_rows(rows, tags, check, count, rng)
    }

    pub fn from_rows(
        rows: Vec<PuzzleRow>,
        tags: &[String],
        check: &ThemeCheck,
        count: usize,
        rng: StdRng,
    ) -> Result<Self> {
        if !tags.is_empty() {
            check.check(tags)?;
        }
        let rows = themes::filter_rows(rows, tags, |row| row.themes.as_str());
        if rows.is_empty() {
            return Err(SheetError::NoPuzzles(
                "No puzzles found for the selected theme(s).".into(),
            ));
        }
        info!(matching = rows.len(), ?tags, "Filtered puzzles by theme");

        Ok(Self { rows, count, rng })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl PositionSource for LichessSource {
    fn next_candidate(&mut self) -> Result<Option<Candidate>> {
        let index = self.rng.random_range(0..self.rows.len());
        Ok(Some(self.rows[index].to_candidate()))
    }

    fn quota(&self) -> Quota {
        Quota::Count(self.count)
    }
}
