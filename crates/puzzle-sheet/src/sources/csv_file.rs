//! Generic CSV source: any header-driven table with a FEN column.

use std::path::Path;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use super::{require_file, PositionSource, Quota};
use crate::candidate::{extract_year, Byline, Candidate, Setup};
use crate::error::{Result, SheetError};

/// Column positions resolved from the header (case-insensitive, trimmed).
#[derive(Debug, Clone, Copy)]
struct Columns {
    fen: usize,
    white: Option<usize>,
    black: Option<usize>,
    event: Option<usize>,
    year: Option<usize>,
    date: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let fen = find("fen")
            .ok_or_else(|| SheetError::Schema("CSV must include a FEN column.".into()))?;

        Ok(Self {
            fen,
            white: find("white"),
            black: find("black"),
            event: find("event"),
            year: find("year"),
            date: find("date"),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Sequential(usize),
    Sampling,
}

/// Walks the table in order, then (unless every row was requested) keeps
/// sampling rows at random until the curator has enough puzzles.
pub struct CsvSource {
    records: Vec<csv::StringRecord>,
    columns: Columns,
    quota: Quota,
    with_byline: bool,
    phase: Phase,
    rng: StdRng,
}

impl CsvSource {
    /// `count: None` means "all puzzles": one sequential pass and no sampling.
    pub fn open(path: &Path, count: Option<usize>, with_byline: bool, rng: StdRng) -> Result<Self> {
        require_file(path, "CSV file")?;

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let columns = Columns::resolve(reader.headers()?)?;
        let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
        info!(rows = records.len(), path = %path.display(), "Loaded puzzle CSV");

        let quota = match count {
            Some(n) => Quota::Count(n),
            None => Quota::Exhaust,
        };

        Ok(Self {
            records,
            columns,
            quota,
            with_byline,
            phase: Phase::Sequential(0),
            rng,
        })
    }

    fn cell(&self, record: &csv::StringRecord, column: Option<usize>) -> String {
        column
            .and_then(|i| record.get(i))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    /// Candidate for a row, or `None` when its FEN cell is empty.
    fn candidate_at(&self, index: usize) -> Option<Candidate> {
        let record = &self.records[index];
        let fen = self.cell(record, Some(self.columns.fen));
        if fen.is_empty() {
            debug!(row = index + 1, "Skipping row without FEN");
            return None;
        }

        let mut candidate = Candidate::from_fen(fen, Setup::Raw);
        if self.with_byline {
            let mut year = self.cell(record, self.columns.year);
            if year.is_empty() {
                year = extract_year(&self.cell(record, self.columns.date));
            }
            candidate = candidate.with_byline(Byline {
                white: self.cell(record, self.columns.white),
                black: self.cell(record, self.columns.black),
                event: self.cell(record, self.columns.event),
                year,
            });
        }
        Some(candidate)
    }

    fn has_any_position(&self) -> bool {
        self.records
            .iter()
            .any(|r| !self.cell(r, Some(self.columns.fen)).is_empty())
    }
}

impl PositionSource for CsvSource {
    fn next_candidate(&mut self) -> Result<Option<Candidate>> {
        while let Phase::Sequential(next) = self.phase {
            if next >= self.records.len() {
                if self.quota == Quota::Exhaust || !self.has_any_position() {
                    return Ok(None);
                }
                debug!("Sequential pass finished; sampling rows at random");
                self.phase = Phase::Sampling;
                break;
            }
            self.phase = Phase::Sequential(next + 1);
            if let Some(candidate) = self.candidate_at(next) {
                return Ok(Some(candidate));
            }
        }

        loop {
            let index = self.rng.random_range(0..self.records.len());
            if let Some(candidate) = self.candidate_at(index) {
                return Ok(Some(candidate));
            }
        }
    }

    fn quota(&self) -> Quota {
        self.quota
    }
}
