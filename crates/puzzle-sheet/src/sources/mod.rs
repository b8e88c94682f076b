//! Position source adapters.
//!
//! Each adapter turns one kind of input (puzzle database, generic CSV, text
//! list, PGN games) into a stream of [`Candidate`]s for the curator.

pub mod csv_file;
pub mod lichess;
pub mod mate;
pub mod text;

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::candidate::Candidate;
use crate::error::{Result, SheetError};

pub use self::csv_file::CsvSource;
pub use self::lichess::LichessSource;
pub use self::mate::{MateProbe, MateSource, StockfishProbe};
pub use self::text::TextSource;

/// A stream of puzzle candidates.
pub trait PositionSource {
    /// Next candidate to offer, or `None` once the source is exhausted.
    fn next_candidate(&mut self) -> Result<Option<Candidate>>;

    /// How many accepted puzzles end the session.
    fn quota(&self) -> Quota;
}

/// When the curator stops asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    /// Stop after this many accepts.
    Count(usize),
    /// Offer everything the source has.
    Exhaust,
}

impl Quota {
    pub fn is_met(self, accepted: usize) -> bool {
        match self {
            Quota::Count(n) => accepted >= n,
            Quota::Exhaust => false,
        }
    }
}

/// Random generator for sampling sources; seeded runs are reproducible.
pub fn sampling_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn require_file(path: &Path, what: &'static str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(SheetError::MissingFile {
            what,
            path: path.to_path_buf(),
        })
    }
}
