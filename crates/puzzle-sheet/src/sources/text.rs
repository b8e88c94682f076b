//! Plain text source: one FEN per line, offered once each in file order.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use tracing::info;

use super::{require_file, PositionSource, Quota};
use crate::candidate::{Candidate, Setup};
use crate::error::Result;

pub struct TextSource {
    lines: VecDeque<String>,
}

impl TextSource {
    pub fn open(path: &Path) -> Result<Self> {
        require_file(path, "Text file")?;
        let source = Self::parse(&fs::read_to_string(path)?);
        info!(positions = source.lines.len(), path = %path.display(), "Loaded position list");
        Ok(source)
    }

    pub fn parse(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

impl PositionSource for TextSource {
    fn next_candidate(&mut self) -> Result<Option<Candidate>> {
        Ok(self
            .lines
            .pop_front()
            .map(|fen| Candidate::from_fen(fen, Setup::Normalize)))
    }

    fn quota(&self) -> Quota {
        Quota::Exhaust
    }
}
