//! Puzzle candidates offered for curation and the puzzles accepted from them.

use chess_core::fen;

use crate::error::Result;

/// How an offered position turns into the position printed on the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setup {
    /// Use the FEN as given.
    Raw,
    /// Round-trip the FEN through the rules engine.
    Normalize,
    /// Play one UCI move first (the opponent's move that sets up the puzzle).
    PlayFirst(String),
}

/// Game details shown above the user's comment in a caption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Byline {
    pub white: String,
    pub black: String,
    pub event: String,
    pub year: String,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub fen: String,
    pub setup: Setup,
    pub byline: Option<Byline>,
    pub themes: Vec<String>,
    pub url: String,
}

impl Candidate {
    /// A candidate whose reference link is the analysis board for its own FEN.
    pub fn from_fen(fen: impl Into<String>, setup: Setup) -> Self {
        let fen = fen.into();
        Self {
            url: fen::analysis_url(&fen),
            fen,
            setup,
            byline: None,
            themes: Vec::new(),
        }
    }

    pub fn with_byline(mut self, byline: Byline) -> Self {
        self.byline = Some(byline);
        self
    }

    /// The position that goes on the sheet.
    pub fn puzzle_fen(&self) -> Result<String> {
        let resolved = match &self.setup {
            Setup::Raw => self.fen.clone(),
            Setup::Normalize => fen::normalize_fen(&self.fen)?,
            Setup::PlayFirst(uci) => fen::play_uci(&self.fen, uci)?,
        };
        Ok(resolved)
    }
}

/// A candidate the user kept, with its resolved position and caption.
#[derive(Debug, Clone)]
pub struct AcceptedPuzzle {
    pub fen: String,
    pub caption: String,
    pub candidate: Candidate,
}

/// Year part of a PGN/CSV date: the text before the first `.`, `-` or `/`,
/// checked in that order.
pub fn extract_year(date: &str) -> String {
    let text = date.trim();
    ['.', '-', '/']
        .iter()
        .find(|sep| text.contains(**sep))
        .and_then(|sep| text.split(*sep).next())
        .unwrap_or(text)
        .to_string()
}

/// Build a LaTeX caption: bold players line, event/year line, then the comment.
pub fn format_caption(byline: Option<&Byline>, comment: &str) -> String {
    let mut lines = Vec::new();

    if let Some(b) = byline {
        if !b.white.is_empty() || !b.black.is_empty() {
            lines.push(format!("\\textbf{{{} - {}}}", b.white, b.black));
        }
        let event_line = [b.event.as_str(), b.year.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !event_line.trim().is_empty() {
            lines.push(event_line.trim().to_string());
        }
    }
    if !comment.is_empty() {
        lines.push(comment.to_string());
    }

    lines.join(" \\\\ ")
}
