//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Build a printable chess puzzle sheet from a puzzle database, a CSV, a
/// list of FENs or a search of PGN games for forced mates.
#[derive(Debug, Parser)]
#[command(name = "puzzle-sheet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Where the puzzles come from
    #[arg(value_enum, value_name = "MODE")]
    pub mode: Mode,

    /// Theme tags, comma-separated (e.g. "fork,middlegame"). Also names the output file.
    #[arg(value_name = "THEME")]
    pub theme: String,

    /// Input file for the text, csv and cql modes
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Number of puzzles to select
    #[arg(long = "n", default_value_t = 10)]
    pub n: usize,

    /// Mate distance to search for in cql mode
    #[arg(long, alias = "mate_in_n", default_value_t = 2)]
    pub mate_in_n: usize,

    /// Go through every row of the CSV instead of sampling
    #[arg(long, alias = "all_puzzles")]
    pub all_puzzles: bool,

    /// Base data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Path to lichess_db_puzzle.csv
    #[arg(long)]
    pub lichess_db: Option<PathBuf>,

    /// Path to the theme vocabulary (themes-unique.txt)
    #[arg(long)]
    pub themes_file: Option<PathBuf>,

    /// Output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Path to the Stockfish binary
    #[arg(long, env = "STOCKFISH_PATH")]
    pub stockfish: Option<PathBuf>,

    /// Sheet title
    #[arg(long)]
    pub title: Option<String>,

    /// Squad name for the page header
    #[arg(long)]
    pub squad: Option<String>,

    /// Text under the title
    #[arg(long)]
    pub blurb: Option<String>,

    /// Author for the page header (defaults to the current year only)
    #[arg(long)]
    pub author: Option<String>,

    /// Do not open browser tabs or the PDF
    #[arg(long)]
    pub no_open: bool,

    /// Do not ask before opening browser tabs
    #[arg(long)]
    pub no_confirm_open: bool,

    /// Skip PDF generation with pdflatex
    #[arg(long)]
    pub no_pdf: bool,

    /// Seed for puzzle sampling (reproducible sessions)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Filter by theme without checking tags against the vocabulary
    #[arg(long)]
    pub skip_theme_check: bool,

    /// Prefix CSV captions with players, event and year
    #[arg(long)]
    pub metadata_captions: bool,

    /// Do not offer to reorder puzzles at the end
    #[arg(long)]
    pub no_reorder: bool,
}

/// Puzzle source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Random puzzles from the Lichess puzzle database
    Lichess,
    /// One FEN per line
    Text,
    /// CSV with a FEN column
    Csv,
    /// Mate-in-N positions found in PGN games
    Cql,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Lichess => "lichess",
            Mode::Text => "text",
            Mode::Csv => "csv",
            Mode::Cql => "cql",
        }
    }
}

/// Process exit status for a failed argument parse: 0 when clap only
/// printed help or version text, 1 for every usage error.
pub fn parse_failure_status(err: &clap::Error) -> u8 {
    match err.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["puzzle-sheet", "lichess", "fork"]).unwrap();
        assert_eq!(cli.mode, Mode::Lichess);
        assert_eq!(cli.theme, "fork");
        assert_eq!(cli.n, 10);
        assert_eq!(cli.mate_in_n, 2);
        assert!(!cli.no_open);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "puzzle-sheet",
            "cql",
            "mates",
            "-f",
            "games.pgn",
            "--n",
            "3",
            "--mate_in_n",
            "1",
            "--stockfish",
            "/opt/stockfish",
            "--seed",
            "42",
            "--no-pdf",
        ])
        .unwrap();
        assert_eq!(cli.mode, Mode::Cql);
        assert_eq!(cli.file, Some(PathBuf::from("games.pgn")));
        assert_eq!(cli.n, 3);
        assert_eq!(cli.mate_in_n, 1);
        assert_eq!(cli.stockfish, Some(PathBuf::from("/opt/stockfish")));
        assert_eq!(cli.seed, Some(42));
        assert!(cli.no_pdf);
    }

    #[test]
    fn test_unknown_mode_exits_with_one() {
        let err = Cli::try_parse_from(["puzzle-sheet", "chesscom", "fork"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
        assert_eq!(parse_failure_status(&err), 1);

        let err = Cli::try_parse_from(["puzzle-sheet"]).unwrap_err();
        assert_eq!(parse_failure_status(&err), 1);
    }

    #[test]
    fn test_help_and_version_exit_cleanly() {
        let err = Cli::try_parse_from(["puzzle-sheet", "--help"]).unwrap_err();
        assert_eq!(parse_failure_status(&err), 0);

        let err = Cli::try_parse_from(["puzzle-sheet", "--version"]).unwrap_err();
        assert_eq!(parse_failure_status(&err), 0);
    }
}
