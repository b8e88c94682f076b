//! Session configuration resolved from CLI flags, environment and defaults.

use std::path::PathBuf;

use tracing::info;

use crate::cli::{Cli, Mode};
use crate::error::{Result, SheetError};
use crate::render::DocumentMeta;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_OUTPUT_DIR: &str = "output";
const LICHESS_DB_RELATIVE: &str = "0positions/csv-fen/lichess_db_puzzle.csv";
const THEMES_FILE_RELATIVE: &str = "themes-unique.txt";

#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub mode: Mode,
    /// Raw theme argument, used for filtering (Lichess) and for the file name.
    pub theme: String,
    /// Input file; always present for the text, csv and cql modes.
    pub file: Option<PathBuf>,
    pub count: usize,
    pub mate_in: usize,
    pub all_puzzles: bool,

    pub lichess_db: PathBuf,
    pub themes_file: PathBuf,
    pub output_dir: PathBuf,
    pub stockfish_path: Option<PathBuf>,

    pub open_links: bool,
    pub confirm_open: bool,
    pub run_pdflatex: bool,
    pub open_pdf: bool,

    pub seed: Option<u64>,
    pub skip_theme_check: bool,
    pub metadata_captions: bool,
    pub offer_reorder: bool,

    pub meta: DocumentMeta,
}

impl SheetConfig {
    pub fn resolve(cli: Cli) -> Result<Self> {
        if cli.mode != Mode::Lichess && cli.file.is_none() {
            return Err(SheetError::Config(format!(
                "--file is required when mode is '{}'.",
                cli.mode.as_str()
            )));
        }

        let data_dir = cli
            .data_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let lichess_db = cli
            .lichess_db
            .unwrap_or_else(|| data_dir.join(LICHESS_DB_RELATIVE));
        let themes_file = cli
            .themes_file
            .unwrap_or_else(|| data_dir.join(THEMES_FILE_RELATIVE));
        let output_dir = cli
            .output_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let config = Self {
            mode: cli.mode,
            theme: cli.theme,
            file: cli.file,
            count: cli.n,
            mate_in: cli.mate_in_n,
            all_puzzles: cli.all_puzzles,
            lichess_db,
            themes_file,
            output_dir,
            stockfish_path: cli.stockfish.filter(|p| !p.as_os_str().is_empty()),
            open_links: !cli.no_open,
            confirm_open: !cli.no_confirm_open,
            run_pdflatex: !cli.no_pdf,
            open_pdf: !cli.no_open,
            seed: cli.seed,
            skip_theme_check: cli.skip_theme_check,
            metadata_captions: cli.metadata_captions,
            offer_reorder: !cli.no_reorder,
            meta: DocumentMeta {
                title: cli.title,
                squad: cli.squad,
                blurb: cli.blurb,
                author: cli.author,
            },
        };

        info!(
            mode = config.mode.as_str(),
            output_dir = %config.output_dir.display(),
            "Configuration resolved"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn resolve(args: &[&str]) -> Result<SheetConfig> {
        let cli = Cli::try_parse_from(std::iter::once("puzzle-sheet").chain(args.iter().copied()))
            .unwrap();
        SheetConfig::resolve(cli)
    }

    #[test]
    fn test_defaults() {
        let config = resolve(&["lichess", "fork"]).unwrap();
        assert_eq!(
            config.lichess_db,
            PathBuf::from("data/0positions/csv-fen/lichess_db_puzzle.csv")
        );
        assert_eq!(config.themes_file, PathBuf::from("data/themes-unique.txt"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(config.open_links && config.confirm_open && config.run_pdflatex);
        assert!(config.offer_reorder);
    }

    #[test]
    fn test_data_dir_moves_defaults() {
        let config = resolve(&["lichess", "fork", "--data-dir", "/srv/chess"]).unwrap();
        assert_eq!(
            config.lichess_db,
            PathBuf::from("/srv/chess/0positions/csv-fen/lichess_db_puzzle.csv")
        );
        assert_eq!(config.themes_file, PathBuf::from("/srv/chess/themes-unique.txt"));
    }

    #[test]
    fn test_file_required_outside_lichess() {
        for mode in ["text", "csv", "cql"] {
            let err = resolve(&[mode, "x"]).unwrap_err();
            assert!(err.to_string().contains("--file is required"), "{err}");
        }
    }

    #[test]
    fn test_no_open_disables_links_and_pdf() {
        let config = resolve(&["text", "x", "-f", "list.txt", "--no-open"]).unwrap();
        assert!(!config.open_links);
        assert!(!config.open_pdf);
        assert!(config.run_pdflatex);
    }
}
