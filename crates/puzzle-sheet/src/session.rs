//! One end-to-end run: pick a source, curate, assemble the sheet.

use std::path::Path;

use tracing::{info, warn};

use crate::cli::Mode;
use crate::config::SheetConfig;
use crate::console::{BrowserOpener, Console, LinkOpener, PrintLinks};
use crate::curator::{confirm_browser_open, curate, CuratorOptions};
use crate::error::{Result, SheetError};
use crate::render::{self, AssembleOptions, SheetOutput};
use crate::sources::{
    sampling_rng, CsvSource, LichessSource, MateSource, PositionSource, TextSource,
};
use crate::themes::{parse_theme_query, ThemeCheck};

fn input_file(config: &SheetConfig) -> Result<&Path> {
    config.file.as_deref().ok_or_else(|| {
        SheetError::Config(format!(
            "--file is required when mode is '{}'.",
            config.mode.as_str()
        ))
    })
}

/// Construct the source adapter for the configured mode.
pub fn build_source(config: &SheetConfig) -> Result<Box<dyn PositionSource>> {
    let source: Box<dyn PositionSource> = match config.mode {
        Mode::Lichess => {
            let check = if config.skip_theme_check {
                warn!("Theme validation disabled");
                ThemeCheck::Permissive
            } else {
                ThemeCheck::from_file(&config.themes_file)?
            };
            Box::new(LichessSource::open(
                &config.lichess_db,
                &parse_theme_query(&config.theme),
                &check,
                config.count,
                sampling_rng(config.seed),
            )?)
        }
        Mode::Text => Box::new(TextSource::open(input_file(config)?)?),
        Mode::Csv => {
            let count = (!config.all_puzzles).then_some(config.count);
            Box::new(CsvSource::open(
                input_file(config)?,
                count,
                config.metadata_captions,
                sampling_rng(config.seed),
            )?)
        }
        Mode::Cql => Box::new(MateSource::open(
            input_file(config)?,
            config.mate_in,
            config.count,
            config.stockfish_path.as_deref(),
        )?),
    };
    Ok(source)
}

/// Run a whole session against the given console.
pub fn run(config: SheetConfig, console: &mut dyn Console) -> Result<SheetOutput> {
    let mut open_links = config.open_links;
    if open_links && config.confirm_open {
        open_links = confirm_browser_open(console)?;
    }

    let mut source = build_source(&config)?;
    let mut links: Box<dyn LinkOpener> = if open_links {
        Box::new(BrowserOpener)
    } else {
        Box::new(PrintLinks)
    };
    let options = CuratorOptions {
        offer_reorder: config.offer_reorder,
        max_attempts: None,
    };

    let puzzles = curate(source.as_mut(), console, links.as_mut(), &options)?;
    if puzzles.is_empty() {
        return Err(SheetError::NoPuzzles("No puzzles selected.".into()));
    }
    info!(count = puzzles.len(), "Puzzles selected");

    render::assemble(
        &puzzles,
        AssembleOptions {
            output_dir: config.output_dir,
            theme: config.theme,
            meta: config.meta,
            run_pdflatex: config.run_pdflatex,
            open_pdf: config.open_pdf,
        },
        console,
    )
}
