//! Document assembly: board images, LaTeX source, manifest and PDF.

pub mod board;
pub mod document;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use tracing::{debug, info};

use crate::candidate::AcceptedPuzzle;
use crate::console::Console;
use crate::error::{Result, SheetError};

pub use self::document::{DocumentMeta, SheetHeader};

/// What to do once the puzzles are chosen.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    pub output_dir: PathBuf,
    /// Theme query, used to name the `.tex` file.
    pub theme: String,
    pub meta: DocumentMeta,
    pub run_pdflatex: bool,
    pub open_pdf: bool,
}

/// Files produced for a sheet.
#[derive(Debug, Clone)]
pub struct SheetOutput {
    pub images: Vec<PathBuf>,
    pub tex: PathBuf,
    pub manifest: PathBuf,
    pub pdf: Option<PathBuf>,
}

/// Render `images/puzzle_<idx>.png` for every puzzle, clearing images left by earlier runs.
pub fn render_images(puzzles: &[AcceptedPuzzle], images_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(images_dir)?;

    let pattern = glob::Pattern::escape(&images_dir.to_string_lossy()) + "/puzzle_*.png";
    for stale in glob::glob(&pattern)? {
        let stale = stale.map_err(|e| SheetError::Io(e.into_error()))?;
        debug!(path = %stale.display(), "Removing stale image");
        fs::remove_file(stale)?;
    }

    puzzles
        .iter()
        .enumerate()
        .map(|(idx, puzzle)| {
            let path = images_dir.join(format!("puzzle_{idx}.png"));
            debug!(idx, fen = %puzzle.fen, "Rendering board");
            board::render_png(&puzzle.fen, &path)?;
            Ok(path)
        })
        .collect()
}

/// Produce the whole sheet for an ordered list of puzzles.
pub fn assemble(
    puzzles: &[AcceptedPuzzle],
    options: AssembleOptions,
    console: &mut dyn Console,
) -> Result<SheetOutput> {
    if puzzles.is_empty() {
        return Err(SheetError::NoPuzzles("No puzzles selected.".into()));
    }
    let output_dir = options.output_dir;
    fs::create_dir_all(&output_dir)?;

    info!(count = puzzles.len(), "Generating images");
    let images = render_images(puzzles, &output_dir.join("images"))?;

    let header = options.meta.resolve(console, Local::now().year())?;
    let cells: Vec<document::Cell> = images
        .iter()
        .zip(puzzles)
        .map(|(image, puzzle)| document::Cell {
            image: document::relative_ref(image, &output_dir),
            caption: puzzle.caption.clone(),
        })
        .collect();

    let tex = output_dir.join(format!("{}.tex", document::tex_stem(&options.theme)));
    document::write_tex(&tex, &header, &cells)?;
    let manifest = document::write_manifest(&output_dir, puzzles)?;

    let pdf = if options.run_pdflatex {
        document::compile_pdf(&tex)
    } else {
        None
    };
    if options.open_pdf {
        if let Some(pdf) = &pdf {
            document::open_pdf(pdf);
        }
    }

    Ok(SheetOutput {
        images,
        tex,
        manifest,
        pdf,
    })
}
