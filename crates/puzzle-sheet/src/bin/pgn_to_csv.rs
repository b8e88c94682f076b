//! Convert a PGN puzzle collection into a CSV the `csv` mode can read.
//!
//! Entries are separated by two blank lines. Each becomes one row with its
//! Event, Date, White, Black, Result and FEN headers plus the solution text
//! (everything after the first `{`).
//!
//! Usage: pgn-to-csv <input.pgn> <output.csv>

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chess_core::pgn::{extract_header, solution_text, split_blocks};
use clap::Parser;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pgn-to-csv", version, about)]
struct Args {
    /// PGN file to read
    input: PathBuf,
    /// CSV file to write
    output: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PuzzleRecord {
    event: String,
    date: String,
    white: String,
    black: String,
    result: String,
    #[serde(rename = "FEN")]
    fen: String,
    solution: String,
}

impl PuzzleRecord {
    fn from_block(block: &str) -> Self {
        let header = |name: &str| extract_header(block, name).unwrap_or_default();
        Self {
            event: header("Event"),
            date: header("Date"),
            white: header("White"),
            black: header("Black"),
            result: header("Result"),
            fen: header("FEN"),
            solution: solution_text(block),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut rows = 0usize;
    for block in split_blocks(&content) {
        writer.serialize(PuzzleRecord::from_block(block))?;
        rows += 1;
    }
    writer.flush()?;

    info!(rows, output = %args.output.display(), "Wrote puzzle CSV");
    Ok(())
}
