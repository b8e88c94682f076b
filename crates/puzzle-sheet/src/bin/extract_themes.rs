//! Collect the theme vocabulary from the Lichess puzzle database.
//!
//! Usage: extract-themes [--lichess-db <csv>] [--out <txt>] [--print]

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use puzzle_sheet::themes::extract_unique_themes;

#[derive(Debug, Parser)]
#[command(name = "extract-themes", version, about)]
struct Args {
    /// Path to lichess_db_puzzle.csv
    #[arg(long, default_value = "data/0positions/csv-fen/lichess_db_puzzle.csv")]
    lichess_db: PathBuf,

    /// Output path for the vocabulary file
    #[arg(long, default_value = "data/themes-unique.txt")]
    out: PathBuf,

    /// Also print every theme to stdout
    #[arg(long)]
    print: bool,
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
    if !args.lichess_db.is_file() {
        bail!("Lichess DB not found at {}", args.lichess_db.display());
    }

    let themes = extract_unique_themes(&args.lichess_db)
        .with_context(|| format!("reading {}", args.lichess_db.display()))?;
    info!(count = themes.len(), "Collected themes");

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut contents = themes.join("\n");
    contents.push('\n');
    fs::write(&args.out, contents)?;

    if args.print {
        for theme in &themes {
            println!("{theme}");
        }
    }

    println!("Wrote {} themes to {}", themes.len(), args.out.display());
    Ok(())
}
