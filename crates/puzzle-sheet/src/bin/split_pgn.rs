//! Split a PGN file into numbered chunks of at most `--max-games` games.
//!
//! Usage: split-pgn <games.pgn> [--max-games 64]
//! Writes games_1.pgn, games_2.pgn, ... next to the input.

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use chess_core::pgn::split_games;
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "split-pgn", version, about)]
struct Args {
    /// PGN file to split
    input: PathBuf,

    /// Maximum games per output file
    #[arg(long, default_value_t = 64)]
    max_games: usize,
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
    ensure!(args.max_games > 0, "--max-games must be at least 1");

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let games = split_games(&content);
    println!("Found {} games in {}", games.len(), args.input.display());

    let stem = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = args
        .input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = args.input.parent().unwrap_or(std::path::Path::new(""));

    let mut files = 0usize;
    for (i, chunk) in games.chunks(args.max_games).enumerate() {
        let path = parent.join(format!("{stem}_{}{extension}", i + 1));
        let mut text = chunk.join("\n\n");
        text.push('\n');
        fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), games = chunk.len(), "Wrote chunk");
        println!("Created {} with {} games", path.display(), chunk.len());
        files += 1;
    }

    println!("\nSplit {} games into {files} files", games.len());
    Ok(())
}
