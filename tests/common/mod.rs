#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use puzzle_sheet::cli::Cli;
use puzzle_sheet::config::SheetConfig;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Write a fixture file into `dir` and return its path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Resolve a non-interactive configuration: no browser, no pdflatex, sheet
/// details given up front and output under `dir/out`.
pub fn config(dir: &Path, args: &[&str]) -> SheetConfig {
    let output = dir.join("out");
    let output = output.to_str().unwrap();
    let mut argv = vec!["puzzle-sheet"];
    argv.extend_from_slice(args);
    argv.extend_from_slice(&[
        "--no-open",
        "--no-pdf",
        "--title",
        "Title",
        "--squad",
        "Squad",
        "--blurb",
        "Blurb",
        "--output-dir",
        output,
        "--seed",
        "7",
    ]);
    SheetConfig::resolve(Cli::try_parse_from(argv).unwrap()).unwrap()
}

/// The puzzles listed in a sheet's `puzzles.json`.
pub fn manifest(path: &Path) -> Vec<serde_json::Value> {
    let text = fs::read_to_string(path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    match value {
        serde_json::Value::Array(entries) => entries,
        other => panic!("manifest is not an array: {other}"),
    }
}
