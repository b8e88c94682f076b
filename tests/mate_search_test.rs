/// Mate-in-N search over PGN games with a stand-in engine.
mod common;

use common::write_file;
use puzzle_sheet::console::{PrintLinks, ScriptedConsole};
use puzzle_sheet::curator::{curate, CuratorOptions};
use puzzle_sheet::sources::{MateProbe, MateSource, PositionSource, Quota};
use puzzle_sheet::Result;

/// Reports "mate in 2" for every position whose FEN has White to move.
struct WhiteMatesInTwo;

impl MateProbe for WhiteMatesInTwo {
    fn mate_score(&mut self, fen: &str) -> Result<Option<i32>> {
        Ok(fen.split_whitespace().nth(1).filter(|s| *s == "w").map(|_| 2))
    }
}

const GAMES: &str = r#"[Event "Rated Blitz"]
[White "Alice"]
[Black "Bob"]
[Date "2019.03.02"]
[Result "1-0"]

1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7# 1-0

[Event "Fool's Mate"]
[White "Carol"]
[Black "Dan"]
[Result "0-1"]

1. f3 e5 2. g4 Qh4# 0-1

[Event "Setup"]
[SetUp "1"]
[FEN "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1"]
[Result "1-0"]

1. Ra8# 1-0
"#;

#[test]
fn test_finds_positions_before_mate() {
    let dir = tempfile::tempdir().unwrap();
    let pgn = write_file(dir.path(), "games.pgn", GAMES);

    let mut source = MateSource::with_probe(&pgn, 2, 5, WhiteMatesInTwo).unwrap();
    assert_eq!(source.quota(), Quota::Count(5));

    // Scholar's mate, three plies from the end: White to move.
    let first = source.next_candidate().unwrap().unwrap();
    assert_eq!(
        first.fen,
        "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/8/PPPP1PPP/RNBQK1NR w KQkq - 2 3"
    );
    let byline = first.byline.unwrap();
    assert_eq!(
        (byline.white.as_str(), byline.event.as_str(), byline.year.as_str()),
        ("Alice", "Rated Blitz", "2019")
    );

    // Fool's mate rewinds to Black to move; the one-move setup game is too short.
    assert!(source.next_candidate().unwrap().is_none());
}

#[test]
fn test_curated_mates_carry_bylines() {
    let dir = tempfile::tempdir().unwrap();
    let pgn = write_file(dir.path(), "games.pgn", GAMES);
    let mut source = MateSource::with_probe(&pgn, 2, 1, WhiteMatesInTwo).unwrap();
    let mut console = ScriptedConsole::new(["1", "Find mate"]);

    let puzzles = curate(
        &mut source,
        &mut console,
        &mut PrintLinks,
        &CuratorOptions {
            offer_reorder: false,
            max_attempts: Some(3),
        },
    )
    .unwrap();

    assert_eq!(puzzles.len(), 1);
    assert_eq!(
        puzzles[0].caption,
        "\\textbf{Alice - Bob} \\\\ Rated Blitz 2019 \\\\ Find mate"
    );
    assert!(puzzles[0].candidate.url.starts_with("https://lichess.org/analysis/r1bqkbnr/"));
}
