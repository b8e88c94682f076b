//! PGN utilities: a streaming game reader that replays mainlines, plus
//! lightweight regex-based helpers for working on raw PGN text.

use std::io::Read;
use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Visitor};
use regex::Regex;
use shakmaty::{Chess, Position};
use tracing::debug;

use crate::error::ChessError;
use crate::fen::parse_position;
use crate::game_data::{GameMetadata, ScannedGame};

/// Decode a tag value as ISO-8859-1. Every byte maps to the code point of the same value.
fn decode_latin1(value: RawTag<'_>) -> String {
    value.decode().iter().map(|&b| b as char).collect()
}

/// Movetext state while replaying a single game.
struct Replay {
    metadata: GameMetadata,
    positions: Vec<Chess>,
    stopped: bool,
}

/// Visitor that replays each game's mainline into a list of positions.
struct MainlineReplayer;

impl Visitor for MainlineReplayer {
    type Tags = GameMetadata;
    type Movetext = Replay;
    type Output = ScannedGame;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(GameMetadata::default())
    }

    fn tag(
        &mut self,
        tags: &mut GameMetadata,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        match name {
            b"White" => tags.white = Some(decode_latin1(value)),
            b"Black" => tags.black = Some(decode_latin1(value)),
            b"Event" => tags.event = Some(decode_latin1(value)),
            b"Date" => tags.date = Some(decode_latin1(value)),
            b"Result" => tags.result = Some(decode_latin1(value)),
            b"SetUp" => tags.set_up = decode_latin1(value) == "1",
            b"FEN" => tags.fen = Some(decode_latin1(value)),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameMetadata) -> ControlFlow<Self::Output, Replay> {
        let start = match tags.fen.as_deref() {
            Some(fen) => match parse_position(fen) {
                Ok(pos) => Some(pos),
                Err(e) => {
                    debug!(error = %e, "Skipping game with unusable FEN tag");
                    None
                }
            },
            None => Some(Chess::default()),
        };

        let (positions, stopped) = match start {
            Some(pos) => (vec![pos], false),
            None => (Vec::new(), true),
        };

        ControlFlow::Continue(Replay {
            metadata: tags,
            positions,
            stopped,
        })
    }

    fn san(&mut self, replay: &mut Replay, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        if replay.stopped {
            return ControlFlow::Continue(());
        }
        let Some(current) = replay.positions.last() else {
            return ControlFlow::Continue(());
        };

        let next = san_plus
            .san
            .to_move(current)
            .ok()
            .and_then(|mv| current.clone().play(mv).ok());

        match next {
            Some(pos) => replay.positions.push(pos),
            None => {
                debug!(san = %san_plus, ply = replay.positions.len(), "Stopping replay at unplayable move");
                replay.stopped = true;
            }
        }
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, replay: Replay) -> Self::Output {
        ScannedGame {
            metadata: replay.metadata,
            positions: replay.positions,
        }
    }
}

/// Streams games out of a PGN source one at a time.
pub struct GameReader<R: Read> {
    reader: Reader<R>,
    replayer: MainlineReplayer,
}

impl<R: Read> GameReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::new(source),
            replayer: MainlineReplayer,
        }
    }

    /// Read and replay the next game, or `None` at end of input.
    pub fn next_game(&mut self) -> Result<Option<ScannedGame>, ChessError> {
        Ok(self.reader.read_game(&mut self.replayer)?)
    }
}

/// Extract a string value from a PGN header (e.g. Event, FEN).
pub fn extract_header(pgn: &str, header_name: &str) -> Option<String> {
    let pattern = format!(r#"\[{}\s+"([^"]*)"\]"#, regex::escape(header_name));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(pgn)?.get(1)?.as_str().to_string();
    if value.is_empty() { None } else { Some(value) }
}

/// Split PGN text into games. A game starts at an `[Event ` line once the
/// current chunk already holds a tag line; whitespace-only chunks are dropped.
pub fn split_games(content: &str) -> Vec<String> {
    let mut games = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        let starts_game = line.trim().starts_with("[Event ");
        if starts_game && current.iter().any(|l| l.trim().starts_with('[')) {
            games.push(current.join("\n"));
            current.clear();
        }
        current.push(line);
    }
    if !current.is_empty() {
        games.push(current.join("\n"));
    }

    games
        .into_iter()
        .filter(|game| game.lines().any(|l| !l.trim().is_empty()))
        .collect()
}

/// Split a puzzle collection on blank-line triples (two empty lines between entries).
pub fn split_blocks(content: &str) -> Vec<&str> {
    content.split("\n\n\n").collect()
}

/// Text following the first `{` of a block, trimmed. Empty when there is no comment.
pub fn solution_text(block: &str) -> String {
    block
        .split_once('{')
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::to_fen;

    const TWO_GAMES: &str = r#"[Event "Club Ch"]
[White "Anna"]
[Black "Bert"]
[Date "2021.05.06"]
[Result "1-0"]

1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0

[Event "Blitz"]
[White "Carl"]
[Black "Dora"]
[Result "*"]

1. d4 {solid} d5 *
"#;

    #[test]
    fn test_game_reader_replays_mainlines() {
        let mut reader = GameReader::new(TWO_GAMES.as_bytes());

        let first = reader.next_game().unwrap().unwrap();
        assert_eq!(first.metadata.white.as_deref(), Some("Anna"));
        assert_eq!(first.metadata.date.as_deref(), Some("2021.05.06"));
        assert_eq!(first.plies(), 7);
        assert!(first.rewind(0).unwrap().is_checkmate());

        let second = reader.next_game().unwrap().unwrap();
        assert_eq!(second.metadata.event.as_deref(), Some("Blitz"));
        assert_eq!(second.plies(), 2);

        assert!(reader.next_game().unwrap().is_none());
    }

    #[test]
    fn test_game_reader_decodes_latin1_tags() {
        let mut pgn: Vec<u8> = b"[White \"M".to_vec();
        pgn.push(0xFC); // u-umlaut in ISO-8859-1
        pgn.extend_from_slice(b"ller\"]\n[Black \"X\"]\n\n1. e4 *\n");

        let mut reader = GameReader::new(pgn.as_slice());
        let game = reader.next_game().unwrap().unwrap();
        assert_eq!(game.metadata.white.as_deref(), Some("M\u{fc}ller"));
    }

    #[test]
    fn test_game_reader_starts_from_fen_tag() {
        let pgn = r#"[SetUp "1"]
[FEN "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1"]

1. Ra8# *
"#;
        let mut reader = GameReader::new(pgn.as_bytes());
        let game = reader.next_game().unwrap().unwrap();
        assert!(game.metadata.set_up);
        assert_eq!(game.plies(), 1);
        assert_eq!(
            to_fen(game.rewind(1).unwrap()),
            "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1"
        );
    }

    #[test]
    fn test_extract_header() {
        let pgn = r#"[Event "Open"]
[Site ""]"#;
        assert_eq!(extract_header(pgn, "Event").as_deref(), Some("Open"));
        assert_eq!(extract_header(pgn, "Site"), None);
        assert_eq!(extract_header(pgn, "Missing"), None);
    }

    #[test]
    fn test_split_games_on_event_tags() {
        let games = split_games(TWO_GAMES);
        assert_eq!(games.len(), 2);
        assert!(games[0].starts_with("[Event \"Club Ch\"]"));
        assert!(games[1].starts_with("[Event \"Blitz\"]"));
    }

    #[test]
    fn test_split_games_drops_blank_chunks() {
        assert!(split_games("\n\n  \n").is_empty());
    }

    #[test]
    fn test_solution_text() {
        assert_eq!(solution_text("[FEN \"x\"]\n{ 1. Qh7# }"), "1. Qh7# }");
        assert_eq!(solution_text("no comment"), "");
    }
}
