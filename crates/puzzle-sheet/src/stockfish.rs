//! Stockfish engine wrapper using the UCI protocol (blocking I/O)

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use tracing::debug;

use crate::error::{Result, SheetError};

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub fn new(path: &Path) -> Result<Self> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                SheetError::Engine(format!("Failed to spawn Stockfish at {}: {e}", path.display()))
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| SheetError::Engine("Stockfish stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| SheetError::Engine("Stockfish stdout unavailable".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
        };

        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;

        Ok(engine)
    }

    /// Send a command to Stockfish
    fn send(&mut self, cmd: &str) -> Result<()> {
        debug!(cmd, "SF <");
        writeln!(self.stdin, "{cmd}")
            .and_then(|_| self.stdin.flush())
            .map_err(|e| SheetError::Engine(format!("Failed to write to Stockfish: {e}")))
    }

    /// Read one line; end of stream is an error since the engine never closes first.
    fn read_line(&mut self, line: &mut String) -> Result<()> {
        line.clear();
        let read = self
            .stdout
            .read_line(line)
            .map_err(|e| SheetError::Engine(format!("Failed to read from Stockfish: {e}")))?;
        if read == 0 {
            return Err(SheetError::Engine("Stockfish closed its output".into()));
        }
        Ok(())
    }

    /// Wait for a specific response line
    fn wait_for(&mut self, expected: &str) -> Result<()> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line)?;
            let trimmed = line.trim();
            debug!(line = trimmed, "SF >");
            if trimmed == expected {
                return Ok(());
            }
        }
    }

    /// Search `fen` to `depth` and return the mate distance from the final
    /// principal variation (side to move's view), if the score is a mate.
    pub fn mate_search(&mut self, fen: &str, depth: u32) -> Result<Option<i32>> {
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go depth {depth}"))?;

        let mut mate = None;
        let mut line = String::new();
        loop {
            self.read_line(&mut line)?;
            let trimmed = line.trim();

            if trimmed.starts_with("info") && trimmed.contains(" pv ") {
                if parse_cp(trimmed).is_some() {
                    mate = None;
                }
                if let Some(m) = parse_mate(trimmed) {
                    mate = Some(m);
                }
            } else if trimmed.starts_with("bestmove") {
                break;
            }
        }

        Ok(mate)
    }

    /// Send quit command and wait for process to exit
    pub fn quit(mut self) {
        let _ = self.send("quit");
        let _ = self.process.wait();
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // No-op once `quit` has reaped the process.
        let _ = self.process.kill();
    }
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    parse_after(line, "cp")
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    parse_after(line, "mate")
}

fn parse_after(line: &str, keyword: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    parts
        .iter()
        .position(|part| *part == keyword)
        .and_then(|i| parts.get(i + 1))
        .and_then(|value| value.parse().ok())
}
