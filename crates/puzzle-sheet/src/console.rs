//! Terminal interaction: prompts, answers and puzzle links.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::error::{Result, SheetError};

/// Line-oriented user interaction.
pub trait Console {
    /// Print a full line.
    fn say(&mut self, line: &str) -> Result<()>;

    /// Print a prompt (no newline) and read one line, without the line ending.
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Console over the process's stdin/stdout.
pub struct StdConsole {
    stdin: io::StdinLock<'static>,
    stdout: io::Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin().lock(),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.stdout, "{line}")?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.stdout, "{prompt}")?;
        self.stdout.flush()?;

        let mut answer = String::new();
        if self.stdin.read_line(&mut answer)? == 0 {
            return Err(SheetError::Input("unexpected end of input".into()));
        }
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Console fed from a fixed list of answers. Records everything it prints.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Every line and prompt printed so far, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn say(&mut self, line: &str) -> Result<()> {
        self.transcript.push(line.to_string());
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.transcript.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| SheetError::Input(format!("no scripted answer for {prompt:?}")))
    }
}

/// Shows a puzzle's reference link to the user.
pub trait LinkOpener {
    fn show(&mut self, url: &str, console: &mut dyn Console) -> Result<()>;
}

/// Opens links in the default browser.
pub struct BrowserOpener;

impl LinkOpener for BrowserOpener {
    fn show(&mut self, url: &str, console: &mut dyn Console) -> Result<()> {
        if let Err(e) = open::that(url) {
            warn!(url, error = %e, "Failed to open browser");
            console.say(&format!("URL: {url}"))?;
        }
        Ok(())
    }
}

/// Prints links instead of opening them.
pub struct PrintLinks;

impl LinkOpener for PrintLinks {
    fn show(&mut self, url: &str, console: &mut dyn Console) -> Result<()> {
        console.say(&format!("URL: {url}"))
    }
}
