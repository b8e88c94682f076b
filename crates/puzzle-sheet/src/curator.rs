//! Interactive curation loop: offer candidates, collect accepts and comments,
//! optionally reorder the result.

use tracing::{debug, info};

use crate::candidate::{format_caption, AcceptedPuzzle};
use crate::console::{Console, LinkOpener};
use crate::error::{Result, SheetError};
use crate::sources::PositionSource;

#[derive(Debug, Clone)]
pub struct CuratorOptions {
    /// Ask whether to reorder once the session is over.
    pub offer_reorder: bool,
    /// Give up after this many invalid answers to a single prompt.
    pub max_attempts: Option<usize>,
}

impl Default for CuratorOptions {
    fn default() -> Self {
        Self {
            offer_reorder: true,
            max_attempts: None,
        }
    }
}

/// Run a curation session until the source's quota is met or it runs dry.
pub fn curate(
    source: &mut dyn PositionSource,
    console: &mut dyn Console,
    links: &mut dyn LinkOpener,
    options: &CuratorOptions,
) -> Result<Vec<AcceptedPuzzle>> {
    let quota = source.quota();
    let mut accepted: Vec<AcceptedPuzzle> = Vec::new();
    let mut offered = 0usize;

    while !quota.is_met(accepted.len()) {
        let Some(candidate) = source.next_candidate()? else {
            debug!("Source exhausted");
            break;
        };
        offered += 1;
        let number = accepted.len() + 1;

        console.say(&format!("Puzzle {number}:"))?;
        if !candidate.themes.is_empty() {
            console.say(&candidate.themes.join(" "))?;
        }
        links.show(&candidate.url, console)?;

        if validate_choice(console, options.max_attempts)? {
            let fen = candidate.puzzle_fen()?;
            let comment = console.ask(&format!("Enter a comment for puzzle {number}: "))?;
            let caption = format_caption(candidate.byline.as_ref(), &comment);
            accepted.push(AcceptedPuzzle {
                fen,
                caption,
                candidate,
            });
        } else {
            console.say("Puzzle rejected.")?;
        }
    }

    info!(offered, accepted = accepted.len(), "Curation finished");

    if options.offer_reorder && !accepted.is_empty() {
        let answer = console.ask("Would you like to reorder the puzzles? (yes/no): ")?;
        if answer.trim().eq_ignore_ascii_case("yes") {
            let input =
                console.ask("Enter the puzzle numbers in the new order, comma-separated: ")?;
            let order = parse_order(&input, accepted.len())?;
            accepted = reorder(accepted, &order);
        }
    }

    Ok(accepted)
}

/// Ask until the answer is `1` (accept) or `0` (reject).
pub fn validate_choice(console: &mut dyn Console, max_attempts: Option<usize>) -> Result<bool> {
    let mut attempts = 0usize;
    loop {
        match console
            .ask("Enter 1 to select this puzzle, 0 to pick another one: ")?
            .trim()
        {
            "1" => return Ok(true),
            "0" => return Ok(false),
            _ => {
                console.say("Invalid choice.")?;
                attempts += 1;
                if max_attempts.is_some_and(|max| attempts >= max) {
                    return Err(SheetError::Input(format!(
                        "no valid choice after {attempts} attempts"
                    )));
                }
            }
        }
    }
}

/// Pre-session question; an empty answer means yes.
pub fn confirm_browser_open(console: &mut dyn Console) -> Result<bool> {
    let answer = console.ask("Open browser tabs for puzzles? [Y/n]: ")?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "" | "y" | "yes"
    ))
}

/// Parse a 1-based, comma-separated permutation of `1..=len` into 0-based indices.
pub fn parse_order(input: &str, len: usize) -> Result<Vec<usize>> {
    let mut seen = vec![false; len];
    let mut order = Vec::with_capacity(len);

    for part in input.split(',') {
        let part = part.trim();
        let number: usize = part
            .parse()
            .map_err(|_| SheetError::Reorder(format!("{part:?} is not a puzzle number")))?;
        if number == 0 || number > len {
            return Err(SheetError::Reorder(format!(
                "puzzle {number} is out of range 1..={len}"
            )));
        }
        if std::mem::replace(&mut seen[number - 1], true) {
            return Err(SheetError::Reorder(format!("puzzle {number} listed twice")));
        }
        order.push(number - 1);
    }

    if order.len() != len {
        let missing: Vec<String> = seen
            .iter()
            .enumerate()
            .filter(|(_, s)| !**s)
            .map(|(i, _)| (i + 1).to_string())
            .collect();
        return Err(SheetError::Reorder(format!(
            "missing puzzle(s) {}",
            missing.join(", ")
        )));
    }

    Ok(order)
}

/// Permute `items` so that position `k` holds `items[order[k]]`.
pub fn reorder<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots[i].take()).collect()
}
