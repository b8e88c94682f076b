//! LaTeX puzzle sheet: preamble, two-column figure layout, compilation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{info, warn};

use crate::candidate::AcceptedPuzzle;
use crate::console::Console;
use crate::error::Result;

/// Sheet details given on the command line; missing ones are asked for.
#[derive(Debug, Clone, Default)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub squad: Option<String>,
    pub blurb: Option<String>,
    pub author: Option<String>,
}

/// Fully resolved header text for a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetHeader {
    pub title: String,
    pub squad: String,
    pub blurb: String,
    /// Right-hand page header: `author, year` or just the year.
    pub right_header: String,
}

impl DocumentMeta {
    pub fn resolve(self, console: &mut dyn Console, year: i32) -> Result<SheetHeader> {
        let mut ask_if_missing = |value: Option<String>, prompt: &str| match value {
            Some(v) => Ok(v),
            None => console.ask(prompt),
        };
        let title = ask_if_missing(self.title, "Enter a title for the puzzle sheet: ")?;
        let squad = ask_if_missing(self.squad, "Enter the squad name: ")?;
        let blurb = ask_if_missing(self.blurb, "Enter a blurb for the puzzle sheet: ")?;

        let author = self.author.unwrap_or_default();
        let author = author.trim();
        let right_header = if author.is_empty() {
            year.to_string()
        } else {
            format!("{author}, {year}")
        };

        Ok(SheetHeader {
            title,
            squad,
            blurb,
            right_header,
        })
    }
}

/// Where a cell sits in the figure cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub opens_figure: bool,
    pub closes_figure: bool,
    pub vspace: &'static str,
}

/// Layout for the cell at `idx`: the first figure holds four boards, later ones six.
pub fn slot_for(idx: usize) -> Slot {
    let later = idx > 6;
    let (opens_figure, closes_figure, vspace) = match idx {
        0 => (true, false, "12ex"),
        1 => (false, false, "12ex"),
        _ if idx == 2 || (later && idx % 6 <= 2) => (false, false, "4ex"),
        _ if idx == 3 || (later && idx % 6 == 3) => (false, true, "4ex"),
        _ if idx == 4 || (later && idx % 6 == 4) => (true, false, "4ex"),
        _ => (false, false, "4ex"),
    };
    Slot {
        opens_figure,
        closes_figure,
        vspace,
    }
}

/// One board on the sheet.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Image path relative to the document, with `/` separators.
    pub image: String,
    pub caption: String,
}

fn preamble(header: &SheetHeader) -> String {
    format!(
        r"\documentclass[12pt]{{article}}
\usepackage[english]{{babel}}
\usepackage{{graphicx}}
\usepackage{{framed}}
\usepackage[normalem]{{ulem}}
\usepackage{{amsmath}}
\usepackage{{amsthm}}
\usepackage{{amssymb}}
\usepackage{{amsfonts}}
\usepackage{{enumerate}}
\usepackage[utf8]{{inputenc}}
\usepackage{{natbib}}
\usepackage{{tikz}}
\usepackage{{float}}
\usepackage{{caption}}
\usepackage{{subcaption}}
\usepackage{{sidenotes}}
\usepackage{{tgbonum}}
\usepackage[a4paper,
            bindingoffset=0in,
            left=0.5in,
            right=0.5in,
            top=0.8in,
            bottom=0.5in,
            footskip=.25in]{{geometry}}
\usepackage{{fancyhdr}}
\fancypagestyle{{plain}}{{%
\fancyhf{{}}
\fancyhead[RE,LO]{{{squad}}}
\fancyhead[LE,RO]{{{right}}}
\fancyfoot[C]{{\thepage}}
\renewcommand{{\headrulewidth}}{{0pt}}
\renewcommand{{\footrulewidth}}{{0pt}}}}
\pagestyle{{plain}}
\date{{}}
\title{{{title}}}
\captionsetup{{
justification=centering,
singlelinecheck=false,
format=plain,
labelsep=colon
}}
\begin{{document}}
\maketitle
\centering{{{blurb}}}
",
        squad = header.squad,
        right = header.right_header,
        title = header.title,
        blurb = header.blurb,
    )
}

fn cell_tex(cell: &Cell, vspace: &str) -> String {
    format!(
        "\\begin{{minipage}}[b]{{0.5\\linewidth}}\n\
         \\centering\n\
         \\includegraphics[width=7cm, height=7cm]{{{image}}}\\caption*{{{caption}}}\n\
         \\vspace{{{vspace}}}\n\
         \\end{{minipage}}\n",
        image = cell.image,
        caption = cell.caption,
    )
}

/// Complete LaTeX source for a sheet.
pub fn render_tex(header: &SheetHeader, cells: &[Cell]) -> String {
    let mut tex = preamble(header);
    let mut figure_open = false;

    for (idx, cell) in cells.iter().enumerate() {
        let slot = slot_for(idx);
        if slot.opens_figure {
            tex.push_str("\\begin{figure}[ht]\n");
            figure_open = true;
        }
        tex.push_str(&cell_tex(cell, slot.vspace));
        if slot.closes_figure {
            tex.push_str("\\end{figure}\n");
            figure_open = false;
        }
    }

    if figure_open {
        tex.push_str("\\end{figure}\n");
    }
    tex.push_str("\\end{document}\n");
    tex
}

/// File stem for a theme query: commas and spaces become underscores.
pub fn tex_stem(theme: &str) -> String {
    if theme.is_empty() {
        "puzzles".to_string()
    } else {
        theme.replace([',', ' '], "_")
    }
}

/// Path relative to `base` with `/` separators, as LaTeX expects.
pub fn relative_ref(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn write_tex(path: &Path, header: &SheetHeader, cells: &[Cell]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_tex(header, cells))?;
    info!(path = %path.display(), cells = cells.len(), "Wrote LaTeX source");
    Ok(())
}

#[derive(Debug, Serialize)]
struct ManifestEntry<'a> {
    index: usize,
    fen: &'a str,
    caption: &'a str,
    url: &'a str,
    themes: &'a [String],
}

/// Write `puzzles.json` describing every puzzle on the sheet.
pub fn write_manifest(output_dir: &Path, puzzles: &[AcceptedPuzzle]) -> Result<PathBuf> {
    let entries: Vec<ManifestEntry<'_>> = puzzles
        .iter()
        .enumerate()
        .map(|(index, p)| ManifestEntry {
            index,
            fen: &p.fen,
            caption: &p.caption,
            url: &p.candidate.url,
            themes: &p.candidate.themes,
        })
        .collect();

    let path = output_dir.join("puzzles.json");
    fs::write(&path, serde_json::to_string_pretty(&entries)?)?;
    Ok(path)
}

/// Run pdflatex next to the source. Never fails; returns the PDF if one exists afterwards.
pub fn compile_pdf(tex_path: &Path) -> Option<PathBuf> {
    let dir = tex_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = tex_path.file_name()?;

    match Command::new("pdflatex")
        .arg("-interaction=nonstopmode")
        .arg(file_name)
        .current_dir(dir)
        .status()
    {
        Ok(status) if !status.success() => {
            warn!(%status, tex = %tex_path.display(), "pdflatex reported errors");
        }
        Ok(_) => info!(tex = %tex_path.display(), "Compiled PDF"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("pdflatex not found; skipping PDF generation");
        }
        Err(e) => warn!(error = %e, "Failed to run pdflatex"),
    }

    let pdf = tex_path.with_extension("pdf");
    pdf.exists().then_some(pdf)
}

pub fn open_pdf(pdf: &Path) {
    if let Err(e) = open::that(pdf) {
        warn!(pdf = %pdf.display(), error = %e, "Failed to open PDF");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;

    fn header() -> SheetHeader {
        SheetHeader {
            title: "Forks".into(),
            squad: "Juniors".into(),
            blurb: "Find the best move.".into(),
            right_header: "2026".into(),
        }
    }

    fn cells(n: usize) -> Vec<Cell> {
        (0..n)
            .map(|i| Cell {
                image: format!("images/puzzle_{i}.png"),
                caption: format!("c{i}"),
            })
            .collect()
    }

    #[test]
    fn test_slot_cadence() {
        let opens: Vec<usize> = (0..20).filter(|&i| slot_for(i).opens_figure).collect();
        let closes: Vec<usize> = (0..20).filter(|&i| slot_for(i).closes_figure).collect();
        assert_eq!(opens, vec![0, 4, 10, 16]);
        assert_eq!(closes, vec![3, 9, 15]);
        assert_eq!(slot_for(0).vspace, "12ex");
        assert_eq!(slot_for(1).vspace, "12ex");
        assert_eq!(slot_for(2).vspace, "4ex");
        assert_eq!(slot_for(6), slot_for(5));
    }

    #[test]
    fn test_figures_balance() {
        for n in 1..20 {
            let tex = render_tex(&header(), &cells(n));
            assert_eq!(
                tex.matches("\\begin{figure}").count(),
                tex.matches("\\end{figure}").count(),
                "unbalanced figures for {n} cells"
            );
            assert!(tex.ends_with("\\end{document}\n"));
        }
    }

    #[test]
    fn test_render_tex_contents() {
        let tex = render_tex(&header(), &cells(2));
        assert!(tex.contains("\\title{Forks}"));
        assert!(tex.contains("\\fancyhead[RE,LO]{Juniors}"));
        assert!(tex.contains("\\fancyhead[LE,RO]{2026}"));
        assert!(tex.contains("\\centering{Find the best move.}"));
        assert!(tex.contains(
            "\\includegraphics[width=7cm, height=7cm]{images/puzzle_1.png}\\caption*{c1}"
        ));
        assert_eq!(tex.matches("\\vspace{12ex}").count(), 2);
    }

    #[test]
    fn test_meta_prompts_for_missing_fields() {
        let meta = DocumentMeta {
            title: Some("Mates".into()),
            author: Some("  Coach ".into()),
            ..DocumentMeta::default()
        };
        let mut console = ScriptedConsole::new(["Seniors", "Have fun"]);
        let header = meta.resolve(&mut console, 2024).unwrap();
        assert_eq!(header.title, "Mates");
        assert_eq!(header.squad, "Seniors");
        assert_eq!(header.blurb, "Have fun");
        assert_eq!(header.right_header, "Coach, 2024");
        assert_eq!(
            console.transcript(),
            ["Enter the squad name: ", "Enter a blurb for the puzzle sheet: "]
        );
    }

    #[test]
    fn test_year_only_header() {
        let meta = DocumentMeta {
            title: Some(String::new()),
            squad: Some(String::new()),
            blurb: Some(String::new()),
            author: None,
        };
        let header = meta.resolve(&mut ScriptedConsole::default(), 2025).unwrap();
        assert_eq!(header.right_header, "2025");
    }

    #[test]
    fn test_tex_stem() {
        assert_eq!(tex_stem("fork,pin"), "fork_pin");
        assert_eq!(tex_stem("mate in 2"), "mate_in_2");
        assert_eq!(tex_stem(""), "puzzles");
    }

    #[test]
    fn test_relative_ref() {
        let base = Path::new("out");
        assert_eq!(
            relative_ref(&base.join("images").join("puzzle_0.png"), base),
            "images/puzzle_0.png"
        );
    }
}
