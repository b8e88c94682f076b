//! Theme tags: query parsing, vocabulary validation and row filtering.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::{Result, SheetError};

/// Column index of the space-separated theme list in the puzzle database.
pub const THEMES_COLUMN: usize = 7;

/// The set of theme tags the puzzle database is known to use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeVocabulary {
    themes: Vec<String>,
}

impl ThemeVocabulary {
    pub fn new(themes: Vec<String>) -> Self {
        Self { themes }
    }

    pub fn parse(text: &str) -> Self {
        Self::new(text.split_whitespace().map(String::from).collect())
    }

    /// Load a whitespace-delimited vocabulary file. A missing file yields `None`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::parse(&fs::read_to_string(path)?)))
    }

    pub fn contains(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }

    pub fn themes(&self) -> &[String] {
        &self.themes
    }
}

/// Whether requested themes are checked against a vocabulary before filtering.
#[derive(Debug, Clone)]
pub enum ThemeCheck {
    Strict(ThemeVocabulary),
    Permissive,
}

impl ThemeCheck {
    /// Strict when the vocabulary file exists, permissive (with a warning) otherwise.
    pub fn from_file(path: &Path) -> Result<Self> {
        match ThemeVocabulary::load(path)? {
            Some(vocabulary) => Ok(ThemeCheck::Strict(vocabulary)),
            None => {
                warn!(path = %path.display(), "Themes file not found; skipping validation");
                Ok(ThemeCheck::Permissive)
            }
        }
    }

    /// Reject the query if any tag is unknown, reporting every unknown tag at once.
    pub fn check(&self, requested: &[String]) -> Result<()> {
        let ThemeCheck::Strict(vocabulary) = self else {
            return Ok(());
        };
        let invalid = validate(requested, vocabulary);
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(SheetError::InvalidThemes {
                invalid,
                valid: vocabulary.themes().to_vec(),
            })
        }
    }
}

/// Split a comma-separated theme argument into trimmed, non-empty tags.
pub fn parse_theme_query(query: &str) -> Vec<String> {
    query
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Tags not present in the vocabulary, in request order.
pub fn validate(requested: &[String], vocabulary: &ThemeVocabulary) -> Vec<String> {
    requested
        .iter()
        .filter(|tag| !vocabulary.contains(tag))
        .cloned()
        .collect()
}

/// Keep rows whose theme field contains every tag.
///
/// Matching is by substring, so `mate` also keeps rows tagged only `mateIn2`.
/// This may over-match tags that prefix other tags; see DESIGN.md.
pub fn filter_rows<T>(rows: Vec<T>, tags: &[String], themes_of: impl Fn(&T) -> &str) -> Vec<T> {
    tags.iter().fold(rows, |kept, tag| {
        kept.into_iter()
            .filter(|row| themes_of(row).contains(tag.as_str()))
            .collect()
    })
}

/// Sorted unique theme tokens found in a puzzle database.
pub fn extract_unique_themes(db_path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(db_path)?;

    let mut themes = BTreeSet::new();
    for record in reader.records() {
        let record = record?;
        if record.is_empty() || record.get(0) == Some("PuzzleId") || record.len() <= THEMES_COLUMN {
            continue;
        }
        let field = record.get(THEMES_COLUMN).unwrap_or("").trim();
        themes.extend(field.split_whitespace().map(String::from));
    }

    Ok(themes.into_iter().collect())
}
