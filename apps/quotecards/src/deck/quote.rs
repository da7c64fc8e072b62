//! Record model: CSV rows → `RawRow` → `Quote`, with the retired-marker filter.
//!
//! Column contract (after the header row, which is always dropped):
//! - field 0 is the quote text
//! - field 1 is the attribution, but only when the row has 3 or more fields
//! - the last field is the filter marker; a non-blank marker retires the row
//!
//! A 1-field row therefore uses its only field as both text and marker.

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::debug;

use crate::errors::CardError;

// ────────────────────────────────────────────────────────────────────────────
// Raw rows
// ────────────────────────────────────────────────────────────────────────────

/// A data row classified by field count, so positional meaning is decided once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRow {
    /// One field. It is also the filter marker.
    Single { contents: String },
    /// Two fields: text and marker. Never carries an attribution.
    Marked { contents: String, marker: String },
    /// Three or more fields: text, attribution, …, marker (last field).
    Attributed {
        contents: String,
        attribution: String,
        marker: String,
    },
}

impl RawRow {
    /// Classifies a row by its field count. An empty field list reads as a
    /// single blank field, which is kept and then fails the contents check.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> RawRow {
        let field = |i: usize| fields[i].as_ref().to_string();
        match fields.len() {
            0 => RawRow::Single {
                contents: String::new(),
            },
            1 => RawRow::Single { contents: field(0) },
            2 => RawRow::Marked {
                contents: field(0),
                marker: field(1),
            },
            n => RawRow::Attributed {
                contents: field(0),
                attribution: field(1),
                marker: field(n - 1),
            },
        }
    }

    #[cfg(test)]
    pub fn contents(&self) -> &str {
        match self {
            RawRow::Single { contents }
            | RawRow::Marked { contents, .. }
            | RawRow::Attributed { contents, .. } => contents,
        }
    }

    pub fn filter_marker(&self) -> &str {
        match self {
            RawRow::Single { contents } => contents,
            RawRow::Marked { marker, .. } | RawRow::Attributed { marker, .. } => marker,
        }
    }

    /// A row is retired (kept out of the deck) when its marker is non-blank.
    pub fn is_retired(&self) -> bool {
        !self.filter_marker().trim().is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Quote
// ────────────────────────────────────────────────────────────────────────────

/// One flashcard's worth of text. Immutable once built.
///
/// `contents` is always non-blank and trimmed. `attribution` is `None` when the
/// row had no attribution column or the column was blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    contents: String,
    attribution: Option<String>,
    filter_marker: String,
}

impl Quote {
    /// Builds a quote from a classified row, enforcing the non-blank contents rule.
    pub fn from_row(row: RawRow) -> Result<Quote, String> {
        let filter_marker = row.filter_marker().to_string();
        let (contents, attribution) = match row {
            RawRow::Single { contents } | RawRow::Marked { contents, .. } => (contents, None),
            RawRow::Attributed {
                contents,
                attribution,
                ..
            } => {
                let attribution = attribution.trim();
                let attribution = (!attribution.is_empty()).then(|| attribution.to_string());
                (contents, attribution)
            }
        };

        let contents = contents.trim();
        if contents.is_empty() {
            return Err("row has no quote text".to_string());
        }

        Ok(Quote {
            contents: contents.to_string(),
            attribution,
            filter_marker,
        })
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn attribution(&self) -> Option<&str> {
        self.attribution.as_deref()
    }

    #[cfg(test)]
    pub fn filter_marker(&self) -> &str {
        &self.filter_marker
    }

    pub fn has_attribution(&self) -> bool {
        self.attribution.is_some()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

/// Result of parsing one input file: accepted quotes in file order plus the
/// number of retired rows that were skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedDeck {
    pub accepted: Vec<Quote>,
    pub rejected: usize,
}

/// Parses CSV bytes into a deck. The first row is discarded unconditionally.
///
/// Fails on malformed CSV (including invalid UTF-8) and on accepted rows
/// without quote text. Retired rows are never validated beyond CSV syntax.
pub fn parse_deck(input: &[u8]) -> Result<ParsedDeck, CardError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .quote(b'"')
        .from_reader(input);

    let mut deck = ParsedDeck::default();
    let mut record = StringRecord::new();
    let mut seen_header = false;

    while reader.read_record(&mut record)? {
        if !seen_header {
            seen_header = true;
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields: Vec<&str> = record.iter().collect();
        let row = RawRow::from_fields(&fields);

        if row.is_retired() {
            debug!(line, marker = row.filter_marker(), "skipping retired row");
            deck.rejected += 1;
            continue;
        }

        let quote = Quote::from_row(row).map_err(|reason| CardError::Parse { line, reason })?;
        deck.accepted.push(quote);
    }

    Ok(deck)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
