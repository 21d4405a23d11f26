//! Record segmentation and field normalization.
//!
//! A line break in a data file either ends a record or belongs to a free-text
//! field. The files carry no quoting, so records are recovered with a single
//! heuristic: a record starts at every line whose first field is all digits
//! followed by the separator. Everything up to the next such line, embedded
//! breaks included, belongs to that record.
//!
//! A continuation line that happens to look like `123|...` starts a new
//! record. Writers must avoid producing such lines.
//!
//! Only spaces and tabs may precede the id. Blank lines stay with the record
//! above them, so a field ending in a line break keeps it.
//!
//! ```text
//! Start ──► ScanningForBoundary ──(match)──► EmittingRecord
//!                    │                          │   ▲
//!                  (EOF)              (next match)   │
//!                    ▼                          ▼   │
//!                  Done ◄──────(EOF)────── FinalizeRecord
//! ```

use std::sync::OnceLock;

use regex::{Matches, Regex};

use crate::gfdata::types::models::{AdjustmentKind, Row, DEFAULT_SEPARATOR};

/// Boundary pattern for the default `|` separator.
static PIPE_BOUNDARY: OnceLock<Regex> = OnceLock::new();

fn build_boundary(separator: char) -> Regex {
    let pattern = format!(r"(?m)^[ \t]*[0-9]+{}", regex::escape(&separator.to_string()));
    Regex::new(&pattern).expect("Invalid record boundary pattern")
}

/// Splits decoded text into logical records.
#[derive(Debug, Clone)]
pub struct Segmenter {
    separator: char,
    boundary: Regex,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl Segmenter {
    pub fn new(separator: char) -> Self {
        let boundary = if separator == DEFAULT_SEPARATOR {
            PIPE_BOUNDARY.get_or_init(|| build_boundary(DEFAULT_SEPARATOR)).clone()
        } else {
            build_boundary(separator)
        };
        Self { separator, boundary }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Byte offsets where records begin.
    ///
    /// An offset may point at indentation preceding the digits; it is part of
    /// the record and is trimmed from its first field by [`normalize`].
    pub fn boundaries(&self, text: &str) -> Vec<usize> {
        self.boundary.find_iter(text).map(|m| m.start()).collect()
    }

    /// Text before the first record boundary, or all of it when there is none.
    pub fn preamble<'t>(&self, text: &'t str) -> &'t str {
        match self.boundary.find(text) {
            Some(m) => &text[..m.start()],
            None => text,
        }
    }

    /// Iterates over the logical records of `text`.
    pub fn records<'r, 't>(&'r self, text: &'t str) -> Records<'r, 't> {
        let mut matches = self.boundary.find_iter(text);
        let current = matches.next().map(|m| m.start());
        Records { text, matches, current }
    }
}

/// Iterator over logical records, each with its final line terminator removed.
///
/// Created by [`Segmenter::records`].
pub struct Records<'r, 't> {
    text: &'t str,
    matches: Matches<'r, 't>,
    current: Option<usize>,
}

impl<'r, 't> Iterator for Records<'r, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.current?;
        let end = match self.matches.next() {
            Some(m) => {
                self.current = Some(m.start());
                m.start()
            }
            None => {
                self.current = None;
                self.text.len()
            }
        };
        Some(strip_line_terminator(&self.text[start..end]))
    }
}

/// Removes one trailing `\n` or `\r\n`.
pub fn strip_line_terminator(s: &str) -> &str {
    match s.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => s,
    }
}

/// A record split into exactly `width` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub row: Row,
    /// Field count before padding or truncation.
    pub natural_width: usize,
}

impl Normalized {
    pub fn adjustment(&self) -> Option<AdjustmentKind> {
        use std::cmp::Ordering;
        match self.natural_width.cmp(&self.row.len()) {
            Ordering::Less => Some(AdjustmentKind::Padded),
            Ordering::Greater => Some(AdjustmentKind::Truncated),
            Ordering::Equal => None,
        }
    }
}

/// Splits a record on `separator` and forces it to `width` fields.
///
/// Short records are padded with empty fields. Long records are truncated and
/// the excess is discarded; callers learn about it through
/// [`Normalized::adjustment`]. Leading whitespace and line breaks are trimmed
/// from the first field only.
pub fn normalize(record: &str, separator: char, width: usize) -> Normalized {
    let mut row: Row = record.split(separator).map(str::to_owned).collect();
    let natural_width = row.len();
    row.resize(width, String::new());
    if let Some(first) = row.first_mut() {
        let trimmed = first.trim_start();
        if trimmed.len() != first.len() {
            *first = trimmed.to_owned();
        }
    }
    Normalized { row, natural_width }
}

/// Splits a single physical line without any width handling (naive mode).
pub fn split_line(line: &str, separator: char) -> Row {
    strip_line_terminator(line)
        .split(separator)
        .map(str::to_owned)
        .collect()
}
