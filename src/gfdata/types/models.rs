//! Core data structures shared by the stores and codecs.
//!
//! This module defines:
//! - Rows and read options for the pipe-delimited row stores
//! - Width adjustment reports produced by the field normalizer
//! - Translation records

use encoding_rs::Encoding;

/// Field separator used by every data and translation file shipped with the game.
pub const DEFAULT_SEPARATOR: char = '|';

/// Number of bytes sampled when guessing a file's encoding.
pub const DEFAULT_SNIFF_LEN: usize = 4096;

/// One logical record, split into fields.
pub type Row = Vec<String>;

/// Options controlling how a row store file is read.
///
/// `width: None` selects naive mode (one row per physical line). Any other
/// value enables record segmentation and normalizes every row to that width.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub separator: char,
    pub width: Option<usize>,
    /// Explicit text encoding. When absent the encoding is guessed from the file.
    pub encoding: Option<&'static Encoding>,
    pub sniff_len: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            width: None,
            encoding: None,
            sniff_len: DEFAULT_SNIFF_LEN,
        }
    }
}

impl ReadOptions {
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }
}

/// How the normalizer changed a record to reach the declared width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentKind {
    /// Missing trailing fields were filled with `""`.
    Padded,
    /// Extra trailing fields were dropped. Their content is lost.
    Truncated,
}

/// A record whose natural field count differed from the declared width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidthAdjustment {
    /// Position of the record in the file (0-based, logical records).
    pub record_index: usize,
    /// The record's first field after trimming.
    pub id: String,
    pub found: usize,
    pub expected: usize,
    pub kind: AdjustmentKind,
}

/// The complete outcome of reading a row store file.
#[derive(Debug, Clone)]
pub struct RowSet {
    pub rows: Vec<Row>,
    pub encoding: &'static Encoding,
    /// Text preceding the first record boundary (header line, comments).
    pub preamble: String,
    pub adjustments: Vec<WidthAdjustment>,
}

impl RowSet {
    /// Records that lost fields during normalization.
    pub fn truncated(&self) -> impl Iterator<Item = &WidthAdjustment> {
        self.adjustments
            .iter()
            .filter(|a| a.kind == AdjustmentKind::Truncated)
    }
}

/// One entry of a translation file.
///
/// The description is kept as raw physical lines, exactly as loaded; display
/// sanitization happens on lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRecord {
    pub id: u64,
    /// The id field as it appears in the file, leading zeros and indentation
    /// included. Written back verbatim.
    pub id_text: String,
    pub name: String,
    pub description: Vec<String>,
}
