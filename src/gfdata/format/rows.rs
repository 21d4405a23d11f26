//! Fixed-width row store files.
//!
//! Reading composes the encoding resolver, the segmenter and the field
//! normalizer. Writing is the inverse: fields joined with the separator and
//! one `\n` per row, with embedded line breaks written verbatim.
//!
//! # Round-trip hazard
//!
//! A row whose field contains line breaks occupies several physical lines once
//! written. Reading the file back with the same width regroups them; reading it
//! in naive mode (no width) yields one row per physical line and silently
//! desynchronizes rows from records.

use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use log::{debug, info, warn};

use super::encoding;
use super::segment::{self, Segmenter};
use crate::gfdata::types::error::Result;
use crate::gfdata::types::models::{
    AdjustmentKind, ReadOptions, Row, RowSet, WidthAdjustment, DEFAULT_SEPARATOR,
    DEFAULT_SNIFF_LEN,
};
use crate::gfdata::utils;

/// Reads the rows of a data file.
///
/// - `encoding: None` sniffs the file contents, then tries Big5, UTF-8 and
///   windows-1252 strictly in the order the sniff suggests.
/// - `width: None` reads one row per physical line (preview only).
/// - `width: Some(n)` segments records and normalizes each to `n` fields.
///
/// # Errors
/// Returns `GfError::Io` if the file cannot be read. Malformed text is never an
/// error; undecodable bytes become U+FFFD.
pub fn read(
    path: impl AsRef<Path>,
    encoding: Option<&'static Encoding>,
    width: Option<usize>,
) -> Result<Vec<Row>> {
    let options = ReadOptions {
        encoding,
        width,
        ..ReadOptions::default()
    };
    Ok(read_detailed(path, &options)?.rows)
}

/// Reads a data file and reports everything the normalizer did.
pub fn read_detailed(path: impl AsRef<Path>, options: &ReadOptions) -> Result<RowSet> {
    let path = path.as_ref();
    info!("Reading rows from {}", path.display());
    let bytes = fs::read(path)?;

    let (text, used) = decode(&bytes, options.encoding, options.sniff_len);

    let row_set = match options.width {
        Some(width) => {
            let segmenter = Segmenter::new(options.separator);
            let (rows, adjustments) = parse_records(&text, &segmenter, width);
            RowSet {
                rows,
                encoding: used,
                preamble: segmenter.preamble(&text).to_owned(),
                adjustments,
            }
        }
        None => RowSet {
            rows: parse_lines(&text, options.separator, None),
            encoding: used,
            preamble: String::new(),
            adjustments: Vec::new(),
        },
    };

    info!(
        "Read {} rows from {} ({})",
        row_set.rows.len(),
        path.display(),
        used.name()
    );
    Ok(row_set)
}

/// Reads at most `limit` physical lines in naive mode.
pub fn read_preview(
    path: impl AsRef<Path>,
    encoding: Option<&'static Encoding>,
    limit: usize,
) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let (text, _) = decode(&bytes, encoding, DEFAULT_SNIFF_LEN);
    Ok(parse_lines(&text, DEFAULT_SEPARATOR, Some(limit)))
}

// An explicit encoding is trusted; otherwise the sniffed chain decides.
fn decode(
    bytes: &[u8],
    explicit: Option<&'static Encoding>,
    sniff_len: usize,
) -> (String, &'static Encoding) {
    match explicit {
        Some(enc) => encoding::decode_lossy(bytes, enc),
        None => encoding::decode_unknown(bytes, sniff_len),
    }
}

/// Segments and normalizes already-decoded text.
///
/// Returns the rows and one [`WidthAdjustment`] per record whose natural field
/// count differed from `width`. Truncations are logged as warnings because
/// they discard data.
pub fn parse_records(
    text: &str,
    segmenter: &Segmenter,
    width: usize,
) -> (Vec<Row>, Vec<WidthAdjustment>) {
    let mut rows = Vec::new();
    let mut adjustments = Vec::new();

    for (record_index, record) in segmenter.records(text).enumerate() {
        let normalized = segment::normalize(record, segmenter.separator(), width);
        if let Some(kind) = normalized.adjustment() {
            let adjustment = WidthAdjustment {
                record_index,
                id: normalized.row.first().cloned().unwrap_or_default(),
                found: normalized.natural_width,
                expected: width,
                kind,
            };
            match kind {
                AdjustmentKind::Truncated => warn!(
                    "Record {} (id {}) has {} fields, truncated to {}",
                    record_index, adjustment.id, adjustment.found, width
                ),
                AdjustmentKind::Padded => debug!(
                    "Record {} (id {}) has {} fields, padded to {}",
                    record_index, adjustment.id, adjustment.found, width
                ),
            }
            adjustments.push(adjustment);
        }
        rows.push(normalized.row);
    }

    (rows, adjustments)
}

fn parse_lines(text: &str, separator: char, limit: Option<usize>) -> Vec<Row> {
    text.lines()
        .take(limit.unwrap_or(usize::MAX))
        .map(|line| segment::split_line(line, separator))
        .collect()
}

/// Serializes rows: fields joined with `separator`, one `\n` after each row.
pub fn render(rows: &[Row], separator: char) -> String {
    let mut out = String::new();
    let mut sep_buf = [0u8; 4];
    let sep: &str = separator.encode_utf8(&mut sep_buf);
    for row in rows {
        out.push_str(&row.join(sep));
        out.push('\n');
    }
    out
}

/// Writes rows to `path`, replacing the file atomically.
///
/// Characters that `encoding` cannot represent are written as `?`. Parent
/// directories are created as needed.
pub fn write(path: impl AsRef<Path>, rows: &[Row], encoding: &'static Encoding) -> Result<()> {
    write_with_preamble(path, "", rows, encoding, DEFAULT_SEPARATOR)
}

/// Writes `preamble` verbatim followed by the rows.
pub fn write_with_preamble(
    path: impl AsRef<Path>,
    preamble: &str,
    rows: &[Row],
    encoding: &'static Encoding,
    separator: char,
) -> Result<()> {
    let path = path.as_ref();
    let mut text = String::with_capacity(preamble.len());
    text.push_str(preamble);
    text.push_str(&render(rows, separator));

    let bytes = encoding::encode_lossy(&text, encoding);
    utils::write_atomic(path, &bytes)?;
    info!(
        "Wrote {} rows to {} ({})",
        rows.len(),
        path.display(),
        encoding.output_encoding().name()
    );
    Ok(())
}
