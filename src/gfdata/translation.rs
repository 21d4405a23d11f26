//! Translation files (`T_*.ini`).
//!
//! A translation file maps record ids to a display name and a free-text
//! description. Layout:
//!
//! ```text
//! ; optional header lines, kept verbatim
//! 1001|Short Sword|A plain blade.|
//! 1002|Potion|Restores health.
//! $12$Cannot be used in battle.
//! Stacks up to 99.|
//! 1003|Arrow||
//! ```
//!
//! A record starts at a line matching `^\s*<digits>|`. The description begins
//! after the second separator and runs over the following lines until the next
//! record start. The last description line ends with a `|` marking the end of
//! the record. Ids are looked up numerically, so `0042` answers to 42, but are
//! written back as they were found.
//!
//! The raw lines are kept as loaded. Display clean-up (annotation tokens,
//! quotes, stray separators) happens in [`TranslationStore::get`] only, so a
//! load/save cycle does not rewrite descriptions nobody edited.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use encoding_rs::Encoding;
use log::{debug, info, warn};
use regex::Regex;

use crate::gfdata::format::encoding;
use crate::gfdata::types::error::Result;
use crate::gfdata::types::models::{TranslationRecord, DEFAULT_SEPARATOR};
use crate::gfdata::utils;

/// Record start for the default `|` separator; captures the id.
static PIPE_RECORD_START: OnceLock<Regex> = OnceLock::new();

/// `$12$`-style annotation tokens found in translation dumps.
static ANNOTATION_TOKEN: OnceLock<Regex> = OnceLock::new();

fn record_start(separator: char) -> Regex {
    if separator == DEFAULT_SEPARATOR {
        return PIPE_RECORD_START
            .get_or_init(|| build_record_start(DEFAULT_SEPARATOR))
            .clone();
    }
    build_record_start(separator)
}

fn build_record_start(separator: char) -> Regex {
    let pattern = format!(r"^\s*([0-9]+){}", regex::escape(&separator.to_string()));
    Regex::new(&pattern).expect("Invalid translation record pattern")
}

fn annotation_regex() -> &'static Regex {
    ANNOTATION_TOKEN.get_or_init(|| Regex::new(r"\$[0-9]+\$").expect("Invalid annotation pattern"))
}

/// File name of the translation file for a data source: `T_ItemMall.ini` for
/// item-mall tables, `T_Item.ini` for everything else, under
/// `<lib_base>/Translate/`.
pub fn translation_path(lib_base: impl AsRef<Path>, source_name: &str) -> PathBuf {
    let lower = source_name.to_ascii_lowercase();
    let file_name = if lower.contains("itemmall") || lower.contains("item_mall") {
        "T_ItemMall.ini"
    } else {
        "T_Item.ini"
    };
    lib_base.as_ref().join("Translate").join(file_name)
}

/// One translation file loaded in memory.
#[derive(Debug, Clone)]
pub struct TranslationStore {
    path: PathBuf,
    encoding: &'static Encoding,
    separator: char,
    header_lines: Vec<String>,
    records: Vec<TranslationRecord>,
}

impl TranslationStore {
    /// Loads the translation file at `path`.
    ///
    /// A missing file is an empty store; it is created on [`save`](Self::save).
    ///
    /// # Errors
    /// Returns `GfError::Io` for any other read failure.
    pub fn load(path: impl AsRef<Path>, encoding: &'static Encoding) -> Result<Self> {
        Self::load_with_separator(path, encoding, DEFAULT_SEPARATOR)
    }

    pub fn load_with_separator(
        path: impl AsRef<Path>,
        encoding: &'static Encoding,
        separator: char,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut store = Self {
            path: path.to_path_buf(),
            encoding,
            separator,
            header_lines: Vec::new(),
            records: Vec::new(),
        };

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Translation file {} does not exist yet", path.display());
                return Ok(store);
            }
            Err(e) => return Err(e.into()),
        };

        let (text, _) = encoding::decode_lossy(&bytes, encoding);
        let (header_lines, records) = parse(&text, separator);
        store.header_lines = header_lines;
        store.records = records;
        info!(
            "Loaded {} translations from {}",
            store.records.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header_lines(&self) -> &[String] {
        &self.header_lines
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in physical file order.
    pub fn iter(&self) -> impl Iterator<Item = &TranslationRecord> {
        self.records.iter()
    }

    /// Raw records keyed by id.
    pub fn to_map(&self) -> BTreeMap<u64, (String, Vec<String>)> {
        self.records
            .iter()
            .map(|r| (r.id, (r.name.clone(), r.description.clone())))
            .collect()
    }

    pub fn find_index(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// The record exactly as loaded or last set.
    pub fn raw(&self, id: u64) -> Option<&TranslationRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Display form of a translation: `(name, description)` with annotation
    /// tokens, trailing separators and surrounding quotes removed.
    ///
    /// Returns `None` when the id has no translation.
    pub fn get(&self, id: u64) -> Option<(String, String)> {
        let record = self.raw(id)?;
        let description = record.description.join("\n");
        Some((
            sanitize(&record.name, self.separator),
            sanitize(description.trim(), self.separator),
        ))
    }

    /// Creates or replaces the translation of `id`. Returns its index.
    ///
    /// An existing record keeps its position. A new record is appended, or
    /// inserted at `insert_at` when given (values past the end append).
    pub fn set(&mut self, id: u64, name: &str, description: &str, insert_at: Option<usize>) -> usize {
        let description: Vec<String> = description
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
            .collect();

        if let Some(index) = self.find_index(id) {
            let record = &mut self.records[index];
            record.name = name.to_owned();
            record.description = description;
            debug!("Updated translation {} at index {}", id, index);
            return index;
        }

        let record = TranslationRecord {
            id,
            id_text: id.to_string(),
            name: name.to_owned(),
            description,
        };
        match insert_at {
            Some(index) if index < self.records.len() => {
                self.records.insert(index, record);
                debug!("Inserted translation {} at index {}", id, index);
                index
            }
            _ => {
                self.records.push(record);
                debug!("Appended translation {}", id);
                self.records.len() - 1
            }
        }
    }

    /// Serializes the store into file text.
    pub fn render(&self) -> String {
        let sep = self.separator;
        let mut out = String::new();
        for line in &self.header_lines {
            out.push_str(line);
            out.push('\n');
        }
        for record in &self.records {
            let lines = &record.description;
            let blank = match lines.as_slice() {
                [] => true,
                [only] => only.trim().is_empty(),
                _ => false,
            };
            out.push_str(&format!("{}{sep}{}{sep}", record.id_text, record.name));
            if blank {
                out.push(sep);
                out.push('\n');
                continue;
            }
            let last = lines.len() - 1;
            for (i, line) in lines.iter().enumerate() {
                out.push_str(line);
                if i == last {
                    out.push(sep);
                }
                out.push('\n');
            }
        }
        out
    }

    /// Writes the store back to its file through a temporary file and a rename.
    pub fn save(&self) -> Result<()> {
        let bytes = encoding::encode_lossy(&self.render(), self.encoding);
        utils::write_atomic(&self.path, &bytes)?;
        info!(
            "Saved {} translations to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Splits translation file text into header lines and records.
///
/// An id too large for `u64` does not start a record. Its line is kept as a
/// continuation of the record above (or as a header line), so it is written
/// back unchanged but cannot be looked up.
pub fn parse(text: &str, separator: char) -> (Vec<String>, Vec<TranslationRecord>) {
    let start = record_start(separator);
    let mut header_lines = Vec::new();
    let mut records: Vec<TranslationRecord> = Vec::new();

    for line in text.lines() {
        let digits = start
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        if let Some(digits) = digits {
            match digits.parse::<u64>() {
                Ok(id) => {
                    records.push(parse_record_line(id, line, separator));
                    continue;
                }
                Err(_) => warn!("Translation id {} is out of range; kept as text", digits),
            }
        }
        match records.last_mut() {
            Some(current) => current
                .description
                .push(line.trim_end_matches(separator).to_owned()),
            None => header_lines.push(line.to_owned()),
        }
    }

    (header_lines, records)
}

fn parse_record_line(id: u64, line: &str, separator: char) -> TranslationRecord {
    let mut parts = line.splitn(3, separator);
    let id_text = parts.next().unwrap_or_default().to_owned();
    let name = parts.next().unwrap_or_default().to_owned();
    let rest = parts.next().unwrap_or_default();
    let first = rest.trim_end_matches(separator);
    let description = if first.is_empty() {
        Vec::new()
    } else {
        vec![first.to_owned()]
    };
    TranslationRecord {
        id,
        id_text,
        name,
        description,
    }
}

/// Display clean-up for names and descriptions.
pub fn sanitize(text: &str, separator: char) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let mut t = annotation_regex().replace_all(text, "").into_owned();

    let mut sep_buf = [0u8; 4];
    let sep: &str = separator.encode_utf8(&mut sep_buf);
    t = t.replace(&format!("{}\n", sep), "\n");
    while let Some(rest) = t.strip_suffix(sep) {
        t = rest.trim_end().to_owned();
    }

    t.split('\n')
        .map(|line| strip_quotes(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

fn strip_quotes(line: &str) -> &str {
    for quote in ['"', '\''] {
        if line.len() >= 2 && line.starts_with(quote) && line.ends_with(quote) {
            return &line[1..line.len() - 1];
        }
    }
    line
}

/// Looks up one translation without keeping the store.
pub fn get_translation(
    path: impl AsRef<Path>,
    encoding: &'static Encoding,
    id: u64,
) -> Result<Option<(String, String)>> {
    Ok(TranslationStore::load(path, encoding)?.get(id))
}

/// Loads, updates and saves a translation file in one step.
pub fn set_translation(
    path: impl AsRef<Path>,
    encoding: &'static Encoding,
    id: u64,
    name: &str,
    description: &str,
    insert_at: Option<usize>,
) -> Result<usize> {
    let mut store = TranslationStore::load(path, encoding)?;
    let index = store.set(id, name, description, insert_at);
    store.save()?;
    Ok(index)
}
