//! Column schemas for fixed-width record files.
//!
//! A schema is supplied by the caller as `(index, name, kind)` tuples. The
//! crate only enforces that the indices form the contiguous range
//! `0..width`; everything else about the columns is opaque lookup data.

use std::str::FromStr;

use log::warn;

use super::error::{GfError, Result};

/// How the values of a column are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    /// Display name resolved through the translation store.
    TranslatedName,
    /// Multi-line description resolved through the translation store.
    TranslatedMultiline,
    /// Integer looked up in the named enum vocabulary.
    Enumerated(String),
    /// Integer holding bits from the named flag vocabulary.
    Bitmask(String),
}

impl ColumnKind {
    /// Whether values of this kind are stored as integers.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnKind::Integer | ColumnKind::Enumerated(_) | ColumnKind::Bitmask(_)
        )
    }
}

/// Parses the compact kind tags: `int`, `str`, `trans`, `trans_multiline`,
/// `enum:<Vocab>` and `flags:<Vocab>`.
impl FromStr for ColumnKind {
    type Err = GfError;

    fn from_str(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        if let Some(vocab) = tag.strip_prefix("enum:") {
            return Ok(ColumnKind::Enumerated(vocab.to_string()));
        }
        if let Some(vocab) = tag.strip_prefix("flags:") {
            return Ok(ColumnKind::Bitmask(vocab.to_string()));
        }
        match tag {
            "int" => Ok(ColumnKind::Integer),
            "str" => Ok(ColumnKind::Text),
            "trans" => Ok(ColumnKind::TranslatedName),
            "trans_multiline" => Ok(ColumnKind::TranslatedMultiline),
            other => Err(GfError::Schema(format!("Unknown column kind tag: {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    pub name: String,
    pub kind: ColumnKind,
}

/// An ordered, validated list of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Builds a schema from `(index, name, kind)` tuples given in any order.
    ///
    /// # Errors
    /// Returns `GfError::Schema` if an index is duplicated, missing, or out of
    /// range, or if two columns share a name.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, S, ColumnKind)>,
        S: Into<String>,
    {
        let mut columns: Vec<Column> = columns
            .into_iter()
            .map(|(index, name, kind)| Column { index, name: name.into(), kind })
            .collect();
        columns.sort_by_key(|c| c.index);

        for (expected, column) in columns.iter().enumerate() {
            if column.index != expected {
                return Err(GfError::Schema(format!(
                    "Column indices must be contiguous from 0: expected {}, found {} ({})",
                    expected, column.index, column.name
                )));
            }
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(GfError::Schema(format!("Duplicate column name: {}", column.name)));
            }
        }

        Ok(Self { columns })
    }

    /// Builds a schema from `(index, name, tag)` tuples using the compact tags
    /// understood by [`ColumnKind::from_str`].
    pub fn from_tags<'a, I>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, &'a str, &'a str)>,
    {
        let parsed = columns
            .into_iter()
            .map(|(index, name, tag)| Ok((index, name, tag.parse::<ColumnKind>()?)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(parsed)
    }

    /// Builds an all-text schema from a list of column names.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .enumerate()
                .map(|(i, name)| (i, name, ColumnKind::Text)),
        )
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.column(name).map(|c| c.index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Checks a file's first line against this schema.
    ///
    /// - A line with exactly `width` fields is accepted as the header.
    /// - A line whose first field is an integer is a data record, not a header;
    ///   the schema is used as-is and the caller must keep the line as data.
    /// - Anything else is a header of the wrong width. The schema is still
    ///   returned as the fallback, tagged with the detected width.
    pub fn resolve_header(&self, first_line: &[String]) -> SchemaOutcome {
        if first_line.len() == self.width() {
            return SchemaOutcome::Matched(self.clone());
        }
        let looks_like_id = first_line
            .first()
            .map(|f| {
                let digits = f.trim().trim_start_matches('-');
                !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
            })
            .unwrap_or(false);
        if looks_like_id {
            return SchemaOutcome::DataLine(self.clone());
        }
        warn!(
            "Header has {} columns, schema declares {}; using the declared schema",
            first_line.len(),
            self.width()
        );
        SchemaOutcome::Mismatch {
            detected_width: first_line.len(),
            fallback: self.clone(),
        }
    }
}

/// Result of checking a detected header against a declared schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOutcome {
    Matched(Schema),
    /// The first line is a record; there is no header.
    DataLine(Schema),
    Mismatch { detected_width: usize, fallback: Schema },
}

impl SchemaOutcome {
    pub fn schema(&self) -> &Schema {
        match self {
            SchemaOutcome::Matched(s) | SchemaOutcome::DataLine(s) => s,
            SchemaOutcome::Mismatch { fallback, .. } => fallback,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, SchemaOutcome::Mismatch { .. })
    }
}
