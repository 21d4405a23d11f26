//! Named boolean sets packed into integers.
//!
//! A vocabulary maps flag names to their values. Most values are single bits,
//! but game tables also carry convenience entries whose value is the sum of
//! sibling flags (`ISRideCombine = RideCombineIK | RideCombineGK`). Decoding
//! never reports those composite entries, otherwise every value containing both
//! components would list the combo name next to them.

use log::trace;

use crate::gfdata::types::error::{GfError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
struct FlagEntry {
    name: String,
    value: u64,
    /// Whether `decode` may report this entry.
    reported: bool,
}

/// An immutable name → value table for one bitmask column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagVocabulary {
    label: String,
    entries: Vec<FlagEntry>,
}

impl FlagVocabulary {
    /// Builds a vocabulary, keeping the entry order for decoding.
    ///
    /// Entries whose value has several bits set and is fully covered by the
    /// values of sibling entries are marked composite and excluded from
    /// [`decode`](Self::decode). They still encode normally.
    pub fn new<I, S>(label: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let raw: Vec<(String, u64)> = entries.into_iter().map(|(n, v)| (n.into(), v)).collect();
        let entries = raw
            .iter()
            .map(|(name, value)| FlagEntry {
                name: name.clone(),
                value: *value,
                reported: *value != 0 && !is_composite(*value, &raw),
            })
            .collect();
        Self { label: label.into(), entries }
    }

    /// Excludes additional entries from decoding, e.g. legacy aliases that share
    /// a bit with a preferred name.
    pub fn excluding<'a, I>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            for entry in self.entries.iter_mut().filter(|e| e.name == name) {
                entry.reported = false;
            }
        }
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value_of(&self, name: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.value)
    }

    /// Whether `decode` skips this entry.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| !e.reported)
            .unwrap_or(false)
    }

    /// All names in table order, composites included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Bitwise OR of the values of `names`.
    ///
    /// # Errors
    /// Returns `GfError::UnknownName` for a name missing from the vocabulary.
    pub fn encode<I, S>(&self, names: I) -> Result<u64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(0u64, |acc, name| {
            let name = name.as_ref();
            self.value_of(name)
                .map(|value| acc | value)
                .ok_or_else(|| GfError::UnknownName {
                    vocabulary: self.label.clone(),
                    name: name.to_string(),
                })
        })
    }

    /// Names whose value is fully contained in `value`, in table order.
    ///
    /// Bits that no entry accounts for are ignored.
    pub fn decode(&self, value: u64) -> Vec<&str> {
        let names: Vec<&str> = self
            .entries
            .iter()
            .filter(|e| e.reported && value & e.value == e.value)
            .map(|e| e.name.as_str())
            .collect();
        let unknown = value & !self.known_bits();
        if unknown != 0 {
            trace!("{}: bits {:#x} have no name", self.label, unknown);
        }
        names
    }

    fn known_bits(&self) -> u64 {
        self.entries.iter().fold(0, |acc, e| acc | e.value)
    }
}

/// A value is composite when it has more than one bit set and the sibling
/// entries it contains add up to all of its bits.
fn is_composite(value: u64, entries: &[(String, u64)]) -> bool {
    if value.count_ones() < 2 {
        return false;
    }
    let covered = entries
        .iter()
        .map(|(_, v)| *v)
        .filter(|&v| v != 0 && v != value && v & !value == 0)
        .fold(0u64, |acc, v| acc | v);
    covered == value
}
