//! Value ↔ name tables for enumerated columns.

use std::collections::BTreeMap;

/// An immutable enum vocabulary, e.g. item quality or target type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumVocabulary {
    by_value: BTreeMap<i64, String>,
}

impl EnumVocabulary {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        Self {
            by_value: entries.into_iter().map(|(v, n)| (v, n.into())).collect(),
        }
    }

    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.by_value.get(&value).map(String::as_str)
    }

    /// Reverse lookup. When several values share a name the smallest wins.
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.by_value
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(v, _)| *v)
    }

    /// Entries in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.by_value.iter().map(|(v, n)| (*v, n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }
}
