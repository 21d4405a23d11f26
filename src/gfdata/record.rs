//! Typed view of a row under a schema.
//!
//! Decoding is lossless: every column is kept, and a value is only turned into
//! an integer when printing that integer gives back the exact original text.
//! `"007"`, `" 12"` or `"+3"` stay text, so [`Record::to_row`] always reproduces
//! the row it was built from.

use std::fmt;

use crate::gfdata::codec::class_mask::{self, ClassTable};
use crate::gfdata::codec::flags::FlagVocabulary;
use crate::gfdata::types::error::{GfError, Result};
use crate::gfdata::types::models::Row;
use crate::gfdata::types::schema::{Column, ColumnKind, Schema};
use crate::gfdata::types::vocab::EnumVocabulary;

/// A single decoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Empty,
    Integer(i64),
    Text(String),
}

impl Value {
    /// Interprets raw field text for a column of `kind`.
    pub fn from_field(raw: &str, kind: &ColumnKind) -> Self {
        if raw.is_empty() {
            return Value::Empty;
        }
        if kind.is_numeric() {
            if let Ok(n) = raw.parse::<i64>() {
                if n.to_string() == raw {
                    return Value::Integer(n);
                }
            }
        }
        Value::Text(raw.to_owned())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// The field text this value was decoded from.
    pub fn to_field(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => Ok(()),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// A row decoded against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'s> {
    schema: &'s Schema,
    values: Vec<Value>,
}

impl<'s> Record<'s> {
    /// Decodes `row` column by column.
    ///
    /// # Errors
    /// Returns `GfError::Schema` if the row length differs from the schema
    /// width. Rows read with that width always match.
    pub fn from_row(schema: &'s Schema, row: &[String]) -> Result<Self> {
        if row.len() != schema.width() {
            return Err(GfError::Schema(format!(
                "Row has {} fields, schema expects {}",
                row.len(),
                schema.width()
            )));
        }
        let values = schema
            .columns()
            .iter()
            .zip(row)
            .map(|(column, raw)| Value::from_field(raw, &column.kind))
            .collect();
        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// `(column name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .columns()
            .iter()
            .map(|c| c.name.as_str())
            .zip(self.values.iter())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.schema.index_of(column).map(|i| &self.values[i])
    }

    pub fn get_int(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_int)
    }

    pub fn get_text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_text)
    }

    /// The record id: the integer in column 0.
    pub fn id(&self) -> Option<i64> {
        self.values.first().and_then(Value::as_int)
    }

    /// Encodes the record back to a row.
    pub fn to_row(&self) -> Row {
        self.values.iter().map(Value::to_field).collect()
    }

    /// Replaces a column with raw field text, re-interpreted for its kind.
    pub fn set_field(&mut self, column: &str, raw: &str) -> Result<()> {
        let (index, column) = self.column(column)?;
        self.values[index] = Value::from_field(raw, &column.kind);
        Ok(())
    }

    pub fn set_int(&mut self, column: &str, value: i64) -> Result<()> {
        self.set_field(column, &value.to_string())
    }

    pub fn set_text(&mut self, column: &str, value: &str) -> Result<()> {
        self.set_field(column, value)
    }

    /// Name of an enumerated column's value, if the vocabulary knows it.
    pub fn enum_name<'v>(&self, column: &str, vocab: &'v EnumVocabulary) -> Option<&'v str> {
        self.get_int(column).and_then(|v| vocab.name_of(v))
    }

    /// Decodes a bitmask column. An empty field decodes to no flags.
    ///
    /// # Errors
    /// `GfError::Schema` for an unknown column, `GfError::InvalidFormat` if the
    /// field is not a non-negative integer.
    pub fn flags<'v>(&self, column: &str, vocab: &'v FlagVocabulary) -> Result<Vec<&'v str>> {
        let raw = self.raw_mask(column)?;
        let value = u64::try_from(raw).map_err(|_| {
            GfError::InvalidFormat(format!("{} value {} does not fit 64 bits", column, raw))
        })?;
        Ok(vocab.decode(value))
    }

    /// Encodes `names` into a bitmask column.
    pub fn set_flags<I, S>(&mut self, column: &str, vocab: &FlagVocabulary, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let value = vocab.encode(names)?;
        self.set_field(column, &value.to_string())
    }

    /// Decodes a class restriction column.
    pub fn classes<'t>(&self, column: &str, table: &'t ClassTable) -> Result<Vec<&'t str>> {
        Ok(table.decode(self.raw_mask(column)?))
    }

    /// Encodes class names into a class restriction column (decimal text).
    pub fn set_classes<I, S>(&mut self, column: &str, table: &ClassTable, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mask = table.encode(names)?;
        self.set_field(column, &mask.to_string())
    }

    fn column(&self, name: &str) -> Result<(usize, &'s Column)> {
        self.schema
            .columns()
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == name)
            .ok_or_else(|| GfError::Schema(format!("Unknown column: {}", name)))
    }

    fn raw_mask(&self, column: &str) -> Result<u128> {
        let (index, _) = self.column(column)?;
        match &self.values[index] {
            Value::Empty => Ok(0),
            Value::Integer(n) => u128::try_from(*n).map_err(|_| {
                GfError::InvalidFormat(format!("{} holds negative mask {}", column, n))
            }),
            Value::Text(s) => class_mask::parse_mask_text(s).ok_or_else(|| {
                GfError::InvalidFormat(format!("{} holds non-numeric mask {:?}", column, s))
            }),
        }
    }
}

/// The columns most tools care about, pulled out of an item record.
///
/// Missing columns and empty fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub icon_filename: Option<String>,
    pub model_id: Option<i64>,
    pub model_filename: Option<String>,
    pub item_type: Option<i64>,
    pub equip_type: Option<i64>,
    pub sys_price: Option<i64>,
    pub max_stack: Option<i64>,
    pub tip: Option<String>,
}

impl Item {
    pub fn from_record(record: &Record<'_>) -> Self {
        let text = |column: &str| {
            record
                .get(column)
                .filter(|v| !v.is_empty())
                .map(Value::to_field)
        };
        let int = |column: &str| record.get_int(column);
        Self {
            id: int("Id"),
            name: text("Name"),
            icon_filename: text("IconFilename"),
            model_id: int("ModelId"),
            model_filename: text("ModelFilename"),
            item_type: int("ItemType"),
            equip_type: int("EquipType"),
            sys_price: int("SysPrice"),
            max_stack: int("MaxStack"),
            tip: text("Tip"),
        }
    }
}
