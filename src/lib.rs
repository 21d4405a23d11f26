//! # gfdata
//!
//! Reads and writes the pipe-delimited data tables of the game client and
//! server (`C_Item.ini`, `S_Item.ini`, ...), their `T_*.ini` translation files,
//! and the packed flag and class masks stored in their columns.
//!
//! Fields may contain raw line breaks, so a logical record can span several
//! physical lines. Reading with a declared width regroups them; see
//! [`gfdata::format::rows`].
pub mod gfdata;

// Re-export the main types for convenience
pub use gfdata::{
    GfError,
    Result,
    codec::{class_mask::ClassTable, flags::FlagVocabulary},
    format::{encoding, rows},
    models::{AdjustmentKind, ReadOptions, Row, RowSet, TranslationRecord, WidthAdjustment},
    record::{Item, Record, Value},
    replica::{ReplicaPair, ReplicaReport},
    schema::{Column, ColumnKind, Schema, SchemaOutcome},
    translation::TranslationStore,
    types::vocab::EnumVocabulary,
};
