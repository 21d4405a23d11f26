//! Core gfdata module
//!
//! # Module Organization
//!
//! - [`types`]: errors, shared models, schemas and enum vocabularies
//! - [`format`]: encoding detection, record segmentation and row store I/O
//! - [`codec`]: flag bitmasks and class restriction masks
//! - [`record`]: schema-typed view of a row
//! - [`replica`]: client/server copy comparison
//! - [`translation`]: `T_*.ini` translation files

pub mod codec;
pub mod format;
pub mod record;
pub mod replica;
pub mod translation;
pub mod types;
mod utils;

pub use types::error::{GfError, Result};
pub use types::models;
pub use types::schema;
