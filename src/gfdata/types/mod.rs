//! Foundational data structures, error types, schemas and vocabularies.

pub mod error;
pub mod models;
pub mod schema;
pub mod vocab;
