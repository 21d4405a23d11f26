//! Custom error types for the gfdata crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum GfError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// None of the candidate encodings could decode the byte stream.
    #[error("Unable to decode text with any of: {}", tried.join(", "))]
    Decode { tried: Vec<&'static str> },

    /// A schema is malformed, or a row does not fit the schema it is decoded with.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Input text does not follow the expected layout.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A name was looked up in a vocabulary that does not contain it.
    #[error("Unknown {vocabulary} name: {name:?}")]
    UnknownName { vocabulary: String, name: String },

    /// The client and server copies of a dataset disagree.
    #[error("Replica divergence: {0}")]
    ReplicaDivergence(String),

    /// A temporary file could not be moved over its destination.
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A convenience `Result` type alias using the crate's `GfError` type.
pub type Result<T> = std::result::Result<T, GfError>;
