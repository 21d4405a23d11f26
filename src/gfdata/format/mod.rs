//! Text-level file handling for data and translation files.
//!
//! # Module Organization
//!
//! - [`encoding`]: Guesses, decodes and encodes legacy text encodings
//! - [`segment`]: Splits text into logical records and fixed-width rows
//! - [`rows`]: Reads and writes whole row store files
//!
//! # Architecture
//!
//! ```text
//!   bytes ──► encoding::decode_lossy ──► text
//!   text  ──► Segmenter::records    ──► record slices
//!   slice ──► segment::normalize    ──► Row (exactly `width` fields)
//!   rows  ──► rows::render          ──► encoding::encode_lossy ──► file
//! ```

pub mod encoding;
pub mod rows;
pub mod segment;
