//! Codec layer for packed attribute values.
//!
//! # Submodules
//!
//! - [`flags`][]: Named flag sets ↔ integer bitmasks, with composite entries
//!   filtered from decoding
//! - [`class_mask`][]: Class restriction masks keyed by sparse server class ids,
//!   plus hex/text helpers for 128-bit masks

pub mod class_mask;
pub mod flags;
