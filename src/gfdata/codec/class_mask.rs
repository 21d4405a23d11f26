//! Class-restriction masks.
//!
//! Unlike ordinary flags, the bit position of a class is its server-assigned
//! class id. Ids are sparse (1..=61 in current data, with gaps) and not ordered
//! by class family, so encoding and decoding go through an explicit
//! id ↔ name table instead of positional indexing.

use std::collections::{BTreeMap, HashMap};

use log::trace;

use crate::gfdata::types::error::{GfError, Result};

/// Highest bit position a class mask can hold, plus one.
pub const MASK_BITS: u32 = 128;

const VOCABULARY: &str = "class";

/// An immutable class id ↔ name table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassTable {
    by_id: BTreeMap<u8, String>,
    by_name: HashMap<String, u8>,
}

impl ClassTable {
    /// Builds a table from `(class_name, server_id)` pairs.
    ///
    /// # Errors
    /// Returns `GfError::InvalidFormat` for an id outside `0..128`.
    pub fn new<I, S>(classes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (name, id) in classes {
            let name = name.into();
            let id = check_bit(id)?;
            table.by_id.insert(id, name.clone());
            table.by_name.insert(name, id);
        }
        Ok(table)
    }

    pub fn id_of(&self, name: &str) -> Option<u8> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: u8) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Classes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.by_id.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Sets bit `id` for every class in `names`.
    ///
    /// A name that is not in the table but parses as an integer is taken as a
    /// raw class id.
    ///
    /// # Errors
    /// `GfError::UnknownName` for an unknown non-numeric name,
    /// `GfError::InvalidFormat` for a numeric id outside `0..128`.
    pub fn encode<I, S>(&self, names: I) -> Result<u128>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mask = 0u128;
        for name in names {
            let name = name.as_ref();
            let id = match self.id_of(name) {
                Some(id) => id,
                None => {
                    let raw: u32 = name.trim().parse().map_err(|_| GfError::UnknownName {
                        vocabulary: VOCABULARY.to_string(),
                        name: name.to_string(),
                    })?;
                    check_bit(raw)?
                }
            };
            mask |= 1u128 << id;
        }
        Ok(mask)
    }

    /// Names of the classes whose bit is set, in ascending id order.
    ///
    /// Set bits without a class in the table are skipped.
    pub fn decode(&self, mask: u128) -> Vec<&str> {
        let mut names = Vec::new();
        for id in 0..MASK_BITS {
            if mask & (1u128 << id) == 0 {
                continue;
            }
            match self.by_id.get(&(id as u8)) {
                Some(name) => names.push(name.as_str()),
                None => trace!("Class mask bit {} has no class", id),
            }
        }
        names
    }
}

fn check_bit(id: u32) -> Result<u8> {
    if id < MASK_BITS {
        Ok(id as u8)
    } else {
        Err(GfError::InvalidFormat(format!(
            "Class id {} does not fit a {}-bit mask",
            id, MASK_BITS
        )))
    }
}

/// Packs bit positions into a mask and renders it as lowercase hex without
/// prefix or leading zeros (`"0"` for an empty mask).
///
/// # Errors
/// Returns `GfError::InvalidFormat` for a position outside `0..128`.
pub fn ids_to_hex<I>(ids: I) -> Result<String>
where
    I: IntoIterator<Item = u32>,
{
    let mut mask = 0u128;
    for id in ids {
        mask |= 1u128 << check_bit(id)?;
    }
    Ok(format!("{:x}", mask))
}

/// Unpacks a hex mask (with or without `0x`) into ascending bit positions.
///
/// # Errors
/// Returns `GfError::InvalidFormat` if the text is not a hex number that fits
/// in 128 bits.
pub fn hex_to_ids(hex: &str) -> Result<Vec<u32>> {
    let digits = strip_hex_prefix(hex.trim());
    if digits.is_empty() {
        return Ok(Vec::new());
    }
    let mask = u128::from_str_radix(digits, 16)
        .map_err(|e| GfError::InvalidFormat(format!("Invalid hex mask {:?}: {}", hex, e)))?;
    Ok(set_bits(mask))
}

/// Ascending positions of the set bits of `mask`.
pub fn set_bits(mask: u128) -> Vec<u32> {
    (0..MASK_BITS).filter(|i| mask & (1u128 << i) != 0).collect()
}

/// Parses a mask typed by a user: `0x1F`, `31`, or the `0x1F / 31` form
/// produced by [`format_mask`] (the decimal part wins).
///
/// Returns `None` for anything else.
pub fn parse_mask_text(text: &str) -> Option<u128> {
    let text = text.trim();
    if let Some((_, decimal)) = text.rsplit_once('/') {
        return decimal.trim().parse().ok();
    }
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("0x") {
        return u128::from_str_radix(strip_hex_prefix(&lower), 16).ok();
    }
    text.parse().ok()
}

/// Renders a mask as `0xHEX / decimal`.
pub fn format_mask(mask: u128) -> String {
    format!("0x{:X} / {}", mask, mask)
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}
