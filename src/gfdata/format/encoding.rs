//! Text encoding detection, decoding and encoding.
//!
//! Game data files come in several legacy encodings (Big5 for item tables,
//! the Windows ANSI code page for translation files). Nothing in the files
//! declares which one is used, so:
//! - [`resolve`] guesses from a byte sample and never fails
//! - [`decode_lossy`] substitutes U+FFFD instead of failing
//! - [`decode_with_fallback`] tries a chain of candidates strictly
//! - [`decode_unknown`] combines the sniff and the chain for bytes already read
//! - [`encode_lossy`] substitutes `?` for characters the target cannot hold

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, EncoderResult, BIG5, UTF_8, WINDOWS_1252};
use log::{debug, trace, warn};

use crate::gfdata::types::error::{GfError, Result};
use crate::gfdata::types::models::DEFAULT_SNIFF_LEN;

/// Encoding assumed when nothing better is known.
pub fn default_encoding() -> &'static Encoding {
    UTF_8
}

/// Guesses the encoding of the file at `path` from its first
/// [`DEFAULT_SNIFF_LEN`] bytes.
///
/// Returns [`default_encoding`] when the file is empty or cannot be read.
/// The guess only seeds decoding attempts; it is never authoritative.
pub fn resolve(path: impl AsRef<Path>) -> &'static Encoding {
    resolve_with_limit(path, DEFAULT_SNIFF_LEN)
}

/// Same as [`resolve`] with an explicit sample size.
pub fn resolve_with_limit(path: impl AsRef<Path>, limit: usize) -> &'static Encoding {
    let path = path.as_ref();
    let sample = match read_prefix(path, limit) {
        Ok(sample) => sample,
        Err(e) => {
            debug!("Encoding sniff failed for {}: {}; using {}", path.display(), e, UTF_8.name());
            return default_encoding();
        }
    };
    let guess = guess_encoding(&sample, sample.len() < limit);
    debug!("Guessed encoding {} for {}", guess.name(), path.display());
    guess
}

/// Runs the statistical detector over an in-memory sample.
///
/// `complete` tells the detector whether the sample is the whole input, so a
/// multi-byte sequence cut at the end of a partial sample is not held against
/// an encoding.
pub fn guess_encoding(sample: &[u8], complete: bool) -> &'static Encoding {
    if sample.is_empty() {
        return default_encoding();
    }
    let mut detector = EncodingDetector::new();
    detector.feed(sample, complete);
    detector.guess(None, true)
}

fn read_prefix(path: &Path, limit: usize) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut sample = Vec::with_capacity(limit);
    file.take(limit as u64).read_to_end(&mut sample)?;
    Ok(sample)
}

/// Looks up an encoding by label.
///
/// Accepts every WHATWG label plus the names used by the editing tools:
/// `mbcs`/`ansi`/`latin-1` map to windows-1252 and `gbk`/`gb2312` to GB18030.
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    let normalized = label.trim().to_ascii_lowercase();
    let label = match normalized.as_str() {
        "mbcs" | "ansi" | "latin-1" => "windows-1252",
        "gbk" | "gb2312" => "gb18030",
        other => other,
    };
    Encoding::for_label(label.as_bytes())
}

/// The candidates tried by [`decode_with_fallback`] for a given hint:
/// the hint itself, then Big5, UTF-8 and windows-1252, without duplicates.
pub fn fallback_chain(hint: Option<&'static Encoding>) -> Vec<&'static Encoding> {
    let mut chain: Vec<&'static Encoding> = Vec::with_capacity(4);
    for candidate in hint.into_iter().chain([BIG5, UTF_8, WINDOWS_1252]) {
        if !chain.contains(&candidate) {
            chain.push(candidate);
        }
    }
    chain
}

/// The candidates for input whose encoding is unknown, ordered by a sniff of
/// `sample`.
///
/// A UTF-8 guess puts UTF-8 first. Any other guess puts Big5 first, because
/// the detector tends to mistake short Big5 samples for single-byte code
/// pages. The detector's own guess is tried just before windows-1252.
pub fn sniffed_chain(sample: &[u8], complete: bool) -> Vec<&'static Encoding> {
    let guess = guess_encoding(sample, complete);
    let hint = if guess == UTF_8 { UTF_8 } else { BIG5 };
    let mut chain = fallback_chain(Some(hint));
    if !chain.contains(&guess) {
        let last = chain.len() - 1;
        chain.insert(last, guess);
    }
    debug!(
        "Detector guessed {}; trying {:?}",
        guess.name(),
        chain.iter().map(|e| e.name()).collect::<Vec<_>>()
    );
    chain
}

/// Decodes bytes of unknown encoding.
///
/// A byte-order mark wins outright. Otherwise the first `sniff_len` bytes
/// seed [`sniffed_chain`] and the candidates are tried strictly. If none accepts the input it is decoded lossily with the first
/// candidate.
pub fn decode_unknown(bytes: &[u8], sniff_len: usize) -> (String, &'static Encoding) {
    if let Some((bom_encoding, _)) = Encoding::for_bom(bytes) {
        return decode_lossy(bytes, bom_encoding);
    }
    let sample = &bytes[..bytes.len().min(sniff_len)];
    let candidates = sniffed_chain(sample, sample.len() == bytes.len());
    match decode_with_fallback(bytes, &candidates) {
        Ok(decoded) => decoded,
        Err(e) => {
            let first = candidates[0];
            warn!("{}; decoding as {} with replacement", e, first.name());
            decode_lossy(bytes, first)
        }
    }
}

/// Decodes `bytes`, replacing malformed sequences with U+FFFD.
///
/// A byte-order mark overrides `encoding`; the encoding actually used is
/// returned alongside the text.
pub fn decode_lossy(bytes: &[u8], encoding: &'static Encoding) -> (String, &'static Encoding) {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            "Text is not valid {}; malformed sequences were replaced",
            used.name()
        );
    }
    if used != encoding {
        debug!("Byte-order mark selected {} over {}", used.name(), encoding.name());
    }
    (text.into_owned(), used)
}

/// Decodes `bytes` with the first candidate that accepts them without any
/// replacement.
///
/// # Errors
/// Returns `GfError::Decode` listing every candidate when none succeeds.
pub fn decode_with_fallback(
    bytes: &[u8],
    candidates: &[&'static Encoding],
) -> Result<(String, &'static Encoding)> {
    for &candidate in candidates {
        match candidate.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => {
                trace!("Decoded {} bytes as {}", bytes.len(), candidate.name());
                return Ok((text.into_owned(), candidate));
            }
            None => debug!("Input is not valid {}", candidate.name()),
        }
    }
    Err(GfError::Decode {
        tried: candidates.iter().map(|e| e.name()).collect(),
    })
}

/// Encodes `text`, writing `?` for every character `encoding` cannot represent.
///
/// Encodings that are decode-only (UTF-16) write their output encoding, UTF-8.
pub fn encode_lossy(text: &str, encoding: &'static Encoding) -> Vec<u8> {
    let target = encoding.output_encoding();
    if target == UTF_8 {
        return text.as_bytes().to_vec();
    }

    let mut encoder = target.new_encoder();
    let mut output = Vec::with_capacity(text.len() + 16);
    let mut buffer = [0u8; 4096];
    let mut remaining = text;
    let mut replaced = 0usize;

    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(remaining, &mut buffer, true);
        output.extend_from_slice(&buffer[..written]);
        remaining = &remaining[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(c) => {
                trace!("Character {:?} is not representable in {}", c, target.name());
                output.push(b'?');
                replaced += 1;
            }
        }
    }

    if replaced > 0 {
        warn!(
            "{} character(s) not representable in {} were replaced with '?'",
            replaced,
            target.name()
        );
    }
    output
}
