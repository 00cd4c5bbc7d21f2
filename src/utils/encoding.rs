//! Encoding-aware text decoding for input files.
//!
//! Strategy:
//! 1. BOM markers (UTF-8, UTF-16 LE/BE) win and are stripped
//! 2. Strict UTF-8 fast path
//! 3. Fallback to chardetng detection over a leading sample
//!
//! Invalid sequences are replaced rather than rejected; `had_errors` reports it.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;

const DEFAULT_SAMPLE_SIZE: usize = 8192;

/// Decoded file content together with the encoding that produced it.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub content: String,
    pub encoding: &'static Encoding,
    pub had_errors: bool,
}

impl DecodedText {
    /// Lower-case encoding label, e.g. "utf-8" or "windows-1252".
    pub fn encoding_name(&self) -> String {
        self.encoding.name().to_lowercase()
    }
}

/// Read and decode a whole file.
pub fn read_text(path: &Path) -> std::io::Result<DecodedText> {
    let bytes = std::fs::read(path)?;
    Ok(decode_bytes(&bytes))
}

pub fn decode_bytes(bytes: &[u8]) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (decoded, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return DecodedText { content: decoded.into_owned(), encoding, had_errors };
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedText { content: text.to_string(), encoding: UTF_8, had_errors: false };
    }

    let encoding = detect_encoding(bytes);
    let (decoded, had_errors) = encoding.decode_without_bom_handling(bytes);
    DecodedText { content: decoded.into_owned(), encoding, had_errors }
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, sample.len() == bytes.len());
    detector.guess(None, true)
}

/// Binary heuristic over a leading sample: any null byte, or fewer than 70%
/// printable ASCII bytes (tab, LF and CR count as printable).
pub fn looks_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(DEFAULT_SAMPLE_SIZE)];
    if sample.is_empty() {
        return false;
    }
    // UTF-16 text is full of nulls but is not binary.
    if Encoding::for_bom(sample).is_some() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }

    let printable_count = sample
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b == 9 || b == 10 || b == 13 || b >= 0x80)
        .count();

    (printable_count as f64 / sample.len() as f64) < 0.70
}
