//! Base64 transfer encoding with 60-character lines.

use crate::error::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encoded characters per output line.
pub const LINE_LENGTH: usize = 60;

/// Encodes `input`, wrapping lines and ending with CRLF.
#[must_use]
pub fn encode(input: &[u8]) -> Vec<u8> {
    let encoded = STANDARD.encode(input);
    let mut out = Vec::with_capacity(encode_length(input.len()));

    if encoded.is_empty() {
        out.extend_from_slice(b"\r\n");
    }
    for line in encoded.as_bytes().chunks(LINE_LENGTH) {
        out.extend_from_slice(line);
        out.extend_from_slice(b"\r\n");
    }

    out
}

/// Returns the exact length [`encode`] produces for `len` input bytes.
#[must_use]
pub const fn encode_length(len: usize) -> usize {
    let chars = len.div_ceil(3) * 4;
    let lines = if chars == 0 {
        1
    } else {
        chars.div_ceil(LINE_LENGTH)
    };
    chars + 2 * lines
}

/// Decodes `input`, ignoring embedded whitespace and line breaks.
///
/// # Errors
///
/// Returns an error if the remaining characters are not valid Base64.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    Ok(STANDARD.decode(cleaned)?)
}
