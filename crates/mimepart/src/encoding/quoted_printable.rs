//! Quoted-Printable transfer encoding (RFC 2045).

use super::Sink;
use crate::error::{Error, Result};

/// Maximum encoded line length, excluding CRLF.
pub const MAX_LINE_LENGTH: usize = 76;

/// Spaces and tabs are written literally only below this column.
const WHITESPACE_LIMIT: usize = MAX_LINE_LENGTH - 12;

/// A soft break is emitted once a line reaches this length.
const SOFT_BREAK_AT: usize = MAX_LINE_LENGTH - 11;

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Quoted-Printable codec settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuotedPrintable {
    /// Double a `.` at the start of an encoded line, and undo it on decode.
    pub dot_stuffing: bool,
    /// Finish the encoded output with a soft line break.
    pub trailing_soft_break: bool,
}

impl QuotedPrintable {
    /// Dot-stuffing and trailing soft break both enabled.
    pub const DEFAULT: Self = Self {
        dot_stuffing: true,
        trailing_soft_break: true,
    };

    /// Encodes `input`.
    ///
    /// Every output line, soft breaks included, is at most
    /// [`MAX_LINE_LENGTH`] bytes long.
    #[must_use]
    pub fn encode(&self, input: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encode_length(input));
        self.run_encode(input, &mut out);
        out
    }

    /// Returns the exact length [`encode`](Self::encode) would produce.
    #[must_use]
    pub fn encode_length(&self, input: &[u8]) -> usize {
        let mut counter = 0usize;
        self.run_encode(input, &mut counter);
        counter
    }

    /// Decodes `input`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedEncoding`] when `=` is followed by neither
    /// two hex digits nor CRLF.
    pub fn decode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(input.len());
        self.run_decode(input, &mut out)?;
        Ok(out)
    }

    /// Returns the length [`decode`](Self::decode) would produce.
    ///
    /// # Errors
    ///
    /// Fails exactly when [`decode`](Self::decode) fails.
    pub fn decode_length(&self, input: &[u8]) -> Result<usize> {
        let mut counter = 0usize;
        self.run_decode(input, &mut counter)?;
        Ok(counter)
    }

    fn run_encode<S: Sink>(&self, input: &[u8], sink: &mut S) {
        let mut line_len = 0;

        for &byte in input {
            let literal = matches!(byte, 33..=59 | 62..=125)
                || (matches!(byte, b' ' | b'\t') && line_len < WHITESPACE_LIMIT);

            if !literal {
                sink.put(&[
                    b'=',
                    UPPER_HEX[usize::from(byte >> 4)],
                    UPPER_HEX[usize::from(byte & 0x0F)],
                ]);
                line_len += 3;
            } else if byte == b'.' && line_len == 0 && self.dot_stuffing {
                sink.put(b"..");
                line_len += 2;
            } else {
                sink.put(&[byte]);
                line_len += 1;
            }

            if line_len >= SOFT_BREAK_AT {
                sink.put(b"=\r\n");
                line_len = 0;
            }
        }

        if self.trailing_soft_break {
            sink.put(b"=\r\n");
        }
    }

    fn run_decode<S: Sink>(&self, input: &[u8], sink: &mut S) -> Result<()> {
        let mut pos = 0;
        let mut line_len = 0;

        while let Some(&byte) = input.get(pos) {
            match byte {
                b'=' => match (input.get(pos + 1), input.get(pos + 2)) {
                    (Some(b'\r'), Some(b'\n')) => {
                        pos += 3;
                        line_len = 0;
                    }
                    (Some(&hi), Some(&lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                        sink.put(&[(hex_value(hi) << 4) | hex_value(lo)]);
                        pos += 3;
                        line_len += 3;
                    }
                    _ => return Err(Error::MalformedEncoding { offset: pos }),
                },
                b'\r' | b'\n' => {
                    sink.put(&[byte]);
                    pos += 1;
                    line_len = 0;
                }
                b'.' if self.dot_stuffing
                    && line_len == 0
                    && input.get(pos + 1) == Some(&b'.') =>
                {
                    sink.put(b".");
                    pos += 2;
                    line_len += 2;
                }
                _ => {
                    sink.put(&[byte]);
                    pos += 1;
                    line_len += 1;
                }
            }
        }

        Ok(())
    }
}

impl Default for QuotedPrintable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}
