//! Content transfer encodings and charsets.
//!
//! [`TransferEncoding`] is the closed set of codecs this crate understands.
//! Each one offers `encode`/`decode` plus the matching length predictions.
//! Codecs are looked up by name through a static registry:
//!
//! ```
//! use mimepart::TransferEncoding;
//!
//! let codec = TransferEncoding::from_name("Base64").unwrap();
//! assert_eq!(codec.encode(b"hi"), b"aGk=\r\n");
//! assert!(TransferEncoding::from_name("x-uuencode").is_none());
//! ```

pub mod base64;
pub mod charset;
pub mod quoted_printable;

pub use charset::Charset;
pub use quoted_printable::QuotedPrintable;

use crate::error::Result;
use std::fmt;

/// Content-Transfer-Encoding codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferEncoding {
    /// 7-bit data, passed through unchanged.
    SevenBit,
    /// 8-bit data, passed through unchanged.
    EightBit,
    /// Binary data, passed through unchanged.
    Binary,
    /// Quoted-Printable with the given settings.
    QuotedPrintable(QuotedPrintable),
    /// Base64 with 60-character lines.
    Base64,
}

static REGISTRY: [(&str, TransferEncoding); 5] = [
    ("7bit", TransferEncoding::SevenBit),
    ("8bit", TransferEncoding::EightBit),
    ("binary", TransferEncoding::Binary),
    (
        "quoted-printable",
        TransferEncoding::QuotedPrintable(QuotedPrintable::DEFAULT),
    ),
    ("base64", TransferEncoding::Base64),
];

impl TransferEncoding {
    /// Looks up a codec by name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for names outside the registry.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        REGISTRY
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|&(_, codec)| codec)
    }

    /// Returns the registry name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SevenBit => "7bit",
            Self::EightBit => "8bit",
            Self::Binary => "binary",
            Self::QuotedPrintable(_) => "quoted-printable",
            Self::Base64 => "base64",
        }
    }

    /// Returns true for the pass-through encodings.
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::SevenBit | Self::EightBit | Self::Binary)
    }

    /// Encodes raw bytes for transport.
    #[must_use]
    pub fn encode(self, input: &[u8]) -> Vec<u8> {
        match self {
            Self::SevenBit | Self::EightBit | Self::Binary => input.to_vec(),
            Self::QuotedPrintable(qp) => qp.encode(input),
            Self::Base64 => self::base64::encode(input),
        }
    }

    /// Decodes transport bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` is not valid for this encoding.
    pub fn decode(self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::SevenBit | Self::EightBit | Self::Binary => Ok(input.to_vec()),
            Self::QuotedPrintable(qp) => qp.decode(input),
            Self::Base64 => self::base64::decode(input),
        }
    }

    /// Returns the exact length [`encode`](Self::encode) produces.
    #[must_use]
    pub fn encode_length(self, input: &[u8]) -> usize {
        match self {
            Self::SevenBit | Self::EightBit | Self::Binary => input.len(),
            Self::QuotedPrintable(qp) => qp.encode_length(input),
            Self::Base64 => self::base64::encode_length(input.len()),
        }
    }

    /// Returns the length [`decode`](Self::decode) produces.
    ///
    /// # Errors
    ///
    /// Fails exactly when [`decode`](Self::decode) fails.
    pub fn decode_length(self, input: &[u8]) -> Result<usize> {
        match self {
            Self::SevenBit | Self::EightBit | Self::Binary => Ok(input.len()),
            Self::QuotedPrintable(qp) => qp.decode_length(input),
            Self::Base64 => Ok(self::base64::decode(input)?.len()),
        }
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output target shared by the codecs' write and count passes.
pub(crate) trait Sink {
    fn put(&mut self, bytes: &[u8]);
}

impl Sink for Vec<u8> {
    fn put(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

impl Sink for usize {
    fn put(&mut self, bytes: &[u8]) {
        *self += bytes.len();
    }
}
