//! Character sets supported for text content.
//!
//! Only identity-style charsets are provided: ASCII, ISO-8859-1 (byte N is
//! character N) and UTF-8 (native string encoding).

use crate::error::{Error, Result};
use std::fmt;

/// A character set named by a `charset` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Charset {
    /// 7-bit US-ASCII.
    #[default]
    UsAscii,
    /// ISO-8859-1.
    Latin1,
    /// UTF-8.
    Utf8,
}

static CHARSETS: [(&str, Charset); 7] = [
    ("us-ascii", Charset::UsAscii),
    ("ascii", Charset::UsAscii),
    ("iso-8859-1", Charset::Latin1),
    ("latin1", Charset::Latin1),
    ("latin-1", Charset::Latin1),
    ("utf-8", Charset::Utf8),
    ("utf8", Charset::Utf8),
];

impl Charset {
    /// Looks up a charset by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        CHARSETS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|&(_, charset)| charset)
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UsAscii => "us-ascii",
            Self::Latin1 => "iso-8859-1",
            Self::Utf8 => "utf-8",
        }
    }

    /// Encodes text into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unrepresentable`] for characters outside the charset.
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        let limit = match self {
            Self::Utf8 => return Ok(text.as_bytes().to_vec()),
            Self::UsAscii => 0x7F,
            Self::Latin1 => 0xFF,
        };
        text.chars()
            .map(|ch| match u8::try_from(ch) {
                Ok(byte) if byte <= limit => Ok(byte),
                _ => Err(Error::Unrepresentable {
                    charset: self.name(),
                    ch,
                }),
            })
            .collect()
    }

    /// Decodes bytes into text.
    ///
    /// # Errors
    ///
    /// Returns an error for bytes the charset does not define.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf8 => Ok(String::from_utf8(bytes.to_vec())?),
            Self::Latin1 => Ok(bytes.iter().copied().map(char::from).collect()),
            Self::UsAscii => bytes
                .iter()
                .map(|&byte| {
                    if byte.is_ascii() {
                        Ok(char::from(byte))
                    } else {
                        Err(Error::InvalidCharsetData {
                            charset: self.name(),
                            byte,
                        })
                    }
                })
                .collect(),
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
