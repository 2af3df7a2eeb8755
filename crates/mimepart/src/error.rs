//! Error types for MIME operations.

use std::io;
use std::string::FromUtf8Error;

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error while reading or writing a stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line appeared where a boundary delimiter was required.
    #[error("Unexpected line in multipart body with boundary {boundary:?}: {line:?}")]
    UnexpectedBoundary {
        /// Boundary of the container being parsed.
        boundary: String,
        /// Offending line.
        line: String,
    },

    /// End of input reached before the closing delimiter.
    #[error("Truncated multipart body: missing closing delimiter for boundary {boundary:?}")]
    Truncated {
        /// Boundary whose closing delimiter is missing.
        boundary: String,
    },

    /// Multipart nesting exceeded the configured limit.
    #[error("Multipart nesting exceeds maximum depth of {0}")]
    NestingTooDeep(usize),

    /// The part being inserted already belongs to a parent.
    #[error("Body part already has a parent")]
    AlreadyParented,

    /// Inserting the part would make it its own ancestor.
    #[error("Body part cannot be inserted into itself or one of its descendants")]
    CyclicInsert,

    /// The referenced part is not a child of this part.
    #[error("Body part is not a child of this part")]
    NotAChild,

    /// Unknown content transfer encoding.
    #[error("Unknown transfer encoding: {0}")]
    UnknownTransferEncoding(String),

    /// Unknown character set.
    #[error("Unknown charset: {0}")]
    UnknownCharset(String),

    /// Quoted-printable escape not followed by two hex digits or CRLF.
    #[error("Malformed quoted-printable escape at offset {offset}")]
    MalformedEncoding {
        /// Byte offset of the offending `=`.
        offset: usize,
    },

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// UTF-8 decode error.
    #[error("UTF-8 decode error: {0}")]
    Utf8Decode(#[from] FromUtf8Error),

    /// Character not representable in the target charset.
    #[error("Character {ch:?} cannot be represented in {charset}")]
    Unrepresentable {
        /// Charset name.
        charset: &'static str,
        /// Offending character.
        ch: char,
    },

    /// Byte not defined by the source charset.
    #[error("Byte {byte:#04x} is not valid {charset}")]
    InvalidCharsetData {
        /// Charset name.
        charset: &'static str,
        /// Offending byte.
        byte: u8,
    },

    /// Character above U+00FF in text destined for the 8-bit wire.
    #[error("Character {0:?} does not fit in a single byte")]
    NonLatin1(char),
}

impl Error {
    /// Returns true if this error came from malformed multipart structure.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedBoundary { .. } | Self::Truncated { .. } | Self::NestingTooDeep(_)
        )
    }

    /// Returns true if this error came from an invalid tree mutation.
    #[must_use]
    pub const fn is_ownership(&self) -> bool {
        matches!(
            self,
            Self::AlreadyParented | Self::CyclicInsert | Self::NotAChild
        )
    }
}
