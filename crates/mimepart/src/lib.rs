//! # mimepart
//!
//! MIME body part trees: parsing, building and serializing multipart
//! entities, with the standard content transfer encodings.
//!
//! ## Features
//!
//! - **Parsing**: Read nested `multipart/*` entities into a [`BodyPart`] tree
//! - **Serialization**: Write trees back, generating boundaries where missing
//! - **Transfer encodings**: 7bit, 8bit, binary, Quoted-Printable and Base64
//! - **Headers**: Ordered, case-insensitive header lists with parameters
//! - **MIME types**: Extension based lookup with [`get_mime_mapping`]
//!
//! ## Quick Start
//!
//! ### Parsing
//!
//! ```
//! use mimepart::BodyPart;
//!
//! let raw = b"Content-Type: multipart/mixed; boundary=\"X\"\r\n\
//!             \r\n\
//!             --X\r\n\
//!             Content-Type: text/plain\r\n\
//!             \r\n\
//!             Hello\r\n\
//!             --X--\r\n";
//!
//! let root = BodyPart::parse_bytes(raw)?;
//! assert_eq!(root.child_count(), 1);
//!
//! let text = root.child(0).unwrap();
//! assert_eq!(text.content_type().as_deref(), Some("text/plain"));
//! assert_eq!(text.text_content()?, "Hello\r\n");
//! # Ok::<(), mimepart::Error>(())
//! ```
//!
//! ### Building
//!
//! ```
//! use mimepart::BodyPart;
//!
//! let root = BodyPart::new();
//! root.append(&BodyPart::text("See attached.")?)?;
//! root.append(&BodyPart::attachment("notes.txt", b"remember the milk"))?;
//!
//! let bytes = root.to_bytes()?;
//! assert!(root.boundary().is_some());
//!
//! let parsed = BodyPart::parse_bytes(&bytes)?;
//! assert_eq!(parsed.child_count(), 2);
//! # Ok::<(), mimepart::Error>(())
//! ```
//!
//! ### Encoding/Decoding
//!
//! ```
//! use mimepart::{QuotedPrintable, TransferEncoding};
//!
//! let qp = TransferEncoding::QuotedPrintable(QuotedPrintable::default());
//! let encoded = qp.encode(b"caf\xe9");
//! assert_eq!(encoded, b"caf=E9=\r\n");
//! assert_eq!(qp.decode(&encoded)?, b"caf\xe9");
//! # Ok::<(), mimepart::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod header;
mod headers;
mod mime_type;
mod part;

pub mod encoding;
pub mod text;

pub use config::{DEFAULT_MAX_DEPTH, ParseOptions, ParseOptionsBuilder};
pub use encoding::{Charset, QuotedPrintable, TransferEncoding};
pub use error::{Error, Result};
pub use header::Header;
pub use headers::HeaderList;
pub use mime_type::{DEFAULT_MIME_TYPE, get_mime_mapping, type_by_extension};
pub use part::{
    BodyPart, CONTENT_BASE, CONTENT_DESCRIPTION, CONTENT_DISPOSITION, CONTENT_ID,
    CONTENT_LOCATION, CONTENT_TRANSFER_ENCODING, CONTENT_TYPE, MULTIPART_PREAMBLE,
};
pub use text::LineReader;
