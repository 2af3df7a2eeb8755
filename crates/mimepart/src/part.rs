//! MIME body part tree: parsing, serialization and mutation.

use crate::config::ParseOptions;
use crate::encoding::{Charset, QuotedPrintable, TransferEncoding};
use crate::error::{Error, Result};
use crate::headers::HeaderList;
use crate::mime_type::get_mime_mapping;
use crate::text::{self, LineReader};
use rand::Rng;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};

/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Content-Transfer-Encoding` header name.
pub const CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";
/// `Content-Disposition` header name.
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
/// `Content-ID` header name.
pub const CONTENT_ID: &str = "Content-ID";
/// `Content-Base` header name.
pub const CONTENT_BASE: &str = "Content-Base";
/// `Content-Location` header name.
pub const CONTENT_LOCATION: &str = "Content-Location";
/// `Content-Description` header name.
pub const CONTENT_DESCRIPTION: &str = "Content-Description";

/// Line written before the first delimiter of a top-level multipart body.
pub const MULTIPART_PREAMBLE: &str = "This is a multi-part message in MIME format.";

#[derive(Default)]
struct Node {
    headers: HeaderList,
    children: Vec<BodyPart>,
    content: Vec<u8>,
    parent: Weak<RefCell<Node>>,
}

/// One node of a MIME message tree.
///
/// A part is either a leaf holding raw (transfer-encoded) content, or a
/// container holding child parts separated by its boundary. `BodyPart` is a
/// shared handle: cloning it yields another handle to the same node. Children
/// are owned by their parent and refer back to it weakly.
///
/// A part can belong to at most one parent. Attaching a part that already has
/// one fails with [`Error::AlreadyParented`]; detach it with
/// [`remove`](Self::remove) first.
#[derive(Clone, Default)]
pub struct BodyPart {
    node: Rc<RefCell<Node>>,
}

impl BodyPart {
    /// Creates an empty part with no headers and no content.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a leaf part from headers and already-encoded content.
    #[must_use]
    pub fn with_content(headers: HeaderList, content: impl Into<Vec<u8>>) -> Self {
        let part = Self::with_headers(headers);
        part.set_content(content);
        part
    }

    /// Creates a part with the given headers.
    #[must_use]
    pub fn with_headers(headers: HeaderList) -> Self {
        Self {
            node: Rc::new(RefCell::new(Node {
                headers,
                ..Node::default()
            })),
        }
    }

    /// Creates a `text/plain` leaf.
    ///
    /// ASCII text is stored as `us-ascii`/`7bit`; anything else as
    /// `utf-8`/`quoted-printable`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be encoded.
    pub fn text(text: &str) -> Result<Self> {
        let (charset, encoding) = if text::is_ascii(text) {
            (Charset::UsAscii, TransferEncoding::SevenBit)
        } else {
            (
                Charset::Utf8,
                TransferEncoding::QuotedPrintable(QuotedPrintable::DEFAULT),
            )
        };

        let part = Self::new();
        part.set_content_type("text/plain");
        part.set_charset(charset.name());
        part.set_transfer_encoding(encoding);
        part.set_text_content(text)?;
        Ok(part)
    }

    /// Creates a base64 attachment leaf.
    ///
    /// The content type is looked up from the file name's extension.
    #[must_use]
    pub fn attachment(file_name: &str, data: &[u8]) -> Self {
        let part = Self::new();
        part.set_content_type(get_mime_mapping(file_name));
        part.set_name(file_name);
        part.set_transfer_encoding(TransferEncoding::Base64);
        part.set_content_disposition("attachment");
        part.set_filename(file_name);
        part.set_content(TransferEncoding::Base64.encode(data));
        part
    }

    /// Creates a base64 attachment leaf from a file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn attachment_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(path = %path.display(), bytes = data.len(), "loaded attachment");
        Ok(Self::attachment(&file_name, &data))
    }

    // --- Parsing ---

    /// Parses a complete MIME entity with default options.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed multipart structure or read failure.
    pub fn parse<R: BufRead>(reader: &mut LineReader<R>) -> Result<Self> {
        Self::parse_with(reader, &ParseOptions::default())
    }

    /// Parses a complete MIME entity.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed multipart structure or read failure.
    pub fn parse_with<R: BufRead>(reader: &mut LineReader<R>, options: &ParseOptions) -> Result<Self> {
        let (part, _) = Self::parse_at_depth(reader, &[], options, 0)?;
        Ok(part)
    }

    /// Parses a MIME entity held in memory.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed multipart structure.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        Self::parse(&mut LineReader::new(bytes))
    }

    /// Parses a MIME entity from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::parse(&mut LineReader::new(BufReader::new(file)))
    }

    /// Parses one entity enclosed by `parent_boundary`.
    ///
    /// Returns the part and the delimiter line that ended it (`None` at end
    /// of input), leaving `reader` positioned right after that line.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed multipart structure or read failure.
    pub fn parse_part<R: BufRead>(
        reader: &mut LineReader<R>,
        parent_boundary: Option<&str>,
        options: &ParseOptions,
    ) -> Result<(Self, Option<String>)> {
        let enclosing: Vec<String> = parent_boundary.map(str::to_string).into_iter().collect();
        Self::parse_at_depth(reader, &enclosing, options, 0)
    }

    /// `enclosing` lists the boundaries of all containing parts, outermost
    /// first. The last one always ends this entity; the others only with
    /// [`ParseOptions::ancestor_boundaries`].
    fn parse_at_depth<R: BufRead>(
        reader: &mut LineReader<R>,
        enclosing: &[String],
        options: &ParseOptions,
        depth: usize,
    ) -> Result<(Self, Option<String>)> {
        if depth > options.max_depth {
            warn!(depth, max_depth = options.max_depth, "multipart nesting limit exceeded");
            return Err(Error::NestingTooDeep(options.max_depth));
        }

        let part = Self::with_headers(HeaderList::parse(reader)?);
        let lenient = options.lenient_boundaries;

        let Some(boundary) = part.boundary() else {
            if part.is_multipart() {
                warn!(
                    content_type = %part.content_type().unwrap_or_default(),
                    "multipart part without boundary, reading as leaf"
                );
            }
            let (content, terminator) =
                text::scan_until(reader, delimiters(enclosing, options), lenient)?;
            trace!(bytes = content.len(), depth, "parsed leaf part");
            part.node.borrow_mut().content = content;
            return Ok((part, terminator));
        };

        let open = format!("--{boundary}");
        let close = format!("--{boundary}--");

        let mut scope = enclosing.to_vec();
        scope.push(boundary.clone());

        let (_preamble, mut terminator) =
            text::scan_until(reader, delimiters(&scope, options), lenient)?;
        while terminator.as_deref() == Some(open.as_str()) {
            let (child, next) = Self::parse_at_depth(reader, &scope, options, depth + 1)?;
            part.attach(child);
            terminator = next;
        }

        match terminator {
            Some(line) if line == close => {}
            Some(line) => {
                warn!(boundary = %boundary, line = %line, "unexpected delimiter in multipart body");
                return Err(Error::UnexpectedBoundary { boundary, line });
            }
            None => return Err(Error::Truncated { boundary }),
        }

        debug!(
            boundary = %boundary,
            children = part.child_count(),
            depth,
            "parsed multipart body"
        );

        let (_epilogue, terminator) =
            text::scan_until(reader, delimiters(enclosing, options), lenient)?;
        Ok((part, terminator))
    }

    // --- Serialization ---

    /// Writes the part in wire format.
    ///
    /// A container without a boundary gets a generated one stored in its
    /// `Content-Type` header; this mutates the part. The line break before a
    /// delimiter is only written when the preceding content does not already
    /// end with CRLF, so leaf content reads back byte for byte.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or a header holds characters above
    /// `U+00FF`.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        self.write_with_rng(out, &mut rand::thread_rng())
    }

    /// Writes the part, drawing generated boundaries from `rng`.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write).
    pub fn write_with_rng<W: Write, R: Rng + ?Sized>(&self, out: &mut W, rng: &mut R) -> Result<()> {
        self.write_entity(out, rng).map(|_| ())
    }

    /// Serializes the part into a byte vector.
    ///
    /// # Errors
    ///
    /// Same as [`write`](Self::write).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        Ok(out)
    }

    /// Writes the part to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = BufWriter::new(File::create(path.as_ref())?);
        self.write(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Writes this entity; returns true if the output ends with a line break.
    fn write_entity<W: Write, R: Rng + ?Sized>(&self, out: &mut W, rng: &mut R) -> Result<bool> {
        let boundary = self.ensure_boundary(rng);
        let node = self.node.borrow();

        for header in &node.headers {
            text::write_line(out, &header.to_string())?;
        }
        text::write_line(out, "")?;

        let Some(boundary) = boundary else {
            out.write_all(&node.content)?;
            return Ok(node.content.is_empty() || node.content.ends_with(b"\r\n"));
        };

        if node.parent.upgrade().is_none() {
            text::write_line(out, MULTIPART_PREAMBLE)?;
        }

        let mut at_line_start = true;
        for child in &node.children {
            if !at_line_start {
                out.write_all(b"\r\n")?;
            }
            text::write_line(out, &format!("--{boundary}"))?;
            at_line_start = child.write_entity(out, rng)?;
        }
        if !at_line_start {
            out.write_all(b"\r\n")?;
        }
        text::write_line(out, &format!("--{boundary}--"))?;

        Ok(true)
    }

    /// Returns the boundary to serialize with, or `None` to write as a leaf.
    fn ensure_boundary<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        let existing = self.boundary();
        if self.is_leaf() {
            // An empty container keeps its boundary so it reparses the same.
            return existing.filter(|_| self.node.borrow().content.is_empty());
        }
        if existing.is_some() {
            return existing;
        }

        let boundary = text::generate_boundary(rng);
        debug!(boundary = %boundary, "generated multipart boundary");

        let mut node = self.node.borrow_mut();
        if node.headers.get_value(CONTENT_TYPE).is_none_or(str::is_empty) {
            node.headers.set_value(CONTENT_TYPE, "multipart/mixed");
        }
        node.headers.set_param(CONTENT_TYPE, "boundary", boundary.clone());
        Some(boundary)
    }

    // --- Content ---

    /// Returns the raw, still transfer-encoded content.
    #[must_use]
    pub fn content(&self) -> Ref<'_, [u8]> {
        Ref::map(self.node.borrow(), |node| node.content.as_slice())
    }

    /// Replaces the raw content. It must already be transfer-encoded.
    pub fn set_content(&self, content: impl Into<Vec<u8>>) {
        self.node.borrow_mut().content = content.into();
    }

    /// Returns the content with the transfer encoding removed.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown transfer encoding or malformed content.
    pub fn decoded_content(&self) -> Result<Vec<u8>> {
        let codec = self.codec()?;
        codec.decode(&self.content())
    }

    /// Transfer-encodes `data` and stores it as the content.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown transfer encoding.
    pub fn set_decoded_content(&self, data: &[u8]) -> Result<()> {
        let codec = self.codec()?;
        self.set_content(codec.encode(data));
        Ok(())
    }

    /// Returns the content as text: transfer-decoded, then charset-decoded.
    ///
    /// Defaults to `us-ascii` and `7bit` when the headers are absent.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown charset or transfer encoding names, or
    /// content invalid for either.
    pub fn text_content(&self) -> Result<String> {
        let charset = self.charset_codec()?;
        let decoded = self.decoded_content()?;
        charset.decode(&decoded)
    }

    /// Stores text as content: charset-encoded, then transfer-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown charset or transfer encoding names, or
    /// characters the charset cannot represent.
    pub fn set_text_content(&self, text: &str) -> Result<()> {
        let charset = self.charset_codec()?;
        let bytes = charset.encode(text)?;
        self.set_decoded_content(&bytes)
    }

    /// Resolves the `Content-Transfer-Encoding`, defaulting to `7bit`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTransferEncoding`] for unregistered names.
    pub fn codec(&self) -> Result<TransferEncoding> {
        match self.transfer_encoding() {
            None => Ok(TransferEncoding::SevenBit),
            Some(name) => {
                TransferEncoding::from_name(&name).ok_or(Error::UnknownTransferEncoding(name))
            }
        }
    }

    /// Resolves the `charset` parameter, defaulting to `us-ascii`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCharset`] for unsupported names.
    pub fn charset_codec(&self) -> Result<Charset> {
        match self.charset() {
            None => Ok(Charset::UsAscii),
            Some(name) => Charset::from_name(&name).ok_or(Error::UnknownCharset(name)),
        }
    }

    // --- Headers ---

    /// Borrows the header list.
    #[must_use]
    pub fn headers(&self) -> Ref<'_, HeaderList> {
        Ref::map(self.node.borrow(), |node| &node.headers)
    }

    /// Borrows the header list mutably.
    #[must_use]
    pub fn headers_mut(&self) -> RefMut<'_, HeaderList> {
        RefMut::map(self.node.borrow_mut(), |node| &mut node.headers)
    }

    fn header_value(&self, name: &str) -> Option<String> {
        self.headers().get_value(name).map(str::to_string)
    }

    fn header_param(&self, name: &str, param: &str) -> Option<String> {
        self.headers().get_param(name, param).map(str::to_string)
    }

    /// Returns the `Content-Type` value without parameters.
    #[must_use]
    pub fn content_type(&self) -> Option<String> {
        self.header_value(CONTENT_TYPE)
    }

    /// Sets the `Content-Type` value, keeping its parameters.
    pub fn set_content_type(&self, value: &str) {
        self.headers_mut().set_value(CONTENT_TYPE, value);
    }

    /// Returns true if the `Content-Type` is `multipart/*`.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.headers()
            .get_value(CONTENT_TYPE)
            .and_then(|ct| ct.split_once('/'))
            .is_some_and(|(main, _)| main.trim().eq_ignore_ascii_case("multipart"))
    }

    /// Returns the `charset` parameter of `Content-Type`.
    #[must_use]
    pub fn charset(&self) -> Option<String> {
        self.header_param(CONTENT_TYPE, "charset")
    }

    /// Sets the `charset` parameter of `Content-Type`.
    pub fn set_charset(&self, charset: &str) {
        self.headers_mut().set_param(CONTENT_TYPE, "charset", charset);
    }

    /// Returns the `boundary` parameter of `Content-Type`.
    #[must_use]
    pub fn boundary(&self) -> Option<String> {
        self.header_param(CONTENT_TYPE, "boundary")
    }

    /// Sets the `boundary` parameter of `Content-Type`.
    pub fn set_boundary(&self, boundary: &str) {
        self.headers_mut().set_param(CONTENT_TYPE, "boundary", boundary);
    }

    /// Returns the `name` parameter of `Content-Type`.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.header_param(CONTENT_TYPE, "name")
    }

    /// Sets the `name` parameter of `Content-Type`.
    pub fn set_name(&self, name: &str) {
        self.headers_mut().set_param(CONTENT_TYPE, "name", name);
    }

    /// Returns the `Content-Transfer-Encoding` value.
    #[must_use]
    pub fn transfer_encoding(&self) -> Option<String> {
        self.header_value(CONTENT_TRANSFER_ENCODING)
    }

    /// Sets the `Content-Transfer-Encoding` header.
    ///
    /// Existing content is not re-encoded.
    pub fn set_transfer_encoding(&self, encoding: TransferEncoding) {
        self.headers_mut()
            .set_value(CONTENT_TRANSFER_ENCODING, encoding.name());
    }

    /// Returns the `Content-Disposition` value without parameters.
    #[must_use]
    pub fn content_disposition(&self) -> Option<String> {
        self.header_value(CONTENT_DISPOSITION)
    }

    /// Sets the `Content-Disposition` value, keeping its parameters.
    pub fn set_content_disposition(&self, disposition: &str) {
        self.headers_mut().set_value(CONTENT_DISPOSITION, disposition);
    }

    /// Returns the `filename` parameter of `Content-Disposition`.
    #[must_use]
    pub fn filename(&self) -> Option<String> {
        self.header_param(CONTENT_DISPOSITION, "filename")
    }

    /// Sets the `filename` parameter of `Content-Disposition`.
    pub fn set_filename(&self, filename: &str) {
        self.headers_mut()
            .set_param(CONTENT_DISPOSITION, "filename", filename);
    }

    /// Returns the `Content-ID` value.
    #[must_use]
    pub fn content_id(&self) -> Option<String> {
        self.header_value(CONTENT_ID)
    }

    /// Sets the `Content-ID` header.
    pub fn set_content_id(&self, id: &str) {
        self.headers_mut().set_value(CONTENT_ID, id);
    }

    /// Returns the `Content-Base` value.
    #[must_use]
    pub fn content_base(&self) -> Option<String> {
        self.header_value(CONTENT_BASE)
    }

    /// Sets the `Content-Base` header.
    pub fn set_content_base(&self, base: &str) {
        self.headers_mut().set_value(CONTENT_BASE, base);
    }

    /// Returns the `Content-Location` value.
    #[must_use]
    pub fn content_location(&self) -> Option<String> {
        self.header_value(CONTENT_LOCATION)
    }

    /// Sets the `Content-Location` header.
    pub fn set_content_location(&self, location: &str) {
        self.headers_mut().set_value(CONTENT_LOCATION, location);
    }

    /// Returns the `Content-Description` value.
    #[must_use]
    pub fn content_description(&self) -> Option<String> {
        self.header_value(CONTENT_DESCRIPTION)
    }

    /// Sets the `Content-Description` header.
    pub fn set_content_description(&self, description: &str) {
        self.headers_mut()
            .set_value(CONTENT_DESCRIPTION, description);
    }

    // --- Tree ---

    /// Returns true if both handles refer to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Returns the parent part, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.node.borrow().parent.upgrade().map(|node| Self { node })
    }

    /// Returns true if the part has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.node.borrow().parent.upgrade().is_none()
    }

    /// Returns true if the part has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.node.borrow().children.is_empty()
    }

    /// Returns the number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.node.borrow().children.len()
    }

    /// Returns the child at `index`.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<Self> {
        self.node.borrow().children.get(index).cloned()
    }

    /// Returns handles to the children in order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.node.borrow().children.clone()
    }

    /// Returns every part below this one in pre-order.
    #[must_use]
    pub fn descendants(&self) -> Vec<Self> {
        let mut found = Vec::new();
        let mut stack: Vec<Self> = self.children().into_iter().rev().collect();
        while let Some(part) = stack.pop() {
            stack.extend(part.children().into_iter().rev());
            found.push(part);
        }
        found
    }

    /// Finds this part or a descendant by `Content-ID`, ignoring angle brackets.
    #[must_use]
    pub fn find_by_content_id(&self, id: &str) -> Option<Self> {
        let wanted = strip_angle_brackets(id);
        std::iter::once(self.clone())
            .chain(self.descendants())
            .find(|part| {
                part.content_id()
                    .is_some_and(|cid| strip_angle_brackets(&cid) == wanted)
            })
    }

    /// Inserts `child` before `before`, or at the end when `before` is `None`.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyParented`] if `child` already has a parent
    /// - [`Error::CyclicInsert`] if `child` is this part or one of its ancestors
    /// - [`Error::NotAChild`] if `before` is not a child of this part
    pub fn insert(&self, child: &Self, before: Option<&Self>) -> Result<()> {
        if !child.is_root() {
            return Err(Error::AlreadyParented);
        }
        if self.ptr_eq(child) || self.ancestors().any(|ancestor| ancestor.ptr_eq(child)) {
            return Err(Error::CyclicInsert);
        }
        let pos = match before {
            Some(sibling) => self.position_of(sibling).ok_or(Error::NotAChild)?,
            None => self.child_count(),
        };

        child.node.borrow_mut().parent = Rc::downgrade(&self.node);
        self.node.borrow_mut().children.insert(pos, child.clone());
        Ok(())
    }

    /// Appends `child` as the last child.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn append(&self, child: &Self) -> Result<()> {
        self.insert(child, None)
    }

    /// Detaches `child` from this part.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAChild`] if `child` is not a child of this part.
    pub fn remove(&self, child: &Self) -> Result<()> {
        let pos = self.position_of(child).ok_or(Error::NotAChild)?;
        let removed = self.node.borrow_mut().children.remove(pos);
        removed.node.borrow_mut().parent = Weak::new();
        Ok(())
    }

    fn attach(&self, child: Self) {
        child.node.borrow_mut().parent = Rc::downgrade(&self.node);
        self.node.borrow_mut().children.push(child);
    }

    fn position_of(&self, child: &Self) -> Option<usize> {
        self.node
            .borrow()
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
    }

    fn ancestors(&self) -> impl Iterator<Item = Self> {
        std::iter::successors(self.parent(), Self::parent)
    }
}

impl fmt::Debug for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("BodyPart")
            .field("headers", &node.headers)
            .field("content_len", &node.content.len())
            .field("children", &node.children)
            .finish()
    }
}

/// Boundaries whose delimiters end a body scanned inside `scope`.
fn delimiters<'a>(scope: &'a [String], options: &ParseOptions) -> &'a [String] {
    if options.ancestor_boundaries {
        scope
    } else {
        &scope[scope.len().saturating_sub(1)..]
    }
}

fn strip_angle_brackets(id: &str) -> &str {
    let id = id.trim();
    id.strip_prefix('<')
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::header::Header;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn leaf(content_type: &str, body: &str) -> BodyPart {
        let part = BodyPart::new();
        part.set_content_type(content_type);
        part.set_content(body.as_bytes());
        part
    }

    fn write_string(part: &BodyPart) -> String {
        let mut rng = StdRng::seed_from_u64(42);
        let mut out = Vec::new();
        part.write_with_rng(&mut out, &mut rng).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_new_part_is_empty_leaf() {
        let part = BodyPart::new();
        assert!(part.is_leaf());
        assert!(part.is_root());
        assert!(part.headers().is_empty());
        assert!(part.content().is_empty());
    }

    #[test]
    fn test_derived_accessors() {
        let mut headers = HeaderList::new();
        headers.push(Header::parse(
            "Content-Type: image/png; name=\"pic.png\"; charset=us-ascii",
        ));
        headers.push(Header::parse("Content-Transfer-Encoding: base64"));
        headers.push(Header::parse(
            "Content-Disposition: inline; filename=\"pic.png\"",
        ));
        headers.push(Header::parse("Content-ID: <pic@local>"));
        headers.push(Header::parse("Content-Location: http://example.com/pic.png"));
        headers.push(Header::parse("Content-Base: http://example.com/"));
        let part = BodyPart::with_headers(headers);

        assert_eq!(part.content_type().as_deref(), Some("image/png"));
        assert_eq!(part.name().as_deref(), Some("pic.png"));
        assert_eq!(part.charset().as_deref(), Some("us-ascii"));
        assert_eq!(part.transfer_encoding().as_deref(), Some("base64"));
        assert_eq!(part.content_disposition().as_deref(), Some("inline"));
        assert_eq!(part.filename().as_deref(), Some("pic.png"));
        assert_eq!(part.content_id().as_deref(), Some("<pic@local>"));
        assert_eq!(
            part.content_location().as_deref(),
            Some("http://example.com/pic.png")
        );
        assert_eq!(part.content_base().as_deref(), Some("http://example.com/"));
        assert_eq!(part.boundary(), None);
        assert!(!part.is_multipart());
    }

    #[test]
    fn test_text_content_defaults() {
        let part = leaf("text/plain", "Hello\r\n");
        assert_eq!(part.text_content().unwrap(), "Hello\r\n");
    }

    #[test]
    fn test_set_text_content_quoted_printable() {
        let part = BodyPart::new();
        part.set_content_type("text/plain");
        part.set_charset("iso-8859-1");
        part.set_transfer_encoding(TransferEncoding::QuotedPrintable(QuotedPrintable::DEFAULT));
        part.set_text_content("caf\u{e9}").unwrap();
        assert_eq!(&*part.content(), b"caf=E9=\r\n");
        assert_eq!(part.text_content().unwrap(), "caf\u{e9}");
    }

    #[test]
    fn test_unknown_names_fail() {
        let part = leaf("text/plain", "x");
        part.set_charset("x-unknown");
        assert!(matches!(part.text_content(), Err(Error::UnknownCharset(name)) if name == "x-unknown"));
        assert!(part.set_text_content("x").is_err());

        let part = leaf("text/plain", "x");
        part.headers_mut()
            .set_value(CONTENT_TRANSFER_ENCODING, "x-uuencode");
        assert!(matches!(
            part.text_content(),
            Err(Error::UnknownTransferEncoding(_))
        ));
    }

    #[test]
    fn test_ascii_rejects_non_ascii_text() {
        let part = leaf("text/plain", "");
        assert!(matches!(
            part.set_text_content("\u{e9}"),
            Err(Error::Unrepresentable { .. })
        ));
    }

    #[test]
    fn test_text_constructor() {
        let ascii = BodyPart::text("plain words").unwrap();
        assert_eq!(ascii.charset().as_deref(), Some("us-ascii"));
        assert_eq!(ascii.transfer_encoding().as_deref(), Some("7bit"));
        assert_eq!(&*ascii.content(), b"plain words");

        let unicode = BodyPart::text("na\u{ef}ve \u{2603}").unwrap();
        assert_eq!(unicode.charset().as_deref(), Some("utf-8"));
        assert_eq!(unicode.transfer_encoding().as_deref(), Some("quoted-printable"));
        assert_eq!(unicode.text_content().unwrap(), "na\u{ef}ve \u{2603}");
    }

    #[test]
    fn test_attachment_constructor() {
        let part = BodyPart::attachment("photo.JPG", b"\xff\xd8\xff");
        assert_eq!(part.content_type().as_deref(), Some("image/jpeg"));
        assert_eq!(part.name().as_deref(), Some("photo.JPG"));
        assert_eq!(part.content_disposition().as_deref(), Some("attachment"));
        assert_eq!(part.filename().as_deref(), Some("photo.JPG"));
        assert_eq!(part.decoded_content().unwrap(), b"\xff\xd8\xff");
    }

    #[test]
    fn test_insert_and_remove() {
        let root = BodyPart::new();
        let a = leaf("text/plain", "a");
        let b = leaf("text/plain", "b");
        let c = leaf("text/plain", "c");

        root.append(&a).unwrap();
        root.append(&c).unwrap();
        root.insert(&b, Some(&c)).unwrap();

        let order: Vec<_> = root
            .children()
            .iter()
            .map(|p| p.content().to_vec())
            .collect();
        assert_eq!(order, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert!(b.parent().unwrap().ptr_eq(&root));

        root.remove(&b).unwrap();
        assert!(b.is_root());
        assert_eq!(root.child_count(), 2);
        assert!(matches!(root.remove(&b), Err(Error::NotAChild)));
    }

    #[test]
    fn test_insert_already_parented_fails() {
        let first = BodyPart::new();
        let second = BodyPart::new();
        let child = BodyPart::new();
        first.append(&child).unwrap();

        assert!(matches!(second.append(&child), Err(Error::AlreadyParented)));
        assert_eq!(first.child_count(), 1);
        assert_eq!(second.child_count(), 0);
        assert!(child.parent().unwrap().ptr_eq(&first));
    }

    #[test]
    fn test_insert_cycle_fails() {
        let root = BodyPart::new();
        let mid = BodyPart::new();
        root.append(&mid).unwrap();

        assert!(matches!(root.append(&root), Err(Error::CyclicInsert)));
        assert!(matches!(mid.append(&root), Err(Error::CyclicInsert)));
        assert_eq!(mid.child_count(), 0);
    }

    #[test]
    fn test_insert_before_unknown_sibling_fails() {
        let root = BodyPart::new();
        let stranger = BodyPart::new();
        let child = BodyPart::new();
        assert!(matches!(
            root.insert(&child, Some(&stranger)),
            Err(Error::NotAChild)
        ));
        assert!(child.is_root());
    }

    #[test]
    fn test_parent_dropped_releases_child() {
        let child = BodyPart::new();
        {
            let root = BodyPart::new();
            root.append(&child).unwrap();
        }
        assert!(child.parent().is_none());
    }

    #[test]
    fn test_descendants_and_find() {
        let root = BodyPart::new();
        let alt = BodyPart::new();
        let text = leaf("text/plain", "t");
        let image = leaf("image/png", "i");
        image.set_content_id("<img1@local>");
        root.append(&alt).unwrap();
        alt.append(&text).unwrap();
        root.append(&image).unwrap();

        let all = root.descendants();
        assert_eq!(all.len(), 3);
        assert!(all[0].ptr_eq(&alt));
        assert!(all[1].ptr_eq(&text));
        assert!(all[2].ptr_eq(&image));

        assert!(root.find_by_content_id("img1@local").unwrap().ptr_eq(&image));
        assert!(root.find_by_content_id("<img1@local>").is_some());
        assert!(root.find_by_content_id("missing").is_none());
    }

    #[test]
    fn test_write_leaf() {
        let part = leaf("text/plain", "Hello\r\n");
        assert_eq!(write_string(&part), "Content-Type: text/plain\r\n\r\nHello\r\n");
    }

    #[test]
    fn test_write_generates_boundary() {
        let root = BodyPart::new();
        root.append(&leaf("text/plain", "one\r\n")).unwrap();

        let written = write_string(&root);
        let boundary = root.boundary().unwrap();
        assert!(boundary.starts_with("__Part__"));
        assert_eq!(root.content_type().as_deref(), Some("multipart/mixed"));

        let expected = format!(
            "Content-Type: multipart/mixed;\r\n\tboundary=\"{boundary}\"\r\n\r\n\
             {MULTIPART_PREAMBLE}\r\n\
             --{boundary}\r\n\
             Content-Type: text/plain\r\n\r\n\
             one\r\n\
             --{boundary}--\r\n"
        );
        assert_eq!(written, expected);

        // The generated boundary is kept for later writes.
        assert_eq!(write_string(&root), expected);
    }

    #[test]
    fn test_write_separates_unterminated_content() {
        let root = BodyPart::new();
        root.set_content_type("multipart/alternative");
        root.set_boundary("B");
        root.append(&leaf("text/plain", "no newline")).unwrap();
        root.append(&BodyPart::new()).unwrap();

        assert_eq!(
            write_string(&root),
            "Content-Type: multipart/alternative;\r\n\tboundary=\"B\"\r\n\r\n\
             This is a multi-part message in MIME format.\r\n\
             --B\r\n\
             Content-Type: text/plain\r\n\r\n\
             no newline\r\n\
             --B\r\n\
             \r\n\
             --B--\r\n"
        );
    }

    #[test]
    fn test_write_empty_container() {
        let root = BodyPart::new();
        root.set_content_type("multipart/mixed");
        root.set_boundary("B");

        let written = write_string(&root);
        assert_eq!(
            written,
            "Content-Type: multipart/mixed;\r\n\tboundary=\"B\"\r\n\r\n\
             This is a multi-part message in MIME format.\r\n\
             --B--\r\n"
        );

        let reparsed = BodyPart::parse_bytes(written.as_bytes()).unwrap();
        assert_eq!(reparsed.boundary().as_deref(), Some("B"));
        assert!(reparsed.is_leaf());
        assert!(reparsed.content().is_empty());
        assert_eq!(write_string(&reparsed), written);
    }

    #[test]
    fn test_write_empty_nested_container() {
        let root = BodyPart::new();
        root.set_content_type("multipart/mixed");
        root.set_boundary("outer");
        let empty = BodyPart::new();
        empty.set_content_type("multipart/related");
        empty.set_boundary("inner");
        root.append(&empty).unwrap();

        let written = write_string(&root);
        assert!(written.ends_with("--outer\r\nContent-Type: multipart/related;\r\n\tboundary=\"inner\"\r\n\r\n--inner--\r\n--outer--\r\n"));

        let reparsed = BodyPart::parse_bytes(written.as_bytes()).unwrap();
        let child = reparsed.child(0).unwrap();
        assert_eq!(child.boundary().as_deref(), Some("inner"));
        assert_eq!(child.child_count(), 0);
    }

    #[test]
    fn test_write_nested_has_single_preamble() {
        let root = BodyPart::new();
        root.set_content_type("multipart/mixed");
        root.set_boundary("outer");
        let inner = BodyPart::new();
        inner.set_content_type("multipart/alternative");
        inner.set_boundary("inner");
        inner.append(&leaf("text/plain", "x\r\n")).unwrap();
        root.append(&inner).unwrap();

        let written = write_string(&root);
        assert_eq!(written.matches(MULTIPART_PREAMBLE).count(), 1);
        assert!(written.contains("--inner--\r\n--outer--\r\n"));
    }

    #[test]
    fn test_write_rejects_wide_header_chars() {
        let part = leaf("text/plain", "");
        part.set_content_description("\u{2603}");
        let mut out = Vec::new();
        assert!(matches!(part.write(&mut out), Err(Error::NonLatin1(_))));
    }
}
