//! Ordered header collections.

use crate::error::Result;
use crate::header::Header;
use crate::text::LineReader;
use std::fmt;
use std::io::BufRead;

/// Ordered collection of headers.
///
/// Lookups are case-insensitive and return the first match. Insertion order
/// is preserved and used when serializing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderList {
    headers: Vec<Header>,
}

impl HeaderList {
    /// Creates a new empty header list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a header block up to a blank line or end of input.
    ///
    /// Lines starting with a space or tab continue the previous header and
    /// are joined to it with CRLF before the header is parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub fn parse<R: BufRead>(reader: &mut LineReader<R>) -> Result<Self> {
        let mut headers = Self::new();

        while let Some(mut line) = reader.read_line()? {
            if line.is_empty() {
                break;
            }
            while matches!(reader.peek()?, Some(b' ' | b'\t')) {
                let Some(continuation) = reader.read_line()? else {
                    break;
                };
                line.push_str("\r\n");
                line.push_str(&continuation);
            }
            headers.push(Header::parse(&line));
        }

        Ok(headers)
    }

    /// Appends a header, even if one with the same name exists.
    pub fn push(&mut self, header: Header) {
        self.headers.push(header);
    }

    /// Gets the first header with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Header> {
        self.headers.iter().find(|h| h.is_named(name))
    }

    /// Gets the first header with the given name mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Header> {
        self.headers.iter_mut().find(|h| h.is_named(name))
    }

    /// Gets the value of the first header with the given name.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(Header::value)
    }

    /// Sets a header value, updating the first match in place or appending.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        self.entry(name).set_value(value);
    }

    /// Gets a parameter of the first header with the given name.
    #[must_use]
    pub fn get_param(&self, name: &str, param: &str) -> Option<&str> {
        self.get(name).and_then(|h| h.param(param))
    }

    /// Sets a parameter, creating the header with an empty value if needed.
    pub fn set_param(&mut self, name: &str, param: &str, value: impl Into<String>) {
        self.entry(name).set_param(param, value);
    }

    /// Removes every header with the given name. Returns how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.headers.len();
        self.headers.retain(|h| !h.is_named(name));
        before - self.headers.len()
    }

    /// Returns an iterator over headers in order.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.headers.iter()
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn entry(&mut self, name: &str) -> &mut Header {
        let pos = match self.headers.iter().position(|h| h.is_named(name)) {
            Some(pos) => pos,
            None => {
                self.headers.push(Header::new(name, ""));
                self.headers.len() - 1
            }
        };
        &mut self.headers[pos]
    }
}

impl<'a> IntoIterator for &'a HeaderList {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.headers.iter()
    }
}

impl FromIterator<Header> for HeaderList {
    fn from_iter<I: IntoIterator<Item = Header>>(iter: I) -> Self {
        Self {
            headers: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for HeaderList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for header in &self.headers {
            write!(f, "{header}\r\n")?;
        }
        Ok(())
    }
}
