//! Raw 8-bit text handling.
//!
//! MIME bodies travel as bytes, but headers and delimiters are line-oriented
//! text. This module bridges the two with an identity mapping: byte value `N`
//! corresponds to the character `U+00NN` (ISO-8859-1). Any byte sequence
//! survives a round trip through [`bytes_to_text`] and [`text_to_bytes`].

use crate::error::{Error, Result};
use chrono::NaiveDateTime;
use rand::Rng;
use std::io::{BufRead, Write};

/// Reports whether every character is tab, CR, LF or printable ASCII.
#[must_use]
pub fn is_ascii(s: &str) -> bool {
    s.chars()
        .all(|c| matches!(c, '\t' | '\r' | '\n' | ' '..='~'))
}

/// Maps each byte to the character with the same code point.
#[must_use]
pub fn bytes_to_text(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Maps each character back to a single byte.
///
/// # Errors
///
/// Returns [`Error::NonLatin1`] for characters above `U+00FF`.
pub fn text_to_bytes(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| u8::try_from(c).map_err(|_| Error::NonLatin1(c)))
        .collect()
}

/// Generates a boundary token from the local clock and `rng`.
///
/// Uniqueness is probabilistic, not cryptographic.
pub fn generate_boundary<R: Rng + ?Sized>(rng: &mut R) -> String {
    generate_boundary_at(chrono::Local::now().naive_local(), rng)
}

/// Generates a boundary token for a fixed timestamp.
pub fn generate_boundary_at<R: Rng + ?Sized>(timestamp: NaiveDateTime, rng: &mut R) -> String {
    let stamp = timestamp.format("%Y%m%d%H%M%S%3f");
    let salt = rng.r#gen::<u32>();
    format!("__Part__{stamp}__{salt}__")
}

/// Writes `line` followed by CRLF as raw bytes.
///
/// # Errors
///
/// Returns an error if `line` holds characters above `U+00FF` or the write fails.
pub fn write_line<W: Write + ?Sized>(out: &mut W, line: &str) -> Result<()> {
    out.write_all(&text_to_bytes(line)?)?;
    out.write_all(b"\r\n")?;
    Ok(())
}

/// Sequential line reader over 8-bit transport data.
///
/// Lines end at CRLF, LF or a bare CR; the terminator is not returned.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
}

impl<R: BufRead> LineReader<R> {
    /// Wraps a buffered reader.
    #[must_use]
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Returns the next byte without consuming it, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reader fails.
    pub fn peek(&mut self) -> Result<Option<u8>> {
        Ok(self.inner.fill_buf()?.first().copied())
    }

    /// Reads the next line as raw bytes, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reader fails.
    pub fn read_line_bytes(&mut self) -> Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        let mut read_any = false;

        loop {
            let buf = self.inner.fill_buf()?;
            if buf.is_empty() {
                return Ok(read_any.then_some(line));
            }
            read_any = true;

            if let Some(pos) = buf.iter().position(|&b| b == b'\r' || b == b'\n') {
                let terminator = buf[pos];
                line.extend_from_slice(&buf[..pos]);
                self.inner.consume(pos + 1);
                if terminator == b'\r' && self.peek()? == Some(b'\n') {
                    self.inner.consume(1);
                }
                return Ok(Some(line));
            }

            let len = buf.len();
            line.extend_from_slice(buf);
            self.inner.consume(len);
        }
    }

    /// Reads the next line as text, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reader fails.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.read_line_bytes()?.map(|line| bytes_to_text(&line)))
    }
}

/// Reads lines until a delimiter of `boundary` or end of input.
///
/// Each consumed line is appended to the result followed by CRLF. The
/// delimiter line itself is returned separately (`None` at end of input).
/// Matching is exact: `--boundary` or `--boundary--`.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn read_until<R: BufRead>(
    reader: &mut LineReader<R>,
    boundary: Option<&str>,
) -> Result<(String, Option<String>)> {
    let (bytes, terminator) = read_bytes_until(reader, boundary)?;
    Ok((bytes_to_text(&bytes), terminator))
}

/// Like [`read_until`], accumulating raw bytes instead of text.
///
/// # Errors
///
/// Returns an error if reading fails.
pub fn read_bytes_until<R: BufRead>(
    reader: &mut LineReader<R>,
    boundary: Option<&str>,
) -> Result<(Vec<u8>, Option<String>)> {
    scan_until(reader, boundary.as_slice(), false)
}

/// Delimiter scan shared by the parser.
///
/// Stops at the first delimiter line of any boundary in `boundaries`. With
/// `lenient` set, trailing spaces and tabs after a delimiter are ignored and
/// the returned terminator is the trimmed line.
pub(crate) fn scan_until<R: BufRead, S: AsRef<str>>(
    reader: &mut LineReader<R>,
    boundaries: &[S],
    lenient: bool,
) -> Result<(Vec<u8>, Option<String>)> {
    let delimiters = boundaries
        .iter()
        .map(|boundary| {
            let mut open = b"--".to_vec();
            open.extend_from_slice(&text_to_bytes(boundary.as_ref())?);
            let mut close = open.clone();
            close.extend_from_slice(b"--");
            Ok((open, close))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut content = Vec::new();
    while let Some(line) = reader.read_line_bytes()? {
        let candidate = if lenient {
            trim_trailing_blanks(&line)
        } else {
            &line[..]
        };
        if delimiters
            .iter()
            .any(|(open, close)| candidate == &open[..] || candidate == &close[..])
        {
            return Ok((content, Some(bytes_to_text(candidate))));
        }
        content.extend_from_slice(&line);
        content.extend_from_slice(b"\r\n");
    }

    Ok((content, None))
}

fn trim_trailing_blanks(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&b| b != b' ' && b != b'\t')
        .map_or(0, |pos| pos + 1);
    &line[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn reader(input: &[u8]) -> LineReader<&[u8]> {
        LineReader::new(input)
    }

    #[test]
    fn test_is_ascii() {
        assert!(is_ascii("Hello, World!\r\n\tok"));
        assert!(is_ascii(""));
        assert!(!is_ascii("H\u{e9}llo"));
        assert!(!is_ascii("bell\u{7}"));
        assert!(!is_ascii("del\u{7f}"));
    }

    #[test]
    fn test_byte_text_identity() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = bytes_to_text(&bytes);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(text_to_bytes(&text).unwrap(), bytes);
    }

    #[test]
    fn test_text_to_bytes_rejects_wide_chars() {
        assert!(matches!(
            text_to_bytes("snow \u{2603}"),
            Err(Error::NonLatin1('\u{2603}'))
        ));
    }

    #[test]
    fn test_generate_boundary_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let timestamp = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(8, 5, 1, 42)
            .unwrap();
        let boundary = generate_boundary_at(timestamp, &mut rng);
        assert!(boundary.starts_with("__Part__20240309080501042__"));
        assert!(boundary.ends_with("__"));

        let mut again = StdRng::seed_from_u64(7);
        assert_eq!(boundary, generate_boundary_at(timestamp, &mut again));
    }

    #[test]
    fn test_generate_boundary_varies() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = generate_boundary(&mut rng);
        let b = generate_boundary(&mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_write_line() {
        let mut out = Vec::new();
        write_line(&mut out, "caf\u{e9}").unwrap();
        assert_eq!(out, b"caf\xe9\r\n");
    }

    #[test]
    fn test_read_line_terminators() {
        let mut r = reader(b"one\r\ntwo\nthree\rfour");
        assert_eq!(r.read_line().unwrap().as_deref(), Some("one"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("two"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("three"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("four"));
        assert_eq!(r.read_line().unwrap(), None);
    }

    #[test]
    fn test_read_line_empty_lines() {
        let mut r = reader(b"\r\n\r\nx");
        assert_eq!(r.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(r.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(r.peek().unwrap(), Some(b'x'));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("x"));
        assert_eq!(r.peek().unwrap(), None);
    }

    #[test]
    fn test_read_line_crlf_split_across_buffers() {
        let input: &[u8] = b"ab\r\ncd\r\n";
        let buffered = std::io::BufReader::with_capacity(3, input);
        let mut r = LineReader::new(buffered);
        assert_eq!(r.read_line().unwrap().as_deref(), Some("ab"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("cd"));
        assert_eq!(r.read_line().unwrap(), None);
    }

    #[test]
    fn test_read_until_boundary() {
        let mut r = reader(b"Hello\r\nWorld\r\n--X\r\nrest\r\n");
        let (text, term) = read_until(&mut r, Some("X")).unwrap();
        assert_eq!(text, "Hello\r\nWorld\r\n");
        assert_eq!(term.as_deref(), Some("--X"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("rest"));
    }

    #[test]
    fn test_read_until_closing_boundary() {
        let mut r = reader(b"a\r\n--X--\r\n");
        let (text, term) = read_until(&mut r, Some("X")).unwrap();
        assert_eq!(text, "a\r\n");
        assert_eq!(term.as_deref(), Some("--X--"));
    }

    #[test]
    fn test_read_until_eof() {
        let mut r = reader(b"a\r\n--X\r\n");
        let (text, term) = read_until(&mut r, None).unwrap();
        assert_eq!(text, "a\r\n--X\r\n");
        assert_eq!(term, None);
    }

    #[test]
    fn test_read_until_exact_match_only() {
        let mut r = reader(b"--X \r\n--XY\r\n");
        let (text, term) = read_until(&mut r, Some("X")).unwrap();
        assert_eq!(text, "--X \r\n--XY\r\n");
        assert_eq!(term, None);
    }

    #[test]
    fn test_scan_until_lenient() {
        let mut r = reader(b"body\r\n--X-- \t\r\n");
        let (bytes, term) = scan_until(&mut r, &["X"], true).unwrap();
        assert_eq!(bytes, b"body\r\n");
        assert_eq!(term.as_deref(), Some("--X--"));
    }

    #[test]
    fn test_scan_until_any_enclosing_boundary() {
        let mut r = reader(b"a\r\n--inner-x\r\n--outer--\r\ntail\r\n");
        let (bytes, term) = scan_until(&mut r, &["outer", "inner"], false).unwrap();
        assert_eq!(bytes, b"a\r\n--inner-x\r\n");
        assert_eq!(term.as_deref(), Some("--outer--"));
        assert_eq!(r.read_line().unwrap().as_deref(), Some("tail"));
    }

    #[test]
    fn test_read_bytes_until_preserves_high_bytes() {
        let mut r = reader(b"\x00\xff\x80\r\n--B--\r\n");
        let (bytes, term) = read_bytes_until(&mut r, Some("B")).unwrap();
        assert_eq!(bytes, b"\x00\xff\x80\r\n");
        assert_eq!(term.as_deref(), Some("--B--"));
    }
}
