//! Single MIME header handling.

use std::fmt;

/// A MIME header: name, value and ordered parameters.
///
/// Header names and parameter names compare case-insensitively.
///
/// ```text
/// Content-Type: multipart/mixed; boundary="abc"; charset=us-ascii
/// ^name         ^value           ^params
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    name: String,
    value: String,
    params: Vec<(String, String)>,
}

impl Header {
    /// Creates a header without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            params: Vec::new(),
        }
    }

    /// Parses a logical header line (continuations already joined).
    ///
    /// A line without `:` becomes a nameless header whose value is the whole
    /// line. Separators inside double quotes are not split on.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let Some((name, rest)) = raw.split_once(':') else {
            return Self::new("", raw);
        };

        let (value, tail) = split_top_level(rest, ';');
        let mut header = Self::new(name.trim(), value.trim());

        let Some(mut tail) = tail else {
            return header;
        };

        loop {
            let (token, next) = split_top_level(tail, ';');
            let token = token.trim();
            if !token.is_empty() {
                let (param, param_value) = split_top_level(token, '=');
                let param_value = param_value.map_or("", |v| unquote(v.trim()));
                header.set_param(param.trim(), param_value);
            }
            match next {
                Some(next) => tail = next,
                None => break,
            }
        }

        header
    }

    /// Returns the header name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the header has the given name, ignoring case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Returns the header value without parameters.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the header value, keeping parameters.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Gets a parameter value by case-insensitive name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Sets a parameter, updating an existing one in place.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .params
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some((_, existing)) => *existing = value,
            None => self.params.push((name, value)),
        }
    }

    /// Removes a parameter, returning its value.
    pub fn remove_param(&mut self, name: &str) -> Option<String> {
        let pos = self
            .params
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.params.remove(pos).1)
    }

    /// Returns an iterator over parameters in insertion order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Renders `Name: value` with each parameter folded onto its own line.
///
/// A nameless header prints its bare value when that reparses to the same
/// header (no `:` and no parameters); otherwise it prints `: value` so the
/// empty name survives. Values holding an unquoted `;` never reparse
/// unchanged, since the `;` starts a parameter list.
impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() && self.params.is_empty() && !self.value.contains(':') {
            f.write_str(&self.value)?;
        } else if self.name.is_empty() {
            write!(f, ": {}", self.value)?;
        } else {
            write!(f, "{}: {}", self.name, self.value)?;
        }
        for (name, value) in &self.params {
            write!(f, ";\r\n\t{name}=\"{value}\"")?;
        }
        Ok(())
    }
}

/// Splits `s` at the first `sep` outside a double-quoted span.
fn split_top_level(s: &str, sep: char) -> (&str, Option<&str>) {
    let mut quoted = false;
    for (i, c) in s.char_indices() {
        if c == '"' {
            quoted = !quoted;
        } else if c == sep && !quoted {
            return (&s[..i], Some(&s[i + c.len_utf8()..]));
        }
    }
    (s, None)
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
}
