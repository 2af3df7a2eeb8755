//! Parser configuration.

/// Default maximum multipart nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options controlling how a MIME entity is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum part depth. The root is depth 0 and every child, leaf or
    /// container, sits one level below its parent, so `0` admits only a
    /// root without children.
    pub max_depth: usize,
    /// Accept delimiter lines followed by trailing spaces or tabs.
    ///
    /// Off by default: `--boundary` must match the line exactly.
    pub lenient_boundaries: bool,
    /// End a body at the delimiter of any enclosing container, not only the
    /// immediate parent.
    ///
    /// Off by default: lines naming an outer boundary are ordinary content.
    pub ancestor_boundaries: bool,
}

impl ParseOptions {
    /// Creates options with exact boundary matching and the default depth limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            lenient_boundaries: false,
            ancestor_boundaries: false,
        }
    }

    /// Creates an options builder.
    #[must_use]
    pub const fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ParseOptions`].
#[derive(Debug, Clone, Copy)]
pub struct ParseOptionsBuilder {
    max_depth: usize,
    lenient_boundaries: bool,
    ancestor_boundaries: bool,
}

impl ParseOptionsBuilder {
    /// Creates a builder populated with the defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            lenient_boundaries: false,
            ancestor_boundaries: false,
        }
    }

    /// Sets the maximum part depth.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Enables or disables trailing-whitespace tolerance on delimiter lines.
    #[must_use]
    pub const fn lenient_boundaries(mut self, lenient: bool) -> Self {
        self.lenient_boundaries = lenient;
        self
    }

    /// Enables or disables stopping at outer containers' delimiters.
    #[must_use]
    pub const fn ancestor_boundaries(mut self, enabled: bool) -> Self {
        self.ancestor_boundaries = enabled;
        self
    }

    /// Builds the options.
    #[must_use]
    pub const fn build(self) -> ParseOptions {
        ParseOptions {
            max_depth: self.max_depth,
            lenient_boundaries: self.lenient_boundaries,
            ancestor_boundaries: self.ancestor_boundaries,
        }
    }
}

impl Default for ParseOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
