use serde::Serialize;

/// Source location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Non-fatal warnings that don't prevent rendering.
///
/// Every transform in this crate is total: malformed input degrades to
/// literal text or defaults, and the degradation is reported here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ParseWarning {
    /// Code fence opened but never closed; the opener is emitted as text.
    UnclosedCodeFence {
        /// Source location where the fence started
        location: SourceLocation,
        /// Length of the opening backtick run
        length: usize,
        /// Surrounding context for the message
        context: String,
    },
    /// Frontmatter opened with `---` but never closed; defaults were used.
    UnterminatedFrontmatter {
        /// Source location of the opening delimiter
        location: SourceLocation,
    },
}

impl ParseWarning {
    /// Get the location of this warning
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseWarning::UnclosedCodeFence { location, .. } => location,
            ParseWarning::UnterminatedFrontmatter { location } => location,
        }
    }

    fn location_mut(&mut self) -> &mut SourceLocation {
        match self {
            ParseWarning::UnclosedCodeFence { location, .. } => location,
            ParseWarning::UnterminatedFrontmatter { location } => location,
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::UnclosedCodeFence {
                location,
                length,
                context,
            } => {
                write!(
                    f,
                    "Unclosed code fence ({} backticks): {}, near '{}'",
                    length, location, context
                )
            }
            ParseWarning::UnterminatedFrontmatter { location } => {
                write!(
                    f,
                    "Unterminated frontmatter block at {}: expected closing '---'",
                    location
                )
            }
        }
    }
}

/// Collection of parse diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<ParseWarning>,
}

impl ParseDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    /// Append every warning from `other`.
    pub fn extend(&mut self, other: ParseDiagnostics) {
        self.warnings.extend(other.warnings);
    }

    /// Shift all line numbers by `lines`.
    ///
    /// Used when a body was rendered separately from the frontmatter that
    /// preceded it in the original document.
    pub fn offset_lines(&mut self, lines: usize) {
        for warning in &mut self.warnings {
            warning.location_mut().line += lines;
        }
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}
