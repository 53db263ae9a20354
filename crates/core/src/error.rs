use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

    /// Resolve a byte offset inside `text` to a line/column pair.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text.as_bytes()[..offset];
        let line = before.iter().filter(|b| **b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |pos| pos + 1);
        Self::new(line, offset - line_start + 1)
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors emitted while parsing front matter.
#[derive(Debug, Error)]
pub enum MatterError {
    /// The engine rejected the header block.
    #[error("{language} front matter parse error{}: {message}", at(.location))]
    Parse {
        /// Engine that failed (`yaml`, `json`, `toml`).
        language: String,
        /// Engine error message.
        message: String,
        /// Position inside the document, when the engine reports one.
        location: Option<SourceLocation>,
    },
    /// The header names an engine that is not registered.
    #[error("front matter engine \"{0}\" is not registered")]
    UnknownEngine(String),
    /// Top-level node was not a mapping.
    #[error("Front matter must be a mapping at the top level")]
    InvalidRootType,
}

impl MatterError {
    /// Create a parse error for `language` with an optional location.
    pub fn parse(
        language: impl Into<String>,
        message: impl Into<String>,
        location: Option<SourceLocation>,
    ) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            location,
        }
    }

    /// Location of the failure, if known.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            MatterError::Parse { location, .. } => *location,
            _ => None,
        }
    }
}

fn at(location: &Option<SourceLocation>) -> String {
    location
        .map(|loc| format!(" at {loc}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_maps_to_line_and_column() {
        let text = "a: 1\nbb: [\n";
        assert_eq!(SourceLocation::from_offset(text, 0), SourceLocation::new(1, 1));
        assert_eq!(SourceLocation::from_offset(text, 8), SourceLocation::new(2, 4));
        assert_eq!(
            SourceLocation::from_offset(text, 999),
            SourceLocation::new(3, 1)
        );
    }

    #[test]
    fn parse_error_display_includes_location() {
        let err = MatterError::parse("yaml", "bad indent", Some(SourceLocation::new(3, 2)));
        assert_eq!(err.to_string(), "yaml front matter parse error at 3:2: bad indent");

        let err = MatterError::parse("toml", "expected `=`", None);
        assert_eq!(err.to_string(), "toml front matter parse error: expected `=`");
    }
}
