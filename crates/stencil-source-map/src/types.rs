//! Core types for source mapping

use serde::{Deserialize, Serialize};

use crate::utils::advance_position;

/// A unique identifier for a registered source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub usize);

/// An absolute position in template text.
///
/// `offset` is a byte offset from the start of the template. `line` and
/// `column` are 1-based; columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from start of source
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters not bytes)
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Position {
            offset,
            line,
            column,
        }
    }
}

impl Default for Position {
    /// The very first position of a document.
    fn default() -> Self {
        Position::new(0, 1, 1)
    }
}

/// A span of template text from `start` (inclusive) to `end` (exclusive),
/// together with the text it covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
    pub source: String,
}

impl SourceLocation {
    pub fn new(start: Position, end: Position, source: impl Into<String>) -> Self {
        SourceLocation {
            start,
            end,
            source: source.into(),
        }
    }

    /// Build the location of `source` when it begins at `start`.
    ///
    /// The end position is computed by walking the text, so multi-line
    /// sources get the right end line and column.
    pub fn from_source(source: impl Into<String>, start: Position) -> Self {
        let source = source.into();
        let end = advance_position(start, &source, source.len());
        SourceLocation { start, end, source }
    }

    /// Location of the byte range `start..end` of this location's text.
    ///
    /// Offsets are relative to `self.source` and are clamped to its length.
    /// The returned positions are absolute, so the result can be compared
    /// directly against any other location in the same document.
    pub fn slice(&self, start: usize, end: usize) -> SourceLocation {
        let end = end.min(self.source.len());
        let start = start.min(end);
        let text = self.source.get(start..end).unwrap_or_default();
        SourceLocation {
            start: advance_position(self.start, &self.source, start),
            end: advance_position(self.start, &self.source, end),
            source: text.to_string(),
        }
    }

    /// Length of the covered text in bytes
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely inside this location
    pub fn contains(&self, other: &SourceLocation) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }
}
