//! Utility functions for position arithmetic

use crate::types::Position;

/// Advance `start` across the first `byte_count` bytes of `text`.
///
/// Newlines bump the line and reset the column to 1; every other character
/// moves the column by one. Counts past the end of `text` stop at the end,
/// and a count that lands inside a multi-byte character stops before it.
///
/// # Example
///
/// ```
/// use stencil_source_map::{Position, advance_position};
///
/// let pos = advance_position(Position::default(), "ab\ncd", 4);
/// assert_eq!(pos, Position::new(4, 2, 2));
/// ```
pub fn advance_position(start: Position, text: &str, byte_count: usize) -> Position {
    let mut pos = start;
    for (idx, ch) in text.char_indices() {
        if idx + ch.len_utf8() > byte_count {
            break;
        }
        pos.offset += ch.len_utf8();
        if ch == '\n' {
            pos.line += 1;
            pos.column = 1;
        } else {
            pos.column += 1;
        }
    }
    pos
}

/// Convert a byte offset in `content` into an absolute position.
///
/// Returns None if the offset is out of bounds.
///
/// # Example
///
/// ```
/// use stencil_source_map::offset_to_position;
///
/// let pos = offset_to_position("hello\nworld", 6).unwrap();
/// assert_eq!(pos.line, 2);
/// assert_eq!(pos.column, 1);
/// ```
pub fn offset_to_position(content: &str, offset: usize) -> Option<Position> {
    if offset > content.len() {
        return None;
    }
    Some(advance_position(Position::default(), content, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_empty() {
        let start = Position::new(4, 2, 3);
        assert_eq!(advance_position(start, "", 0), start);
    }

    #[test]
    fn test_advance_within_line() {
        let pos = advance_position(Position::new(3, 1, 4), "foo bar", 4);
        assert_eq!(pos, Position::new(7, 1, 8));
    }

    #[test]
    fn test_advance_over_newlines() {
        let pos = advance_position(Position::default(), "a\n\nb", 4);
        assert_eq!(pos, Position::new(4, 3, 2));
    }

    #[test]
    fn test_advance_stops_at_end() {
        let pos = advance_position(Position::default(), "abc", 10);
        assert_eq!(pos, Position::new(3, 1, 4));
    }

    #[test]
    fn test_advance_multibyte() {
        let pos = advance_position(Position::default(), "日本", 3);
        assert_eq!(pos, Position::new(3, 1, 2));

        // Splitting a character stops before it
        let pos = advance_position(Position::default(), "日本", 4);
        assert_eq!(pos, Position::new(3, 1, 2));
    }

    #[test]
    fn test_offset_to_position() {
        let content = "line 1\nline 2";
        assert_eq!(offset_to_position(content, 0), Some(Position::new(0, 1, 1)));
        assert_eq!(offset_to_position(content, 7), Some(Position::new(7, 2, 1)));
        assert_eq!(offset_to_position(content, 13), Some(Position::new(13, 2, 7)));
        assert_eq!(offset_to_position(content, 14), None);
    }
}
