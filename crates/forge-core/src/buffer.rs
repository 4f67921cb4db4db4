//! Text Buffer
//!
//! Rope-backed document content with line/offset indexing.
//!
//! # Overview
//!
//! [`TextBuffer`] owns the text of one document and is the only type that mutates it.
//! It provides O(log n) line access and O(log n + affected region) insertion/deletion,
//! so editing a large file never forces a whole-document reflow.
//!
//! All public coordinates are **character** based: [`Position`] is `(line, column)` in
//! characters, absolute offsets count Unicode scalar values. Byte offsets never cross the
//! API boundary.
//!
//! Every successful mutation reports the [`DirtyRange`] it produced; the document layer
//! forwards dirty ranges to the highlight engine and the minimap projector.

use ropey::Rope;
use std::cmp::Ordering;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A position range within a document. `start` must not exceed `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    /// Inclusive start position.
    pub start: Position,
    /// Exclusive end position.
    pub end: Position,
}

impl TextRange {
    /// Create a range from two positions, without reordering them.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns `true` if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A contiguous line interval whose content changed.
///
/// `start_line` is the first affected line; `old_line_count` lines were replaced by
/// `new_line_count` lines. Consumers (highlighting, minimap) re-derive state for
/// `[start_line, start_line + new_line_count)` and shift everything below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRange {
    /// First affected logical line.
    pub start_line: usize,
    /// Number of lines the interval spanned before the edit.
    pub old_line_count: usize,
    /// Number of lines the interval spans after the edit.
    pub new_line_count: usize,
}

impl DirtyRange {
    /// Create a dirty range record.
    pub fn new(start_line: usize, old_line_count: usize, new_line_count: usize) -> Self {
        Self {
            start_line,
            old_line_count,
            new_line_count,
        }
    }

    /// Merge another dirty range into this one, producing the covering interval.
    ///
    /// Both ranges must be expressed against the same pre-edit document; the merged
    /// `new_line_count` accounts for the combined line delta.
    pub fn union(self, other: DirtyRange) -> DirtyRange {
        let start = self.start_line.min(other.start_line);
        let old_end = (self.start_line + self.old_line_count)
            .max(other.start_line + other.old_line_count);
        let delta = (self.new_line_count as isize - self.old_line_count as isize)
            + (other.new_line_count as isize - other.old_line_count as isize);
        let old_count = old_end - start;
        let new_count = (old_count as isize + delta).max(0) as usize;
        DirtyRange::new(start, old_count, new_count)
    }
}

/// Buffer/position errors.
///
/// Out-of-range positions are caller bugs: explicit buffer calls fail fast with these
/// errors, while cursor-arithmetic paths clamp defensively before reaching the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A position lies outside the document bounds.
    OutOfRange {
        /// Offending line.
        line: usize,
        /// Offending column.
        column: usize,
    },
    /// A range's end precedes its start.
    InvalidRange {
        /// Range start.
        start: Position,
        /// Range end.
        end: Position,
    },
    /// The primary selection index does not point into the selection list.
    InvalidPrimaryIndex(usize),
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::OutOfRange { line, column } => {
                write!(f, "Position out of range: line {}, column {}", line, column)
            }
            EditError::InvalidRange { start, end } => {
                write!(
                    f,
                    "Range end precedes start: ({}, {})..({}, {})",
                    start.line, start.column, end.line, end.column
                )
            }
            EditError::InvalidPrimaryIndex(index) => {
                write!(f, "Invalid primary selection index: {}", index)
            }
        }
    }
}

impl std::error::Error for EditError {}

/// Rope-backed text buffer.
///
/// Line semantics follow the rope: N newlines produce N+1 lines, so an empty buffer has
/// one empty line and a trailing `'\n'` produces a trailing empty line.
///
/// # Example
///
/// ```rust
/// use forge_core::{Position, TextBuffer};
///
/// let mut buffer = TextBuffer::from_text("fn main() {}\n");
/// assert_eq!(buffer.line_count(), 2);
///
/// let (end, _) = buffer.insert(Position::new(0, 3), "ab").unwrap();
/// assert_eq!(end, Position::new(0, 5));
/// assert_eq!(buffer.line(0).unwrap(), "fn abmain() {}");
/// ```
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    /// Create an empty buffer (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a buffer from LF-normalized text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Total line count.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Complete text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text of the given line, without its trailing newline.
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        Some(text)
    }

    /// Character length of the given line, excluding its trailing newline.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let start = self.rope.line_to_char(line);
        let end = if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1) - 1
        } else {
            self.rope.len_chars()
        };
        Some(end - start)
    }

    /// Returns `true` if `pos` satisfies the position invariant
    /// (`line < line_count`, `column <= line length`).
    pub fn contains(&self, pos: Position) -> bool {
        self.line_len(pos.line)
            .is_some_and(|len| pos.column <= len)
    }

    /// Character offset of a position. Fails with [`EditError::OutOfRange`] for
    /// positions outside the document.
    pub fn offset_of(&self, pos: Position) -> Result<usize, EditError> {
        let len = self.line_len(pos.line).ok_or(EditError::OutOfRange {
            line: pos.line,
            column: pos.column,
        })?;
        if pos.column > len {
            return Err(EditError::OutOfRange {
                line: pos.line,
                column: pos.column,
            });
        }
        Ok(self.rope.line_to_char(pos.line) + pos.column)
    }

    /// Character offset of a position, clamping out-of-range coordinates to the
    /// nearest valid position. Used by cursor-arithmetic paths that must never fail.
    pub fn offset_of_clamped(&self, pos: Position) -> usize {
        let line = pos.line.min(self.rope.len_lines().saturating_sub(1));
        let len = self.line_len(line).unwrap_or(0);
        self.rope.line_to_char(line) + pos.column.min(len)
    }

    /// Position of an absolute character offset (clamped to the document end).
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let column = offset - self.rope.line_to_char(line);
        Position::new(line, column)
    }

    /// Text of a character offset range (clamped).
    pub fn slice(&self, start: usize, end: usize) -> String {
        let start = start.min(self.rope.len_chars());
        let end = end.min(self.rope.len_chars()).max(start);
        self.rope.slice(start..end).to_string()
    }

    /// Character at an absolute offset, if in bounds.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.rope.len_chars() {
            Some(self.rope.char(offset))
        } else {
            None
        }
    }

    /// Insert `text` at `pos`.
    ///
    /// Returns the position just past the inserted text and the dirty range produced.
    pub fn insert(&mut self, pos: Position, text: &str) -> Result<(Position, DirtyRange), EditError> {
        let offset = self.offset_of(pos)?;
        self.rope.insert(offset, text);

        let inserted_lines = text.matches('\n').count();
        let dirty = DirtyRange::new(pos.line, 1, 1 + inserted_lines);
        let end = self.position_of(offset + text.chars().count());
        Ok((end, dirty))
    }

    /// Delete `range`, returning the removed text and the dirty range produced.
    ///
    /// `range.end` must not precede `range.start`.
    pub fn delete(&mut self, range: TextRange) -> Result<(String, DirtyRange), EditError> {
        if range.end < range.start {
            return Err(EditError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }

        let start = self.offset_of(range.start)?;
        let end = self.offset_of(range.end)?;

        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);

        let removed_lines = removed.matches('\n').count();
        let dirty = DirtyRange::new(range.start.line, 1 + removed_lines, 1);
        Ok((removed, dirty))
    }

    /// Replace `delete_len` characters at absolute offset `start` with `text`.
    ///
    /// This is the offset-based primitive the command layer uses when applying planned
    /// multi-cursor edits; offsets are clamped, never failing. Returns the dirty range.
    pub fn splice(&mut self, start: usize, delete_len: usize, text: &str) -> DirtyRange {
        let start = start.min(self.rope.len_chars());
        let end = (start + delete_len).min(self.rope.len_chars());
        let start_line = self.rope.char_to_line(start);

        let removed_lines = if end > start {
            let removed = self.rope.slice(start..end);
            let count = removed.chars().filter(|&ch| ch == '\n').count();
            self.rope.remove(start..end);
            count
        } else {
            0
        };

        if !text.is_empty() {
            self.rope.insert(start, text);
        }

        DirtyRange::new(
            start_line,
            1 + removed_lines,
            1 + text.matches('\n').count(),
        )
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.char_count(), 0);
        assert_eq!(buffer.line(0).unwrap(), "");
    }

    #[test]
    fn test_trailing_newline_makes_trailing_empty_line() {
        let buffer = TextBuffer::from_text("a\nb\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line(2).unwrap(), "");
    }

    #[test]
    fn test_offset_position_round_trip() {
        let buffer = TextBuffer::from_text("ABC\nDEF\nGHI");
        assert_eq!(buffer.offset_of(Position::new(0, 0)).unwrap(), 0);
        assert_eq!(buffer.offset_of(Position::new(1, 0)).unwrap(), 4);
        assert_eq!(buffer.offset_of(Position::new(2, 3)).unwrap(), 11);
        assert_eq!(buffer.position_of(4), Position::new(1, 0));
        assert_eq!(buffer.position_of(999), Position::new(2, 3));
    }

    #[test]
    fn test_offset_of_rejects_out_of_range() {
        let buffer = TextBuffer::from_text("abc");
        assert!(matches!(
            buffer.offset_of(Position::new(0, 4)),
            Err(EditError::OutOfRange { .. })
        ));
        assert!(matches!(
            buffer.offset_of(Position::new(1, 0)),
            Err(EditError::OutOfRange { .. })
        ));
        // Column == line length is the caret past the last character: valid.
        assert_eq!(buffer.offset_of(Position::new(0, 3)).unwrap(), 3);
    }

    #[test]
    fn test_insert_returns_end_position_and_dirty_range() {
        let mut buffer = TextBuffer::from_text("hello world");
        let (end, dirty) = buffer.insert(Position::new(0, 5), ",\nnew").unwrap();
        assert_eq!(buffer.text(), "hello,\nnew world");
        assert_eq!(end, Position::new(1, 3));
        assert_eq!(dirty, DirtyRange::new(0, 1, 2));
    }

    #[test]
    fn test_delete_returns_removed_text_and_dirty_range() {
        let mut buffer = TextBuffer::from_text("one\ntwo\nthree");
        let range = TextRange::new(Position::new(0, 2), Position::new(2, 1));
        let (removed, dirty) = buffer.delete(range).unwrap();
        assert_eq!(removed, "e\ntwo\nt");
        assert_eq!(buffer.text(), "onhree");
        assert_eq!(dirty, DirtyRange::new(0, 3, 1));
    }

    #[test]
    fn test_delete_rejects_inverted_range() {
        let mut buffer = TextBuffer::from_text("abc");
        let range = TextRange::new(Position::new(0, 2), Position::new(0, 1));
        assert!(matches!(
            buffer.delete(range),
            Err(EditError::InvalidRange { .. })
        ));
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_splice_replaces_at_offset() {
        let mut buffer = TextBuffer::from_text("abc\ndef");
        let dirty = buffer.splice(2, 3, "X");
        assert_eq!(buffer.text(), "abXef");
        assert_eq!(dirty, DirtyRange::new(0, 2, 1));
    }

    #[test]
    fn test_dirty_range_union() {
        let a = DirtyRange::new(2, 1, 2);
        let b = DirtyRange::new(5, 2, 1);
        assert_eq!(a.union(b), DirtyRange::new(2, 5, 5));
    }

    #[test]
    fn test_unicode_positions() {
        let buffer = TextBuffer::from_text("你好\n世界");
        assert_eq!(buffer.char_count(), 5);
        assert_eq!(buffer.offset_of(Position::new(1, 1)).unwrap(), 4);
        assert_eq!(buffer.position_of(3), Position::new(1, 0));
    }
}
