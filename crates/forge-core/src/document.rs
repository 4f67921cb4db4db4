//! Document state.
//!
//! One [`Document`] per open file/tab: the buffer, the language tag used for
//! highlighting-rule selection, the cursor set, a monotonically increasing revision
//! counter, and the preferred line ending for saving. A document is created when a tab
//! opens and dropped when it closes; cursors and history die with it.
//!
//! The document is the buffer owner: all content mutation goes through
//! [`Document::insert`] / [`Document::delete`] / [`Document::splice`], each of which
//! bumps the revision and reports the [`DirtyRange`] that highlighting and the minimap
//! consume. Command-level editing (undo recording, multi-cursor planning) lives in
//! [`Editor`](crate::Editor); mutating a document behind the editor's back is detected
//! by the history's revision sync and invalidates pending undo units rather than
//! corrupting anything.

use crate::buffer::{DirtyRange, EditError, Position, TextBuffer, TextRange};
use crate::cursor::{CaretMotion, CursorSet};
use crate::line_ending::LineEnding;
use forge_lang::Language;

/// An open document: content, language, cursors, revision.
pub struct Document {
    buffer: TextBuffer,
    language: Language,
    cursors: CursorSet,
    revision: u64,
    line_ending: LineEnding,
}

impl Document {
    /// Create a document from loaded text (any line endings) and a language tag.
    pub fn new(text: &str, language: Language) -> Self {
        let (normalized, line_ending) = LineEnding::normalize(text);
        Self {
            buffer: TextBuffer::from_text(&normalized),
            language,
            cursors: CursorSet::new(),
            revision: 0,
            line_ending,
        }
    }

    /// Create an empty document.
    pub fn empty(language: Language) -> Self {
        Self::new("", language)
    }

    /// The document's buffer (read-only; mutation goes through the document).
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The language tag used to pick highlighting rules and smart-edit config.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch the language tag (e.g. after save-as with a new extension).
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Monotonically increasing revision counter, bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The cursor set.
    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    pub(crate) fn cursors_mut(&mut self) -> &mut CursorSet {
        &mut self.cursors
    }

    /// Preferred line ending for saving.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Override the preferred line ending for saving.
    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    /// Document text converted to the preferred line ending, for the save boundary.
    pub fn text_for_saving(&self) -> String {
        self.line_ending.apply(&self.buffer.text())
    }

    /// Total line count.
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Total character count.
    pub fn char_count(&self) -> usize {
        self.buffer.char_count()
    }

    /// Current text (LF-normalized).
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Text of one line, without its newline.
    pub fn line(&self, line: usize) -> Option<String> {
        self.buffer.line(line)
    }

    /// Insert `text` at `pos`, bumping the revision.
    ///
    /// Returns the position past the inserted text and the dirty range.
    pub fn insert(
        &mut self,
        pos: Position,
        text: &str,
    ) -> Result<(Position, DirtyRange), EditError> {
        let result = self.buffer.insert(pos, text)?;
        self.revision += 1;
        self.cursors.clamp_to(&self.buffer);
        Ok(result)
    }

    /// Delete `range`, bumping the revision. Returns the removed text and dirty range.
    pub fn delete(&mut self, range: TextRange) -> Result<(String, DirtyRange), EditError> {
        let result = self.buffer.delete(range)?;
        self.revision += 1;
        self.cursors.clamp_to(&self.buffer);
        Ok(result)
    }

    /// Offset-based replace primitive used by the command layer; clamps, never fails.
    pub fn splice(&mut self, start: usize, delete_len: usize, text: &str) -> DirtyRange {
        let dirty = self.buffer.splice(start, delete_len, text);
        self.revision += 1;
        dirty
    }

    /// Replace the cursor set wholesale (positions are clamped and merged).
    pub fn set_cursors(&mut self, cursors: CursorSet) {
        self.cursors = cursors;
        self.cursors.clamp_to(&self.buffer);
        self.cursors.merge();
    }

    /// Move every caret, optionally extending selections.
    pub fn move_cursors(&mut self, motion: CaretMotion, extend: bool) {
        self.cursors.move_each(&self.buffer, motion, extend);
    }

    /// Add a caret one line above (`-1`) or below (`+1`) the primary.
    pub fn add_cursor(&mut self, relative_line: isize) {
        self.cursors.add_cursor(&self.buffer, relative_line);
    }
}
