//! Cursor & Selection Manager
//!
//! One primary selection plus zero or more secondary selections (multi-cursor), all
//! addressed as buffer positions.
//!
//! # Invariants
//!
//! - Every position in every selection satisfies the document bounds.
//! - After any mutation, no two selections overlap: intersecting ranges are coalesced
//!   into one spanning both and exact duplicates are dropped.
//! - The primary survives merging: it follows whichever merged selection contains its
//!   active position.
//!
//! Caret motion is grapheme-aware for Left/Right and word-boundary-aware for
//! WordLeft/WordRight; Up/Down clamp the column to the target line length.

use crate::buffer::{EditError, Position, TextBuffer};
use unicode_segmentation::UnicodeSegmentation;

/// Selection direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDirection {
    /// Active position is at or after the anchor.
    Forward,
    /// Active position precedes the anchor.
    Backward,
}

/// An (anchor, active) position pair. `anchor == active` denotes a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// The fixed end of the selection.
    pub anchor: Position,
    /// The moving end of the selection (where the caret renders).
    pub active: Position,
}

impl Selection {
    /// A zero-width selection at `pos`.
    pub fn caret(pos: Position) -> Self {
        Self {
            anchor: pos,
            active: pos,
        }
    }

    /// A selection from `anchor` to `active`, preserving direction.
    pub fn new(anchor: Position, active: Position) -> Self {
        Self { anchor, active }
    }

    /// Returns `true` if this selection is a caret.
    pub fn is_caret(&self) -> bool {
        self.anchor == self.active
    }

    /// The direction implied by anchor and active.
    pub fn direction(&self) -> SelectionDirection {
        if self.anchor <= self.active {
            SelectionDirection::Forward
        } else {
            SelectionDirection::Backward
        }
    }

    /// The lesser of anchor and active.
    pub fn min(&self) -> Position {
        self.anchor.min(self.active)
    }

    /// The greater of anchor and active.
    pub fn max(&self) -> Position {
        self.anchor.max(self.active)
    }

    /// Returns `true` if `pos` lies within the normalized range, ends included.
    pub fn contains_inclusive(&self, pos: Position) -> bool {
        self.min() <= pos && pos <= self.max()
    }
}

/// Caret movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMotion {
    /// One grapheme left, wrapping to the previous line end.
    Left,
    /// One grapheme right, wrapping to the next line start.
    Right,
    /// One line up, clamping the column.
    Up,
    /// One line down, clamping the column.
    Down,
    /// Column 0 of the current line.
    LineStart,
    /// Past the last character of the current line.
    LineEnd,
    /// Start of the previous word.
    WordLeft,
    /// End of the next word.
    WordRight,
}

/// The document's cursor set: an ordered, merged list of selections with one primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSet {
    selections: Vec<Selection>,
    primary_index: usize,
}

impl CursorSet {
    /// A single caret at the document start.
    pub fn new() -> Self {
        Self {
            selections: vec![Selection::caret(Position::new(0, 0))],
            primary_index: 0,
        }
    }

    /// Build a cursor set from explicit selections.
    ///
    /// Selections are clamped to the buffer, sorted and merged; the primary index must
    /// point into `selections`.
    pub fn from_selections(
        selections: Vec<Selection>,
        primary_index: usize,
        buffer: &TextBuffer,
    ) -> Result<Self, EditError> {
        if selections.is_empty() || primary_index >= selections.len() {
            return Err(EditError::InvalidPrimaryIndex(primary_index));
        }

        let mut set = Self {
            selections,
            primary_index,
        };
        set.clamp_to(buffer);
        set.merge();
        Ok(set)
    }

    /// All selections in document order, primary included.
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Index of the primary selection within [`selections`](Self::selections).
    pub fn primary_index(&self) -> usize {
        self.primary_index
    }

    /// The primary selection.
    pub fn primary(&self) -> Selection {
        self.selections[self.primary_index]
    }

    /// Secondary selections (all but the primary), in document order.
    pub fn secondary(&self) -> impl Iterator<Item = &Selection> {
        self.selections
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != self.primary_index)
            .map(|(_, sel)| sel)
    }

    /// Number of cursors.
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Always `false`: a cursor set holds at least one caret.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Collapse to a single caret at `pos`.
    pub fn collapse_to(&mut self, pos: Position) {
        self.selections = vec![Selection::caret(pos)];
        self.primary_index = 0;
    }

    /// Replace the whole set (already-valid positions assumed); sorts and merges.
    pub fn replace(&mut self, selections: Vec<Selection>, primary_index: usize) {
        debug_assert!(!selections.is_empty());
        debug_assert!(primary_index < selections.len());
        self.selections = selections;
        self.primary_index = primary_index.min(self.selections.len() - 1);
        self.merge();
    }

    /// Clamp every position to the document bounds.
    pub fn clamp_to(&mut self, buffer: &TextBuffer) {
        let clamp = |pos: Position| buffer.position_of(buffer.offset_of_clamped(pos));
        for sel in &mut self.selections {
            sel.anchor = clamp(sel.anchor);
            sel.active = clamp(sel.active);
        }
    }

    /// Sort selections and merge overlaps/duplicates, keeping the primary with the
    /// merged selection that contains its active position.
    pub fn merge(&mut self) {
        let primary_active = self.primary().active;

        let mut selections = std::mem::take(&mut self.selections);
        selections.sort_by(|a, b| {
            a.min()
                .cmp(&b.min())
                .then_with(|| a.max().cmp(&b.max()))
                .then_with(|| a.active.cmp(&b.active))
        });

        let mut merged: Vec<Selection> = Vec::with_capacity(selections.len());
        for sel in selections {
            let Some(last) = merged.last_mut() else {
                merged.push(sel);
                continue;
            };

            if sel.min() == last.min() && sel.max() == last.max() {
                // Exact duplicate - drop.
                continue;
            }

            let caret_on_edge = sel.min() == last.max() && (sel.is_caret() || last.is_caret());
            if sel.min() < last.max() || caret_on_edge {
                // Overlap (or a caret sitting on a range edge): coalesce to the union.
                let new_min = last.min().min(sel.min());
                let new_max = last.max().max(sel.max());
                *last = Selection::new(new_min, new_max);
            } else {
                merged.push(sel);
            }
        }

        self.primary_index = merged
            .iter()
            .position(|s| s.contains_inclusive(primary_active))
            .unwrap_or(merged.len().saturating_sub(1));
        self.selections = merged;
    }

    /// Move every caret, optionally extending the selections.
    pub fn move_each(&mut self, buffer: &TextBuffer, motion: CaretMotion, extend: bool) {
        for sel in &mut self.selections {
            let target = match motion {
                CaretMotion::Left if !extend && !sel.is_caret() => sel.min(),
                CaretMotion::Right if !extend && !sel.is_caret() => sel.max(),
                _ => move_position(buffer, sel.active, motion),
            };

            sel.active = target;
            if !extend {
                sel.anchor = target;
            }
        }
        self.merge();
    }

    /// Add a caret one line above (`-1`) or below (`+1`) the primary, copying its
    /// column and clipping to the line length.
    ///
    /// A target outside the document, or a line that already hosts a cursor, is a
    /// no-op rather than an error.
    pub fn add_cursor(&mut self, buffer: &TextBuffer, relative_line: isize) {
        let primary = self.primary();
        let line = primary.active.line as isize + relative_line;
        if line < 0 || line as usize >= buffer.line_count() {
            return;
        }
        let line = line as usize;

        if self.selections.iter().any(|sel| sel.active.line == line) {
            return;
        }

        let column = primary
            .active
            .column
            .min(buffer.line_len(line).unwrap_or(0));

        self.selections.push(Selection::caret(Position::new(line, column)));
        // Primary stays where it is; merging re-sorts and re-locates it.
        self.merge();
    }
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the position one `motion` step away from `pos`.
pub fn move_position(buffer: &TextBuffer, pos: Position, motion: CaretMotion) -> Position {
    let line_text = buffer.line(pos.line).unwrap_or_default();
    let line_len = line_text.chars().count();
    let column = pos.column.min(line_len);

    match motion {
        CaretMotion::Left => {
            if column > 0 {
                Position::new(pos.line, column - grapheme_len_before(&line_text, column))
            } else if pos.line > 0 {
                Position::new(pos.line - 1, buffer.line_len(pos.line - 1).unwrap_or(0))
            } else {
                Position::new(0, 0)
            }
        }
        CaretMotion::Right => {
            if column < line_len {
                Position::new(pos.line, column + grapheme_len_at(&line_text, column))
            } else if pos.line + 1 < buffer.line_count() {
                Position::new(pos.line + 1, 0)
            } else {
                Position::new(pos.line, line_len)
            }
        }
        CaretMotion::Up => {
            if pos.line == 0 {
                Position::new(0, 0)
            } else {
                let target = pos.line - 1;
                Position::new(target, pos.column.min(buffer.line_len(target).unwrap_or(0)))
            }
        }
        CaretMotion::Down => {
            if pos.line + 1 >= buffer.line_count() {
                Position::new(pos.line, line_len)
            } else {
                let target = pos.line + 1;
                Position::new(target, pos.column.min(buffer.line_len(target).unwrap_or(0)))
            }
        }
        CaretMotion::LineStart => Position::new(pos.line, 0),
        CaretMotion::LineEnd => Position::new(pos.line, line_len),
        CaretMotion::WordLeft => word_left(buffer, pos, &line_text, column),
        CaretMotion::WordRight => word_right(buffer, pos, &line_text, column),
    }
}

/// Char length of the grapheme ending at char index `column`.
fn grapheme_len_before(line: &str, column: usize) -> usize {
    let byte_end = byte_index(line, column);
    line[..byte_end]
        .graphemes(true)
        .last()
        .map(|g| g.chars().count())
        .unwrap_or(1)
}

/// Char length of the grapheme starting at char index `column`.
fn grapheme_len_at(line: &str, column: usize) -> usize {
    let byte_start = byte_index(line, column);
    line[byte_start..]
        .graphemes(true)
        .next()
        .map(|g| g.chars().count())
        .unwrap_or(1)
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

fn word_left(buffer: &TextBuffer, pos: Position, line_text: &str, column: usize) -> Position {
    if column == 0 {
        if pos.line == 0 {
            return Position::new(0, 0);
        }
        return Position::new(pos.line - 1, buffer.line_len(pos.line - 1).unwrap_or(0));
    }

    let byte_end = byte_index(line_text, column);
    let prefix = &line_text[..byte_end];
    let start_byte = prefix
        .unicode_word_indices()
        .last()
        .map(|(byte, _)| byte)
        .unwrap_or(0);
    Position::new(pos.line, prefix[..start_byte].chars().count())
}

fn word_right(buffer: &TextBuffer, pos: Position, line_text: &str, column: usize) -> Position {
    let line_len = line_text.chars().count();
    if column >= line_len {
        if pos.line + 1 < buffer.line_count() {
            return Position::new(pos.line + 1, 0);
        }
        return Position::new(pos.line, line_len);
    }

    let byte_start = byte_index(line_text, column);
    let rest = &line_text[byte_start..];
    match rest.unicode_word_indices().next() {
        Some((word_byte, word)) => {
            let end_byte = word_byte + word.len();
            Position::new(pos.line, column + rest[..end_byte].chars().count())
        }
        None => Position::new(pos.line, line_len),
    }
}
