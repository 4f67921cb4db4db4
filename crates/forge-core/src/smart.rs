//! Smart-Edit Engine
//!
//! Stateless translation of raw key input plus the current cursor set and surrounding
//! buffer text into edit plans: auto-indent, bracket/quote auto-close and skip-over,
//! selection wrapping, smart backspace, comment toggling, and line duplication and
//! movement. Plans are applied by [`Editor`](crate::Editor) through the same
//! undo/dirty-range path as plain typing; nothing here mutates a buffer.
//!
//! Each plan pairs one [`PlannedEdit`] list (offsets in the *pre-edit* document) with
//! one [`CaretSpec`] per resulting cursor. The editor applies edits bottom-most-first
//! and resolves carets with an ascending delta pass, so earlier applications never
//! shift pending ones.

use crate::buffer::{Position, TextBuffer};
use crate::cursor::Selection;
use crate::document::Document;
use crate::settings::EditorSettings;
use unicode_segmentation::UnicodeSegmentation;

/// A single planned replacement at a pre-edit character offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannedEdit {
    pub start: usize,
    pub delete_len: usize,
    pub insert_text: String,
}

impl PlannedEdit {
    pub(crate) fn insert_len(&self) -> usize {
        self.insert_text.chars().count()
    }

    pub(crate) fn is_noop(&self) -> bool {
        self.delete_len == 0 && self.insert_text.is_empty()
    }
}

/// Where a cursor lands after the plan is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CaretSpec {
    /// Caret at `rel` characters past the (post-edit) start of edit `op`.
    InsertRel { op: usize, rel: usize },
    /// Selection anchored relative to the (post-edit) start of edit `op`.
    SelectionRel {
        op: usize,
        anchor_rel: usize,
        active_rel: usize,
    },
    /// Keep the selection, remapping its pre-edit offsets through all edits.
    Remap { anchor: usize, active: usize },
}

/// A full multi-cursor edit plan.
#[derive(Debug, Clone)]
pub(crate) struct EditPlan {
    pub edits: Vec<PlannedEdit>,
    /// One entry per resulting cursor, in the same order as the planning selections.
    pub carets: Vec<CaretSpec>,
    pub primary_index: usize,
    /// Whether the resulting undo unit may join an open typing group.
    pub coalescible: bool,
}

fn selection_offsets(buffer: &TextBuffer, sel: &Selection) -> (usize, usize) {
    (
        buffer.offset_of_clamped(sel.min()),
        buffer.offset_of_clamped(sel.max()),
    )
}

/// Plan plain text insertion (typing without smart behavior, or paste) at every cursor.
pub(crate) fn plan_insert_text(doc: &Document, text: &str) -> EditPlan {
    let buffer = doc.buffer();
    let cursors = doc.cursors();

    let mut edits = Vec::with_capacity(cursors.len());
    let mut carets = Vec::with_capacity(cursors.len());
    let insert_len = text.chars().count();

    for (idx, sel) in cursors.selections().iter().enumerate() {
        let (start, end) = selection_offsets(buffer, sel);
        edits.push(PlannedEdit {
            start,
            delete_len: end - start,
            insert_text: text.to_string(),
        });
        carets.push(CaretSpec::InsertRel {
            op: idx,
            rel: insert_len,
        });
    }

    let mut chars = text.chars();
    let coalescible = matches!((chars.next(), chars.next()), (Some(ch), None) if !ch.is_whitespace());

    EditPlan {
        edits,
        carets,
        primary_index: cursors.primary_index(),
        coalescible,
    }
}

/// Plan typing one character with bracket/quote smarts.
pub(crate) fn plan_type_char(doc: &Document, settings: &EditorSettings, ch: char) -> EditPlan {
    if !settings.auto_close_brackets {
        return plan_insert_text(doc, &ch.to_string());
    }

    let buffer = doc.buffer();
    let cursors = doc.cursors();
    let brackets = doc.language().brackets();

    let mut edits = Vec::with_capacity(cursors.len());
    let mut carets = Vec::with_capacity(cursors.len());
    let mut all_plain = true;

    for (idx, sel) in cursors.selections().iter().enumerate() {
        let (start, end) = selection_offsets(buffer, sel);
        let sel_len = end - start;

        let closer = brackets.closer_for(ch);
        let is_quote = brackets.is_quote(ch);

        if sel_len > 0 && (closer.is_some() || is_quote) {
            // Wrap the selection instead of overwriting it.
            let close_ch = closer.unwrap_or(ch);
            let selected = buffer.slice(start, end);
            let mut insert_text = String::with_capacity(selected.len() + 2);
            insert_text.push(ch);
            insert_text.push_str(&selected);
            insert_text.push(close_ch);

            edits.push(PlannedEdit {
                start,
                delete_len: sel_len,
                insert_text,
            });
            carets.push(CaretSpec::InsertRel {
                op: idx,
                rel: 1 + sel_len,
            });
            all_plain = false;
            continue;
        }

        let next = buffer.char_at(end);

        let skip_over = (is_quote && next == Some(ch))
            || (brackets.opener_for(ch).is_some() && next == Some(ch));
        if skip_over && sel_len == 0 {
            edits.push(PlannedEdit {
                start,
                delete_len: 0,
                insert_text: String::new(),
            });
            carets.push(CaretSpec::Remap {
                anchor: start + 1,
                active: start + 1,
            });
            all_plain = false;
            continue;
        }

        if let Some(close_ch) = closer {
            // Opener: insert the pair, caret between.
            let mut insert_text = String::new();
            insert_text.push(ch);
            insert_text.push(close_ch);
            edits.push(PlannedEdit {
                start,
                delete_len: sel_len,
                insert_text,
            });
            carets.push(CaretSpec::InsertRel { op: idx, rel: 1 });
            all_plain = false;
            continue;
        }

        if is_quote {
            let mut insert_text = String::new();
            insert_text.push(ch);
            insert_text.push(ch);
            edits.push(PlannedEdit {
                start,
                delete_len: sel_len,
                insert_text,
            });
            carets.push(CaretSpec::InsertRel { op: idx, rel: 1 });
            all_plain = false;
            continue;
        }

        edits.push(PlannedEdit {
            start,
            delete_len: sel_len,
            insert_text: ch.to_string(),
        });
        carets.push(CaretSpec::InsertRel { op: idx, rel: 1 });
    }

    EditPlan {
        edits,
        carets,
        primary_index: cursors.primary_index(),
        coalescible: all_plain && !ch.is_whitespace(),
    }
}

/// Plan pressing Enter: newline plus auto-indentation.
pub(crate) fn plan_newline(doc: &Document, settings: &EditorSettings) -> EditPlan {
    let buffer = doc.buffer();
    let cursors = doc.cursors();
    let openers = doc.language().indent_openers();

    let mut edits = Vec::with_capacity(cursors.len());
    let mut carets = Vec::with_capacity(cursors.len());

    for (idx, sel) in cursors.selections().iter().enumerate() {
        let (start, end) = selection_offsets(buffer, sel);

        let mut insert_text = String::from("\n");
        if settings.auto_indent {
            let min = sel.min();
            let line_text = buffer.line(min.line).unwrap_or_default();
            let before_caret: String = line_text.chars().take(min.column).collect();

            let indent: String = before_caret
                .chars()
                .take_while(|ch| *ch == ' ' || *ch == '\t')
                .collect();
            insert_text.push_str(&indent);

            let opens_block = before_caret
                .trim_end()
                .chars()
                .last()
                .is_some_and(|last| openers.contains(&last));
            if opens_block {
                insert_text.push_str(&settings.indent_unit());
            }
        }

        let rel = insert_text.chars().count();
        edits.push(PlannedEdit {
            start,
            delete_len: end - start,
            insert_text,
        });
        carets.push(CaretSpec::InsertRel { op: idx, rel });
    }

    EditPlan {
        edits,
        carets,
        primary_index: cursors.primary_index(),
        coalescible: false,
    }
}

/// Plan Backspace: delete selections, collapse fresh bracket pairs, else one grapheme.
pub(crate) fn plan_backspace(doc: &Document) -> EditPlan {
    let buffer = doc.buffer();
    let cursors = doc.cursors();
    let brackets = doc.language().brackets();

    let mut edits = Vec::with_capacity(cursors.len());
    let mut carets = Vec::with_capacity(cursors.len());

    for (idx, sel) in cursors.selections().iter().enumerate() {
        let (start, end) = selection_offsets(buffer, sel);

        if end > start {
            edits.push(PlannedEdit {
                start,
                delete_len: end - start,
                insert_text: String::new(),
            });
            carets.push(CaretSpec::InsertRel { op: idx, rel: 0 });
            continue;
        }

        if start == 0 {
            edits.push(PlannedEdit {
                start,
                delete_len: 0,
                insert_text: String::new(),
            });
            carets.push(CaretSpec::Remap {
                anchor: start,
                active: start,
            });
            continue;
        }

        let prev = buffer.char_at(start - 1);
        let next = buffer.char_at(start);
        if let (Some(prev), Some(next)) = (prev, next)
            && brackets.is_pair(prev, next)
        {
            // Between a matching pair: remove both in one operation.
            edits.push(PlannedEdit {
                start: start - 1,
                delete_len: 2,
                insert_text: String::new(),
            });
            carets.push(CaretSpec::InsertRel { op: idx, rel: 0 });
            continue;
        }

        let pos = sel.min();
        let delete_len = if pos.column == 0 {
            1 // the newline joining us to the previous line
        } else {
            let line_text = buffer.line(pos.line).unwrap_or_default();
            grapheme_len_before(&line_text, pos.column)
        };

        edits.push(PlannedEdit {
            start: start - delete_len,
            delete_len,
            insert_text: String::new(),
        });
        carets.push(CaretSpec::InsertRel { op: idx, rel: 0 });
    }

    EditPlan {
        edits,
        carets,
        primary_index: cursors.primary_index(),
        coalescible: false,
    }
}

/// Plan forward Delete.
pub(crate) fn plan_delete_forward(doc: &Document) -> EditPlan {
    let buffer = doc.buffer();
    let cursors = doc.cursors();
    let doc_len = buffer.char_count();

    let mut edits = Vec::with_capacity(cursors.len());
    let mut carets = Vec::with_capacity(cursors.len());

    for (idx, sel) in cursors.selections().iter().enumerate() {
        let (start, end) = selection_offsets(buffer, sel);

        let delete_len = if end > start {
            end - start
        } else if start >= doc_len {
            0
        } else {
            let pos = sel.min();
            let line_text = buffer.line(pos.line).unwrap_or_default();
            if pos.column >= line_text.chars().count() {
                1 // the newline
            } else {
                grapheme_len_at(&line_text, pos.column)
            }
        };

        edits.push(PlannedEdit {
            start,
            delete_len,
            insert_text: String::new(),
        });
        carets.push(if delete_len == 0 {
            CaretSpec::Remap {
                anchor: start,
                active: start,
            }
        } else {
            CaretSpec::InsertRel { op: idx, rel: 0 }
        });
    }

    EditPlan {
        edits,
        carets,
        primary_index: cursors.primary_index(),
        coalescible: false,
    }
}

/// Plan toggling line comments over every line touched by any cursor.
///
/// Mixed selections normalize to "comment all": if any non-blank touched line lacks the
/// token, every non-blank line gets it; otherwise every line loses it. Returns `None`
/// when the language has no comment token or no touched line has content.
pub(crate) fn plan_toggle_comment(doc: &Document) -> Option<EditPlan> {
    let buffer = doc.buffer();
    let cursors = doc.cursors();
    let comments = doc.language().comments();
    let token = comments.toggle_token()?;

    let mut lines: Vec<usize> = Vec::new();
    for sel in cursors.selections() {
        for line in sel.min().line..=sel.max().line {
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
    }
    lines.sort_unstable();

    let mut all_commented = true;
    let mut any_content = false;
    for &line in &lines {
        let text = buffer.line(line).unwrap_or_default();
        if text.trim().is_empty() {
            continue;
        }
        any_content = true;
        if !text.trim_start().starts_with(token) {
            all_commented = false;
        }
    }
    if !any_content {
        return None;
    }

    let mut edits = Vec::new();
    for &line in &lines {
        let text = buffer.line(line).unwrap_or_default();
        if text.trim().is_empty() {
            continue;
        }

        let indent_chars = text.chars().take_while(|ch| *ch == ' ' || *ch == '\t').count();
        let line_start = buffer.offset_of_clamped(Position::new(line, 0));

        if all_commented {
            // Strip the token (and one following space, if present).
            let after_indent: String = text.chars().skip(indent_chars).collect();
            let mut delete_len = token.chars().count();
            if after_indent
                .chars()
                .nth(delete_len)
                .is_some_and(|ch| ch == ' ')
            {
                delete_len += 1;
            }
            edits.push(PlannedEdit {
                start: line_start + indent_chars,
                delete_len,
                insert_text: String::new(),
            });
        } else if !text.trim_start().starts_with(token) {
            edits.push(PlannedEdit {
                start: line_start + indent_chars,
                delete_len: 0,
                insert_text: token.to_string(),
            });
        }
    }

    let carets = cursors
        .selections()
        .iter()
        .map(|sel| CaretSpec::Remap {
            anchor: buffer.offset_of_clamped(sel.anchor),
            active: buffer.offset_of_clamped(sel.active),
        })
        .collect();

    Some(EditPlan {
        edits,
        carets,
        primary_index: cursors.primary_index(),
        coalescible: false,
    })
}

/// A contiguous block of whole lines claimed by one or more cursors.
#[derive(Debug, Clone, Copy)]
struct LineBlock {
    first: usize,
    last: usize,
}

/// Merge the line ranges of all cursors into disjoint blocks, and map each cursor to
/// the block containing it.
fn cursor_line_blocks(selections: &[Selection]) -> (Vec<LineBlock>, Vec<usize>) {
    let mut blocks: Vec<LineBlock> = Vec::new();
    for sel in selections {
        let (first, last) = (sel.min().line, sel.max().line);
        match blocks.last_mut() {
            // Selections are sorted, so a new range either extends the last block...
            Some(block) if first <= block.last + 1 => block.last = block.last.max(last),
            // ...or starts a fresh one.
            _ => blocks.push(LineBlock { first, last }),
        }
    }

    let cursor_blocks = selections
        .iter()
        .map(|sel| {
            blocks
                .iter()
                .position(|b| b.first <= sel.min().line && sel.max().line <= b.last)
                .expect("every cursor lies in a block")
        })
        .collect();

    (blocks, cursor_blocks)
}

fn block_offsets(buffer: &TextBuffer, block: LineBlock) -> (usize, usize) {
    let start = buffer.offset_of_clamped(Position::new(block.first, 0));
    let end_col = buffer.line_len(block.last).unwrap_or(0);
    let end = buffer.offset_of_clamped(Position::new(block.last, end_col));
    (start, end)
}

/// Plan duplicating each cursor's line block immediately below itself.
pub(crate) fn plan_duplicate_lines(doc: &Document) -> EditPlan {
    let buffer = doc.buffer();
    let cursors = doc.cursors();
    let (blocks, cursor_blocks) = cursor_line_blocks(cursors.selections());

    let mut edits = Vec::with_capacity(blocks.len());
    let mut block_starts = Vec::with_capacity(blocks.len());
    for &block in &blocks {
        let (start, end) = block_offsets(buffer, block);
        let mut insert_text = String::from("\n");
        insert_text.push_str(&buffer.slice(start, end));
        edits.push(PlannedEdit {
            start: end,
            delete_len: 0,
            insert_text,
        });
        block_starts.push(start);
    }

    // Each cursor moves into the duplicate, keeping its offset within the block.
    let carets = cursors
        .selections()
        .iter()
        .zip(&cursor_blocks)
        .map(|(sel, &block_idx)| {
            let block_start = block_starts[block_idx];
            let active = buffer.offset_of_clamped(sel.active);
            CaretSpec::InsertRel {
                op: block_idx,
                rel: 1 + (active - block_start),
            }
        })
        .collect();

    EditPlan {
        edits,
        carets,
        primary_index: cursors.primary_index(),
        coalescible: false,
    }
}

/// Plan moving each cursor's line block one line up or down. Blocks at the document
/// edge stay put.
pub(crate) fn plan_move_lines(doc: &Document, up: bool) -> Option<EditPlan> {
    let buffer = doc.buffer();
    let cursors = doc.cursors();
    let line_count = buffer.line_count();
    let (blocks, cursor_blocks) = cursor_line_blocks(cursors.selections());

    let mut edits = Vec::with_capacity(blocks.len());
    // For each block: (op start, char offset of the moved block within the inserted text),
    // or None when the block cannot move.
    let mut placements: Vec<Option<(usize, usize)>> = Vec::with_capacity(blocks.len());
    let mut moved_any = false;

    for &block in &blocks {
        let movable = if up { block.first > 0 } else { block.last + 1 < line_count };
        if !movable {
            edits.push(PlannedEdit {
                start: 0,
                delete_len: 0,
                insert_text: String::new(),
            });
            placements.push(None);
            continue;
        }
        moved_any = true;

        let (block_start, block_end) = block_offsets(buffer, block);
        let block_text = buffer.slice(block_start, block_end);

        if up {
            let neighbor = block.first - 1;
            let neighbor_start = buffer.offset_of_clamped(Position::new(neighbor, 0));
            let neighbor_text = buffer.line(neighbor).unwrap_or_default();

            let mut insert_text =
                String::with_capacity(block_text.len() + neighbor_text.len() + 1);
            insert_text.push_str(&block_text);
            insert_text.push('\n');
            insert_text.push_str(&neighbor_text);

            edits.push(PlannedEdit {
                start: neighbor_start,
                delete_len: block_end - neighbor_start,
                insert_text,
            });
            placements.push(Some((block_start, 0)));
        } else {
            let neighbor = block.last + 1;
            let neighbor_text = buffer.line(neighbor).unwrap_or_default();
            let neighbor_len = neighbor_text.chars().count();

            let mut insert_text =
                String::with_capacity(block_text.len() + neighbor_text.len() + 1);
            insert_text.push_str(&neighbor_text);
            insert_text.push('\n');
            insert_text.push_str(&block_text);

            edits.push(PlannedEdit {
                start: block_start,
                delete_len: (block_end - block_start) + 1 + neighbor_len,
                insert_text,
            });
            placements.push(Some((block_start, neighbor_len + 1)));
        }
    }

    if !moved_any {
        return None;
    }

    let carets = cursors
        .selections()
        .iter()
        .zip(&cursor_blocks)
        .map(|(sel, &block_idx)| match placements[block_idx] {
            Some((block_start, block_rel)) => {
                let anchor = buffer.offset_of_clamped(sel.anchor);
                let active = buffer.offset_of_clamped(sel.active);
                CaretSpec::SelectionRel {
                    op: block_idx,
                    anchor_rel: block_rel + (anchor - block_start),
                    active_rel: block_rel + (active - block_start),
                }
            }
            None => CaretSpec::Remap {
                anchor: buffer.offset_of_clamped(sel.anchor),
                active: buffer.offset_of_clamped(sel.active),
            },
        })
        .collect();

    Some(EditPlan {
        edits,
        carets,
        primary_index: cursors.primary_index(),
        coalescible: false,
    })
}

/// Find the bracket matching the one adjacent to `pos`.
///
/// Checks the character before the caret first, then the character after, mirroring how
/// editors highlight the pair around the insertion point. Returns the positions of both
/// brackets, or `None` when no adjacent bracket has a match.
pub fn matching_bracket(
    buffer: &TextBuffer,
    pos: Position,
    brackets: &forge_lang::BracketConfig,
) -> Option<(Position, Position)> {
    let offset = buffer.offset_of_clamped(pos);

    let candidates = [offset.checked_sub(1), Some(offset)];
    for candidate in candidates.into_iter().flatten() {
        let Some(ch) = buffer.char_at(candidate) else {
            continue;
        };

        let (open, close, forward) = if let Some(close) = brackets.closer_for(ch) {
            (ch, close, true)
        } else if let Some(open) = brackets.opener_for(ch) {
            (open, ch, false)
        } else {
            continue;
        };

        if let Some(matched) = scan_for_match(buffer, candidate, open, close, forward) {
            return Some((buffer.position_of(candidate), buffer.position_of(matched)));
        }
    }

    None
}

fn scan_for_match(
    buffer: &TextBuffer,
    from: usize,
    open: char,
    close: char,
    forward: bool,
) -> Option<usize> {
    let len = buffer.char_count();
    let mut depth = 0i64;
    let mut i = from;

    loop {
        if let Some(ch) = buffer.char_at(i) {
            if ch == open {
                depth += 1;
            } else if ch == close {
                depth -= 1;
            }
            if depth == 0 && i != from {
                return Some(i);
            }
        }

        if forward {
            i += 1;
            if i >= len {
                return None;
            }
        } else {
            if i == 0 {
                return None;
            }
            i -= 1;
        }
    }
}

fn grapheme_len_before(line: &str, column: usize) -> usize {
    let byte_end = byte_index(line, column);
    line[..byte_end]
        .graphemes(true)
        .last()
        .map(|g| g.chars().count())
        .unwrap_or(1)
}

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

#[cfg(test)]
mod tests {
    use super::*;

    fn brackets() -> &'static forge_lang::BracketConfig {
        forge_lang::Language::CLike.brackets()
    }

    #[test]
    fn test_matching_bracket_nested() {
        let buffer = TextBuffer::from_text("f(a, (b))");
        // Caret after the outer opener.
        let (from, to) = matching_bracket(&buffer, Position::new(0, 2), brackets()).unwrap();
        assert_eq!(from, Position::new(0, 1));
        assert_eq!(to, Position::new(0, 8));
    }

    #[test]
    fn test_matching_bracket_backward() {
        let buffer = TextBuffer::from_text("{ [x] }");
        let (from, to) = matching_bracket(&buffer, Position::new(0, 5), brackets()).unwrap();
        assert_eq!(from, Position::new(0, 4));
        assert_eq!(to, Position::new(0, 2));
    }

    #[test]
    fn test_matching_bracket_unbalanced_is_none() {
        let buffer = TextBuffer::from_text("(((");
        assert!(matching_bracket(&buffer, Position::new(0, 1), brackets()).is_none());
    }
}
