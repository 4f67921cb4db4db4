#![warn(missing_docs)]
//! `forge-minimap` - scaled document overview for the forge editing engine.
//!
//! The projector derives one [`LineMark`] per buffer line: a content classification
//! (comment, definition, import, control flow, plain code), an indent offset, and a
//! content width - enough for the view layer to draw the familiar "tiny code" column
//! without knowing any glyphs. Marks are a fixed 2 cells tall with a 1-cell gap, so
//! geometry is position-independent.
//!
//! The projector recomputes only the lines named in a dirty-range event and drops
//! passes that a newer revision superseded. It never owns scroll position: clicking
//! the minimap yields a [`ScrollRequest`] for the view layer to act on, and the
//! viewport band is derived from the scroll state the view supplies.

use forge_core::width::visual_width;
use forge_core::{DirtyRange, PassOutcome, TextBuffer};
use std::ops::Range;

/// Mark height in minimap cells.
pub const MARK_HEIGHT: usize = 2;
/// Gap between marks in minimap cells.
pub const LINE_GAP: usize = 1;
/// Total cells per document line.
pub const CELLS_PER_LINE: usize = MARK_HEIGHT + LINE_GAP;

/// Reference line length: lines this long (or longer) span the full mark width.
const FULL_WIDTH_LINE: usize = 100;

/// Content classification of one line, for mark coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    /// Blank line: no mark, just the gap.
    Blank,
    /// Comment line (`#`, `//`).
    Comment,
    /// Definition (`def`, `class`, `function`, `const`, ...).
    Definition,
    /// Import/include line.
    Import,
    /// Control flow (`if`, `for`, `while`, `return`, ...).
    ControlFlow,
    /// Anything else.
    Code,
}

/// The projected mark for one document line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMark {
    /// Content classification.
    pub kind: MarkKind,
    /// Left offset of the mark in minimap cells (scaled indentation).
    pub indent_cells: usize,
    /// Width of the mark in minimap cells (scaled line length).
    pub content_cells: usize,
}

impl LineMark {
    const BLANK: LineMark = LineMark {
        kind: MarkKind::Blank,
        indent_cells: 0,
        content_cells: 0,
    };
}

/// The viewport band rectangle, in minimap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportBand {
    /// Top of the band.
    pub y: usize,
    /// Band height.
    pub height: usize,
}

/// A projected view: the marks plus the viewport band.
#[derive(Debug)]
pub struct MinimapView<'a> {
    /// One mark per document line.
    pub marks: &'a [LineMark],
    /// Where the viewport sits within the minimap.
    pub band: ViewportBand,
}

/// A request to the external view layer to scroll a line into view.
///
/// The projector derives scroll targets but never owns scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    /// Target line to scroll to.
    pub line: usize,
}

/// Per-document minimap projector.
///
/// # Example
///
/// ```rust
/// use forge_core::TextBuffer;
/// use forge_minimap::{MarkKind, MinimapProjector};
///
/// let buffer = TextBuffer::from_text("# header\n\ndef main():\n    pass");
/// let mut projector = MinimapProjector::new(90, 4);
/// projector.rebuild(&buffer, 0);
///
/// let marks = projector.marks();
/// assert_eq!(marks[0].kind, MarkKind::Comment);
/// assert_eq!(marks[1].kind, MarkKind::Blank);
/// assert_eq!(marks[2].kind, MarkKind::Definition);
/// assert!(marks[3].indent_cells > 0);
/// ```
pub struct MinimapProjector {
    width: usize,
    tab_width: usize,
    marks: Vec<LineMark>,
    revision: u64,
}

impl MinimapProjector {
    /// Create a projector `width` cells wide, measuring tabs at `tab_width`.
    pub fn new(width: usize, tab_width: usize) -> Self {
        Self {
            width,
            tab_width,
            marks: Vec::new(),
            revision: 0,
        }
    }

    /// Projector width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The revision of the last applied pass.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// One mark per document line.
    pub fn marks(&self) -> &[LineMark] {
        &self.marks
    }

    /// Total minimap content height in cells.
    pub fn content_height(&self) -> usize {
        self.marks.len() * CELLS_PER_LINE
    }

    /// Recompute every mark (initial load).
    pub fn rebuild(&mut self, buffer: &TextBuffer, revision: u64) {
        self.marks.clear();
        self.marks.reserve(buffer.line_count());
        for line in 0..buffer.line_count() {
            let text = buffer.line(line).unwrap_or_default();
            self.marks.push(self.mark_for(&text));
        }
        self.revision = revision;
    }

    /// Apply a dirty-range pass computed against `revision`.
    ///
    /// Recomputes only `[start_line, start_line + new_line_count)`; a pass older than
    /// the projector's current revision is dropped.
    pub fn apply_dirty(
        &mut self,
        buffer: &TextBuffer,
        dirty: DirtyRange,
        revision: u64,
    ) -> PassOutcome<Range<usize>> {
        if revision < self.revision {
            return PassOutcome::Superseded;
        }

        let start = dirty.start_line.min(self.marks.len());
        let old_end = (start + dirty.old_line_count).min(self.marks.len());
        let replacement: Vec<LineMark> = (start..start + dirty.new_line_count)
            .map(|line| {
                let text = buffer.line(line).unwrap_or_default();
                self.mark_for(&text)
            })
            .collect();
        let _ = self.marks.splice(start..old_end, replacement);

        // Stay line-aligned with the buffer even if the host coalesced events.
        let line_count = buffer.line_count();
        if self.marks.len() < line_count {
            for line in self.marks.len()..line_count {
                let text = buffer.line(line).unwrap_or_default();
                self.marks.push(self.mark_for(&text));
            }
        } else {
            self.marks.truncate(line_count);
        }

        self.revision = revision;
        PassOutcome::Applied(start..(start + dirty.new_line_count).min(line_count))
    }

    /// Project the minimap for a viewport showing `viewport_lines` lines starting at
    /// `scroll_top` (both in document lines, supplied by the view layer).
    pub fn project(&self, scroll_top: usize, viewport_lines: usize) -> MinimapView<'_> {
        let top = scroll_top.min(self.marks.len());
        let visible = viewport_lines.min(self.marks.len().saturating_sub(top));
        MinimapView {
            marks: &self.marks,
            band: ViewportBand {
                y: top * CELLS_PER_LINE,
                height: visible.max(1) * CELLS_PER_LINE,
            },
        }
    }

    /// Translate a click at minimap cell row `y` into a scroll request.
    pub fn click_to_line(&self, y: usize) -> ScrollRequest {
        let line = (y / CELLS_PER_LINE).min(self.marks.len().saturating_sub(1));
        ScrollRequest { line }
    }

    fn mark_for(&self, text: &str) -> LineMark {
        if text.trim().is_empty() {
            return LineMark::BLANK;
        }

        let indent_level = text
            .chars()
            .take_while(|ch| *ch == ' ' || *ch == '\t')
            .count();
        let indent_cells =
            ((indent_level * self.width) / 60).min(self.width / 3);

        let line_width = visual_width(text.trim_end(), self.tab_width).min(FULL_WIDTH_LINE);
        let content_cells =
            (line_width * self.width.saturating_sub(indent_cells)) / FULL_WIDTH_LINE;

        LineMark {
            kind: classify(text.trim_start()),
            indent_cells,
            content_cells: content_cells.max(1),
        }
    }
}

/// Classify a line's content from its first words, glyph-independent.
fn classify(stripped: &str) -> MarkKind {
    const DEFINITIONS: [&str; 9] = [
        "def ", "class ", "function ", "public ", "private ", "async ", "const ", "let ", "var ",
    ];
    const IMPORTS: [&str; 4] = ["import ", "from ", "include ", "using "];
    const CONTROL_FLOW: [&str; 7] = ["if ", "else", "for ", "while ", "switch ", "case ", "return "];

    if stripped.starts_with('#') || stripped.starts_with("//") {
        MarkKind::Comment
    } else if DEFINITIONS.iter().any(|kw| stripped.starts_with(kw)) {
        MarkKind::Definition
    } else if IMPORTS.iter().any(|kw| stripped.contains(kw)) {
        MarkKind::Import
    } else if CONTROL_FLOW.iter().any(|kw| stripped.starts_with(kw)) {
        MarkKind::ControlFlow
    } else {
        MarkKind::Code
    }
}
