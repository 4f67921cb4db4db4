//! Visual width measurement.
//!
//! Character-cell measurement for the parts of the kernel that care about what a line
//! *looks* like rather than how many characters it holds: tab stops for space-based
//! indentation and line-width estimation in the minimap projection. CJK wide characters
//! count as two cells, `'\t'` advances to the next tab stop.

use unicode_width::UnicodeWidthChar;

/// Cell width of `ch` when it starts at visual column `x`.
///
/// Tabs advance to the next multiple of `tab_width`; zero-width characters count as 0.
pub fn cell_width_at(ch: char, x: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - (x % tab_width)
    } else {
        UnicodeWidthChar::width(ch).unwrap_or(0)
    }
}

/// Total visual width of `text` in cells, starting at column 0.
pub fn visual_width(text: &str, tab_width: usize) -> usize {
    let mut x = 0usize;
    for ch in text.chars() {
        x += cell_width_at(ch, x, tab_width);
    }
    x
}

/// Visual column of character index `column` within `text`.
pub fn visual_col(text: &str, column: usize, tab_width: usize) -> usize {
    let mut x = 0usize;
    for ch in text.chars().take(column) {
        x += cell_width_at(ch, x, tab_width);
    }
    x
}
