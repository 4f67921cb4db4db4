//! Incremental highlight engine.
//!
//! One engine per document. The engine caches, per line, the spans it produced and the
//! lexical state the line was entered and exited with. On a dirty-range event it
//! splices the cache (`old_line_count` entries replaced by `new_line_count`) and
//! re-tokenizes only the reported lines, plus a forward cascade: when a re-tokenized
//! line's exit state differs from the cached entry state of the next line (an edit
//! opened or closed a multi-line construct), re-highlighting continues line by line
//! until the states agree again or the document ends.
//!
//! Passes are revision-keyed. The host may run them late or off-thread; a pass whose
//! revision is older than what the engine already holds is dropped wholesale via
//! [`PassOutcome::Superseded`], never partially applied.

use crate::rules::{HighlightSpan, RuleSet, TokenKind};
use forge_core::{DirtyRange, PassOutcome, TextBuffer};
use forge_lang::Language;
use std::ops::Range;
use std::sync::Arc;

use crate::registry::RuleRegistry;

/// Lexical state carried across line boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineState {
    /// Not inside any multi-line construct.
    #[default]
    Normal,
    /// Inside the block rule with this index in the language's [`RuleSet`].
    InBlock(usize),
}

/// Span without its line index; the line is implied by cache position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpanData {
    start_column: usize,
    end_column: usize,
    kind: TokenKind,
}

#[derive(Debug, Clone, Default)]
struct LineEntry {
    entry: LineState,
    exit: LineState,
    spans: Vec<SpanData>,
}

/// Per-document incremental tokenizer.
///
/// # Example
///
/// ```rust
/// use forge_core::TextBuffer;
/// use forge_highlight::{HighlightEngine, RuleRegistry, TokenKind};
/// use forge_lang::Language;
///
/// let buffer = TextBuffer::from_text("# note\nx = 1");
/// let mut engine = HighlightEngine::new(RuleRegistry::global(), Language::Python);
/// engine.reset(&buffer, 0);
///
/// let spans = engine.spans_for_line(0);
/// assert_eq!(spans[0].kind, TokenKind::Comment);
/// ```
pub struct HighlightEngine {
    language: Language,
    rules: Arc<RuleSet>,
    lines: Vec<LineEntry>,
    revision: u64,
}

impl HighlightEngine {
    /// Create an engine for `language`, borrowing compiled rules from `registry`.
    pub fn new(registry: &RuleRegistry, language: Language) -> Self {
        Self {
            language,
            rules: registry.rules(language),
            lines: Vec::new(),
            revision: 0,
        }
    }

    /// The engine's language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// The revision of the last applied pass.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Highlight the whole document at `revision` (initial load, language switch).
    pub fn reset(&mut self, buffer: &TextBuffer, revision: u64) {
        self.lines.clear();
        self.lines.reserve(buffer.line_count());

        let mut state = LineState::Normal;
        for line in 0..buffer.line_count() {
            let text = buffer.line(line).unwrap_or_default();
            let (spans, exit) = tokenize_line(&text, state, &self.rules);
            self.lines.push(LineEntry {
                entry: state,
                exit,
                spans,
            });
            state = exit;
        }
        self.revision = revision;
    }

    /// Apply a dirty-range pass computed against `revision`.
    ///
    /// Returns the line range that was actually re-highlighted (dirty lines plus the
    /// cascade), or [`PassOutcome::Superseded`] when the pass is older than what the
    /// engine already holds.
    pub fn apply_dirty(
        &mut self,
        buffer: &TextBuffer,
        dirty: DirtyRange,
        revision: u64,
    ) -> PassOutcome<Range<usize>> {
        if revision < self.revision {
            return PassOutcome::Superseded;
        }

        let start = dirty.start_line.min(self.lines.len());
        let old_end = (start + dirty.old_line_count).min(self.lines.len());
        let _ = self.lines.splice(
            start..old_end,
            std::iter::repeat_with(LineEntry::default).take(dirty.new_line_count),
        );

        // The cache must stay line-aligned with the buffer even if a host coalesced
        // dirty events; pad or truncate before tokenizing.
        let line_count = buffer.line_count();
        if self.lines.len() < line_count {
            self.lines
                .resize_with(line_count, LineEntry::default);
        } else {
            self.lines.truncate(line_count);
        }

        let force_until = (start + dirty.new_line_count).min(line_count);
        let mut line = start;
        while line < line_count {
            let entry = if line == 0 {
                LineState::Normal
            } else {
                self.lines[line - 1].exit
            };

            if line >= force_until && self.lines[line].entry == entry {
                break; // exit state stabilized
            }

            let text = buffer.line(line).unwrap_or_default();
            let (spans, exit) = tokenize_line(&text, entry, &self.rules);
            self.lines[line] = LineEntry { entry, exit, spans };
            line += 1;
        }

        self.revision = revision;
        PassOutcome::Applied(start..line)
    }

    /// Spans of one line, reflecting the last applied pass.
    pub fn spans_for_line(&self, line: usize) -> Vec<HighlightSpan> {
        self.lines
            .get(line)
            .map(|entry| {
                entry
                    .spans
                    .iter()
                    .map(|span| HighlightSpan {
                        line,
                        start_column: span.start_column,
                        end_column: span.end_column,
                        kind: span.kind,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Spans for a line range (for the render boundary after a pass).
    pub fn spans_for_lines(&self, lines: Range<usize>) -> Vec<HighlightSpan> {
        lines.flat_map(|line| self.spans_for_line(line)).collect()
    }

    /// The lexical state the given line exits with.
    pub fn exit_state(&self, line: usize) -> LineState {
        self.lines.get(line).map(|entry| entry.exit).unwrap_or_default()
    }
}

/// Tokenize one line given the state carried in from the previous line.
fn tokenize_line(text: &str, entry: LineState, rules: &RuleSet) -> (Vec<SpanData>, LineState) {
    let mut spans: Vec<SpanData> = Vec::new();
    let mut state = entry;

    // Capture rules claim their columns up front; the scanner emits them in place.
    let forced = collect_captures(text, rules);

    let mut pos_byte = 0usize;
    let mut pos_col = 0usize;
    let len = text.len();

    // Resuming inside a block: look for its end delimiter first.
    if let LineState::InBlock(idx) = state {
        let block = &rules.blocks[idx];
        match text.find(&block.end) {
            Some(rel) => {
                let end_byte = rel + block.end.len();
                let end_col = char_count(&text[..end_byte]);
                if end_col > 0 {
                    spans.push(SpanData {
                        start_column: 0,
                        end_column: end_col,
                        kind: block.kind,
                    });
                }
                pos_byte = end_byte;
                pos_col = end_col;
                state = LineState::Normal;
            }
            None => {
                let end_col = char_count(text);
                if end_col > 0 {
                    spans.push(SpanData {
                        start_column: 0,
                        end_column: end_col,
                        kind: block.kind,
                    });
                }
                return (spans, state);
            }
        }
    }

    while pos_byte < len {
        // Forced capture span starting here?
        if let Some(&(start, end, kind)) = forced.iter().find(|(s, _, _)| *s == pos_byte) {
            let span_cols = char_count(&text[start..end]);
            spans.push(SpanData {
                start_column: pos_col,
                end_column: pos_col + span_cols,
                kind,
            });
            pos_byte = end;
            pos_col += span_cols;
            continue;
        }

        // Multi-line block opening here?
        if let Some(idx) = rules
            .blocks
            .iter()
            .position(|block| text[pos_byte..].starts_with(&block.start))
        {
            let block = &rules.blocks[idx];
            let body_start = pos_byte + block.start.len();
            match text[body_start..].find(&block.end) {
                Some(rel) => {
                    let end_byte = body_start + rel + block.end.len();
                    let span_cols = char_count(&text[pos_byte..end_byte]);
                    spans.push(SpanData {
                        start_column: pos_col,
                        end_column: pos_col + span_cols,
                        kind: block.kind,
                    });
                    pos_byte = end_byte;
                    pos_col += span_cols;
                }
                None => {
                    let span_cols = char_count(&text[pos_byte..]);
                    spans.push(SpanData {
                        start_column: pos_col,
                        end_column: pos_col + span_cols,
                        kind: block.kind,
                    });
                    return (spans, LineState::InBlock(idx));
                }
            }
            continue;
        }

        // Scan rules in declared order; first match anchored here wins.
        let mut matched = false;
        for rule in &rules.scan_rules {
            if let Some(m) = rule.regex.find_at(text, pos_byte)
                && m.start() == pos_byte
                && m.end() > pos_byte
            {
                let span_cols = char_count(&text[pos_byte..m.end()]);
                spans.push(SpanData {
                    start_column: pos_col,
                    end_column: pos_col + span_cols,
                    kind: rule.kind,
                });
                pos_byte = m.end();
                pos_col += span_cols;
                matched = true;
                break;
            }
        }
        if matched {
            continue;
        }

        // Unmatched character: default kind, no span emitted.
        let ch_len = text[pos_byte..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(1);
        pos_byte += ch_len;
        pos_col += 1;
    }

    (spans, state)
}

/// Collect capture-rule spans as non-overlapping `(start_byte, end_byte, kind)`
/// entries, earlier-declared rules first.
fn collect_captures(text: &str, rules: &RuleSet) -> Vec<(usize, usize, TokenKind)> {
    let mut forced: Vec<(usize, usize, TokenKind)> = Vec::new();

    for rule in &rules.capture_rules {
        for caps in rule.regex.captures_iter(text) {
            let Some(m) = caps.get(rule.group) else {
                continue;
            };
            if m.start() >= m.end() {
                continue;
            }
            let overlaps = forced
                .iter()
                .any(|&(start, end, _)| m.start() < end && start < m.end());
            if !overlaps {
                forced.push((m.start(), m.end(), rule.kind));
            }
        }
    }

    forced.sort_by_key(|&(start, _, _)| start);
    forced
}

fn char_count(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin_rules;

    fn tokenize(text: &str, entry: LineState, language: Language) -> (Vec<SpanData>, LineState) {
        let rules = builtin_rules(language).unwrap();
        tokenize_line(text, entry, &rules)
    }

    #[test]
    fn test_python_keywords_strings_numbers() {
        let (spans, exit) = tokenize("def f(): return 'x' + 42", LineState::Normal, Language::Python);
        assert_eq!(exit, LineState::Normal);

        let kinds: Vec<TokenKind> = spans.iter().map(|s| s.kind).collect();
        assert!(kinds.contains(&TokenKind::Keyword)); // def, return
        assert!(kinds.contains(&TokenKind::Function)); // f
        assert!(kinds.contains(&TokenKind::String)); // 'x'
        assert!(kinds.contains(&TokenKind::Number)); // 42
    }

    #[test]
    fn test_function_name_is_forced_over_scan_rules() {
        let (spans, _) = tokenize("def enumerate():", LineState::Normal, Language::Python);
        // `enumerate` is also a builtin, but the definition-name capture claims it.
        let name_span = spans.iter().find(|s| s.start_column == 4).unwrap();
        assert_eq!(name_span.kind, TokenKind::Function);
        assert_eq!(name_span.end_column, 13);
    }

    #[test]
    fn test_comment_wins_over_later_rules() {
        let (spans, _) = tokenize("# def not_a_def", LineState::Normal, Language::Python);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, TokenKind::Comment);
        assert_eq!(spans[0].start_column, 0);
        assert_eq!(spans[0].end_column, 15);
    }

    #[test]
    fn test_unterminated_block_comment_sets_exit_state() {
        let (spans, exit) = tokenize("int x; /* open", LineState::Normal, Language::CLike);
        assert!(matches!(exit, LineState::InBlock(_)));
        assert_eq!(spans.last().unwrap().kind, TokenKind::Comment);
    }

    #[test]
    fn test_block_continuation_and_close() {
        let (_, exit) = tokenize("/* open", LineState::Normal, Language::CLike);
        let (spans, exit2) = tokenize("still */ int x;", exit, Language::CLike);
        assert_eq!(exit2, LineState::Normal);
        assert_eq!(spans[0].kind, TokenKind::Comment);
        assert_eq!(spans[0].start_column, 0);
        assert_eq!(spans[0].end_column, 8);
        assert!(spans.iter().any(|s| s.kind == TokenKind::Keyword));
    }

    #[test]
    fn test_single_line_block_closes_inline() {
        let (spans, exit) = tokenize(r#"x = """doc""" + 1"#, LineState::Normal, Language::Python);
        assert_eq!(exit, LineState::Normal);
        let doc_span = spans.iter().find(|s| s.kind == TokenKind::String).unwrap();
        assert_eq!(doc_span.start_column, 4);
        assert_eq!(doc_span.end_column, 13);
    }

    #[test]
    fn test_html_tags_and_comments() {
        let (spans, _) = tokenize(
            r#"<div class="x"><!-- hi --></div>"#,
            LineState::Normal,
            Language::Html,
        );
        assert!(spans.iter().any(|s| s.kind == TokenKind::Tag));
        assert!(spans.iter().any(|s| s.kind == TokenKind::Comment));
    }

    #[test]
    fn test_unicode_columns_are_characters() {
        let (spans, _) = tokenize("x = '你好'", LineState::Normal, Language::Python);
        let string_span = spans.iter().find(|s| s.kind == TokenKind::String).unwrap();
        assert_eq!(string_span.start_column, 4);
        assert_eq!(string_span.end_column, 8);
    }
}
