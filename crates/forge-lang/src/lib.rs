#![warn(missing_docs)]
//! `forge-lang` - data-driven language configuration for the forge editing engine.
//!
//! This crate intentionally stays lightweight and does **not** depend on the buffer or
//! highlighting crates. It answers the language-specific questions the editing kernel asks:
//! which comment tokens a language uses, which bracket/quote pairs auto-close, and which
//! trailing characters open an indented block.

/// The set of languages the engine ships rule tables for.
///
/// Language dispatch is a closed enum: adding a language means adding a variant and its
/// configuration here plus a rule table in `forge-highlight`, not runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Python (`.py`).
    Python,
    /// JavaScript/TypeScript family (`.js`, `.ts`, `.jsx`, `.tsx`).
    JavaScript,
    /// C-family languages (`.c`, `.cpp`, `.h`, `.java`, `.cs`).
    CLike,
    /// HTML (`.html`).
    Html,
    /// Everything else: no highlighting, generic editing behavior.
    PlainText,
}

impl Language {
    /// Pick a language from a file extension (lowercase, without the dot).
    ///
    /// Unknown extensions fall back to [`Language::PlainText`].
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "py" => Self::Python,
            "js" | "ts" | "jsx" | "tsx" => Self::JavaScript,
            "java" | "c" | "cpp" | "cs" | "h" => Self::CLike,
            "html" => Self::Html,
            _ => Self::PlainText,
        }
    }

    /// Stable name for diagnostics and registry keys.
    pub fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::CLike => "c-like",
            Self::Html => "html",
            Self::PlainText => "plain-text",
        }
    }

    /// Comment tokens for this language.
    pub fn comments(self) -> CommentConfig {
        match self {
            Self::Python => CommentConfig::line("#"),
            Self::JavaScript | Self::CLike => CommentConfig::line_and_block("//", "/*", "*/"),
            Self::Html => CommentConfig::block("<!--", "-->"),
            Self::PlainText => CommentConfig::default(),
        }
    }

    /// Bracket and quote pairs used for auto-close, wrap and matching.
    pub fn brackets(self) -> &'static BracketConfig {
        match self {
            Self::JavaScript => &JS_BRACKETS,
            _ => &DEFAULT_BRACKETS,
        }
    }

    /// Trailing characters that open an indented block on the next line.
    pub fn indent_openers(self) -> &'static [char] {
        match self {
            Self::Python => &[':', '{', '[', '('],
            _ => &['{', '[', '('],
        }
    }
}

const PAIRS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

static DEFAULT_BRACKETS: BracketConfig = BracketConfig {
    pairs: PAIRS,
    quotes: &['"', '\''],
};

static JS_BRACKETS: BracketConfig = BracketConfig {
    pairs: PAIRS,
    quotes: &['"', '\'', '`'],
};

/// Comment tokens for a given language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `#`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// Config that supports only block comments.
    pub fn block(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            line: None,
            block_start: Some(start.into()),
            block_end: Some(end.into()),
        }
    }

    /// Config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
        }
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_end.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// The token used for line-comment toggling, if any.
    ///
    /// Languages without a line token fall back to their block start (HTML toggles `<!--`).
    pub fn toggle_token(&self) -> Option<&str> {
        self.line.as_deref().or(self.block_start.as_deref())
    }
}

/// Bracket/quote pairs for a language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketConfig {
    /// Opener/closer pairs, in no particular priority.
    pub pairs: &'static [(char, char)],
    /// Quote characters that pair with themselves.
    pub quotes: &'static [char],
}

impl BracketConfig {
    /// The closer for `opener`, if `opener` is a configured bracket opener.
    pub fn closer_for(&self, opener: char) -> Option<char> {
        self.pairs
            .iter()
            .find(|(open, _)| *open == opener)
            .map(|(_, close)| *close)
    }

    /// The opener for `closer`, if `closer` is a configured bracket closer.
    pub fn opener_for(&self, closer: char) -> Option<char> {
        self.pairs
            .iter()
            .find(|(_, close)| *close == closer)
            .map(|(open, _)| *open)
    }

    /// Returns `true` if `ch` is a self-pairing quote character.
    pub fn is_quote(&self, ch: char) -> bool {
        self.quotes.contains(&ch)
    }

    /// Returns `true` if `prev` immediately followed by `next` forms a matching pair
    /// (bracket pair or doubled quote).
    pub fn is_pair(&self, prev: char, next: char) -> bool {
        self.closer_for(prev) == Some(next) || (self.is_quote(prev) && prev == next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("tsx"), Language::JavaScript);
        assert_eq!(Language::from_extension("cpp"), Language::CLike);
        assert_eq!(Language::from_extension("html"), Language::Html);
        assert_eq!(Language::from_extension("md"), Language::PlainText);
    }

    #[test]
    fn test_comment_tokens() {
        assert_eq!(Language::Python.comments().toggle_token(), Some("#"));
        assert_eq!(Language::JavaScript.comments().toggle_token(), Some("//"));
        assert_eq!(Language::Html.comments().toggle_token(), Some("<!--"));
        assert_eq!(Language::PlainText.comments().toggle_token(), None);
        assert!(Language::CLike.comments().has_block());
    }

    #[test]
    fn test_bracket_pairs() {
        let brackets = Language::Python.brackets();
        assert_eq!(brackets.closer_for('('), Some(')'));
        assert_eq!(brackets.opener_for('}'), Some('{'));
        assert!(brackets.is_pair('(', ')'));
        assert!(brackets.is_pair('"', '"'));
        assert!(!brackets.is_pair('(', ']'));
    }

    #[test]
    fn test_backtick_is_javascript_only() {
        assert!(Language::JavaScript.brackets().is_quote('`'));
        assert!(!Language::Python.brackets().is_quote('`'));
    }

    #[test]
    fn test_indent_openers() {
        assert!(Language::Python.indent_openers().contains(&':'));
        assert!(!Language::CLike.indent_openers().contains(&':'));
        assert!(Language::CLike.indent_openers().contains(&'{'));
    }
}
