//! Highlighting rule sets.
//!
//! A [`RuleSet`] is an ordered table of compiled patterns for one language:
//!
//! - **scan rules** are tried in declared order at each position; the first pattern
//!   matching exactly at that position wins, and unmatched characters keep the default
//!   token kind
//! - **capture rules** name a sub-group of a larger context (the `name` in
//!   `def name(...)`) and claim their columns before scanning starts
//! - **block rules** are literal delimiter pairs for multi-line constructs (block
//!   comments, triple-quoted strings, template literals); crossing a line boundary
//!   inside one is what the per-line entry/exit state tracks
//!
//! Patterns are compiled once per language and cached for the process lifetime in the
//! [`RuleRegistry`](crate::RuleRegistry); a malformed pattern surfaces a
//! [`PatternCompileError`] at load time and the language degrades to no highlighting.

use forge_lang::Language;
use regex::Regex;
use thiserror::Error;

/// Classification assigned to a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Language keyword.
    Keyword,
    /// Built-in function or value.
    Builtin,
    /// String literal.
    String,
    /// Comment.
    Comment,
    /// Numeric literal.
    Number,
    /// Function name at its definition.
    Function,
    /// Class name at its definition.
    Class,
    /// Markup tag.
    Tag,
    /// Default kind for unmatched text.
    Text,
}

/// A styled region of one line, in character columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Logical line index.
    pub line: usize,
    /// Inclusive start column.
    pub start_column: usize,
    /// Exclusive end column.
    pub end_column: usize,
    /// Token classification.
    pub kind: TokenKind,
}

/// A malformed pattern in a language rule table.
#[derive(Debug, Error)]
#[error("invalid pattern {pattern:?} in {language} rules: {source}")]
pub struct PatternCompileError {
    /// Name of the rule table being compiled.
    pub language: String,
    /// The offending pattern.
    pub pattern: String,
    /// The underlying regex error.
    #[source]
    pub source: regex::Error,
}

#[derive(Debug)]
pub(crate) struct ScanRule {
    pub regex: Regex,
    pub kind: TokenKind,
}

#[derive(Debug)]
pub(crate) struct CaptureRule {
    pub regex: Regex,
    pub group: usize,
    pub kind: TokenKind,
}

/// A multi-line construct delimited by literal start/end tokens.
#[derive(Debug, Clone)]
pub struct BlockRule {
    pub(crate) start: String,
    pub(crate) end: String,
    pub(crate) kind: TokenKind,
}

/// An ordered, compiled rule table for one language.
#[derive(Debug)]
pub struct RuleSet {
    name: String,
    pub(crate) capture_rules: Vec<CaptureRule>,
    pub(crate) scan_rules: Vec<ScanRule>,
    pub(crate) blocks: Vec<BlockRule>,
}

impl RuleSet {
    /// An empty rule set: everything keeps the default token kind.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capture_rules: Vec::new(),
            scan_rules: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Start building a rule set.
    pub fn builder(name: impl Into<String>) -> RuleSetBuilder {
        RuleSetBuilder {
            name: name.into(),
            captures: Vec::new(),
            scans: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// The rule table's name (used in compile errors).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this set highlights nothing.
    pub fn is_empty(&self) -> bool {
        self.capture_rules.is_empty() && self.scan_rules.is_empty() && self.blocks.is_empty()
    }
}

/// Builder for [`RuleSet`]; compilation happens in [`build`](RuleSetBuilder::build).
pub struct RuleSetBuilder {
    name: String,
    captures: Vec<(String, usize, TokenKind)>,
    scans: Vec<(String, TokenKind)>,
    blocks: Vec<BlockRule>,
}

impl RuleSetBuilder {
    /// Add a scan rule, tried in declared order at each position.
    pub fn rule(mut self, pattern: &str, kind: TokenKind) -> Self {
        self.scans.push((pattern.to_string(), kind));
        self
    }

    /// Add a capture rule: only capture group `group` of each match is highlighted.
    pub fn capture(mut self, pattern: &str, group: usize, kind: TokenKind) -> Self {
        self.captures.push((pattern.to_string(), group, kind));
        self
    }

    /// Add a multi-line block delimited by literal `start`/`end` tokens.
    pub fn block(mut self, start: &str, end: &str, kind: TokenKind) -> Self {
        self.blocks.push(BlockRule {
            start: start.to_string(),
            end: end.to_string(),
            kind,
        });
        self
    }

    /// Compile all patterns. Fails on the first malformed pattern.
    pub fn build(self) -> Result<RuleSet, PatternCompileError> {
        let compile = |pattern: &str| -> Result<Regex, PatternCompileError> {
            Regex::new(pattern).map_err(|source| PatternCompileError {
                language: self.name.clone(),
                pattern: pattern.to_string(),
                source,
            })
        };

        let mut capture_rules = Vec::with_capacity(self.captures.len());
        for (pattern, group, kind) in &self.captures {
            capture_rules.push(CaptureRule {
                regex: compile(pattern)?,
                group: *group,
                kind: *kind,
            });
        }

        let mut scan_rules = Vec::with_capacity(self.scans.len());
        for (pattern, kind) in &self.scans {
            scan_rules.push(ScanRule {
                regex: compile(pattern)?,
                kind: *kind,
            });
        }

        Ok(RuleSet {
            name: self.name,
            capture_rules,
            scan_rules,
            blocks: self.blocks,
        })
    }
}

/// Compile the built-in rule table for `language`.
///
/// Pattern tables follow the shipped language definitions; [`Language::PlainText`]
/// compiles to an empty set.
pub fn builtin_rules(language: Language) -> Result<RuleSet, PatternCompileError> {
    match language {
        Language::Python => RuleSet::builder("python")
            .block("\"\"\"", "\"\"\"", TokenKind::String)
            .block("'''", "'''", TokenKind::String)
            .capture(r"\bdef\s+(\w+)", 1, TokenKind::Function)
            .capture(r"\bclass\s+(\w+)", 1, TokenKind::Class)
            .rule(r"#.*$", TokenKind::Comment)
            .rule(r#""(?:[^"\\]|\\.)*""#, TokenKind::String)
            .rule(r"'(?:[^'\\]|\\.)*'", TokenKind::String)
            .rule(
                r"\b(def|class|if|elif|else|for|while|try|except|finally|with|as|import|from|return|yield|break|continue|pass|raise|assert|lambda|and|or|not|in|is|True|False|None|async|await)\b",
                TokenKind::Keyword,
            )
            .rule(
                r"\b(print|len|range|str|int|float|list|dict|set|tuple|open|input|isinstance|type|enumerate|zip|map|filter|sum|min|max|sorted|abs|all|any|bool|bytes|chr|ord|dir|eval|exec|format|hash|help|hex|id|iter|next|object|oct|pow|repr|reversed|round|slice|super|vars)\b",
                TokenKind::Builtin,
            )
            .rule(r"\b\d+\.?\d*\b", TokenKind::Number)
            .build(),
        Language::JavaScript => RuleSet::builder("javascript")
            .block("/*", "*/", TokenKind::Comment)
            .block("`", "`", TokenKind::String)
            .rule(r"//.*$", TokenKind::Comment)
            .rule(r#""(?:[^"\\]|\\.)*""#, TokenKind::String)
            .rule(r"'(?:[^'\\]|\\.)*'", TokenKind::String)
            .rule(
                r"\b(function|const|let|var|if|else|for|while|do|switch|case|break|continue|return|try|catch|finally|throw|new|this|class|extends|import|export|from|default|async|await|yield|typeof|instanceof|delete|void|in|of)\b",
                TokenKind::Keyword,
            )
            .rule(r"\b\d+\.?\d*\b", TokenKind::Number)
            .build(),
        Language::CLike => RuleSet::builder("c-like")
            .block("/*", "*/", TokenKind::Comment)
            .rule(r"//.*$", TokenKind::Comment)
            .rule(r#""(?:[^"\\]|\\.)*""#, TokenKind::String)
            .rule(
                r"\b(if|else|for|while|do|switch|case|break|continue|return|class|struct|enum|public|private|protected|static|void|int|float|double|char|bool|long|short|unsigned|signed|const|new|delete|try|catch|throw|virtual|override|namespace|using|include)\b",
                TokenKind::Keyword,
            )
            .rule(r"\b\d+\.?\d*\b", TokenKind::Number)
            .build(),
        Language::Html => RuleSet::builder("html")
            .block("<!--", "-->", TokenKind::Comment)
            .rule(r"</?[\w\-]+[^>]*>", TokenKind::Tag)
            .rule(r#""[^"]*""#, TokenKind::String)
            .rule(r"'[^']*'", TokenKind::String)
            .build(),
        Language::PlainText => Ok(RuleSet::empty("plain-text")),
    }
}
