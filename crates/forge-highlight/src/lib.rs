#![warn(missing_docs)]
//! `forge-highlight` - incremental regex-based syntax highlighting for the forge
//! editing engine.
//!
//! # Overview
//!
//! The highlighter is lexical: ordered per-language pattern tables, not a parser.
//! Three pieces cooperate:
//!
//! - [`RuleSet`] / [`builtin_rules`] - compiled pattern tables per [`Language`],
//!   including multi-line block rules (block comments, triple-quoted strings)
//! - [`RuleRegistry`] - process-wide compile-once cache, shared read-only across
//!   documents; a malformed table degrades that language to no highlighting
//! - [`HighlightEngine`] - per-document incremental tokenizer driven by the
//!   [`DirtyRange`](forge_core::DirtyRange) events the kernel emits, carrying a
//!   per-line entry/exit [`LineState`] so a single edited line can be re-tokenized
//!   without rescanning the file, cascading forward only while the exit state keeps
//!   changing
//!
//! # Example
//!
//! ```rust
//! use forge_core::{Command, EditCommand, Editor};
//! use forge_highlight::{HighlightEngine, RuleRegistry};
//! use forge_lang::Language;
//!
//! let mut editor = Editor::new("x = 1\ny = 2", Language::Python);
//! let mut engine = HighlightEngine::new(RuleRegistry::global(), Language::Python);
//! engine.reset(editor.document().buffer(), editor.document().revision());
//!
//! editor.execute(Command::Edit(EditCommand::InsertText { text: "z".into() })).unwrap();
//!
//! let dirty = editor.last_dirty().unwrap();
//! let outcome = engine.apply_dirty(
//!     editor.document().buffer(),
//!     dirty,
//!     editor.document().revision(),
//! );
//! assert!(outcome.applied().is_some());
//! ```

mod engine;
mod registry;
mod rules;

pub use engine::{HighlightEngine, LineState};
pub use registry::RuleRegistry;
pub use rules::{
    BlockRule, HighlightSpan, PatternCompileError, RuleSet, RuleSetBuilder, TokenKind,
    builtin_rules,
};
