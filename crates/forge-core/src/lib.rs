#![warn(missing_docs)]
//! Forge Core - Headless Text-Editing Kernel
//!
//! # Overview
//!
//! `forge-core` is the editing engine of a desktop source-code editor: the in-memory
//! document, the cursor/selection model (including true multi-cursor), smart editing
//! (auto-indent, bracket handling, comment toggling, line operations), and undo/redo.
//! It is headless: window chrome, rendering, file I/O and settings persistence live in
//! the host, talking to the kernel over commands, state snapshots and change events.
//!
//! # Core Features
//!
//! - **Rope-backed buffer**: O(log n) line access, edits proportional to the affected
//!   region, character-offset coordinates throughout
//! - **Multi-cursor editing**: per-cursor edits applied bottom-most-first with
//!   position remapping, overlapping selections merged after every batch
//! - **Smart edits**: auto-indent, auto-close/skip/wrap for brackets and quotes,
//!   smart backspace, comment toggle, duplicate/move lines, bracket matching
//! - **Undo/redo**: grouped units with typing coalescence, cursor snapshots, and
//!   revision-guarded divergence detection
//! - **Change notifications**: every mutation bumps the document revision and reports
//!   the dirty line range that highlighting and the minimap consume
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor (commands, undo, notifications)     │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Smart-Edit Planner (per-cursor edit plans) │  ← Input interpretation
//! ├─────────────────────────────────────────────┤
//! │  Document (revision, cursors, line ending)  │  ← Buffer owner
//! ├─────────────────────────────────────────────┤
//! │  CursorSet (merge pass, caret motion)       │  ← Selection model
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (rope storage, dirty ranges)    │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use forge_core::{Command, EditCommand, Editor};
//! use forge_lang::Language;
//!
//! let mut editor = Editor::empty(Language::Python);
//!
//! for ch in "def f():".chars() {
//!     editor.execute(Command::Edit(EditCommand::TypeChar { ch })).unwrap();
//! }
//! editor.execute(Command::Edit(EditCommand::InsertNewline)).unwrap();
//!
//! // `(` auto-closed, the typed `)` skipped over the auto-inserted one, and the
//! // newline picked up one indent level after the trailing `:`.
//! assert_eq!(editor.document().text(), "def f():\n    ");
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - rope-backed text storage and position/offset conversion
//! - [`cursor`] - selections, cursor sets, caret motion
//! - [`document`] - per-tab document state (revision, language, line ending)
//! - [`commands`] - the unified command interface and [`Editor`]
//! - [`history`] - undo/redo stacks and grouping
//! - [`search`] - find/replace queries in character offsets
//! - [`settings`] - read-only host configuration
//! - [`state`] - state snapshots and change notifications
//! - [`width`] - visual width measurement (tabs, wide characters)

pub mod buffer;
pub mod commands;
pub mod cursor;
pub mod document;
pub mod history;
pub mod line_ending;
pub mod search;
pub mod settings;
mod smart;
pub mod state;
pub mod width;

pub use buffer::{DirtyRange, EditError, Position, TextBuffer, TextRange};
pub use commands::{Command, CommandError, CommandResult, CursorCommand, EditCommand, Editor};
pub use cursor::{CaretMotion, CursorSet, Selection, SelectionDirection};
pub use document::Document;
pub use history::{EditOperation, UndoHistory, UndoUnit};
pub use line_ending::LineEnding;
pub use search::{SearchError, SearchMatch, SearchOptions, SearchQuery};
pub use settings::EditorSettings;
pub use smart::matching_bracket;
pub use state::{
    CursorState, DocumentState, PassOutcome, StateChange, StateChangeCallback, StateChangeType,
    UndoRedoState,
};
