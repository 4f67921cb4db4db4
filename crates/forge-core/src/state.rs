//! Editor state interface.
//!
//! Structured, immutable views of editor state for the view/chrome boundary, plus the
//! change-notification types emitted after every command:
//!
//! - **State queries**: document, cursor, and undo/redo snapshots
//! - **Revision tracking**: every document mutation bumps the revision counter
//! - **Change notifications**: subscribers receive a [`StateChange`] per effective command
//!
//! Derived consumers (highlighting, minimap) follow the [`DirtyRange`] attached to
//! document changes and use [`PassOutcome`] to drop work that a newer revision
//! superseded.

use crate::buffer::{DirtyRange, Position};
use crate::cursor::Selection;

/// State change type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Document content modified.
    DocumentModified,
    /// Caret moved without changing selection shape.
    CursorMoved,
    /// Selection set changed.
    SelectionChanged,
}

/// State change record delivered to subscribers.
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type.
    pub change_type: StateChangeType,
    /// Document revision before the command.
    pub old_revision: u64,
    /// Document revision after the command.
    pub new_revision: u64,
    /// Affected line interval, for document modifications.
    pub dirty: Option<DirtyRange>,
}

/// State change callback function type.
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Document state snapshot.
#[derive(Debug, Clone)]
pub struct DocumentState {
    /// Total line count.
    pub line_count: usize,
    /// Total character count.
    pub char_count: usize,
    /// Whether the document differs from its last clean (saved) point.
    pub is_modified: bool,
    /// Current revision.
    pub revision: u64,
}

/// Cursor state snapshot.
#[derive(Debug, Clone)]
pub struct CursorState {
    /// Primary caret position (the primary selection's active end).
    pub position: Position,
    /// All selections in document order, primary included.
    pub selections: Vec<Selection>,
    /// Index of the primary selection in `selections`.
    pub primary_index: usize,
}

/// Undo/redo stack state, for menu enablement.
#[derive(Debug, Clone, Copy)]
pub struct UndoRedoState {
    /// Whether an undo step is available.
    pub can_undo: bool,
    /// Whether a redo step is available.
    pub can_redo: bool,
    /// Undo stack depth in units.
    pub undo_depth: usize,
    /// Redo stack depth in units.
    pub redo_depth: usize,
}

/// Outcome of applying a revision-keyed derived-state pass (highlight, minimap).
///
/// A pass computed against a stale revision is dropped wholesale, never partially
/// applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome<T> {
    /// The pass matched the current revision and was applied.
    Applied(T),
    /// A newer revision superseded the pass; its result was discarded.
    Superseded,
}

impl<T> PassOutcome<T> {
    /// The applied value, if the pass was not superseded.
    pub fn applied(self) -> Option<T> {
        match self {
            PassOutcome::Applied(value) => Some(value),
            PassOutcome::Superseded => None,
        }
    }
}
