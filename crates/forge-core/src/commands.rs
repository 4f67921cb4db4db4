//! Command Interface Layer
//!
//! The primary entry point of the editing kernel. A user input event becomes a
//! [`Command`]; the [`Editor`] interprets it through the smart-edit planner, applies
//! the resulting edits to the [`Document`] at every cursor, records an undo unit, and
//! notifies subscribers with the dirty range the mutation produced. No edit path
//! bypasses this flow.
//!
//! # Multi-cursor application order
//!
//! Planned edits are computed against the pre-edit document and applied
//! **bottom-most-first** (descending start offset), so an edit never shifts the
//! offsets of edits still waiting to be applied. Final cursor positions are then
//! resolved with an ascending pass that accumulates each edit's length delta.
//!
//! # Example
//!
//! ```rust
//! use forge_core::{Command, CursorCommand, EditCommand, Editor, Position};
//! use forge_lang::Language;
//!
//! let mut editor = Editor::new("fn main() {}", Language::CLike);
//!
//! editor.execute(Command::Cursor(CursorCommand::MoveTo { line: 0, column: 0 })).unwrap();
//! editor.execute(Command::Edit(EditCommand::InsertText { text: "pub ".into() })).unwrap();
//!
//! assert_eq!(editor.document().text(), "pub fn main() {}");
//! assert_eq!(editor.document().cursors().primary().active, Position::new(0, 4));
//! ```

use crate::buffer::{DirtyRange, EditError, Position, TextRange};
use crate::cursor::{CaretMotion, CursorSet, Selection};
use crate::document::Document;
use crate::history::{EditOperation, UndoHistory, UndoUnit};
use crate::search::{SearchError, SearchOptions, SearchQuery};
use crate::settings::EditorSettings;
use crate::smart::{self, CaretSpec, EditPlan, PlannedEdit};
use crate::state::{
    CursorState, DocumentState, StateChange, StateChangeCallback, StateChangeType, UndoRedoState,
};
use forge_lang::Language;

/// Text editing commands.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Type one character at every cursor, with bracket/quote smarts
    /// (auto-close, skip-over, wrap-selection) when enabled in the settings.
    TypeChar {
        /// The typed character.
        ch: char,
    },
    /// Insert text verbatim at every cursor (paste, IME commit), replacing selections.
    InsertText {
        /// Text to insert.
        text: String,
    },
    /// Press Enter: newline plus auto-indentation at every cursor.
    InsertNewline,
    /// Backspace: delete selections, collapse adjacent bracket pairs, else one grapheme.
    Backspace,
    /// Forward delete.
    DeleteForward,
    /// Insert text at an explicit position (host-driven, e.g. completion apply).
    Insert {
        /// Insertion position; must satisfy the position invariant.
        position: Position,
        /// Text to insert.
        text: String,
    },
    /// Delete an explicit range (host-driven).
    DeleteRange {
        /// Range to remove; end must not precede start.
        range: TextRange,
    },
    /// Toggle line comments over every line touched by any cursor.
    ToggleComment,
    /// Duplicate each cursor's line range immediately below.
    DuplicateLines,
    /// Move each cursor's line range one line up. No-op at the first line.
    MoveLinesUp,
    /// Move each cursor's line range one line down. No-op at the last line.
    MoveLinesDown,
    /// Replace every occurrence of `query`, as a single undoable step.
    ReplaceAll {
        /// Search query.
        query: String,
        /// Replacement text.
        replacement: String,
        /// Search options (case sensitivity, whole-word, regex).
        options: SearchOptions,
    },
    /// Undo the most recent undo group. No-op on an empty stack.
    Undo,
    /// Redo the most recently undone group. No-op on an empty stack.
    Redo,
    /// Explicitly end the current typing coalescing group (idle boundary).
    EndUndoGroup,
}

/// Cursor and selection commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorCommand {
    /// Move the primary caret to an absolute position, collapsing multi-cursor.
    MoveTo {
        /// Target line; must be within the document.
        line: usize,
        /// Target column; clamped to the line length.
        column: usize,
    },
    /// Move every caret one step, optionally extending selections.
    Move {
        /// Movement direction.
        motion: CaretMotion,
        /// Whether anchors stay put.
        extend: bool,
    },
    /// Set the primary selection, collapsing multi-cursor.
    SetSelection {
        /// Fixed end.
        anchor: Position,
        /// Moving end.
        active: Position,
    },
    /// Replace the whole cursor set.
    SetSelections {
        /// All selections, primary included.
        selections: Vec<Selection>,
        /// Index of the primary selection in `selections`.
        primary_index: usize,
    },
    /// Add a caret on the line above the primary, copying its column.
    AddCursorAbove,
    /// Add a caret on the line below the primary, copying its column.
    AddCursorBelow,
    /// Drop all secondary cursors, keeping the primary.
    ClearSecondaryCursors,
    /// Collapse every selection to a caret at its active end.
    ClearSelection,
}

/// Unified command enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Text editing commands.
    Edit(EditCommand),
    /// Cursor and selection commands.
    Cursor(CursorCommand),
}

/// Command execution result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value.
    Success,
    /// Success, returns text (e.g. removed text).
    Text(String),
    /// Replace result: how many occurrences were replaced.
    ReplaceResult {
        /// Number of occurrences replaced.
        replaced: usize,
    },
}

/// Command error type.
#[derive(Debug)]
pub enum CommandError {
    /// A position or range violated the document bounds.
    Edit(EditError),
    /// A find/replace pattern failed to compile.
    Search(SearchError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Edit(err) => write!(f, "{}", err),
            CommandError::Search(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Edit(err) => Some(err),
            CommandError::Search(err) => Some(err),
        }
    }
}

impl From<EditError> for CommandError {
    fn from(err: EditError) -> Self {
        CommandError::Edit(err)
    }
}

impl From<SearchError> for CommandError {
    fn from(err: SearchError) -> Self {
        CommandError::Search(err)
    }
}

/// The editing engine for one document.
///
/// `Editor` owns the [`Document`], its [`UndoHistory`], and the subscriber list, and is
/// responsible for:
///
/// - executing [`Command`]s and keeping buffer, cursors, and history consistent
/// - grouping rapid typing into single undo steps
/// - emitting a [`StateChange`] (with the dirty line range) after every effective command
///
/// # Example
///
/// ```rust
/// use forge_core::{Command, EditCommand, Editor};
/// use forge_lang::Language;
///
/// let mut editor = Editor::empty(Language::Python);
/// editor.execute(Command::Edit(EditCommand::TypeChar { ch: '(' })).unwrap();
///
/// // Auto-close: the pair is inserted with the caret between.
/// assert_eq!(editor.document().text(), "()");
/// assert!(editor.can_undo());
/// ```
pub struct Editor {
    document: Document,
    history: UndoHistory,
    settings: EditorSettings,
    callbacks: Vec<StateChangeCallback>,
    /// Dirty range produced by the last executed command (cleared on each `execute`).
    last_dirty: Option<DirtyRange>,
}

impl Editor {
    /// Create an editor over loaded text.
    pub fn new(text: &str, language: Language) -> Self {
        let document = Document::new(text, language);
        let history = UndoHistory::new(1000, document.revision());
        Self {
            document,
            history,
            settings: EditorSettings::default(),
            callbacks: Vec::new(),
            last_dirty: None,
        }
    }

    /// Create an editor over an empty document.
    pub fn empty(language: Language) -> Self {
        Self::new("", language)
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable document access for hosts that need it.
    ///
    /// Mutating the buffer through this reference bypasses undo recording; the
    /// history's revision sync detects the divergence and discards stale undo units
    /// instead of corrupting the document.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Current smart-edit settings.
    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Replace the smart-edit settings (read from the host's configuration).
    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.settings = settings;
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Dirty range produced by the last executed command, if it modified the document.
    pub fn last_dirty(&self) -> Option<DirtyRange> {
        self.last_dirty
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether the document differs from its last saved state.
    pub fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    /// Mark the current state as saved (call after a successful save).
    pub fn mark_saved(&mut self) {
        self.history.mark_clean();
    }

    /// Document state snapshot.
    pub fn document_state(&self) -> DocumentState {
        DocumentState {
            line_count: self.document.line_count(),
            char_count: self.document.char_count(),
            is_modified: self.is_modified(),
            revision: self.document.revision(),
        }
    }

    /// Cursor state snapshot.
    pub fn cursor_state(&self) -> CursorState {
        let cursors = self.document.cursors();
        CursorState {
            position: cursors.primary().active,
            selections: cursors.selections().to_vec(),
            primary_index: cursors.primary_index(),
        }
    }

    /// Undo/redo state for menu enablement.
    pub fn undo_redo_state(&self) -> UndoRedoState {
        UndoRedoState {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
        }
    }

    /// Execute a command.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        self.last_dirty = None;
        match command {
            Command::Edit(cmd) => self.execute_edit(cmd),
            Command::Cursor(cmd) => self.execute_cursor(cmd),
        }
    }

    fn emit(&mut self, change: StateChange) {
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }

    fn execute_edit(&mut self, command: EditCommand) -> Result<CommandResult, CommandError> {
        match command {
            EditCommand::Undo => self.execute_undo(),
            EditCommand::Redo => self.execute_redo(),
            EditCommand::EndUndoGroup => {
                self.history.end_group();
                Ok(CommandResult::Success)
            }
            EditCommand::TypeChar { ch } => {
                if ch == '\n' {
                    let plan = smart::plan_newline(&self.document, &self.settings);
                    return self.apply_plan(plan);
                }
                let plan = smart::plan_type_char(&self.document, &self.settings, ch);
                self.apply_plan(plan)
            }
            EditCommand::InsertText { text } => {
                if text.is_empty() {
                    return Ok(CommandResult::Success);
                }
                let plan = smart::plan_insert_text(&self.document, &text);
                self.apply_plan(plan)
            }
            EditCommand::InsertNewline => {
                let plan = smart::plan_newline(&self.document, &self.settings);
                self.apply_plan(plan)
            }
            EditCommand::Backspace => {
                let plan = smart::plan_backspace(&self.document);
                self.apply_plan(plan)
            }
            EditCommand::DeleteForward => {
                let plan = smart::plan_delete_forward(&self.document);
                self.apply_plan(plan)
            }
            EditCommand::Insert { position, text } => self.execute_insert_at(position, text),
            EditCommand::DeleteRange { range } => self.execute_delete_range(range),
            EditCommand::ToggleComment => {
                match smart::plan_toggle_comment(&self.document) {
                    Some(plan) => self.apply_plan(plan),
                    None => Ok(CommandResult::Success),
                }
            }
            EditCommand::DuplicateLines => {
                let plan = smart::plan_duplicate_lines(&self.document);
                self.apply_plan(plan)
            }
            EditCommand::MoveLinesUp => match smart::plan_move_lines(&self.document, true) {
                Some(plan) => self.apply_plan(plan),
                None => Ok(CommandResult::Success),
            },
            EditCommand::MoveLinesDown => match smart::plan_move_lines(&self.document, false) {
                Some(plan) => self.apply_plan(plan),
                None => Ok(CommandResult::Success),
            },
            EditCommand::ReplaceAll {
                query,
                replacement,
                options,
            } => self.execute_replace_all(query, replacement, options),
        }
    }

    fn execute_insert_at(
        &mut self,
        position: Position,
        text: String,
    ) -> Result<CommandResult, CommandError> {
        self.history.end_group();
        if text.is_empty() {
            return Ok(CommandResult::Success);
        }

        let start = self.document.buffer().offset_of(position)?;
        let plan = EditPlan {
            edits: vec![PlannedEdit {
                start,
                delete_len: 0,
                insert_text: text,
            }],
            carets: self.remap_carets(),
            primary_index: self.document.cursors().primary_index(),
            coalescible: false,
        };
        self.apply_plan(plan)
    }

    fn execute_delete_range(&mut self, range: TextRange) -> Result<CommandResult, CommandError> {
        self.history.end_group();
        if range.end < range.start {
            return Err(EditError::InvalidRange {
                start: range.start,
                end: range.end,
            }
            .into());
        }

        let start = self.document.buffer().offset_of(range.start)?;
        let end = self.document.buffer().offset_of(range.end)?;
        if start == end {
            return Ok(CommandResult::Success);
        }

        let removed = self.document.buffer().slice(start, end);
        let plan = EditPlan {
            edits: vec![PlannedEdit {
                start,
                delete_len: end - start,
                insert_text: String::new(),
            }],
            carets: self.remap_carets(),
            primary_index: self.document.cursors().primary_index(),
            coalescible: false,
        };
        self.apply_plan(plan)?;
        Ok(CommandResult::Text(removed))
    }

    fn execute_replace_all(
        &mut self,
        query: String,
        replacement: String,
        options: SearchOptions,
    ) -> Result<CommandResult, CommandError> {
        self.history.end_group();

        let search = SearchQuery::compile(&query, options)?;
        let text = self.document.text();
        let matches = search.find_all(&text);
        if matches.is_empty() {
            return Ok(CommandResult::ReplaceResult { replaced: 0 });
        }

        let replaced = matches.len();
        let edits = matches
            .into_iter()
            .map(|m| PlannedEdit {
                start: m.start,
                delete_len: m.len(),
                insert_text: replacement.clone(),
            })
            .collect();

        let plan = EditPlan {
            edits,
            carets: self.remap_carets(),
            primary_index: self.document.cursors().primary_index(),
            coalescible: false,
        };
        self.apply_plan(plan)?;
        Ok(CommandResult::ReplaceResult { replaced })
    }

    /// Caret specs that keep every current selection, remapped through the plan.
    fn remap_carets(&self) -> Vec<CaretSpec> {
        let buffer = self.document.buffer();
        self.document
            .cursors()
            .selections()
            .iter()
            .map(|sel| CaretSpec::Remap {
                anchor: buffer.offset_of_clamped(sel.anchor),
                active: buffer.offset_of_clamped(sel.active),
            })
            .collect()
    }

    /// Apply a planned multi-cursor edit: bottom-most-first application, ascending
    /// caret resolution, undo recording, merge pass, change notification.
    fn apply_plan(&mut self, plan: EditPlan) -> Result<CommandResult, CommandError> {
        let old_revision = self.document.revision();
        let before_cursors = self.document.cursors().clone();

        let mut asc: Vec<usize> = (0..plan.edits.len()).collect();
        asc.sort_by_key(|&i| plan.edits[i].start);

        // Ascending pass: where each edit's start lands in the post-edit document.
        let mut start_after = vec![0usize; plan.edits.len()];
        let mut delta = 0i64;
        for &i in &asc {
            let edit = &plan.edits[i];
            start_after[i] = (edit.start as i64 + delta) as usize;
            delta += edit.insert_len() as i64 - edit.delete_len as i64;
        }

        // Bottom-most-first application keeps pending offsets valid.
        let mut ops: Vec<EditOperation> = Vec::new();
        let mut dirty_union: Option<DirtyRange> = None;
        for &i in asc.iter().rev() {
            let edit = &plan.edits[i];
            if edit.is_noop() {
                continue;
            }

            let deleted = self
                .document
                .buffer()
                .slice(edit.start, edit.start + edit.delete_len);
            let dirty = self.document.splice(edit.start, edit.delete_len, &edit.insert_text);
            dirty_union = Some(match dirty_union {
                Some(union) => union.union(dirty),
                None => dirty,
            });

            ops.push(EditOperation {
                start: edit.start,
                start_after: start_after[i],
                deleted_text: deleted,
                inserted_text: edit.insert_text.clone(),
            });
        }

        // Resolve the new cursor set.
        let mut selections = Vec::with_capacity(plan.carets.len());
        for spec in &plan.carets {
            let buffer = self.document.buffer();
            let selection = match *spec {
                CaretSpec::InsertRel { op, rel } => {
                    Selection::caret(buffer.position_of(start_after[op] + rel))
                }
                CaretSpec::SelectionRel {
                    op,
                    anchor_rel,
                    active_rel,
                } => Selection::new(
                    buffer.position_of(start_after[op] + anchor_rel),
                    buffer.position_of(start_after[op] + active_rel),
                ),
                CaretSpec::Remap { anchor, active } => Selection::new(
                    buffer.position_of(remap_offset(anchor, &plan.edits, &start_after, &asc)),
                    buffer.position_of(remap_offset(active, &plan.edits, &start_after, &asc)),
                ),
            };
            selections.push(selection);
        }

        if !selections.is_empty() {
            let mut cursors = CursorSet::new();
            cursors.replace(selections, plan.primary_index.min(plan.carets.len() - 1));
            self.document.set_cursors(cursors);
        }

        if ops.is_empty() {
            // Pure caret movement (e.g. closer skip-over): no undo unit, no dirty range.
            self.history.end_group();
            if *self.document.cursors() != before_cursors {
                let revision = self.document.revision();
                self.emit(StateChange {
                    change_type: StateChangeType::SelectionChanged,
                    old_revision: revision,
                    new_revision: revision,
                    dirty: None,
                });
            }
            return Ok(CommandResult::Success);
        }

        let after_cursors = self.document.cursors().clone();
        let unit = UndoUnit {
            group_id: 0,
            edits: ops,
            before_cursors,
            after_cursors,
        };
        self.history
            .record(unit, plan.coalescible, self.document.revision());

        let dirty = dirty_union.expect("ops is non-empty");
        self.last_dirty = Some(dirty);
        self.emit(StateChange {
            change_type: StateChangeType::DocumentModified,
            old_revision,
            new_revision: self.document.revision(),
            dirty: Some(dirty),
        });

        Ok(CommandResult::Success)
    }

    fn execute_undo(&mut self) -> Result<CommandResult, CommandError> {
        if !self.history.can_undo() {
            return Ok(CommandResult::Success);
        }

        let old_revision = self.document.revision();
        let diverged = old_revision != self.history.synced_revision();
        let Some(units) = self.history.pop_undo_group() else {
            return Ok(CommandResult::Success);
        };

        if diverged {
            // The buffer no longer matches what these units were recorded against:
            // discard them instead of applying a stale inverse.
            self.history.sync_to(old_revision);
            return Ok(CommandResult::Success);
        }

        let mut dirty_union: Option<DirtyRange> = None;
        for unit in &units {
            let mut order: Vec<usize> = (0..unit.edits.len()).collect();
            order.sort_by_key(|&i| std::cmp::Reverse(unit.edits[i].start_after));

            for &i in &order {
                let op = &unit.edits[i];
                let dirty =
                    self.document
                        .splice(op.start_after, op.inserted_len(), &op.deleted_text);
                dirty_union = Some(match dirty_union {
                    Some(union) => union.union(dirty),
                    None => dirty,
                });
            }
            self.document.set_cursors(unit.before_cursors.clone());
        }

        self.history.stash_for_redo(units);
        self.history.sync_to(self.document.revision());

        if let Some(dirty) = dirty_union {
            self.last_dirty = Some(dirty);
            self.emit(StateChange {
                change_type: StateChangeType::DocumentModified,
                old_revision,
                new_revision: self.document.revision(),
                dirty: Some(dirty),
            });
        }

        Ok(CommandResult::Success)
    }

    fn execute_redo(&mut self) -> Result<CommandResult, CommandError> {
        if !self.history.can_redo() {
            return Ok(CommandResult::Success);
        }

        let old_revision = self.document.revision();
        let diverged = old_revision != self.history.synced_revision();
        let Some(units) = self.history.pop_redo_group() else {
            return Ok(CommandResult::Success);
        };

        if diverged {
            self.history.sync_to(old_revision);
            return Ok(CommandResult::Success);
        }

        let mut dirty_union: Option<DirtyRange> = None;
        for unit in &units {
            let mut order: Vec<usize> = (0..unit.edits.len()).collect();
            order.sort_by_key(|&i| std::cmp::Reverse(unit.edits[i].start));

            for &i in &order {
                let op = &unit.edits[i];
                let dirty = self
                    .document
                    .splice(op.start, op.deleted_len(), &op.inserted_text);
                dirty_union = Some(match dirty_union {
                    Some(union) => union.union(dirty),
                    None => dirty,
                });
            }
            self.document.set_cursors(unit.after_cursors.clone());
        }

        self.history.restore_to_undo(units);
        self.history.sync_to(self.document.revision());

        if let Some(dirty) = dirty_union {
            self.last_dirty = Some(dirty);
            self.emit(StateChange {
                change_type: StateChangeType::DocumentModified,
                old_revision,
                new_revision: self.document.revision(),
                dirty: Some(dirty),
            });
        }

        Ok(CommandResult::Success)
    }

    fn execute_cursor(&mut self, command: CursorCommand) -> Result<CommandResult, CommandError> {
        // Any cursor command ends the current typing coalescing group.
        self.history.end_group();

        let before = self.document.cursors().clone();
        let change_type = match &command {
            CursorCommand::MoveTo { .. } | CursorCommand::Move { extend: false, .. } => {
                StateChangeType::CursorMoved
            }
            _ => StateChangeType::SelectionChanged,
        };

        match command {
            CursorCommand::MoveTo { line, column } => {
                if line >= self.document.line_count() {
                    return Err(EditError::OutOfRange { line, column }.into());
                }
                let column = column.min(self.document.buffer().line_len(line).unwrap_or(0));
                self.document
                    .cursors_mut()
                    .collapse_to(Position::new(line, column));
            }
            CursorCommand::Move { motion, extend } => {
                self.document.move_cursors(motion, extend);
            }
            CursorCommand::SetSelection { anchor, active } => {
                let line_count = self.document.line_count();
                if anchor.line >= line_count || active.line >= line_count {
                    let bad = if anchor.line >= line_count { anchor } else { active };
                    return Err(EditError::OutOfRange {
                        line: bad.line,
                        column: bad.column,
                    }
                    .into());
                }
                let clamp = |pos: Position| {
                    Position::new(
                        pos.line,
                        pos.column
                            .min(self.document.buffer().line_len(pos.line).unwrap_or(0)),
                    )
                };
                let selection = Selection::new(clamp(anchor), clamp(active));
                self.document.cursors_mut().replace(vec![selection], 0);
            }
            CursorCommand::SetSelections {
                selections,
                primary_index,
            } => {
                let cursors =
                    CursorSet::from_selections(selections, primary_index, self.document.buffer())?;
                self.document.set_cursors(cursors);
            }
            CursorCommand::AddCursorAbove => {
                self.document.add_cursor(-1);
            }
            CursorCommand::AddCursorBelow => {
                self.document.add_cursor(1);
            }
            CursorCommand::ClearSecondaryCursors => {
                let primary = self.document.cursors().primary();
                self.document.cursors_mut().replace(vec![primary], 0);
            }
            CursorCommand::ClearSelection => {
                let carets: Vec<Selection> = self
                    .document
                    .cursors()
                    .selections()
                    .iter()
                    .map(|sel| Selection::caret(sel.active))
                    .collect();
                let primary_index = self.document.cursors().primary_index();
                self.document.cursors_mut().replace(carets, primary_index);
            }
        }

        if *self.document.cursors() != before {
            let revision = self.document.revision();
            self.emit(StateChange {
                change_type,
                old_revision: revision,
                new_revision: revision,
                dirty: None,
            });
        }

        Ok(CommandResult::Success)
    }
}

/// Remap a pre-edit offset through a plan's edits into post-edit coordinates.
///
/// Offsets inside a replaced region clamp to the corresponding position within the
/// inserted text.
fn remap_offset(
    offset: usize,
    edits: &[PlannedEdit],
    start_after: &[usize],
    asc: &[usize],
) -> usize {
    let mut delta = 0i64;
    for &i in asc {
        let edit = &edits[i];
        if edit.start + edit.delete_len <= offset {
            delta += edit.insert_len() as i64 - edit.delete_len as i64;
        } else if edit.start <= offset {
            return start_after[i] + edit.insert_len().min(offset - edit.start);
        } else {
            break;
        }
    }
    (offset as i64 + delta) as usize
}
