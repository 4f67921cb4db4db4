use forge_core::{Command, CursorCommand, EditCommand, Editor, Position, Selection};
use forge_lang::Language;

#[test]
fn test_duplicate_line_moves_caret_into_duplicate() {
    let mut editor = Editor::new("a\nb\nc", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 0 }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::DuplicateLines))
        .unwrap();

    assert_eq!(editor.document().text(), "a\nb\nb\nc");
    assert_eq!(
        editor.document().cursors().primary().active,
        Position::new(2, 0)
    );
    assert_eq!(editor.document().cursors().len(), 1);
}

#[test]
fn test_duplicate_selection_duplicates_line_range() {
    let mut editor = Editor::new("a\nb\nc\nd", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::SetSelection {
            anchor: Position::new(1, 0),
            active: Position::new(2, 1),
        }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::DuplicateLines))
        .unwrap();

    assert_eq!(editor.document().text(), "a\nb\nc\nb\nc\nd");
}

#[test]
fn test_duplicate_lines_multi_cursor_disjoint_blocks() {
    let mut editor = Editor::new("a\nb\nc", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::SetSelections {
            selections: vec![
                Selection::caret(Position::new(0, 0)),
                Selection::caret(Position::new(2, 0)),
            ],
            primary_index: 0,
        }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::DuplicateLines))
        .unwrap();

    assert_eq!(editor.document().text(), "a\na\nb\nc\nc");

    // Primary lands in the duplicate of line 0; the secondary in the duplicate of
    // the old line 2, now the last line.
    assert_eq!(
        editor.document().cursors().primary().active,
        Position::new(1, 0)
    );
    let actives: Vec<Position> = editor
        .document()
        .cursors()
        .selections()
        .iter()
        .map(|sel| sel.active)
        .collect();
    assert_eq!(actives, vec![Position::new(1, 0), Position::new(4, 0)]);
}

#[test]
fn test_move_line_up_and_back_down() {
    let mut editor = Editor::new("a\nb\nc", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 0 }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::MoveLinesUp))
        .unwrap();
    assert_eq!(editor.document().text(), "b\na\nc");
    assert_eq!(
        editor.document().cursors().primary().active,
        Position::new(0, 0)
    );

    editor
        .execute(Command::Edit(EditCommand::MoveLinesDown))
        .unwrap();
    assert_eq!(editor.document().text(), "a\nb\nc");
    assert_eq!(
        editor.document().cursors().primary().active,
        Position::new(1, 0)
    );
}

#[test]
fn test_move_line_up_at_top_is_noop() {
    let mut editor = Editor::new("a\nb", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 0, column: 1 }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::MoveLinesUp))
        .unwrap();

    assert_eq!(editor.document().text(), "a\nb");
    assert!(!editor.can_undo());
}

#[test]
fn test_move_line_down_at_bottom_is_noop() {
    let mut editor = Editor::new("a\nb", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 0 }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::MoveLinesDown))
        .unwrap();

    assert_eq!(editor.document().text(), "a\nb");
}

#[test]
fn test_move_selected_range_keeps_selection() {
    let mut editor = Editor::new("a\nb\nc\nd", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::SetSelection {
            anchor: Position::new(1, 0),
            active: Position::new(2, 1),
        }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::MoveLinesDown))
        .unwrap();

    assert_eq!(editor.document().text(), "a\nd\nb\nc");
    let primary = editor.document().cursors().primary();
    assert_eq!(primary.anchor, Position::new(2, 0));
    assert_eq!(primary.active, Position::new(3, 1));
}

#[test]
fn test_move_lines_round_trips_through_undo() {
    let mut editor = Editor::new("a\nb\nc", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 2, column: 0 }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::MoveLinesUp))
        .unwrap();
    assert_eq!(editor.document().text(), "a\nc\nb");

    editor.execute(Command::Edit(EditCommand::Undo)).unwrap();
    assert_eq!(editor.document().text(), "a\nb\nc");
    assert_eq!(
        editor.document().cursors().primary().active,
        Position::new(2, 0)
    );
}

#[test]
fn test_duplicate_respects_line_content_with_unicode() {
    let mut editor = Editor::new("héllo", Language::PlainText);
    editor
        .execute(Command::Edit(EditCommand::DuplicateLines))
        .unwrap();
    assert_eq!(editor.document().text(), "héllo\nhéllo");
}
