use forge_core::{
    CaretMotion, Command, CursorCommand, EditCommand, Editor, Position, Selection,
};
use forge_lang::Language;

fn ten_lines() -> String {
    (0..10)
        .map(|i| format!("line {} text", i))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_insert_applies_once_per_cursor_bottom_up() {
    let mut editor = Editor::new(&ten_lines(), Language::PlainText);

    editor
        .execute(Command::Cursor(CursorCommand::SetSelections {
            selections: vec![
                Selection::caret(Position::new(3, 5)),
                Selection::caret(Position::new(7, 5)),
            ],
            primary_index: 0,
        }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "X".to_string(),
        }))
        .unwrap();

    // Exactly one X at each original column, regardless of issue order.
    assert_eq!(editor.document().line(3).unwrap(), "line X3 text");
    assert_eq!(editor.document().line(7).unwrap(), "line X7 text");

    // Both cursors land immediately after their own insert.
    let actives: Vec<Position> = editor
        .document()
        .cursors()
        .selections()
        .iter()
        .map(|sel| sel.active)
        .collect();
    assert_eq!(actives, vec![Position::new(3, 6), Position::new(7, 6)]);
}

#[test]
fn test_same_line_cursors_do_not_shift_each_other() {
    let mut editor = Editor::new("abcdef", Language::PlainText);

    editor
        .execute(Command::Cursor(CursorCommand::SetSelections {
            selections: vec![
                Selection::caret(Position::new(0, 2)),
                Selection::caret(Position::new(0, 4)),
            ],
            primary_index: 0,
        }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "--".to_string(),
        }))
        .unwrap();

    assert_eq!(editor.document().text(), "ab--cd--ef");
    let actives: Vec<Position> = editor
        .document()
        .cursors()
        .selections()
        .iter()
        .map(|sel| sel.active)
        .collect();
    assert_eq!(actives, vec![Position::new(0, 4), Position::new(0, 8)]);
}

#[test]
fn test_add_cursor_above_and_below() {
    let mut editor = Editor::new("aaa\nbbb\nccc", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 2 }))
        .unwrap();

    editor
        .execute(Command::Cursor(CursorCommand::AddCursorAbove))
        .unwrap();
    editor
        .execute(Command::Cursor(CursorCommand::AddCursorBelow))
        .unwrap();

    let actives: Vec<Position> = editor
        .document()
        .cursors()
        .selections()
        .iter()
        .map(|sel| sel.active)
        .collect();
    assert_eq!(
        actives,
        vec![Position::new(0, 2), Position::new(1, 2), Position::new(2, 2)]
    );
    // Primary is still the original caret.
    assert_eq!(
        editor.document().cursors().primary().active,
        Position::new(1, 2)
    );
}

#[test]
fn test_add_cursor_beyond_bounds_is_noop() {
    let mut editor = Editor::new("only", Language::PlainText);

    editor
        .execute(Command::Cursor(CursorCommand::AddCursorAbove))
        .unwrap();
    editor
        .execute(Command::Cursor(CursorCommand::AddCursorBelow))
        .unwrap();

    assert_eq!(editor.document().cursors().len(), 1);
}

#[test]
fn test_add_cursor_skips_line_already_hosting_one() {
    let mut editor = Editor::new("a\nb\nc", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::SetSelections {
            selections: vec![
                Selection::caret(Position::new(0, 0)),
                Selection::caret(Position::new(1, 0)),
            ],
            primary_index: 1,
        }))
        .unwrap();

    editor
        .execute(Command::Cursor(CursorCommand::AddCursorAbove))
        .unwrap();

    assert_eq!(editor.document().cursors().len(), 2);
}

#[test]
fn test_no_selections_overlap_after_edit() {
    let mut editor = Editor::new("aa bb cc", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::SetSelections {
            selections: vec![
                Selection::new(Position::new(0, 0), Position::new(0, 4)),
                Selection::new(Position::new(0, 5), Position::new(0, 8)),
            ],
            primary_index: 0,
        }))
        .unwrap();

    // Replacing both selections collapses the carets next to each other; after the
    // merge pass the set must hold no overlapping ranges and stay within bounds.
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "!".to_string(),
        }))
        .unwrap();

    let cursors = editor.document().cursors();
    let selections = cursors.selections();
    for window in selections.windows(2) {
        assert!(window[0].max() <= window[1].min());
    }
    for sel in selections {
        assert!(editor.document().buffer().contains(sel.anchor));
        assert!(editor.document().buffer().contains(sel.active));
    }
}

#[test]
fn test_cursors_collapsing_to_same_spot_merge() {
    let mut editor = Editor::new("ab", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::SetSelections {
            selections: vec![
                Selection::caret(Position::new(0, 1)),
                Selection::caret(Position::new(0, 2)),
            ],
            primary_index: 0,
        }))
        .unwrap();

    // Both backspaces delete; the carets land on the same position and merge.
    editor
        .execute(Command::Edit(EditCommand::Backspace))
        .unwrap();

    assert_eq!(editor.document().text(), "");
    assert_eq!(editor.document().cursors().len(), 1);
}

#[test]
fn test_multi_cursor_backspace_is_independent() {
    let mut editor = Editor::new("abc\ndef", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::SetSelections {
            selections: vec![
                Selection::caret(Position::new(0, 2)),
                Selection::caret(Position::new(1, 2)),
            ],
            primary_index: 0,
        }))
        .unwrap();

    editor
        .execute(Command::Edit(EditCommand::Backspace))
        .unwrap();

    assert_eq!(editor.document().text(), "ac\ndf");
}

#[test]
fn test_move_collapses_and_merges_cursors() {
    let mut editor = Editor::new("ab", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::SetSelections {
            selections: vec![
                Selection::caret(Position::new(0, 0)),
                Selection::caret(Position::new(0, 1)),
            ],
            primary_index: 0,
        }))
        .unwrap();

    // Moving both carets to line start merges them into one.
    editor
        .execute(Command::Cursor(CursorCommand::Move {
            motion: CaretMotion::LineStart,
            extend: false,
        }))
        .unwrap();

    assert_eq!(editor.document().cursors().len(), 1);
    assert_eq!(
        editor.document().cursors().primary().active,
        Position::new(0, 0)
    );
}

#[test]
fn test_clear_secondary_cursors() {
    let mut editor = Editor::new("a\nb\nc", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::SetSelections {
            selections: vec![
                Selection::caret(Position::new(0, 0)),
                Selection::caret(Position::new(1, 0)),
                Selection::caret(Position::new(2, 0)),
            ],
            primary_index: 1,
        }))
        .unwrap();

    editor
        .execute(Command::Cursor(CursorCommand::ClearSecondaryCursors))
        .unwrap();

    assert_eq!(editor.document().cursors().len(), 1);
    assert_eq!(
        editor.document().cursors().primary().active,
        Position::new(1, 0)
    );
}

#[test]
fn test_move_to_collapses_multi_cursor() {
    let mut editor = Editor::new("a\nb", Language::PlainText);
    editor
        .execute(Command::Cursor(CursorCommand::SetSelections {
            selections: vec![
                Selection::caret(Position::new(0, 0)),
                Selection::caret(Position::new(1, 0)),
            ],
            primary_index: 0,
        }))
        .unwrap();

    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 1 }))
        .unwrap();

    assert_eq!(editor.document().cursors().len(), 1);
}
