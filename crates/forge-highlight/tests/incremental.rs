use forge_core::{Command, CursorCommand, DirtyRange, EditCommand, Editor, PassOutcome, Position};
use forge_highlight::{HighlightEngine, RuleRegistry, TokenKind};
use forge_lang::Language;

fn engine_for(editor: &Editor) -> HighlightEngine {
    let mut engine = HighlightEngine::new(RuleRegistry::global(), editor.document().language());
    engine.reset(editor.document().buffer(), editor.document().revision());
    engine
}

fn sync(engine: &mut HighlightEngine, editor: &Editor) -> std::ops::Range<usize> {
    let dirty = editor.last_dirty().expect("command modified the document");
    match engine.apply_dirty(
        editor.document().buffer(),
        dirty,
        editor.document().revision(),
    ) {
        PassOutcome::Applied(range) => range,
        PassOutcome::Superseded => panic!("pass unexpectedly superseded"),
    }
}

#[test]
fn test_full_highlight_on_load() {
    let editor = Editor::new("import os\n\ndef main():\n    return 1", Language::Python);
    let engine = engine_for(&editor);

    assert_eq!(engine.spans_for_line(0)[0].kind, TokenKind::Keyword); // import
    assert!(engine.spans_for_line(1).is_empty());
    assert!(
        engine
            .spans_for_line(2)
            .iter()
            .any(|s| s.kind == TokenKind::Function)
    );
    assert!(
        engine
            .spans_for_line(3)
            .iter()
            .any(|s| s.kind == TokenKind::Number)
    );
}

#[test]
fn test_rehighlight_unchanged_line_is_idempotent() {
    let editor = Editor::new("x = 'text' # note", Language::Python);
    let mut engine = engine_for(&editor);
    let before = engine.spans_for_line(0);

    let outcome = engine.apply_dirty(
        editor.document().buffer(),
        DirtyRange::new(0, 1, 1),
        editor.document().revision(),
    );

    assert!(matches!(outcome, PassOutcome::Applied(_)));
    assert_eq!(engine.spans_for_line(0), before);
}

#[test]
fn test_edit_rehighlights_only_dirty_lines() {
    let mut editor = Editor::new("a = 1\nb = 2\nc = 3", Language::CLike);
    let mut engine = engine_for(&editor);

    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 5 }))
        .unwrap();
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "9".to_string(),
        }))
        .unwrap();

    let range = sync(&mut engine, &editor);
    assert_eq!(range, 1..2);

    let spans = engine.spans_for_line(1);
    let number = spans.iter().find(|s| s.kind == TokenKind::Number).unwrap();
    assert_eq!(number.start_column, 4);
    assert_eq!(number.end_column, 6);
}

#[test]
fn test_opening_block_comment_cascades_downward() {
    let mut editor = Editor::new("int a;\nint b;\nint c;", Language::CLike);
    let mut engine = engine_for(&editor);

    // Open an unterminated block comment on line 0.
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 0, column: 6 }))
        .unwrap();
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: " /* open".to_string(),
        }))
        .unwrap();

    // The single-line edit cascades to the end of the document.
    let range = sync(&mut engine, &editor);
    assert_eq!(range, 0..3);

    for line in 1..3 {
        let spans = engine.spans_for_line(line);
        assert_eq!(spans.len(), 1, "line {} should be one comment span", line);
        assert_eq!(spans[0].kind, TokenKind::Comment);
    }
}

#[test]
fn test_closing_block_comment_cascades_until_stable() {
    let mut editor = Editor::new("/* open\nint a;\nint b;", Language::CLike);
    let mut engine = engine_for(&editor);
    assert_eq!(engine.spans_for_line(2)[0].kind, TokenKind::Comment);

    // Terminate the comment at the end of line 0.
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 0, column: 7 }))
        .unwrap();
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: " */".to_string(),
        }))
        .unwrap();

    let range = sync(&mut engine, &editor);
    assert_eq!(range, 0..3);

    assert!(
        engine
            .spans_for_line(1)
            .iter()
            .any(|s| s.kind == TokenKind::Keyword)
    );
}

#[test]
fn test_cascade_stops_when_exit_state_stabilizes() {
    let mut editor = Editor::new("x = 1\ny = 2\nz = 3\nw = 4", Language::Python);
    let mut engine = engine_for(&editor);

    // Editing line 0 without changing lexical state touches only line 0.
    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 0, column: 5 }))
        .unwrap();
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "0".to_string(),
        }))
        .unwrap();

    let range = sync(&mut engine, &editor);
    assert_eq!(range, 0..1);
}

#[test]
fn test_newline_insertion_shifts_cache() {
    let mut editor = Editor::new("# one\nx = 'two'", Language::Python);
    let mut engine = engine_for(&editor);

    editor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 0, column: 0 }))
        .unwrap();
    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "y = 3\n".to_string(),
        }))
        .unwrap();

    sync(&mut engine, &editor);

    assert!(
        engine
            .spans_for_line(0)
            .iter()
            .any(|s| s.kind == TokenKind::Number)
    );
    assert_eq!(engine.spans_for_line(1)[0].kind, TokenKind::Comment);
    assert!(
        engine
            .spans_for_line(2)
            .iter()
            .any(|s| s.kind == TokenKind::String)
    );
}

#[test]
fn test_superseded_pass_is_dropped() {
    let mut editor = Editor::new("a", Language::Python);
    let mut engine = engine_for(&editor);

    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "b".to_string(),
        }))
        .unwrap();
    let stale_dirty = editor.last_dirty().unwrap();
    let stale_revision = editor.document().revision();

    editor
        .execute(Command::Edit(EditCommand::InsertText {
            text: "c".to_string(),
        }))
        .unwrap();

    // Apply the newer pass first; the older one must then be dropped.
    let fresh = engine.apply_dirty(
        editor.document().buffer(),
        editor.last_dirty().unwrap(),
        editor.document().revision(),
    );
    assert!(matches!(fresh, PassOutcome::Applied(_)));

    let stale = engine.apply_dirty(editor.document().buffer(), stale_dirty, stale_revision);
    assert_eq!(stale, PassOutcome::Superseded);
}

#[test]
fn test_python_triple_quote_spans_lines() {
    let editor = Editor::new("s = \"\"\"start\nmiddle\nend\"\"\"\nx = 1", Language::Python);
    let engine = engine_for(&editor);

    assert_eq!(engine.spans_for_line(1)[0].kind, TokenKind::String);
    assert_eq!(engine.spans_for_line(2)[0].kind, TokenKind::String);
    assert!(
        engine
            .spans_for_line(3)
            .iter()
            .any(|s| s.kind == TokenKind::Number)
    );
}

#[test]
fn test_spans_reference_valid_columns() {
    let editor = Editor::new("def f(x): return '你好' # done", Language::Python);
    let engine = engine_for(&editor);

    let line_len = editor.document().buffer().line_len(0).unwrap();
    for span in engine.spans_for_line(0) {
        assert!(span.start_column < span.end_column);
        assert!(span.end_column <= line_len);
    }
}

#[test]
fn test_plain_text_produces_no_spans() {
    let editor = Editor::new("anything at all // here", Language::PlainText);
    let engine = engine_for(&editor);
    assert!(engine.spans_for_line(0).is_empty());
}

#[test]
fn test_position_mapping_for_caret_inside_span() {
    // The highlight columns line up with buffer positions for caret rendering.
    let editor = Editor::new("x = 42", Language::Python);
    let engine = engine_for(&editor);

    let span = engine
        .spans_for_line(0)
        .into_iter()
        .find(|s| s.kind == TokenKind::Number)
        .unwrap();
    let offset = editor
        .document()
        .buffer()
        .offset_of(Position::new(0, span.start_column))
        .unwrap();
    assert_eq!(offset, 4);
}
