//! Integration tests for the editor crate

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use folio_common::{now_micros, ContentStore, Document, NewDocument};
use folio_editor::{
    Command, Editor, EditorConfig, RewriteDriver, RewriteOutcome, RewritePhase, RewriteRejected,
    RewriteService, RewriteServiceError, SaveOutcome, SelectionUpdate,
};
use folio_markup::is_well_formed;
use folio_store::MemoryStore;

const SENTENCE: &str = "<p>I saw teh cat today</p>";

struct Fixed(&'static str);

#[async_trait]
impl RewriteService for Fixed {
    async fn rewrite(&self, _text: &str, _command: &str) -> Result<String, RewriteServiceError> {
        Ok(self.0.to_string())
    }
}

fn document(content: &str) -> Document {
    let now = now_micros();
    Document {
        id: 1,
        title: "Notes".to_string(),
        content: content.to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn editor(content: &str) -> Editor {
    Editor::open(document(content), EditorConfig::default()).unwrap()
}

/// Select and let the selection settle so the controller holds it
fn hold(editor: &mut Editor, anchor: usize, focus: usize) {
    editor.select(anchor, focus).unwrap();
    let now = Instant::now();
    editor.selection_event(now);
    let settled = now + editor.config().selection_debounce();
    assert!(matches!(
        editor.poll_selection(settled),
        Some(SelectionUpdate::Held(_))
    ));
}

#[tokio::test]
async fn test_rewrite_replaces_captured_range() {
    let mut editor = editor(SENTENCE);
    hold(&mut editor, 9, 16);

    let outcome = editor
        .rewrite_with(&Fixed("the cat"), "improve grammar")
        .await
        .unwrap();

    assert!(matches!(outcome, RewriteOutcome::Applied { .. }));
    assert_eq!(editor.canvas().content(), "<p>I saw the cat today</p>");
    assert_eq!(editor.session().content(), editor.canvas().content());
    assert!(editor.is_dirty());
    assert!(editor.controller().held().is_none());
    assert_eq!(editor.controller().phase(), RewritePhase::Idle);
}

#[test]
fn test_request_carries_visible_text() {
    let mut editor = editor("<p>I saw <em>teh</em> cat today</p>");
    hold(&mut editor, 9, 25);

    let request = editor.request_rewrite("  improve grammar ").unwrap();

    assert_eq!(request.input, "teh cat");
    assert_eq!(request.command, "improve grammar");
    assert_eq!(request.snapshot.text, "<em>teh</em> cat");
}

#[test]
fn test_typing_before_range_makes_result_stale() {
    let mut editor = editor(SENTENCE);
    hold(&mut editor, 9, 16);
    let request = editor.request_rewrite("improve grammar").unwrap();

    editor.set_caret(3).unwrap();
    editor.insert_text("Oh, ").unwrap();

    let outcome = editor.resolve_rewrite(request.id, Ok("the cat".to_string()));

    assert_eq!(outcome, RewriteOutcome::Stale);
    assert_eq!(editor.canvas().content(), "<p>Oh, I saw teh cat today</p>");
    assert_eq!(editor.controller().phase(), RewritePhase::Idle);
}

#[test]
fn test_edits_elsewhere_keep_result_applicable() {
    let mut editor = editor(SENTENCE);
    hold(&mut editor, 9, 16);
    let request = editor.request_rewrite("improve grammar").unwrap();

    editor.set_caret(22).unwrap();
    editor.insert_text("!").unwrap();

    let outcome = editor.resolve_rewrite(request.id, Ok("the cat".to_string()));

    assert!(matches!(outcome, RewriteOutcome::Applied { .. }));
    assert_eq!(editor.canvas().content(), "<p>I saw the cat today!</p>");
}

#[test]
fn test_second_request_is_rejected_while_pending() {
    let mut editor = editor(SENTENCE);
    hold(&mut editor, 9, 16);
    let first = editor.request_rewrite("summarize").unwrap();

    assert_eq!(
        editor.request_rewrite("make concise"),
        Err(RewriteRejected::AlreadyPending(first.id))
    );
    assert_eq!(editor.begin_rewrite(), Err(RewriteRejected::AlreadyPending(first.id)));
    assert_eq!(editor.controller().phase(), RewritePhase::Pending(first.id));
}

#[test]
fn test_rewrite_needs_a_held_selection() {
    let mut editor = editor(SENTENCE);
    assert_eq!(editor.begin_rewrite(), Err(RewriteRejected::NoSelection));
    assert_eq!(
        editor.request_rewrite("summarize"),
        Err(RewriteRejected::NoSelection)
    );
}

#[test]
fn test_cancelled_result_is_discarded() {
    let mut editor = editor(SENTENCE);
    hold(&mut editor, 9, 16);
    let request = editor.request_rewrite("improve grammar").unwrap();

    assert!(editor.cancel_rewrite(request.id));
    assert!(!editor.cancel_rewrite(request.id));

    let outcome = editor.resolve_rewrite(request.id, Ok("the cat".to_string()));
    assert_eq!(outcome, RewriteOutcome::Discarded);
    assert_eq!(editor.canvas().content(), SENTENCE);
    assert!(!editor.is_dirty());
}

#[test]
fn test_failed_rewrite_leaves_content_alone() {
    let mut editor = editor(SENTENCE);
    hold(&mut editor, 9, 16);
    let request = editor.request_rewrite("improve grammar").unwrap();

    let outcome = editor.resolve_rewrite(
        request.id,
        Err(RewriteServiceError::Transport("connection reset".to_string())),
    );

    assert!(matches!(outcome, RewriteOutcome::Failed { .. }));
    assert_eq!(editor.canvas().content(), SENTENCE);
    assert_eq!(editor.controller().phase(), RewritePhase::Idle);
    // The selection is still held, so the user can retry
    assert!(editor.request_rewrite("improve grammar").is_ok());
}

#[test]
fn test_malformed_result_is_inserted_as_text() {
    let mut editor = editor(SENTENCE);
    hold(&mut editor, 9, 16);
    let request = editor.request_rewrite("improve grammar").unwrap();

    editor.resolve_rewrite(request.id, Ok("<b>the cat".to_string()));

    assert_eq!(editor.canvas().content(), "<p>I saw &lt;b&gt;the cat today</p>");
}

#[tokio::test]
async fn test_driver_delivers_completion() {
    let (driver, mut completions) =
        RewriteDriver::new(Arc::new(Fixed("the cat")), Duration::from_secs(5));
    let mut editor = editor(SENTENCE);
    hold(&mut editor, 9, 16);

    let request = editor.spawn_rewrite(&driver, "improve grammar").unwrap();
    // Edits keep flowing while the call is out
    editor.set_caret(3).unwrap();
    editor.insert_text("Yes. ").unwrap();

    let completion = completions.recv().await.unwrap();
    assert_eq!(completion.id, request.id);

    let outcome = editor.apply_completion(completion);
    assert_eq!(outcome, RewriteOutcome::Stale);
    assert_eq!(editor.canvas().content(), "<p>Yes. I saw teh cat today</p>");
}

#[test]
fn test_bold_twice_restores_content() {
    let mut editor = editor("<p>Hello brave world</p>");
    editor.select(9, 14).unwrap();

    editor.dispatch(&Command::Bold).unwrap();
    assert_eq!(editor.canvas().content(), "<p>Hello <strong>brave</strong> world</p>");

    editor.dispatch(&Command::Bold).unwrap();
    assert_eq!(editor.canvas().content(), "<p>Hello brave world</p>");
    assert!(!editor.is_dirty());
}

#[test]
fn test_italic_twice_restores_content() {
    let mut editor = editor("<p>Hello brave world</p>");
    editor.select(9, 14).unwrap();

    editor.dispatch(&Command::Italic).unwrap();
    assert_eq!(editor.canvas().content(), "<p>Hello <em>brave</em> world</p>");
    assert_eq!(editor.canvas().selection().map(|s| s.text).as_deref(), Some("brave"));

    editor.dispatch(&Command::Italic).unwrap();
    assert_eq!(editor.canvas().content(), "<p>Hello brave world</p>");
    assert!(!editor.is_dirty());
}

#[test]
fn test_bold_twice_inside_italic_restores_content() {
    let mut editor = editor("<p><em>abc</em></p>");
    editor.select(7, 10).unwrap();

    editor.dispatch(&Command::Bold).unwrap();
    assert_eq!(editor.canvas().content(), "<p><em><strong>abc</strong></em></p>");

    editor.dispatch(&Command::Bold).unwrap();
    assert_eq!(editor.canvas().content(), "<p><em>abc</em></p>");
    assert!(!editor.is_dirty());
}

#[test]
fn test_bold_toggles_after_clear_formatting() {
    let mut editor = editor("<p><strong><em>abc</em></strong></p>");
    editor.select(15, 18).unwrap();

    editor.dispatch(&Command::ClearFormatting).unwrap();
    assert_eq!(editor.canvas().content(), "<p>abc</p>");
    assert_eq!(editor.canvas().selection().map(|s| s.text).as_deref(), Some("abc"));

    editor.dispatch(&Command::Bold).unwrap();
    assert_eq!(editor.canvas().content(), "<p><strong>abc</strong></p>");

    editor.dispatch(&Command::Bold).unwrap();
    assert_eq!(editor.canvas().content(), "<p>abc</p>");
}

#[test]
fn test_content_stays_well_formed_across_commands() {
    let commands = [
        Command::Bold,
        Command::Italic,
        Command::Heading2,
        Command::BulletList,
        Command::NumberedList,
        Command::NumberedList,
        Command::Blockquote,
        Command::CodeBlock,
        Command::ClearFormatting,
        Command::InsertLink {
            url: "https://example.com/?a=1&b=2".to_string(),
            text: String::new(),
        },
        Command::InsertImage {
            url: "cat.png".to_string(),
            alt: "a \"cat\"".to_string(),
        },
    ];
    let selections = [(9, 14), (3, 8), (15, 20), (3, 3)];

    for (anchor, focus) in selections {
        let mut editor = editor("<p>Hello brave world</p>");
        for command in &commands {
            if editor.select(anchor, focus).is_err() {
                editor.set_caret(editor.canvas().content().len()).unwrap();
            }
            // Rejected commands must leave the canvas as it was
            let before = editor.canvas().content().to_string();
            if editor.dispatch(command).is_err() {
                assert_eq!(editor.canvas().content(), before);
            }
            assert!(
                is_well_formed(editor.canvas().content()),
                "{} left {:?}",
                command.name(),
                editor.canvas().content()
            );
        }
    }
}

#[test]
fn test_title_edits_drive_dirty_flag() {
    let mut editor = editor(SENTENCE);

    editor.set_title("Renamed");
    assert!(editor.is_dirty());

    editor.set_title("Notes");
    assert!(!editor.is_dirty());
}

#[tokio::test]
async fn test_save_round_trip_through_store() {
    let store = MemoryStore::new();
    let doc = store
        .create(NewDocument::new("Notes", "<p>draft</p>"))
        .await
        .unwrap();
    let mut editor = Editor::open(doc.clone(), EditorConfig::default()).unwrap();

    assert_eq!(editor.save(&store).await, Ok(SaveOutcome::Clean));

    editor.set_caret(8).unwrap();
    editor.insert_text(" two").unwrap();
    editor.set_title("Notes v2");
    assert_eq!(editor.save(&store).await, Ok(SaveOutcome::Saved));
    assert!(!editor.is_dirty());

    let stored = store.get(doc.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Notes v2");
    assert_eq!(stored.content, "<p>draft two</p>");
    assert!(stored.updated_at > doc.updated_at);
    assert_eq!(editor.session().baseline(), &stored);
}

#[tokio::test]
async fn test_save_of_deleted_document_reports_missing() {
    let store = MemoryStore::new();
    let doc = store.create(NewDocument::new("Gone", "")).await.unwrap();
    let mut editor = Editor::open(doc.clone(), EditorConfig::default()).unwrap();
    store.delete(doc.id).await.unwrap();

    editor.insert_text("late").unwrap();

    assert_eq!(editor.save(&store).await, Ok(SaveOutcome::Missing));
    assert!(editor.is_dirty());
}

#[test]
fn test_open_document_drops_pending_rewrite() {
    let mut editor = editor(SENTENCE);
    hold(&mut editor, 9, 16);
    let request = editor.request_rewrite("summarize").unwrap();

    let mut other = document("<p>other</p>");
    other.id = 2;
    editor.open_document(other).unwrap();

    assert_eq!(
        editor.resolve_rewrite(request.id, Ok("the cat".to_string())),
        RewriteOutcome::Discarded
    );
    assert_eq!(editor.canvas().content(), "<p>other</p>");
    assert_eq!(editor.session().id(), 2);
    assert!(!editor.is_dirty());
}
