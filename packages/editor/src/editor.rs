//! One editing session per open document.
//!
//! Every entry point that can mutate the canvas hands the new content to
//! the session before it returns, so the dirty flag never lags an edit.

use std::time::Instant;

use folio_common::{ContentStore, Document};
use tokio::task::JoinHandle;

use crate::canvas::{Canvas, Edit};
use crate::commands::{Command, CommandDispatcher};
use crate::config::EditorConfig;
use crate::errors::EditorError;
use crate::keymap::{self, Modifiers, Shortcut};
use crate::rewrite::{
    call_with_timeout, RequestId, RewriteCompletion, RewriteController, RewriteDriver,
    RewriteOutcome, RewriteRejected, RewriteRequest, RewriteService, RewriteServiceError,
};
use crate::selection::{SelectionTracker, SelectionUpdate};
use crate::session::{DocumentSession, SaveOutcome, SessionError};

pub struct Editor {
    config: EditorConfig,
    canvas: Canvas,
    dispatcher: CommandDispatcher,
    tracker: SelectionTracker,
    controller: RewriteController,
    session: DocumentSession,
    in_flight: Option<JoinHandle<()>>,
}

impl Editor {
    pub fn open(document: Document, config: EditorConfig) -> Result<Self, EditorError> {
        let canvas = Canvas::new(document.content.clone())?.with_undo_levels(config.undo_levels);
        Ok(Self {
            tracker: SelectionTracker::new(config.selection_debounce()),
            config,
            canvas,
            dispatcher: CommandDispatcher::new(),
            controller: RewriteController::new(),
            session: DocumentSession::open(document),
            in_flight: None,
        })
    }

    /// Switch to another document, dropping any pending rewrite
    pub fn open_document(&mut self, document: Document) -> Result<(), EditorError> {
        self.canvas.reset(document.content.clone())?;
        self.cancel_pending_rewrite();
        self.controller.hold_selection(None);
        self.session = DocumentSession::open(document);
        Ok(())
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    pub fn controller(&self) -> &RewriteController {
        &self.controller
    }

    pub fn is_dirty(&self) -> bool {
        self.session.is_dirty()
    }

    fn sync(&mut self) {
        self.session.on_content_changed(self.canvas.content());
    }

    pub fn select(&mut self, anchor: usize, focus: usize) -> Result<(), EditorError> {
        Ok(self.canvas.select(anchor, focus)?)
    }

    pub fn set_caret(&mut self, offset: usize) -> Result<(), EditorError> {
        Ok(self.canvas.set_caret(offset)?)
    }

    pub fn dispatch(&mut self, command: &Command) -> Result<Option<Edit>, EditorError> {
        let edit = self.dispatcher.dispatch(&mut self.canvas, command)?;
        self.sync();
        Ok(edit)
    }

    /// Run the command bound to a key chord
    ///
    /// `Save` is handed back to the caller, which owns the store.
    pub fn handle_shortcut(&mut self, key: char, modifiers: Modifiers) -> Result<Option<Shortcut>, EditorError> {
        let shortcut = keymap::lookup(key, modifiers);
        if let Some(Shortcut::Command(command)) = &shortcut {
            self.dispatch(command)?;
        }
        Ok(shortcut)
    }

    pub fn insert_text(&mut self, text: &str) -> Result<Option<Edit>, EditorError> {
        let edit = self.canvas.insert_text(text)?;
        self.sync();
        Ok(edit)
    }

    pub fn delete_backward(&mut self) -> Result<Option<Edit>, EditorError> {
        let edit = self.canvas.delete_backward()?;
        self.sync();
        Ok(edit)
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.canvas.undo();
        self.sync();
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.canvas.redo();
        self.sync();
        redone
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.session.set_title(title);
    }

    /// A pointer-up or key-up on the canvas at `now`
    pub fn selection_event(&mut self, now: Instant) {
        self.tracker.note_event(now);
    }

    /// Read the selection once the gesture has settled
    pub fn poll_selection(&mut self, now: Instant) -> Option<SelectionUpdate> {
        let update = self.tracker.poll(&self.canvas, now)?;
        match &update {
            SelectionUpdate::Held(snapshot) => self.controller.hold_selection(Some(snapshot.clone())),
            SelectionUpdate::Cleared => self.controller.hold_selection(None),
        }
        Some(update)
    }

    /// Open the rewrite dialog over the held selection
    pub fn begin_rewrite(&mut self) -> Result<(), RewriteRejected> {
        self.controller.begin()
    }

    pub fn abandon_rewrite(&mut self) {
        self.controller.abandon();
    }

    pub fn request_rewrite(&mut self, command: &str) -> Result<RewriteRequest, RewriteRejected> {
        self.controller.confirm(command, &self.canvas)
    }

    pub fn resolve_rewrite(
        &mut self,
        id: RequestId,
        result: Result<String, RewriteServiceError>,
    ) -> RewriteOutcome {
        let outcome = self.controller.resolve(id, result, &mut self.canvas);
        if !self.controller.is_pending() {
            self.in_flight = None;
        }
        self.sync();
        outcome
    }

    pub fn apply_completion(&mut self, completion: RewriteCompletion) -> RewriteOutcome {
        self.resolve_rewrite(completion.id, completion.result)
    }

    /// Stop waiting for `id`; its result will be discarded
    pub fn cancel_rewrite(&mut self, id: RequestId) -> bool {
        if !self.controller.cancel(id) {
            return false;
        }
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        true
    }

    fn cancel_pending_rewrite(&mut self) {
        if let Some(id) = self.controller.pending().map(|request| request.id) {
            self.cancel_rewrite(id);
        }
    }

    /// Rewrite the held selection and wait for the answer
    pub async fn rewrite_with(
        &mut self,
        service: &dyn RewriteService,
        command: &str,
    ) -> Result<RewriteOutcome, RewriteRejected> {
        let request = self.request_rewrite(command)?;
        let result = call_with_timeout(
            service,
            &request.input,
            &request.command,
            self.config.rewrite_timeout(),
        )
        .await;
        Ok(self.resolve_rewrite(request.id, result))
    }

    /// Rewrite the held selection on `driver`
    ///
    /// The result arrives on the driver's channel and goes through
    /// [`apply_completion`](Self::apply_completion).
    pub fn spawn_rewrite(&mut self, driver: &RewriteDriver, command: &str) -> Result<RewriteRequest, RewriteRejected> {
        let request = self.request_rewrite(command)?;
        self.in_flight = Some(driver.spawn(&request));
        Ok(request)
    }

    pub async fn save(&mut self, store: &dyn ContentStore) -> Result<SaveOutcome, SessionError> {
        self.session.save(store).await
    }

    /// Drop the draft and reload the baseline into the canvas
    pub fn discard(&mut self) -> Result<(), EditorError> {
        self.cancel_pending_rewrite();
        self.session.discard();
        self.canvas.reset(self.session.baseline().content.clone())?;
        self.controller.hold_selection(None);
        Ok(())
    }
}
