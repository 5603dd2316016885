//! # Document Session
//!
//! Draft state for one open document and the save handshake with the
//! content store.
//!
//! The canvas is the only writer of the draft content. The session owns the
//! title and the dirty flag, and nothing else in the editor talks to the
//! store.

use folio_common::{ContentStore, Document, DocumentId, DocumentPatch, StoreError, StoreResult};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("Save failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Patch a save sends to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub id: DocumentId,
    pub patch: DocumentPatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Nothing to save
    Clean,
    /// The document no longer exists in the store
    Missing,
}

#[derive(Debug, Clone)]
pub struct DocumentSession {
    baseline: Document,
    draft_title: String,
    draft_content: String,
    dirty: bool,
    saving: bool,
}

impl DocumentSession {
    pub fn open(document: Document) -> Self {
        Self {
            draft_title: document.title.clone(),
            draft_content: document.content.clone(),
            baseline: document,
            dirty: false,
            saving: false,
        }
    }

    /// Last persisted version
    pub fn baseline(&self) -> &Document {
        &self.baseline
    }

    pub fn id(&self) -> DocumentId {
        self.baseline.id
    }

    pub fn title(&self) -> &str {
        &self.draft_title
    }

    pub fn content(&self) -> &str {
        &self.draft_content
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    fn recompute(&mut self) {
        self.dirty =
            self.draft_title != self.baseline.title || self.draft_content != self.baseline.content;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft_title = title.into();
        self.recompute();
    }

    /// Canvas content after a mutation
    pub fn on_content_changed(&mut self, content: &str) {
        if self.draft_content != content {
            self.draft_content = content.to_string();
        }
        self.recompute();
    }

    /// Start a save; `None` when the draft matches the baseline
    pub fn begin_save(&mut self) -> Result<Option<SaveRequest>, SessionError> {
        if self.saving {
            return Err(SessionError::SaveInFlight);
        }
        if !self.dirty {
            return Ok(None);
        }
        self.saving = true;
        Ok(Some(SaveRequest {
            id: self.baseline.id,
            patch: DocumentPatch {
                title: Some(self.draft_title.clone()),
                content: Some(self.draft_content.clone()),
            },
        }))
    }

    /// Settle a save started with [`begin_save`](Self::begin_save)
    ///
    /// On failure the draft is kept as is and stays dirty.
    pub fn finish_save(&mut self, result: StoreResult<Option<Document>>) -> Result<SaveOutcome, SessionError> {
        self.saving = false;
        match result {
            Ok(Some(document)) => {
                tracing::info!("Saved document {} ({:?})", document.id, document.title);
                self.baseline = document;
                self.recompute();
                Ok(SaveOutcome::Saved)
            }
            Ok(None) => {
                tracing::warn!("Document {} no longer exists", self.baseline.id);
                Ok(SaveOutcome::Missing)
            }
            Err(err) => {
                tracing::warn!("Saving document {} failed: {}", self.baseline.id, err);
                Err(SessionError::Persistence(err))
            }
        }
    }

    /// Push the draft to `store`
    pub async fn save(&mut self, store: &dyn ContentStore) -> Result<SaveOutcome, SessionError> {
        let Some(request) = self.begin_save()? else {
            return Ok(SaveOutcome::Clean);
        };
        let result = store.update(request.id, request.patch).await;
        self.finish_save(result)
    }

    /// Throw the draft away
    pub fn discard(&mut self) {
        self.draft_title = self.baseline.title.clone();
        self.draft_content = self.baseline.content.clone();
        self.dirty = false;
    }
}
