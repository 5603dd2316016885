//! # Rewrite Controller
//!
//! Owns the lifecycle of one selection-scoped rewrite.
//!
//! ```text
//! Idle ──begin──▶ Capturing ──confirm──▶ Pending(id) ──resolve──▶ Idle
//!   ╰──────────────confirm─────────────────╯      │
//!                         Capturing ◀─abandon─    ╰──cancel──▶ Idle
//! ```
//!
//! The canvas keeps accepting edits while a request is pending. When the
//! result arrives the captured range is checked against the canvas as it is
//! then; a mismatch discards the result instead of guessing where it
//! belongs.

use folio_markup::{escape_text, is_well_formed};
use thiserror::Error;

use super::service::RewriteServiceError;
use crate::canvas::{Canvas, Edit};
use crate::selection::SelectionSnapshot;

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewritePhase {
    Idle,
    /// Command dialog open over a held selection
    Capturing,
    Pending(RequestId),
}

/// A confirmed rewrite waiting on the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    pub id: RequestId,
    pub snapshot: SelectionSnapshot,
    pub command: String,
    /// Visible text sent to the service
    pub input: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteRejected {
    #[error("Rewrite {0} is still pending")]
    AlreadyPending(RequestId),

    #[error("No text is selected")]
    NoSelection,

    #[error("Rewrite command is empty")]
    EmptyCommand,

    #[error("Selection changed since it was captured")]
    SelectionChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The captured range was replaced with the result
    Applied { edit: Edit },
    /// The captured range no longer holds the captured text
    Stale,
    Failed { error: RewriteServiceError },
    /// The result belongs to a cancelled or superseded request
    Discarded,
}

#[derive(Debug)]
pub struct RewriteController {
    phase: RewritePhase,
    held: Option<SelectionSnapshot>,
    pending: Option<RewriteRequest>,
    next_id: RequestId,
}

impl RewriteController {
    pub fn new() -> Self {
        Self {
            phase: RewritePhase::Idle,
            held: None,
            pending: None,
            next_id: 1,
        }
    }

    pub fn phase(&self) -> RewritePhase {
        self.phase
    }

    pub fn held(&self) -> Option<&SelectionSnapshot> {
        self.held.as_ref()
    }

    pub fn pending(&self) -> Option<&RewriteRequest> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, RewritePhase::Pending(_))
    }

    /// Record the latest settled selection; `None` clears it
    pub fn hold_selection(&mut self, snapshot: Option<SelectionSnapshot>) {
        self.held = snapshot;
    }

    /// Open the command dialog over the held selection
    pub fn begin(&mut self) -> Result<(), RewriteRejected> {
        if let RewritePhase::Pending(id) = self.phase {
            return Err(RewriteRejected::AlreadyPending(id));
        }
        if self.held.is_none() {
            return Err(RewriteRejected::NoSelection);
        }
        self.phase = RewritePhase::Capturing;
        Ok(())
    }

    /// Close the dialog without confirming
    pub fn abandon(&mut self) {
        if self.phase == RewritePhase::Capturing {
            self.phase = RewritePhase::Idle;
        }
    }

    /// Freeze the held selection into a request
    ///
    /// At most one request is in flight; a second confirm is rejected and
    /// leaves the first untouched.
    pub fn confirm(&mut self, command: &str, canvas: &Canvas) -> Result<RewriteRequest, RewriteRejected> {
        if let RewritePhase::Pending(id) = self.phase {
            return Err(RewriteRejected::AlreadyPending(id));
        }
        let command = command.trim();
        if command.is_empty() {
            return Err(RewriteRejected::EmptyCommand);
        }
        let snapshot = self.held.clone().ok_or(RewriteRejected::NoSelection)?;
        if !snapshot.is_current(canvas) {
            return Err(RewriteRejected::SelectionChanged);
        }

        let id = self.next_id;
        self.next_id += 1;
        let request = RewriteRequest {
            id,
            input: snapshot.plain_text(),
            snapshot,
            command: command.to_string(),
        };
        tracing::info!(
            "Rewrite {} issued: {:?} over {}..{}",
            id,
            request.command,
            request.snapshot.start,
            request.snapshot.end
        );

        self.phase = RewritePhase::Pending(id);
        self.pending = Some(request.clone());
        Ok(request)
    }

    /// Give up on `id`; a result arriving later is discarded
    pub fn cancel(&mut self, id: RequestId) -> bool {
        if self.phase != RewritePhase::Pending(id) {
            return false;
        }
        tracing::info!("Rewrite {} cancelled", id);
        self.phase = RewritePhase::Idle;
        self.pending = None;
        true
    }

    /// Cancel whatever is pending
    pub fn cancel_pending(&mut self) -> Option<RequestId> {
        let RewritePhase::Pending(id) = self.phase else {
            return None;
        };
        self.cancel(id);
        Some(id)
    }

    /// Apply the service's answer for `id` against the current canvas
    pub fn resolve(
        &mut self,
        id: RequestId,
        result: Result<String, RewriteServiceError>,
        canvas: &mut Canvas,
    ) -> RewriteOutcome {
        if self.phase != RewritePhase::Pending(id) {
            tracing::debug!("Rewrite {} result discarded", id);
            return RewriteOutcome::Discarded;
        }
        self.phase = RewritePhase::Idle;
        let Some(request) = self.pending.take() else {
            return RewriteOutcome::Discarded;
        };

        let text = match result {
            Ok(text) => text,
            Err(error) => {
                tracing::warn!("Rewrite {} failed: {}", id, error);
                return RewriteOutcome::Failed { error };
            }
        };

        let snapshot = &request.snapshot;
        if !snapshot.is_current(canvas) {
            tracing::warn!(
                "Rewrite {} is stale: {}..{} changed while pending",
                id,
                snapshot.start,
                snapshot.end
            );
            return RewriteOutcome::Stale;
        }

        let fragment = if is_well_formed(&text) {
            text
        } else {
            escape_text(&text)
        };
        match canvas.replace_range(snapshot.start, snapshot.end, &snapshot.text, &fragment) {
            Ok(edit) => {
                tracing::info!("Rewrite {} applied at revision {}", id, edit.revision);
                self.held = None;
                RewriteOutcome::Applied { edit }
            }
            Err(err) => {
                tracing::warn!("Rewrite {} could not be applied: {}", id, err);
                RewriteOutcome::Stale
            }
        }
    }
}

impl Default for RewriteController {
    fn default() -> Self {
        Self::new()
    }
}
