//! # Folio Editor
//!
//! Rich-text editing engine for Folio documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ input: commands, shortcuts, typing          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ canvas: content string + caret/selection    │
//! │  - Whole-element splices only               │
//! │  - Every commit re-validated                │
//! │  - Undo/redo of committed edits             │
//! └─────────────────────────────────────────────┘
//!          ↓                         ↑
//! ┌──────────────────┐   ┌──────────────────────┐
//! │ session: draft,  │   │ rewrite: snapshot →  │
//! │ dirty flag, save │   │ async call → apply   │
//! └──────────────────┘   │ or discard as stale  │
//!          ↓             └──────────────────────┘
//! ┌─────────────────────────────────────────────┐
//! │ ContentStore (folio-common)                 │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Content is the source of truth**: the serialized markup string is
//!    the document; the outline is a derived view
//! 2. **Always well-formed**: a mutation that would break the markup fails
//!    and leaves the canvas untouched
//! 3. **Explicit selections**: rewrites carry a captured snapshot, never
//!    an ambient selection
//! 4. **Stale results are dropped**: a rewrite only lands if its range
//!    still holds the text it was captured with
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{Command, Editor, EditorConfig};
//!
//! let mut editor = Editor::open(document, EditorConfig::default())?;
//!
//! editor.select(3, 8)?;
//! editor.dispatch(&Command::Bold)?;
//!
//! // Rewrite the settled selection
//! editor.selection_event(now);
//! editor.poll_selection(later);
//! let outcome = editor.rewrite_with(&service, "improve grammar").await?;
//!
//! editor.save(&store).await?;
//! ```

mod canvas;
mod commands;
mod config;
mod editor;
mod errors;
mod keymap;
mod rewrite;
mod selection;
mod session;
mod undo_stack;

pub use canvas::{BlockType, Canvas, CanvasError, CanvasResult, Edit, InlineStyle, Selection};
pub use commands::{Command, CommandDispatcher, CommandError};
pub use config::EditorConfig;
pub use editor::Editor;
pub use errors::EditorError;
pub use keymap::{lookup as lookup_shortcut, Modifiers, Shortcut};
pub use rewrite::{
    call_with_timeout, CannedRewriter, RequestId, RewriteCompletion, RewriteController,
    RewriteDriver, RewriteOutcome, RewritePhase, RewriteRejected, RewriteRequest, RewriteService,
    RewriteServiceError, PRESET_COMMANDS,
};
pub use selection::{SelectionSnapshot, SelectionTracker, SelectionUpdate};
pub use session::{DocumentSession, SaveOutcome, SaveRequest, SessionError};
pub use undo_stack::UndoStack;
