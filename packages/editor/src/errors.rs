//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Canvas error: {0}")]
    Canvas(#[from] crate::canvas::CanvasError),

    #[error("Command error: {0}")]
    Command(#[from] crate::commands::CommandError),

    #[error("Rewrite rejected: {0}")]
    Rewrite(#[from] crate::rewrite::RewriteRejected),

    #[error("Session error: {0}")]
    Session(#[from] crate::session::SessionError),
}
