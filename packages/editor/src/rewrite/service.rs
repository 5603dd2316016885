use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteServiceError {
    #[error("Rewrite service unreachable: {0}")]
    Transport(String),

    #[error("Rewrite rejected: {0}")]
    Rejected(String),

    #[error("Rewrite timed out after {after_ms}ms")]
    TimedOut { after_ms: u64 },

    #[error("Rewrite cancelled")]
    Cancelled,
}

/// External text transform applied to a selection
///
/// The result may be plain text or a markup fragment.
#[async_trait]
pub trait RewriteService: Send + Sync {
    async fn rewrite(&self, text: &str, command: &str) -> Result<String, RewriteServiceError>;
}
