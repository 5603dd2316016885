use async_trait::async_trait;

use crate::document::{Document, DocumentId, DocumentPatch, NewDocument};
use crate::result::StoreResult;

/// Persistence boundary for documents
///
/// Implementations must keep `list` ordered by `updated_at` descending and
/// bump `updated_at` on every successful `update`.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a new document and return the stored record
    async fn create(&self, input: NewDocument) -> StoreResult<Document>;

    /// All documents, most recently updated first
    async fn list(&self) -> StoreResult<Vec<Document>>;

    async fn get(&self, id: DocumentId) -> StoreResult<Option<Document>>;

    /// Update only the supplied fields; `None` when the id does not exist
    async fn update(&self, id: DocumentId, patch: DocumentPatch) -> StoreResult<Option<Document>>;

    /// `true` iff a document existed and was removed
    async fn delete(&self, id: DocumentId) -> StoreResult<bool>;
}
