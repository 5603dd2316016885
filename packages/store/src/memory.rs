use std::collections::BTreeMap;

use async_trait::async_trait;
use folio_common::{
    now_micros, ContentStore, Document, DocumentId, DocumentPatch, NewDocument, StoreResult,
};
use tokio::sync::RwLock;

use crate::samples::sample_documents;

#[derive(Debug)]
struct Inner {
    documents: BTreeMap<DocumentId, Document>,
    next_id: DocumentId,
}

/// In-process store; ids start at 1 and are never reused
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::from_documents(Vec::new())
    }

    /// Store seeded with the demo documents
    pub fn with_samples() -> Self {
        Self::from_documents(sample_documents(now_micros()))
    }

    fn from_documents(documents: Vec<Document>) -> Self {
        let next_id = documents.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        let documents = documents.into_iter().map(|d| (d.id, d)).collect();
        Self {
            inner: RwLock::new(Inner { documents, next_id }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Most recently updated first, newest id on ties
fn sort_recent_first(documents: &mut [Document]) {
    documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create(&self, input: NewDocument) -> StoreResult<Document> {
        input.validate()?;
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let now = now_micros();
        let document = Document {
            id,
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
        };
        inner.documents.insert(id, document.clone());
        Ok(document)
    }

    async fn list(&self) -> StoreResult<Vec<Document>> {
        let inner = self.inner.read().await;
        let mut documents: Vec<Document> = inner.documents.values().cloned().collect();
        sort_recent_first(&mut documents);
        Ok(documents)
    }

    async fn get(&self, id: DocumentId) -> StoreResult<Option<Document>> {
        Ok(self.inner.read().await.documents.get(&id).cloned())
    }

    async fn update(&self, id: DocumentId, patch: DocumentPatch) -> StoreResult<Option<Document>> {
        patch.validate()?;
        let mut inner = self.inner.write().await;
        let Some(document) = inner.documents.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(document);
        Ok(Some(document.clone()))
    }

    async fn delete(&self, id: DocumentId) -> StoreResult<bool> {
        Ok(self.inner.write().await.documents.remove(&id).is_some())
    }
}
