use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use folio_common::{
    ContentStore, Document, DocumentId, DocumentPatch, NewDocument, StoreError, StoreResult,
};

/// Serves from `secondary` once `primary` reports itself unavailable
///
/// The switch is one-way. Any other error from the primary is returned to
/// the caller unchanged.
pub struct FallbackStore<P, S> {
    primary: P,
    secondary: S,
    degraded: AtomicBool,
}

impl<P, S> FallbackStore<P, S>
where
    P: ContentStore,
    S: ContentStore,
{
    pub fn new(primary: P, secondary: S) -> Self {
        Self {
            primary,
            secondary,
            degraded: AtomicBool::new(false),
        }
    }

    /// Whether requests go to the secondary store
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    fn degrade(&self, err: &StoreError) {
        if !self.degraded.swap(true, Ordering::AcqRel) {
            tracing::warn!("Primary store unavailable, serving demo documents: {}", err);
        }
    }
}

/// Primary unless degraded, then the secondary
macro_rules! route {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {{
        if !$self.is_degraded() {
            match $self.primary.$method($($arg.clone()),*).await {
                Err(err) if err.is_unavailable() => $self.degrade(&err),
                other => return other,
            }
        }
        $self.secondary.$method($($arg),*).await
    }};
}

#[async_trait]
impl<P, S> ContentStore for FallbackStore<P, S>
where
    P: ContentStore,
    S: ContentStore,
{
    async fn create(&self, input: NewDocument) -> StoreResult<Document> {
        route!(self, create(input))
    }

    async fn list(&self) -> StoreResult<Vec<Document>> {
        route!(self, list())
    }

    async fn get(&self, id: DocumentId) -> StoreResult<Option<Document>> {
        route!(self, get(id))
    }

    async fn update(&self, id: DocumentId, patch: DocumentPatch) -> StoreResult<Option<Document>> {
        route!(self, update(id, patch))
    }

    async fn delete(&self, id: DocumentId) -> StoreResult<bool> {
        route!(self, delete(id))
    }
}
