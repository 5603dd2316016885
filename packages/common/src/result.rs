use crate::error::StoreError;

/// Result type for content store operations
pub type StoreResult<T> = Result<T, StoreError>;
