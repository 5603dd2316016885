//! # Folio Store
//!
//! [`ContentStore`](folio_common::ContentStore) implementations.
//!
//! - [`MemoryStore`]: process-local, used for tests and demo mode
//! - [`SqliteStore`]: single-file persistence
//! - [`FallbackStore`]: serves from a secondary store once the primary
//!   reports itself unavailable

mod fallback;
mod memory;
mod samples;
mod sqlite;

pub use fallback::FallbackStore;
pub use memory::MemoryStore;
pub use samples::sample_documents;
pub use sqlite::SqliteStore;
