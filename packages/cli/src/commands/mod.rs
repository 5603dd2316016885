pub mod documents;
pub mod init;
pub mod rewrite;
pub mod serve;

use std::sync::Arc;

use colored::Colorize;
use folio_common::ContentStore;
use folio_store::{FallbackStore, MemoryStore, SqliteStore};

use crate::config::Config;

pub use documents::{delete, list, new, show, update, NewArgs, ShowArgs, UpdateArgs};
pub use init::{init, InitArgs};
pub use rewrite::{rewrite, RewriteArgs};
pub use serve::{serve, ServeArgs};

/// Open the configured database, standing in the sample documents when
/// demo fallback is on and the database cannot be reached
pub fn open_store(config: &Config, cwd: &str) -> anyhow::Result<Arc<dyn ContentStore>> {
    let path = config.database_path(cwd);
    match SqliteStore::open(&path) {
        Ok(store) if config.demo_fallback => Ok(Arc::new(FallbackStore::new(
            store,
            MemoryStore::with_samples(),
        ))),
        Ok(store) => Ok(Arc::new(store)),
        Err(err) if config.demo_fallback && err.is_unavailable() => {
            tracing::warn!("{}, serving demo documents", err);
            println!(
                "{} Database unavailable, using sample documents",
                "⚠️".yellow()
            );
            Ok(Arc::new(MemoryStore::with_samples()))
        }
        Err(err) => Err(err.into()),
    }
}
