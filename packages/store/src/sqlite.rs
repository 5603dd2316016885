//! SQLite persistence for documents.
//!
//! One `documents` table. Timestamps are microseconds since the epoch, the
//! same precision [`now_micros`] hands out, so a reloaded record compares
//! equal to the one that was written.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_common::{
    now_micros, ContentStore, Document, DocumentId, DocumentPatch, NewDocument, StoreError,
    StoreResult,
};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_updated ON documents(updated_at DESC, id DESC);
"#;

const COLUMNS: &str = "id, title, content, created_at, updated_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|err| {
            StoreError::unavailable(format!("cannot open {}: {}", path.display(), err))
        })?;
        tracing::debug!("Opened document database {}", path.display());
        Self::init(conn)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA).map_err(classify)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn unavailable(err: rusqlite::Error) -> StoreError {
    StoreError::unavailable(err.to_string())
}

/// Busy, locked and unopenable databases count as unavailable
fn classify(err: rusqlite::Error) -> StoreError {
    match err.sqlite_error_code() {
        Some(ErrorCode::CannotOpen | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
            unavailable(err)
        }
        _ => StoreError::backend(err.to_string()),
    }
}

fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

fn from_micros(micros: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or(rusqlite::Error::IntegralValueOutOfRange(3, micros))
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: from_micros(row.get(3)?)?,
        updated_at: from_micros(row.get(4)?)?,
    })
}

fn fetch(conn: &Connection, id: DocumentId) -> rusqlite::Result<Option<Document>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM documents WHERE id = ?1"),
        params![id],
        document_from_row,
    )
    .optional()
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn create(&self, input: NewDocument) -> StoreResult<Document> {
        input.validate()?;
        let conn = self.conn.lock().await;
        let now = now_micros();
        conn.execute(
            "INSERT INTO documents (title, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![input.title, input.content, to_micros(now)],
        )
        .map_err(classify)?;

        let document = Document {
            id: conn.last_insert_rowid(),
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
        };
        tracing::debug!("Created document {}", document.id);
        Ok(document)
    }

    async fn list(&self) -> StoreResult<Vec<Document>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM documents ORDER BY updated_at DESC, id DESC"
            ))
            .map_err(classify)?;
        let rows = stmt.query_map([], document_from_row).map_err(classify)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(classify)
    }

    async fn get(&self, id: DocumentId) -> StoreResult<Option<Document>> {
        let conn = self.conn.lock().await;
        fetch(&conn, id).map_err(classify)
    }

    async fn update(&self, id: DocumentId, patch: DocumentPatch) -> StoreResult<Option<Document>> {
        patch.validate()?;
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(classify)?;

        let Some(mut document) = fetch(&tx, id).map_err(classify)? else {
            return Ok(None);
        };
        patch.apply_to(&mut document);
        tx.execute(
            "UPDATE documents SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
            params![document.title, document.content, to_micros(document.updated_at), id],
        )
        .map_err(classify)?;
        tx.commit().map_err(classify)?;

        tracing::debug!("Updated document {}", id);
        Ok(Some(document))
    }

    async fn delete(&self, id: DocumentId) -> StoreResult<bool> {
        let conn = self.conn.lock().await;
        let removed = conn
            .execute("DELETE FROM documents WHERE id = ?1", params![id])
            .map_err(classify)?;
        Ok(removed > 0)
    }
}
