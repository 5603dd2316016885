//! # Folio Server
//!
//! JSON-over-HTTP surface for the content store and the rewrite service.
//!
//! | Method | Path | Body | Response |
//! |---|---|---|---|
//! | GET | `/healthcheck` | | `{status, timestamp}` |
//! | GET | `/documents` | | `Document[]`, most recent first |
//! | POST | `/documents` | `{title, content?}` | 201 `Document` |
//! | GET | `/documents/:id` | | `Document` or 404 `null` |
//! | PATCH | `/documents/:id` | `{title?, content?}` | `Document` or 404 `null` |
//! | DELETE | `/documents/:id` | | `{deleted}` |
//! | POST | `/rewrite` | `{selectedText, aiCommand}` | `{text}` |

mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use folio_common::ContentStore;
use folio_editor::RewriteService;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

const DEFAULT_REWRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub rewriter: Arc<dyn RewriteService>,
    pub rewrite_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, rewriter: Arc<dyn RewriteService>) -> Self {
        Self {
            store,
            rewriter,
            rewrite_timeout: DEFAULT_REWRITE_TIMEOUT,
        }
    }

    pub fn with_rewrite_timeout(mut self, timeout: Duration) -> Self {
        self.rewrite_timeout = timeout;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthcheck", get(routes::healthcheck))
        .route(
            "/documents",
            get(routes::list_documents).post(routes::create_document),
        )
        .route(
            "/documents/:id",
            get(routes::get_document)
                .patch(routes::update_document)
                .delete(routes::delete_document),
        )
        .route("/rewrite", post(routes::rewrite))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bind `addr` and serve until the listener fails
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Folio server listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}
