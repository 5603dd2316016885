use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use folio_common::{Document, DocumentId, DocumentPatch, NewDocument};
use folio_editor::call_with_timeout;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteBody {
    pub selected_text: String,
    pub ai_command: String,
}

#[derive(Debug, Serialize)]
pub struct RewriteReply {
    pub text: String,
}

/// `Document` as 200, or a `null` body as 404
fn found(document: Option<Document>) -> Response {
    match document {
        Some(document) => Json(document).into_response(),
        None => (StatusCode::NOT_FOUND, Json(serde_json::Value::Null)).into_response(),
    }
}

pub async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn list_documents(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(state.store.list().await?))
}

pub async fn create_document(
    State(state): State<AppState>,
    Json(input): Json<NewDocument>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let document = state.store.create(input).await?;
    tracing::info!("Created document {} ({:?})", document.id, document.title);
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> ApiResult<Response> {
    Ok(found(state.store.get(id).await?))
}

pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
    Json(patch): Json<DocumentPatch>,
) -> ApiResult<Response> {
    Ok(found(state.store.update(id, patch).await?))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<DocumentId>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = state.store.delete(id).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

pub async fn rewrite(
    State(state): State<AppState>,
    Json(body): Json<RewriteBody>,
) -> ApiResult<Json<RewriteReply>> {
    tracing::debug!("Rewrite requested: {:?}", body.ai_command);
    let text = call_with_timeout(
        state.rewriter.as_ref(),
        &body.selected_text,
        &body.ai_command,
        state.rewrite_timeout,
    )
    .await?;
    Ok(Json(RewriteReply { text }))
}
