//! HTTP API tests driven through the router

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use folio_common::ContentStore;
use folio_editor::CannedRewriter;
use folio_server::{router, AppState};
use folio_store::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    app_with(Arc::new(MemoryStore::new()))
}

fn app_with(store: Arc<dyn ContentStore>) -> Router {
    router(AppState::new(store, Arc::new(CannedRewriter)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_healthcheck() {
    let (status, body) = send(&app(), "GET", "/healthcheck", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_document_crud() {
    let app = app();

    let (status, created) = send(
        &app,
        "POST",
        "/documents",
        Some(json!({ "title": "Notes" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Notes");
    assert_eq!(created["content"], "");
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/documents/{id}"),
        Some(json!({ "content": "<p>hi</p>" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Notes");
    assert_eq!(updated["content"], "<p>hi</p>");

    let (status, fetched) = send(&app, "GET", &format!("/documents/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (_, listed) = send(&app, "GET", "/documents", None).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (_, deleted) = send(&app, "DELETE", &format!("/documents/{id}"), None).await;
    assert_eq!(deleted, json!({ "deleted": true }));
    let (_, deleted) = send(&app, "DELETE", &format!("/documents/{id}"), None).await;
    assert_eq!(deleted, json!({ "deleted": false }));
}

#[tokio::test]
async fn test_missing_document_is_404_null() {
    let app = app();

    let (status, body) = send(&app, "GET", "/documents/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "PATCH", "/documents/77", Some(json!({ "title": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_blank_title_is_400() {
    let (status, body) = send(&app(), "POST", "/documents", Some(json!({ "title": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Title is required"));
}

#[tokio::test]
async fn test_rewrite_uses_canned_rules() {
    let (status, body) = send(
        &app(),
        "POST",
        "/rewrite",
        Some(json!({ "selectedText": "teh cat", "aiCommand": "Improve Grammar" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "[AI Grammar Improved]: teh cat");
}

#[tokio::test]
async fn test_samples_are_listed_most_recent_first() {
    let app = app_with(Arc::new(MemoryStore::with_samples()));
    let (_, listed) = send(&app, "GET", "/documents", None).await;
    let titles: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        titles,
        vec!["Welcome to the Document Editor", "Getting Started Guide"]
    );
}
