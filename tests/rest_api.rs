//! REST API integration tests
//!
//! Drives the full router over the in-memory store, request to response.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use pinboard::http_server::{build_router, HttpServerConfig};
use pinboard::rest_api::{Fields, LABELS, LIST_LIMIT, POSTS};
use pinboard::store::{MemoryStore, RecordStore};

fn test_router() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let router = build_router(store.clone(), &HttpServerConfig::default());
    (router, store)
}

fn seed_label(store: &MemoryStore, text: &str, target: &str) -> u64 {
    let mut fields = Fields::new();
    fields.insert("text".to_string(), json!(text));
    fields.insert("target".to_string(), json!(target));
    store.create(&LABELS, fields).expect("seed label").id
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

#[tokio::test]
async fn test_create_label_returns_the_created_record() {
    let (router, _store) = test_router();

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/labels",
            json!({"text": "Testing Create Label", "target": "building"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_u64().expect("id") > 0);
    assert_eq!(body["text"], "Testing Create Label");
    assert_eq!(body["target"], "building");
}

#[tokio::test]
async fn test_create_label_without_target_is_rejected() {
    let (router, _store) = test_router();

    let (status, _body) = send(
        &router,
        json_request("POST", "/api/labels", json!({"text": "Testing Create Label"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let (router, _store) = test_router();

    let (_, created) = send(
        &router,
        json_request("POST", "/api/labels", json!({"text": "hi", "target": "dog"})),
    )
    .await;
    let id = created["id"].as_u64().expect("id");

    let (status, fetched) = send(&router, get_request(&format!("/api/labels/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_missing_record_is_404() {
    let (router, _store) = test_router();

    let (status, _body) = send(&router, get_request("/api/labels/12345")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_malformed_id_is_400() {
    let (router, _store) = test_router();

    let (status, _body) = send(&router, get_request("/api/labels/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let (router, store) = test_router();
    let id = seed_label(&store, "To Be Deleted", "dog");

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/labels/{id}"))
        .body(Body::empty())
        .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert!(bytes.is_empty());

    let (status, _body) = send(&router, get_request(&format!("/api/labels/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_missing_record_is_404() {
    let (router, _store) = test_router();

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/labels/999")
        .body(Body::empty())
        .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_echoes_and_persists_the_change() {
    let (router, store) = test_router();
    let id = seed_label(&store, "To Be Updated", "dog");

    let (status, updated) = send(
        &router,
        json_request(
            "PUT",
            &format!("/api/labels/{id}"),
            json!({"text": "I am updated!"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["text"], "I am updated!");
    assert_eq!(updated["id"].as_u64(), Some(id));

    // Untouched column keeps its prior value, and the change is persisted.
    let (_, fetched) = send(&router, get_request(&format!("/api/labels/{id}"))).await;
    assert_eq!(fetched["text"], "I am updated!");
    assert_eq!(fetched["target"], "dog");
}

#[tokio::test]
async fn test_update_missing_record_is_404() {
    let (router, _store) = test_router();

    let (status, _body) = send(
        &router,
        json_request("PUT", "/api/labels/999", json!({"text": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_is_wrapped_and_capped() {
    let (router, store) = test_router();
    for n in 0..LIST_LIMIT + 5 {
        let mut fields = Fields::new();
        fields.insert("message".to_string(), json!(format!("post {n}")));
        store.create(&POSTS, fields).expect("seed post");
    }

    let (status, body) = send(&router, get_request("/api/posts")).await;
    assert_eq!(status, StatusCode::OK);

    let posts = body["posts"].as_array().expect("wrapped list");
    assert_eq!(posts.len(), LIST_LIMIT);
}

#[tokio::test]
async fn test_create_ignores_client_supplied_id() {
    let (router, _store) = test_router();

    let (status, body) = send(
        &router,
        json_request("POST", "/api/posts", json!({"id": 999, "message": "hi"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"].as_u64(), Some(1));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (router, _store) = test_router();

    let request = Request::builder()
        .method("POST")
        .uri("/api/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .expect("request");
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_probe() {
    let (router, _store) = test_router();

    let (status, body) = send(&router, get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
