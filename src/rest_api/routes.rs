//! # Resource Routes
//!
//! Axum glue translating HTTP requests into resource handler calls. The
//! handler owns the outcome; this layer only extracts the id and body and
//! picks the success status.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use super::handler::ResourceHandler;
use super::record::Record;
use super::response::ListResponse;
use crate::store::RecordStore;

/// Shared state type
type HandlerState<S> = Arc<ResourceHandler<S>>;

/// Build the five CRUD routes for one resource.
pub fn resource_routes<S: RecordStore + 'static>(handler: ResourceHandler<S>) -> Router {
    Router::new()
        .route("/", get(list_records::<S>).post(create_record::<S>))
        .route(
            "/:id",
            get(get_record::<S>)
                .put(update_record::<S>)
                .delete(delete_record::<S>),
        )
        .with_state(Arc::new(handler))
}

/// Parse a path segment as a record id.
fn parse_id(raw: &str) -> ApiResult<u64> {
    raw.parse::<u64>()
        .map_err(|_| ApiError::MalformedRequest(format!("invalid record id '{raw}'")))
}

/// Unwrap a JSON body, mapping rejections onto the error taxonomy.
fn parse_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::MalformedRequest(rejection.body_text()))
}

async fn list_records<S: RecordStore>(
    State(handler): State<HandlerState<S>>,
) -> Result<Json<ListResponse>, ApiError> {
    let items = handler.list()?;
    Ok(Json(ListResponse::new(handler.collection(), items)))
}

async fn get_record<S: RecordStore>(
    State(handler): State<HandlerState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    Ok(Json(handler.get(parse_id(&id)?)?))
}

async fn create_record<S: RecordStore>(
    State(handler): State<HandlerState<S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let payload = parse_body(body)?;
    let record = handler.create(&payload)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_record<S: RecordStore>(
    State(handler): State<HandlerState<S>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Record>, ApiError> {
    let id = parse_id(&id)?;
    let payload = parse_body(body)?;
    Ok(Json(handler.update(id, &payload)?))
}

async fn delete_record<S: RecordStore>(
    State(handler): State<HandlerState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    handler.delete(parse_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}
