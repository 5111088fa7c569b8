//! # Wiki Pages
//!
//! A title-keyed page resource: load by exact title, save as an upsert.
//! Pages are served as JSON; there is no template rendering here.

use std::sync::{Arc, OnceLock};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::rest_api::{ApiError, ApiResult};
use crate::store::PageStore;

/// A wiki page, addressed by its title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of a page save request.
#[derive(Debug, Deserialize)]
pub struct SavePageRequest {
    pub content: String,
}

/// Titles are a single alphanumeric path segment.
fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[a-zA-Z0-9]+$").expect("valid title pattern"))
}

/// Validate a page title from the path.
pub fn parse_title(raw: &str) -> ApiResult<&str> {
    if title_pattern().is_match(raw) {
        Ok(raw)
    } else {
        Err(ApiError::MalformedRequest(format!(
            "invalid page title '{raw}'"
        )))
    }
}

/// Build the wiki routes.
pub fn wiki_routes<S: PageStore + 'static>(store: Arc<S>) -> Router {
    Router::new()
        .route("/:title", get(view_page::<S>).put(save_page::<S>))
        .with_state(store)
}

async fn view_page<S: PageStore>(
    State(store): State<Arc<S>>,
    Path(title): Path<String>,
) -> Result<Json<Page>, ApiError> {
    let title = parse_title(&title)?;
    match store.load_page(title)? {
        Some(page) => Ok(Json(page)),
        None => Err(ApiError::NotFound),
    }
}

async fn save_page<S: PageStore>(
    State(store): State<Arc<S>>,
    Path(title): Path<String>,
    body: Result<Json<SavePageRequest>, JsonRejection>,
) -> Result<Json<Page>, ApiError> {
    let title = parse_title(&title)?;
    let Json(request) =
        body.map_err(|rejection| ApiError::MalformedRequest(rejection.body_text()))?;
    Ok(Json(store.save_page(title, &request.content)?))
}
