//! # HTTP Server
//!
//! Builds the combined router (health, record resources, wiki pages) over
//! one shared store and runs it.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::HttpServerConfig;
use crate::rest_api::{resource_routes, ResourceHandler, LABELS, POSTS};
use crate::store::{PageStore, RecordStore};
use crate::wiki::wiki_routes;

/// HTTP server for the pinboard API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given store
    pub fn new<S>(store: Arc<S>, config: HttpServerConfig) -> Self
    where
        S: RecordStore + PageStore + 'static,
    {
        let router = build_router(store, &config);
        Self { config, router }
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        info!(address = %addr, "starting pinboard HTTP server");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

/// Build the combined router over one shared store.
pub fn build_router<S>(store: Arc<S>, config: &HttpServerConfig) -> Router
where
    S: RecordStore + PageStore + 'static,
{
    // Permissive CORS when no origins are configured, like the original
    // development setup; configured origins otherwise.
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(health_routes())
        .nest(
            "/api/posts",
            resource_routes(ResourceHandler::new(&POSTS, store.clone())),
        )
        .nest(
            "/api/labels",
            resource_routes(ResourceHandler::new(&LABELS, store.clone())),
        )
        .nest("/wiki", wiki_routes(store))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Liveness probe at root level
fn health_routes() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
