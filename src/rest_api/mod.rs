//! # Pinboard REST API Module
//!
//! CRUD endpoints over schema-driven record resources, backed by an
//! injected record store capability.

pub mod errors;
pub mod handler;
pub mod record;
pub mod response;
pub mod routes;
pub mod schema;

pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use handler::{ResourceHandler, LIST_LIMIT};
pub use record::{Fields, Record};
pub use response::ListResponse;
pub use routes::resource_routes;
pub use schema::{Column, ResourceSchema, LABELS, POSTS};
