//! # Record Store
//!
//! Capability traits for the persistence the handlers consume, plus the
//! SQLite-backed and in-memory implementations. The store is synchronous
//! from the caller's point of view; a handler blocks on these calls for
//! the duration of one request.

pub mod errors;
pub mod memory;
pub mod sqlite;

use crate::rest_api::{Fields, Record, ResourceSchema};
use crate::wiki::Page;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// CRUD primitives over persisted rows, keyed by a surrogate integer id.
pub trait RecordStore: Send + Sync {
    /// Find one record by id; `None` when no row matches.
    fn find_by_id(&self, schema: &ResourceSchema, id: u64) -> StoreResult<Option<Record>>;

    /// Return up to `limit` records, in store order.
    fn find_with_limit(&self, schema: &ResourceSchema, limit: usize) -> StoreResult<Vec<Record>>;

    /// Insert a record built from `fields`, assigning its id.
    fn create(&self, schema: &ResourceSchema, fields: Fields) -> StoreResult<Record>;

    /// Change exactly the given columns of the record with `id`.
    fn update_columns(&self, schema: &ResourceSchema, id: u64, fields: &Fields) -> StoreResult<()>;

    /// Hard-delete the record with `id`.
    fn delete(&self, schema: &ResourceSchema, id: u64) -> StoreResult<()>;
}

/// Persistence for wiki pages, keyed by title.
pub trait PageStore: Send + Sync {
    /// Load a page by exact title.
    fn load_page(&self, title: &str) -> StoreResult<Option<Page>>;

    /// Create the page or replace its content, stamping `updated_at`.
    fn save_page(&self, title: &str, content: &str) -> StoreResult<Page>;
}
