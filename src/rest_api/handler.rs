//! # Resource Handler
//!
//! The CRUD core: executes one of five operations over a record schema,
//! backed by an injected record store capability.
//!
//! Each operation is atomic and stateless between calls: no retries, no
//! transactions, no shared handler state across requests. Update is a
//! read-then-write without a version check, so concurrent updates on the
//! same id race with whatever isolation the store provides.

use std::sync::Arc;

use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use super::record::{fields_from_payload, validate_create, validate_update, Record};
use super::schema::ResourceSchema;
use crate::store::RecordStore;

/// Fixed number of records returned by List.
pub const LIST_LIMIT: usize = 25;

/// CRUD operations over one record resource.
pub struct ResourceHandler<S> {
    schema: &'static ResourceSchema,
    store: Arc<S>,
}

impl<S: RecordStore> ResourceHandler<S> {
    pub fn new(schema: &'static ResourceSchema, store: Arc<S>) -> Self {
        Self { schema, store }
    }

    /// Collection key of the resource served by this handler
    pub fn collection(&self) -> &'static str {
        self.schema.collection
    }

    /// List up to [`LIST_LIMIT`] records, in store order.
    pub fn list(&self) -> ApiResult<Vec<Record>> {
        Ok(self.store.find_with_limit(self.schema, LIST_LIMIT)?)
    }

    /// Look up exactly one record by id.
    pub fn get(&self, id: u64) -> ApiResult<Record> {
        self.store
            .find_by_id(self.schema, id)?
            .ok_or(ApiError::NotFound)
    }

    /// Insert a new record; the store assigns the id.
    ///
    /// Required columns are validated before the store is touched.
    pub fn create(&self, payload: &Value) -> ApiResult<Record> {
        let fields = fields_from_payload(self.schema, payload)?;
        validate_create(self.schema, &fields)?;
        Ok(self.store.create(self.schema, fields)?)
    }

    /// Apply the columns present in the payload to an existing record.
    ///
    /// Column-level update: untouched columns keep their prior values. An
    /// empty field set changes nothing and confirms with the stored record.
    pub fn update(&self, id: u64, payload: &Value) -> ApiResult<Record> {
        let fields = fields_from_payload(self.schema, payload)?;
        validate_update(self.schema, &fields)?;

        let mut record = self
            .store
            .find_by_id(self.schema, id)?
            .ok_or(ApiError::NotFound)?;
        if fields.is_empty() {
            return Ok(record);
        }

        self.store.update_columns(self.schema, id, &fields)?;
        for (key, value) in fields {
            record.fields.insert(key, value);
        }
        Ok(record)
    }

    /// Delete a record by id.
    ///
    /// Lookup failures surface as store errors rather than being folded
    /// into "not found".
    pub fn delete(&self, id: u64) -> ApiResult<()> {
        match self.store.find_by_id(self.schema, id)? {
            Some(_) => Ok(self.store.delete(self.schema, id)?),
            None => Err(ApiError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest_api::record::Fields;
    use crate::rest_api::schema::{LABELS, POSTS};
    use crate::store::{MemoryStore, StoreError, StoreResult};
    use serde_json::json;

    /// Store whose every call fails, for exercising the error path.
    struct FailingStore;

    impl RecordStore for FailingStore {
        fn find_by_id(&self, _: &ResourceSchema, _: u64) -> StoreResult<Option<Record>> {
            Err(StoreError::LockPoisoned)
        }

        fn find_with_limit(&self, _: &ResourceSchema, _: usize) -> StoreResult<Vec<Record>> {
            Err(StoreError::LockPoisoned)
        }

        fn create(&self, _: &ResourceSchema, _: Fields) -> StoreResult<Record> {
            Err(StoreError::LockPoisoned)
        }

        fn update_columns(&self, _: &ResourceSchema, _: u64, _: &Fields) -> StoreResult<()> {
            Err(StoreError::LockPoisoned)
        }

        fn delete(&self, _: &ResourceSchema, _: u64) -> StoreResult<()> {
            Err(StoreError::LockPoisoned)
        }
    }

    fn label_handler() -> ResourceHandler<MemoryStore> {
        ResourceHandler::new(&LABELS, Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_create_then_get_round_trips() {
        let handler = label_handler();
        let created = handler
            .create(&json!({"text": "Hello!", "target": "dog"}))
            .unwrap();
        assert!(created.id > 0);

        let fetched = handler.get(created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.text("target"), Some("dog"));
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let handler = label_handler();
        assert!(matches!(handler.get(42), Err(ApiError::NotFound)));
    }

    #[test]
    fn test_create_without_target_is_invalid() {
        let handler = label_handler();
        let result = handler.create(&json!({"text": "no target"}));
        assert!(matches!(result, Err(ApiError::InvalidPayload(_))));
    }

    #[test]
    fn test_update_changes_only_present_columns() {
        let handler = label_handler();
        let created = handler
            .create(&json!({"text": "before", "target": "dog"}))
            .unwrap();

        let updated = handler
            .update(created.id, &json!({"text": "after"}))
            .unwrap();
        assert_eq!(updated.text("text"), Some("after"));
        assert_eq!(updated.text("target"), Some("dog"));

        let fetched = handler.get(created.id).unwrap();
        assert_eq!(fetched, updated);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let handler = label_handler();
        let result = handler.update(42, &json!({"text": "x"}));
        assert!(matches!(result, Err(ApiError::NotFound)));
    }

    #[test]
    fn test_update_with_no_known_columns_is_a_no_op() {
        let handler = label_handler();
        let created = handler
            .create(&json!({"text": "keep", "target": "dog"}))
            .unwrap();

        let confirmed = handler.update(created.id, &json!({})).unwrap();
        assert_eq!(confirmed, created);
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let handler = label_handler();
        let created = handler.create(&json!({"target": "dog"})).unwrap();

        handler.delete(created.id).unwrap();
        assert!(matches!(handler.get(created.id), Err(ApiError::NotFound)));
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let handler = label_handler();
        assert!(matches!(handler.delete(42), Err(ApiError::NotFound)));
    }

    #[test]
    fn test_list_caps_at_limit() {
        let handler = ResourceHandler::new(&POSTS, Arc::new(MemoryStore::new()));
        for n in 0..LIST_LIMIT + 5 {
            handler
                .create(&json!({ "message": format!("post {n}") }))
                .unwrap();
        }
        assert_eq!(handler.list().unwrap().len(), LIST_LIMIT);
    }

    #[test]
    fn test_store_failures_surface_as_store_errors() {
        let handler = ResourceHandler::new(&LABELS, Arc::new(FailingStore));

        assert!(matches!(handler.list(), Err(ApiError::Store(_))));
        assert!(matches!(handler.get(1), Err(ApiError::Store(_))));
        assert!(matches!(
            handler.create(&json!({"target": "dog"})),
            Err(ApiError::Store(_))
        ));
        assert!(matches!(
            handler.update(1, &json!({"text": "x"})),
            Err(ApiError::Store(_))
        ));
    }

    #[test]
    fn test_delete_lookup_failure_is_a_store_error_not_404() {
        let handler = ResourceHandler::new(&LABELS, Arc::new(FailingStore));
        assert!(matches!(handler.delete(1), Err(ApiError::Store(_))));
    }
}
