//! # Records and Payloads
//!
//! The wire shape of a record, and parsing of request payloads against a
//! resource schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{ApiError, ApiResult};
use super::schema::ResourceSchema;

/// Column values keyed by column name.
pub type Fields = Map<String, Value>;

/// A stored record: the surrogate id plus its schema columns.
///
/// Serializes flat, e.g. `{"id": 1, "text": "hi", "target": "dog"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,

    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    pub fn new(id: u64, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// String value of a column, if present.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(Value::as_str)
    }
}

/// Parse a request body into the columns the schema knows about.
///
/// Unknown keys are dropped, as is any client-supplied `id` (ids are
/// store-assigned, never taken from the request). Known columns must hold
/// strings.
pub fn fields_from_payload(schema: &ResourceSchema, payload: &Value) -> ApiResult<Fields> {
    let object = payload.as_object().ok_or_else(|| {
        ApiError::MalformedRequest("request body must be a JSON object".to_string())
    })?;

    let mut fields = Fields::new();
    for (key, value) in object {
        if schema.column(key).is_none() {
            continue;
        }
        if !value.is_string() {
            return Err(ApiError::MalformedRequest(format!(
                "field '{}' must be a string",
                key
            )));
        }
        fields.insert(key.clone(), value.clone());
    }
    Ok(fields)
}

/// Validate a create payload: required columns must be present and non-empty.
pub fn validate_create(schema: &ResourceSchema, fields: &Fields) -> ApiResult<()> {
    for column in schema.columns.iter().filter(|c| c.required) {
        match fields.get(column.name).and_then(Value::as_str) {
            Some(value) if !value.is_empty() => {}
            _ => {
                return Err(ApiError::InvalidPayload(format!(
                    "missing required field '{}'",
                    column.name
                )))
            }
        }
    }
    Ok(())
}

/// Validate an update payload.
///
/// Updates are partial, so required columns are checked only when present.
pub fn validate_update(schema: &ResourceSchema, fields: &Fields) -> ApiResult<()> {
    for column in schema.columns.iter().filter(|c| c.required) {
        if let Some(value) = fields.get(column.name) {
            if value.as_str().map_or(true, str::is_empty) {
                return Err(ApiError::InvalidPayload(format!(
                    "field '{}' must be non-empty",
                    column.name
                )));
            }
        }
    }
    Ok(())
}
