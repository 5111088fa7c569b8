//! # Response Formatting

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::record::Record;

/// List response wrapping the records under the collection key,
/// e.g. `{"labels": [...]}`.
#[derive(Debug, Clone)]
pub struct ListResponse {
    collection: &'static str,
    items: Vec<Record>,
}

impl ListResponse {
    pub fn new(collection: &'static str, items: Vec<Record>) -> Self {
        Self { collection, items }
    }
}

impl Serialize for ListResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.collection, &self.items)?;
        map.end()
    }
}
