//! # In-Memory Store
//!
//! Record and page store over process memory, mirroring the observable
//! behavior of the SQLite store. Used by tests and for ephemeral runs.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use super::errors::{StoreError, StoreResult};
use super::{PageStore, RecordStore};
use crate::rest_api::{Fields, Record, ResourceSchema};
use crate::wiki::Page;

#[derive(Default)]
struct Table {
    rows: Vec<Record>,
    next_id: u64,
}

/// Store keeping all rows in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
    pages: RwLock<HashMap<String, Page>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn find_by_id(&self, schema: &ResourceSchema, id: u64) -> StoreResult<Option<Record>> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables
            .get(schema.table)
            .and_then(|table| table.rows.iter().find(|r| r.id == id))
            .cloned())
    }

    fn find_with_limit(&self, schema: &ResourceSchema, limit: usize) -> StoreResult<Vec<Record>> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables
            .get(schema.table)
            .map(|table| table.rows.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn create(&self, schema: &ResourceSchema, fields: Fields) -> StoreResult<Record> {
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let table = tables.entry(schema.table).or_default();
        table.next_id += 1;

        // Columns absent from the payload default to the empty string,
        // matching the SQLite column defaults.
        let mut full = Fields::new();
        for column in schema.columns {
            let value = fields.get(column.name).cloned().unwrap_or_else(|| "".into());
            full.insert(column.name.to_string(), value);
        }

        let record = Record::new(table.next_id, full);
        table.rows.push(record.clone());
        Ok(record)
    }

    fn update_columns(&self, schema: &ResourceSchema, id: u64, fields: &Fields) -> StoreResult<()> {
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let row = tables
            .get_mut(schema.table)
            .and_then(|table| table.rows.iter_mut().find(|r| r.id == id))
            .ok_or(StoreError::MissingRow(schema.table))?;

        for (key, value) in fields {
            row.fields.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn delete(&self, schema: &ResourceSchema, id: u64) -> StoreResult<()> {
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        if let Some(table) = tables.get_mut(schema.table) {
            table.rows.retain(|r| r.id != id);
        }
        Ok(())
    }
}

impl PageStore for MemoryStore {
    fn load_page(&self, title: &str) -> StoreResult<Option<Page>> {
        let pages = self.pages.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(pages.get(title).cloned())
    }

    fn save_page(&self, title: &str, content: &str) -> StoreResult<Page> {
        let mut pages = self.pages.write().map_err(|_| StoreError::LockPoisoned)?;
        let now = Utc::now();
        let page = pages
            .entry(title.to_string())
            .and_modify(|p| {
                p.content = content.to_string();
                p.updated_at = now;
            })
            .or_insert_with(|| Page {
                title: title.to_string(),
                content: content.to_string(),
                created_at: now,
                updated_at: now,
            });
        Ok(page.clone())
    }
}
