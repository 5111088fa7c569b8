//! # SQLite Store
//!
//! Record and page persistence backed by a single SQLite database file.
//! Tables are created on startup from the resource schemas; every column
//! besides the id is TEXT with an empty-string default, matching the
//! free-form string shape of the resources.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

use super::errors::{StoreError, StoreResult};
use super::{PageStore, RecordStore};
use crate::rest_api::{Fields, Record, ResourceSchema};
use crate::wiki::Page;

/// Busy timeout for concurrent access to the database file.
const BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

/// SQLite-backed store.
///
/// The connection is shared behind a mutex; each operation holds it for a
/// single statement, or a statement pair for insert-then-read.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and apply the pragmas.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::configure(Connection::open(path)?)
    }

    /// Open an ephemeral in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> StoreResult<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create the tables for the given schemas plus the pages table.
    pub fn migrate(&self, schemas: &[&ResourceSchema]) -> StoreResult<()> {
        let conn = self.lock()?;
        for schema in schemas {
            let columns: Vec<String> = schema
                .columns
                .iter()
                .map(|c| format!("{} TEXT NOT NULL DEFAULT ''", c.name))
                .collect();
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, {})",
                schema.table,
                columns.join(", ")
            );
            conn.execute(&sql, [])?;
        }
        conn.execute(
            "CREATE TABLE IF NOT EXISTS pages (
                 title TEXT PRIMARY KEY,
                 content TEXT NOT NULL DEFAULT '',
                 created_at TEXT NOT NULL,
                 updated_at TEXT NOT NULL
             )",
            [],
        )?;
        Ok(())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

fn to_i64(id: u64) -> StoreResult<i64> {
    i64::try_from(id).map_err(|_| StoreError::IdOutOfRange(id))
}

/// Comma-joined column list for SELECT statements.
fn column_list(schema: &ResourceSchema) -> String {
    schema
        .columns
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn row_to_record(schema: &ResourceSchema, row: &Row) -> rusqlite::Result<Record> {
    let id: u64 = row.get(0)?;
    let mut fields = Fields::new();
    for (index, column) in schema.columns.iter().enumerate() {
        let value: String = row.get(index + 1)?;
        fields.insert(column.name.to_string(), value.into());
    }
    Ok(Record::new(id, fields))
}

/// String value of a payload field; payloads are validated string-only
/// before they reach the store.
fn field_text(value: &serde_json::Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

impl RecordStore for SqliteStore {
    fn find_by_id(&self, schema: &ResourceSchema, id: u64) -> StoreResult<Option<Record>> {
        // An id outside the signed range cannot exist as a rowid.
        let Ok(id) = i64::try_from(id) else {
            return Ok(None);
        };

        let conn = self.lock()?;
        let sql = format!(
            "SELECT id, {} FROM {} WHERE id = ?1 LIMIT 1",
            column_list(schema),
            schema.table
        );
        let record = conn
            .query_row(&sql, params![id], |row| row_to_record(schema, row))
            .optional()?;
        Ok(record)
    }

    fn find_with_limit(&self, schema: &ResourceSchema, limit: usize) -> StoreResult<Vec<Record>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT id, {} FROM {} LIMIT ?1",
            column_list(schema),
            schema.table
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params![limit as i64])?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(row_to_record(schema, row)?);
        }
        Ok(records)
    }

    fn create(&self, schema: &ResourceSchema, fields: Fields) -> StoreResult<Record> {
        let id = {
            let conn = self.lock()?;
            if fields.is_empty() {
                let sql = format!("INSERT INTO {} DEFAULT VALUES", schema.table);
                conn.execute(&sql, [])?;
            } else {
                let names: Vec<&str> = fields.keys().map(String::as_str).collect();
                let placeholders: Vec<String> =
                    (1..=names.len()).map(|n| format!("?{n}")).collect();
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    schema.table,
                    names.join(", "),
                    placeholders.join(", ")
                );

                let values: Vec<String> = fields.values().map(field_text).collect();
                let params_refs: Vec<&dyn ToSql> =
                    values.iter().map(|v| v as &dyn ToSql).collect();
                conn.execute(&sql, params_refs.as_slice())?;
            }
            // Rowids assigned by AUTOINCREMENT are positive.
            conn.last_insert_rowid() as u64
        };

        // Re-read so the caller sees exactly what was stored, including
        // column defaults for fields the payload omitted.
        self.find_by_id(schema, id)?
            .ok_or(StoreError::MissingRow(schema.table))
    }

    fn update_columns(&self, schema: &ResourceSchema, id: u64, fields: &Fields) -> StoreResult<()> {
        let conn = self.lock()?;

        let mut assignments = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        for (index, (name, value)) in fields.iter().enumerate() {
            assignments.push(format!("{} = ?{}", name, index + 1));
            values.push(Box::new(field_text(value)));
        }
        values.push(Box::new(to_i64(id)?));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            schema.table,
            assignments.join(", "),
            fields.len() + 1
        );
        let params_refs: Vec<&dyn ToSql> = values.iter().map(|b| b.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;
        Ok(())
    }

    fn delete(&self, schema: &ResourceSchema, id: u64) -> StoreResult<()> {
        let conn = self.lock()?;
        let sql = format!("DELETE FROM {} WHERE id = ?1", schema.table);
        conn.execute(&sql, params![to_i64(id)?])?;
        Ok(())
    }
}

fn parse_timestamp(index: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                index,
                rusqlite::types::Type::Text,
                Box::new(err),
            )
        })
}

fn row_to_page(row: &Row) -> rusqlite::Result<Page> {
    let created_at: String = row.get(2)?;
    let updated_at: String = row.get(3)?;
    Ok(Page {
        title: row.get(0)?,
        content: row.get(1)?,
        created_at: parse_timestamp(2, &created_at)?,
        updated_at: parse_timestamp(3, &updated_at)?,
    })
}

impl PageStore for SqliteStore {
    fn load_page(&self, title: &str) -> StoreResult<Option<Page>> {
        let conn = self.lock()?;
        let page = conn
            .query_row(
                "SELECT title, content, created_at, updated_at FROM pages WHERE title = ?1",
                params![title],
                row_to_page,
            )
            .optional()?;
        Ok(page)
    }

    fn save_page(&self, title: &str, content: &str) -> StoreResult<Page> {
        let now = Utc::now();
        {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO pages (title, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)
                 ON CONFLICT(title) DO UPDATE SET content = ?2, updated_at = ?3",
                params![title, content, now.to_rfc3339()],
            )?;
        }
        self.load_page(title)?.ok_or(StoreError::MissingRow("pages"))
    }
}
