//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store failures.
///
/// Every store failure is terminal for the request that triggered it; the
/// API layer maps all of them onto a generic server failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite call failed
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// In-process store lock was poisoned
    #[error("store lock poisoned")]
    LockPoisoned,

    /// A row expected to exist was not there
    #[error("row missing in table '{0}'")]
    MissingRow(&'static str),

    /// Identifier does not fit the SQLite integer range
    #[error("id {0} exceeds the SQLite integer range")]
    IdOutOfRange(u64),
}
