//! Persistence gateway for the catalog
//!
//! Row-level operations over SQLite. Single-statement operations accept any
//! executor (pool, pooled connection, or open transaction) so that callers can
//! compose them into one unit of work; operations that hydrate nested rows run
//! several statements and take the pool.

pub mod articles;
pub mod authors;
pub mod libraries;
pub mod profiles;

use chrono::{DateTime, Utc};
use jfl_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// Read a timestamp column written by this gateway
pub(crate) fn timestamp(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
    Ok(row.try_get::<DateTime<Utc>, _>(column)?)
}
