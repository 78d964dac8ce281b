//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the notebook store.
//! - Apply schema migrations in deterministic order.
//! - Convert timestamps to and from their persisted form.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write notes before migrations succeed.
//! - Timestamps are persisted as epoch nanoseconds of the naive date-time,
//!   so integer order equals chronological order and no precision is lost.

use chrono::{DateTime, NaiveDateTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Converts a timestamp to its persisted epoch-nanosecond form.
///
/// Returns `None` outside the storable range (years 1677 through 2262).
pub fn timestamp_to_db(value: NaiveDateTime) -> Option<i64> {
    value.and_utc().timestamp_nanos_opt()
}

/// Converts a persisted epoch-nanosecond value back to a timestamp.
pub fn timestamp_from_db(value: i64) -> Option<NaiveDateTime> {
    let secs = value.div_euclid(NANOS_PER_SECOND);
    let nanos = u32::try_from(value.rem_euclid(NANOS_PER_SECOND)).ok()?;
    DateTime::from_timestamp(secs, nanos).map(|datetime| datetime.naive_utc())
}

/// Returns whether `value` fits the persisted timestamp form.
pub fn is_storable_timestamp(value: NaiveDateTime) -> bool {
    timestamp_to_db(value).is_some()
}
