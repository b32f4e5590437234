//! Repository layer: entity-scoped database operations.
//!
//! One sub-module per table. Functions take a borrowed `Connection` so
//! callers decide connection lifetime; multi-step operations open their
//! own transaction.

mod appointment;
mod medical_history;
mod patient;
mod patient_file;

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use uuid::Uuid;

pub use appointment::*;
pub use medical_history::*;
pub use patient::*;
pub use patient_file::*;

/// Current time at millisecond precision, so a value survives the
/// RFC 3339 round trip through a TEXT column unchanged.
pub(crate) fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn conversion_error<E>(col: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(col, Type::Text, Box::new(err))
}

pub(crate) fn column_uuid(row: &rusqlite::Row, col: usize) -> Result<Uuid, rusqlite::Error> {
    let raw: String = row.get(col)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_error(col, e))
}

pub(crate) fn column_timestamp(
    row: &rusqlite::Row,
    col: usize,
) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(col)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(col, e))
}

pub(crate) fn column_date(row: &rusqlite::Row, col: usize) -> Result<NaiveDate, rusqlite::Error> {
    let raw: String = row.get(col)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| conversion_error(col, e))
}

pub(crate) fn column_opt_date(
    row: &rusqlite::Row,
    col: usize,
) -> Result<Option<NaiveDate>, rusqlite::Error> {
    match row.get::<_, Option<String>>(col)? {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| conversion_error(col, e)),
        None => Ok(None),
    }
}

pub(crate) fn column_json<T: serde::de::DeserializeOwned>(
    row: &rusqlite::Row,
    col: usize,
) -> Result<T, rusqlite::Error> {
    let raw: String = row.get(col)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(col, e))
}
