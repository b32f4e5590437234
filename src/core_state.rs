//! Shared application state handed to every request handler.
//!
//! SQLite connections are opened per request from `db_path`. Concurrent
//! writers are serialized by SQLite itself (WAL + busy timeout).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::ServerConfig;
use crate::db::{self, DatabaseError};

pub struct CoreState {
    db_path: PathBuf,
    started_at: DateTime<Utc>,
    requests_served: AtomicU64,
}

impl CoreState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            started_at: Utc::now(),
            requests_served: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.db_path.clone())
    }

    /// Create the database file (and parent directory) and apply
    /// migrations, so the first request doesn't pay for it.
    pub fn initialize(&self) -> Result<(), DatabaseError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::MigrationFailed {
                        version: 0,
                        reason: format!("cannot create {}: {e}", parent.display()),
                    }
                })?;
            }
        }
        self.open_db().map(|_| ())
    }

    /// Open a database connection. Most common operation in handlers.
    pub fn open_db(&self) -> Result<rusqlite::Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Today's date in UTC, used for "not in the future" checks.
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    pub fn record_request(&self) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_creates_database_in_new_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("clinic.db");
        let core = CoreState::new(&path);

        core.initialize().unwrap();
        assert!(path.exists());

        let conn = core.open_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 5);
    }

    #[test]
    fn request_counter_increments() {
        let core = CoreState::new("unused.db");
        assert_eq!(core.requests_served(), 0);
        core.record_request();
        core.record_request();
        assert_eq!(core.requests_served(), 2);
    }
}
