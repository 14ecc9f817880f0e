//! Carbon-intensity store
//!
//! SQLite-backed time series of grid carbon-intensity readings per
//! location, queried for the lowest-intensity windows.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Inclusive bounds for the `lowest_intensity` result size.
pub const LIMIT_RANGE: std::ops::RangeInclusive<usize> = 1..=24;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS carbon_intensity (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    location TEXT NOT NULL,
    ts_utc TEXT NOT NULL,
    gco2_per_kwh REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ci_location_ts
    ON carbon_intensity(location, ts_utc);
";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("limit must be between 1 and 24, got {0}")]
    InvalidLimit(usize),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One stored reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityReading {
    pub ts_utc: String,
    pub gco2_per_kwh: f64,
}

/// Thread-safe handle to the intensity database.
///
/// The schema is applied once at open; callers never initialize it.
#[derive(Clone)]
pub struct IntensityStore {
    conn: Arc<Mutex<Connection>>,
}

impl IntensityStore {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory database, for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert one reading. A missing timestamp means "now".
    pub fn insert_reading(
        &self,
        location: &str,
        gco2_per_kwh: f64,
        ts_utc: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        let ts = ts_utc.unwrap_or_else(Utc::now).to_rfc3339();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO carbon_intensity (location, ts_utc, gco2_per_kwh)
             VALUES (?1, ?2, ?3)",
            params![location, ts, gco2_per_kwh],
        )?;
        Ok(())
    }

    /// The `limit` lowest-intensity readings for a location, ascending
    /// by intensity.
    pub fn lowest_intensity(
        &self,
        location: &str,
        limit: usize,
    ) -> StoreResult<Vec<IntensityReading>> {
        if !LIMIT_RANGE.contains(&limit) {
            return Err(StoreError::InvalidLimit(limit));
        }

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT ts_utc, gco2_per_kwh
             FROM carbon_intensity
             WHERE location = ?1
             ORDER BY gco2_per_kwh ASC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![location, limit as i64], |row| {
            Ok(IntensityReading {
                ts_utc: row.get(0)?,
                gco2_per_kwh: row.get(1)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, hour, 0, 0).unwrap()
    }

    fn seeded() -> IntensityStore {
        let store = IntensityStore::open_in_memory().unwrap();
        store.insert_reading("toronto", 120.0, Some(ts(8))).unwrap();
        store.insert_reading("toronto", 45.0, Some(ts(3))).unwrap();
        store.insert_reading("toronto", 80.0, Some(ts(14))).unwrap();
        store.insert_reading("montreal", 10.0, Some(ts(1))).unwrap();
        store
    }

    #[test]
    fn lowest_first_and_scoped_to_location() {
        let store = seeded();
        let rows = store.lowest_intensity("toronto", 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].gco2_per_kwh < rows[1].gco2_per_kwh);
        assert_eq!(rows[0].gco2_per_kwh, 45.0);
    }

    #[test]
    fn unknown_location_is_empty_not_an_error() {
        let store = seeded();
        let rows = store.lowest_intensity("atlantis", 5).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn limit_bounds_are_enforced() {
        let store = seeded();
        assert!(matches!(
            store.lowest_intensity("toronto", 0),
            Err(StoreError::InvalidLimit(0))
        ));
        assert!(matches!(
            store.lowest_intensity("toronto", 25),
            Err(StoreError::InvalidLimit(25))
        ));
        assert!(store.lowest_intensity("toronto", 24).is_ok());
    }

    #[test]
    fn persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intensity.db");

        {
            let store = IntensityStore::open(&path).unwrap();
            store.insert_reading("toronto", 33.0, Some(ts(5))).unwrap();
        }

        let store = IntensityStore::open(&path).unwrap();
        let rows = store.lowest_intensity("toronto", 1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].gco2_per_kwh, 33.0);
    }
}
