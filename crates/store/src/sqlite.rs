//! SQLite-backed cost store.
//!
//! Stores one row per (provider, service, region, currency, date) in a
//! `daily_costs` table. Upserts run inside a single transaction so a
//! failed batch leaves no partial state behind.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use cloudcost_core::{Error, NormalizedCostRow, Provider, Result};
use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::contract::CostStore;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS daily_costs (
    provider   TEXT NOT NULL,
    service    TEXT NOT NULL,
    region     TEXT NOT NULL,
    currency   TEXT NOT NULL,
    date       TEXT NOT NULL,
    cost       REAL NOT NULL,
    time_idx   INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (provider, service, region, currency, date)
);

CREATE INDEX IF NOT EXISTS idx_daily_costs_date ON daily_costs(date);
CREATE INDEX IF NOT EXISTS idx_daily_costs_provider ON daily_costs(provider);
";

const UPSERT_SQL: &str = "
INSERT INTO daily_costs (provider, service, region, currency, date, cost, time_idx)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT (provider, service, region, currency, date) DO UPDATE
SET cost = excluded.cost,
    time_idx = excluded.time_idx,
    created_at = datetime('now')
";

const READ_RECENT_SQL: &str = "
SELECT service, region, currency, date, cost, time_idx
FROM daily_costs
WHERE provider = ?1 AND date >= ?2 AND date <= ?3
ORDER BY date ASC, service ASC, region ASC, currency ASC
";

/// Cost store backed by a SQLite database.
pub struct SqliteCostStore {
    conn: Connection,
}

impl SqliteCostStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(db_err)?;
        info!(path = %path.as_ref().display(), "opened cost store");
        Self::with_connection(conn)
    }

    /// Open an in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL).map_err(db_err)?;
        Ok(Self { conn })
    }

    /// Total number of stored rows, across all providers.
    pub fn row_count(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM daily_costs", [], |r| r.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(db_err)
    }
}

impl CostStore for SqliteCostStore {
    fn upsert(&mut self, rows: &[NormalizedCostRow]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let tx = self.conn.transaction().map_err(db_err)?;
        let mut written = 0usize;
        {
            let mut stmt = tx.prepare_cached(UPSERT_SQL).map_err(db_err)?;
            for row in rows {
                written += stmt
                    .execute(params![
                        row.provider.as_str(),
                        row.service,
                        row.region,
                        row.currency,
                        row.date,
                        row.cost,
                        row.time_idx,
                    ])
                    .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;

        debug!(written, "upserted daily cost rows");
        Ok(written)
    }

    fn read_recent(
        &self,
        provider: Provider,
        lookback_days: u32,
        as_of: NaiveDate,
    ) -> Result<Vec<NormalizedCostRow>> {
        let start = as_of - Duration::days(lookback_days as i64 - 1);

        let mut stmt = self.conn.prepare_cached(READ_RECENT_SQL).map_err(db_err)?;
        let mapped = stmt
            .query_map(params![provider.as_str(), start, as_of], |r| {
                Ok(NormalizedCostRow {
                    provider,
                    service: r.get(0)?,
                    region: r.get(1)?,
                    currency: r.get(2)?,
                    date: r.get(3)?,
                    cost: r.get(4)?,
                    time_idx: r.get(5)?,
                })
            })
            .map_err(db_err)?;

        let mut rows = Vec::new();
        for row in mapped {
            rows.push(row.map_err(db_err)?);
        }
        Ok(rows)
    }
}

fn db_err(err: rusqlite::Error) -> Error {
    Error::database(err.to_string())
}
