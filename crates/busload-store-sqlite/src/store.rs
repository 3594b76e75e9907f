//! [`SqliteStore`] — the SQLite implementation of [`ReadingStore`].

use std::path::Path;

use chrono::Utc;

use busload_core::{
  reading::{NewReading, Reading},
  store::{DEFAULT_RECENT_LIMIT, ReadingStore},
};

use crate::{Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A reading log backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ReadingStore impl ───────────────────────────────────────────────────────

impl ReadingStore for SqliteStore {
  type Error = crate::Error;

  async fn append(&self, input: NewReading) -> Result<Reading> {
    let NewReading { count, capacity } = input;

    let reading = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // Clamp to the newest stored timestamp so a clock stepping backwards
        // can never break the ts/id ordering.
        let now = Utc::now().timestamp();
        let newest: Option<i64> =
          tx.query_row("SELECT MAX(ts) FROM logs", [], |r| r.get(0))?;
        let ts = newest.map_or(now, |newest| newest.max(now));

        tx.execute(
          "INSERT INTO logs (ts, count, capacity) VALUES (?1, ?2, ?3)",
          rusqlite::params![ts, count, capacity],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Reading { id, timestamp: ts, count, capacity })
      })
      .await?;

    Ok(reading)
  }

  async fn recent(&self, limit: Option<usize>) -> Result<Vec<Reading>> {
    let limit_val =
      i64::try_from(limit.unwrap_or(DEFAULT_RECENT_LIMIT)).unwrap_or(i64::MAX);

    let readings = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, ts, count, capacity
           FROM logs
           ORDER BY ts DESC, id DESC
           LIMIT ?1",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![limit_val], |row| {
            Ok(Reading {
              id:        row.get(0)?,
              timestamp: row.get(1)?,
              count:     row.get(2)?,
              capacity:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    Ok(readings)
  }
}
