//! SQL schema for the busload SQLite store.
//!
//! Executed once at connection startup. Idempotent, so reopening an existing
//! log never touches prior rows.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Readings are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS logs (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    ts        INTEGER NOT NULL,   -- unix seconds; server-assigned
    count     INTEGER NOT NULL,
    capacity  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS logs_recent_idx ON logs(ts, id);

PRAGMA user_version = 1;
";
