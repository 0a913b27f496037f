use crate::{Result, StateStore};
use async_trait::async_trait;
use chrono::Utc;
use fleetmon_common::types::AlertState;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed state store: a single key-value table with per-row expiry.
///
/// Expired and unparseable rows are dropped on read, so the table never
/// accumulates stale records for nodes that keep reporting.
pub struct SqliteStateStore {
    conn: Mutex<Connection>,
}

impl SqliteStateStore {
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS node_state (
                node_id    INTEGER PRIMARY KEY,
                state      TEXT NOT NULL,
                expires_at INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Removes every expired row. Returns the number of rows removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("state store mutex poisoned");
        let removed = conn.execute(
            "DELETE FROM node_state WHERE expires_at <= ?1",
            params![Utc::now().timestamp()],
        )?;
        Ok(removed)
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn get(&self, node_id: i64) -> Result<Option<AlertState>> {
        let conn = self.conn.lock().expect("state store mutex poisoned");
        let row: Option<(String, i64)> = conn
            .prepare_cached("SELECT state, expires_at FROM node_state WHERE node_id = ?1")?
            .query_row(params![node_id], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        let Some((text, expires_at)) = row else {
            return Ok(None);
        };
        if expires_at <= Utc::now().timestamp() {
            conn.execute("DELETE FROM node_state WHERE node_id = ?1", params![node_id])?;
            return Ok(None);
        }
        match serde_json::from_str::<AlertState>(&text) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(node_id, error = %e, "Discarding corrupt state record");
                conn.execute("DELETE FROM node_state WHERE node_id = ?1", params![node_id])?;
                Ok(None)
            }
        }
    }

    async fn put(&self, state: &AlertState, ttl_secs: u64) -> Result<()> {
        let json = serde_json::to_string(state)?;
        let expires_at = Utc::now().timestamp() + ttl_secs as i64;
        let conn = self.conn.lock().expect("state store mutex poisoned");
        conn.prepare_cached(
            "INSERT OR REPLACE INTO node_state (node_id, state, expires_at) VALUES (?1, ?2, ?3)",
        )?
        .execute(params![state.node_id, json, expires_at])?;
        Ok(())
    }

    async fn delete(&self, node_id: i64) -> Result<()> {
        let conn = self.conn.lock().expect("state store mutex poisoned");
        conn.execute("DELETE FROM node_state WHERE node_id = ?1", params![node_id])?;
        Ok(())
    }
}
