//! Durable per-node alert state.
//!
//! The evaluation cycle persists one [`AlertState`] record per node between
//! polling cycles, keyed by node identity, with a time-to-live so a crashed
//! or paused monitor self-heals instead of keeping stale breaches alive.
//! The default backend ([`sqlite::SqliteStateStore`]) keeps a single
//! key-value table in SQLite; `RedisStateStore` (cargo feature
//! `redis-store`) targets deployments that already run Redis.

pub mod memory;
pub mod sqlite;

#[cfg(feature = "redis-store")]
pub mod redis;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use fleetmon_common::types::AlertState;

/// Errors that can occur within the state store layer.
///
/// # Examples
///
/// ```rust
/// use fleetmon_storage::StorageError;
///
/// let err = StorageError::Other("store unavailable".to_string());
/// assert!(err.to_string().contains("unavailable"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An underlying SQLite error.
    #[error("state store: SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON encoding failure when serializing a state record for storage.
    #[error("state store: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An underlying Redis error.
    #[cfg(feature = "redis-store")]
    #[error("state store: Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    /// Generic store error for cases not covered by other variants.
    #[error("state store: {0}")]
    Other(String),
}

/// Convenience `Result` alias for state store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Key-value persistence of per-node alert state with expiry.
///
/// Implementations serialize [`AlertState`] to JSON text and must serialize
/// concurrent operations on the same node key. A stored record that no
/// longer parses is discarded and reported as absent; the cycle then starts
/// that node from a clean state rather than failing.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the state for one node, or `None` if absent, expired, or
    /// unreadable.
    async fn get(&self, node_id: i64) -> Result<Option<AlertState>>;

    /// Persists the state for `state.node_id`, replacing any prior record,
    /// valid for `ttl_secs` seconds.
    async fn put(&self, state: &AlertState, ttl_secs: u64) -> Result<()>;

    /// Removes the record for one node. Removing an absent record is not an
    /// error.
    async fn delete(&self, node_id: i64) -> Result<()>;
}
