use crate::{Result, StateStore};
use async_trait::async_trait;
use chrono::Utc;
use fleetmon_common::types::AlertState;
use std::collections::HashMap;
use tokio::sync::RwLock;

struct StoredValue {
    json: String,
    expires_at: i64,
}

/// In-memory state store for tests and single-process deployments.
pub struct MemoryStateStore {
    records: RwLock<HashMap<i64, StoredValue>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Stores a raw value without going through serialization. Lets tests
    /// exercise the corrupt-record path.
    pub async fn put_raw(&self, node_id: i64, value: &str, ttl_secs: u64) {
        let mut records = self.records.write().await;
        records.insert(
            node_id,
            StoredValue {
                json: value.to_string(),
                expires_at: Utc::now().timestamp() + ttl_secs as i64,
            },
        );
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, node_id: i64) -> Result<Option<AlertState>> {
        let mut records = self.records.write().await;
        let Some(stored) = records.get(&node_id) else {
            return Ok(None);
        };
        if stored.expires_at <= Utc::now().timestamp() {
            records.remove(&node_id);
            return Ok(None);
        }
        match serde_json::from_str::<AlertState>(&stored.json) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(node_id, error = %e, "Discarding corrupt state record");
                records.remove(&node_id);
                Ok(None)
            }
        }
    }

    async fn put(&self, state: &AlertState, ttl_secs: u64) -> Result<()> {
        let json = serde_json::to_string(state)?;
        let mut records = self.records.write().await;
        records.insert(
            state.node_id,
            StoredValue {
                json,
                expires_at: Utc::now().timestamp() + ttl_secs as i64,
            },
        );
        Ok(())
    }

    async fn delete(&self, node_id: i64) -> Result<()> {
        let mut records = self.records.write().await;
        records.remove(&node_id);
        Ok(())
    }
}
