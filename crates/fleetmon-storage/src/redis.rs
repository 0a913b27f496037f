use crate::{Result, StateStore};
use async_trait::async_trait;
use fleetmon_common::types::AlertState;
use redis::AsyncCommands;

/// Key prefix for per-node state records.
const KEY_PREFIX: &str = "fleetmon:status:";

/// Redis-backed state store. Expiry is delegated to Redis (`SET ... EX`).
pub struct RedisStateStore {
    client: redis::Client,
}

impl RedisStateStore {
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    fn key(node_id: i64) -> String {
        format!("{KEY_PREFIX}{node_id}")
    }
}

#[async_trait]
impl StateStore for RedisStateStore {
    async fn get(&self, node_id: i64) -> Result<Option<AlertState>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(Self::key(node_id)).await?;
        let Some(text) = value else {
            return Ok(None);
        };
        match serde_json::from_str::<AlertState>(&text) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(node_id, error = %e, "Discarding corrupt state record");
                let _: () = conn.del(Self::key(node_id)).await?;
                Ok(None)
            }
        }
    }

    async fn put(&self, state: &AlertState, ttl_secs: u64) -> Result<()> {
        let json = serde_json::to_string(state)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(Self::key(state.node_id), json, ttl_secs).await?;
        Ok(())
    }

    async fn delete(&self, node_id: i64) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(Self::key(node_id)).await?;
        Ok(())
    }
}
