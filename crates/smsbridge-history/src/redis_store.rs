//! Redis history store
//!
//! Records are `LPUSH`ed as JSON onto a single list, so `LRANGE 0 n-1` is
//! already newest first. Nothing trims the list.

use crate::error::StoreError;
use crate::record::HistoryRecord;
use crate::store::HistoryStore;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

/// History kept in a Redis list
pub struct RedisHistoryStore {
    conn: ConnectionManager,
    key: String,
}

impl RedisHistoryStore {
    /// Connect to Redis and verify the connection
    pub async fn connect(url: &str, key: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let mut conn = ConnectionManager::new(client).await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;

        let key = key.into();
        info!("Connected to Redis history list {}", key);
        Ok(Self { conn, key })
    }
}

#[async_trait]
impl HistoryStore for RedisHistoryStore {
    async fn append(&self, record: HistoryRecord) -> Result<(), StoreError> {
        let payload = serde_json::to_string(&record)?;
        let mut conn = self.conn.clone();
        redis::cmd("LPUSH")
            .arg(&self.key)
            .arg(payload)
            .query_async::<_, i64>(&mut conn)
            .await?;
        Ok(())
    }

    async fn recent_first(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let raw: Vec<String> = redis::cmd("LRANGE")
            .arg(&self.key)
            .arg(0)
            .arg(limit as i64 - 1)
            .query_async(&mut conn)
            .await?;

        Ok(raw
            .iter()
            .filter_map(|entry| match serde_json::from_str(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("Skipping unreadable history entry: {}", e);
                    None
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        "redis"
    }
}
