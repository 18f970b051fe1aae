//! History recorder
//!
//! The handle the server holds. Built once at startup from
//! [`HistoryConfig`]; when no store is configured, or the configured one
//! cannot be reached, the recorder is disabled: appends are skipped and reads
//! report [`StoreError::Unavailable`].

use crate::config::{HistoryBackend, HistoryConfig};
use crate::error::StoreError;
use crate::jsonl::JsonlHistoryStore;
use crate::memory::MemoryHistoryStore;
use crate::record::{HistoryRecord, MAX_HISTORY_LIMIT};
use crate::store::HistoryStore;
use smsbridge_core::{ClassificationRequest, ClassificationResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Best-effort facade over an optional [`HistoryStore`]
#[derive(Clone, Default)]
pub struct HistoryRecorder {
    store: Option<Arc<dyn HistoryStore>>,
}

impl HistoryRecorder {
    /// A recorder backed by `store`
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A recorder with no store
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Build a recorder from configuration
    ///
    /// Initialization failures are logged and yield a disabled recorder.
    pub async fn from_config(config: &HistoryConfig) -> Self {
        match open_store(config).await {
            Ok(Some(store)) => {
                info!("History enabled ({} backend)", store.name());
                Self::new(store)
            }
            Ok(None) => {
                info!("History disabled");
                Self::disabled()
            }
            Err(e) => {
                warn!("History store init failed, continuing without history: {}", e);
                Self::disabled()
            }
        }
    }

    /// Whether a store is configured
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Name of the configured backend
    pub fn backend_name(&self) -> Option<&str> {
        self.store.as_deref().map(|s| s.name())
    }

    /// Record a successful classification
    ///
    /// Returns the stored record, or `None` when history is disabled or the
    /// write failed. Failures are logged, never returned.
    pub async fn record(
        &self,
        request: &ClassificationRequest,
        result: &ClassificationResult,
    ) -> Option<HistoryRecord> {
        let store = self.store.as_ref()?;
        let record = HistoryRecord::new(result.clone(), request.model.clone());

        match store.append(record.clone()).await {
            Ok(()) => {
                metrics::counter!("smsbridge_history_writes_total", "outcome" => "success")
                    .increment(1);
                debug!(id = %record.id, "History record appended");
                Some(record)
            }
            Err(e) => {
                metrics::counter!("smsbridge_history_writes_total", "outcome" => "failure")
                    .increment(1);
                warn!("History insert failed: {}", e);
                None
            }
        }
    }

    /// Most recent records, newest first, capped at [`MAX_HISTORY_LIMIT`]
    pub async fn recent_first(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let store = self.store.as_ref().ok_or(StoreError::Unavailable)?;
        store.recent_first(limit.min(MAX_HISTORY_LIMIT)).await
    }
}

async fn open_store(config: &HistoryConfig) -> Result<Option<Arc<dyn HistoryStore>>, StoreError> {
    let store: Arc<dyn HistoryStore> = match config.backend {
        HistoryBackend::None => return Ok(None),
        HistoryBackend::Memory => Arc::new(MemoryHistoryStore::new()),
        HistoryBackend::Jsonl => Arc::new(JsonlHistoryStore::open(&config.path)?),
        HistoryBackend::Redis => open_redis(config).await?,
    };
    Ok(Some(store))
}

#[cfg(feature = "redis-store")]
async fn open_redis(config: &HistoryConfig) -> Result<Arc<dyn HistoryStore>, StoreError> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| StoreError::Backend("redis backend requires a url".to_string()))?;
    let store = crate::redis_store::RedisHistoryStore::connect(url, config.key.clone()).await?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis-store"))]
async fn open_redis(_config: &HistoryConfig) -> Result<Arc<dyn HistoryStore>, StoreError> {
    Err(StoreError::Backend(
        "built without the redis-store feature".to_string(),
    ))
}
