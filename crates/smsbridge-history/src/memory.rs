//! In-process history store

use crate::error::StoreError;
use crate::record::HistoryRecord;
use crate::store::HistoryStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::VecDeque;

/// History kept in memory for the lifetime of the process
///
/// Records are held newest first and never evicted.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: RwLock<VecDeque<HistoryRecord>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, record: HistoryRecord) -> Result<(), StoreError> {
        self.records.write().push_front(record);
        Ok(())
    }

    async fn recent_first(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError> {
        let records = self.records.read();
        Ok(records.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
