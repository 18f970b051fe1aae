//! History store trait

use crate::error::StoreError;
use crate::record::HistoryRecord;
use async_trait::async_trait;

/// Append-only storage for classification history
///
/// Implementations never mutate or delete a record once appended.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a record
    async fn append(&self, record: HistoryRecord) -> Result<(), StoreError>;

    /// Up to `limit` records, newest first
    async fn recent_first(&self, limit: usize) -> Result<Vec<HistoryRecord>, StoreError>;

    /// Backend name for logs
    fn name(&self) -> &str;
}
