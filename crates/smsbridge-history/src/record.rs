//! History record type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smsbridge_core::ClassificationResult;

/// Most records a single history read returns
pub const MAX_HISTORY_LIMIT: usize = 200;

/// Record-level keys; same-named fields emitted by the process are dropped
const RECORD_FIELDS: &[&str] = &["id", "model", "timestamp"];

/// A persisted classification
///
/// The result's fields are flattened into the record, so a stored record reads
/// `{ "id", "input", "prediction", ..., "model", "timestamp" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Unique record ID
    pub id: String,

    /// The classification result
    #[serde(flatten)]
    pub result: ClassificationResult,

    /// Model the result was produced with
    pub model: String,

    /// When the record was created
    pub timestamp: DateTime<Utc>,
}

impl HistoryRecord {
    /// Create a record stamped with the current time
    pub fn new(mut result: ClassificationResult, model: impl Into<String>) -> Self {
        for key in RECORD_FIELDS {
            result.extra.remove(*key);
        }

        Self {
            id: generate_record_id(),
            result,
            model: model.into(),
            timestamp: Utc::now(),
        }
    }

    /// Override the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

fn generate_record_id() -> String {
    format!("pred_{}", uuid::Uuid::new_v4())
}
