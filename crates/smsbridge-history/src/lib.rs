//! smsbridge History
//!
//! Optional, append-only record of successful classifications.
//!
//! Provides:
//! - [`HistoryStore`], the storage seam, with in-memory, JSON-lines and
//!   (behind the `redis-store` feature) Redis implementations
//! - [`HistoryRecorder`], the best-effort facade the server talks to; it is
//!   a no-op when no store is configured

pub mod config;
pub mod error;
pub mod jsonl;
pub mod memory;
pub mod record;
pub mod recorder;
#[cfg(feature = "redis-store")]
pub mod redis_store;
pub mod store;

pub use config::{HistoryBackend, HistoryConfig};
pub use error::StoreError;
pub use jsonl::JsonlHistoryStore;
pub use memory::MemoryHistoryStore;
pub use record::{HistoryRecord, MAX_HISTORY_LIMIT};
pub use recorder::HistoryRecorder;
#[cfg(feature = "redis-store")]
pub use redis_store::RedisHistoryStore;
pub use store::HistoryStore;
