//! History store errors

/// Error raised by a history store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No store is configured
    #[error("no database configured")]
    Unavailable,

    /// File IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Record (de)serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors reported by the backing service
    #[error("store backend error: {0}")]
    Backend(String),
}

#[cfg(feature = "redis-store")]
impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Backend(format!("store task failed: {}", err))
    }
}
