//! Error types for smsbridge

/// Result type alias using smsbridge's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for smsbridge operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required request field was absent or empty
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }
}
