//! smsbridge Core
//!
//! Types and error handling shared across smsbridge components.
//!
//! This crate provides:
//! - The inbound classification payload and its validated request form
//! - The structured result emitted by the external classification process
//! - The crate-level error type and result alias

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    ClassificationRequest, ClassificationResult, ClassifyPayload, PreprocessingSteps,
    Probabilities, DEFAULT_MODEL,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassificationRequest, ClassificationResult, ClassifyPayload};
}
