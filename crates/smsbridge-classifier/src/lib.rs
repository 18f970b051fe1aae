//! smsbridge Classifier
//!
//! Delegates text classification to an external, one-shot process.
//!
//! - [`ProcessClassifier`] starts one child process per call, bounded by a
//!   concurrency limit and an optional deadline
//! - [`ClassificationService`] validates inbound payloads and is the single
//!   `classify` entry point shared by every transport

pub mod classifier;
pub mod config;
pub mod error;
pub mod process;
pub mod service;

pub use classifier::Classifier;
pub use config::InvokerConfig;
pub use error::{ClassifyError, InvocationError};
pub use process::ProcessClassifier;
pub use service::ClassificationService;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::error::{ClassifyError, InvocationError};
    pub use crate::service::ClassificationService;
}
