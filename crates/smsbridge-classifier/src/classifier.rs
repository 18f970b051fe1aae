//! Classifier trait

use crate::error::InvocationError;
use async_trait::async_trait;
use smsbridge_core::{ClassificationRequest, ClassificationResult};

/// Trait for anything that can classify a validated request
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given request
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, InvocationError>;

    /// Get the classifier name
    fn name(&self) -> &str;
}
