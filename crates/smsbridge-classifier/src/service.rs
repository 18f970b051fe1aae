//! Shared classification service
//!
//! The single `classify` operation that both the HTTP and the WebSocket
//! adapters call into. Payload validation happens here, so a rejected payload
//! never reaches the classifier.

use crate::classifier::Classifier;
use crate::error::ClassifyError;
use smsbridge_core::{ClassificationRequest, ClassificationResult, ClassifyPayload};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Validates payloads and delegates them to a [`Classifier`]
#[derive(Clone)]
pub struct ClassificationService {
    classifier: Arc<dyn Classifier>,
    default_model: String,
}

impl ClassificationService {
    /// Create a new service
    pub fn new(classifier: Arc<dyn Classifier>, default_model: impl Into<String>) -> Self {
        Self {
            classifier,
            default_model: default_model.into(),
        }
    }

    /// Model used when a payload does not name one
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Name of the underlying classifier
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Validate a raw payload
    pub fn validate(&self, payload: ClassifyPayload) -> Result<ClassificationRequest, ClassifyError> {
        payload.into_request(&self.default_model).map_err(|e| {
            metrics::counter!("smsbridge_classifications_total", "outcome" => "rejected")
                .increment(1);
            ClassifyError::Rejected(e)
        })
    }

    /// Validate a payload and classify it
    pub async fn classify(
        &self,
        payload: ClassifyPayload,
    ) -> Result<(ClassificationRequest, ClassificationResult), ClassifyError> {
        let request = self.validate(payload)?;
        let result = self.classify_request(&request).await?;
        Ok((request, result))
    }

    /// Classify an already validated request
    pub async fn classify_request(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ClassifyError> {
        let start = Instant::now();
        debug!(model = %request.model, chars = request.text.len(), "Classifying");

        let outcome = self.classifier.classify(request).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("smsbridge_classifier_latency_ms").record(elapsed_ms);

        match outcome {
            Ok(result) => {
                metrics::counter!("smsbridge_classifications_total", "outcome" => "success")
                    .increment(1);
                info!(
                    model = %request.model,
                    prediction = %result.prediction,
                    elapsed_ms = elapsed_ms as u64,
                    "Classification complete"
                );
                Ok(result)
            }
            Err(e) => {
                metrics::counter!("smsbridge_classifications_total", "outcome" => e.kind())
                    .increment(1);
                warn!(model = %request.model, kind = e.kind(), "Classification failed: {}", e);
                Err(e.into())
            }
        }
    }
}
