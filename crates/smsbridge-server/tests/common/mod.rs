//! Shared fixtures for server integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use smsbridge_classifier::{ClassificationService, Classifier, InvocationError};
use smsbridge_core::{ClassificationRequest, ClassificationResult};
use smsbridge_history::{HistoryRecorder, MemoryHistoryStore};
use smsbridge_server::config::{DescriptorConfig, ServerConfig};
use smsbridge_server::server::build_app;
use smsbridge_server::state::AppState;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Classifier that records calls and answers with a fixed outcome
pub struct SpyClassifier {
    outcome: Result<ClassificationResult, InvocationError>,
    call_count: AtomicU32,
}

impl SpyClassifier {
    pub fn new(outcome: Result<ClassificationResult, InvocationError>) -> Self {
        Self {
            outcome,
            call_count: AtomicU32::new(0),
        }
    }

    /// Answer every call with `prediction`, echoing the input text
    pub fn predicting(prediction: serde_json::Value) -> Self {
        Self::new(Ok(ClassificationResult::new("", prediction)))
    }

    pub fn failing(error: InvocationError) -> Self {
        Self::new(Err(error))
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for SpyClassifier {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, InvocationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map(|mut result| {
            result.input = request.text.clone();
            result
        })
    }

    fn name(&self) -> &str {
        "spy"
    }
}

/// Build application state around `classifier`
pub fn test_state(classifier: Arc<dyn Classifier>, history: HistoryRecorder) -> AppState {
    let service = ClassificationService::new(classifier, "default");
    AppState::new(service, history, DescriptorConfig::default())
}

/// A recorder backed by a fresh in-memory store
pub fn memory_history() -> (HistoryRecorder, Arc<MemoryHistoryStore>) {
    let store = Arc::new(MemoryHistoryStore::new());
    (HistoryRecorder::new(store.clone()), store)
}

/// Router with a public dir that does not exist
pub fn test_app(state: AppState) -> Router {
    let config = ServerConfig {
        public_dir: PathBuf::from("/nonexistent/smsbridge-public"),
        ..Default::default()
    };
    build_app(state, &config)
}
