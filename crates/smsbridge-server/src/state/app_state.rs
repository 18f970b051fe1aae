use crate::config::{BridgeConfig, DescriptorConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use smsbridge_classifier::{ClassificationService, Classifier, ProcessClassifier};
use smsbridge_history::HistoryRecorder;
use std::sync::Arc;

/// Shared application state
///
/// Built once at startup and handed to both transports.
#[derive(Clone)]
pub struct AppState {
    /// The single classify entry point
    pub service: ClassificationService,

    /// Optional history store
    pub history: HistoryRecorder,

    /// Model list and metrics document locations
    pub descriptors: Arc<DescriptorConfig>,

    /// Prometheus handle for rendering bridge metrics
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        service: ClassificationService,
        history: HistoryRecorder,
        descriptors: DescriptorConfig,
    ) -> Self {
        Self {
            service,
            history,
            descriptors: Arc::new(descriptors),
            metrics_handle: None,
        }
    }

    /// Build state from configuration: process classifier plus history store
    pub async fn from_config(config: &BridgeConfig) -> anyhow::Result<Self> {
        let classifier: Arc<dyn Classifier> =
            Arc::new(ProcessClassifier::new(config.classifier.clone())?);
        let service = ClassificationService::new(classifier, config.classifier.default_model.clone());
        let history = HistoryRecorder::from_config(&config.history).await;

        Ok(Self::new(service, history, config.descriptors.clone()))
    }

    /// Attach the Prometheus handle
    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
