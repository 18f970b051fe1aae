//! Core types for smsbridge

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Model name used when a caller does not pick one
pub const DEFAULT_MODEL: &str = "default";

/// Raw classification payload as it arrives over HTTP or the WebSocket
///
/// Both fields are optional on the wire; [`ClassifyPayload::into_request`]
/// turns this into a validated [`ClassificationRequest`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyPayload {
    /// Text to classify
    #[serde(default)]
    pub text: Option<String>,

    /// Model name to classify with
    #[serde(default)]
    pub model: Option<String>,
}

impl ClassifyPayload {
    /// Create a payload with text and an optional model
    pub fn new(text: impl Into<String>, model: Option<String>) -> Self {
        Self {
            text: Some(text.into()),
            model,
        }
    }

    /// Validate the payload, falling back to `default_model` when no model is named
    ///
    /// An absent or empty `text` is rejected with [`Error::MissingField`].
    pub fn into_request(self, default_model: &str) -> Result<ClassificationRequest> {
        let text = match self.text {
            Some(text) if !text.is_empty() => text,
            _ => return Err(Error::MissingField("text")),
        };

        let model = match self.model {
            Some(model) if !model.is_empty() => model,
            _ => default_model.to_string(),
        };

        Ok(ClassificationRequest { text, model })
    }
}

/// A validated classification request
///
/// `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRequest {
    /// Text to classify
    pub text: String,

    /// Model name passed to the external process
    pub model: String,
}

impl ClassificationRequest {
    /// Create a request, rejecting empty text
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        ClassifyPayload::new(text, Some(model.into())).into_request(DEFAULT_MODEL)
    }
}

/// Structured result emitted by the external classification process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The text that was classified
    pub input: String,

    /// Preprocessed form of the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformed: Option<String>,

    /// Preprocessing trace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<PreprocessingSteps>,

    /// Predicted label, passed through as emitted
    pub prediction: Value,

    /// Per-label probabilities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Probabilities>,

    /// Any further fields the process emitted
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClassificationResult {
    /// Create a result with just an input and a prediction
    pub fn new(input: impl Into<String>, prediction: impl Into<Value>) -> Self {
        Self {
            input: input.into(),
            transformed: None,
            steps: None,
            prediction: prediction.into(),
            probabilities: None,
            extra: Map::new(),
        }
    }

    /// Set the preprocessed text
    pub fn with_transformed(mut self, transformed: impl Into<String>) -> Self {
        self.transformed = Some(transformed.into());
        self
    }

    /// Set the preprocessing trace
    pub fn with_steps(mut self, steps: PreprocessingSteps) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Set the probabilities
    pub fn with_probabilities(mut self, probabilities: Probabilities) -> Self {
        self.probabilities = Some(probabilities);
        self
    }

    /// Parse a result from the process's standard output
    ///
    /// The output must be a single JSON object carrying `input` and a
    /// non-null `prediction`.
    pub fn from_output(output: &str) -> Result<Self> {
        let result: Self = serde_json::from_str(output.trim())?;
        if result.prediction.is_null() {
            return Err(Error::internal("prediction must not be null"));
        }
        Ok(result)
    }
}

/// Preprocessing trace reported by the process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreprocessingSteps {
    /// Ordered list of step descriptions
    Ordered(Vec<String>),
    /// Named intermediate stages (e.g. `lower`, `tokens`, `after_stem`)
    Named(Map<String, Value>),
}

/// Probabilities reported by the process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Probabilities {
    /// Probability keyed by label
    ByLabel(BTreeMap<String, f64>),
    /// Probability indexed by class id
    ByIndex(Vec<f64>),
}

impl Probabilities {
    /// Probability for a label, accepting a class index for indexed output
    pub fn get(&self, label: &str) -> Option<f64> {
        match self {
            Self::ByLabel(map) => map.get(label).copied(),
            Self::ByIndex(values) => label.parse::<usize>().ok().and_then(|i| values.get(i).copied()),
        }
    }
}
