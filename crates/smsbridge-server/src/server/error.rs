//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use smsbridge_classifier::{ClassifyError, InvocationError};
use smsbridge_history::StoreError;

use crate::descriptors::DescriptorError;

/// Errors surfaced by HTTP handlers
///
/// Rendered as a flat JSON document: `{ "error": <message>, ... }`.
#[derive(Debug)]
pub enum AppError {
    /// A required field was absent or empty
    MissingField(&'static str),
    /// The body could not be read as a classify payload
    InvalidBody(String),
    /// The external classifier failed
    Invocation(InvocationError),
    /// History store errors
    Store(StoreError),
    /// A descriptor file does not exist
    NotFound(String),
    /// A descriptor file exists but could not be served
    Descriptor { message: String, detail: String },
}

impl From<ClassifyError> for AppError {
    fn from(err: ClassifyError) -> Self {
        match err {
            ClassifyError::Rejected(smsbridge_core::Error::MissingField(field)) => {
                AppError::MissingField(field)
            }
            ClassifyError::Rejected(other) => AppError::InvalidBody(other.to_string()),
            ClassifyError::Invocation(e) => AppError::Invocation(e),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<DescriptorError> for AppError {
    fn from(err: DescriptorError) -> Self {
        match err {
            DescriptorError::NotFound(_) => AppError::NotFound(err.to_string()),
            DescriptorError::Unreadable { name, detail } => AppError::Descriptor {
                message: format!("failed to read {}", name),
                detail,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("{} is required", field), "kind": "missing_field" }),
            ),
            AppError::InvalidBody(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg, "kind": "invalid_body" }),
            ),
            AppError::Invocation(e) => invocation_body(e),
            AppError::Store(StoreError::Unavailable) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": StoreError::Unavailable.to_string() }),
            ),
            AppError::Store(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": e.to_string() }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Descriptor { message, detail } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": message, "detail": detail }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn invocation_body(err: InvocationError) -> (StatusCode, serde_json::Value) {
    let kind = err.kind();
    match err {
        InvocationError::MalformedOutput { raw, stderr, .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "failed to parse classifier output",
                "kind": kind,
                "raw": raw,
                "stderr": stderr,
            }),
        ),
        InvocationError::Timeout(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            json!({ "error": err.message(), "kind": kind }),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": other.message(), "kind": kind }),
        ),
    }
}
