use crate::descriptors;
use crate::server::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use smsbridge_core::{ClassificationResult, ClassifyPayload};
use smsbridge_history::MAX_HISTORY_LIMIT;

// ============================================================================
// Health endpoints
// ============================================================================

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "classifier": state.service.classifier_name(),
        "history": state.history.backend_name(),
    }))
}

// ============================================================================
// Classification endpoints
// ============================================================================

/// `POST /predict`
///
/// A body without a JSON content type is read as an empty payload, so it is
/// rejected for missing text like any other empty request.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyPayload>, JsonRejection>,
) -> Result<Json<ClassificationResult>, AppError> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(JsonRejection::MissingJsonContentType(_)) => ClassifyPayload::default(),
        Err(rejection) => return Err(AppError::InvalidBody(rejection.body_text())),
    };

    let (request, result) = state.service.classify(payload).await?;
    state.history.record(&request, &result).await;

    Ok(Json(result))
}

// ============================================================================
// History endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::InvalidBody(rejection.body_text()))?;
    let limit = query.limit.unwrap_or(MAX_HISTORY_LIMIT);
    let items = state.history.recent_first(limit).await?;
    Ok(Json(json!({ "items": items })))
}

// ============================================================================
// Descriptor endpoints
// ============================================================================

pub async fn models(State(state): State<AppState>) -> impl IntoResponse {
    let models = descriptors::list_models(&state.descriptors.models_dir).await;
    Json(json!({ "models": models }))
}

pub async fn training_metrics(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let document = descriptors::read_metrics(&state.descriptors.metrics_file).await?;
    Ok(Json(document))
}

pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics_handle {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => AppError::NotFound("metrics exporter not installed".to_string()).into_response(),
    }
}
