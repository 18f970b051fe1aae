//! HTTP API tests

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{memory_history, test_app, test_state, SpyClassifier};
use serde_json::{json, Value};
use smsbridge_classifier::InvocationError;
use smsbridge_history::HistoryRecorder;
use smsbridge_server::config::{DescriptorConfig, ServerConfig};
use smsbridge_server::server::build_app;
use smsbridge_server::state::AppState;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn post_predict(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let spy = Arc::new(SpyClassifier::predicting(json!(0)));
    let app = test_app(test_state(spy, HistoryRecorder::disabled()));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["classifier"], json!("spy"));
}

#[tokio::test]
async fn test_prediction_passes_through() {
    let spy = Arc::new(SpyClassifier::predicting(json!("spam")));
    let app = test_app(test_state(spy.clone(), HistoryRecorder::disabled()));

    let (status, body) = send(&app, post_predict(json!({ "text": "WIN a prize" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], json!("spam"));
    assert_eq!(body["input"], json!("WIN a prize"));
    assert_eq!(spy.call_count(), 1);
}

#[tokio::test]
async fn test_missing_text_is_rejected_without_invocation() {
    let spy = Arc::new(SpyClassifier::predicting(json!(0)));
    let app = test_app(test_state(spy.clone(), HistoryRecorder::disabled()));

    for payload in [json!({}), json!({ "text": "" }), json!({ "model": "nb" })] {
        let (status, body) = send(&app, post_predict(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("text is required"));
        assert_eq!(body["kind"], json!("missing_field"));
    }

    // No JSON content type reads as an empty payload
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("text is required"));

    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let spy = Arc::new(SpyClassifier::predicting(json!(0)));
    let app = test_app(test_state(spy.clone(), HistoryRecorder::disabled()));

    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], json!("invalid_body"));
    assert_eq!(spy.call_count(), 0);
}

#[tokio::test]
async fn test_process_failure_carries_stderr() {
    let spy = Arc::new(SpyClassifier::failing(InvocationError::ProcessFailed {
        code: Some(1),
        stderr: "boom".to_string(),
    }));
    let app = test_app(test_state(spy, HistoryRecorder::disabled()));

    let (status, body) = send(&app, post_predict(json!({ "text": "hello" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("boom"));
    assert_eq!(body["kind"], json!("process_failed"));
}

#[tokio::test]
async fn test_malformed_output_exposes_raw() {
    let spy = Arc::new(SpyClassifier::failing(InvocationError::MalformedOutput {
        raw: "not-json".to_string(),
        stderr: String::new(),
        reason: "expected value at line 1 column 1".to_string(),
    }));
    let app = test_app(test_state(spy, HistoryRecorder::disabled()));

    let (status, body) = send(&app, post_predict(json!({ "text": "hello" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("failed to parse classifier output"));
    assert_eq!(body["raw"], json!("not-json"));
}

#[tokio::test]
async fn test_timeout_is_gateway_timeout() {
    let spy = Arc::new(SpyClassifier::failing(InvocationError::Timeout(
        std::time::Duration::from_secs(2),
    )));
    let app = test_app(test_state(spy, HistoryRecorder::disabled()));

    let (status, body) = send(&app, post_predict(json!({ "text": "hello" }))).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["kind"], json!("timeout"));
}

#[tokio::test]
async fn test_successful_prediction_is_recorded() {
    let spy = Arc::new(SpyClassifier::predicting(json!(1)));
    let (history, store) = memory_history();
    let app = test_app(test_state(spy, history.clone()));

    send(&app, post_predict(json!({ "text": "older" }))).await;
    let (status, _) = send(&app, post_predict(json!({ "text": "hello", "model": "nb" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.len(), 2);

    let records = history.recent_first(200).await.unwrap();
    assert_eq!(records[0].result.input, "hello");
    assert_eq!(records[0].model, "nb");

    let (status, body) = send(&app, get("/history")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["input"], json!("hello"));
    assert_eq!(items[1]["input"], json!("older"));

    let (_, body) = send(&app, get("/history?limit=1")).await;
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_rejects_bad_limit_as_json() {
    let spy = Arc::new(SpyClassifier::predicting(json!(0)));
    let (history, _) = memory_history();
    let app = test_app(test_state(spy, history));

    let (status, body) = send(&app, get("/history?limit=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], json!("invalid_body"));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_failed_prediction_is_not_recorded() {
    let spy = Arc::new(SpyClassifier::failing(InvocationError::ProcessFailed {
        code: Some(2),
        stderr: String::new(),
    }));
    let (history, store) = memory_history();
    let app = test_app(test_state(spy, history));

    let (status, body) = send(&app, post_predict(json!({ "text": "hello" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("classifier exited with code 2"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_history_unavailable_without_store() {
    let spy = Arc::new(SpyClassifier::predicting(json!(0)));
    let app = test_app(test_state(spy, HistoryRecorder::disabled()));

    let (status, body) = send(&app, get("/history")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], json!("no database configured"));

    let (status, body) = send(&app, post_predict(json!({ "text": "hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], json!(0));
}

fn descriptor_app(dir: &TempDir) -> Router {
    let spy = Arc::new(SpyClassifier::predicting(json!(0)));
    let state = AppState::new(
        smsbridge_classifier::ClassificationService::new(spy, "default"),
        HistoryRecorder::disabled(),
        DescriptorConfig {
            models_dir: dir.path().to_path_buf(),
            metrics_file: dir.path().join("metrics.json"),
        },
    );
    let config = ServerConfig {
        public_dir: dir.path().join("public"),
        ..Default::default()
    };
    build_app(state, &config)
}

#[tokio::test]
async fn test_models_and_metrics_descriptors() {
    let temp_dir = TempDir::new().unwrap();
    let app = descriptor_app(&temp_dir);

    let (status, body) = send(&app, get("/models")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "models": ["model"] }));

    let (status, body) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("metrics.json not found"));

    std::fs::write(temp_dir.path().join("svm.joblib"), b"").unwrap();
    std::fs::write(temp_dir.path().join("nb.pkl"), b"").unwrap();
    std::fs::write(temp_dir.path().join("metrics.json"), "{ broken").unwrap();

    let (_, body) = send(&app, get("/models")).await;
    assert_eq!(body, json!({ "models": ["nb", "svm"] }));

    let (status, body) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("failed to read metrics.json"));
    assert!(body["detail"].is_string());

    std::fs::write(temp_dir.path().join("metrics.json"), r#"{"accuracy":0.98}"#).unwrap();
    let (status, body) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "accuracy": 0.98 }));
}

#[tokio::test]
async fn test_static_files_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let public = temp_dir.path().join("public");
    std::fs::create_dir(&public).unwrap();
    std::fs::write(public.join("index.html"), "<h1>smsbridge</h1>").unwrap();
    let app = descriptor_app(&temp_dir);

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"<h1>smsbridge</h1>");

    let response = app.oneshot(get("/missing.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_prometheus_without_exporter() {
    let spy = Arc::new(SpyClassifier::predicting(json!(0)));
    let app = test_app(test_state(spy, HistoryRecorder::disabled()));

    let (status, _) = send(&app, get("/metrics/prometheus")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[cfg(unix)]
mod process {
    use super::*;
    use smsbridge_classifier::{ClassificationService, InvokerConfig, ProcessClassifier};

    fn sh(script: &str) -> InvokerConfig {
        InvokerConfig::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "classifier".to_string()],
        )
        .with_timeout_secs(5)
    }

    fn process_app(script: &str, history: HistoryRecorder) -> Router {
        let classifier = Arc::new(ProcessClassifier::new(sh(script)).unwrap());
        let state = AppState::new(
            ClassificationService::new(classifier, "default"),
            history,
            DescriptorConfig::default(),
        );
        test_app(state)
    }

    #[tokio::test]
    async fn test_end_to_end_through_process() {
        let script = r#"printf '{"input":"%s","prediction":"spam","probabilities":{"ham":0.1,"spam":0.9},"model":"%s"}' "$2" "$4""#;
        let (history, _) = memory_history();
        let app = process_app(script, history.clone());

        let (status, body) = send(&app, post_predict(json!({ "text": "hello", "model": "nb" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["input"], json!("hello"));
        assert_eq!(body["prediction"], json!("spam"));
        assert_eq!(body["probabilities"]["spam"], json!(0.9));
        assert_eq!(body["model"], json!("nb"));

        let records = history.recent_first(200).await.unwrap();
        assert_eq!(records[0].result.input, "hello");
    }

    #[tokio::test]
    async fn test_end_to_end_failures() {
        let app = process_app("echo boom >&2; exit 1", HistoryRecorder::disabled());
        let (status, body) = send(&app, post_predict(json!({ "text": "hello" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("boom"));

        let app = process_app("printf not-json", HistoryRecorder::disabled());
        let (status, body) = send(&app, post_predict(json!({ "text": "hello" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["raw"], json!("not-json"));
    }
}
