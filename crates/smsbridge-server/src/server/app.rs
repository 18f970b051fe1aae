use crate::config::{BridgeConfig, ServerConfig};
use crate::server::{routes, static_files, websocket};
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the Axum application
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        // Health
        .route("/health", get(routes::health))
        // Classification
        .route("/predict", post(routes::predict))
        .route("/ws", get(websocket::websocket_handler))
        // History
        .route("/history", get(routes::history))
        // Descriptors
        .route("/models", get(routes::models))
        .route("/metrics", get(routes::training_metrics))
        .route("/metrics/prometheus", get(routes::prometheus_metrics))
        .fallback_service(static_files::static_service(&config.public_dir))
        .layer(cors_layer(&config.cors_origins))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when `origins` is empty, otherwise exactly the listed ones
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run_server(state: AppState, config: &BridgeConfig) -> anyhow::Result<()> {
    let addr = config.server.socket_addr()?;
    let app = build_app(state, &config.server);

    tracing::info!("Starting smsbridge on {}", addr);
    tracing::info!(
        "Classifier: {} {}",
        config.classifier.program,
        config.classifier.args.join(" ")
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
