use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use smsbridge_server::cli::{format_reply, Cli, Commands};
use smsbridge_server::config::BridgeConfig;
use smsbridge_server::server::run_server;
use smsbridge_server::state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_tracing(args.verbose);

            let config = BridgeConfig::load(&args.config, &args)?;
            info!("Loaded configuration (config file: {})", args.config);

            let metrics_handle = init_metrics()?;
            let state = AppState::from_config(&config)
                .await?
                .with_metrics_handle(metrics_handle);

            run_server(state, &config).await?;
        }

        Commands::Send {
            target,
            model,
            text,
            verbose,
        } => {
            init_tracing(verbose);

            let client = reqwest::Client::new();
            let response = client
                .post(format!("{}/predict", target.trim_end_matches('/')))
                .json(&serde_json::json!({ "text": text, "model": model }))
                .send()
                .await?;

            let status = response.status();
            let body = response.text().await?;

            println!("{}", format_reply(&body));

            if !status.is_success() {
                anyhow::bail!("bridge returned {}", status);
            }
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("smsbridge=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("smsbridge=info,tower_http=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "smsbridge_classifications_total",
        "Classification requests by outcome"
    );
    metrics::describe_histogram!(
        "smsbridge_classifier_latency_ms",
        metrics::Unit::Milliseconds,
        "Classifier process wall time in milliseconds"
    );
    metrics::describe_counter!(
        "smsbridge_history_writes_total",
        "History appends by outcome"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
