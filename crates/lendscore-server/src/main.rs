//! Lendscore Server
//!
//! Stateless HTTP scoring service for a pre-trained credit risk model.
//!
//! At boot the two model artifacts (feature preprocessor and classifier)
//! load once into immutable shared state; if either is missing or corrupt
//! the process refuses to start. Every request is then an independent
//! transform-and-predict over that state.

use anyhow::Context;
use clap::Parser;
use lendscore_model::{ModelArtifacts, ScoringPipeline};
use lendscore_server::{create_router, AppState, Cli, ServerConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Lendscore server");

    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Preprocessor: {}", config.preprocessor_path);
    info!("Classifier: {}", config.classifier_path);

    let metrics_handle = init_metrics()?;

    // Artifacts load exactly once, before the listener binds. Serving with
    // a missing model is worse than refusing to start.
    let artifacts = ModelArtifacts::load(&config.preprocessor_path, &config.classifier_path)
        .context("failed to load model artifacts")?;
    info!(version = artifacts.version(), "model artifacts ready");

    let pipeline = ScoringPipeline::new(artifacts);
    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;

    let state = AppState::new(config, pipeline, metrics_handle);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, stopping server...");
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("lendscore=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lendscore=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "lendscore_requests_total",
        "Total number of requests received by route"
    );
    metrics::describe_counter!(
        "lendscore_decisions_total",
        "Total number of scoring decisions by label"
    );
    metrics::describe_histogram!(
        "lendscore_scoring_latency_us",
        metrics::Unit::Microseconds,
        "End-to-end scoring latency in microseconds"
    );
    metrics::describe_counter!(
        "lendscore_errors_total",
        "Total number of request errors by kind"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
