//! Veritas Server
//!
//! Serves REAL/FAKE predictions from a pre-trained TF-IDF + linear model.
//! Artifacts are loaded once at startup; if that fails the server still
//! starts and reports the failure through `/health` and `/predict`.

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use veritas_server::telemetry::{init_metrics, init_tracing};
use veritas_server::{create_router, AppState, Cli, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.log_format);

    info!("Starting Veritas server");

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Vectorizer: {}", config.artifacts.vectorizer.display());
    info!("Classifier: {}", config.artifacts.classifier.display());

    let addr = config.socket_addr()?;

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Load artifacts once; failure degrades the service instead of exiting
    let state = AppState::load(config, Some(metrics_handle));
    if let Some(reason) = state.artifacts().failure_reason() {
        warn!("Serving without a model, predictions disabled: {}", reason);
    }

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
