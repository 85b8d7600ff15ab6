//! Tracing and metrics setup

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

use crate::cli::LogFormat;

/// Initialize tracing/logging
pub fn init_tracing(verbose: bool, format: LogFormat) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new(default_directives(true))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(false)))
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

/// Filter directives used when `RUST_LOG` is unset or `--verbose` is given
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "veritas_server=debug,veritas_classifiers=debug,tower_http=debug"
    } else {
        "veritas_server=info,veritas_classifiers=info"
    }
}

/// Initialize metrics exporter and return handle for rendering
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!("veritas_requests_total", "Total number of requests by endpoint");
    metrics::describe_counter!(
        "veritas_predictions_total",
        "Total number of successful predictions by label"
    );
    metrics::describe_counter!("veritas_errors_total", "Total number of request errors by kind");
    metrics::describe_histogram!(
        "veritas_inference_latency_us",
        metrics::Unit::Microseconds,
        "Normalize + vectorize + classify latency in microseconds"
    );
    metrics::describe_gauge!(
        "veritas_artifacts_loaded",
        "1 when both artifacts loaded at startup, 0 otherwise"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
