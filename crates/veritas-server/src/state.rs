use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use veritas_classifiers::{ArtifactState, Predictor};

use crate::config::ServerConfig;

/// Shared application state.
///
/// Everything here is immutable after startup, so handlers clone it freely.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Prediction service over the artifacts loaded at startup
    pub predictor: Predictor,

    /// Prometheus handle for `/metrics`; absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        artifacts: ArtifactState,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        metrics::gauge!("veritas_artifacts_loaded").set(if artifacts.is_loaded() { 1.0 } else { 0.0 });

        Self {
            config: Arc::new(config),
            predictor: Predictor::new(Arc::new(artifacts)),
            metrics,
        }
    }

    /// Load artifacts from the configured paths and build the state
    pub fn load(config: ServerConfig, metrics: Option<PrometheusHandle>) -> Self {
        let artifacts = ArtifactState::load(&config.artifacts);
        Self::new(config, artifacts, metrics)
    }

    pub fn artifacts(&self) -> &ArtifactState {
        self.predictor.state()
    }
}
