//! Veritas Server
//!
//! HTTP boundary for the Veritas classifier: health check, prediction,
//! a tiny HTML test form and Prometheus metrics.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use cli::{Cli, LogFormat};
pub use config::{CorsConfig, ServerConfig};
pub use routes::{create_router, HealthResponse, PredictResponse};
pub use state::AppState;
