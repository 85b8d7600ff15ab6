//! Error types for Veritas

/// Result type alias using Veritas' Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Veritas operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request carried no usable text
    #[error("no text provided")]
    InvalidInput,

    /// Artifacts failed to load at startup; prediction is disabled
    #[error("model not loaded")]
    ServiceUnavailable,

    /// Vectorization or inference failed for a single request
    #[error("prediction failed: {0}")]
    PredictionFailed(String),

    /// Artifact content is malformed or inconsistent
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),
}

impl Error {
    /// Create a new prediction failure
    pub fn prediction_failed(msg: impl Into<String>) -> Self {
        Self::PredictionFailed(msg.into())
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Short machine-readable name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::ServiceUnavailable => "service_unavailable",
            Self::PredictionFailed(_) => "prediction_failed",
            Self::Artifact(_) => "artifact",
            Self::Classifier(_) => "classifier",
        }
    }
}
