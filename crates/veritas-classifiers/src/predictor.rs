//! Prediction service: normalize, vectorize, classify, label

use crate::artifacts::ArtifactState;
use crate::normalize::{is_space, normalize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use veritas_core::{input_preview, Confidence, Label, Prediction, PredictionResult, Result};

/// Cheap-to-clone handle over the shared artifact state
#[derive(Clone)]
pub struct Predictor {
    state: Arc<ArtifactState>,
}

impl Predictor {
    pub fn new(state: Arc<ArtifactState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ArtifactState {
        &self.state
    }

    /// Classify `raw` as REAL or FAKE.
    ///
    /// Missing or blank text is rejected before the artifact state is
    /// consulted. Vectorizer and classifier errors come back as
    /// `PredictionFailed`.
    pub fn predict(&self, raw: Option<&str>) -> Result<Prediction> {
        let raw = match raw {
            Some(text) if !text.trim_matches(is_space).is_empty() => text,
            _ => return Err(veritas_core::Error::InvalidInput),
        };

        let artifacts = self
            .state
            .artifacts()
            .ok_or(veritas_core::Error::ServiceUnavailable)?;

        let start = Instant::now();
        let cleaned = normalize(raw);

        let features = artifacts
            .vectorizer()
            .transform(&cleaned)
            .map_err(|e| veritas_core::Error::prediction_failed(e.to_string()))?;

        let scores = artifacts
            .classifier()
            .predict(&features)
            .map_err(|e| veritas_core::Error::prediction_failed(e.to_string()))?;

        let label = Label::from_class(scores.class);
        let confidence = if artifacts.classifier().supports_probabilities() {
            scores
                .max_probability()
                .map(|p| Confidence::from_probability(f64::from(p)))
        } else {
            None
        };

        debug!(
            label = %label,
            class = scores.class,
            nnz = features.nnz(),
            latency_us = start.elapsed().as_micros() as u64,
            "Prediction complete"
        );

        Ok(Prediction {
            result: PredictionResult { label, confidence },
            input_preview: input_preview(raw),
        })
    }
}
