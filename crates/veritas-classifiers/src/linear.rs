//! Linear classifiers (logistic regression, linear SVM, passive-aggressive)
//! evaluated with Candle tensors on CPU

use crate::classifier::{ClassScores, Classifier, FeatureVector};
use candle_core::{Device, Tensor, D};
use serde::{Deserialize, Serialize};
use std::path::Path;
use veritas_core::Result;

/// Artifact format version understood by this build
pub const CLASSIFIER_FORMAT_VERSION: u32 = 1;

/// Which linear model produced the weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearModelKind {
    /// Probabilistic; confidences are reported
    LogisticRegression,
    /// Decision function only
    LinearSvc,
    /// Decision function only
    PassiveAggressive,
}

impl LinearModelKind {
    pub fn supports_probabilities(&self) -> bool {
        matches!(self, Self::LogisticRegression)
    }
}

/// Serialized classifier artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelConfig {
    #[serde(default = "default_format_version")]
    pub format_version: u32,

    pub kind: LinearModelKind,

    /// Class values in model order
    pub classes: Vec<i64>,

    /// One row per decision function, `n_features` columns each
    pub coef: Vec<Vec<f32>>,

    /// One bias per row of `coef`
    pub intercept: Vec<f32>,
}

fn default_format_version() -> u32 {
    CLASSIFIER_FORMAT_VERSION
}

/// Linear classifier with weights held as Candle tensors
pub struct LinearClassifier {
    kind: LinearModelKind,
    classes: Vec<i64>,
    n_features: usize,
    /// (n_features, rows)
    weights: Tensor,
    /// (rows)
    bias: Tensor,
    device: Device,
}

fn candle_err(e: candle_core::Error) -> veritas_core::Error {
    veritas_core::Error::classifier(format!("tensor operation failed: {}", e))
}

impl LinearClassifier {
    /// Build a classifier from a deserialized artifact, validating its shape
    pub fn from_config(config: LinearModelConfig) -> Result<Self> {
        if config.format_version != CLASSIFIER_FORMAT_VERSION {
            return Err(veritas_core::Error::artifact(format!(
                "unsupported classifier format version {} (expected {})",
                config.format_version, CLASSIFIER_FORMAT_VERSION
            )));
        }

        let n_classes = config.classes.len();
        if n_classes < 2 {
            return Err(veritas_core::Error::artifact(format!(
                "classifier needs at least two classes, got {}",
                n_classes
            )));
        }

        let rows = config.coef.len();
        let expected_rows = if n_classes == 2 { 1 } else { n_classes };
        if rows != expected_rows {
            return Err(veritas_core::Error::artifact(format!(
                "coef has {} rows, expected {} for {} classes",
                rows, expected_rows, n_classes
            )));
        }

        let n_features = config.coef[0].len();
        if n_features == 0 || config.coef.iter().any(|row| row.len() != n_features) {
            return Err(veritas_core::Error::artifact("coef rows must be non-empty and equally sized"));
        }

        if config.intercept.len() != rows {
            return Err(veritas_core::Error::artifact(format!(
                "intercept has {} entries, expected {}",
                config.intercept.len(),
                rows
            )));
        }

        let device = Device::Cpu;
        let flat: Vec<f32> = config.coef.into_iter().flatten().collect();
        let weights = Tensor::from_vec(flat, (rows, n_features), &device)
            .and_then(|t| t.t())
            .and_then(|t| t.contiguous())
            .map_err(candle_err)?;
        let bias = Tensor::from_vec(config.intercept, rows, &device).map_err(candle_err)?;

        Ok(Self {
            kind: config.kind,
            classes: config.classes,
            n_features,
            weights,
            bias,
            device,
        })
    }

    /// Load a classifier artifact from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            veritas_core::Error::artifact(format!("failed to read classifier {}: {}", path.display(), e))
        })?;
        let config: LinearModelConfig = serde_json::from_str(&content).map_err(|e| {
            veritas_core::Error::artifact(format!("failed to parse classifier {}: {}", path.display(), e))
        })?;
        Self::from_config(config)
    }

    pub fn kind(&self) -> LinearModelKind {
        self.kind
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Raw decision values, shape (1, rows)
    fn decision_function(&self, features: &FeatureVector) -> candle_core::Result<Tensor> {
        let x = Tensor::from_vec(features.to_dense(), (1, self.n_features), &self.device)?;
        x.matmul(&self.weights)?.broadcast_add(&self.bias)
    }

    fn scores(&self, decisions: &Tensor) -> candle_core::Result<ClassScores> {
        let with_proba = self.kind.supports_probabilities();

        if self.classes.len() == 2 {
            let decision = decisions.flatten_all()?.to_vec1::<f32>()?[0];
            let class = if decision > 0.0 {
                self.classes[1]
            } else {
                self.classes[0]
            };
            let probabilities = if with_proba {
                // σ(d) = 1 / (1 + e^-d)
                let p = decisions.neg()?.exp()?.affine(1.0, 1.0)?.recip()?;
                let p = p.flatten_all()?.to_vec1::<f32>()?[0];
                Some(vec![1.0 - p, p])
            } else {
                None
            };
            return Ok(ClassScores { class, probabilities });
        }

        let best = decisions.squeeze(0)?.argmax(D::Minus1)?.to_scalar::<u32>()? as usize;
        let probabilities = if with_proba {
            let p = candle_nn::ops::softmax(decisions, D::Minus1)?;
            Some(p.squeeze(0)?.to_vec1::<f32>()?)
        } else {
            None
        };

        Ok(ClassScores {
            class: self.classes[best],
            probabilities,
        })
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<ClassScores> {
        if features.dim() != self.n_features {
            return Err(veritas_core::Error::classifier(format!(
                "feature vector has dimension {}, model expects {}",
                features.dim(),
                self.n_features
            )));
        }

        let decisions = self.decision_function(features).map_err(candle_err)?;
        self.scores(&decisions).map_err(candle_err)
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn supports_probabilities(&self) -> bool {
        self.kind.supports_probabilities()
    }

    fn name(&self) -> &str {
        match self.kind {
            LinearModelKind::LogisticRegression => "logistic_regression",
            LinearModelKind::LinearSvc => "linear_svc",
            LinearModelKind::PassiveAggressive => "passive_aggressive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(kind: LinearModelKind) -> LinearClassifier {
        LinearClassifier::from_config(LinearModelConfig {
            format_version: CLASSIFIER_FORMAT_VERSION,
            kind,
            classes: vec![0, 1],
            coef: vec![vec![2.0, -2.0, 0.0]],
            intercept: vec![0.0],
        })
        .unwrap()
    }

    #[test]
    fn test_binary_logistic_regression() {
        let clf = binary(LinearModelKind::LogisticRegression);

        let real = clf.predict(&FeatureVector::new(3, vec![(0, 1.0)]).unwrap()).unwrap();
        assert_eq!(real.class, 1);
        let p = real.max_probability().unwrap();
        // σ(2) ≈ 0.8808
        assert!((p - 0.880_797).abs() < 1e-4, "got {}", p);

        let fake = clf.predict(&FeatureVector::new(3, vec![(1, 1.0)]).unwrap()).unwrap();
        assert_eq!(fake.class, 0);
        let probs = fake.probabilities.unwrap();
        assert!((probs[0] + probs[1] - 1.0).abs() < 1e-5);
        assert!(probs[0] > probs[1]);
    }

    #[test]
    fn test_zero_decision_picks_first_class() {
        let clf = binary(LinearModelKind::LogisticRegression);
        let scores = clf.predict(&FeatureVector::zeros(3)).unwrap();
        assert_eq!(scores.class, 0);
        assert!((scores.max_probability().unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_decision_only_models_have_no_probabilities() {
        for kind in [LinearModelKind::LinearSvc, LinearModelKind::PassiveAggressive] {
            let clf = binary(kind);
            assert!(!clf.supports_probabilities());
            let scores = clf.predict(&FeatureVector::new(3, vec![(0, 0.5)]).unwrap()).unwrap();
            assert_eq!(scores.class, 1);
            assert!(scores.probabilities.is_none());
        }
    }

    #[test]
    fn test_multiclass_softmax() {
        let clf = LinearClassifier::from_config(LinearModelConfig {
            format_version: CLASSIFIER_FORMAT_VERSION,
            kind: LinearModelKind::LogisticRegression,
            classes: vec![0, 1, 2],
            coef: vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0]],
            intercept: vec![0.0, 0.0, 0.5],
        })
        .unwrap();

        let scores = clf.predict(&FeatureVector::new(2, vec![(1, 3.0)]).unwrap()).unwrap();
        assert_eq!(scores.class, 1);
        let probs = scores.probabilities.unwrap();
        assert_eq!(probs.len(), 3);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-5);

        let scores = clf.predict(&FeatureVector::zeros(2)).unwrap();
        assert_eq!(scores.class, 2);
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        let clf = binary(LinearModelKind::LogisticRegression);
        assert!(clf.predict(&FeatureVector::zeros(4)).is_err());
    }

    #[test]
    fn test_rejects_inconsistent_artifacts() {
        let base = LinearModelConfig {
            format_version: CLASSIFIER_FORMAT_VERSION,
            kind: LinearModelKind::LinearSvc,
            classes: vec![0, 1],
            coef: vec![vec![1.0, 1.0]],
            intercept: vec![0.0],
        };

        let one_class = LinearModelConfig { classes: vec![1], ..base.clone() };
        assert!(LinearClassifier::from_config(one_class).is_err());

        let ragged = LinearModelConfig {
            classes: vec![0, 1, 2],
            coef: vec![vec![1.0], vec![1.0, 2.0], vec![0.0]],
            intercept: vec![0.0; 3],
            ..base.clone()
        };
        assert!(LinearClassifier::from_config(ragged).is_err());

        let bad_intercept = LinearModelConfig { intercept: vec![0.0, 1.0], ..base.clone() };
        assert!(LinearClassifier::from_config(bad_intercept).is_err());

        let too_many_rows = LinearModelConfig {
            coef: vec![vec![1.0, 1.0], vec![1.0, 1.0]],
            intercept: vec![0.0, 0.0],
            ..base
        };
        assert!(LinearClassifier::from_config(too_many_rows).is_err());
    }

    #[test]
    fn test_deserialize_kind() {
        let json = r#"{"kind": "passive_aggressive", "classes": [0, 1], "coef": [[0.5]], "intercept": [0.1]}"#;
        let cfg: LinearModelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.kind, LinearModelKind::PassiveAggressive);
        assert_eq!(cfg.format_version, CLASSIFIER_FORMAT_VERSION);
    }
}
