//! Vectorizer and classifier traits and common types

use veritas_core::Result;

/// Sparse feature vector with a fixed dimension
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    /// (feature index, value), sorted by index, no duplicates
    entries: Vec<(usize, f32)>,
}

impl FeatureVector {
    /// Build a feature vector, sorting entries and rejecting out-of-range indices
    pub fn new(dim: usize, mut entries: Vec<(usize, f32)>) -> Result<Self> {
        entries.sort_unstable_by_key(|(idx, _)| *idx);
        if let Some((idx, _)) = entries.iter().find(|(idx, _)| *idx >= dim) {
            return Err(veritas_core::Error::classifier(format!(
                "feature index {} out of range for dimension {}",
                idx, dim
            )));
        }
        if entries.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(veritas_core::Error::classifier("duplicate feature index"));
        }
        Ok(Self { dim, entries })
    }

    /// All-zero vector of the given dimension
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    /// Number of non-zero features
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Expand into a dense row
    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.dim];
        for &(idx, value) in &self.entries {
            dense[idx] = value;
        }
        dense
    }
}

/// Maps cleaned text onto a fixed-dimension feature vector
pub trait Vectorizer: Send + Sync {
    /// Transform cleaned text. Must succeed for any cleaned text, including "".
    fn transform(&self, text: &str) -> Result<FeatureVector>;

    /// Output dimension
    fn dimension(&self) -> usize;
}

/// Classifier output for one feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct ClassScores {
    /// Predicted class value, as stored in the model's class list
    pub class: i64,

    /// Per-class probabilities, when the model supports them
    pub probabilities: Option<Vec<f32>>,
}

impl ClassScores {
    /// Highest class probability, if probabilities are available
    pub fn max_probability(&self) -> Option<f32> {
        self.probabilities
            .as_ref()
            .and_then(|p| p.iter().copied().reduce(f32::max))
    }
}

/// Maps a feature vector onto a class value
pub trait Classifier: Send + Sync {
    /// Predict the class for `features`
    fn predict(&self, features: &FeatureVector) -> Result<ClassScores>;

    /// Expected input dimension
    fn n_features(&self) -> usize;

    /// Whether [`Classifier::predict`] fills in probabilities
    fn supports_probabilities(&self) -> bool;

    /// Classifier name for logs
    fn name(&self) -> &str;
}
