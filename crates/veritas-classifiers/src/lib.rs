//! Veritas Classifiers
//!
//! Everything between raw request text and a REAL/FAKE label:
//! - Text normalization matching the training-time cleaning
//! - TF-IDF vectorization over an exported vocabulary
//! - Linear classifiers (logistic regression, linear SVM, passive-aggressive) on Candle
//! - One-shot artifact loading into an immutable, shareable state
//! - The prediction service tying them together

pub mod artifacts;
pub mod classifier;
pub mod linear;
pub mod normalize;
pub mod predictor;
pub mod vectorizer;

pub use artifacts::{ArtifactPaths, ArtifactState, Artifacts};
pub use classifier::{ClassScores, Classifier, FeatureVector, Vectorizer};
pub use linear::{LinearClassifier, LinearModelConfig, LinearModelKind};
pub use normalize::{is_space, normalize, TextNormalizer};
pub use predictor::Predictor;
pub use vectorizer::{Norm, TfidfConfig, TfidfVectorizer};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifacts::{ArtifactPaths, ArtifactState, Artifacts};
    pub use crate::classifier::{Classifier, FeatureVector, Vectorizer};
    pub use crate::predictor::Predictor;
}
