//! One-shot loading of the vectorizer and classifier artifacts

use crate::classifier::{Classifier, Vectorizer};
use crate::linear::LinearClassifier;
use crate::vectorizer::TfidfVectorizer;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use veritas_core::Result;

/// Filesystem locations of the two artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            vectorizer: PathBuf::from("tfidf_vectorizer.json"),
            classifier: PathBuf::from("fake_news_model.json"),
        }
    }
}

/// A vectorizer and a classifier whose dimensions agree
pub struct Artifacts {
    vectorizer: Box<dyn Vectorizer>,
    classifier: Box<dyn Classifier>,
}

impl Artifacts {
    /// Pair a vectorizer with a classifier, checking that dimensions match
    pub fn new(vectorizer: Box<dyn Vectorizer>, classifier: Box<dyn Classifier>) -> Result<Self> {
        if vectorizer.dimension() != classifier.n_features() {
            return Err(veritas_core::Error::artifact(format!(
                "vectorizer produces {} features but classifier '{}' expects {}",
                vectorizer.dimension(),
                classifier.name(),
                classifier.n_features()
            )));
        }
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Read both artifacts from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let classifier = LinearClassifier::from_file(&paths.classifier)?;
        let vectorizer = TfidfVectorizer::from_file(&paths.vectorizer)?;
        Self::new(Box::new(vectorizer), Box::new(classifier))
    }

    pub fn vectorizer(&self) -> &dyn Vectorizer {
        self.vectorizer.as_ref()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}

/// Process-wide artifact state, fixed after startup
#[derive(Clone)]
pub enum ArtifactState {
    /// Loading failed; prediction stays disabled until restart
    NotLoaded { reason: String },
    Loaded(Arc<Artifacts>),
}

impl ArtifactState {
    /// Load both artifacts. Never fails: errors are logged and yield `NotLoaded`.
    pub fn load(paths: &ArtifactPaths) -> Self {
        match Artifacts::load(paths) {
            Ok(artifacts) => {
                info!(
                    vectorizer = %paths.vectorizer.display(),
                    classifier = %paths.classifier.display(),
                    model = artifacts.classifier().name(),
                    features = artifacts.vectorizer().dimension(),
                    "Model and vectorizer loaded successfully"
                );
                Self::Loaded(Arc::new(artifacts))
            }
            Err(e) => {
                error!(
                    vectorizer = %paths.vectorizer.display(),
                    classifier = %paths.classifier.display(),
                    "Error loading models: {}",
                    e
                );
                Self::NotLoaded {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn artifacts(&self) -> Option<&Arc<Artifacts>> {
        match self {
            Self::Loaded(artifacts) => Some(artifacts),
            Self::NotLoaded { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Loading is all-or-nothing, so both health flags follow the same state
    pub fn model_loaded(&self) -> bool {
        self.is_loaded()
    }

    pub fn vectorizer_loaded(&self) -> bool {
        self.is_loaded()
    }

    /// Why loading failed, if it did
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::NotLoaded { reason } => Some(reason),
            Self::Loaded(_) => None,
        }
    }
}

impl From<Artifacts> for ArtifactState {
    fn from(artifacts: Artifacts) -> Self {
        Self::Loaded(Arc::new(artifacts))
    }
}
