//! TF-IDF vectorizer loaded from an exported artifact
//!
//! Tokenization follows the scikit-learn defaults the model was trained
//! with: tokens are runs of two or more word characters, stop words are
//! dropped before n-grams are formed, and n-grams join tokens with a single
//! space.

use crate::classifier::{FeatureVector, Vectorizer};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use veritas_core::Result;

/// Artifact format version understood by this build
pub const VECTORIZER_FORMAT_VERSION: u32 = 1;

const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Serialized vectorizer artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfConfig {
    #[serde(default = "default_format_version")]
    pub format_version: u32,

    /// Term → feature index
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per feature index; absent means raw counts
    #[serde(default)]
    pub idf: Option<Vec<f32>>,

    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    #[serde(default)]
    pub stop_words: Vec<String>,

    #[serde(default)]
    pub sublinear_tf: bool,

    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,

    /// Clamp term counts to 1
    #[serde(default)]
    pub binary: bool,
}

fn default_format_version() -> u32 {
    VECTORIZER_FORMAT_VERSION
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// TF-IDF vectorizer over a fixed vocabulary
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f32>>,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    norm: Option<Norm>,
    binary: bool,
    token_regex: Regex,
}

impl TfidfVectorizer {
    /// Build a vectorizer from a deserialized artifact, validating its shape
    pub fn from_config(config: TfidfConfig) -> Result<Self> {
        if config.format_version != VECTORIZER_FORMAT_VERSION {
            return Err(veritas_core::Error::artifact(format!(
                "unsupported vectorizer format version {} (expected {})",
                config.format_version, VECTORIZER_FORMAT_VERSION
            )));
        }

        let dim = config.vocabulary.len();
        if dim == 0 {
            return Err(veritas_core::Error::artifact("vectorizer vocabulary is empty"));
        }

        let mut seen = vec![false; dim];
        for (term, &idx) in &config.vocabulary {
            if idx >= dim {
                return Err(veritas_core::Error::artifact(format!(
                    "vocabulary index {} for term '{}' out of range (vocabulary size {})",
                    idx, term, dim
                )));
            }
            if std::mem::replace(&mut seen[idx], true) {
                return Err(veritas_core::Error::artifact(format!(
                    "vocabulary index {} assigned to more than one term",
                    idx
                )));
            }
        }

        if let Some(idf) = &config.idf {
            if idf.len() != dim {
                return Err(veritas_core::Error::artifact(format!(
                    "idf length {} does not match vocabulary size {}",
                    idf.len(),
                    dim
                )));
            }
        }

        let (min_n, max_n) = config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(veritas_core::Error::artifact(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let token_regex = Regex::new(TOKEN_PATTERN)
            .map_err(|e| veritas_core::Error::classifier(format!("Failed to compile token regex: {}", e)))?;

        Ok(Self {
            vocabulary: config.vocabulary,
            idf: config.idf,
            ngram_range: config.ngram_range,
            stop_words: config.stop_words.into_iter().collect(),
            sublinear_tf: config.sublinear_tf,
            norm: config.norm,
            binary: config.binary,
            token_regex,
        })
    }

    /// Load a vectorizer artifact from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            veritas_core::Error::artifact(format!("failed to read vectorizer {}: {}", path.display(), e))
        })?;
        let config: TfidfConfig = serde_json::from_str(&content).map_err(|e| {
            veritas_core::Error::artifact(format!("failed to parse vectorizer {}: {}", path.display(), e))
        })?;
        Self::from_config(config)
    }

    fn tokens<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.token_regex
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect()
    }

    fn term_counts(&self, tokens: &[&str]) -> HashMap<usize, f32> {
        let (min_n, max_n) = self.ngram_range;
        let mut counts = HashMap::new();

        for n in min_n..=max_n {
            for gram in tokens.windows(n) {
                let term = gram.join(" ");
                if let Some(&idx) = self.vocabulary.get(&term) {
                    *counts.entry(idx).or_insert(0.0) += 1.0;
                }
            }
        }

        counts
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> Result<FeatureVector> {
        let tokens = self.tokens(text);
        let counts = self.term_counts(&tokens);

        let mut entries: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(idx, count)| {
                let mut tf = if self.binary { 1.0 } else { count };
                if self.sublinear_tf {
                    tf = 1.0 + tf.ln();
                }
                let weight = match &self.idf {
                    Some(idf) => tf * idf[idx],
                    None => tf,
                };
                (idx, weight)
            })
            .collect();

        let norm = match self.norm {
            Some(Norm::L2) => entries.iter().map(|(_, v)| v * v).sum::<f32>().sqrt(),
            Some(Norm::L1) => entries.iter().map(|(_, v)| v.abs()).sum::<f32>(),
            None => 1.0,
        };
        if norm > 0.0 {
            for (_, v) in entries.iter_mut() {
                *v /= norm;
            }
        }

        FeatureVector::new(self.dimension(), entries)
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TfidfConfig {
        TfidfConfig {
            format_version: VECTORIZER_FORMAT_VERSION,
            vocabulary: [("breaking", 0), ("news", 1), ("hoax", 2), ("breaking news", 3)]
                .into_iter()
                .map(|(t, i)| (t.to_string(), i))
                .collect(),
            idf: Some(vec![1.0, 1.0, 2.0, 3.0]),
            ngram_range: (1, 2),
            stop_words: vec!["the".to_string()],
            sublinear_tf: false,
            norm: None,
            binary: false,
        }
    }

    #[test]
    fn test_unigrams_and_bigrams() {
        let vectorizer = TfidfVectorizer::from_config(config()).unwrap();
        let fv = vectorizer.transform("breaking news the hoax hoax").unwrap();

        assert_eq!(fv.dim(), 4);
        // "the" is a stop word, so "news hoax" is the only other bigram
        assert_eq!(fv.entries(), &[(0, 1.0), (1, 1.0), (2, 4.0), (3, 3.0)]);
    }

    #[test]
    fn test_stop_words_removed_before_ngrams() {
        let vectorizer = TfidfVectorizer::from_config(config()).unwrap();
        let fv = vectorizer.transform("breaking the news").unwrap();
        assert!(fv.entries().contains(&(3, 3.0)));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let vectorizer = TfidfVectorizer::from_config(TfidfConfig {
            norm: Some(Norm::L2),
            ..config()
        })
        .unwrap();
        let fv = vectorizer.transform("").unwrap();
        assert_eq!(fv.nnz(), 0);
        assert_eq!(fv.dim(), 4);

        // single-character tokens never match the token pattern
        assert_eq!(vectorizer.transform("a b c").unwrap().nnz(), 0);
    }

    #[test]
    fn test_l2_norm_and_sublinear_tf() {
        let mut cfg = config();
        cfg.ngram_range = (1, 1);
        cfg.idf = None;
        cfg.sublinear_tf = true;
        cfg.norm = Some(Norm::L2);
        let vectorizer = TfidfVectorizer::from_config(cfg).unwrap();

        let fv = vectorizer.transform("news news news hoax").unwrap();
        let norm: f32 = fv.entries().iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);

        let news = fv.entries().iter().find(|(i, _)| *i == 1).unwrap().1;
        let hoax = fv.entries().iter().find(|(i, _)| *i == 2).unwrap().1;
        assert!((news / hoax - (1.0 + 3.0f32.ln())).abs() < 1e-5);
    }

    #[test]
    fn test_rejects_inconsistent_artifacts() {
        let mut short_idf = config();
        short_idf.idf = Some(vec![1.0]);
        assert!(TfidfVectorizer::from_config(short_idf).is_err());

        let mut bad_index = config();
        bad_index.vocabulary.insert("extra".to_string(), 9);
        assert!(TfidfVectorizer::from_config(bad_index).is_err());

        let mut dup_index = config();
        dup_index.vocabulary.insert("hoax".to_string(), 0);
        dup_index.vocabulary.insert("extra".to_string(), 0);
        assert!(TfidfVectorizer::from_config(dup_index).is_err());

        let mut bad_range = config();
        bad_range.ngram_range = (2, 1);
        assert!(TfidfVectorizer::from_config(bad_range).is_err());

        let mut future = config();
        future.format_version = 2;
        assert!(TfidfVectorizer::from_config(future).is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{"vocabulary": {"news": 0, "fake": 1}, "idf": [1.5, 2.0], "norm": null}"#;
        let cfg: TfidfConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.ngram_range, (1, 1));
        assert_eq!(cfg.norm, None);
        assert!(!cfg.sublinear_tf);

        let cfg: TfidfConfig = serde_json::from_str(r#"{"vocabulary": {"news": 0}}"#).unwrap();
        assert_eq!(cfg.norm, Some(Norm::L2));
        assert!(cfg.idf.is_none());
    }
}
