//! Prediction result types shared by the classifier and server crates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of characters of the original input echoed back in responses
pub const PREVIEW_CHARS: usize = 120;

/// Binary label produced by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Real,
    Fake,
}

impl Label {
    /// Map a raw classifier class value onto a label.
    ///
    /// Only class `1` is `REAL`. Every other value, including ones the
    /// training pipeline never emitted, falls through to `FAKE`.
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Self::Real
        } else {
            Self::Fake
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "REAL",
            Self::Fake => "FAKE",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence as a percentage in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Confidence(f64);

impl Confidence {
    /// Build from a probability in `[0, 1]`; out-of-range input is clamped
    pub fn from_probability(p: f64) -> Self {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        Self(p * 100.0)
    }

    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

/// Render an optional confidence the way the API reports it.
///
/// A zero confidence is reported as unavailable, same as a classifier
/// without probability estimates.
pub fn confidence_display(confidence: Option<Confidence>) -> String {
    match confidence {
        Some(c) if c.percent() > 0.0 => c.to_string(),
        _ => "N/A".to_string(),
    }
}

/// Label plus optional confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub label: Label,
    pub confidence: Option<Confidence>,
}

/// A prediction together with the preview of the input that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub result: PredictionResult,
    pub input_preview: String,
}

/// First [`PREVIEW_CHARS`] characters of `text`, with `...` appended when cut
pub fn input_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
