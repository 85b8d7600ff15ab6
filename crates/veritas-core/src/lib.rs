//! Veritas Core
//!
//! Core types and error handling shared across Veritas components.
//!
//! This crate provides:
//! - The error taxonomy used from artifact loading up to the HTTP boundary
//! - Prediction result types (label, confidence, input preview)

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    confidence_display, input_preview, Confidence, Label, Prediction, PredictionResult,
    PREVIEW_CHARS,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Confidence, Label, Prediction, PredictionResult};
}
