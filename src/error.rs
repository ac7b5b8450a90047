//! Error types for the gridspline crate.
//!
//! This module defines a single error enum that covers grid marshalling,
//! backend construction, model evaluation, configuration and output.

use thiserror::Error;

/// The main error type for gridspline operations.
#[derive(Error, Debug)]
pub enum GridError {
    /// Input grids, axes or sample sets of inconsistent shape
    #[error("Shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// Axis values that are empty, non-finite or not strictly increasing
    #[error("Invalid axis: {message}")]
    InvalidAxis { message: String },

    /// The requested interpolation backend cannot be provided
    #[error("Backend unavailable: {name} - {message}")]
    BackendUnavailable { name: String, message: String },

    /// The backend rejected the sample set or the degree parameter
    #[error("Model construction error: {message}")]
    ModelConstruction { message: String },

    /// A single point evaluation failed
    #[error("Evaluation error: {message}")]
    Evaluation { message: String },

    /// A point evaluation fell outside the fitted domain
    #[error("Point outside domain: dimension {dimension} value {value} not in [{lower}, {upper}]")]
    OutOfDomain {
        dimension: usize,
        value: f64,
        lower: f64,
        upper: f64,
    },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    /// Whether this error was signalled by a model evaluation.
    pub fn is_evaluation_error(&self) -> bool {
        matches!(
            self,
            GridError::Evaluation { .. } | GridError::OutOfDomain { .. }
        )
    }

    pub(crate) fn shape(message: impl Into<String>) -> Self {
        GridError::ShapeMismatch {
            message: message.into(),
        }
    }

    pub(crate) fn construction(message: impl Into<String>) -> Self {
        GridError::ModelConstruction {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with GridError
pub type Result<T> = std::result::Result<T, GridError>;
