//! Error types for the diabetes-learning crate.
//!
//! This module defines [`LearningError`], the error type returned by the
//! splitter, the classifier, cross-validation, the tuner and the pipeline.
//! Failures are never retried; the first error aborts the run.
//!
//! # Example
//!
//! ```no_run
//! use diabetes_learning::{LearningError, PipelineConfig};
//!
//! fn configure() -> Result<PipelineConfig, LearningError> {
//!     // Errors are automatically propagated with ?
//!     let config = PipelineConfig::builder()
//!         .target_column("Outcome")
//!         .build()?;
//!     Ok(config)
//! }
//! ```

use diabetes_processing::ProcessingError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for diabetes-learning operations.
///
/// Errors raised while loading, cleaning or writing data arrive wrapped in
/// [`Processing`](Self::Processing) and keep their original code.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LearningError {
    /// Invalid configuration provided to the pipeline or a model.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Data that cannot be used for training or prediction.
    ///
    /// Common causes:
    /// - a feature column still holds missing or non-numeric values
    /// - a label is not a whole number
    /// - prediction rows have a different width than the training rows
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The target column was not found in the dataset.
    ///
    /// Column names are case-sensitive.
    #[error("Target column '{0}' not found")]
    TargetNotFound(String),

    /// Too few rows for the requested split, fold count or neighbor count.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Error from the loading and cleaning stages.
    #[error(transparent)]
    Processing(#[from] ProcessingError),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LearningError {
    /// Get a stable error code for machine consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidData(_) => "INVALID_DATA",
            Self::TargetNotFound(_) => "TARGET_NOT_FOUND",
            Self::InsufficientData(_) => "INSUFFICIENT_DATA",
            Self::Processing(inner) => inner.error_code(),
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }
}

impl Serialize for LearningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("LearningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for learning operations.
pub type Result<T> = std::result::Result<T, LearningError>;
