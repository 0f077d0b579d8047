//! Custom error types for the data cleaning stages.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! loader, imputer, encoder and writer. None of these errors are recovered
//! from inside the pipeline; they propagate to the caller as-is.
//!
//! Errors are serializable so a failed run can be reported as JSON.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::Path;
use thiserror::Error;

/// The main error type for the cleaning stages.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// A file could not be read, parsed, created or written.
    #[error("Cannot access '{path}': {reason}")]
    DataAccess { path: String, reason: String },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A numeric column has no observed values, so its mean is undefined.
    #[error("Mean of column '{0}' is undefined: every value is missing")]
    UndefinedStatistic(String),

    /// A categorical value (or code) was not seen when the encoder was fitted.
    #[error("Unknown category '{value}' for column '{column}'")]
    UnknownCategory { column: String, value: String },

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProcessingError>,
    },
}

impl ProcessingError {
    /// Build a [`ProcessingError::DataAccess`] for `path`.
    pub fn data_access(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        ProcessingError::DataAccess {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProcessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataAccess { .. } => "DATA_ACCESS",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::UndefinedStatistic(_) => "UNDEFINED_STATISTIC",
            Self::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error comes from the filesystem or the CSV parser.
    pub fn is_data_access(&self) -> bool {
        match self {
            Self::DataAccess { .. } => true,
            Self::WithContext { source, .. } => source.is_data_access(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ProcessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProcessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
