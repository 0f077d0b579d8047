//! Configuration for the diabetes kNN pipeline.
//!
//! [`PipelineConfig::default()`] is the fixed procedure: read
//! `diabetes_data.csv`, write `processed_diabetes_data.csv`, predict
//! `Outcome`, hold out 30% with seed 42, and search k in {3, 5, 7, 9} with
//! both weightings under 5-fold CV.
//!
//! # Example
//!
//! ```
//! use diabetes_learning::PipelineConfig;
//!
//! let config = PipelineConfig::builder()
//!     .target_column("Outcome")
//!     .cv_folds(5)
//!     .test_size(0.3)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.random_seed, 42);
//! ```

use crate::error::LearningError;
use crate::knn::Weights;
use crate::model_selection::ParamGrid;
use diabetes_processing::ProcessingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_INPUT_PATH: &str = "diabetes_data.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "processed_diabetes_data.csv";
pub const DEFAULT_TARGET_COLUMN: &str = "Outcome";
pub const DEFAULT_TEST_SIZE: f64 = 0.3;
pub const DEFAULT_RANDOM_SEED: u64 = 42;
pub const DEFAULT_CV_FOLDS: usize = 5;

/// Configuration for a pipeline run.
///
/// Use [`PipelineConfig::builder()`] to override individual values.
///
/// # Validation
///
/// [`build()`](PipelineConfigBuilder::build) checks that:
/// - `test_size` is in `(0.0, 1.0)` (exclusive)
/// - `cv_folds` is at least 2
/// - the neighbor grid is non-empty and every value is at least 1
/// - the weight grid is non-empty
/// - the embedded [`ProcessingConfig`] is valid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// CSV file to read.
    pub input_path: PathBuf,

    /// Where the cleaned CSV is written (and re-read from).
    pub output_path: PathBuf,

    /// Column holding the class labels. Case-sensitive.
    pub target_column: String,

    /// Fraction of rows held out for evaluation (default: 0.3).
    pub test_size: f64,

    /// Seed of the train/test shuffle (default: 42).
    pub random_seed: u64,

    /// Hyperparameter values searched by the tuner.
    pub param_grid: ParamGrid,

    /// Folds used by the tuner and by the final cross-validation (default: 5).
    pub cv_folds: usize,

    /// CSV parsing and missing-value settings.
    pub processing: ProcessingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            test_size: DEFAULT_TEST_SIZE,
            random_seed: DEFAULT_RANDOM_SEED,
            param_grid: ParamGrid::default(),
            cv_folds: DEFAULT_CV_FOLDS,
            processing: ProcessingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a new builder starting from the defaults.
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Check every constraint listed on the type.
    pub fn validate(&self) -> Result<(), LearningError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(LearningError::InvalidConfig(
                "test_size must be between 0.0 and 1.0 (exclusive)".to_string(),
            ));
        }

        if self.cv_folds < 2 {
            return Err(LearningError::InvalidConfig(
                "cv_folds must be at least 2".to_string(),
            ));
        }

        if self.param_grid.n_neighbors.is_empty() {
            return Err(LearningError::InvalidConfig(
                "n_neighbors grid must not be empty".to_string(),
            ));
        }
        if self.param_grid.n_neighbors.contains(&0) {
            return Err(LearningError::InvalidConfig(
                "n_neighbors values must be at least 1".to_string(),
            ));
        }

        if self.param_grid.weights.is_empty() {
            return Err(LearningError::InvalidConfig(
                "weights grid must not be empty".to_string(),
            ));
        }

        if self.target_column.is_empty() {
            return Err(LearningError::InvalidConfig(
                "target_column must not be empty".to_string(),
            ));
        }

        self.processing
            .validate()
            .map_err(|e| LearningError::InvalidConfig(e.to_string()))
    }
}

/// Builder for [`PipelineConfig`].
///
/// Created via [`PipelineConfig::builder()`]. Unset values keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    #[must_use]
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input_path = path.into();
        self
    }

    #[must_use]
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    #[must_use]
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.config.target_column = column.into();
        self
    }

    /// Set the held-out fraction (default: 0.3).
    ///
    /// [`build()`](Self::build) fails unless `0.0 < size < 1.0`.
    #[must_use]
    pub fn test_size(mut self, size: f64) -> Self {
        self.config.test_size = size;
        self
    }

    #[must_use]
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.config.random_seed = seed;
        self
    }

    /// Replace the neighbor counts searched (default: 3, 5, 7, 9).
    #[must_use]
    pub fn n_neighbors(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.config.param_grid.n_neighbors = values.into_iter().collect();
        self
    }

    /// Replace the weightings searched (default: uniform, distance).
    #[must_use]
    pub fn weights(mut self, values: impl IntoIterator<Item = Weights>) -> Self {
        self.config.param_grid.weights = values.into_iter().collect();
        self
    }

    /// Set the number of cross-validation folds (default: 5).
    ///
    /// [`build()`](Self::build) fails if `folds < 2`.
    #[must_use]
    pub fn cv_folds(mut self, folds: usize) -> Self {
        self.config.cv_folds = folds;
        self
    }

    #[must_use]
    pub fn processing(mut self, processing: ProcessingConfig) -> Self {
        self.config.processing = processing;
        self
    }

    /// Build the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidConfig`] naming the first violated
    /// constraint.
    pub fn build(self) -> Result<PipelineConfig, LearningError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
