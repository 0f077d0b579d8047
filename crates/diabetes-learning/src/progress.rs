//! Progress reporting for the pipeline.
//!
//! The pipeline announces each [`PipelineStage`] it enters, both as an `info`
//! log line and, when one is registered, through a [`ProgressCallback`].
//!
//! # Example
//!
//! ```
//! use diabetes_learning::{Pipeline, PipelineConfig, ProgressUpdate};
//!
//! let _pipeline = Pipeline::builder()
//!     .config(PipelineConfig::default())
//!     .on_progress(|update: ProgressUpdate| {
//!         println!("{:.0}% - {}", update.progress * 100.0, update.stage.display_name());
//!     })
//!     .build();
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The stages of a pipeline run, in execution order.
///
/// [`Complete`](Self::Complete) is the only terminal stage; a failing stage
/// ends the run with an error instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum PipelineStage {
    /// Reading the input CSV.
    #[default]
    Loading,
    /// Mean imputation and label encoding.
    Cleaning,
    /// Writing the cleaned CSV.
    Writing,
    /// Reading the cleaned CSV back, separating features from labels and
    /// holding out the test rows. Entered only once the cleaned CSV is written.
    Splitting,
    /// Grid search over kNN hyperparameters.
    Tuning,
    /// Classification report and confusion matrix on the test rows.
    Evaluating,
    /// Cross-validation of the chosen parameters over the whole dataset.
    CrossValidating,
    /// The run finished.
    Complete,
}

impl PipelineStage {
    /// All stages, in execution order.
    pub const ALL: [PipelineStage; 8] = [
        PipelineStage::Loading,
        PipelineStage::Cleaning,
        PipelineStage::Writing,
        PipelineStage::Splitting,
        PipelineStage::Tuning,
        PipelineStage::Evaluating,
        PipelineStage::CrossValidating,
        PipelineStage::Complete,
    ];

    /// Machine-readable name.
    ///
    /// ```
    /// use diabetes_learning::PipelineStage;
    ///
    /// assert_eq!(PipelineStage::CrossValidating.as_str(), "cross_validating");
    /// ```
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Loading => "loading",
            PipelineStage::Cleaning => "cleaning",
            PipelineStage::Writing => "writing",
            PipelineStage::Splitting => "splitting",
            PipelineStage::Tuning => "tuning",
            PipelineStage::Evaluating => "evaluating",
            PipelineStage::CrossValidating => "cross_validating",
            PipelineStage::Complete => "complete",
        }
    }

    /// Human-readable name used in log lines.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            PipelineStage::Loading => "Loading dataset",
            PipelineStage::Cleaning => "Imputing and encoding",
            PipelineStage::Writing => "Writing processed dataset",
            PipelineStage::Splitting => "Splitting train/test",
            PipelineStage::Tuning => "Tuning hyperparameters",
            PipelineStage::Evaluating => "Evaluating on test set",
            PipelineStage::CrossValidating => "Cross-validating on full dataset",
            PipelineStage::Complete => "Complete",
        }
    }

    /// Fraction of the run finished when this stage starts.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let last = Self::ALL.len() - 1;
        let position = Self::ALL.iter().position(|s| s == self).unwrap_or(last);
        position as f64 / last as f64
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Complete)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when parsing an unknown [`PipelineStage`] name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStageError {
    invalid_value: String,
}

impl ParseStageError {
    #[must_use]
    pub fn invalid_value(&self) -> &str {
        &self.invalid_value
    }
}

impl fmt::Display for ParseStageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid pipeline stage: '{}'. Valid values are: loading, cleaning, writing, \
             splitting, tuning, evaluating, cross_validating, complete",
            self.invalid_value
        )
    }
}

impl std::error::Error for ParseStageError {}

impl FromStr for PipelineStage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineStage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| ParseStageError {
                invalid_value: s.to_string(),
            })
    }
}

/// A progress update sent to the [`ProgressCallback`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,

    /// Overall progress from 0.0 to 1.0. Increases monotonically.
    pub progress: f64,

    pub message: String,
}

impl ProgressUpdate {
    pub fn for_stage(stage: PipelineStage) -> Self {
        Self {
            stage,
            progress: stage.progress(),
            message: stage.display_name().to_string(),
        }
    }
}

impl Default for ProgressUpdate {
    fn default() -> Self {
        Self::for_stage(PipelineStage::default())
    }
}

/// Callback invoked with every [`ProgressUpdate`]. Runs on the pipeline's
/// thread, so it should return quickly.
pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;
