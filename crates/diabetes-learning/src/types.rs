//! Result types returned by [`Pipeline::run()`](crate::Pipeline::run).
//!
//! - [`PipelineReport`]: everything a run produced, serializable to JSON
//! - [`SplitSummary`]: sizes and seed of the train/test partition

use crate::metrics::{ClassificationReport, ConfusionMatrix, CrossValidationScores};
use crate::model_selection::GridSearchResult;
use diabetes_processing::{CleaningOutcome, DatasetSummary};
use serde::Serialize;
use std::path::PathBuf;

/// Sizes and seed of a train/test partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    pub test_size: f64,
    pub random_seed: u64,
}

/// Result of a complete pipeline run.
///
/// The fitted model itself is available as `grid_search.best_model` but is
/// left out of the JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Where the cleaned dataset was written.
    pub processed_path: PathBuf,

    /// Shape and column kinds of the loaded dataset, before cleaning.
    pub dataset: DatasetSummary,

    /// Imputed values and fitted label encoders.
    pub cleaning: CleaningOutcome,

    pub split: SplitSummary,

    /// Every grid point's CV scores plus the refit winner.
    pub grid_search: GridSearchResult,

    /// Metrics of the refit model on the held-out rows.
    pub classification_report: ClassificationReport,

    /// Confusion matrix of the refit model on the held-out rows.
    pub confusion_matrix: ConfusionMatrix,

    /// Cross-validation of the winning parameters over all rows.
    pub cross_validation: CrossValidationScores,
}

impl PipelineReport {
    /// Names of the label-encoded columns.
    pub fn encoded_columns(&self) -> Vec<&str> {
        self.cleaning.encoders.columns()
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
