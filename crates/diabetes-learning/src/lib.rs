//! k-nearest-neighbors training and evaluation for the diabetes pipeline.
//!
//! Builds on [`diabetes_processing`] for loading and cleaning, then:
//!
//! - splits features from the target and holds out a seeded test subset
//! - tunes `n_neighbors` and the neighbor weighting by stratified k-fold grid search
//! - reports per-class precision/recall/F1, a confusion matrix and full-data
//!   cross-validation scores
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use diabetes_learning::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .input_path("diabetes_data.csv")
//!     .target_column("Outcome")
//!     .build()?;
//!
//! let report = Pipeline::builder().config(config).build()?.run()?;
//!
//! println!("{}", report.classification_report);
//! println!("{}", report.confusion_matrix);
//! println!("mean CV accuracy: {}", report.cross_validation.mean);
//! # Ok::<(), diabetes_learning::LearningError>(())
//! ```
//!
//! The building blocks are public for use on their own:
//!
//! ```
//! use diabetes_learning::{FeatureMatrix, KnnClassifier, KnnParams, Weights};
//!
//! let x = FeatureMatrix::from_rows(vec![vec![0.0], vec![1.0], vec![9.0], vec![10.0]])?;
//! let model = KnnClassifier::fit(KnnParams::new(1, Weights::Uniform), &x, &[0, 0, 1, 1])?;
//!
//! let query = FeatureMatrix::from_rows(vec![vec![8.5]])?;
//! assert_eq!(model.predict(&query)?, vec![1]);
//! # Ok::<(), diabetes_learning::LearningError>(())
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod knn;
pub mod metrics;
pub mod model_selection;
pub mod pipeline;
pub mod progress;
pub mod types;

// Configuration types
pub use config::{PipelineConfig, PipelineConfigBuilder};
// Data types
pub use dataset::{Dataset, FeatureMatrix, TrainTestSplit, train_test_split};
// Error types
pub use error::{LearningError, Result};
// Model types
pub use knn::{KnnClassifier, KnnParams, Weights};
// Metrics
pub use metrics::{
    AverageMetrics, ClassMetrics, ClassificationReport, ConfusionMatrix, CrossValidationScores,
    accuracy,
};
// Model selection
pub use model_selection::{
    CandidateScore, Fold, GridSearch, GridSearchResult, ParamGrid, StratifiedKFold,
    cross_val_score,
};
// Pipeline types
pub use pipeline::{Pipeline, PipelineBuilder};
// Progress reporting types
pub use progress::{ParseStageError, PipelineStage, ProgressCallback, ProgressUpdate};
// Result types
pub use types::{PipelineReport, SplitSummary};

static_assertions::assert_impl_all!(LearningError: Send, Sync);
static_assertions::assert_impl_all!(KnnClassifier: Send, Sync);
static_assertions::assert_impl_all!(Pipeline: Send, Sync);
static_assertions::assert_impl_all!(PipelineReport: Send, Sync);
