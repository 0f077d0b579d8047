//! End-to-end pipeline: clean, persist, tune and evaluate.
//!
//! # Overview
//!
//! [`Pipeline::run()`] executes these stages in order:
//!
//! 1. **Loading** - read the input CSV
//! 2. **Cleaning** - mean-impute numeric columns, label-encode text columns
//! 3. **Writing** - persist the cleaned table
//! 4. **Splitting** - read the written table back, separate the target and
//!    hold out the test rows
//! 5. **Tuning** - grid search with stratified k-fold CV on the training rows
//! 6. **Evaluating** - classification report and confusion matrix on the test rows
//! 7. **CrossValidating** - k-fold CV of the winning parameters on all rows
//!
//! The first failing stage aborts the run; nothing is retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use diabetes_learning::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::builder()
//!     .config(PipelineConfig::default())
//!     .on_progress(|update| println!("{}", update.message))
//!     .build()?;
//!
//! let report = pipeline.run()?;
//! println!("{}", report.classification_report);
//! # Ok::<(), diabetes_learning::LearningError>(())
//! ```

use crate::config::PipelineConfig;
use crate::dataset::{Dataset, train_test_split};
use crate::error::{LearningError, Result};
use crate::metrics::{ClassificationReport, ConfusionMatrix};
use crate::model_selection::{GridSearch, StratifiedKFold, cross_val_score};
use crate::progress::{PipelineStage, ProgressCallback, ProgressUpdate};
use crate::types::{PipelineReport, SplitSummary};
use diabetes_processing::{DataCleaner, DatasetLoader, DatasetSummary, DatasetWriter};
use tracing::info;

/// The diabetes kNN pipeline.
///
/// Use [`Pipeline::builder()`] to construct one.
pub struct Pipeline {
    config: PipelineConfig,
    progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Pipeline {
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage and collect the results.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError`] from the first stage that fails:
    /// - [`Processing`](LearningError::Processing): the input cannot be read,
    ///   a numeric column has no values to average, or the output cannot be written
    /// - [`TargetNotFound`](LearningError::TargetNotFound): the target column is absent
    /// - [`InvalidData`](LearningError::InvalidData): labels are not whole numbers
    /// - [`InsufficientData`](LearningError::InsufficientData): too few rows
    ///   to split, fold or fit any candidate
    pub fn run(&self) -> Result<PipelineReport> {
        let config = &self.config;

        self.announce(PipelineStage::Loading);
        let mut df = DatasetLoader::load(&config.input_path, &config.processing)?;
        let dataset_summary = DatasetSummary::from_frame(&df);

        self.announce(PipelineStage::Cleaning);
        let cleaning = DataCleaner::clean(&mut df, &config.processing)?;

        self.announce(PipelineStage::Writing);
        let processed_path = DatasetWriter::write(&mut df, &config.output_path, &config.processing)?;

        // Entering this stage means the processed file is on disk.
        self.announce(PipelineStage::Splitting);
        let reloaded = DatasetLoader::load(&processed_path, &config.processing)?;
        let dataset = Dataset::from_frame(&reloaded, &config.target_column)?;
        let split = train_test_split(&dataset, config.test_size, config.random_seed)?;
        let split_summary = SplitSummary {
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            test_size: config.test_size,
            random_seed: config.random_seed,
        };
        info!(
            "{} training rows, {} test rows",
            split_summary.train_rows, split_summary.test_rows
        );

        self.announce(PipelineStage::Tuning);
        let grid_search =
            GridSearch::new(config.param_grid.clone(), config.cv_folds)?.fit(&split.train)?;

        self.announce(PipelineStage::Evaluating);
        let labels = dataset.classes();
        let predictions = grid_search.best_model.predict(&split.test.features)?;
        let confusion_matrix = ConfusionMatrix::new(&split.test.labels, &predictions, &labels)?;
        let classification_report = ClassificationReport::from_confusion(&confusion_matrix);
        info!("Test accuracy {:.4}", classification_report.accuracy);

        self.announce(PipelineStage::CrossValidating);
        let folds = StratifiedKFold::new(config.cv_folds)?.split(&dataset.labels)?;
        let cross_validation = cross_val_score(
            grid_search.best_params,
            &dataset.features,
            &dataset.labels,
            &folds,
        )?;
        info!("Mean cross-validation accuracy {:.4}", cross_validation.mean);

        self.announce(PipelineStage::Complete);
        Ok(PipelineReport {
            processed_path,
            dataset: dataset_summary,
            cleaning,
            split: split_summary,
            grid_search,
            classification_report,
            confusion_matrix,
            cross_validation,
        })
    }

    fn announce(&self, stage: PipelineStage) {
        info!("{}", stage.display_name());
        if let Some(callback) = &self.progress_callback {
            callback(ProgressUpdate::for_stage(stage));
        }
    }
}

/// Builder for [`Pipeline`].
///
/// [`config()`](Self::config) is required; [`on_progress()`](Self::on_progress)
/// is optional.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("config", &self.config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl PipelineBuilder {
    #[must_use]
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Register a callback that receives a [`ProgressUpdate`] as each stage
    /// starts.
    #[must_use]
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_callback = Some(std::sync::Arc::new(callback));
        self
    }

    /// Build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InvalidConfig`] if no configuration was set or
    /// the configuration fails validation.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.ok_or_else(|| {
            LearningError::InvalidConfig("Pipeline config is required".to_string())
        })?;
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_callback: self.progress_callback,
        })
    }
}
