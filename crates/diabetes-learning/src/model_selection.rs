//! Stratified k-fold cross-validation and grid search over kNN parameters.

use crate::dataset::{Dataset, FeatureMatrix};
use crate::error::{LearningError, Result};
use crate::knn::{KnnClassifier, KnnParams, Weights};
use crate::metrics::CrossValidationScores;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Train/test row indices of one fold. Both lists are ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified k-fold splitter without shuffling.
///
/// Each class keeps roughly the same proportion in every test fold. Rows of a
/// class are dealt to folds in contiguous runs in their original order, so
/// the split is fully determined by the label vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StratifiedKFold {
    n_splits: usize,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize) -> Result<Self> {
        if n_splits < 2 {
            return Err(LearningError::InvalidConfig(format!(
                "n_splits must be at least 2, got {}",
                n_splits
            )));
        }
        Ok(Self { n_splits })
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Assign every row of `labels` to a test fold.
    ///
    /// # Errors
    ///
    /// Returns [`LearningError::InsufficientData`] if there are fewer rows
    /// than folds.
    pub fn split(&self, labels: &[i64]) -> Result<Vec<Fold>> {
        let n_samples = labels.len();
        if self.n_splits > n_samples {
            return Err(LearningError::InsufficientData(format!(
                "cannot make {} folds from {} rows",
                self.n_splits, n_samples
            )));
        }

        // Classes numbered in order of first appearance.
        let mut class_ids: HashMap<i64, usize> = HashMap::new();
        let encoded: Vec<usize> = labels
            .iter()
            .map(|label| {
                let next = class_ids.len();
                *class_ids.entry(*label).or_insert(next)
            })
            .collect();
        let n_classes = class_ids.len();

        let mut class_counts = vec![0usize; n_classes];
        for &class in &encoded {
            class_counts[class] += 1;
        }
        let smallest = class_counts.iter().copied().min().unwrap_or(0);
        if smallest < self.n_splits {
            warn!(
                "The least populated class has only {} members, fewer than n_splits = {}",
                smallest, self.n_splits
            );
        }

        // allocation[fold][class]: how many rows of `class` land in `fold`,
        // taken round-robin over the sorted encoded labels.
        let mut sorted = encoded.clone();
        sorted.sort_unstable();
        let mut allocation = vec![vec![0usize; n_classes]; self.n_splits];
        for (pos, &class) in sorted.iter().enumerate() {
            allocation[pos % self.n_splits][class] += 1;
        }

        let mut test_fold = vec![0usize; n_samples];
        for class in 0..n_classes {
            let folds_for_class = (0..self.n_splits)
                .flat_map(|fold| std::iter::repeat_n(fold, allocation[fold][class]));
            let rows = encoded
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == class)
                .map(|(row, _)| row);
            for (row, fold) in rows.zip(folds_for_class) {
                test_fold[row] = fold;
            }
        }

        Ok((0..self.n_splits)
            .map(|fold| {
                let (test, train): (Vec<usize>, Vec<usize>) =
                    (0..n_samples).partition(|&row| test_fold[row] == fold);
                Fold { train, test }
            })
            .collect())
    }
}

/// Fit `params` on each fold's training rows and score it on the test rows.
///
/// Any fold failing to fit or score fails the whole call.
pub fn cross_val_score(
    params: KnnParams,
    features: &FeatureMatrix,
    labels: &[i64],
    folds: &[Fold],
) -> Result<CrossValidationScores> {
    let mut scores = Vec::with_capacity(folds.len());
    for fold in folds {
        let train_labels: Vec<i64> = fold.train.iter().map(|&i| labels[i]).collect();
        let test_labels: Vec<i64> = fold.test.iter().map(|&i| labels[i]).collect();

        let model = KnnClassifier::fit(params, &features.select(&fold.train), &train_labels)?;
        scores.push(model.score(&features.select(&fold.test), &test_labels)?);
    }
    Ok(CrossValidationScores::new(scores))
}

/// Hyperparameter values to search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub n_neighbors: Vec<usize>,
    pub weights: Vec<Weights>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            n_neighbors: vec![3, 5, 7, 9],
            weights: vec![Weights::Uniform, Weights::Distance],
        }
    }
}

impl ParamGrid {
    /// Every combination, `n_neighbors` varying slowest.
    pub fn candidates(&self) -> Vec<KnnParams> {
        self.n_neighbors
            .iter()
            .flat_map(|&k| self.weights.iter().map(move |&w| KnnParams::new(k, w)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.n_neighbors.len() * self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cross-validation outcome of one grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub params: KnnParams,
    /// Per-fold accuracies; empty when the candidate was skipped.
    pub fold_scores: Vec<f64>,
    /// Mean accuracy; `None` when `n_neighbors` exceeds a fold's training size.
    pub mean_score: Option<f64>,
}

/// Result of a [`GridSearch`].
#[derive(Debug, Clone, Serialize)]
pub struct GridSearchResult {
    /// The winning parameters refit on the full training set.
    #[serde(skip)]
    pub best_model: KnnClassifier,
    pub best_params: KnnParams,
    pub best_score: f64,
    /// One entry per grid point, in search order.
    pub candidates: Vec<CandidateScore>,
}

/// Exhaustive search over a [`ParamGrid`] scored by stratified k-fold CV.
#[derive(Debug, Clone)]
pub struct GridSearch {
    grid: ParamGrid,
    folds: StratifiedKFold,
}

impl GridSearch {
    pub fn new(grid: ParamGrid, n_splits: usize) -> Result<Self> {
        if grid.is_empty() {
            return Err(LearningError::InvalidConfig(
                "parameter grid is empty".to_string(),
            ));
        }
        Ok(Self {
            grid,
            folds: StratifiedKFold::new(n_splits)?,
        })
    }

    /// Score every candidate on `train`, pick the highest mean accuracy
    /// (first one on ties) and refit it on all of `train`.
    ///
    /// # Errors
    ///
    /// - [`LearningError::InsufficientData`] if `train` has fewer rows than
    ///   folds, or no candidate's `n_neighbors` fits the fold training size
    /// - any error from fitting or scoring a candidate
    pub fn fit(&self, train: &Dataset) -> Result<GridSearchResult> {
        let folds = self.folds.split(&train.labels)?;
        let min_train = folds.iter().map(|f| f.train.len()).min().unwrap_or(0);

        let mut candidates = Vec::with_capacity(self.grid.len());
        let mut best: Option<(KnnParams, f64)> = None;

        for params in self.grid.candidates() {
            if params.n_neighbors > min_train {
                warn!(
                    "Skipping {}: fold training sets have as few as {} rows",
                    params, min_train
                );
                candidates.push(CandidateScore {
                    params,
                    fold_scores: Vec::new(),
                    mean_score: None,
                });
                continue;
            }

            let scores = cross_val_score(params, &train.features, &train.labels, &folds)?;
            debug!("{} -> mean accuracy {:.4}", params, scores.mean);

            if best.is_none_or(|(_, best_score)| scores.mean > best_score) {
                best = Some((params, scores.mean));
            }
            candidates.push(CandidateScore {
                params,
                mean_score: Some(scores.mean),
                fold_scores: scores.scores,
            });
        }

        let (best_params, best_score) = best.ok_or_else(|| {
            LearningError::InsufficientData(format!(
                "no candidate n_neighbors fits fold training sets of {} rows",
                min_train
            ))
        })?;
        info!("Best parameters {} (mean CV accuracy {:.4})", best_params, best_score);

        let best_model = KnnClassifier::fit(best_params, &train.features, &train.labels)?;
        Ok(GridSearchResult {
            best_model,
            best_params,
            best_score,
            candidates,
        })
    }
}
