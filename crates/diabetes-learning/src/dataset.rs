//! Feature/label views of a cleaned dataset and the train/test splitter.

use crate::error::{LearningError, Result};
use diabetes_processing::float_values;
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::debug;

/// Row-major matrix of `f64` features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    rows: Vec<Vec<f64>>,
    n_features: usize,
}

impl FeatureMatrix {
    /// Build a matrix from rows. All rows must have the same width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_features = rows.first().map_or(0, Vec::len);
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(LearningError::InvalidData(format!(
                "row {} has {} features, expected {}",
                idx,
                row.len(),
                n_features
            )));
        }
        Ok(Self { rows, n_features })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> &[f64] {
        &self.rows[idx]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Copy the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            n_features: self.n_features,
        }
    }
}

/// Features and labels of a dataset, row-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub features: FeatureMatrix,
    pub labels: Vec<i64>,
}

impl Dataset {
    /// Split a cleaned frame into the feature matrix (every column except
    /// `target`) and the label vector (`target`).
    ///
    /// # Errors
    ///
    /// - [`LearningError::TargetNotFound`] if `target` is not a column
    /// - [`LearningError::InvalidData`] if a feature is missing, non-numeric
    ///   or non-finite, or a label is missing or not a whole number
    pub fn from_frame(df: &DataFrame, target: &str) -> Result<Self> {
        let target_col = df
            .column(target)
            .map_err(|_| LearningError::TargetNotFound(target.to_string()))?;
        let labels = Self::labels_from(target_col.as_materialized_series())?;

        let features_df = df.drop(target)?;
        let feature_names: Vec<String> = features_df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows = vec![Vec::with_capacity(feature_names.len()); df.height()];
        for col in features_df.get_columns() {
            let values = float_values(col.as_materialized_series())?;
            for (row_idx, (row, value)) in rows.iter_mut().zip(values).enumerate() {
                match value {
                    Some(v) if v.is_finite() => row.push(v),
                    _ => {
                        return Err(LearningError::InvalidData(format!(
                            "feature '{}' has a missing or non-numeric value at row {}",
                            col.name(),
                            row_idx
                        )));
                    }
                }
            }
        }

        debug!(
            "Extracted {} rows x {} features, target '{}'",
            rows.len(),
            feature_names.len(),
            target
        );

        Ok(Self {
            feature_names,
            features: FeatureMatrix::from_rows(rows)?,
            labels,
        })
    }

    fn labels_from(series: &Series) -> Result<Vec<i64>> {
        float_values(series)?
            .into_iter()
            .enumerate()
            .map(|(row_idx, value)| match value {
                Some(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
                Some(v) => Err(LearningError::InvalidData(format!(
                    "label '{}' at row {} is not a class",
                    v, row_idx
                ))),
                None => Err(LearningError::InvalidData(format!(
                    "label at row {} is missing",
                    row_idx
                ))),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sorted distinct labels.
    pub fn classes(&self) -> Vec<i64> {
        let mut classes = self.labels.clone();
        classes.sort_unstable();
        classes.dedup();
        classes
    }

    /// Copy the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            features: self.features.select(indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

/// Training and held-out subsets of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
    /// Row indices (into the source dataset) of the training subset.
    pub train_indices: Vec<usize>,
    /// Row indices (into the source dataset) of the test subset.
    pub test_indices: Vec<usize>,
}

/// Randomly partition `dataset` into training and test subsets.
///
/// `ceil(test_size * n)` rows go to the test subset. Rows are drawn from a
/// permutation seeded with `seed`, so the same input and seed always give the
/// same partition. No stratification.
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(LearningError::InvalidConfig(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n = dataset.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(LearningError::InsufficientData(format!(
            "cannot split {} rows with test_size {}",
            n, test_size
        )));
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let test_indices = permutation[..n_test].to_vec();
    let train_indices = permutation[n_test..].to_vec();

    debug!("Split {} rows into {} train / {} test", n, n_train, n_test);

    Ok(TrainTestSplit {
        train: dataset.select(&train_indices),
        test: dataset.select(&test_indices),
        train_indices,
        test_indices,
    })
}
