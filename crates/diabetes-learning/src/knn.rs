//! k-nearest-neighbors classifier.
//!
//! Distances are Euclidean over all features. Ties between equally distant
//! training rows go to the lower row index, ties between classes go to the
//! smaller label.

use crate::dataset::FeatureMatrix;
use crate::error::{LearningError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// How neighbors are weighted when voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weights {
    /// Every neighbor has one vote.
    Uniform,
    /// Each neighbor votes with weight `1 / distance`.
    Distance,
}

impl Weights {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Weights::Uniform => "uniform",
            Weights::Distance => "distance",
        }
    }
}

impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hyperparameters of a [`KnnClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KnnParams {
    pub n_neighbors: usize,
    pub weights: Weights,
}

impl KnnParams {
    pub fn new(n_neighbors: usize, weights: Weights) -> Self {
        Self {
            n_neighbors,
            weights,
        }
    }
}

impl fmt::Display for KnnParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{n_neighbors: {}, weights: {}}}",
            self.n_neighbors, self.weights
        )
    }
}

/// A fitted kNN classifier. Holds its own copy of the training data.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnClassifier {
    params: KnnParams,
    features: FeatureMatrix,
    labels: Vec<i64>,
    classes: Vec<i64>,
}

impl KnnClassifier {
    /// Fit a classifier on `features` and `labels`.
    ///
    /// # Errors
    ///
    /// - [`LearningError::InvalidConfig`] if `n_neighbors` is 0
    /// - [`LearningError::InvalidData`] if the row and label counts differ
    /// - [`LearningError::InsufficientData`] if there are no rows or fewer
    ///   rows than `n_neighbors`
    pub fn fit(params: KnnParams, features: &FeatureMatrix, labels: &[i64]) -> Result<Self> {
        if params.n_neighbors == 0 {
            return Err(LearningError::InvalidConfig(
                "n_neighbors must be at least 1".to_string(),
            ));
        }
        if features.n_rows() != labels.len() {
            return Err(LearningError::InvalidData(format!(
                "{} feature rows but {} labels",
                features.n_rows(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(LearningError::InsufficientData(
                "cannot fit on an empty training set".to_string(),
            ));
        }
        if params.n_neighbors > features.n_rows() {
            return Err(LearningError::InsufficientData(format!(
                "n_neighbors = {} exceeds the {} training rows",
                params.n_neighbors,
                features.n_rows()
            )));
        }

        let mut classes = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();

        Ok(Self {
            params,
            features: features.clone(),
            labels: labels.to_vec(),
            classes,
        })
    }

    pub fn params(&self) -> KnnParams {
        self.params
    }

    /// Sorted distinct labels seen during fitting.
    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    /// Predict a label for every row of `features`.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<i64>> {
        if !features.is_empty() && features.n_features() != self.features.n_features() {
            return Err(LearningError::InvalidData(format!(
                "expected {} features, got {}",
                self.features.n_features(),
                features.n_features()
            )));
        }
        Ok(features.rows().map(|row| self.predict_row(row)).collect())
    }

    /// Fraction of rows of `features` whose prediction equals `labels`.
    pub fn score(&self, features: &FeatureMatrix, labels: &[i64]) -> Result<f64> {
        let predicted = self.predict(features)?;
        crate::metrics::accuracy(labels, &predicted)
    }

    fn predict_row(&self, row: &[f64]) -> i64 {
        let neighbors = self.nearest(row);
        let mut votes = vec![0.0_f64; self.classes.len()];

        let exact: Vec<&(usize, f64)> = neighbors.iter().filter(|(_, d)| *d == 0.0).collect();
        match self.params.weights {
            Weights::Distance if !exact.is_empty() => {
                for (idx, _) in exact {
                    votes[self.class_index(self.labels[*idx])] += 1.0;
                }
            }
            Weights::Distance => {
                for (idx, d) in &neighbors {
                    votes[self.class_index(self.labels[*idx])] += 1.0 / d;
                }
            }
            Weights::Uniform => {
                for (idx, _) in &neighbors {
                    votes[self.class_index(self.labels[*idx])] += 1.0;
                }
            }
        }

        // First maximum wins, classes are sorted.
        let mut best = 0;
        for (i, &v) in votes.iter().enumerate().skip(1) {
            if v > votes[best] {
                best = i;
            }
        }
        self.classes[best]
    }

    /// The `n_neighbors` closest training rows as `(row index, distance)`.
    fn nearest(&self, row: &[f64]) -> Vec<(usize, f64)> {
        let mut distances: Vec<(usize, f64)> = self
            .features
            .rows()
            .enumerate()
            .map(|(idx, train_row)| (idx, euclidean(row, train_row)))
            .collect();

        distances.sort_by(|a, b| match a.1.total_cmp(&b.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        distances.truncate(self.params.n_neighbors);
        distances
    }

    fn class_index(&self, label: i64) -> usize {
        // Labels come from the training set, so the search always succeeds.
        self.classes.binary_search(&label).unwrap_or_default()
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matrix(rows: &[&[f64]]) -> FeatureMatrix {
        FeatureMatrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn training_set() -> (FeatureMatrix, Vec<i64>) {
        (
            matrix(&[&[0.0, 0.0], &[1.0, 0.0], &[0.0, 1.0], &[10.0, 10.0], &[11.0, 10.0]]),
            vec![0, 0, 0, 1, 1],
        )
    }

    #[test]
    fn test_weights_display_and_serde() {
        assert_eq!(Weights::Uniform.to_string(), "uniform");
        assert_eq!(serde_json::to_string(&Weights::Distance).unwrap(), "\"distance\"");
        let parsed: Weights = serde_json::from_str("\"uniform\"").unwrap();
        assert_eq!(parsed, Weights::Uniform);
    }

    #[test]
    fn test_predict_separated_clusters() {
        let (x, y) = training_set();
        let model = KnnClassifier::fit(KnnParams::new(3, Weights::Uniform), &x, &y).unwrap();

        let predicted = model.predict(&matrix(&[&[0.5, 0.5], &[10.5, 9.5]])).unwrap();
        assert_eq!(predicted, vec![0, 1]);
        assert_eq!(model.classes(), &[0, 1]);
    }

    #[test]
    fn test_uniform_tie_goes_to_smaller_label() {
        let x = matrix(&[&[0.0], &[2.0]]);
        let model = KnnClassifier::fit(KnnParams::new(2, Weights::Uniform), &x, &[1, 0]).unwrap();

        assert_eq!(model.predict(&matrix(&[&[1.0]])).unwrap(), vec![0]);
    }

    #[test]
    fn test_distance_weighting_favors_closer_neighbor() {
        // Two far votes for 1 against one near vote for 0.
        let x = matrix(&[&[0.0], &[3.0], &[3.5]]);
        let y = [0, 1, 1];
        let uniform = KnnClassifier::fit(KnnParams::new(3, Weights::Uniform), &x, &y).unwrap();
        let distance = KnnClassifier::fit(KnnParams::new(3, Weights::Distance), &x, &y).unwrap();

        let query = matrix(&[&[0.1]]);
        assert_eq!(uniform.predict(&query).unwrap(), vec![1]);
        assert_eq!(distance.predict(&query).unwrap(), vec![0]);
    }

    #[test]
    fn test_distance_exact_match_wins() {
        let x = matrix(&[&[0.0], &[0.5], &[0.6]]);
        let model =
            KnnClassifier::fit(KnnParams::new(3, Weights::Distance), &x, &[1, 0, 0]).unwrap();

        assert_eq!(model.predict(&matrix(&[&[0.0]])).unwrap(), vec![1]);
    }

    #[test]
    fn test_equidistant_neighbors_use_lower_index() {
        let x = matrix(&[&[-1.0], &[1.0], &[5.0]]);
        let model = KnnClassifier::fit(KnnParams::new(1, Weights::Uniform), &x, &[1, 0, 0]).unwrap();

        assert_eq!(model.predict(&matrix(&[&[0.0]])).unwrap(), vec![1]);
    }

    #[test]
    fn test_score_is_accuracy() {
        let (x, y) = training_set();
        let model = KnnClassifier::fit(KnnParams::new(1, Weights::Uniform), &x, &y).unwrap();

        assert_eq!(model.score(&x, &y).unwrap(), 1.0);
        assert_eq!(model.score(&x, &[1, 0, 0, 1, 1]).unwrap(), 0.8);
    }

    #[test]
    fn test_fit_rejects_invalid_input() {
        let (x, y) = training_set();

        let err = KnnClassifier::fit(KnnParams::new(0, Weights::Uniform), &x, &y).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        let err = KnnClassifier::fit(KnnParams::new(6, Weights::Uniform), &x, &y).unwrap_err();
        assert_eq!(err.error_code(), "INSUFFICIENT_DATA");

        let err = KnnClassifier::fit(KnnParams::new(3, Weights::Uniform), &x, &y[..4]).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DATA");
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let (x, y) = training_set();
        let model = KnnClassifier::fit(KnnParams::new(3, Weights::Uniform), &x, &y).unwrap();

        let err = model.predict(&matrix(&[&[1.0, 2.0, 3.0]])).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DATA");
    }
}
