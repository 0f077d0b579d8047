//! Classification metrics and their text renderings.

use crate::error::{LearningError, Result};
use serde::Serialize;
use std::fmt;

/// Fraction of positions where `y_pred` equals `y_true`.
///
/// # Errors
///
/// Returns [`LearningError::InvalidData`] if the slices differ in length or
/// are empty.
pub fn accuracy(y_true: &[i64], y_pred: &[i64]) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

fn check_lengths(y_true: &[i64], y_pred: &[i64]) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(LearningError::InvalidData(format!(
            "{} true labels but {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(LearningError::InvalidData(
            "cannot score an empty prediction set".to_string(),
        ));
    }
    Ok(())
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Counts of (true class, predicted class) pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    /// Class labels, in row/column order.
    pub labels: Vec<i64>,
    /// `counts[i][j]` = rows of class `labels[i]` predicted as `labels[j]`.
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Tally `y_true` against `y_pred` over `labels`. Pairs involving a label
    /// outside `labels` are not counted.
    pub fn new(y_true: &[i64], y_pred: &[i64], labels: &[i64]) -> Result<Self> {
        check_lengths(y_true, y_pred)?;
        let mut counts = vec![vec![0usize; labels.len()]; labels.len()];
        for (t, p) in y_true.iter().zip(y_pred) {
            if let (Some(i), Some(j)) = (
                labels.iter().position(|l| l == t),
                labels.iter().position(|l| l == p),
            ) {
                counts[i][j] += 1;
            }
        }
        Ok(Self {
            labels: labels.to_vec(),
            counts,
        })
    }

    pub fn true_positives(&self, class_idx: usize) -> usize {
        self.counts[class_idx][class_idx]
    }

    /// Number of rows whose true class is `labels[class_idx]`.
    pub fn support(&self, class_idx: usize) -> usize {
        self.counts[class_idx].iter().sum()
    }

    /// Number of rows predicted as `labels[class_idx]`.
    pub fn predicted(&self, class_idx: usize) -> usize {
        self.counts.iter().map(|row| row[class_idx]).sum()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

impl fmt::Display for ConfusionMatrix {
    /// Renders as a bracketed integer grid, entries right-aligned to a common
    /// width: `[[12  3]\n [ 4 20]]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .counts
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        write!(f, "[")?;
        for (i, row) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, "\n ")?;
            }
            let cells: Vec<String> = row.iter().map(|c| format!("{:>width$}", c)).collect();
            write!(f, "[{}]", cells.join(" "))?;
        }
        write!(f, "]")
    }
}

/// Precision, recall, F1 and support of one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: i64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// An averaged row of a [`ClassificationReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Per-class and averaged classification metrics.
///
/// Zero denominators give 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

impl ClassificationReport {
    pub fn new(y_true: &[i64], y_pred: &[i64], labels: &[i64]) -> Result<Self> {
        let matrix = ConfusionMatrix::new(y_true, y_pred, labels)?;
        Ok(Self::from_confusion(&matrix))
    }

    pub fn from_confusion(matrix: &ConfusionMatrix) -> Self {
        let classes: Vec<ClassMetrics> = matrix
            .labels
            .iter()
            .enumerate()
            .map(|(idx, &label)| {
                let tp = matrix.true_positives(idx) as f64;
                let support = matrix.support(idx);
                let precision = ratio(tp, matrix.predicted(idx) as f64);
                let recall = ratio(tp, support as f64);
                ClassMetrics {
                    label,
                    precision,
                    recall,
                    f1_score: ratio(2.0 * precision * recall, precision + recall),
                    support,
                }
            })
            .collect();

        let total = matrix.total();
        let correct: usize = (0..matrix.labels.len())
            .map(|idx| matrix.true_positives(idx))
            .sum();
        let n_classes = classes.len() as f64;

        let macro_avg = AverageMetrics {
            precision: ratio(classes.iter().map(|c| c.precision).sum(), n_classes),
            recall: ratio(classes.iter().map(|c| c.recall).sum(), n_classes),
            f1_score: ratio(classes.iter().map(|c| c.f1_score).sum(), n_classes),
            support: total,
        };
        let weighted = |value: fn(&ClassMetrics) -> f64| {
            ratio(
                classes.iter().map(|c| value(c) * c.support as f64).sum(),
                total as f64,
            )
        };
        let weighted_avg = AverageMetrics {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1_score: weighted(|c| c.f1_score),
            support: total,
        };

        Self {
            accuracy: ratio(correct as f64, total as f64),
            classes,
            macro_avg,
            weighted_avg,
        }
    }

    pub fn labels(&self) -> Vec<i64> {
        self.classes.iter().map(|c| c.label).collect()
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LAST_HEADING: &str = "weighted avg";
        let names: Vec<String> = self.classes.iter().map(|c| c.label.to_string()).collect();
        let width = names
            .iter()
            .map(String::len)
            .chain(std::iter::once(LAST_HEADING.len()))
            .max()
            .unwrap_or(LAST_HEADING.len());

        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (name, c) in names.iter().zip(&self.classes) {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, c.precision, c.recall, c.f1_score, c.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$}  {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (heading, avg) in [("macro avg", &self.macro_avg), (LAST_HEADING, &self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}",
                heading, avg.precision, avg.recall, avg.f1_score, avg.support
            )?;
        }
        Ok(())
    }
}

/// Per-fold accuracies of a cross-validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidationScores {
    pub scores: Vec<f64>,
    pub mean: f64,
}

impl CrossValidationScores {
    pub fn new(scores: Vec<f64>) -> Self {
        let mean = ratio(scores.iter().sum(), scores.len() as f64);
        Self { scores, mean }
    }
}

impl fmt::Display for CrossValidationScores {
    /// Space-separated scores in brackets: `[0.8 0.75 0.9]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self.scores.iter().map(|s| s.to_string()).collect();
        write!(f, "[{}]", cells.join(" "))
    }
}
