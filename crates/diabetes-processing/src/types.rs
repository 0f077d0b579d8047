use crate::utils::{ColumnKind, columns_of_kind};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Mean substituted into one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFill {
    pub column: String,
    /// Mean of the observed values.
    pub mean: f64,
    /// Number of entries that were missing and received `mean`.
    pub filled: usize,
}

/// What the imputer did, one entry per numeric column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImputationSummary {
    pub fills: Vec<ColumnFill>,
}

impl ImputationSummary {
    /// Total number of imputed entries across all columns.
    pub fn total_filled(&self) -> usize {
        self.fills.iter().map(|f| f.filled).sum()
    }

    /// The fill recorded for `column`, if it was numeric.
    pub fn fill_for(&self, column: &str) -> Option<&ColumnFill> {
        self.fills.iter().find(|f| f.column == column)
    }
}

/// Shape and column kinds of a dataset, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
}

impl DatasetSummary {
    /// Summarize the current shape and column kinds of `df`.
    pub fn from_frame(df: &DataFrame) -> Self {
        Self {
            rows: df.height(),
            columns: df
                .get_column_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
            numeric_columns: columns_of_kind(df, ColumnKind::Numeric),
            categorical_columns: columns_of_kind(df, ColumnKind::Categorical),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_total_filled() {
        let summary = ImputationSummary {
            fills: vec![
                ColumnFill { column: "Glucose".to_string(), mean: 120.0, filled: 2 },
                ColumnFill { column: "BMI".to_string(), mean: 32.0, filled: 0 },
            ],
        };
        assert_eq!(summary.total_filled(), 2);
        assert_eq!(summary.fill_for("BMI").map(|f| f.mean), Some(32.0));
        assert!(summary.fill_for("Outcome").is_none());
    }

    #[test]
    fn test_dataset_summary_from_frame() {
        let df = df![
            "Glucose" => [148.0, 85.0],
            "Gender" => ["F", "M"],
            "Outcome" => [1i64, 0],
        ]
        .unwrap();

        let summary = DatasetSummary::from_frame(&df);
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.columns, vec!["Glucose", "Gender", "Outcome"]);
        assert_eq!(summary.numeric_columns, vec!["Glucose", "Outcome"]);
        assert_eq!(summary.categorical_columns, vec!["Gender"]);
    }
}
