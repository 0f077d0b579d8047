//! Mean imputation for numeric columns.

use crate::error::{ProcessingError, Result};
use crate::types::{ColumnFill, ImputationSummary};
use crate::utils::{ColumnKind, columns_of_kind, fill_numeric_nulls};
use polars::prelude::*;
use tracing::debug;

/// Statistical imputation for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Replace missing entries of every numeric column with that column's mean.
    ///
    /// Every numeric column is rewritten as `Float64`, including columns that
    /// had nothing to fill. Text and boolean columns are left untouched.
    ///
    /// # Errors
    ///
    /// [`ProcessingError::UndefinedStatistic`] if a numeric column has no
    /// observed value. The frame may already be partially imputed when this
    /// happens; callers abort the run.
    pub fn impute_numeric_means(df: &mut DataFrame) -> Result<ImputationSummary> {
        let mut summary = ImputationSummary::default();

        for col_name in columns_of_kind(df, ColumnKind::Numeric) {
            let fill = Self::apply_numeric_mean(df, &col_name)?;
            summary.fills.push(fill);
        }

        debug!(
            "Mean-imputed {} entries across {} numeric columns",
            summary.total_filled(),
            summary.fills.len()
        );
        Ok(summary)
    }

    /// Apply mean imputation to a single numeric column.
    pub fn apply_numeric_mean(df: &mut DataFrame, col_name: &str) -> Result<ColumnFill> {
        let column = df
            .column(col_name)
            .map_err(|_| ProcessingError::ColumnNotFound(col_name.to_string()))?;
        let series = column.as_materialized_series();

        let mean = series
            .mean()
            .filter(|m| m.is_finite())
            .ok_or_else(|| ProcessingError::UndefinedStatistic(col_name.to_string()))?;
        let filled = series.null_count();

        let result = fill_numeric_nulls(series, mean)?;
        df.replace(col_name, result)?;

        if filled > 0 {
            debug!("Filled {} entries of '{}' with mean: {:.4}", filled, col_name, mean);
        }

        Ok(ColumnFill {
            column: col_name.to_string(),
            mean,
            filled,
        })
    }
}
