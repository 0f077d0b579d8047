//! Data cleaning module.
//!
//! Runs the two in-place cleaning passes in order:
//! 1. Mean imputation of numeric columns
//! 2. Label encoding of text columns

use crate::config::ProcessingConfig;
use crate::encoders::{CategoricalEncoder, EncoderSet};
use crate::error::{Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::types::ImputationSummary;
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

/// What a cleaning pass changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningOutcome {
    pub imputation: ImputationSummary,
    pub encoders: EncoderSet,
}

/// Imputes and encodes a loaded dataset.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean `df` in place. Row and column counts are unchanged.
    pub fn clean(df: &mut DataFrame, config: &ProcessingConfig) -> Result<CleaningOutcome> {
        let shape = df.shape();

        let imputation =
            StatisticalImputer::impute_numeric_means(df).context("Mean imputation failed")?;
        info!(
            "Imputed {} missing values across {} numeric columns",
            imputation.total_filled(),
            imputation.fills.len()
        );

        let encoders = CategoricalEncoder::encode_all(df, config).context("Label encoding failed")?;
        info!("Encoded {} categorical columns", encoders.len());

        debug_assert_eq!(shape, df.shape());
        Ok(CleaningOutcome {
            imputation,
            encoders,
        })
    }
}
