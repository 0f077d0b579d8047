//! Categorical encoding module.
//!
//! Every text column is label-encoded independently. The fitted tables are
//! returned as an [`EncoderSet`] so the same mapping can be reapplied later.

mod label;

pub use label::LabelEncoder;

use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use crate::utils::{ColumnKind, columns_of_kind, string_values};
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

/// The fitted encoders of a dataset, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EncoderSet {
    encoders: Vec<LabelEncoder>,
}

impl EncoderSet {
    /// Encoder fitted for `column`, if the column was categorical.
    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.iter().find(|e| e.column() == column)
    }

    /// Names of the encoded columns.
    pub fn columns(&self) -> Vec<&str> {
        self.encoders.iter().map(LabelEncoder::column).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelEncoder> {
        self.encoders.iter()
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}

/// Label encoding for every text column of a frame.
pub struct CategoricalEncoder;

impl CategoricalEncoder {
    /// Replace every text column with its `Int64` codes.
    ///
    /// Missing entries are encoded as `config.missing_category`, which then
    /// counts as one more distinct value of the column.
    pub fn encode_all(df: &mut DataFrame, config: &ProcessingConfig) -> Result<EncoderSet> {
        let mut set = EncoderSet::default();

        for col_name in columns_of_kind(df, ColumnKind::Categorical) {
            let encoder = Self::encode_column(df, &col_name, &config.missing_category)?;
            set.encoders.push(encoder);
        }

        Ok(set)
    }

    /// Fit a [`LabelEncoder`] on one column and replace it with its codes.
    pub fn encode_column(
        df: &mut DataFrame,
        col_name: &str,
        missing_category: &str,
    ) -> Result<LabelEncoder> {
        let values = {
            let series = df
                .column(col_name)
                .map_err(|_| ProcessingError::ColumnNotFound(col_name.to_string()))?
                .as_materialized_series();
            string_values(series, missing_category)?
        };

        let encoder = LabelEncoder::fit(col_name, &values);
        let codes = encoder.transform(&values)?;
        df.replace(col_name, Series::new(col_name.into(), codes))?;

        debug!(
            "Encoded '{}' into {} codes: {:?}",
            col_name,
            encoder.n_classes(),
            encoder.classes()
        );
        Ok(encoder)
    }
}
