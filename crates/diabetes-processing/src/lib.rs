//! Data cleaning library for the diabetes kNN pipeline.
//!
//! Loads a headered CSV file into a polars [`DataFrame`](polars::prelude::DataFrame),
//! fills missing numeric values with the column mean, label-encodes text
//! columns, and writes the cleaned table back out.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use diabetes_processing::{DataCleaner, DatasetLoader, DatasetWriter, ProcessingConfig};
//!
//! let config = ProcessingConfig::default();
//! let mut df = DatasetLoader::load("diabetes_data.csv", &config)?;
//!
//! let outcome = DataCleaner::clean(&mut df, &config)?;
//! println!("Imputed {} values", outcome.imputation.total_filled());
//!
//! DatasetWriter::write(&mut df, "processed_diabetes_data.csv", &config)?;
//! ```
//!
//! # Column kinds
//!
//! The kind of each column is decided from the dtype polars infers at load
//! time: integer and float columns are numeric and get mean-imputed, string
//! columns are categorical and get label-encoded, anything else (booleans,
//! dates) passes through untouched. A column with no values at all is read as
//! `Float64`, so it counts as numeric.

pub mod cleaner;
pub mod config;
pub mod encoders;
pub mod error;
pub mod imputers;
pub mod io;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{CleaningOutcome, DataCleaner};
pub use config::{ConfigValidationError, ProcessingConfig, ProcessingConfigBuilder};
pub use encoders::{CategoricalEncoder, EncoderSet, LabelEncoder};
pub use error::{ProcessingError, Result as ProcessingResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use io::{DatasetLoader, DatasetWriter};
pub use types::{ColumnFill, DatasetSummary, ImputationSummary};
pub use utils::{ColumnKind, column_kind, columns_of_kind, float_values, is_numeric_dtype};

static_assertions::assert_impl_all!(ProcessingError: Send, Sync);
static_assertions::assert_impl_all!(EncoderSet: Send, Sync);
