//! Reading delimited files into a `DataFrame`.

use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use crate::utils::is_numeric_dtype;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Loads a headered CSV file into memory.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load the CSV file at `path`.
    ///
    /// Column order and row order follow the file. Dtypes are inferred from
    /// the whole file unless `config.infer_schema_length` caps the scan;
    /// fields matching one of `config.missing_markers` (or empty fields)
    /// become nulls. A column with no values at all is read as `Float64`,
    /// so it is treated as numeric rather than categorical.
    ///
    /// # Errors
    ///
    /// [`ProcessingError::DataAccess`] when the file is missing, unreadable
    /// or not valid CSV.
    pub fn load(path: impl AsRef<Path>, config: &ProcessingConfig) -> Result<DataFrame> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ProcessingError::data_access(path, "file not found"));
        }

        debug!("Reading '{}'", path.display());

        let null_values = NullValues::AllColumns(
            config
                .missing_markers
                .iter()
                .map(|marker| marker.as_str().into())
                .collect(),
        );

        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(config.infer_schema_length)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(config.separator)
                    .with_quote_char(Some(b'"'))
                    .with_null_values(Some(null_values)),
            )
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|e| ProcessingError::data_access(path, e))?;

        if df.width() == 0 {
            return Err(ProcessingError::data_access(path, "no header row"));
        }

        Self::cast_empty_columns(&mut df)?;

        info!(
            "Loaded '{}': {} rows x {} columns",
            path.display(),
            df.height(),
            df.width()
        );
        Ok(df)
    }

    /// Cast every all-null, non-numeric column to `Float64`.
    fn cast_empty_columns(df: &mut DataFrame) -> Result<()> {
        let height = df.height();
        if height == 0 {
            return Ok(());
        }

        let empty: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() == height && !is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect();

        for name in empty {
            debug!("Column '{}' has no values, reading it as Float64", name);
            let casted = df.column(&name)?.cast(&DataType::Float64)?;
            df.with_column(casted)?;
        }
        Ok(())
    }
}
