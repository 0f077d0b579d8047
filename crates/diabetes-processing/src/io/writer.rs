//! Writing a `DataFrame` back to a delimited file.

use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Persists a cleaned dataset as CSV.
pub struct DatasetWriter;

impl DatasetWriter {
    /// Write `df` to `path` with a header row and no index column.
    ///
    /// Missing parent directories are created. Returns the written path.
    ///
    /// # Errors
    ///
    /// [`ProcessingError::DataAccess`] when the file cannot be created or
    /// written.
    pub fn write(
        df: &mut DataFrame,
        path: impl AsRef<Path>,
        config: &ProcessingConfig,
    ) -> Result<PathBuf> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ProcessingError::data_access(parent, e))?;
        }

        let mut file = File::create(path).map_err(|e| ProcessingError::data_access(path, e))?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(config.separator)
            .finish(df)
            .map_err(|e| ProcessingError::data_access(path, e))?;

        info!(
            "Wrote {} rows x {} columns to '{}'",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::DatasetLoader;

    #[test]
    fn test_write_includes_header_without_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut df = df![
            "Glucose" => [148.0, 85.0],
            "Gender" => [1i64, 0],
        ]
        .unwrap();

        DatasetWriter::write(&mut df, &path, &ProcessingConfig::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Glucose,Gender"));
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.csv");
        let mut df = df!["a" => [1i64]].unwrap();

        let written = DatasetWriter::write(&mut df, &path, &ProcessingConfig::default()).unwrap();
        assert_eq!(written, path);
        assert!(path.is_file());
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round_trip.csv");
        let config = ProcessingConfig::default();
        let mut df = df![
            "BMI" => [33.6, 26.25, 23.3],
            "Gender" => [0i64, 1, 0],
        ]
        .unwrap();

        DatasetWriter::write(&mut df, &path, &config).unwrap();
        let reloaded = DatasetLoader::load(&path, &config).unwrap();

        assert!(reloaded.equals(&df));
    }

    #[test]
    fn test_write_into_missing_directory_that_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let mut df = df!["a" => [1i64]].unwrap();

        let err = DatasetWriter::write(&mut df, blocker.join("out.csv"), &ProcessingConfig::default())
            .unwrap_err();
        assert!(err.is_data_access());
    }
}
