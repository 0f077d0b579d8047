//! Configuration for reading, cleaning and writing delimited data.
//!
//! Uses the builder pattern; every field has a default matching the
//! behavior of the fixed diabetes pipeline.

use serde::{Deserialize, Serialize};

/// Field values read as missing, in addition to empty fields.
pub const DEFAULT_MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Category substituted for missing entries of a text column before encoding.
pub const DEFAULT_MISSING_CATEGORY: &str = "nan";

/// Configuration for the cleaning stages.
///
/// Use [`ProcessingConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use diabetes_processing::ProcessingConfig;
///
/// let config = ProcessingConfig::builder()
///     .separator(b';')
///     .infer_schema_length(500)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Number of rows scanned to infer column dtypes; `None` scans the
    /// whole file.
    /// Default: None
    pub infer_schema_length: Option<usize>,

    /// Field separator used for both reading and writing.
    /// Default: b','
    pub separator: u8,

    /// Field values treated as missing when reading.
    /// Default: [`DEFAULT_MISSING_MARKERS`]
    pub missing_markers: Vec<String>,

    /// Category that missing text values are encoded as.
    /// Default: "nan"
    pub missing_category: String,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            infer_schema_length: None,
            separator: b',',
            missing_markers: DEFAULT_MISSING_MARKERS.iter().map(|m| m.to_string()).collect(),
            missing_category: DEFAULT_MISSING_CATEGORY.to_string(),
        }
    }
}

impl ProcessingConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProcessingConfigBuilder {
        ProcessingConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidSchemaLength);
        }

        if self.separator == b'\n' || self.separator == b'"' {
            return Err(ConfigValidationError::InvalidSeparator(self.separator as char));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid schema inference length: must be at least 1 row")]
    InvalidSchemaLength,

    #[error("Invalid separator {0:?}")]
    InvalidSeparator(char),
}

/// Builder for [`ProcessingConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProcessingConfigBuilder {
    infer_schema_length: Option<usize>,
    separator: Option<u8>,
    missing_markers: Option<Vec<String>>,
    missing_category: Option<String>,
}

impl ProcessingConfigBuilder {
    /// Limit dtype inference to the first `rows` rows.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the field separator.
    pub fn separator(mut self, separator: u8) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Replace the list of values read as missing.
    pub fn missing_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }

    /// Set the category used for missing text values.
    pub fn missing_category(mut self, category: impl Into<String>) -> Self {
        self.missing_category = Some(category.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProcessingConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProcessingConfig, ConfigValidationError> {
        let defaults = ProcessingConfig::default();
        let config = ProcessingConfig {
            infer_schema_length: self.infer_schema_length.or(defaults.infer_schema_length),
            separator: self.separator.unwrap_or(defaults.separator),
            missing_markers: self.missing_markers.unwrap_or(defaults.missing_markers),
            missing_category: self.missing_category.unwrap_or(defaults.missing_category),
        };

        config.validate()?;
        Ok(config)
    }
}
