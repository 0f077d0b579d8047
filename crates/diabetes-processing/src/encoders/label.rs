//! Label encoding of text columns.
//!
//! Maps each distinct value of a column to an integer code (0, 1, 2, ...),
//! in sorted value order.

use crate::error::{ProcessingError, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Fitted label encoder for one column.
///
/// Classes are kept in sorted order; a value's code is its position in
/// [`classes()`](Self::classes). The table is fixed once fitted: values that
/// were not present at fit time have no code and are rejected by
/// [`transform`](Self::transform).
///
/// # Example
///
/// ```
/// use diabetes_processing::LabelEncoder;
///
/// let values = ["M", "F", "M"].map(String::from);
/// let encoder = LabelEncoder::fit("Gender", &values);
///
/// assert_eq!(encoder.classes(), ["F".to_string(), "M".to_string()]);
/// assert_eq!(encoder.transform(&values).unwrap(), vec![1, 0, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEncoder {
    column: String,
    classes: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, i64>,
}

impl LabelEncoder {
    /// Fit an encoder on the values of `column`.
    pub fn fit(column: impl Into<String>, values: &[String]) -> Self {
        let classes: Vec<String> = values
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self::from_classes(column, classes)
    }

    /// Rebuild an encoder from a previously fitted class list.
    ///
    /// `classes` is sorted and deduplicated so codes stay consistent with
    /// [`fit`](Self::fit).
    pub fn from_classes(column: impl Into<String>, mut classes: Vec<String>) -> Self {
        classes.sort();
        classes.dedup();
        let index = classes
            .iter()
            .enumerate()
            .map(|(code, class)| (class.clone(), code as i64))
            .collect();

        Self {
            column: column.into(),
            classes,
            index,
        }
    }

    /// Name of the encoded column.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Distinct values in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of distinct values.
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Code assigned to `value`, if it was seen at fit time.
    pub fn code_of(&self, value: &str) -> Option<i64> {
        self.index.get(value).copied()
    }

    /// Encode values to codes.
    ///
    /// # Errors
    ///
    /// [`ProcessingError::UnknownCategory`] for the first value that was not
    /// seen at fit time.
    pub fn transform(&self, values: &[String]) -> Result<Vec<i64>> {
        values
            .iter()
            .map(|value| {
                self.code_of(value)
                    .ok_or_else(|| ProcessingError::UnknownCategory {
                        column: self.column.clone(),
                        value: value.clone(),
                    })
            })
            .collect()
    }

    /// Decode codes back to their original values.
    ///
    /// # Errors
    ///
    /// [`ProcessingError::UnknownCategory`] for a code outside the table.
    pub fn inverse_transform(&self, codes: &[i64]) -> Result<Vec<String>> {
        codes
            .iter()
            .map(|&code| {
                usize::try_from(code)
                    .ok()
                    .and_then(|idx| self.classes.get(idx))
                    .cloned()
                    .ok_or_else(|| ProcessingError::UnknownCategory {
                        column: self.column.clone(),
                        value: code.to_string(),
                    })
            })
            .collect()
    }
}
