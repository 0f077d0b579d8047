//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with their mean; see [`StatisticalImputer`].

mod statistical;

pub use statistical::StatisticalImputer;
