//! Integration tests for loading, cleaning and writing a dataset.

use diabetes_processing::{
    DataCleaner, DatasetLoader, DatasetWriter, ProcessingConfig, ProcessingError,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_sample() -> DataFrame {
    DatasetLoader::load(
        fixtures_path().join("diabetes_sample.csv"),
        &ProcessingConfig::default(),
    )
    .expect("fixture should load")
}

fn column_f64(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_sample_shape_and_kinds() {
    let df = load_sample();

    assert_eq!(df.shape(), (10, 7));
    assert_eq!(df.column("Glucose").unwrap().null_count(), 1);
    assert_eq!(df.column("BMI").unwrap().null_count(), 2);
    assert_eq!(df.column("Gender").unwrap().dtype(), &DataType::String);
}

#[test]
fn test_load_missing_file() {
    let err = DatasetLoader::load(
        fixtures_path().join("does_not_exist.csv"),
        &ProcessingConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, ProcessingError::DataAccess { .. }));
    assert!(err.is_data_access());
}

// ============================================================================
// Cleaning
// ============================================================================

#[test]
fn test_clean_removes_missing_values_and_preserves_means() {
    let mut df = load_sample();
    let before: Vec<(String, f64)> = ["Glucose", "BloodPressure", "BMI"]
        .iter()
        .map(|name| {
            let mean = df.column(name).unwrap().as_materialized_series().mean().unwrap();
            (name.to_string(), mean)
        })
        .collect();

    let outcome = DataCleaner::clean(&mut df, &ProcessingConfig::default()).unwrap();

    assert_eq!(df.shape(), (10, 7));
    for col in df.get_columns() {
        assert_eq!(col.null_count(), 0, "column {} still has nulls", col.name());
    }
    for (name, mean_before) in before {
        let mean_after = df
            .column(&name)
            .unwrap()
            .as_materialized_series()
            .mean()
            .unwrap();
        assert!(
            (mean_after - mean_before).abs() < 1e-9,
            "{}: {} != {}",
            name,
            mean_after,
            mean_before
        );
    }

    assert_eq!(outcome.imputation.total_filled(), 4);
    let glucose = outcome.imputation.fill_for("Glucose").unwrap();
    assert_eq!(glucose.filled, 1);
    assert!((glucose.mean - 1157.0 / 9.0).abs() < 1e-9);
}

#[test]
fn test_clean_encoding_preserves_cardinality() {
    let mut df = load_sample();
    let distinct_before = df
        .column("Gender")
        .unwrap()
        .as_materialized_series()
        .n_unique()
        .unwrap();

    let outcome = DataCleaner::clean(&mut df, &ProcessingConfig::default()).unwrap();

    let gender = df.column("Gender").unwrap();
    assert_eq!(gender.dtype(), &DataType::Int64);
    assert_eq!(
        gender.as_materialized_series().n_unique().unwrap(),
        distinct_before
    );

    let codes: Vec<i64> = gender
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(codes, vec![0, 1, 0, 1, 0, 1, 0, 1, 0, 1]);

    let encoder = outcome.encoders.get("Gender").unwrap();
    assert_eq!(encoder.classes(), &["F".to_string(), "M".to_string()]);
}

#[test]
fn test_clean_all_missing_column_fails() {
    let mut df = df![
        "Glucose" => [148.0, 85.0],
        "Insulin" => [Option::<f64>::None, None],
    ]
    .unwrap();

    let err = DataCleaner::clean(&mut df, &ProcessingConfig::default()).unwrap_err();
    assert_eq!(err.error_code(), "UNDEFINED_STATISTIC");
    assert!(err.to_string().contains("Insulin"));
}

#[test]
fn test_clean_all_missing_csv_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("insulin.csv");
    std::fs::write(&path, "Glucose,Insulin,Outcome\n148,,1\n85,,0\n183,,1\n").unwrap();

    let config = ProcessingConfig::default();
    let mut df = DatasetLoader::load(&path, &config).unwrap();
    let err = DataCleaner::clean(&mut df, &config).unwrap_err();

    assert_eq!(err.error_code(), "UNDEFINED_STATISTIC");
    assert!(err.to_string().contains("Insulin"));
}

#[test]
fn test_clean_late_float_in_integer_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("late_float.csv");
    let mut content = String::from("Pregnancies,Glucose,Outcome\n");
    for i in 0..150 {
        content.push_str(&format!("{},{},{}\n", i % 10, 80 + i % 60, i % 2));
    }
    content.push_str("2.5,,1\n");
    content.push_str("3,120,1\n");
    std::fs::write(&path, content).unwrap();

    let config = ProcessingConfig::default();
    let mut df = DatasetLoader::load(&path, &config).unwrap();
    DataCleaner::clean(&mut df, &config).unwrap();

    assert_eq!(df.shape(), (152, 3));
    let pregnancies = column_f64(&df, "Pregnancies");
    assert_eq!(pregnancies[150], Some(2.5));
    for col in df.get_columns() {
        assert_eq!(col.null_count(), 0, "column {} still has nulls", col.name());
    }
}

// ============================================================================
// Writing
// ============================================================================

#[test]
fn test_write_then_reload_round_trip() {
    let config = ProcessingConfig::default();
    let mut df = load_sample();
    DataCleaner::clean(&mut df, &config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = DatasetWriter::write(&mut df, dir.path().join("nested/processed.csv"), &config)
        .unwrap();
    assert!(path.is_file());

    let reloaded = DatasetLoader::load(&path, &config).unwrap();
    assert_eq!(reloaded.shape(), df.shape());
    assert_eq!(reloaded.get_column_names(), df.get_column_names());

    for name in df.get_column_names() {
        let original = column_f64(&df, name);
        let restored = column_f64(&reloaded, name);
        for (a, b) in original.iter().zip(&restored) {
            let (a, b) = (a.unwrap(), b.unwrap());
            assert!((a - b).abs() < 1e-9, "{}: {} != {}", name, a, b);
        }
    }
}

#[test]
fn test_write_emits_header_and_no_index() {
    let config = ProcessingConfig::default();
    let mut df = df![
        "Glucose" => [148.0, 85.0],
        "Outcome" => [1i64, 0],
    ]
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = DatasetWriter::write(&mut df, dir.path().join("out.csv"), &config).unwrap();
    let text = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Glucose,Outcome");
    let first: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].parse::<f64>().unwrap(), 148.0);
    assert_eq!(first[1], "1");
}
