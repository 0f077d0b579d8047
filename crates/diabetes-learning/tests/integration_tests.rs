//! Integration tests for the full clean-tune-evaluate pipeline.

use diabetes_learning::{
    Dataset, GridSearch, LearningError, ParamGrid, Pipeline, PipelineConfig, PipelineReport,
    PipelineStage, train_test_split,
};
use diabetes_processing::{DataCleaner, DatasetLoader, ProcessingConfig};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn config_for(output_dir: &Path) -> PipelineConfig {
    PipelineConfig::builder()
        .input_path(fixture("diabetes_sample.csv"))
        .output_path(output_dir.join("processed_diabetes_data.csv"))
        .build()
        .unwrap()
}

fn run_sample(output_dir: &Path) -> PipelineReport {
    Pipeline::builder()
        .config(config_for(output_dir))
        .build()
        .unwrap()
        .run()
        .expect("pipeline should succeed on the sample")
}

fn cleaned_sample() -> Dataset {
    let config = ProcessingConfig::default();
    let mut df = DatasetLoader::load(fixture("diabetes_sample.csv"), &config).unwrap();
    DataCleaner::clean(&mut df, &config).unwrap();
    Dataset::from_frame(&df, "Outcome").unwrap()
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_end_to_end_sample() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_sample(dir.path());

    // Processed file: same shape, nothing missing, Gender encoded to {0, 1}.
    let processed =
        DatasetLoader::load(&report.processed_path, &ProcessingConfig::default()).unwrap();
    assert_eq!(processed.shape(), (10, 7));
    for col in processed.get_columns() {
        assert_eq!(col.null_count(), 0, "column {} still has nulls", col.name());
    }
    let gender: Vec<i64> = processed
        .column("Gender")
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert!(gender.iter().all(|code| *code == 0 || *code == 1));
    assert_eq!(report.encoded_columns(), vec!["Gender"]);

    // Split: ceil(0.3 * 10) rows held out.
    assert_eq!(report.split.test_rows, 3);
    assert_eq!(report.split.train_rows, 7);

    // Evaluation covers exactly the two classes.
    assert_eq!(report.classification_report.labels(), vec![0, 1]);
    assert_eq!(report.confusion_matrix.labels, vec![0, 1]);
    assert_eq!(report.confusion_matrix.total(), 3);
    assert_eq!(report.classification_report.macro_avg.support, 3);

    // Grid search saw all eight grid points; k larger than a fold's
    // training set is skipped rather than scored.
    assert_eq!(report.grid_search.candidates.len(), 8);
    assert!(report.grid_search.best_params.n_neighbors <= 5);
    assert!((0.0..=1.0).contains(&report.grid_search.best_score));

    // Full-data cross-validation.
    assert_eq!(report.cross_validation.scores.len(), 5);
    let mean = report.cross_validation.scores.iter().sum::<f64>() / 5.0;
    assert!((report.cross_validation.mean - mean).abs() < 1e-12);
}

#[test]
fn test_end_to_end_minimal_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::builder()
        .input_path(fixture("diabetes_minimal.csv"))
        .output_path(dir.path().join("processed_diabetes_data.csv"))
        .build()
        .unwrap();

    let report = Pipeline::builder().config(config).build().unwrap().run().unwrap();

    assert_eq!(report.cleaning.imputation.total_filled(), 1);
    let processed =
        DatasetLoader::load(&report.processed_path, &ProcessingConfig::default()).unwrap();
    assert_eq!(processed.shape(), (10, 3));
    for col in processed.get_columns() {
        assert_eq!(col.null_count(), 0, "column {} still has nulls", col.name());
    }
    let gender: Vec<i64> = processed
        .column("Gender")
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert!(gender.iter().all(|code| *code == 0 || *code == 1));
    assert_eq!(report.classification_report.labels(), vec![0, 1]);
    assert_eq!(report.cross_validation.scores.len(), 5);
}

#[test]
fn test_end_to_end_reports_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    let stages = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&stages);

    Pipeline::builder()
        .config(config_for(dir.path()))
        .on_progress(move |update| seen.lock().unwrap().push(update.stage))
        .build()
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(*stages.lock().unwrap(), PipelineStage::ALL.to_vec());
}

#[test]
fn test_end_to_end_is_deterministic() {
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let first = run_sample(first_dir.path());
    let second = run_sample(second_dir.path());

    assert_eq!(first.grid_search.best_params, second.grid_search.best_params);
    assert_eq!(first.grid_search.candidates, second.grid_search.candidates);
    assert_eq!(first.confusion_matrix, second.confusion_matrix);
    assert_eq!(first.cross_validation, second.cross_validation);
}

#[test]
fn test_report_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_sample(dir.path());

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert!(json["grid_search"]["best_params"]["n_neighbors"].is_u64());
    assert!(json["grid_search"].get("best_model").is_none());
    assert_eq!(json["split"]["test_rows"], 3);
    assert_eq!(json["cross_validation"]["scores"].as_array().unwrap().len(), 5);
}

// ============================================================================
// Splitter and tuner
// ============================================================================

#[test]
fn test_split_is_deterministic_across_loads() {
    let first = train_test_split(&cleaned_sample(), 0.3, 42).unwrap();
    let second = train_test_split(&cleaned_sample(), 0.3, 42).unwrap();

    assert_eq!(first.test_indices, second.test_indices);
    assert_eq!(first.train_indices, second.train_indices);
    assert_eq!(first.test.labels, second.test.labels);
}

#[test]
fn test_split_changes_with_seed() {
    let dataset = cleaned_sample();
    let splits: Vec<Vec<usize>> = (0..5)
        .map(|seed| train_test_split(&dataset, 0.3, seed).unwrap().test_indices)
        .collect();

    assert!(splits.iter().any(|s| *s != splits[0]));
}

#[test]
fn test_tuner_is_deterministic() {
    let dataset = cleaned_sample();
    let split = train_test_split(&dataset, 0.3, 42).unwrap();
    let search = GridSearch::new(ParamGrid::default(), 5).unwrap();

    let first = search.fit(&split.train).unwrap();
    let second = search.fit(&split.train).unwrap();

    assert_eq!(first.best_params, second.best_params);
    assert_eq!(first.best_score, second.best_score);
    assert_eq!(first.candidates, second.candidates);
    assert_eq!(
        first.best_model.predict(&split.test.features).unwrap(),
        second.best_model.predict(&split.test.features).unwrap()
    );
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_target_column() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::builder()
        .input_path(fixture("diabetes_sample.csv"))
        .output_path(dir.path().join("out.csv"))
        .target_column("Diagnosis")
        .build()
        .unwrap();

    let err = Pipeline::builder().config(config).build().unwrap().run().unwrap_err();
    assert!(matches!(err, LearningError::TargetNotFound(ref t) if t == "Diagnosis"));
    // The cleaned file is written before the target is looked up.
    assert!(dir.path().join("out.csv").is_file());
}

#[test]
fn test_all_missing_numeric_column() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("insulin.csv");
    std::fs::write(
        &input,
        "Glucose,Insulin,Outcome\n148,,1\n85,,0\n183,,1\n89,,0\n",
    )
    .unwrap();
    let config = PipelineConfig::builder()
        .input_path(&input)
        .output_path(dir.path().join("out.csv"))
        .build()
        .unwrap();

    let err = Pipeline::builder().config(config).build().unwrap().run().unwrap_err();
    assert!(matches!(err, LearningError::Processing(_)));
    assert_eq!(err.error_code(), "UNDEFINED_STATISTIC");
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::builder()
        .input_path(dir.path().join("absent.csv"))
        .output_path(dir.path().join("out.csv"))
        .build()
        .unwrap();

    let err = Pipeline::builder().config(config).build().unwrap().run().unwrap_err();
    assert!(matches!(err, LearningError::Processing(ref inner) if inner.is_data_access()));
    assert!(!dir.path().join("out.csv").exists());
}
