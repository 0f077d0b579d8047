//! CLI entry point for the diabetes kNN pipeline.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use diabetes_learning::config::{
    DEFAULT_CV_FOLDS, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_RANDOM_SEED,
    DEFAULT_TARGET_COLUMN, DEFAULT_TEST_SIZE,
};
use diabetes_learning::{Pipeline, PipelineConfig, PipelineReport, PipelineStage, Weights};
use std::path::PathBuf;
use tracing::debug;

/// CLI-compatible neighbor weighting enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliWeights {
    /// Every neighbor has one vote
    Uniform,
    /// Closer neighbors get more weight (1 / distance)
    Distance,
}

impl From<CliWeights> for Weights {
    fn from(cli: CliWeights) -> Self {
        match cli {
            CliWeights::Uniform => Weights::Uniform,
            CliWeights::Distance => Weights::Distance,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean a diabetes dataset and train a tuned k-nearest-neighbors classifier",
    long_about = "Reads a CSV file, fills missing numeric values with the column mean, \
                  label-encodes text columns, writes the cleaned file, then tunes and \
                  evaluates a kNN classifier on it.\n\n\
                  With no arguments, reads diabetes_data.csv and writes \
                  processed_diabetes_data.csv in the current directory.\n\n\
                  EXAMPLES:\n  \
                  diabetes-knn\n  \
                  diabetes-knn -i data/diabetes.csv -o out/clean.csv\n  \
                  diabetes-knn --neighbors 1,3,5 --weights distance --json | jq .cross_validation"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Where to write the cleaned CSV file
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Column holding the class labels
    #[arg(short, long, default_value = DEFAULT_TARGET_COLUMN)]
    target: String,

    /// Fraction of rows held out for evaluation (0.0 - 1.0)
    #[arg(long, default_value_t = DEFAULT_TEST_SIZE)]
    test_size: f64,

    /// Seed of the train/test shuffle
    #[arg(long, default_value_t = DEFAULT_RANDOM_SEED)]
    seed: u64,

    /// Neighbor counts to search
    #[arg(long, value_delimiter = ',', default_values_t = [3usize, 5, 7, 9])]
    neighbors: Vec<usize>,

    /// Neighbor weightings to search
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [CliWeights::Uniform, CliWeights::Distance])]
    weights: Vec<CliWeights>,

    /// Number of cross-validation folds
    #[arg(long, default_value_t = DEFAULT_CV_FOLDS)]
    folds: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the full report as JSON instead of the text summary
    ///
    /// Disables all progress logs.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout only carries the report.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = PipelineConfig::builder()
        .input_path(&args.input)
        .output_path(&args.output)
        .target_column(&args.target)
        .test_size(args.test_size)
        .random_seed(args.seed)
        .n_neighbors(args.neighbors.iter().copied())
        .weights(args.weights.iter().map(|&w| Weights::from(w)))
        .cv_folds(args.folds)
        .build()?;
    debug!("Configuration: {:?}", config);

    let mut builder = Pipeline::builder().config(config);
    if !args.json {
        // Splitting starts once the processed file is written, so this line
        // still appears when a later stage fails.
        builder = builder.on_progress(|update| {
            if update.stage == PipelineStage::Splitting {
                println!("Processing complete. Data saved to file.");
            }
        });
    }
    let pipeline = builder.build()?;
    let report = pipeline
        .run()
        .with_context(|| format!("Pipeline failed for '{}'", args.input.display()))?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

/// Print the human-readable result.
///
/// Uses `println!` rather than logging: this is the program's output and is
/// shown regardless of log level.
fn print_summary(report: &PipelineReport) {
    println!("Optimized Model Classification Report:");
    println!("{}", report.classification_report);
    println!("Confusion Matrix:");
    println!("{}", report.confusion_matrix);
    println!();
    println!(
        "Cross-validation Accuracy Scores: {}",
        report.cross_validation
    );
    println!(
        "Average Cross-validation Score: {}",
        report.cross_validation.mean
    );
}
