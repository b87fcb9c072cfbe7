use std::path::PathBuf;

use hh_level::config::PipelineConfig;
use hh_level::pipeline::{self, Mode, Workspace};
use hh_level::predict;
use hh_level::trainer::{self, ModelKind};
use hh_level::utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "hh-level",
    about = "Developer level predictor for job-site resume exports",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Commands,
    /// Directory for x_data.npy / y_data.npy
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,
    /// Directory for fitted transformers and classifiers
    #[arg(long, default_value = "resources", global = true)]
    resources_dir: PathBuf,
    /// Directory for reports
    #[arg(long, default_value = "docs", global = true)]
    docs_dir: PathBuf,
    /// JSON file overriding keyword tables, currency rates or column names
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract features (and labels) from a resume CSV export
    ParseData {
        /// Path to the resume CSV file
        csv_path: PathBuf,
        /// Reuse previously fitted transformers and skip labelling
        #[arg(long, default_value_t = false)]
        inference: bool,
    },
    /// Train classifiers on the arrays written by parse-data
    TrainClassifier,
    /// Predict levels for a feature matrix
    Predict {
        /// Path to an x_data.npy feature matrix
        npy_path: PathBuf,
        /// Which trained model to use
        #[arg(long, value_enum, default_value_t = ModelKind::Tree)]
        model: ModelKind,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let workspace = Workspace {
        data_dir: args.data_dir,
        resources_dir: args.resources_dir,
        docs_dir: args.docs_dir,
    };

    match args.command {
        Commands::ParseData {
            csv_path,
            inference,
        } => {
            let config = PipelineConfig::load(args.config.as_deref())?;
            let mode = if inference {
                Mode::Inference
            } else {
                Mode::Training
            };
            let outcome = pipeline::parse_data(&csv_path, &config, &workspace, mode)?;
            info!(
                rows = outcome.features.n_rows(),
                columns = outcome.features.x.ncols(),
                "parse-data completed"
            );
            println!(
                "Parsing finished: {} rows saved to {}",
                outcome.features.n_rows(),
                workspace.data_dir.display()
            );
        }
        Commands::TrainClassifier => {
            let outcomes = trainer::train_classifiers(
                &workspace.data_dir,
                &workspace.store(),
                &workspace.docs_dir,
            )?;
            for outcome in &outcomes {
                info!(
                    model = outcome.kind.label(),
                    accuracy = outcome.report.accuracy,
                    path = %outcome.model_path.display(),
                    "model saved"
                );
            }
        }
        Commands::Predict { npy_path, model } => {
            let levels = predict::predict_levels(&npy_path, &workspace.store(), model)?;
            utils::print_predictions(&levels);
        }
    }

    Ok(())
}
