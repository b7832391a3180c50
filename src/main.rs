//! `dataprep` CLI - run batch CSV cleaning pipelines.
//!
//! ```bash
//! dataprep run pipeline.json              # Run a cleaning pipeline
//! dataprep run pipeline.json -o out.csv   # Override the configured output
//! dataprep merge -k Date -v Value \
//!     avg.csv=Avg_Temperature min.csv=Min_Temperature -o merged.csv
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dataprep::ingestion::csv::CsvOptions;
use dataprep::ingestion::join::{CsvSource, load_and_join};
use dataprep::observe::{CompositeObserver, FileObserver, PipelineObserver, StdErrObserver};
use dataprep::output::write_csv_to_path;
use dataprep::pipeline::{PipelineConfig, run_pipeline};
use dataprep::types::{DataType, Field};
use dataprep::{PrepError, PrepResult};

#[derive(Parser)]
#[command(name = "dataprep")]
#[command(about = "Batch CSV data preparation pipelines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a cleaning pipeline described by a JSON config file
    Run {
        /// Pipeline config (JSON)
        config: PathBuf,

        /// Override the configured output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also append events to this log file
        #[arg(long)]
        log_file: Option<PathBuf>,

        /// Suppress per-stage progress on stderr
        #[arg(short, long)]
        quiet: bool,
    },

    /// Merge single-value CSV sources on a shared key column
    Merge {
        /// Shared key column present in every input
        #[arg(short, long)]
        key: String,

        /// Name of the value column inside each input
        #[arg(short, long)]
        value: String,

        /// Inputs as `path=NewColumnName` pairs
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = execute(cli.command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn execute(command: Commands) -> PrepResult<()> {
    match command {
        Commands::Run {
            config,
            output,
            log_file,
            quiet,
        } => {
            let mut config = PipelineConfig::from_json_path(&config)?;
            if let Some(path) = output {
                config.output = path;
            }

            let mut observers: Vec<Arc<dyn PipelineObserver>> = Vec::new();
            if !quiet {
                observers.push(Arc::new(StdErrObserver));
            }
            if let Some(path) = log_file {
                observers.push(Arc::new(FileObserver::new(path)));
            }
            let observer = CompositeObserver::new(observers);

            let report = run_pipeline(&config, Some(&observer))?;
            println!(
                "Data cleaning complete. {} rows written to: {}",
                report.rows_written,
                config.output.display()
            );
            Ok(())
        }

        Commands::Merge {
            key,
            value,
            inputs,
            output,
        } => {
            let sources = inputs
                .iter()
                .map(|spec| parse_merge_input(spec, &value))
                .collect::<PrepResult<Vec<_>>>()?;

            let key_field = Field::new(&key, DataType::Utf8);
            let merged = load_and_join(&key_field, &sources, &CsvOptions::default())?;
            write_csv_to_path(&merged, &output)?;
            println!(
                "Merge complete. {} rows written to: {}",
                merged.row_count(),
                output.display()
            );
            Ok(())
        }
    }
}

fn parse_merge_input(spec: &str, value_column: &str) -> PrepResult<CsvSource> {
    let (path, rename_to) = spec.split_once('=').ok_or_else(|| PrepError::InvalidConfig {
        message: format!("merge input '{spec}' must be of the form path=NewColumnName"),
    })?;
    Ok(CsvSource {
        path: PathBuf::from(path),
        value_column: value_column.to_string(),
        value_type: DataType::Float64,
        rename_to: rename_to.to_string(),
    })
}
