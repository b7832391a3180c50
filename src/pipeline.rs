//! The parameterized cleaning pipeline.
//!
//! [`run_pipeline`] composes the stages strictly in order:
//!
//! load → normalize → filter → aggregate → dedup → enrich → top-N → write
//!
//! Every stage fully consumes its input before producing output, nothing is
//! shared across runs, and the output file is written only once every prior
//! stage has succeeded. A [`PipelineConfig`] carries all column names and
//! thresholds, so the same pipeline serves differently-named datasets without
//! per-dataset code.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, PrepResult};
use crate::ingestion::csv::{CsvOptions, load_csv_from_path};
use crate::lookup::{Lookup, continents};
use crate::observe::{PipelineObserver, StageEvent, severity_for_error};
use crate::output::write_csv_to_path;
use crate::processing::{
    RowFilter, apply_filter, dedup, enrich, group_mean, normalize_all_text, normalize_columns,
    top_n_by_sum,
};
use crate::types::{Field, Schema, Table};

/// Enrichment settings: which key column to look up, what to call the new
/// label column, and where the lookup table comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Column whose (normalized) value is the lookup key.
    pub key_column: String,
    /// Name of the appended label column.
    pub output_column: String,
    /// JSON lookup file; `None` selects the bundled country → continent table.
    #[serde(default)]
    pub lookup_path: Option<PathBuf>,
}

/// Top-N selection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopNConfig {
    /// Column whose distinct values form the ranked groups.
    pub group_column: String,
    /// Numeric column summed per group for ranking.
    pub metric_column: String,
    /// Number of groups to retain.
    pub count: usize,
}

/// Full configuration for one pipeline run.
///
/// Loadable from a JSON file via [`PipelineConfig::from_json_path`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input CSV files. With several inputs, all must share the configured
    /// columns; their rows are concatenated in input order. (Joining sources
    /// with *different* value columns is [`crate::ingestion::join`]'s job.)
    pub inputs: Vec<PathBuf>,
    /// Output CSV path.
    pub output: PathBuf,
    /// Columns to retain from the inputs, with their types.
    pub columns: Vec<Field>,
    /// Text columns to normalize. `None` normalizes every text-typed column.
    #[serde(default)]
    pub normalize: Option<Vec<String>>,
    /// Row exclusion predicates.
    #[serde(default)]
    pub filter: RowFilter,
    /// Aggregation key columns. Empty skips aggregation.
    #[serde(default)]
    pub group_by: Vec<String>,
    /// Numeric columns mean-reduced per group.
    #[serde(default)]
    pub aggregate: Vec<String>,
    /// Optional lookup enrichment.
    #[serde(default)]
    pub enrich: Option<EnrichConfig>,
    /// Optional top-N group selection.
    #[serde(default)]
    pub top_n: Option<TopNConfig>,
}

impl PipelineConfig {
    /// Read and parse a JSON config file, then validate it.
    pub fn from_json_path(path: impl AsRef<Path>) -> PrepResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> PrepResult<()> {
        if self.inputs.is_empty() {
            return Err(invalid("at least one input file is required"));
        }
        if self.columns.is_empty() {
            return Err(invalid("at least one column must be configured"));
        }
        if self.group_by.is_empty() != self.aggregate.is_empty() {
            return Err(invalid(
                "group_by and aggregate must be configured together",
            ));
        }
        if let Some(top_n) = &self.top_n {
            if top_n.count == 0 {
                return Err(invalid("top_n.count must be at least 1"));
            }
        }
        Ok(())
    }

    fn schema(&self) -> Schema {
        Schema::new(self.columns.clone())
    }
}

fn invalid(message: &str) -> PrepError {
    PrepError::InvalidConfig {
        message: message.to_string(),
    }
}

/// Row counts recorded for one executed stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCount {
    /// Stage name.
    pub stage: &'static str,
    /// Rows entering the stage.
    pub rows_in: usize,
    /// Rows leaving the stage.
    pub rows_out: usize,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Rows loaded across all inputs.
    pub rows_loaded: usize,
    /// Rows in the written output.
    pub rows_written: usize,
    /// Per-stage row counts, in execution order.
    pub stages: Vec<StageCount>,
}

/// Run the full pipeline described by `config`.
///
/// Returns the report on success. On the first failing stage the observer's
/// failure hook fires and the error propagates; no output file is written.
pub fn run_pipeline(
    config: &PipelineConfig,
    observer: Option<&dyn PipelineObserver>,
) -> PrepResult<PipelineReport> {
    config.validate()?;

    let mut runner = StageRunner {
        observer,
        counts: Vec::new(),
    };

    let table = runner.run("load", 0, || {
        let schema = config.schema();
        let options = CsvOptions::default();
        let mut merged: Option<Table> = None;
        for path in &config.inputs {
            let table = load_csv_from_path(path, &schema, &options)?;
            merged = Some(match merged {
                None => table,
                Some(mut acc) => {
                    acc.append(table)?;
                    acc
                }
            });
        }
        // validate() guarantees at least one input.
        Ok(merged.expect("inputs checked non-empty"))
    })?;
    let rows_loaded = table.row_count();

    let table = runner.run("normalize", table.row_count(), || match &config.normalize {
        None => Ok(normalize_all_text(&table)),
        Some(columns) => normalize_columns(&table, columns),
    })?;

    let table = if config.filter.is_empty() {
        table
    } else {
        runner.run("filter", table.row_count(), || {
            apply_filter(&table, &config.filter)
        })?
    };

    let table = if config.group_by.is_empty() {
        table
    } else {
        runner.run("aggregate", table.row_count(), || {
            group_mean(&table, &config.group_by, &config.aggregate)
        })?
    };

    let table = runner.run("dedup", table.row_count(), || Ok(dedup(&table)))?;

    let table = match &config.enrich {
        None => table,
        Some(cfg) => runner.run("enrich", table.row_count(), || {
            let lookup: Lookup = match &cfg.lookup_path {
                Some(path) => Lookup::from_path(path)?,
                None => continents().clone(),
            };
            enrich(&table, &cfg.key_column, &cfg.output_column, &lookup)
        })?,
    };

    let table = match &config.top_n {
        None => table,
        Some(cfg) => runner.run("top_n", table.row_count(), || {
            top_n_by_sum(&table, &cfg.group_column, &cfg.metric_column, cfg.count)
        })?,
    };

    let rows_written = table.row_count();
    runner.run("write", rows_written, || {
        write_csv_to_path(&table, &config.output)?;
        Ok(table.clone())
    })?;

    if let Some(obs) = observer {
        obs.on_complete(rows_written, &config.output);
    }

    Ok(PipelineReport {
        rows_loaded,
        rows_written,
        stages: runner.counts,
    })
}

struct StageRunner<'a> {
    observer: Option<&'a dyn PipelineObserver>,
    counts: Vec<StageCount>,
}

impl StageRunner<'_> {
    fn run<F>(&mut self, stage: &'static str, rows_in: usize, f: F) -> PrepResult<Table>
    where
        F: FnOnce() -> PrepResult<Table>,
    {
        let start = Instant::now();
        match f() {
            Ok(out) => {
                let rows_out = out.row_count();
                self.counts.push(StageCount {
                    stage,
                    rows_in,
                    rows_out,
                });
                if let Some(obs) = self.observer {
                    obs.on_stage(&StageEvent {
                        stage,
                        rows_in,
                        rows_out,
                        elapsed: start.elapsed(),
                    });
                }
                Ok(out)
            }
            Err(e) => {
                if let Some(obs) = self.observer {
                    obs.on_failure(stage, severity_for_error(&e), &e);
                }
                Err(e)
            }
        }
    }
}
