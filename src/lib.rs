//! `dataprep` is a small library (and CLI) for one-shot batch preparation of
//! tabular CSV data: load, normalize text, filter rows, aggregate, dedupe,
//! enrich from a static lookup, keep the top-N groups, and write back to CSV.
//!
//! Everything runs single-threaded and in memory: each run loads its input
//! into a [`types::Table`], pushes it through the stages of
//! [`pipeline::run_pipeline`] strictly in order, and writes the output only
//! when every stage has succeeded. Runs share no state and are idempotent for
//! identical inputs.
//!
//! ## Quick example: run a configured pipeline
//!
//! ```no_run
//! use dataprep::pipeline::{PipelineConfig, run_pipeline};
//!
//! # fn main() -> Result<(), dataprep::PrepError> {
//! let config = PipelineConfig::from_json_path("pipeline.json")?;
//! let report = run_pipeline(&config, None)?;
//! println!("rows written: {}", report.rows_written);
//! # Ok(())
//! # }
//! ```
//!
//! ## Quick example: stages as plain functions
//!
//! Each stage is also usable directly as a pure `Table -> Table` function:
//!
//! ```rust
//! use dataprep::lookup::Lookup;
//! use dataprep::processing::{enrich, normalize_all_text};
//! use dataprep::types::{DataType, Field, Schema, Table, Value};
//!
//! # fn main() -> Result<(), dataprep::PrepError> {
//! let schema = Schema::new(vec![Field::new("entity", DataType::Utf8)]);
//! let table = Table::new(schema, vec![vec![Value::Utf8(" Chile ".to_string())]]);
//!
//! let table = normalize_all_text(&table);
//! let lookup = Lookup::from_pairs([("chile", "South America")]);
//! let table = enrich(&table, "entity", "region", &lookup)?;
//!
//! assert_eq!(table.rows[0][1], Value::Utf8("South America".to_string()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV loading and keyed multi-source merging
//! - [`types`]: schema + in-memory table types
//! - [`processing`]: the per-stage transformations
//! - [`lookup`]: static key → label tables (bundled country → continent map)
//! - [`pipeline`]: configuration and the composed end-to-end run
//! - [`output`]: CSV writing
//! - [`observe`]: observer hooks for logging pipeline runs
//! - [`error`]: error types used across the crate

pub mod error;
pub mod ingestion;
pub mod lookup;
pub mod observe;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{PrepError, PrepResult};
