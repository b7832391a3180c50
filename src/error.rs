use thiserror::Error;

/// Convenience result type for data-preparation operations.
pub type PrepResult<T> = Result<T, PrepError>;

/// Error type returned across loading, processing, and writing.
///
/// A failing run aborts immediately; there is no retry or partial-output
/// policy. Lookup misses during enrichment are not errors (they resolve to
/// the `"Unknown"` sentinel).
#[derive(Debug, Error)]
pub enum PrepError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error, including rows with inconsistent field counts.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error from a config file or a lookup-table asset.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A referenced column is absent from the table or input it was expected in.
    #[error("missing column '{column}' in {context}")]
    MissingColumn { column: String, context: String },

    /// A cell could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    Parse {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// The pipeline configuration is inconsistent or incomplete.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}
