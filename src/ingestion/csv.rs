//! CSV loading implementation.

use std::path::Path;

use crate::error::{PrepError, PrepResult};
use crate::types::{DataType, Schema, Table, Value};

/// Options controlling CSV reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Lines starting with this byte are skipped entirely. Defaults to `#`.
    pub comment: Option<u8>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            comment: Some(b'#'),
        }
    }
}

/// Load a CSV file into an in-memory [`Table`].
///
/// Rules:
///
/// - CSV must have a header row.
/// - Headers must contain all schema fields (order can differ); extra columns
///   are ignored, so the schema doubles as a column-subset selection.
/// - Each value is parsed according to the schema field type; empty cells
///   become [`Value::Null`].
/// - Leading comment lines (see [`CsvOptions::comment`]) are skipped.
/// - Records with inconsistent field counts fail with a CSV error.
pub fn load_csv_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
    options: &CsvOptions,
) -> PrepResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .comment(options.comment)
        .from_path(path)?;
    load_csv_from_reader(&mut rdr, schema)
}

/// Load CSV data from an existing CSV reader.
pub fn load_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> PrepResult<Table> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(PrepError::MissingColumn {
                    column: field.name.clone(),
                    context: format!(
                        "csv input (headers: {:?})",
                        headers.iter().collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(Table::new(schema.clone(), rows))
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> PrepResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| PrepError::Parse {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| PrepError::Parse {
                row,
                column: column.to_owned(),
                raw: raw.to_owned(),
                message: e.to_string(),
            }),
    }
}
