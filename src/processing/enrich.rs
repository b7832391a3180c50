//! Lookup-based enrichment for [`crate::types::Table`].

use crate::error::{PrepError, PrepResult};
use crate::lookup::Lookup;
use crate::types::{DataType, Field, Table, Value};

/// Label used when a key has no entry in the lookup table.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Append `output_column` holding the label mapped from `key_column` via
/// `lookup`; keys absent from the lookup (and null or non-text keys) map to
/// [`UNKNOWN_LABEL`].
///
/// Never drops rows, and the new column is never `Null`.
pub fn enrich(
    table: &Table,
    key_column: &str,
    output_column: &str,
    lookup: &Lookup,
) -> PrepResult<Table> {
    let key_idx = table.schema.require(key_column, "enrich")?;
    if table.schema.index_of(output_column).is_some() {
        return Err(PrepError::InvalidConfig {
            message: format!("enrichment output column '{output_column}' already exists"),
        });
    }

    Ok(
        table.add_column(Field::new(output_column, DataType::Utf8), |row| {
            let label = match &row[key_idx] {
                Value::Utf8(key) => lookup.get(key).unwrap_or(UNKNOWN_LABEL),
                _ => UNKNOWN_LABEL,
            };
            Value::Utf8(label.to_string())
        }),
    )
}
