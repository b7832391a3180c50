//! Text normalization for [`crate::types::Table`].

use crate::error::PrepResult;
use crate::types::{DataType, Table, Value};

/// Canonical text form used throughout the pipeline: trimmed and lowercased.
pub fn normalized(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Lowercase and trim the named text columns.
///
/// Only columns whose declared type is [`DataType::Utf8`] are touched; naming
/// a numeric column is a no-op rather than an error, so one column list can
/// serve mixed schemas. `Null` cells stay `Null`. Idempotent.
pub fn normalize_columns(table: &Table, columns: &[String]) -> PrepResult<Table> {
    let mut idxs = Vec::with_capacity(columns.len());
    for name in columns {
        let idx = table.schema.require(name, "normalize")?;
        if table.schema.fields[idx].data_type == DataType::Utf8 {
            idxs.push(idx);
        }
    }
    Ok(normalize_at(table, &idxs))
}

/// Lowercase and trim every text-typed column.
///
/// The column selection is driven by declared types, not per-cell inspection.
pub fn normalize_all_text(table: &Table) -> Table {
    let idxs: Vec<usize> = table
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.data_type == DataType::Utf8)
        .map(|(i, _)| i)
        .collect();
    normalize_at(table, &idxs)
}

fn normalize_at(table: &Table, idxs: &[usize]) -> Table {
    table.map_rows(|row| {
        let mut out = row.to_vec();
        for &i in idxs {
            if let Value::Utf8(s) = &out[i] {
                out[i] = Value::Utf8(normalized(s));
            }
        }
        out
    })
}
