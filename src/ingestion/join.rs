//! Merging several single-value CSV sources on a shared key column.
//!
//! Typical use: three measurement exports (average/min/max temperature) that
//! each carry a `Date` column and a generically-named `Value` column. Each
//! source's value column is renamed before joining so the merged table keeps
//! all three series apart.

use std::path::PathBuf;

use crate::error::PrepResult;
use crate::types::{DataType, Field, Schema, Table, Value};

use super::csv::{CsvOptions, load_csv_from_path};

/// One CSV input participating in a keyed merge.
#[derive(Debug, Clone)]
pub struct CsvSource {
    /// Path to the CSV file.
    pub path: PathBuf,
    /// Name of the value column inside this file.
    pub value_column: String,
    /// Value type of that column.
    pub value_type: DataType,
    /// Name the value column gets in the merged output.
    pub rename_to: String,
}

/// Load each source (key column + value column only), rename its value column,
/// and inner-join all sources on `key`.
///
/// Output columns: `key`, then one renamed value column per source, in source
/// order. Row order follows the first source.
pub fn load_and_join(
    key: &Field,
    sources: &[CsvSource],
    options: &CsvOptions,
) -> PrepResult<Table> {
    let mut merged: Option<Table> = None;
    for source in sources {
        let schema = Schema::new(vec![
            key.clone(),
            Field::new(&source.value_column, source.value_type),
        ]);
        let mut table = load_csv_from_path(&source.path, &schema, options)?;
        table.rename_column(&source.value_column, &source.rename_to)?;

        merged = Some(match merged {
            None => table,
            Some(left) => inner_join(&left, &table, &key.name)?,
        });
    }

    Ok(merged.unwrap_or_else(|| Table::new(Schema::new(vec![key.clone()]), Vec::new())))
}

/// Inner-join two tables on an equality key.
///
/// Output columns are the left table's columns followed by the right table's
/// non-key columns. A left row with multiple right matches produces one output
/// row per match; rows without a match on either side are dropped. Output
/// order follows the left table.
pub fn inner_join(left: &Table, right: &Table, key: &str) -> PrepResult<Table> {
    let left_key = left.schema.require(key, "join (left table)")?;
    let right_key = right.schema.require(key, "join (right table)")?;

    let mut fields = left.schema.fields.clone();
    for (i, field) in right.schema.fields.iter().enumerate() {
        if i != right_key {
            fields.push(field.clone());
        }
    }

    // Key -> right row indexes, to keep the join linear in input size.
    let mut right_index: std::collections::HashMap<crate::types::KeyValue, Vec<usize>> =
        std::collections::HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        right_index.entry(row[right_key].key()).or_default().push(i);
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for row in &left.rows {
        let Some(matches) = right_index.get(&row[left_key].key()) else {
            continue;
        };
        for &ri in matches {
            let mut out = row.clone();
            for (i, value) in right.rows[ri].iter().enumerate() {
                if i != right_key {
                    out.push(value.clone());
                }
            }
            rows.push(out);
        }
    }

    Ok(Table::new(Schema::new(fields), rows))
}
