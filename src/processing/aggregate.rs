//! Group-by aggregation for [`crate::types::Table`].

use std::collections::HashMap;

use crate::error::PrepResult;
use crate::types::{DataType, Field, KeyValue, Schema, Table, Value};

/// Group rows by `key_columns` and reduce each of `value_columns` to the
/// arithmetic mean of its non-null values in the group.
///
/// - Grouping is exact key-value equality.
/// - Output has one row per distinct key combination, in first-seen order,
///   which keeps results deterministic for a given input order.
/// - Output columns are the key columns (original types) followed by the
///   value columns as [`DataType::Float64`].
/// - A group with no non-null values for a column yields `Null` there.
pub fn group_mean(
    table: &Table,
    key_columns: &[String],
    value_columns: &[String],
) -> PrepResult<Table> {
    let key_idxs: Vec<usize> = key_columns
        .iter()
        .map(|c| table.schema.require(c, "aggregate (key)"))
        .collect::<PrepResult<_>>()?;
    let value_idxs: Vec<usize> = value_columns
        .iter()
        .map(|c| table.schema.require(c, "aggregate (value)"))
        .collect::<PrepResult<_>>()?;

    struct Group {
        key: Vec<Value>,
        sums: Vec<f64>,
        counts: Vec<usize>,
    }

    let mut order: Vec<Group> = Vec::new();
    let mut index: HashMap<Vec<KeyValue>, usize> = HashMap::new();

    for row in &table.rows {
        let key: Vec<KeyValue> = key_idxs.iter().map(|&i| row[i].key()).collect();
        let slot = *index.entry(key).or_insert_with(|| {
            order.push(Group {
                key: key_idxs.iter().map(|&i| row[i].clone()).collect(),
                sums: vec![0.0; value_idxs.len()],
                counts: vec![0; value_idxs.len()],
            });
            order.len() - 1
        });

        let group = &mut order[slot];
        for (j, &i) in value_idxs.iter().enumerate() {
            if let Some(v) = row[i].as_f64() {
                group.sums[j] += v;
                group.counts[j] += 1;
            }
        }
    }

    let mut fields: Vec<Field> = key_idxs
        .iter()
        .map(|&i| table.schema.fields[i].clone())
        .collect();
    for &i in &value_idxs {
        fields.push(Field::new(&table.schema.fields[i].name, DataType::Float64));
    }

    let rows = order
        .into_iter()
        .map(|group| {
            let mut row = group.key;
            for (sum, count) in group.sums.into_iter().zip(group.counts) {
                row.push(if count > 0 {
                    Value::Float64(sum / count as f64)
                } else {
                    Value::Null
                });
            }
            row
        })
        .collect();

    Ok(Table::new(Schema::new(fields), rows))
}
