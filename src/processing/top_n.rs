//! Top-N group selection for [`crate::types::Table`].

use std::collections::{HashMap, HashSet};

use crate::error::PrepResult;
use crate::types::{KeyValue, Table};

/// Keep only rows whose `group_column` value is among the `n` groups with the
/// largest summed `metric_column`.
///
/// - Sums ignore null metric values.
/// - Groups are ranked descending by sum; ties break by first-seen order of
///   the grouping value, keeping the selection deterministic.
/// - Fails open: with fewer than `n` distinct values, every row is kept.
/// - Surviving rows keep their original relative order.
pub fn top_n_by_sum(
    table: &Table,
    group_column: &str,
    metric_column: &str,
    n: usize,
) -> PrepResult<Table> {
    let group_idx = table.schema.require(group_column, "top_n (group)")?;
    let metric_idx = table.schema.require(metric_column, "top_n (metric)")?;

    let mut order: Vec<(KeyValue, f64)> = Vec::new();
    let mut index: HashMap<KeyValue, usize> = HashMap::new();
    for row in &table.rows {
        let key = row[group_idx].key();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            order.push((key, 0.0));
            order.len() - 1
        });
        if let Some(v) = row[metric_idx].as_f64() {
            order[slot].1 += v;
        }
    }

    let mut ranked: Vec<usize> = (0..order.len()).collect();
    ranked.sort_by(|&a, &b| order[b].1.total_cmp(&order[a].1).then(a.cmp(&b)));

    let retained: HashSet<&KeyValue> = ranked.iter().take(n).map(|&i| &order[i].0).collect();

    Ok(table.filter_rows(|row| retained.contains(&row[group_idx].key())))
}
