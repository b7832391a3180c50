//! Exact-duplicate removal for [`crate::types::Table`].

use std::collections::HashSet;

use crate::types::{KeyValue, Table};

/// Remove rows that are exact duplicates (all columns equal) of an earlier
/// row, keeping the first occurrence in its original position.
pub fn dedup(table: &Table) -> Table {
    let mut seen: HashSet<Vec<KeyValue>> = HashSet::with_capacity(table.row_count());
    table.filter_rows(|row| seen.insert(row.iter().map(|v| v.key()).collect()))
}
