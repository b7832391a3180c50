//! Row filtering for [`crate::types::Table`].

use serde::{Deserialize, Serialize};

use crate::error::PrepResult;
use crate::types::{Table, Value};

/// Inclusive `[min, max]` bound on an integer column (e.g. a year range).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnBounds {
    /// Column the bound applies to.
    pub column: String,
    /// Inclusive lower bound.
    pub min: i64,
    /// Inclusive upper bound.
    pub max: i64,
}

/// Substring-based exclusion on a text column.
///
/// Matching is case-sensitive; run the normalizer first and supply lowercase
/// patterns (the observed use excludes aggregate rows like `"asia"` or
/// `"world"` from a country column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstringExclusion {
    /// Text column to test.
    pub column: String,
    /// A row is dropped if the cell contains any of these substrings.
    pub patterns: Vec<String>,
}

/// Row-level exclusion predicates, applied as a conjunction: a row survives
/// only if it passes every configured predicate.
///
/// The predicates are independent row-level tests, so their order cannot
/// change the surviving set; null checks still run before range comparisons so
/// a missing value is never compared numerically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowFilter {
    /// Drop the row if any of these columns is `Null`.
    #[serde(default)]
    pub require_present: Vec<String>,
    /// Drop the row if any of these numeric columns is negative.
    #[serde(default)]
    pub non_negative: Vec<String>,
    /// Drop the row if a bounded column falls outside its inclusive range.
    #[serde(default)]
    pub bounds: Vec<ColumnBounds>,
    /// Drop the row on a banned-substring match.
    #[serde(default)]
    pub exclude: Option<SubstringExclusion>,
}

impl RowFilter {
    /// Whether the filter has any predicate configured.
    pub fn is_empty(&self) -> bool {
        self.require_present.is_empty()
            && self.non_negative.is_empty()
            && self.bounds.is_empty()
            && self.exclude.is_none()
    }
}

/// Apply `filter` to `table`, keeping only rows that pass every predicate.
pub fn apply_filter(table: &Table, filter: &RowFilter) -> PrepResult<Table> {
    // Resolve every referenced column up front so a bad config fails before
    // any row is inspected.
    let required: Vec<usize> = filter
        .require_present
        .iter()
        .map(|c| table.schema.require(c, "filter (require_present)"))
        .collect::<PrepResult<_>>()?;
    let non_negative: Vec<usize> = filter
        .non_negative
        .iter()
        .map(|c| table.schema.require(c, "filter (non_negative)"))
        .collect::<PrepResult<_>>()?;
    let bounds: Vec<(usize, i64, i64)> = filter
        .bounds
        .iter()
        .map(|b| {
            table
                .schema
                .require(&b.column, "filter (bounds)")
                .map(|i| (i, b.min, b.max))
        })
        .collect::<PrepResult<_>>()?;
    let exclude: Option<(usize, &[String])> = match &filter.exclude {
        Some(e) => Some((
            table.schema.require(&e.column, "filter (exclude)")?,
            e.patterns.as_slice(),
        )),
        None => None,
    };

    Ok(table.filter_rows(|row| {
        for &i in &required {
            if row[i] == Value::Null {
                return false;
            }
        }
        // Nulls pass the numeric tests below; rejecting them is
        // `require_present`'s job.
        for &i in &non_negative {
            if let Some(v) = row[i].as_f64() {
                if v < 0.0 {
                    return false;
                }
            }
        }
        for &(i, min, max) in &bounds {
            match &row[i] {
                Value::Int64(v) if *v < min || *v > max => return false,
                Value::Float64(v) if *v < min as f64 || *v > max as f64 => return false,
                _ => {}
            }
        }
        if let Some((i, patterns)) = exclude {
            if let Value::Utf8(s) = &row[i] {
                if patterns.iter().any(|p| s.contains(p.as_str())) {
                    return false;
                }
            }
        }
        true
    }))
}

#[cfg(test)]
mod tests {
    use super::{ColumnBounds, RowFilter, SubstringExclusion, apply_filter};
    use crate::types::{DataType, Field, Schema, Table, Value};

    fn sample_table() -> Table {
        let schema = Schema::new(vec![
            Field::new("entity", DataType::Utf8),
            Field::new("year", DataType::Int64),
            Field::new("emission", DataType::Float64),
        ]);
        let rows = vec![
            vec![
                Value::Utf8("chile".to_string()),
                Value::Int64(2018),
                Value::Float64(5.0),
            ],
            vec![
                Value::Utf8("asia".to_string()),
                Value::Int64(2018),
                Value::Float64(100.0),
            ],
            vec![
                Value::Utf8("brazil".to_string()),
                Value::Int64(2018),
                Value::Null,
            ],
            vec![
                Value::Utf8("chile".to_string()),
                Value::Int64(1990),
                Value::Float64(2.0),
            ],
            vec![
                Value::Utf8("peru".to_string()),
                Value::Int64(2019),
                Value::Float64(-1.0),
            ],
        ];
        Table::new(schema, rows)
    }

    fn full_filter() -> RowFilter {
        RowFilter {
            require_present: vec!["emission".to_string()],
            non_negative: vec!["emission".to_string()],
            bounds: vec![ColumnBounds {
                column: "year".to_string(),
                min: 2017,
                max: 2024,
            }],
            exclude: Some(SubstringExclusion {
                column: "entity".to_string(),
                patterns: vec!["asia".to_string(), "world".to_string()],
            }),
        }
    }

    #[test]
    fn conjunction_of_all_predicates() {
        let t = sample_table();
        let out = apply_filter(&t, &full_filter()).unwrap();
        // Only the first chile row survives every predicate.
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.rows[0][0], Value::Utf8("chile".to_string()));
    }

    #[test]
    fn output_is_subset_of_input() {
        let t = sample_table();
        let out = apply_filter(&t, &full_filter()).unwrap();
        for row in &out.rows {
            assert!(t.rows.contains(row));
        }
    }

    #[test]
    fn empty_filter_keeps_every_row() {
        let t = sample_table();
        let filter = RowFilter::default();
        assert!(filter.is_empty());
        let out = apply_filter(&t, &filter).unwrap();
        assert_eq!(out.rows, t.rows);
    }

    #[test]
    fn null_passes_numeric_checks_unless_required() {
        let t = sample_table();
        let filter = RowFilter {
            non_negative: vec!["emission".to_string()],
            bounds: vec![ColumnBounds {
                column: "emission".to_string(),
                min: 0,
                max: 1_000,
            }],
            ..Default::default()
        };
        let out = apply_filter(&t, &filter).unwrap();
        // The null-emission brazil row is retained, the negative peru row is not.
        assert!(
            out.rows
                .iter()
                .any(|r| r[0] == Value::Utf8("brazil".to_string()))
        );
        assert!(
            !out.rows
                .iter()
                .any(|r| r[0] == Value::Utf8("peru".to_string()))
        );
    }

    #[test]
    fn errors_on_unknown_filter_column() {
        let t = sample_table();
        let filter = RowFilter {
            require_present: vec!["population".to_string()],
            ..Default::default()
        };
        let err = apply_filter(&t, &filter).unwrap_err();
        assert!(err.to_string().contains("missing column 'population'"));
    }
}
