//! Core data model types for the preparation pipeline.
//!
//! A [`Table`] is an ordered collection of uniform-schema rows. Each stage of
//! the pipeline consumes a table and produces a new one; nothing is shared
//! across runs.

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, PrepResult};

/// Logical data type for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 string.
    Utf8,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An ordered list of fields describing the shape of a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the index of a field by name, or a [`PrepError::MissingColumn`]
    /// naming `context` (e.g. the stage or file the column was needed for).
    pub fn require(&self, name: &str, context: &str) -> PrepResult<usize> {
        self.index_of(name).ok_or_else(|| PrepError::MissingColumn {
            column: name.to_string(),
            context: format!(
                "{context} (columns: {:?})",
                self.field_names().collect::<Vec<_>>()
            ),
        })
    }
}

/// A single typed value in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Numeric view of the value, if it has one. `Null` and text are `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            Value::Null | Value::Utf8(_) => None,
        }
    }

    /// Hashable form of the value, for grouping and duplicate detection.
    ///
    /// Floats are keyed by bit pattern, so equal floats compare equal and the
    /// key is stable across hashing.
    pub fn key(&self) -> KeyValue {
        match self {
            Value::Null => KeyValue::Null,
            Value::Int64(v) => KeyValue::Int64(*v),
            Value::Float64(v) => KeyValue::Float64(v.to_bits()),
            Value::Utf8(s) => KeyValue::Utf8(s.clone()),
        }
    }
}

/// Hashable key form of a [`Value`]. See [`Value::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// Float bit pattern.
    Float64(u64),
    /// UTF-8 string.
    Utf8(String),
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`]
/// fields. Invariant: every row has exactly one value per schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new table by applying `mapper` to every row.
    ///
    /// The returned table preserves the original schema.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the
    /// schema field count.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected_len = self.schema.fields.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match schema length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Rename a column in place.
    pub fn rename_column(&mut self, from: &str, to: &str) -> PrepResult<()> {
        let idx = self.schema.require(from, "rename")?;
        self.schema.fields[idx].name = to.to_string();
        Ok(())
    }

    /// Create a new table containing only the named columns, in the given order.
    pub fn select(&self, columns: &[&str]) -> PrepResult<Self> {
        let mut idxs = Vec::with_capacity(columns.len());
        for name in columns {
            idxs.push(self.schema.require(name, "select")?);
        }

        let fields = idxs
            .iter()
            .map(|&i| self.schema.fields[i].clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Self {
            schema: Schema::new(fields),
            rows,
        })
    }

    /// Append a new column computed from each existing row.
    ///
    /// # Panics
    ///
    /// Panics (debug assertion) if `field` duplicates an existing column name;
    /// callers are expected to check first.
    pub fn add_column<F>(&self, field: Field, mut value_for: F) -> Self
    where
        F: FnMut(&[Value]) -> Value,
    {
        debug_assert!(
            self.schema.index_of(&field.name).is_none(),
            "duplicate column '{}'",
            field.name
        );

        let mut fields = self.schema.fields.clone();
        fields.push(field);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = row.clone();
                out.push(value_for(row.as_slice()));
                out
            })
            .collect();
        Self {
            schema: Schema::new(fields),
            rows,
        }
    }

    /// Append all rows of `other` to this table.
    ///
    /// Fails unless both tables have identical schemas.
    pub fn append(&mut self, other: Table) -> PrepResult<()> {
        if self.schema != other.schema {
            return Err(PrepError::InvalidConfig {
                message: format!(
                    "cannot append tables with different schemas ({:?} vs {:?})",
                    self.schema.field_names().collect::<Vec<_>>(),
                    other.schema.field_names().collect::<Vec<_>>()
                ),
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }
}
