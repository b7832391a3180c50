//! In-memory table transformations.
//!
//! Each stage is a pure function from [`crate::types::Table`] to a new table
//! (plus, for enrichment, an immutable [`crate::lookup::Lookup`]); nothing is
//! mutated in place and no stage keeps a reference to its input.
//!
//! Stage order in a full cleaning run:
//!
//! 1. [`normalize`]: lowercase + trim text columns
//! 2. [`filter`]: drop rows by null/negative/range/substring predicates
//! 3. [`aggregate`]: group-by keys, mean-reduce numeric columns
//! 4. [`dedup`]: drop exact-duplicate rows
//! 5. [`enrich`]: append a label column from a static lookup
//! 6. [`top_n`]: keep only the N groups with the largest summed metric
//!
//! ## Example: normalize → filter → aggregate
//!
//! ```rust
//! use dataprep::processing::aggregate::group_mean;
//! use dataprep::processing::filter::{RowFilter, SubstringExclusion, apply_filter};
//! use dataprep::processing::normalize::normalize_all_text;
//! use dataprep::types::{DataType, Field, Schema, Table, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("entity", DataType::Utf8),
//!     Field::new("emission", DataType::Float64),
//! ]);
//! let table = Table::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8(" Chile".to_string()), Value::Float64(5.0)],
//!         vec![Value::Utf8("chile".to_string()), Value::Float64(7.0)],
//!         vec![Value::Utf8("Asia".to_string()), Value::Float64(100.0)],
//!     ],
//! );
//!
//! let table = normalize_all_text(&table);
//! let filter = RowFilter {
//!     exclude: Some(SubstringExclusion {
//!         column: "entity".to_string(),
//!         patterns: vec!["asia".to_string()],
//!     }),
//!     ..Default::default()
//! };
//! let table = apply_filter(&table, &filter).unwrap();
//! let table = group_mean(&table, &["entity".to_string()], &["emission".to_string()]).unwrap();
//!
//! assert_eq!(table.rows, vec![vec![
//!     Value::Utf8("chile".to_string()),
//!     Value::Float64(6.0),
//! ]]);
//! ```

pub mod aggregate;
pub mod dedup;
pub mod enrich;
pub mod filter;
pub mod normalize;
pub mod top_n;

pub use aggregate::group_mean;
pub use dedup::dedup;
pub use enrich::{UNKNOWN_LABEL, enrich};
pub use filter::{ColumnBounds, RowFilter, SubstringExclusion, apply_filter};
pub use normalize::{normalize_all_text, normalize_columns, normalized};
pub use top_n::top_n_by_sum;
