//! Loading delimited text into in-memory [`crate::types::Table`]s.
//!
//! - [`csv`]: single-file CSV loading with header validation, typed parsing,
//!   and `#` comment-line skipping
//! - [`join`]: merging several single-value CSV sources on a shared key

pub mod csv;
pub mod join;

pub use csv::{CsvOptions, load_csv_from_path, load_csv_from_reader};
pub use join::{CsvSource, inner_join, load_and_join};
