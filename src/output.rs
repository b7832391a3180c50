//! CSV serialization of a [`Table`].

use std::path::Path;

use crate::error::PrepResult;
use crate::types::{Table, Value};

/// Write `table` to a CSV file: header row first, columns in table order, no
/// index column. `Null` serializes as an empty field.
///
/// Callers run this only after every prior stage has succeeded, so a failed
/// run never leaves a partial output file behind from this crate's pipeline.
pub fn write_csv_to_path(table: &Table, path: impl AsRef<Path>) -> PrepResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    write_csv(table, &mut wtr)
}

/// Write `table` as CSV to an arbitrary writer.
pub fn write_csv_to_writer<W: std::io::Write>(table: &Table, writer: W) -> PrepResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    write_csv(table, &mut wtr)
}

fn write_csv<W: std::io::Write>(table: &Table, wtr: &mut csv::Writer<W>) -> PrepResult<()> {
    wtr.write_record(table.schema.field_names())?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(format_value))?;
    }
    wtr.flush()?;
    Ok(())
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) => v.to_string(),
        Value::Utf8(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::write_csv_to_writer;
    use crate::types::{DataType, Field, Schema, Table, Value};

    #[test]
    fn writes_header_then_rows_without_index() {
        let schema = Schema::new(vec![
            Field::new("entity", DataType::Utf8),
            Field::new("year", DataType::Int64),
            Field::new("emission", DataType::Float64),
        ]);
        let table = Table::new(
            schema,
            vec![
                vec![
                    Value::Utf8("chile".to_string()),
                    Value::Int64(2018),
                    Value::Float64(6.0),
                ],
                vec![Value::Utf8("brazil".to_string()), Value::Int64(2019), Value::Null],
            ],
        );

        let mut buf = Vec::new();
        write_csv_to_writer(&table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "entity,year,emission\nchile,2018,6\nbrazil,2019,\n");
    }

    #[test]
    fn quotes_fields_containing_delimiters() {
        let schema = Schema::new(vec![Field::new("entity", DataType::Utf8)]);
        let table = Table::new(
            schema,
            vec![vec![Value::Utf8("bonaire, sint eustatius".to_string())]],
        );

        let mut buf = Vec::new();
        write_csv_to_writer(&table, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "entity\n\"bonaire, sint eustatius\"\n");
    }
}
