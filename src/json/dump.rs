//! Purpose: Decode result-set dump documents into in-memory driver streams.
//! Exports: `from_str`, `read_path`, `cell_from_json`.
//! Role: Lets the CLI and tests replay a captured query result without a database.
//! Invariants: Cells map onto exactly one `RawCell` variant; nothing is coerced here.
//! Notes: Document shape is `{"columns":[{"name","type"}],"rows":[[cell,..],..]}`.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::core::cell::{ColumnDescriptor, RawCell};
use crate::core::error::{Error, ErrorKind};
use crate::core::stream::MemoryStream;
use crate::core::temporal::parse_datetime;

#[derive(Debug, Deserialize)]
struct DumpDocument {
    columns: Vec<DumpColumn>,
    #[serde(default)]
    rows: Vec<Vec<JsonValue>>,
}

#[derive(Debug, Deserialize)]
struct DumpColumn {
    name: String,
    #[serde(rename = "type")]
    declared_type: String,
}

const DUMP_HINT: &str = "Expected {\"columns\":[{\"name\":\"id\",\"type\":\"BIGINT\"}],\"rows\":[[\"42\"]]}.";

pub fn from_str(input: &str) -> Result<MemoryStream, Error> {
    let document: DumpDocument = serde_json::from_str(input).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("invalid result-set dump: {err}"))
            .with_hint(DUMP_HINT)
            .with_source(err)
    })?;

    let columns = document
        .columns
        .into_iter()
        .map(|column| ColumnDescriptor::new(column.name, column.declared_type))
        .collect();
    let mut stream = MemoryStream::new(columns);
    for (row_idx, row) in document.rows.iter().enumerate() {
        let cells = row
            .iter()
            .map(cell_from_json)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                let message = err.message().unwrap_or("invalid cell").to_string();
                err.with_message(format!("row {row_idx}: {message}"))
            })?;
        stream.push_row(cells);
    }
    Ok(stream)
}

pub fn read_path(path: &Path) -> Result<MemoryStream, Error> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message(format!("failed to read {}", path.display()))
            .with_source(err)
    })?;
    from_str(&text)
}

/// `null`, integer, float, string, or `{"timestamp": "YYYY-MM-DD HH:MM:SS"}`.
pub fn cell_from_json(value: &JsonValue) -> Result<RawCell, Error> {
    match value {
        JsonValue::Null => Ok(RawCell::Null),
        JsonValue::Number(number) if number.is_f64() => number
            .as_f64()
            .map(RawCell::Float)
            .ok_or_else(|| invalid_cell(format!("unrepresentable float {number}"))),
        JsonValue::Number(number) => number
            .as_i64()
            .map(RawCell::Int)
            .ok_or_else(|| invalid_cell(format!("integer {number} is out of range"))),
        JsonValue::String(text) => Ok(RawCell::bytes(text)),
        JsonValue::Object(map) => {
            let Some(JsonValue::String(text)) = map.get("timestamp") else {
                return Err(invalid_cell("objects must carry a \"timestamp\" string"));
            };
            parse_datetime(text)
                .map(RawCell::Timestamp)
                .ok_or_else(|| invalid_cell(format!("invalid timestamp {text:?}")))
        }
        JsonValue::Bool(_) | JsonValue::Array(_) => {
            Err(invalid_cell(format!("unsupported cell value {value}")))
        }
    }
}

fn invalid_cell(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Usage)
        .with_message(message)
        .with_hint(DUMP_HINT)
}

#[cfg(test)]
mod tests {
    use super::{cell_from_json, from_str};
    use crate::core::cell::RawCell;
    use crate::core::error::ErrorKind;
    use crate::core::table::ResultTable;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn cells_map_to_raw_variants() {
        assert_eq!(cell_from_json(&json!(null)).expect("null"), RawCell::Null);
        assert_eq!(cell_from_json(&json!(5)).expect("int"), RawCell::Int(5));
        assert_eq!(cell_from_json(&json!(2.5)).expect("float"), RawCell::Float(2.5));
        assert_eq!(cell_from_json(&json!("abc")).expect("bytes"), RawCell::bytes("abc"));
        assert_eq!(
            cell_from_json(&json!({"timestamp": "2024-05-06 07:08:09"})).expect("ts"),
            RawCell::Timestamp(datetime!(2024-05-06 07:08:09))
        );
    }

    #[test]
    fn unsupported_cells_are_usage_errors() {
        for value in [json!(true), json!([1]), json!({"when": "x"}), json!(u64::MAX)] {
            let err = cell_from_json(&value).expect_err("unsupported");
            assert_eq!(err.kind(), ErrorKind::Usage);
            assert!(err.hint().is_some());
        }
    }

    #[test]
    fn document_loads_into_a_table() {
        let stream = from_str(
            r#"{"columns":[{"name":"id","type":"BIGINT"},{"name":"name","type":"VARCHAR"}],
                "rows":[["1","a"],[2,null]]}"#,
        )
        .expect("dump");
        let mut table = ResultTable::load(stream).expect("load");
        assert_eq!(table.row_count(), 2);
        assert!(table.seek(1));
        assert_eq!(table.get_int64("id").expect("id"), 2);
        assert_eq!(table.get_string("name").expect("name"), "");
    }

    #[test]
    fn bad_rows_report_their_index() {
        let err = from_str(r#"{"columns":[{"name":"a","type":"INT"}],"rows":[[1],[true]]}"#)
            .expect_err("bool cell");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.message().expect("message").starts_with("row 1:"));
    }

    #[test]
    fn malformed_document_is_a_usage_error() {
        let err = from_str(r#"{"rows":[]}"#).expect_err("no columns");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }
}
