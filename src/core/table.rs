// Fully buffered result table with a cursor and typed, by-name accessors.
use std::collections::{BTreeMap, HashMap};

use bstr::ByteSlice;
use serde_json::{Map, Value as JsonValue};
use time::PrimitiveDateTime;

use crate::core::cell::{ColumnDescriptor, RawCell, Value, ZERO_TIMESTAMP};
use crate::core::classify::{SemanticCategory, category_of, classify};
use crate::core::error::{Error, ErrorKind};
use crate::core::options::{DuplicateColumns, TableOptions};
use crate::core::stream::ResultStream;
use crate::core::temporal::{TemporalBytes, parse_temporal_bytes};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Cursor {
    BeforeFirst,
    At(usize),
    AfterLast,
}

#[derive(Clone, Debug)]
pub struct ResultTable {
    columns: Vec<ColumnDescriptor>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<RawCell>>,
    cursor: Cursor,
    options: TableOptions,
}

impl ResultTable {
    pub fn load<S: ResultStream>(stream: S) -> Result<Self, Error> {
        Self::load_with(stream, TableOptions::default())
    }

    /// Drains `stream` into memory and closes it, whether or not draining succeeded.
    /// Nothing is kept from a stream that fails part way.
    pub fn load_with<S: ResultStream>(mut stream: S, options: TableOptions) -> Result<Self, Error> {
        let drained = drain(&mut stream, options);
        let closed = stream.close();
        let table = drained?;
        if let Err(err) = closed {
            tracing::warn!(error = %err, "result stream failed to close after buffering");
        }
        tracing::debug!(
            rows = table.rows.len(),
            columns = table.columns.len(),
            "buffered result set"
        );
        Ok(table)
    }

    pub fn options(&self) -> TableOptions {
        self.options
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Index of the current row, if the cursor is on one.
    pub fn position(&self) -> Option<usize> {
        match self.cursor {
            Cursor::At(row) => Some(row),
            Cursor::BeforeFirst | Cursor::AfterLast => None,
        }
    }

    /// Moves the cursor to the next row. Once the last row has been passed every
    /// further call returns false until `seek` or `reset`.
    pub fn next(&mut self) -> bool {
        let candidate = match self.cursor {
            Cursor::BeforeFirst => 0,
            Cursor::At(row) => row + 1,
            Cursor::AfterLast => return false,
        };
        if candidate < self.rows.len() {
            self.cursor = Cursor::At(candidate);
            true
        } else {
            self.cursor = Cursor::AfterLast;
            false
        }
    }

    /// Positions the cursor on `row`. Out-of-range rows leave the cursor untouched.
    pub fn seek(&mut self, row: isize) -> bool {
        match usize::try_from(row) {
            Ok(row) if row < self.rows.len() => {
                self.cursor = Cursor::At(row);
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.cursor = Cursor::BeforeFirst;
    }

    /// Column name at position `n`, or `""` when out of range.
    pub fn name_at(&self, n: isize) -> &str {
        usize::try_from(n)
            .ok()
            .and_then(|n| self.columns.get(n))
            .map(|column| column.name.as_str())
            .unwrap_or("")
    }

    pub fn is_null(&self, name: &str) -> Result<bool, Error> {
        let idx = self.resolve(name)?;
        Ok(self.current_cell(name, idx)?.is_null())
    }

    pub fn get_int(&self, name: &str) -> Result<isize, Error> {
        let value = self.get_int64(name)?;
        isize::try_from(value).map_err(|err| {
            Error::new(ErrorKind::Parse)
                .with_message(format!("value {value} does not fit the platform integer"))
                .with_column(name)
                .with_source(err)
        })
    }

    pub fn get_int64(&self, name: &str) -> Result<i64, Error> {
        let (_, cell) = self.typed_cell(name, SemanticCategory::Integer)?;
        match cell {
            RawCell::Int(value) => Ok(*value),
            RawCell::Bytes(bytes) => {
                let text = utf8_text(name, bytes)?;
                text.parse::<i64>().map_err(|err| {
                    Error::new(ErrorKind::Parse)
                        .with_message(format!("invalid integer literal {text:?}"))
                        .with_column(name)
                        .with_source(err)
                })
            }
            RawCell::Null => Ok(0),
            other => Err(unconvertible(name, other, SemanticCategory::Integer)),
        }
    }

    pub fn get_float32(&self, name: &str) -> Result<f32, Error> {
        let value = self.get_float64(name)?;
        let narrowed = value as f32;
        if value.is_finite() && !narrowed.is_finite() {
            return Err(Error::new(ErrorKind::Parse)
                .with_message(format!("value {value} is out of range for a 32-bit float"))
                .with_column(name));
        }
        Ok(narrowed)
    }

    pub fn get_float64(&self, name: &str) -> Result<f64, Error> {
        let (_, cell) = self.typed_cell(name, SemanticCategory::Float)?;
        match cell {
            RawCell::Float(value) => Ok(*value),
            RawCell::Bytes(bytes) => {
                let text = utf8_text(name, bytes)?;
                text.parse::<f64>().map_err(|err| {
                    Error::new(ErrorKind::Parse)
                        .with_message(format!("invalid float literal {text:?}"))
                        .with_column(name)
                        .with_source(err)
                })
            }
            RawCell::Null => Ok(0.0),
            other => Err(unconvertible(name, other, SemanticCategory::Float)),
        }
    }

    pub fn get_string(&self, name: &str) -> Result<String, Error> {
        let (_, cell) = self.typed_cell(name, SemanticCategory::Text)?;
        match cell {
            RawCell::Bytes(bytes) => utf8_text(name, bytes).map(str::to_string),
            RawCell::Null => Ok(String::new()),
            other => Err(unconvertible(name, other, SemanticCategory::Text)),
        }
    }

    /// Text-category bytes exactly as the driver delivered them.
    pub fn get_bytes(&self, name: &str) -> Result<Vec<u8>, Error> {
        let (_, cell) = self.typed_cell(name, SemanticCategory::Text)?;
        match cell {
            RawCell::Bytes(bytes) => Ok(bytes.clone()),
            RawCell::Null => Ok(Vec::new()),
            other => Err(unconvertible(name, other, SemanticCategory::Text)),
        }
    }

    pub fn get_time(&self, name: &str) -> Result<PrimitiveDateTime, Error> {
        let (column, cell) = self.typed_cell(name, SemanticCategory::Temporal)?;
        match cell {
            RawCell::Timestamp(ts) => Ok(*ts),
            RawCell::Null => Ok(ZERO_TIMESTAMP),
            RawCell::Bytes(bytes) => {
                let text = utf8_text(name, bytes)?;
                match parse_temporal_bytes(&column.declared_type, text) {
                    Ok(TemporalBytes::Parsed(ts)) => Ok(ts),
                    Ok(TemporalBytes::Zero) => Ok(ZERO_TIMESTAMP),
                    Ok(TemporalBytes::Unrecognized) if self.options.strict_temporal => {
                        Err(Error::new(ErrorKind::Parse)
                            .with_message(format!(
                                "unrecognized {} literal {text:?}",
                                column.declared_type
                            ))
                            .with_column(name))
                    }
                    Ok(TemporalBytes::Unrecognized) => {
                        tracing::debug!(
                            column = name,
                            declared_type = %column.declared_type,
                            literal = text,
                            "unrecognized temporal literal read as zero timestamp"
                        );
                        Ok(ZERO_TIMESTAMP)
                    }
                    Err(message) => Err(Error::new(ErrorKind::Parse)
                        .with_message(message)
                        .with_column(name)),
                }
            }
            other => Err(unconvertible(name, other, SemanticCategory::Temporal)),
        }
    }

    /// Reads `name` through the first accessor family its declared type belongs to,
    /// or returns the raw cell when none accepts it.
    pub fn get(&self, name: &str) -> Result<Value, Error> {
        let idx = self.resolve(name)?;
        match category_of(&self.columns[idx].declared_type) {
            Some(SemanticCategory::Integer) => self.get_int64(name).map(Value::Int),
            Some(SemanticCategory::Float) => self.get_float64(name).map(Value::Float),
            Some(SemanticCategory::Text) => self.get_string(name).map(Value::Text),
            Some(SemanticCategory::Temporal) => self.get_time(name).map(Value::Timestamp),
            None => self.current_cell(name, idx).map(|cell| Value::Raw(cell.clone())),
        }
    }

    pub fn to_map(&self) -> Result<BTreeMap<String, Value>, Error> {
        let mut map = BTreeMap::new();
        self.to_map_into(&mut map)?;
        Ok(map)
    }

    /// Fills `map` column by column; on error the entries written so far remain.
    pub fn to_map_into(&self, map: &mut BTreeMap<String, Value>) -> Result<(), Error> {
        for column in &self.columns {
            let value = self.get(&column.name)?;
            map.insert(column.name.clone(), value);
        }
        Ok(())
    }

    /// The current row as a JSON object, keyed by column name.
    pub fn to_json_row(&self) -> Result<Map<String, JsonValue>, Error> {
        let mut row = Map::new();
        for column in &self.columns {
            row.insert(column.name.clone(), self.get(&column.name)?.to_json());
        }
        Ok(row)
    }

    pub(crate) fn resolve(&self, name: &str) -> Result<usize, Error> {
        self.index.get(name).copied().ok_or_else(|| {
            Error::new(ErrorKind::UnknownColumn)
                .with_message(format!("no column named {name:?}"))
                .with_column(name)
        })
    }

    fn current_cell(&self, name: &str, idx: usize) -> Result<&RawCell, Error> {
        let Cursor::At(row) = self.cursor else {
            return Err(Error::new(ErrorKind::NoCurrentRow)
                .with_message("cursor is not positioned on a row")
                .with_column(name)
                .with_hint("Call next() or seek() and check that it returned true."));
        };
        Ok(&self.rows[row][idx])
    }

    fn typed_cell(
        &self,
        name: &str,
        category: SemanticCategory,
    ) -> Result<(&ColumnDescriptor, &RawCell), Error> {
        let idx = self.resolve(name)?;
        let column = &self.columns[idx];
        if !classify(&column.declared_type, category) {
            return Err(Error::new(ErrorKind::UnsupportedConversion)
                .with_message(format!(
                    "unsupported conversion: db({}) => {category}",
                    column.declared_type
                ))
                .with_column(name));
        }
        Ok((column, self.current_cell(name, idx)?))
    }
}

fn drain<S: ResultStream>(stream: &mut S, options: TableOptions) -> Result<ResultTable, Error> {
    let columns = stream.columns().map_err(stream_error)?;
    let mut index = HashMap::with_capacity(columns.len());
    for (idx, column) in columns.iter().enumerate() {
        let previous = index.insert(column.name.clone(), idx);
        if previous.is_some() && options.duplicate_columns == DuplicateColumns::Reject {
            return Err(Error::new(ErrorKind::StreamFailure)
                .with_message(format!(
                    "result set repeats column name {:?}; rejected by table options",
                    column.name
                ))
                .with_column(column.name.clone())
                .with_hint("Alias the column in the query or load with duplicate columns allowed."));
        }
    }

    let mut rows = Vec::new();
    while let Some(row) = stream.next_row().map_err(stream_error)? {
        if row.len() != columns.len() {
            return Err(Error::new(ErrorKind::StreamFailure).with_message(format!(
                "row {} has {} cells, expected {}",
                rows.len(),
                row.len(),
                columns.len()
            )));
        }
        rows.push(row);
    }

    Ok(ResultTable {
        columns,
        index,
        rows,
        cursor: Cursor::BeforeFirst,
        options,
    })
}

fn stream_error(err: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::new(ErrorKind::StreamFailure)
        .with_message(err.to_string())
        .with_source(err)
}

fn utf8_text<'a>(name: &str, bytes: &'a [u8]) -> Result<&'a str, Error> {
    bytes.to_str().map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message("cell bytes are not valid UTF-8")
            .with_column(name)
            .with_source(err)
    })
}

fn unconvertible(name: &str, cell: &RawCell, category: SemanticCategory) -> Error {
    Error::new(ErrorKind::UnconvertibleKind)
        .with_message(format!("can not convert {} cell to {category}", cell.kind_name()))
        .with_column(name)
}
