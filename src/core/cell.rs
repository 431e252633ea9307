// Column metadata, driver-native cells, and converted values.
use std::fmt;

use bstr::ByteSlice;
use serde_json::Value as JsonValue;
use time::PrimitiveDateTime;
use time::macros::{datetime, format_description};

/// Timestamp returned for null temporal cells and unrecognized temporal bytes.
pub const ZERO_TIMESTAMP: PrimitiveDateTime = datetime!(0001-01-01 0:00);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub declared_type: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }
}

/// One driver-native value for a (row, column) position.
#[derive(Clone, Debug, PartialEq)]
pub enum RawCell {
    Null,
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Timestamp(PrimitiveDateTime),
}

impl RawCell {
    pub fn bytes(value: impl AsRef<[u8]>) -> Self {
        RawCell::Bytes(value.as_ref().to_vec())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawCell::Null)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            RawCell::Null => "null",
            RawCell::Int(_) => "int",
            RawCell::Float(_) => "float",
            RawCell::Bytes(_) => "bytes",
            RawCell::Timestamp(_) => "timestamp",
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            RawCell::Null => JsonValue::Null,
            RawCell::Int(value) => JsonValue::from(*value),
            RawCell::Float(value) => JsonValue::from(*value),
            RawCell::Bytes(bytes) => JsonValue::from(bytes.to_str_lossy().into_owned()),
            RawCell::Timestamp(ts) => JsonValue::from(format_timestamp(*ts)),
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Null => write!(f, "NULL"),
            RawCell::Int(value) => write!(f, "{value}"),
            RawCell::Float(value) => write!(f, "{value}"),
            RawCell::Bytes(bytes) => write!(f, "{}", bytes.as_bstr()),
            RawCell::Timestamp(ts) => write!(f, "{}", format_timestamp(*ts)),
        }
    }
}

/// Result of the generic `get`: the converted value, or the raw cell for
/// declared types no accessor family accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(PrimitiveDateTime),
    Raw(RawCell),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<PrimitiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Int(value) => JsonValue::from(*value),
            Value::Float(value) => JsonValue::from(*value),
            Value::Text(value) => JsonValue::from(value.clone()),
            Value::Timestamp(ts) => JsonValue::from(format_timestamp(*ts)),
            Value::Raw(cell) => cell.to_json(),
        }
    }
}

/// Render as `YYYY-MM-DD HH:MM:SS`, appending fractional seconds only when present.
pub fn format_timestamp(ts: PrimitiveDateTime) -> String {
    let formatted = if ts.nanosecond() == 0 {
        ts.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
    } else {
        ts.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"
        ))
    };
    formatted.unwrap_or_else(|_| format!("{ts}"))
}
