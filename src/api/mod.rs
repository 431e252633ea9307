//! Purpose: Define the public Rust API boundary for rowset.
//! Exports: Result-table types, cell/value types, record binding, errors, options.
//! Role: Public, additive-only surface over the `core` modules.
//! Invariants: Everything a caller needs to load and read a result set is re-exported here.

pub use crate::core::casing::camel_to_underscore;
pub use crate::core::cell::{ColumnDescriptor, RawCell, Value, ZERO_TIMESTAMP, format_timestamp};
pub use crate::core::classify::{SemanticCategory, category_of, classify};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::options::{DuplicateColumns, TableOptions};
pub use crate::core::record::{FieldBinding, FieldSlot, Record};
pub use crate::core::stream::{MemoryStream, ResultStream};
pub use crate::core::table::ResultTable;
