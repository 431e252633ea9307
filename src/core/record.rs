// Binding the current row onto caller-declared record fields.
use std::collections::HashSet;

use time::PrimitiveDateTime;

use crate::core::casing::camel_to_underscore;
use crate::core::error::{Error, ErrorKind};
use crate::core::table::ResultTable;

/// Mutable access to one record field, tagged with the accessor that fills it.
#[derive(Debug)]
pub enum FieldSlot<'a> {
    Int(&'a mut isize),
    Int64(&'a mut i64),
    Float32(&'a mut f32),
    Float64(&'a mut f64),
    Text(&'a mut String),
    Timestamp(&'a mut PrimitiveDateTime),
    /// Declared for completeness; never written.
    Unsupported,
}

#[derive(Debug)]
pub struct FieldBinding<'a> {
    name: &'static str,
    column: Option<&'static str>,
    slot: FieldSlot<'a>,
}

impl<'a> FieldBinding<'a> {
    pub fn new(name: &'static str, slot: FieldSlot<'a>) -> Self {
        Self {
            name,
            column: None,
            slot,
        }
    }

    /// Explicit column name, tried before the field name itself.
    pub fn with_column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn candidate_keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(3);
        if let Some(column) = self.column {
            keys.push(column.to_string());
        }
        keys.push(self.name.to_string());
        keys.push(camel_to_underscore(self.name));
        keys
    }
}

/// A record type whose fields can be filled from a result row.
///
/// Fields are reported in declaration order; each one is looked up by its
/// column tag, then its own name, then its name in underscore case.
pub trait Record {
    fn fields(&mut self) -> Vec<FieldBinding<'_>>;
}

impl ResultTable {
    /// Fills `target` from the current row. `None` is accepted and does nothing.
    ///
    /// Fields matching no column are skipped. The first conversion error stops
    /// binding; fields already written keep their new values.
    pub fn get_struct<R: Record + ?Sized>(&self, target: Option<&mut R>) -> Result<(), Error> {
        let Some(target) = target else {
            return Ok(());
        };
        let fields = target.fields();
        validate_fields(&fields)?;

        for field in fields {
            let keys = field.candidate_keys();
            let Some(key) = keys.into_iter().find(|key| self.has_column(key)) else {
                tracing::trace!(field = field.name, "no matching column; field skipped");
                continue;
            };
            match field.slot {
                FieldSlot::Int(slot) => *slot = self.get_int(&key)?,
                FieldSlot::Int64(slot) => *slot = self.get_int64(&key)?,
                FieldSlot::Float32(slot) => *slot = self.get_float32(&key)?,
                FieldSlot::Float64(slot) => *slot = self.get_float64(&key)?,
                FieldSlot::Text(slot) => *slot = self.get_string(&key)?,
                FieldSlot::Timestamp(slot) => *slot = self.get_time(&key)?,
                FieldSlot::Unsupported => {}
            }
        }
        Ok(())
    }
}

fn validate_fields(fields: &[FieldBinding<'_>]) -> Result<(), Error> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if field.name.is_empty() {
            return Err(Error::new(ErrorKind::InvalidTarget)
                .with_message("record declares a field with an empty name"));
        }
        if !seen.insert(field.name) {
            return Err(Error::new(ErrorKind::InvalidTarget)
                .with_message(format!("record declares field {:?} twice", field.name)));
        }
    }
    Ok(())
}
