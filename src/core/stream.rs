// Driver-side seam: an executed query's columns followed by its rows.
use std::collections::VecDeque;
use std::convert::Infallible;

use crate::core::cell::{ColumnDescriptor, RawCell};

/// An executed query result as delivered by the database driver.
///
/// `ResultTable::load` calls `columns` once, then `next_row` until it yields
/// `None` or an error, then `close` exactly once.
pub trait ResultStream {
    type Error: std::error::Error + Send + Sync + 'static;

    fn columns(&mut self) -> Result<Vec<ColumnDescriptor>, Self::Error>;

    fn next_row(&mut self) -> Result<Option<Vec<RawCell>>, Self::Error>;

    fn close(&mut self) -> Result<(), Self::Error>;
}

impl<S: ResultStream + ?Sized> ResultStream for &mut S {
    type Error = S::Error;

    fn columns(&mut self) -> Result<Vec<ColumnDescriptor>, Self::Error> {
        (**self).columns()
    }

    fn next_row(&mut self) -> Result<Option<Vec<RawCell>>, Self::Error> {
        (**self).next_row()
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        (**self).close()
    }
}

/// Rows already held in memory, e.g. decoded from a JSON dump.
#[derive(Clone, Debug, Default)]
pub struct MemoryStream {
    columns: Vec<ColumnDescriptor>,
    rows: VecDeque<Vec<RawCell>>,
    closed: bool,
}

impl MemoryStream {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            columns,
            rows: VecDeque::new(),
            closed: false,
        }
    }

    pub fn with_row(mut self, row: Vec<RawCell>) -> Self {
        self.rows.push_back(row);
        self
    }

    pub fn push_row(&mut self, row: Vec<RawCell>) {
        self.rows.push_back(row);
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ResultStream for MemoryStream {
    type Error = Infallible;

    fn columns(&mut self) -> Result<Vec<ColumnDescriptor>, Infallible> {
        Ok(self.columns.clone())
    }

    fn next_row(&mut self) -> Result<Option<Vec<RawCell>>, Infallible> {
        Ok(self.rows.pop_front())
    }

    fn close(&mut self) -> Result<(), Infallible> {
        self.closed = true;
        Ok(())
    }
}
